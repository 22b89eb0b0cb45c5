//! Route lookup command

use super::{format_coordinate, EndpointRequest};
use crate::app::{print_json, App};
use anyhow::Result;
use owo_colors::OwoColorize;
use swiftify_cli::output::{format_distance, Status};
use swiftify_cli::progress;
use swiftify_maps::RouteResolution;

pub async fn run(app: &App, endpoints: EndpointRequest, show_points: bool) -> Result<()> {
    let pb = progress::spinner_if(!app.json(), "Resolving route...");
    let ends = endpoints.resolve(app).await;
    let resolution = match ends {
        Ok((origin, destination)) => app.ctx.routes().resolve_route(origin, destination).await,
        Err(e) => {
            pb.finish_and_clear();
            return Err(e);
        }
    };
    pb.finish_and_clear();

    if app.json() {
        return print_json(&resolution);
    }

    let route = resolution.route();
    Status::header("🗺  Route");
    match &resolution {
        RouteResolution::Live { provider, .. } => Status::field("Source", provider.green()),
        RouteResolution::Fallback { reason, .. } => {
            Status::field("Source", format!("{} ({reason})", "straight-line".yellow()));
        }
    }
    Status::field("Points", route.len());
    Status::field("Length", format_distance(route.length_km()));
    Status::field("Direct", format_distance(route.direct_km()));

    if show_points {
        println!();
        for (i, point) in route.points().iter().enumerate() {
            println!("  {:>4}  {}", i.dimmed(), format_coordinate(point));
        }
    }
    println!();

    Ok(())
}
