//! Delivery quote command

use super::{format_coordinate, EndpointRequest};
use crate::app::{notice, print_json, App};
use anyhow::Result;
use owo_colors::OwoColorize;
use std::time::Duration;
use swiftify_cli::output::{format_currency, format_distance, format_duration, Status};
use swiftify_cli::progress;
use swiftify_maps::RouteResolution;
use swiftify_tracking::WeightClass;

/// Price a delivery between two endpoints
pub async fn run(app: &App, endpoints: EndpointRequest, weight: &str) -> Result<()> {
    let weight = WeightClass::from_label(weight);
    if !weight.is_recognized() {
        notice(app, &format!("Unknown weight class '{weight}', pricing at 1x"));
    }

    let pb = progress::spinner_if(!app.json(), "Resolving route...");
    let (origin, destination) = match endpoints.resolve(app).await {
        Ok(ends) => ends,
        Err(e) => {
            pb.finish_and_clear();
            return Err(e);
        }
    };
    let quote = app.ctx.scheduling().quote_between(origin, destination, &weight).await;
    pb.finish_and_clear();

    if app.json() {
        return print_json(&quote);
    }

    Status::header("📦 Delivery quote");
    Status::field("From", format_coordinate(&quote.origin));
    Status::field("To", format_coordinate(&quote.destination));
    Status::field("Weight", &quote.weight);
    Status::field("Distance", format_distance(quote.distance_km));
    match &quote.route {
        RouteResolution::Live { provider, route } => {
            Status::field("Route", format!("{provider} ({} points)", route.len()));
        }
        RouteResolution::Fallback { reason, .. } => {
            Status::field("Route", format!("{} ({reason})", "straight-line".yellow()));
        }
    }
    Status::field(
        "Transit",
        format_duration(Duration::from_secs_f64(quote.transit_hours.max(0.0) * 3600.0)),
    );
    Status::field("ETA", quote.eta.format("%Y-%m-%d %H:%M UTC"));
    Status::field("Cost", format_currency(quote.cost).green().bold());
    println!();

    Ok(())
}
