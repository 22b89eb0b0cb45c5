//! Address lookup command

use super::format_coordinate;
use crate::app::{print_json, App};
use anyhow::Result;
use swiftify_cli::output::Status;
use swiftify_cli::progress;
use swiftify_maps::GeocodeResolution;

pub async fn run(app: &App, address: &str) -> Result<()> {
    let pb = progress::spinner_if(!app.json(), "Geocoding...");
    let resolution = app.ctx.geocoder().resolve_address(address).await;
    pb.finish_and_clear();

    if app.json() {
        return print_json(&resolution);
    }

    match resolution {
        GeocodeResolution::Resolved(found) => {
            Status::success(&format!("Found via {}", found.provider));
            Status::field("Coordinate", format_coordinate(&found.coordinate));
            if let Some(name) = &found.display_name {
                Status::field("Address", name);
            }
            Ok(())
        }
        GeocodeResolution::Unresolved => {
            let mut err = swiftify_core::Error::validation(format!("Could not geocode '{address}'"));
            if app.ctx.geocoder().backend_names().is_empty() {
                err = err.with_suggestion("No geocoding backend is enabled; drop --offline");
            }
            Err(err.into())
        }
    }
}
