//! Delivery scheduling command

use crate::app::{notice, print_json, App};
use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use serde_json::json;
use std::path::Path;
use swiftify_cli::output::{format_currency, format_distance, Status};
use swiftify_cli::progress;
use swiftify_session::Scheduled;
use swiftify_tracking::ScheduleRequest;

pub async fn run(app: &App, request_path: &Path) -> Result<()> {
    let raw = std::fs::read_to_string(request_path)
        .with_context(|| format!("Failed to read {}", request_path.display()))?;
    let request: ScheduleRequest = serde_json::from_str(&raw)
        .map_err(|e| swiftify_core::Error::validation(format!("Invalid schedule request: {e}")))?;

    let pb = progress::spinner_if(!app.json(), "Scheduling delivery...");
    let result = app.ctx.scheduling().schedule(request).await;
    pb.finish_and_clear();
    let (quote, scheduled) = result.map_err(swiftify_core::Error::from)?;

    if app.json() {
        return print_json(&json!({
            "trackingId": scheduled.tracking_id(),
            "local": scheduled.is_local(),
            "quote": quote,
        }));
    }

    if let Scheduled::Local { reason, .. } = &scheduled {
        notice(app, &format!("Saved locally ({reason}); tracking works on this machine only"));
    }
    Status::success(&format!("Scheduled {}", scheduled.tracking_id().bold()));
    Status::field("Distance", format_distance(quote.distance_km));
    Status::field("Route", quote.route.provenance());
    Status::field("Cost", format_currency(quote.cost));
    Status::field("ETA", quote.eta.format("%Y-%m-%d %H:%M UTC"));
    println!();

    Ok(())
}
