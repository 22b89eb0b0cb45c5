//! Shipment tracking command

use super::format_coordinate;
use crate::app::{notice, print_json, App};
use anyhow::Result;
use owo_colors::OwoColorize;
use std::time::Duration;
use swiftify_cli::output::{format_currency, format_percent, Status};
use swiftify_cli::progress;
use swiftify_session::{Provenance, TrackingLookup};
use swiftify_tracking::simulator::MIN_INTERVAL;
use swiftify_tracking::ShipmentRecord;

pub async fn run(app: &App, raw_id: &str, follow: bool, interval_ms: Option<u64>) -> Result<()> {
    let ctx = match interval_ms {
        Some(ms) => app
            .ctx
            .clone()
            .with_simulation_interval(Duration::from_millis(ms).max(MIN_INTERVAL)),
        None => app.ctx.clone(),
    };
    let tracking = ctx.tracking();

    let lookup = tracking.lookup(raw_id).await.map_err(swiftify_core::Error::from)?;

    if app.json() {
        print_json(&lookup)?;
    } else {
        print_lookup(&lookup);
    }

    if !follow {
        return Ok(());
    }
    if !lookup.record.is_simulation_eligible() {
        notice(
            app,
            &format!("{} is not moving; nothing to follow", lookup.record.status.label()),
        );
        return Ok(());
    }

    let json = app.json();
    let pb = if json {
        progress::ProgressBar::hidden()
    } else {
        let pb = progress::delivery_progress(lookup.record.id.as_str());
        progress::set_delivery_progress(&pb, lookup.record.progress);
        pb
    };

    let bar = pb.clone();
    let mut live = tracking
        .follow(lookup, move |record: &ShipmentRecord| {
            if json {
                match serde_json::to_string(record) {
                    Ok(line) => println!("{line}"),
                    Err(e) => tracing::warn!(error = %e, "Could not serialize update"),
                }
            } else {
                progress::set_delivery_progress(&bar, record.progress);
            }
        })
        .map_err(swiftify_core::Error::from)?;

    live.finished().await;
    let last = live.snapshot();
    progress::finish_success(&pb, &format!("{} reached {}", last.id, format_percent(last.progress)));

    Ok(())
}

fn print_lookup(lookup: &TrackingLookup) {
    let record = &lookup.record;

    Status::header(&format!("🚚 {}", record.id));
    Status::field("Status", record.status.label().bold());
    Status::field("Progress", format_percent(record.progress));
    Status::field("From", record.sender.short_address());
    Status::field("To", record.receiver.short_address());
    if let Some(position) = record.current_coordinate() {
        Status::field("Position", format_coordinate(&position));
    }
    Status::field("ETA", record.eta.format("%Y-%m-%d %H:%M UTC"));
    if let Some(cost) = record.estimated_cost {
        Status::field("Cost", format_currency(cost));
    }
    match lookup.provenance {
        Provenance::Backend => Status::field("Source", "backend"),
        Provenance::Local => Status::field("Source", "local store".yellow()),
        Provenance::Demo => Status::field("Source", "demo data".yellow()),
    }

    if !record.history.is_empty() {
        println!();
        for event in &record.history {
            println!(
                "  {}  {:<18} {}",
                event.timestamp.format("%m-%d %H:%M").dimmed(),
                event.status,
                event.location
            );
        }
    }
    println!();
}
