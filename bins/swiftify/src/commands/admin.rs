//! Operator commands

use crate::app::{print_json, App};
use anyhow::Result;
use owo_colors::OwoColorize;
use swiftify_cli::output::{format_count, format_percent, Status};
use swiftify_cli::progress;
use swiftify_session::AdminSession;
use swiftify_tracking::{ShipmentStatus, ShipmentUpdate, TrackingId, TrackingMode};

async fn login(app: &App, key: &str) -> Result<AdminSession> {
    let pb = progress::spinner_if(!app.json(), "Signing in...");
    let session = app.ctx.admin_login(key).await;
    pb.finish_and_clear();
    Ok(session.map_err(swiftify_core::Error::from)?)
}

pub async fn stats(app: &App, key: &str) -> Result<()> {
    let stats = login(app, key)
        .await?
        .stats()
        .await
        .map_err(swiftify_core::Error::from)?;

    if app.json() {
        return print_json(&stats);
    }

    Status::header("📊 Shipments");
    Status::field("Total", stats.total);
    Status::field("Delivered", stats.delivered.green());
    Status::field("In transit", stats.in_transit.cyan());
    Status::field("Pending", stats.pending.yellow());
    Ok(())
}

pub async fn list(app: &App, key: &str) -> Result<()> {
    let records = login(app, key)
        .await?
        .list()
        .await
        .map_err(swiftify_core::Error::from)?;

    if app.json() {
        return print_json(&records);
    }

    Status::header(&format_count(records.len(), "shipment", "shipments"));
    for record in &records {
        println!(
            "  {}  {:<17} {:>5}  {} → {}",
            record.id.bold(),
            record.status.label(),
            format_percent(record.progress),
            record.sender.short_address(),
            record.receiver.short_address()
        );
    }
    Ok(())
}

pub async fn update(
    app: &App,
    key: &str,
    raw_id: &str,
    status: Option<ShipmentStatus>,
    mode: Option<TrackingMode>,
    notes: Option<String>,
) -> Result<()> {
    let id = TrackingId::parse(raw_id).map_err(swiftify_core::Error::from)?;
    let update = ShipmentUpdate {
        status,
        mode,
        notes,
        ..ShipmentUpdate::default()
    };
    if update.is_empty() {
        return Err(swiftify_core::Error::validation("Nothing to update")
            .with_suggestion("Pass --status or --mode; --notes is recorded with a status change")
            .into());
    }

    let record = login(app, key)
        .await?
        .update(&id, &update)
        .await
        .map_err(swiftify_core::Error::from)?;

    if app.json() {
        return print_json(&record);
    }
    Status::success(&format!("{} is now {}", record.id, record.status.label()));
    Ok(())
}
