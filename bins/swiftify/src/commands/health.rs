//! Health check command

use crate::app::{print_json, App};
use anyhow::Result;
use owo_colors::OwoColorize;
use serde_json::json;
use swiftify_cli::output::{format_duration, Status};

/// Report backend health and which providers are configured
pub async fn run(app: &App) -> Result<()> {
    let client = app.require_client("health")?;
    let routing = app.ctx.routes().backend_name().unwrap_or("straight-line only");
    let geocoders = app.ctx.geocoder().backend_names();

    let result = client.health().check_timed().await;

    if app.json() {
        let backend = match &result {
            Ok((health, elapsed)) => json!({
                "status": health.status,
                "services": health.services,
                "latencyMs": elapsed.as_millis(),
            }),
            Err(e) => json!({ "status": "unreachable", "error": e.to_string() }),
        };
        print_json(&json!({
            "baseUrl": client.base_url(),
            "backend": backend,
            "routing": routing,
            "geocoding": geocoders,
        }))?;
    } else {
        Status::header("🏥 Swiftify health");
        Status::field("Backend", client.base_url());
        match &result {
            Ok((health, elapsed)) => {
                let latency = format!("({})", format_duration(*elapsed));
                Status::field("Status", format!("{} {} {}", "✓".green(), health.status, latency.dimmed()));
                if let Some(services) = health.services.as_ref().and_then(|s| s.as_object()) {
                    for (name, enabled) in services {
                        let mark = if enabled.as_bool().unwrap_or(false) {
                            "✓".green().to_string()
                        } else {
                            "✗".red().to_string()
                        };
                        println!("    {mark} {name}");
                    }
                }
            }
            Err(e) => Status::field("Status", format!("{} {e}", "✗".red())),
        }
        Status::field("Routing", routing);
        Status::field(
            "Geocoding",
            if geocoders.is_empty() {
                "disabled".to_string()
            } else {
                geocoders.join(", ")
            },
        );
        println!();
    }

    result.map(|_| ()).map_err(|e| swiftify_core::Error::from(e).into())
}
