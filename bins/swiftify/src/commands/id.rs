//! Tracking ID commands

use crate::app::print_json;
use crate::OutputFormat;
use anyhow::Result;
use serde_json::json;
use swiftify_cli::output::Status;
use swiftify_tracking::TrackingId;

/// Print `count` freshly minted IDs, one per line
pub fn generate(count: usize, format: OutputFormat) -> Result<()> {
    let ids: Vec<TrackingId> = (0..count).map(|_| TrackingId::generate()).collect();

    if format == OutputFormat::Json {
        return print_json(&ids);
    }
    for id in &ids {
        println!("{id}");
    }
    Ok(())
}

/// Check one ID; an invalid ID is a validation failure
pub fn validate(raw: &str, format: OutputFormat) -> Result<()> {
    let parsed = TrackingId::parse(raw);

    if format == OutputFormat::Json {
        print_json(&json!({
            "id": raw,
            "valid": parsed.is_ok(),
        }))?;
    } else if let Ok(id) = &parsed {
        Status::success(&format!("{id} is a valid tracking ID"));
    }

    match parsed {
        Ok(_) => Ok(()),
        Err(e) => Err(swiftify_core::Error::from(e).into()),
    }
}
