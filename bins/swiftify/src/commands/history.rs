//! Search history command

use crate::app::{print_json, App};
use anyhow::Result;
use swiftify_cli::output::{format_count, Status};

pub fn run(app: &App, clear: bool) -> Result<()> {
    let tracking = app.ctx.tracking();

    if clear {
        tracking.clear_search_history().map_err(swiftify_core::Error::from)?;
        if !app.json() {
            Status::success("Search history cleared");
        }
        return Ok(());
    }

    let history = tracking.search_history().map_err(swiftify_core::Error::from)?;
    if app.json() {
        return print_json(&history);
    }

    if history.is_empty() {
        Status::info("No shipments tracked yet");
        return Ok(());
    }
    Status::header(&format!("Recent searches ({})", format_count(history.len(), "ID", "IDs")));
    for id in &history {
        println!("  {id}");
    }
    Ok(())
}
