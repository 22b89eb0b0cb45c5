//! Wiring shared by every command

use crate::OutputFormat;
use anyhow::{Context, Result};
use serde::Serialize;
use std::sync::Arc;
use swiftify_api_client::{ClientConfig, SwiftifyClient};
use swiftify_cli::output::Status;
use swiftify_core::config::Config;
use swiftify_session::{FileStore, SessionContext, ShipmentBackend};
use tracing::{debug, warn};

/// The session context and the backend client, if any
pub struct App {
    pub ctx: SessionContext,
    pub client: Option<SwiftifyClient>,
    pub format: OutputFormat,
}

impl App {
    /// Build the session context from loaded config
    ///
    /// Offline mode uses the same file store but no routing, geocoding or
    /// backend services. A client that cannot be configured is logged and
    /// skipped; commands that need it report that themselves.
    pub fn build(config: Config, offline: bool, format: OutputFormat) -> Result<Self> {
        if let Some(path) = &config.path {
            debug!(path = %path, "Loaded config");
        }

        if offline {
            let store = FileStore::new(&config.schema.storage.data_dir)
                .map_err(swiftify_core::Error::from)?;
            let ctx = SessionContext::new(Arc::new(store))
                .with_estimator(swiftify_tracking::CostEstimator::from_config(&config.schema.pricing))
                .with_simulation_interval(config.schema.simulation.interval())
                .with_history_limit(config.schema.storage.history_limit);
            return Ok(Self {
                ctx,
                client: None,
                format,
            });
        }

        let client = match ClientConfig::from_env().and_then(SwiftifyClient::with_config) {
            Ok(client) => Some(client),
            Err(e) => {
                warn!(error = %e, "Backend client unavailable, continuing without it");
                None
            }
        };

        let backend = client
            .clone()
            .map(|c| Arc::new(c) as Arc<dyn ShipmentBackend>);
        let ctx = SessionContext::from_config(&config.schema, backend)
            .map_err(swiftify_core::Error::from)?;

        Ok(Self {
            ctx,
            client,
            format,
        })
    }

    pub fn json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    /// The backend client, or an error naming the command that needed it
    pub fn require_client(&self, command: &str) -> Result<&SwiftifyClient> {
        self.client.as_ref().ok_or_else(|| {
            swiftify_core::Error::backend_unavailable(format!("`{command}` needs the Swiftify backend"))
                .with_suggestion("Unset --offline and check SWIFTIFY_API_URL")
                .into()
        })
    }
}

/// Print `value` as pretty JSON on stdout
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{json}");
    Ok(())
}

/// Warn on stderr unless output is JSON
pub fn notice(app: &App, message: &str) {
    if !app.json() {
        Status::warning(message);
    }
}
