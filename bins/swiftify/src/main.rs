//! Swiftify CLI
//!
//! Quote, schedule and track parcel deliveries. Works against the Swiftify
//! backend when it is reachable and falls back to local data when it is not.

use clap::{Args, Parser, Subcommand, ValueEnum};
use owo_colors::OwoColorize;
use std::path::PathBuf;
use std::process::ExitCode;
use swiftify_core::config::Config;
use swiftify_core::error::exit_codes;
use swiftify_geo::Coordinate;
use swiftify_telemetry::TelemetryConfig;
use swiftify_tracking::{ShipmentStatus, TrackingMode};

mod app;
mod commands;

use app::App;
use commands::{admin, contact, geocode, health, history, id, quote, route, schedule, track};

/// Parcel delivery quotes, scheduling and live tracking
#[derive(Parser)]
#[command(name = "swiftify")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Path to swiftify.toml (searched in the working directory by default)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Do not contact routing, geocoding or backend services
    #[arg(long, global = true)]
    offline: bool,

    /// Print collected metrics after the command
    #[arg(long, global = true)]
    metrics: bool,

    #[command(subcommand)]
    command: Commands,
}

/// How results are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Price a delivery between two addresses or coordinates
    Quote {
        #[command(flatten)]
        endpoints: Endpoints,

        /// Weight class (<1kg, 1-5kg, 5-10kg, 10-20kg, 20kg+)
        #[arg(short, long, default_value = "1-5kg")]
        weight: String,
    },

    /// Resolve a route between two addresses or coordinates
    Route {
        #[command(flatten)]
        endpoints: Endpoints,

        /// Print every route point
        #[arg(long)]
        points: bool,
    },

    /// Look up the coordinates of an address
    Geocode {
        /// Free-text address
        address: String,
    },

    /// Generate or validate tracking IDs
    Id {
        #[command(subcommand)]
        action: IdAction,
    },

    /// Track a shipment
    Track {
        /// Tracking ID (SWIFT-XXXXXXXX)
        id: String,

        /// Keep following the parcel while it moves
        #[arg(long)]
        follow: bool,

        /// Simulation tick in milliseconds (overrides the config)
        #[arg(long)]
        interval_ms: Option<u64>,
    },

    /// Schedule a delivery from a JSON request file
    Schedule {
        /// File holding {"sender", "receiver", "parcelDetails"}
        request: PathBuf,
    },

    /// Show or clear recently tracked IDs
    History {
        /// Forget the search history
        #[arg(long)]
        clear: bool,
    },

    /// Operator commands (require the backend)
    Admin {
        /// Operator key
        #[arg(long, env = "SWIFTIFY_ADMIN_KEY", hide_env_values = true)]
        key: String,

        #[command(subcommand)]
        action: AdminAction,
    },

    /// Send a message through the contact form
    Contact {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        message: String,
    },

    /// Check backend health
    Health,
}

/// Two ends of a delivery. Addresses are geocoded; coordinates are used as-is.
#[derive(Args)]
struct Endpoints {
    /// Pickup address
    #[arg(long, required_unless_present = "origin", conflicts_with = "origin")]
    from: Option<String>,

    /// Delivery address
    #[arg(long, required_unless_present = "destination", conflicts_with = "destination")]
    to: Option<String>,

    /// Pickup coordinate as LAT,LNG
    #[arg(long, value_parser = parse_coordinate, allow_hyphen_values = true)]
    origin: Option<Coordinate>,

    /// Delivery coordinate as LAT,LNG
    #[arg(long, value_parser = parse_coordinate, allow_hyphen_values = true)]
    destination: Option<Coordinate>,
}

#[derive(Subcommand)]
enum IdAction {
    /// Mint new tracking IDs
    Generate {
        /// How many to generate
        #[arg(short = 'n', long, default_value = "1")]
        count: usize,
    },

    /// Check whether an ID is well formed
    Validate {
        id: String,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Dashboard counts
    Stats,

    /// List all shipments
    List,

    /// Update one shipment
    Update {
        id: String,

        #[arg(long, value_parser = parse_status)]
        status: Option<ShipmentStatus>,

        #[arg(long, value_parser = parse_mode)]
        mode: Option<TrackingMode>,

        /// Recorded with the status change
        #[arg(long, requires = "status")]
        notes: Option<String>,
    },
}

fn parse_coordinate(raw: &str) -> Result<Coordinate, String> {
    let (lat, lng) = raw
        .split_once(',')
        .ok_or_else(|| format!("expected LAT,LNG, got '{raw}'"))?;
    let lat: f64 = lat.trim().parse().map_err(|_| format!("bad latitude '{lat}'"))?;
    let lng: f64 = lng.trim().parse().map_err(|_| format!("bad longitude '{lng}'"))?;
    Coordinate::try_new(lat, lng).map_err(|e| e.to_string())
}

fn parse_status(raw: &str) -> Result<ShipmentStatus, String> {
    raw.parse().map_err(|e: swiftify_tracking::TrackingError| e.to_string())
}

fn parse_mode(raw: &str) -> Result<TrackingMode, String> {
    raw.parse().map_err(|e: swiftify_tracking::TrackingError| e.to_string())
}

/// Exit code for a failed command, by error category
fn exit_code_for(err: &anyhow::Error) -> u8 {
    let code = match err.downcast_ref::<swiftify_core::Error>() {
        Some(core) => match core.code.category() {
            "Validation" => exit_codes::VALIDATION_ERROR,
            "Configuration" => exit_codes::CONFIG_ERROR,
            "Network" => exit_codes::NETWORK_ERROR,
            _ => exit_codes::FAILURE,
        },
        None => exit_codes::FAILURE,
    };
    u8::try_from(code).unwrap_or(1)
}

fn init_telemetry(verbose: bool, configured: Option<&str>) {
    let level = if verbose { "debug" } else { configured.unwrap_or("warn") };
    if let Err(e) = swiftify_telemetry::init_with_config(TelemetryConfig::with_level(level)) {
        eprintln!("{} {}", "Warning:".yellow(), e);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // `id` needs neither config nor services
    if let Commands::Id { action } = &cli.command {
        init_telemetry(cli.verbose, None);
        return match action {
            IdAction::Generate { count } => id::generate(*count, cli.format),
            IdAction::Validate { id: raw } => id::validate(raw, cli.format),
        };
    }

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            init_telemetry(cli.verbose, None);
            return Err(e.into());
        }
    };
    init_telemetry(cli.verbose, Some(&config.schema.telemetry.log_level));

    let app = App::build(config, cli.offline, cli.format)?;

    match cli.command {
        Commands::Quote { endpoints, weight } => {
            quote::run(&app, endpoints.into_request(), &weight).await
        }
        Commands::Route { endpoints, points } => {
            route::run(&app, endpoints.into_request(), points).await
        }
        Commands::Geocode { address } => geocode::run(&app, &address).await,
        Commands::Id { .. } => Ok(()),
        Commands::Track { id, follow, interval_ms } => {
            track::run(&app, &id, follow, interval_ms).await
        }
        Commands::Schedule { request } => schedule::run(&app, &request).await,
        Commands::History { clear } => history::run(&app, clear),
        Commands::Admin { key, action } => match action {
            AdminAction::Stats => admin::stats(&app, &key).await,
            AdminAction::List => admin::list(&app, &key).await,
            AdminAction::Update { id, status, mode, notes } => {
                admin::update(&app, &key, &id, status, mode, notes).await
            }
        },
        Commands::Contact { name, email, message } => {
            contact::run(&app, name, email, message).await
        }
        Commands::Health => health::run(&app).await,
    }
}

impl Endpoints {
    fn into_request(self) -> commands::EndpointRequest {
        commands::EndpointRequest {
            from: self.from,
            to: self.to,
            origin: self.origin,
            destination: self.destination,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let show_metrics = cli.metrics;
    let result = run(cli).await;

    if show_metrics {
        let snapshot = swiftify_telemetry::metrics().export_json();
        match serde_json::to_string_pretty(&snapshot) {
            Ok(json) => eprintln!("{json}"),
            Err(e) => eprintln!("{} {}", "Warning:".yellow(), e),
        }
    }

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            ExitCode::from(exit_code_for(&e))
        }
    }
}
