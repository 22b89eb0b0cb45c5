//! Configuration schema definitions
//!
//! Every section is optional in the file; missing keys take the defaults
//! below.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration schema
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigSchema {
    #[serde(default)]
    pub routing: RoutingConfig,

    #[serde(default)]
    pub geocoding: GeocodingConfig,

    #[serde(default)]
    pub pricing: PricingConfig,

    #[serde(default)]
    pub simulation: SimulationConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub telemetry: TelemetrySection,
}

/// Route resolution settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// Use the external routing service at all
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Base URL of an OSRM-compatible routing service
    #[serde(default = "default_osrm_url")]
    pub osrm_url: String,

    /// Interior waypoints in a synthesized straight-line route
    #[serde(default = "default_fallback_waypoints")]
    pub fallback_waypoints: usize,

    /// Upper bound on a single route lookup
    #[serde(default = "default_provider_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            osrm_url: default_osrm_url(),
            fallback_waypoints: default_fallback_waypoints(),
            timeout_secs: default_provider_timeout_secs(),
        }
    }
}

impl RoutingConfig {
    /// Lookup timeout as a `Duration`
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Address resolution settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodingConfig {
    /// Base URL of the public Nominatim instance
    #[serde(default = "default_nominatim_url")]
    pub nominatim_url: String,

    /// Google Maps API key, used only when `enable_google` is set
    #[serde(default)]
    pub google_api_key: Option<String>,

    /// Prefer Google geocoding when a key is present
    #[serde(default)]
    pub enable_google: bool,

    /// Upper bound on a single geocode lookup
    #[serde(default = "default_provider_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            nominatim_url: default_nominatim_url(),
            google_api_key: None,
            enable_google: false,
            timeout_secs: default_provider_timeout_secs(),
        }
    }
}

impl GeocodingConfig {
    /// Lookup timeout as a `Duration`
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Google geocoding is used only with both a key and the enable flag
    pub fn google_enabled(&self) -> bool {
        self.enable_google
            && self
                .google_api_key
                .as_deref()
                .is_some_and(|key| !key.trim().is_empty())
    }
}

/// Quote calculation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Flat cost before weight and distance multipliers
    #[serde(default = "default_base_cost")]
    pub base_cost: f64,

    /// Distance over which the distance multiplier grows by one
    #[serde(default = "default_distance_divisor_km")]
    pub distance_divisor_km: f64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            base_cost: default_base_cost(),
            distance_divisor_km: default_distance_divisor_km(),
        }
    }
}

/// Parcel movement simulation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Delay between simulated position updates
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
        }
    }
}

impl SimulationConfig {
    /// Tick interval as a `Duration`
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

/// Local shipment storage settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding persisted shipment records
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Number of tracked IDs remembered in the search history
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            history_limit: default_history_limit(),
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetrySection {
    /// Default filter when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for TelemetrySection {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_osrm_url() -> String {
    "https://router.project-osrm.org".to_string()
}

fn default_nominatim_url() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

fn default_fallback_waypoints() -> usize {
    5
}

fn default_provider_timeout_secs() -> u64 {
    8
}

fn default_base_cost() -> f64 {
    15.0
}

fn default_distance_divisor_km() -> f64 {
    100.0
}

fn default_interval_ms() -> u64 {
    10_000
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from(".data"))
        .join("swiftify")
}

fn default_history_limit() -> usize {
    10
}

fn default_log_level() -> String {
    "warn".to_string()
}
