//! Configuration file loading

use super::schema::ConfigSchema;
use crate::error::{Error, ErrorCode, Result};
use std::env;
use std::path::Path;

/// Configuration wrapper
#[derive(Debug, Clone)]
pub struct Config {
    pub schema: ConfigSchema,
    pub path: Option<String>,
}

impl Config {
    /// Load configuration from a file path or use defaults
    ///
    /// An explicit path that does not exist is an error; when no path is
    /// given the standard locations are searched and defaults are used if
    /// none exists. Environment overrides are applied last.
    pub fn load(path: Option<&str>) -> Result<Self> {
        if let Some(p) = path {
            if !Path::new(p).exists() {
                return Err(Error::config_not_found(p));
            }
        }

        let config_path = path.map(String::from).or_else(find_config_file);

        let mut schema = if let Some(ref p) = config_path {
            load_config_file(p)?
        } else {
            ConfigSchema::default()
        };

        apply_env_overrides(&mut schema);
        validate(&schema)?;

        Ok(Self {
            schema,
            path: config_path,
        })
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        let schema: ConfigSchema = toml::from_str(content)?;
        validate(&schema)?;
        Ok(Self { schema, path: None })
    }

    /// Load with defaults only (no file)
    pub fn default() -> Self {
        Self {
            schema: ConfigSchema::default(),
            path: None,
        }
    }
}

/// Find configuration file in standard locations
fn find_config_file() -> Option<String> {
    let candidates = ["swiftify.toml", ".swiftify.toml", ".config/swiftify.toml"];

    for candidate in candidates {
        if Path::new(candidate).exists() {
            return Some(candidate.to_string());
        }
    }

    None
}

/// Load and parse a TOML configuration file
fn load_config_file(path: &str) -> Result<ConfigSchema> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::new(
            ErrorCode::ConfigError,
            format!("Failed to read config file {}: {}", path, e),
        )
        .with_source(e)
    })?;

    toml::from_str(&content).map_err(|e| {
        Error::new(
            ErrorCode::ConfigParseError,
            format!("Failed to parse config file {}: {}", path, e),
        )
        .with_source(e)
    })
}

/// Environment variables take precedence over the file
fn apply_env_overrides(schema: &mut ConfigSchema) {
    if let Ok(key) = env::var("GOOGLE_MAPS_API_KEY") {
        schema.geocoding.google_api_key = Some(key);
    }
    if let Ok(flag) = env::var("ENABLE_GOOGLE_MAPS") {
        schema.geocoding.enable_google = flag.eq_ignore_ascii_case("true");
    }
    if let Ok(url) = env::var("SWIFTIFY_OSRM_URL") {
        schema.routing.osrm_url = url;
    }
    if let Ok(url) = env::var("SWIFTIFY_NOMINATIM_URL") {
        schema.geocoding.nominatim_url = url;
    }
    if let Ok(dir) = env::var("SWIFTIFY_DATA_DIR") {
        schema.storage.data_dir = dir.into();
    }
}

fn validate(schema: &ConfigSchema) -> Result<()> {
    if schema.simulation.interval_ms == 0 {
        return Err(Error::invalid_config_value(
            "simulation.interval_ms",
            "must be greater than zero",
        ));
    }
    if schema.routing.timeout_secs == 0 || schema.geocoding.timeout_secs == 0 {
        return Err(Error::invalid_config_value(
            "timeout_secs",
            "provider timeouts must be greater than zero",
        ));
    }
    if !(schema.pricing.base_cost >= 0.0) {
        return Err(Error::invalid_config_value(
            "pricing.base_cost",
            "must be a non-negative number",
        ));
    }
    if !(schema.pricing.distance_divisor_km > 0.0) {
        return Err(Error::invalid_config_value(
            "pricing.distance_divisor_km",
            "must be a positive number",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.path.is_none());
        assert_eq!(config.schema.routing.fallback_waypoints, 5);
        assert_eq!(config.schema.simulation.interval_ms, 10_000);
        assert_eq!(config.schema.pricing.base_cost, 15.0);
    }

    #[test]
    fn test_config_from_partial_toml() {
        let config = Config::from_toml(
            r#"
            [routing]
            fallback_waypoints = 8

            [simulation]
            interval_ms = 250
            "#,
        )
        .unwrap();

        assert_eq!(config.schema.routing.fallback_waypoints, 8);
        assert!(config.schema.routing.enabled);
        assert_eq!(config.schema.simulation.interval_ms, 250);
        assert_eq!(config.schema.storage.history_limit, 10);
    }

    #[test]
    fn test_config_rejects_zero_interval() {
        let err = Config::from_toml("[simulation]\ninterval_ms = 0\n").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidConfigValue);
    }

    #[test]
    fn test_config_explicit_missing_file() {
        let err = Config::load(Some("/definitely/not/here/swiftify.toml")).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigNotFound);
    }

    #[test]
    fn test_config_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("swiftify.toml");
        std::fs::write(&path, "[pricing]\nbase_cost = 20.0\n").unwrap();

        let config = Config::load(path.to_str()).unwrap();
        assert_eq!(config.schema.pricing.base_cost, 20.0);
        assert_eq!(config.path.as_deref(), path.to_str());
    }

    #[test]
    fn test_google_requires_key_and_flag() {
        let mut config = Config::default();
        config.schema.geocoding.enable_google = true;
        assert!(!config.schema.geocoding.google_enabled());

        config.schema.geocoding.google_api_key = Some("key".to_string());
        assert!(config.schema.geocoding.google_enabled());

        config.schema.geocoding.enable_google = false;
        assert!(!config.schema.geocoding.google_enabled());
    }
}
