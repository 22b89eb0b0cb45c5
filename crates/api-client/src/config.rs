//! Configuration for the Swiftify API client
//!
//! Supports environment-based configuration with sensible defaults.

use crate::error::{ApiError, ApiResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use swiftify_core::rate_limit::RateLimitConfig;
use swiftify_core::retry::RetryConfig;

/// Default backend URL for a locally running API
const DEFAULT_API_URL: &str = "http://localhost:8000/api";

/// Environment types
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development against a backend on localhost
    #[default]
    Development,
    /// Staging environment
    Staging,
    /// Production environment
    Production,
}

impl Environment {
    /// Parse from the `SWIFTIFY_ENV` environment variable
    pub fn from_env() -> Self {
        Self::parse(&env::var("SWIFTIFY_ENV").unwrap_or_default())
    }

    fn parse(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "staging" | "stage" => Self::Staging,
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }
}

/// Client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the backend REST API, including the `/api` prefix
    pub base_url: String,
    /// Bearer token for admin endpoints, if already issued
    pub admin_token: Option<String>,
    /// Request timeout
    #[serde(with = "duration_secs")]
    pub timeout: Duration,
    /// Retry configuration
    pub retry: RetryConfig,
    /// Rate limit configuration
    pub rate_limit: RateLimitConfig,
    /// Current environment
    pub environment: Environment,
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::for_environment(Environment::Development)
    }
}

impl ClientConfig {
    /// Create configuration from environment variables
    ///
    /// Reads the following environment variables:
    /// - `SWIFTIFY_API_URL`: Base URL of the backend API
    /// - `SWIFTIFY_ENV`: Environment (development/staging/production)
    /// - `SWIFTIFY_TIMEOUT_SECS`: Request timeout in seconds
    /// - `SWIFTIFY_ADMIN_TOKEN`: Bearer token for admin endpoints
    pub fn from_env() -> ApiResult<Self> {
        let mut config = Self::for_environment(Environment::from_env());

        if let Ok(url) = env::var("SWIFTIFY_API_URL") {
            config.base_url = url;
        }

        if let Ok(raw) = env::var("SWIFTIFY_TIMEOUT_SECS") {
            let secs: u64 = raw
                .parse()
                .map_err(|_| ApiError::config(format!("SWIFTIFY_TIMEOUT_SECS is not a number: {raw}")))?;
            config.timeout = Duration::from_secs(secs);
        }

        config.admin_token = env::var("SWIFTIFY_ADMIN_TOKEN").ok().filter(|t| !t.is_empty());

        config.validate()?;
        Ok(config)
    }

    /// Presets for an environment
    ///
    /// Development retries quickly and is lenient on rate limits; production
    /// retries patiently and is stricter.
    #[must_use]
    pub fn for_environment(environment: Environment) -> Self {
        let (timeout, retry, rate_limit) = match environment {
            Environment::Development => (
                Duration::from_secs(10),
                RetryConfig::quick(),
                RateLimitConfig::per_minute(1000),
            ),
            Environment::Staging => (
                Duration::from_secs(30),
                RetryConfig::default(),
                RateLimitConfig::per_minute(200),
            ),
            Environment::Production => (
                Duration::from_secs(30),
                RetryConfig::patient(),
                RateLimitConfig::per_minute(100),
            ),
        };

        Self {
            base_url: DEFAULT_API_URL.to_string(),
            admin_token: None,
            timeout,
            retry,
            rate_limit,
            environment,
        }
    }

    /// Builder-style method to set base URL
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Builder-style method to set the admin bearer token
    #[must_use]
    pub fn with_admin_token(mut self, token: impl Into<String>) -> Self {
        self.admin_token = Some(token.into());
        self
    }

    /// Builder-style method to set timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builder-style method to set retry config
    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Builder-style method to set rate limit config
    #[must_use]
    pub fn with_rate_limit(mut self, rate_limit: RateLimitConfig) -> Self {
        self.rate_limit = rate_limit;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> ApiResult<()> {
        if self.base_url.is_empty() {
            return Err(ApiError::config("base_url cannot be empty"));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ApiError::InvalidUrl(format!(
                "{} (must start with http:// or https://)",
                self.base_url
            )));
        }

        if self.timeout.is_zero() {
            return Err(ApiError::config("timeout cannot be zero"));
        }

        if self.retry.max_attempts == 0 {
            return Err(ApiError::config("retry.max_attempts must be at least 1"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:8000/api");
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert!(config.admin_token.is_none());
    }

    #[test]
    fn test_environment_presets() {
        let production = ClientConfig::for_environment(Environment::Production);
        assert_eq!(production.retry.max_attempts, RetryConfig::patient().max_attempts);
        assert_eq!(production.rate_limit.max_requests, 100);

        let staging = ClientConfig::for_environment(Environment::Staging);
        assert_eq!(staging.rate_limit.max_requests, 200);
    }

    #[test]
    fn test_environment_parse() {
        assert_eq!(Environment::parse("PROD"), Environment::Production);
        assert_eq!(Environment::parse("stage"), Environment::Staging);
        assert_eq!(Environment::parse(""), Environment::Development);
        assert_eq!(Environment::parse("local"), Environment::Development);
    }

    #[test]
    fn test_builder_pattern() {
        let config = ClientConfig::default()
            .with_base_url("https://api.swiftify.example/api")
            .with_admin_token("token-123")
            .with_timeout(Duration::from_secs(60));

        assert_eq!(config.base_url, "https://api.swiftify.example/api");
        assert_eq!(config.admin_token.as_deref(), Some("token-123"));
        assert_eq!(config.timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_validation() {
        assert!(ClientConfig::default().validate().is_ok());

        let empty = ClientConfig::default().with_base_url("");
        assert!(matches!(empty.validate(), Err(ApiError::Config(_))));

        let scheme = ClientConfig::default().with_base_url("ftp://example.com");
        assert!(matches!(scheme.validate(), Err(ApiError::InvalidUrl(_))));

        let zero = ClientConfig::default().with_timeout(Duration::ZERO);
        assert!(zero.validate().is_err());

        let no_attempts = ClientConfig::default().with_retry(RetryConfig {
            max_attempts: 0,
            ..RetryConfig::no_retry()
        });
        assert!(no_attempts.validate().is_err());
    }
}
