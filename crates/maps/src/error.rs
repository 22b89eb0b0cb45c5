//! Error types for the maps crate.
//!
//! These never leave [`RouteProvider`](crate::RouteProvider) or
//! [`GeocodeProvider`](crate::GeocodeProvider); backends return them and the
//! providers turn them into fallback or unresolved results.

use thiserror::Error;

/// Result type alias for backend calls.
pub type Result<T> = std::result::Result<T, ProviderError>;

/// Errors raised by routing and geocoding backends.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Backend answered with a non-success status
    #[error("{backend} returned HTTP {status}")]
    Status {
        /// Backend name
        backend: &'static str,
        /// HTTP status code
        status: u16,
    },

    /// Backend asked us to slow down, or the local limiter refused
    #[error("{0} rate limit reached")]
    RateLimited(&'static str),

    /// Response body did not have the expected shape
    #[error("Malformed response: {0}")]
    Malformed(String),

    /// Route geometry could not be parsed
    #[error(transparent)]
    Geo(#[from] swiftify_geo::GeoError),

    /// Backend did not answer within the configured timeout
    #[error("{backend} timed out after {millis}ms")]
    Timeout {
        /// Backend name
        backend: &'static str,
        /// Timeout that elapsed
        millis: u128,
    },

    /// Backend is disabled or lacks credentials
    #[error("{0} is not configured")]
    NotConfigured(&'static str),
}

/// Error code for integration with swiftify-core error handling.
/// Range: 12xxx for maps errors.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorCode {
    Request = 12001,
    Status = 12002,
    RateLimited = 12003,
    Malformed = 12004,
    Geometry = 12005,
    Timeout = 12006,
    NotConfigured = 12007,
}

impl ProviderError {
    /// Returns the error code for this error.
    pub fn code(&self) -> ProviderErrorCode {
        match self {
            ProviderError::Request(_) => ProviderErrorCode::Request,
            ProviderError::Status { .. } => ProviderErrorCode::Status,
            ProviderError::RateLimited(_) => ProviderErrorCode::RateLimited,
            ProviderError::Malformed(_) => ProviderErrorCode::Malformed,
            ProviderError::Geo(_) => ProviderErrorCode::Geometry,
            ProviderError::Timeout { .. } => ProviderErrorCode::Timeout,
            ProviderError::NotConfigured(_) => ProviderErrorCode::NotConfigured,
        }
    }

    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        ProviderError::Malformed(msg.into())
    }
}
