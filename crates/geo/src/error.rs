//! Error types for the geo crate.

use thiserror::Error;

/// Result type alias for geo operations.
pub type Result<T> = std::result::Result<T, GeoError>;

/// Errors that can occur during geo operations.
#[derive(Debug, Error)]
pub enum GeoError {
    /// Malformed GeoJSON geometry
    #[error("Invalid GeoJSON: {0}")]
    InvalidGeoJson(String),

    /// Invalid coordinate values
    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    /// Route has fewer than two points
    #[error("Degenerate route: {0}")]
    DegenerateRoute(String),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Error code for integration with swiftify-core error handling.
/// Range: 10xxx for geo errors.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeoErrorCode {
    /// Malformed GeoJSON geometry
    InvalidGeoJson = 10001,
    /// Invalid coordinate values
    InvalidCoordinate = 10002,
    /// JSON parsing error
    JsonParsing = 10003,
    /// Route has fewer than two points
    DegenerateRoute = 10004,
}

impl GeoError {
    /// Returns the error code for this error.
    pub fn code(&self) -> GeoErrorCode {
        match self {
            GeoError::InvalidGeoJson(_) => GeoErrorCode::InvalidGeoJson,
            GeoError::InvalidCoordinate(_) => GeoErrorCode::InvalidCoordinate,
            GeoError::DegenerateRoute(_) => GeoErrorCode::DegenerateRoute,
            GeoError::JsonError(_) => GeoErrorCode::JsonParsing,
        }
    }
}
