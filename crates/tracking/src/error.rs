//! Error types for the tracking crate.

use thiserror::Error;

/// Result type alias for tracking operations.
pub type Result<T> = std::result::Result<T, TrackingError>;

/// Errors that can occur in tracking operations.
#[derive(Debug, Error)]
pub enum TrackingError {
    /// Identifier does not match `SWIFT-[A-Z0-9]{8,12}`
    #[error("Invalid tracking ID: {0}")]
    InvalidTrackingId(String),

    /// Unknown shipment status label
    #[error("Unknown shipment status: {0}")]
    UnknownStatus(String),

    /// Simulator started outside a tokio runtime
    #[error("Parcel simulator requires a running tokio runtime")]
    NoRuntime,

    /// JSON encoding or decoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Error code for integration with swiftify-core error handling.
/// Range: 11xxx for tracking errors.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackingErrorCode {
    InvalidTrackingId = 11001,
    UnknownStatus = 11002,
    NoRuntime = 11003,
    Json = 11004,
}

impl TrackingError {
    /// Returns the error code for this error.
    pub fn code(&self) -> TrackingErrorCode {
        match self {
            TrackingError::InvalidTrackingId(_) => TrackingErrorCode::InvalidTrackingId,
            TrackingError::UnknownStatus(_) => TrackingErrorCode::UnknownStatus,
            TrackingError::NoRuntime => TrackingErrorCode::NoRuntime,
            TrackingError::Json(_) => TrackingErrorCode::Json,
        }
    }
}

impl From<TrackingError> for swiftify_core::Error {
    fn from(err: TrackingError) -> Self {
        match err {
            TrackingError::InvalidTrackingId(ref id) => swiftify_core::Error::invalid_tracking_id(id),
            other => swiftify_core::Error::new(swiftify_core::ErrorCode::Internal, other.to_string())
                .with_source(other),
        }
    }
}
