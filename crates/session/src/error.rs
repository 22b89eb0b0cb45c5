//! Error types for the session crate.

use swiftify_api_client::ApiError;
use swiftify_tracking::TrackingError;
use thiserror::Error;

/// Result type alias for session operations.
pub type Result<T> = std::result::Result<T, SessionError>;

/// Which end of a shipment an address belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressRole {
    Sender,
    Receiver,
}

impl std::fmt::Display for AddressRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            AddressRole::Sender => "sender",
            AddressRole::Receiver => "receiver",
        })
    }
}

/// Errors surfaced by the scheduling, tracking and admin sessions.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Tracking ID rejected before any lookup
    #[error(transparent)]
    Tracking(#[from] TrackingError),

    /// No geocoding backend could place an address
    #[error("Could not locate {role} address: {address}")]
    AddressUnresolved { role: AddressRole, address: String },

    /// Backend answered with an error that has no local fallback
    #[error(transparent)]
    Backend(#[from] ApiError),

    /// Admin operation attempted without a backend
    #[error("Admin operations need a reachable backend")]
    BackendRequired,

    /// No record with this ID
    #[error("Shipment not found: {0}")]
    NotFound(String),

    /// Local store I/O failure
    #[error("Local store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Local store held unreadable JSON
    #[error("Local store JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Error code for integration with swiftify-core error handling.
/// Range: 13xxx for session errors.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionErrorCode {
    Tracking = 13001,
    AddressUnresolved = 13002,
    Backend = 13003,
    BackendRequired = 13004,
    NotFound = 13005,
    Io = 13006,
    Json = 13007,
}

impl SessionError {
    /// Returns the error code for this error.
    pub fn code(&self) -> SessionErrorCode {
        match self {
            SessionError::Tracking(_) => SessionErrorCode::Tracking,
            SessionError::AddressUnresolved { .. } => SessionErrorCode::AddressUnresolved,
            SessionError::Backend(_) => SessionErrorCode::Backend,
            SessionError::BackendRequired => SessionErrorCode::BackendRequired,
            SessionError::NotFound(_) => SessionErrorCode::NotFound,
            SessionError::Io(_) => SessionErrorCode::Io,
            SessionError::Json(_) => SessionErrorCode::Json,
        }
    }
}

impl From<SessionError> for swiftify_core::Error {
    fn from(err: SessionError) -> Self {
        use swiftify_core::ErrorCode;

        match err {
            SessionError::Tracking(e) => e.into(),
            SessionError::Backend(e) => e.into(),
            SessionError::AddressUnresolved { .. } => {
                swiftify_core::Error::new(ErrorCode::ValidationError, err.to_string())
                    .with_suggestion("Enter the coordinates manually or refine the address")
            }
            SessionError::BackendRequired => {
                swiftify_core::Error::new(ErrorCode::BackendUnavailable, err.to_string())
                    .with_suggestion("Set SWIFTIFY_API_URL to a running backend")
            }
            SessionError::NotFound(_) => {
                swiftify_core::Error::new(ErrorCode::InvalidInput, err.to_string())
            }
            SessionError::Io(_) | SessionError::Json(_) => {
                swiftify_core::Error::new(ErrorCode::IoError, err.to_string()).with_source(err)
            }
        }
    }
}
