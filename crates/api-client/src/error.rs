//! Error types for the API client

use thiserror::Error;

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// API client errors
#[derive(Error, Debug)]
pub enum ApiError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// API returned an error response
    #[error("API error ({status}): {message}")]
    ApiResponse {
        /// HTTP status code
        status: u16,
        /// Error message from API
        message: String,
    },

    /// Circuit breaker is open
    #[error("Circuit breaker is open - service temporarily unavailable")]
    CircuitOpen,

    /// Rate limited
    #[error("Rate limited - too many requests")]
    RateLimited,

    /// Admin endpoint called without a bearer token
    #[error("Not authenticated - log in as admin first")]
    Unauthenticated,

    /// All retry attempts exhausted
    #[error("All {attempts} retry attempts failed: {last_error}")]
    RetriesExhausted {
        /// Number of attempts made
        attempts: u32,
        /// Last error message
        last_error: String,
    },

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an API response error
    pub fn api_response(status: u16, message: impl Into<String>) -> Self {
        Self::ApiResponse {
            status,
            message: message.into(),
        }
    }

    /// Check if this error is retryable
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Request(e) => {
                // Retry on connection errors, timeouts
                e.is_connect() || e.is_timeout()
            }
            Self::ApiResponse { status, .. } => {
                // Retry on 5xx errors and 429 (rate limited)
                *status >= 500 || *status == 429
            }
            Self::CircuitOpen | Self::RateLimited | Self::Unauthenticated => false,
            Self::Config(_) | Self::Json(_) | Self::InvalidUrl(_) | Self::RetriesExhausted { .. } => {
                false
            }
        }
    }

    /// Check if this is a client error (4xx)
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::ApiResponse { status, .. } if (400..500).contains(status))
    }

    /// Check if this is a server error (5xx)
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::ApiResponse { status, .. } if *status >= 500)
    }

    /// The backend answered that the resource does not exist
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ApiResponse { status: 404, .. })
    }

    /// The backend rejected the credentials
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthenticated | Self::ApiResponse { status: 401 | 403, .. })
    }

    /// The backend could not be reached or did not answer usefully
    ///
    /// Callers with a local fallback use this to decide whether to take it.
    #[must_use]
    pub fn is_unavailable(&self) -> bool {
        match self {
            Self::Request(_) | Self::CircuitOpen | Self::RateLimited | Self::RetriesExhausted { .. } => true,
            Self::ApiResponse { .. } => self.is_server_error(),
            _ => false,
        }
    }
}

impl From<ApiError> for swiftify_core::Error {
    fn from(err: ApiError) -> Self {
        use swiftify_core::ErrorCode;

        let code = if err.is_unauthorized() {
            ErrorCode::ValidationError
        } else if err.is_unavailable() {
            ErrorCode::BackendUnavailable
        } else if matches!(err, ApiError::Config(_) | ApiError::InvalidUrl(_)) {
            ErrorCode::ConfigError
        } else {
            ErrorCode::NetworkError
        };
        swiftify_core::Error::new(code, err.to_string()).with_source(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        let not_found = ApiError::api_response(404, "Tracking ID not found");
        assert!(not_found.is_not_found());
        assert!(not_found.is_client_error());
        assert!(!not_found.is_retryable());
        assert!(!not_found.is_unavailable());

        let server = ApiError::api_response(503, "down");
        assert!(server.is_server_error());
        assert!(server.is_retryable());
        assert!(server.is_unavailable());

        assert!(ApiError::api_response(429, "slow down").is_retryable());
        assert!(ApiError::api_response(401, "Invalid token").is_unauthorized());
        assert!(ApiError::Unauthenticated.is_unauthorized());
        assert!(ApiError::CircuitOpen.is_unavailable());
    }

    #[test]
    fn test_into_core_error() {
        let err: swiftify_core::Error = ApiError::CircuitOpen.into();
        assert_eq!(err.code, swiftify_core::ErrorCode::BackendUnavailable);

        let err: swiftify_core::Error = ApiError::config("bad").into();
        assert_eq!(err.code, swiftify_core::ErrorCode::ConfigError);
    }
}
