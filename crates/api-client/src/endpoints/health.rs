//! Health check endpoint

use crate::client::SwiftifyClient;
use crate::error::ApiResult;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Health check API interface
#[derive(Clone)]
pub struct HealthApi {
    client: SwiftifyClient,
}

impl HealthApi {
    /// Create a new health API interface
    pub(crate) fn new(client: SwiftifyClient) -> Self {
        Self { client }
    }

    /// Check backend health
    ///
    /// GET /health
    pub async fn check(&self) -> ApiResult<HealthResponse> {
        self.client.get("health").await
    }

    /// Check health with timing information
    pub async fn check_timed(&self) -> ApiResult<(HealthResponse, Duration)> {
        self.client.timed_get("health").await
    }

    /// True if the backend answers its health check
    pub async fn is_available(&self) -> bool {
        self.check().await.is_ok()
    }
}

/// Health check response from the API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy", "ok")
    pub status: String,
    /// Timestamp of the health check
    #[serde(default)]
    pub timestamp: Option<String>,
    /// Optional backend integrations and whether they are configured
    #[serde(default)]
    pub services: Option<serde_json::Value>,
}
