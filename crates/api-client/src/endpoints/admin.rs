//! Admin endpoints
//!
//! Login exchanges an operator key for a bearer token; every other call
//! needs a client carrying that token (see [`SwiftifyClient::with_bearer_token`]).

use crate::client::SwiftifyClient;
use crate::error::{ApiError, ApiResult};
use serde::{Deserialize, Serialize};
use swiftify_tracking::{ShipmentRecord, ShipmentUpdate, TrackingId};

/// Admin API interface
#[derive(Clone)]
pub struct AdminApi {
    client: SwiftifyClient,
}

impl AdminApi {
    /// Create a new admin API interface
    pub(crate) fn new(client: SwiftifyClient) -> Self {
        Self { client }
    }

    /// Exchange an operator key for a bearer token
    ///
    /// POST /admin/login
    pub async fn login(&self, key: &str) -> ApiResult<LoginResponse> {
        self.client.post("admin/login", &LoginRequest { key }).await
    }

    /// List every shipment
    ///
    /// GET /admin/parcels
    pub async fn parcels(&self) -> ApiResult<Vec<ShipmentRecord>> {
        self.require_token()?;
        self.client.get("admin/parcels").await
    }

    /// Apply a partial update to one shipment and return the stored result
    ///
    /// PATCH /admin/parcel/{id}
    pub async fn update_parcel(
        &self,
        id: &TrackingId,
        update: &ShipmentUpdate,
    ) -> ApiResult<ShipmentRecord> {
        self.require_token()?;
        self.client.patch(&format!("admin/parcel/{id}"), update).await
    }

    fn require_token(&self) -> ApiResult<()> {
        if self.client.is_authenticated() {
            Ok(())
        } else {
            Err(ApiError::Unauthenticated)
        }
    }
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    key: &'a str,
}

/// Token issued by a successful login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Bearer token for admin endpoints
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ClientConfig;

    #[test]
    fn test_admin_calls_require_token() {
        let client = SwiftifyClient::with_config(ClientConfig::default()).unwrap();
        let err = tokio_test::block_on(client.admin().parcels()).unwrap_err();
        assert!(matches!(err, ApiError::Unauthenticated));
    }

    #[test]
    fn test_login_request_shape() {
        let body = serde_json::to_value(LoginRequest { key: "k" }).unwrap();
        assert_eq!(body, serde_json::json!({"key": "k"}));
    }
}
