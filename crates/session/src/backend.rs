//! The backend operations the sessions depend on.
//!
//! [`SwiftifyClient`] is the production implementation; tests substitute
//! in-memory fakes.

use async_trait::async_trait;
use swiftify_api_client::{ApiResult, SwiftifyClient};
use swiftify_tracking::{ScheduleRequest, ShipmentRecord, ShipmentUpdate, TrackingId};

/// Remote shipment service
#[async_trait]
pub trait ShipmentBackend: Send + Sync {
    /// Schedule a shipment and return the ID the backend minted
    async fn schedule(&self, request: &ScheduleRequest) -> ApiResult<TrackingId>;

    async fn track(&self, id: &TrackingId) -> ApiResult<ShipmentRecord>;

    /// Exchange an operator key for a bearer token
    async fn login(&self, key: &str) -> ApiResult<String>;

    async fn parcels(&self, token: &str) -> ApiResult<Vec<ShipmentRecord>>;

    async fn update_parcel(
        &self,
        token: &str,
        id: &TrackingId,
        update: &ShipmentUpdate,
    ) -> ApiResult<ShipmentRecord>;
}

#[async_trait]
impl ShipmentBackend for SwiftifyClient {
    async fn schedule(&self, request: &ScheduleRequest) -> ApiResult<TrackingId> {
        Ok(self.shipments().schedule(request).await?.tracking_id)
    }

    async fn track(&self, id: &TrackingId) -> ApiResult<ShipmentRecord> {
        self.shipments().track(id).await
    }

    async fn login(&self, key: &str) -> ApiResult<String> {
        Ok(self.admin().login(key).await?.token)
    }

    async fn parcels(&self, token: &str) -> ApiResult<Vec<ShipmentRecord>> {
        self.with_bearer_token(token).admin().parcels().await
    }

    async fn update_parcel(
        &self,
        token: &str,
        id: &TrackingId,
        update: &ShipmentUpdate,
    ) -> ApiResult<ShipmentRecord> {
        self.with_bearer_token(token).admin().update_parcel(id, update).await
    }
}
