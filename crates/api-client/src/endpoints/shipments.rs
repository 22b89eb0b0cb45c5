//! Shipment scheduling and tracking endpoints

use crate::client::SwiftifyClient;
use crate::error::ApiResult;
use serde::{Deserialize, Serialize};
use swiftify_tracking::{ScheduleRequest, ShipmentRecord, TrackingId};

/// Shipments API interface
#[derive(Clone)]
pub struct ShipmentsApi {
    client: SwiftifyClient,
}

impl ShipmentsApi {
    /// Create a new shipments API interface
    pub(crate) fn new(client: SwiftifyClient) -> Self {
        Self { client }
    }

    /// Schedule a new delivery
    ///
    /// POST /schedule
    pub async fn schedule(&self, request: &ScheduleRequest) -> ApiResult<ScheduleResponse> {
        self.client.post("schedule", request).await
    }

    /// Fetch the tracking record for a shipment
    ///
    /// GET /track/{id}
    pub async fn track(&self, id: &TrackingId) -> ApiResult<ShipmentRecord> {
        self.client.get(&format!("track/{id}")).await
    }
}

/// Response to a scheduling request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleResponse {
    /// Identifier minted by the backend
    pub tracking_id: TrackingId,
}
