//! Operator workflow: list shipments, update them, summarize.

use crate::backend::ShipmentBackend;
use crate::context::SessionContext;
use crate::error::{Result, SessionError};
use chrono::Utc;
use std::sync::Arc;
use swiftify_tracking::{ShipmentRecord, ShipmentStats, ShipmentUpdate, TrackingId};
use tracing::{info, warn};

/// An authenticated operator session
///
/// Obtained from [`SessionContext::admin_login`]. The bearer token lives only
/// as long as this value.
pub struct AdminSession {
    ctx: SessionContext,
    backend: Arc<dyn ShipmentBackend>,
    token: String,
}

impl AdminSession {
    pub(crate) fn new(ctx: SessionContext, backend: Arc<dyn ShipmentBackend>, token: String) -> Self {
        Self { ctx, backend, token }
    }

    /// Every shipment the backend knows about
    pub async fn list(&self) -> Result<Vec<ShipmentRecord>> {
        Ok(self.backend.parcels(&self.token).await?)
    }

    /// Apply a partial update and return the record as stored by the backend
    ///
    /// A copy held in the local store gets the same update applied so that
    /// offline tracking stays consistent.
    pub async fn update(&self, id: &TrackingId, update: &ShipmentUpdate) -> Result<ShipmentRecord> {
        let updated = match self.backend.update_parcel(&self.token, id, update).await {
            Ok(record) => record,
            Err(e) if e.is_not_found() => return Err(SessionError::NotFound(id.to_string())),
            Err(e) => return Err(e.into()),
        };
        info!(id = %id, status = %updated.status, "Shipment updated");

        match self.ctx.store().load(id) {
            Ok(Some(mut local)) => {
                local.apply_update(update, Utc::now());
                if let Err(e) = self.ctx.store().save(&local) {
                    warn!(id = %id, error = %e, "Could not update local copy");
                }
            }
            Ok(None) => {}
            Err(e) => warn!(id = %id, error = %e, "Could not read local copy"),
        }

        Ok(updated)
    }

    /// Dashboard counts over every shipment
    pub async fn stats(&self) -> Result<ShipmentStats> {
        let records = self.list().await?;
        Ok(ShipmentStats::from_records(&records))
    }
}

impl std::fmt::Debug for AdminSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminSession").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{in_transit_record, FakeBackend, ADMIN_KEY};
    use swiftify_tracking::{ShipmentStatus, TrackingMode};

    fn records() -> Vec<ShipmentRecord> {
        let mut delivered = in_transit_record("SWIFT-ADMIN003", 100.0);
        delivered.status = ShipmentStatus::Delivered;
        let mut out = in_transit_record("SWIFT-ADMIN004", 90.0);
        out.status = ShipmentStatus::OutForDelivery;
        let mut pending = in_transit_record("SWIFT-ADMIN005", 0.0);
        pending.status = ShipmentStatus::Pending;
        vec![
            in_transit_record("SWIFT-ADMIN001", 0.0),
            in_transit_record("SWIFT-ADMIN002", 40.0),
            delivered,
            out,
            pending,
        ]
    }

    #[tokio::test]
    async fn test_login_requires_backend() {
        let err = SessionContext::in_memory().admin_login(ADMIN_KEY).await.unwrap_err();
        assert!(matches!(err, SessionError::BackendRequired));
    }

    #[tokio::test]
    async fn test_login_rejects_wrong_key() {
        let ctx = SessionContext::in_memory().with_backend(Arc::new(FakeBackend::default()));
        let err = ctx.admin_login("guess").await.unwrap_err();
        match err {
            SessionError::Backend(api) => assert!(api.is_unauthorized()),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_stats() {
        let ctx = SessionContext::in_memory().with_backend(Arc::new(FakeBackend::with_records(records())));
        let admin = ctx.admin_login(ADMIN_KEY).await.unwrap();

        let stats = admin.stats().await.unwrap();
        assert_eq!(stats.total, 5);
        assert_eq!(stats.delivered, 1);
        assert_eq!(stats.in_transit, 3);
        assert_eq!(stats.pending, 1);
    }

    #[tokio::test]
    async fn test_update_applies_remotely_and_locally() {
        let ctx = SessionContext::in_memory().with_backend(Arc::new(FakeBackend::with_records(records())));
        let id = TrackingId::parse("SWIFT-ADMIN001").unwrap();
        ctx.store().save(&in_transit_record("SWIFT-ADMIN001", 0.0)).unwrap();
        let admin = ctx.admin_login(ADMIN_KEY).await.unwrap();

        let update = ShipmentUpdate {
            status: Some(ShipmentStatus::AtHub),
            mode: Some(TrackingMode::Manual),
            ..ShipmentUpdate::default()
        };
        let updated = admin.update(&id, &update).await.unwrap();
        assert_eq!(updated.status, ShipmentStatus::AtHub);
        assert_eq!(updated.progress, 80.0);

        let local = ctx.store().load(&id).unwrap().unwrap();
        assert_eq!(local.status, ShipmentStatus::AtHub);
        assert_eq!(local.mode, TrackingMode::Manual);
        assert_eq!(local.history.last().map(|h| h.status.as_str()), Some("at-hub"));
    }

    #[tokio::test]
    async fn test_update_unknown_shipment() {
        let ctx = SessionContext::in_memory().with_backend(Arc::new(FakeBackend::default()));
        let admin = ctx.admin_login(ADMIN_KEY).await.unwrap();

        let err = admin
            .update(&TrackingId::parse("SWIFT-NOPE0001").unwrap(), &ShipmentUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::NotFound(_)));
    }
}
