//! Quoting and scheduling deliveries.
//!
//! A quote resolves both addresses, then the route, then prices the distance.
//! Submission goes to the backend when it is reachable and otherwise mints
//! a local record so the shipment can still be tracked.

use crate::context::SessionContext;
use crate::error::{AddressRole, Result, SessionError};
use chrono::{DateTime, Utc};
use serde::Serialize;
use swiftify_geo::{haversine_distance, Coordinate};
use swiftify_maps::{GeocodeResolution, RouteResolution};
use swiftify_tracking::eta::estimate_transit;
use swiftify_tracking::{ScheduleRequest, ShipmentRecord, TrackingId, WeightClass};
use tracing::{info, warn};

/// A priced route between two points
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub origin: Coordinate,
    pub destination: Coordinate,
    pub route: RouteResolution,
    /// Distance used for pricing
    pub distance_km: f64,
    pub weight: WeightClass,
    pub cost: f64,
    pub transit_hours: f64,
    pub eta: DateTime<Utc>,
}

/// Where a submitted shipment ended up
#[derive(Debug, Clone, PartialEq)]
pub enum Scheduled {
    /// Accepted by the backend
    Backend { tracking_id: TrackingId },
    /// Backend unavailable; the record lives in the local store
    Local {
        record: Box<ShipmentRecord>,
        reason: String,
    },
}

impl Scheduled {
    pub fn tracking_id(&self) -> &TrackingId {
        match self {
            Scheduled::Backend { tracking_id } => tracking_id,
            Scheduled::Local { record, .. } => &record.id,
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, Scheduled::Local { .. })
    }
}

/// The scheduling workflow
#[derive(Debug, Clone)]
pub struct SchedulingSession {
    ctx: SessionContext,
}

impl SchedulingSession {
    pub fn new(ctx: SessionContext) -> Self {
        Self { ctx }
    }

    /// Geocode one end of a shipment
    ///
    /// # Errors
    /// [`SessionError::AddressUnresolved`] when no backend could place it.
    pub async fn locate(&self, role: AddressRole, address: &str) -> Result<Coordinate> {
        match self.ctx.geocoder().resolve_address(address).await {
            GeocodeResolution::Resolved(found) => Ok(found.coordinate),
            GeocodeResolution::Unresolved => Err(SessionError::AddressUnresolved {
                role,
                address: address.to_string(),
            }),
        }
    }

    /// Quote a delivery between two free-text addresses
    pub async fn quote(
        &self,
        sender_address: &str,
        receiver_address: &str,
        weight: &WeightClass,
    ) -> Result<Quote> {
        let (origin, destination) = tokio::join!(
            self.locate(AddressRole::Sender, sender_address),
            self.locate(AddressRole::Receiver, receiver_address),
        );
        Ok(self.quote_between(origin?, destination?, weight).await)
    }

    /// Quote a delivery between known coordinates. Never fails.
    pub async fn quote_between(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        weight: &WeightClass,
    ) -> Quote {
        let route = self.ctx.routes().resolve_route(origin, destination).await;
        let distance_km = if route.is_fallback() {
            haversine_distance(&origin, &destination)
        } else {
            route.route().length_km()
        };

        let cost = self.ctx.estimator().estimate(weight, distance_km);
        let transit = estimate_transit(distance_km);
        let now = Utc::now();

        Quote {
            origin,
            destination,
            route,
            distance_km,
            weight: weight.clone(),
            cost,
            transit_hours: transit.num_milliseconds() as f64 / 3_600_000.0,
            eta: now + transit,
        }
    }

    /// Submit a shipment priced by `quote`
    ///
    /// An unavailable or absent backend is not an error: the shipment gets a
    /// locally minted ID and is saved to the local store. Errors the backend
    /// reports about the request itself are returned.
    pub async fn submit(&self, request: ScheduleRequest, quote: &Quote) -> Result<Scheduled> {
        let reason = match self.ctx.backend() {
            Some(backend) => match backend.schedule(&request).await {
                Ok(tracking_id) => {
                    info!(id = %tracking_id, "Shipment scheduled with backend");
                    return Ok(Scheduled::Backend { tracking_id });
                }
                Err(e) if e.is_unavailable() => {
                    warn!(error = %e, "Backend unavailable, scheduling locally");
                    e.to_string()
                }
                Err(e) => return Err(e.into()),
            },
            None => "backend not configured".to_string(),
        };

        let id = TrackingId::generate();
        let record = ShipmentRecord::scheduled(id, request, quote.route.route(), quote.cost, Utc::now());
        self.ctx.store().save(&record)?;
        info!(id = %record.id, "Shipment scheduled locally");

        Ok(Scheduled::Local {
            record: Box::new(record),
            reason,
        })
    }

    /// Quote from the request's addresses and weight, then submit
    pub async fn schedule(&self, request: ScheduleRequest) -> Result<(Quote, Scheduled)> {
        let quote = self
            .quote(
                &request.sender.address,
                &request.receiver.address,
                &request.parcel_details.weight,
            )
            .await?;
        let scheduled = self.submit(request, &quote).await?;
        Ok((quote, scheduled))
    }
}
