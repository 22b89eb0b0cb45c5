//! Demo shipment records for identifiers unknown to every store.
//!
//! The status is derived from a hash of the identifier so the same ID always
//! shows the same demo shipment.

use crate::pricing::WeightClass;
use crate::shipment::{
    Contact, Dimensions, HistoryEvent, ParcelDetails, RoutePoint, ShipmentRecord, ShipmentStatus,
    TrackingMode,
};
use crate::TrackingId;
use chrono::{DateTime, Duration, Utc};
use sha2::{Digest, Sha256};
use swiftify_geo::Coordinate;

/// San Francisco to Los Angeles via the Central Valley.
const DEMO_STOPS: [(f64, f64, &str); 5] = [
    (37.7749, -122.4194, "San Francisco, CA"),
    (37.3382, -121.8863, "San Jose, CA"),
    (36.7783, -119.4179, "Fresno, CA"),
    (35.3733, -119.0187, "Bakersfield, CA"),
    (34.0522, -118.2437, "Los Angeles, CA"),
];

const DEMO_COST: f64 = 24.99;

/// Status a demo record for `id` reports.
pub fn demo_status(id: &TrackingId) -> ShipmentStatus {
    let digest = Sha256::digest(id.as_str().as_bytes());
    ShipmentStatus::ALL[digest[0] as usize % ShipmentStatus::ALL.len()]
}

/// Builds the demo record for `id` as of `now`.
pub fn demo_record(id: &TrackingId, now: DateTime<Utc>) -> ShipmentRecord {
    let status = demo_status(id);
    let step = status.index();
    let last_status = ShipmentStatus::ALL.len() - 1;

    let route: Vec<RoutePoint> = DEMO_STOPS
        .iter()
        .map(|&(lat, lng, label)| RoutePoint::labelled(Coordinate::new(lat, lng), label))
        .collect();

    let progress = step as f64 / last_status as f64 * 100.0;
    let position_index = ((progress * (route.len() - 1) as f64 / 100.0).floor() as usize).min(route.len() - 1);
    let created_at = now - Duration::days(1);

    // One history entry per status reached, spread over the last day
    let history = ShipmentStatus::ALL[..=step]
        .iter()
        .enumerate()
        .map(|(i, reached)| {
            let stop = &route[(i * (route.len() - 1) / last_status).min(route.len() - 1)];
            HistoryEvent {
                status: reached.label().to_string(),
                timestamp: created_at + Duration::hours(4 * i as i64),
                location: stop.label.clone().unwrap_or_default(),
                notes: (i == 0).then(|| "Package scheduled for pickup".to_string()),
            }
        })
        .collect();

    ShipmentRecord {
        id: id.clone(),
        sender: Contact {
            name: "John Doe".into(),
            email: "john@example.com".into(),
            phone: "+1 (555) 123-4567".into(),
            address: "123 Main Street, San Francisco, CA 94102".into(),
        },
        receiver: Contact {
            name: "Jane Smith".into(),
            email: "jane@example.com".into(),
            phone: "+1 (555) 987-6543".into(),
            address: "456 Oak Avenue, Los Angeles, CA 90210".into(),
        },
        parcel_details: ParcelDetails {
            description: "Electronics and accessories".into(),
            weight: WeightClass::OneToFiveKg,
            dimensions: Dimensions { length: 30.0, width: 20.0, height: 15.0 },
            value: 299.99,
            instructions: Some("Handle with care - fragile items".into()),
            photo: None,
        },
        status,
        mode: TrackingMode::Auto,
        history,
        current_position: Some(route[position_index].clone()),
        route,
        eta: now + Duration::days(1),
        created_at,
        estimated_cost: Some(DEMO_COST),
        progress,
    }
}
