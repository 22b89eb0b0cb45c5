//! Shipment records as exchanged with the backend and kept in local storage.
//!
//! Field names are camelCase and route points use `lat`/`lng` on the wire.

use crate::eta::estimate_delivery_time;
use crate::pricing::WeightClass;
use crate::simulator::PositionUpdate;
use crate::{TrackingError, TrackingId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use swiftify_geo::{Coordinate, Route};

/// Lifecycle status of a shipment, in delivery order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShipmentStatus {
    Pending,
    PickedUp,
    InTransit,
    AtHub,
    OutForDelivery,
    Delivered,
}

impl ShipmentStatus {
    pub const ALL: [ShipmentStatus; 6] = [
        ShipmentStatus::Pending,
        ShipmentStatus::PickedUp,
        ShipmentStatus::InTransit,
        ShipmentStatus::AtHub,
        ShipmentStatus::OutForDelivery,
        ShipmentStatus::Delivered,
    ];

    /// Position in [`ShipmentStatus::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Wire form, e.g. `out-for-delivery`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::PickedUp => "picked-up",
            Self::InTransit => "in-transit",
            Self::AtHub => "at-hub",
            Self::OutForDelivery => "out-for-delivery",
            Self::Delivered => "delivered",
        }
    }

    /// Human-readable form, e.g. `Out for Delivery`.
    pub fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::PickedUp => "Picked Up",
            Self::InTransit => "In Transit",
            Self::AtHub => "At Hub",
            Self::OutForDelivery => "Out for Delivery",
            Self::Delivered => "Delivered",
        }
    }

    /// Progress percentage an operator status change implies.
    pub fn nominal_progress(self) -> f64 {
        match self {
            Self::Pending => 0.0,
            Self::PickedUp => 20.0,
            Self::InTransit => 60.0,
            Self::AtHub => 80.0,
            Self::OutForDelivery => 90.0,
            Self::Delivered => 100.0,
        }
    }

    pub fn is_moving(self) -> bool {
        matches!(self, Self::InTransit | Self::OutForDelivery)
    }
}

impl fmt::Display for ShipmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShipmentStatus {
    type Err = TrackingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| TrackingError::UnknownStatus(s.to_string()))
    }
}

/// Whether the parcel position is simulated or set by an operator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackingMode {
    #[default]
    Auto,
    Manual,
}

impl FromStr for TrackingMode {
    type Err = TrackingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(Self::Auto),
            "manual" => Ok(Self::Manual),
            other => Err(TrackingError::UnknownStatus(format!("tracking mode {other}"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
}

impl Contact {
    /// First comma-separated segment of the address.
    pub fn short_address(&self) -> &str {
        self.address.split(',').next().unwrap_or_default().trim()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub length: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParcelDetails {
    pub description: String,
    pub weight: WeightClass,
    pub dimensions: Dimensions,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}

/// A single entry in a shipment's status history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEvent {
    pub status: String,
    #[serde(with = "timestamp")]
    pub timestamp: DateTime<Utc>,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A route coordinate with an optional place name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutePoint {
    pub lat: f64,
    pub lng: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl RoutePoint {
    pub fn labelled(coord: Coordinate, label: impl Into<String>) -> Self {
        Self {
            lat: coord.latitude,
            lng: coord.longitude,
            label: Some(label.into()),
        }
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lng)
    }
}

impl From<Coordinate> for RoutePoint {
    fn from(coord: Coordinate) -> Self {
        Self {
            lat: coord.latitude,
            lng: coord.longitude,
            label: None,
        }
    }
}

/// Payload for scheduling a new delivery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRequest {
    pub sender: Contact,
    pub receiver: Contact,
    pub parcel_details: ParcelDetails,
}

/// Partial update applied by an operator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ShipmentStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<TrackingMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_position: Option<RoutePoint>,
}

impl ShipmentUpdate {
    /// True when applying the update would change nothing. Notes are only
    /// recorded alongside a status change, so notes alone count as empty.
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.mode.is_none() && self.current_position.is_none()
    }
}

/// Full tracking state of one shipment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentRecord {
    pub id: TrackingId,
    pub sender: Contact,
    pub receiver: Contact,
    pub parcel_details: ParcelDetails,
    pub status: ShipmentStatus,
    #[serde(default)]
    pub mode: TrackingMode,
    #[serde(default)]
    pub history: Vec<HistoryEvent>,
    #[serde(default)]
    pub route: Vec<RoutePoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_position: Option<RoutePoint>,
    #[serde(with = "timestamp")]
    pub eta: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_cost: Option<f64>,
    #[serde(default)]
    pub progress: f64,
}

impl ShipmentRecord {
    /// Builds a freshly scheduled record over a resolved route.
    ///
    /// The first and last route points are labelled with the sender and
    /// receiver addresses.
    pub fn scheduled(
        id: TrackingId,
        request: ScheduleRequest,
        route: &Route,
        estimated_cost: f64,
        now: DateTime<Utc>,
    ) -> Self {
        let last = route.len().saturating_sub(1);
        let points: Vec<RoutePoint> = route
            .points()
            .iter()
            .enumerate()
            .map(|(i, coord)| match i {
                0 => RoutePoint::labelled(*coord, request.sender.address.clone()),
                i if i == last => RoutePoint::labelled(*coord, request.receiver.address.clone()),
                _ => RoutePoint::from(*coord),
            })
            .collect();

        let history = vec![HistoryEvent {
            status: "Package scheduled".to_string(),
            timestamp: now,
            location: request.sender.short_address().to_string(),
            notes: Some("Package scheduled for pickup".to_string()),
        }];

        Self {
            id,
            current_position: points.first().cloned(),
            route: points,
            sender: request.sender,
            receiver: request.receiver,
            parcel_details: request.parcel_details,
            status: ShipmentStatus::Pending,
            mode: TrackingMode::Auto,
            history,
            eta: estimate_delivery_time(now, route.length_km()),
            created_at: now,
            estimated_cost: Some(estimated_cost),
            progress: 0.0,
        }
    }

    /// The stored route as geometry.
    pub fn route(&self) -> Route {
        self.route.iter().map(RoutePoint::coordinate).collect()
    }

    pub fn current_coordinate(&self) -> Option<Coordinate> {
        self.current_position.as_ref().map(RoutePoint::coordinate)
    }

    /// Movement is simulated only for auto-mode parcels in transit with a usable route.
    pub fn is_simulation_eligible(&self) -> bool {
        self.mode == TrackingMode::Auto
            && self.status == ShipmentStatus::InTransit
            && self.route.len() >= 2
    }

    /// Route index to resume simulation from, derived from stored progress.
    pub fn resume_index(&self) -> usize {
        if self.route.len() < 2 {
            return 0;
        }
        let last = self.route.len() - 1;
        let progress = self.progress.clamp(0.0, 100.0);
        ((progress * last as f64 / 100.0).floor() as usize).min(last)
    }

    /// Folds a simulator position update into the record.
    pub fn apply_position(&mut self, update: &PositionUpdate) {
        let label = self.route.get(update.index).and_then(|p| p.label.clone());
        self.current_position = Some(RoutePoint {
            lat: update.position.latitude,
            lng: update.position.longitude,
            label,
        });
        self.progress = update.progress.min(100.0);
    }

    /// Applies an operator update, recording status changes in the history.
    pub fn apply_update(&mut self, update: &ShipmentUpdate, now: DateTime<Utc>) {
        if let Some(position) = &update.current_position {
            self.current_position = Some(position.clone());
        }
        if let Some(mode) = update.mode {
            self.mode = mode;
        }
        if let Some(status) = update.status {
            let location = self
                .current_position
                .as_ref()
                .and_then(|p| p.label.clone())
                .unwrap_or_else(|| "Unknown".to_string());
            self.history.push(HistoryEvent {
                status: status.as_str().to_string(),
                timestamp: now,
                location,
                notes: Some(
                    update
                        .notes
                        .clone()
                        .unwrap_or_else(|| format!("Status updated to {status}")),
                ),
            });
            self.status = status;
            self.progress = status.nominal_progress();
        }
    }
}

/// Dashboard counts over a set of shipments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentStats {
    pub total: usize,
    pub delivered: usize,
    pub in_transit: usize,
    pub pending: usize,
}

impl ShipmentStats {
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a ShipmentRecord>) -> Self {
        records.into_iter().fold(Self::default(), |mut stats, record| {
            stats.total += 1;
            match record.status {
                ShipmentStatus::Delivered => stats.delivered += 1,
                ShipmentStatus::InTransit | ShipmentStatus::OutForDelivery => stats.in_transit += 1,
                ShipmentStatus::Pending => stats.pending += 1,
                ShipmentStatus::PickedUp | ShipmentStatus::AtHub => {}
            }
            stats
        })
    }
}

/// RFC 3339 timestamps, also accepting naive ISO 8601 values as UTC.
pub(crate) mod timestamp {
    use chrono::{DateTime, NaiveDateTime, SecondsFormat, TimeZone, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| de::Error::custom(format!("invalid timestamp: {raw}")))
    }

    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                    .ok()
                    .map(|naive| Utc.from_utc_datetime(&naive))
            })
    }
}
