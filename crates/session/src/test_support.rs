//! Fakes shared by the session tests.

use crate::backend::ShipmentBackend;
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use std::collections::HashMap;
use std::sync::Mutex;
use swiftify_api_client::{ApiError, ApiResult};
use swiftify_geo::Coordinate;
use swiftify_maps::{GeocodedAddress, GeocodingBackend};
use swiftify_tracking::demo::demo_record;
use swiftify_tracking::{
    Contact, Dimensions, ParcelDetails, ScheduleRequest, ShipmentRecord, ShipmentStatus,
    ShipmentUpdate, TrackingId, TrackingMode, WeightClass,
};

pub const ADMIN_KEY: &str = "operator-key";
const ADMIN_TOKEN: &str = "token-1";

pub fn sample_request() -> ScheduleRequest {
    ScheduleRequest {
        sender: Contact {
            name: "Ada Sender".into(),
            email: "ada@example.com".into(),
            phone: "+1 555 0100".into(),
            address: "1 Market St, San Francisco, CA".into(),
        },
        receiver: Contact {
            name: "Lin Receiver".into(),
            email: "lin@example.com".into(),
            phone: "+1 555 0199".into(),
            address: "200 Spring St, Los Angeles, CA".into(),
        },
        parcel_details: ParcelDetails {
            description: "Books".into(),
            weight: WeightClass::from_label("1-5kg"),
            dimensions: Dimensions {
                length: 30.0,
                width: 20.0,
                height: 10.0,
            },
            value: 40.0,
            instructions: None,
            photo: None,
        },
    }
}

/// An auto-mode, in-transit record on the five-stop demo route
pub fn in_transit_record(id: &str, progress: f64) -> ShipmentRecord {
    let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
    let mut record = demo_record(&TrackingId::parse(id).unwrap(), now);
    record.status = ShipmentStatus::InTransit;
    record.mode = TrackingMode::Auto;
    record.progress = progress;
    record.current_position = record.route.get(record.resume_index()).cloned();
    record
}

/// Answers addresses containing a known place name
pub struct FixedGeocoder {
    places: Vec<(String, Coordinate)>,
}

impl FixedGeocoder {
    pub fn new(places: &[(&str, Coordinate)]) -> Self {
        Self {
            places: places.iter().map(|(name, c)| ((*name).to_string(), *c)).collect(),
        }
    }
}

#[async_trait]
impl GeocodingBackend for FixedGeocoder {
    fn name(&self) -> &'static str {
        "fixed"
    }

    async fn geocode(&self, query: &str) -> swiftify_maps::Result<Option<GeocodedAddress>> {
        Ok(self
            .places
            .iter()
            .find(|(name, _)| query.contains(name.as_str()))
            .map(|(name, coordinate)| GeocodedAddress {
                coordinate: *coordinate,
                display_name: Some(name.clone()),
                provider: "fixed",
            }))
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Behaviour {
    #[default]
    Healthy,
    Unavailable,
    Rejecting(u16),
}

/// In-memory stand-in for the REST backend
#[derive(Default)]
pub struct FakeBackend {
    behaviour: Behaviour,
    records: Mutex<HashMap<String, ShipmentRecord>>,
    scheduled: Mutex<usize>,
    tracked: Mutex<usize>,
}

impl FakeBackend {
    pub fn with_records(records: Vec<ShipmentRecord>) -> Self {
        Self {
            records: Mutex::new(records.into_iter().map(|r| (r.id.to_string(), r)).collect()),
            ..Self::default()
        }
    }

    pub fn unavailable() -> Self {
        Self {
            behaviour: Behaviour::Unavailable,
            ..Self::default()
        }
    }

    pub fn rejecting(status: u16) -> Self {
        Self {
            behaviour: Behaviour::Rejecting(status),
            ..Self::default()
        }
    }

    pub fn scheduled_count(&self) -> usize {
        *self.scheduled.lock().unwrap()
    }

    pub fn track_count(&self) -> usize {
        *self.tracked.lock().unwrap()
    }

    fn check(&self) -> ApiResult<()> {
        match self.behaviour {
            Behaviour::Healthy => Ok(()),
            Behaviour::Unavailable => Err(ApiError::api_response(503, "Service Unavailable")),
            Behaviour::Rejecting(status) => Err(ApiError::api_response(status, "rejected")),
        }
    }

    fn authorize(&self, token: &str) -> ApiResult<()> {
        self.check()?;
        if token == ADMIN_TOKEN {
            Ok(())
        } else {
            Err(ApiError::api_response(401, "Invalid token"))
        }
    }
}

#[async_trait]
impl ShipmentBackend for FakeBackend {
    async fn schedule(&self, _request: &ScheduleRequest) -> ApiResult<TrackingId> {
        self.check()?;
        *self.scheduled.lock().unwrap() += 1;
        Ok(TrackingId::generate())
    }

    async fn track(&self, id: &TrackingId) -> ApiResult<ShipmentRecord> {
        *self.tracked.lock().unwrap() += 1;
        self.check()?;
        self.records
            .lock()
            .unwrap()
            .get(id.as_str())
            .cloned()
            .ok_or_else(|| ApiError::api_response(404, "Tracking ID not found"))
    }

    async fn login(&self, key: &str) -> ApiResult<String> {
        self.check()?;
        if key == ADMIN_KEY {
            Ok(ADMIN_TOKEN.to_string())
        } else {
            Err(ApiError::api_response(401, "Invalid admin key"))
        }
    }

    async fn parcels(&self, token: &str) -> ApiResult<Vec<ShipmentRecord>> {
        self.authorize(token)?;
        Ok(self.records.lock().unwrap().values().cloned().collect())
    }

    async fn update_parcel(
        &self,
        token: &str,
        id: &TrackingId,
        update: &ShipmentUpdate,
    ) -> ApiResult<ShipmentRecord> {
        self.authorize(token)?;
        let mut records = self.records.lock().unwrap();
        let record = records
            .get_mut(id.as_str())
            .ok_or_else(|| ApiError::api_response(404, "Tracking ID not found"))?;
        record.apply_update(update, Utc::now());
        Ok(record.clone())
    }
}
