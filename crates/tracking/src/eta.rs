//! Delivery time estimates.

use chrono::{DateTime, Duration, Utc};

/// Fixed handling time added to every delivery.
pub const BASE_HANDLING_HOURS: f64 = 2.0;

/// Average road speed used for transit estimates.
pub const AVERAGE_SPEED_KMH: f64 = 50.0;

/// Estimated time in transit for a route of `distance_km`.
pub fn estimate_transit(distance_km: f64) -> Duration {
    let hours = BASE_HANDLING_HOURS + distance_km.max(0.0) / AVERAGE_SPEED_KMH;
    Duration::milliseconds((hours * 3_600_000.0).round() as i64)
}

/// Estimated delivery instant for a parcel dispatched at `now`.
pub fn estimate_delivery_time(now: DateTime<Utc>, distance_km: f64) -> DateTime<Utc> {
    now + estimate_transit(distance_km)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_zero_distance_is_base_time() {
        assert_eq!(estimate_transit(0.0), Duration::hours(2));
    }

    #[test]
    fn test_transit_adds_driving_time() {
        assert_eq!(estimate_transit(100.0), Duration::hours(4));
        assert_eq!(estimate_transit(25.0), Duration::minutes(150));
    }

    #[test]
    fn test_negative_distance_is_clamped() {
        assert_eq!(estimate_transit(-10.0), Duration::hours(2));
    }

    #[test]
    fn test_delivery_time() {
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).unwrap();
        let eta = estimate_delivery_time(now, 500.0);
        assert_eq!(eta, Utc.with_ymd_and_hms(2025, 3, 1, 20, 0, 0).unwrap());
    }
}
