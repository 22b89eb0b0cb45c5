//! Geospatial primitives for Swiftify delivery routes.
//!
//! This crate provides:
//! - Haversine distance calculations
//! - Linear interpolation between coordinates
//! - The [`Route`] type with straight-line route synthesis
//! - GeoJSON point and line parsing for routing service responses
//!
//! # Example
//!
//! ```
//! use swiftify_geo::{haversine_distance, Coordinate, Route};
//!
//! let san_francisco = Coordinate::new(37.7749, -122.4194);
//! let los_angeles = Coordinate::new(34.0522, -118.2437);
//!
//! let distance_km = haversine_distance(&san_francisco, &los_angeles);
//! assert!((distance_km - 559.0).abs() < 5.0);
//!
//! let route = Route::straight_line(san_francisco, los_angeles, 5);
//! assert_eq!(route.len(), 7);
//! ```

mod error;
mod geojson;
mod haversine;
mod interpolate;
mod route;

pub use error::{GeoError, GeoErrorCode, Result};
pub use geojson::{parse_geojson_line, parse_geojson_point};
pub use haversine::{haversine_distance, haversine_distance_meters, EARTH_RADIUS_KM, EARTH_RADIUS_M};
pub use interpolate::interpolate;
pub use route::Route;

/// A geographic coordinate with latitude and longitude.
///
/// Deserializes from either `latitude`/`longitude` or the shorter
/// `lat`/`lng` keys used by the backend.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees (-90 to 90)
    #[serde(alias = "lat")]
    pub latitude: f64,
    /// Longitude in degrees (-180 to 180)
    #[serde(alias = "lng", alias = "lon")]
    pub longitude: f64,
}

impl Coordinate {
    /// Creates a new coordinate without range checks.
    ///
    /// # Arguments
    /// * `latitude` - Latitude in degrees (-90 to 90)
    /// * `longitude` - Longitude in degrees (-180 to 180)
    #[inline]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Creates a coordinate, rejecting values outside the valid ranges.
    ///
    /// # Errors
    /// Returns [`GeoError::InvalidCoordinate`] for out-of-range or NaN values.
    pub fn try_new(latitude: f64, longitude: f64) -> Result<Self> {
        let coord = Self::new(latitude, longitude);
        if coord.is_valid() {
            Ok(coord)
        } else {
            Err(GeoError::InvalidCoordinate(format!(
                "latitude {latitude}, longitude {longitude} out of range"
            )))
        }
    }

    /// Returns true if the coordinate has valid values.
    #[inline]
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Converts degrees to radians for internal calculations.
    #[inline]
    pub(crate) fn to_radians(self) -> (f64, f64) {
        (self.latitude.to_radians(), self.longitude.to_radians())
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self::new(lat, lng)
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_creation() {
        let coord = Coordinate::new(37.7749, -122.4194);
        assert_eq!(coord.latitude, 37.7749);
        assert_eq!(coord.longitude, -122.4194);
    }

    #[test]
    fn test_coordinate_validation() {
        assert!(Coordinate::new(0.0, 0.0).is_valid());
        assert!(Coordinate::new(90.0, 180.0).is_valid());
        assert!(Coordinate::new(-90.0, -180.0).is_valid());
        assert!(!Coordinate::new(91.0, 0.0).is_valid());
        assert!(!Coordinate::new(0.0, 181.0).is_valid());
        assert!(!Coordinate::new(f64::NAN, 0.0).is_valid());
    }

    #[test]
    fn test_try_new_rejects_out_of_range() {
        assert!(Coordinate::try_new(45.0, 90.0).is_ok());
        let err = Coordinate::try_new(120.0, 0.0).unwrap_err();
        assert_eq!(err.code(), GeoErrorCode::InvalidCoordinate);
    }

    #[test]
    fn test_coordinate_from_tuple() {
        let coord: Coordinate = (34.0522, -118.2437).into();
        assert_eq!(coord.latitude, 34.0522);
    }

    #[test]
    fn test_coordinate_deserializes_short_keys() {
        let coord: Coordinate = serde_json::from_str(r#"{"lat": 47.6062, "lng": -122.3321}"#).unwrap();
        assert_eq!(coord, Coordinate::new(47.6062, -122.3321));
    }
}
