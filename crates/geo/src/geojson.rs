//! GeoJSON parsing for routing and geocoding responses.
//!
//! Supports:
//! - Point: `{"type": "Point", "coordinates": [lng, lat]}`
//! - LineString: `{"type": "LineString", "coordinates": [[lng, lat], ...]}`
//!
//! GeoJSON orders positions as longitude first; the returned [`Coordinate`]s
//! are latitude first.

use crate::{Coordinate, GeoError, Result, Route};
use serde_json::Value;

/// Parse a GeoJSON point into a coordinate.
///
/// Returns `None` for null or unrecognized values.
///
/// # Example
/// ```
/// use swiftify_geo::parse_geojson_point;
/// use serde_json::json;
///
/// let point = json!({"type": "Point", "coordinates": [-122.4194, 37.7749]});
/// let coord = parse_geojson_point(&point).unwrap();
/// assert!((coord.latitude - 37.7749).abs() < 0.0001);
/// ```
pub fn parse_geojson_point(value: &Value) -> Option<Coordinate> {
    let coords = value.get("coordinates")?;
    position(coords).ok()
}

/// Parse a GeoJSON line geometry into a [`Route`].
///
/// Accepts either a full `LineString` object or a bare array of positions.
/// Every position must be a `[lng, lat]` pair within valid ranges.
///
/// # Errors
/// Returns [`GeoError::InvalidGeoJson`] when the structure is wrong and
/// [`GeoError::InvalidCoordinate`] when a position is out of range.
///
/// # Example
/// ```
/// use swiftify_geo::parse_geojson_line;
/// use serde_json::json;
///
/// let line = json!({
///     "type": "LineString",
///     "coordinates": [[-122.4194, 37.7749], [-118.2437, 34.0522]]
/// });
/// let route = parse_geojson_line(&line).unwrap();
/// assert_eq!(route.len(), 2);
/// ```
pub fn parse_geojson_line(value: &Value) -> Result<Route> {
    let coords = match value {
        Value::Array(_) => value,
        Value::Object(map) => {
            if let Some(kind) = map.get("type").and_then(Value::as_str) {
                if kind != "LineString" {
                    return Err(GeoError::InvalidGeoJson(format!(
                        "Expected LineString, got: {kind}"
                    )));
                }
            }
            map.get("coordinates")
                .ok_or_else(|| GeoError::InvalidGeoJson("Missing 'coordinates'".into()))?
        }
        other => {
            return Err(GeoError::InvalidGeoJson(format!(
                "Expected object or array, got: {other}"
            )));
        }
    };

    let positions = coords
        .as_array()
        .ok_or_else(|| GeoError::InvalidGeoJson("'coordinates' is not an array".into()))?;

    positions.iter().map(position).collect::<Result<Vec<_>>>().map(Route::new)
}

/// Parse a single `[lng, lat]` position.
fn position(value: &Value) -> Result<Coordinate> {
    let pair = value
        .as_array()
        .filter(|p| p.len() >= 2)
        .ok_or_else(|| GeoError::InvalidGeoJson(format!("Expected [lng, lat], got: {value}")))?;

    let lng = pair[0]
        .as_f64()
        .ok_or_else(|| GeoError::InvalidGeoJson(format!("Invalid longitude: {}", pair[0])))?;
    let lat = pair[1]
        .as_f64()
        .ok_or_else(|| GeoError::InvalidGeoJson(format!("Invalid latitude: {}", pair[1])))?;

    Coordinate::try_new(lat, lng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GeoErrorCode;
    use serde_json::json;

    #[test]
    fn test_parse_point() {
        let value = json!({"type": "Point", "coordinates": [-118.2437, 34.0522]});
        let coord = parse_geojson_point(&value).unwrap();
        assert!((coord.latitude - 34.0522).abs() < 0.0001);
        assert!((coord.longitude - (-118.2437)).abs() < 0.0001);
    }

    #[test]
    fn test_parse_point_null() {
        assert!(parse_geojson_point(&Value::Null).is_none());
        assert!(parse_geojson_point(&json!({"coordinates": "nope"})).is_none());
    }

    #[test]
    fn test_parse_line_string() {
        let value = json!({
            "type": "LineString",
            "coordinates": [[-122.4194, 37.7749], [-121.8863, 37.3382], [-118.2437, 34.0522]]
        });
        let route = parse_geojson_line(&value).unwrap();
        assert_eq!(route.len(), 3);
        assert_eq!(route.points()[1], Coordinate::new(37.3382, -121.8863));
    }

    #[test]
    fn test_parse_bare_position_array() {
        let route = parse_geojson_line(&json!([[0.0, 0.0], [1.0, 1.0]])).unwrap();
        assert_eq!(route.len(), 2);
    }

    #[test]
    fn test_parse_line_wrong_type() {
        let err = parse_geojson_line(&json!({"type": "Point", "coordinates": [0.0, 0.0]})).unwrap_err();
        assert_eq!(err.code(), GeoErrorCode::InvalidGeoJson);
    }

    #[test]
    fn test_parse_line_malformed_position() {
        let err = parse_geojson_line(&json!([[0.0, 0.0], [1.0]])).unwrap_err();
        assert_eq!(err.code(), GeoErrorCode::InvalidGeoJson);

        let err = parse_geojson_line(&json!([[0.0, 0.0], ["a", 1.0]])).unwrap_err();
        assert_eq!(err.code(), GeoErrorCode::InvalidGeoJson);
    }

    #[test]
    fn test_parse_line_out_of_range() {
        // Latitude 200 after the lng/lat swap
        let err = parse_geojson_line(&json!([[0.0, 0.0], [10.0, 200.0]])).unwrap_err();
        assert_eq!(err.code(), GeoErrorCode::InvalidCoordinate);
    }

    #[test]
    fn test_parse_line_empty_is_unresolved_route() {
        let route = parse_geojson_line(&json!({"type": "LineString", "coordinates": []})).unwrap();
        assert!(!route.is_resolved());
    }
}
