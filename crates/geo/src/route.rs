//! Delivery routes as ordered coordinate sequences.

use crate::{haversine_distance, interpolate, Coordinate, GeoError, Result};
use serde::{Deserialize, Serialize};

/// An ordered sequence of coordinates from an origin to a destination.
///
/// A route with no points is unresolved, a single point is degenerate, and
/// two or more points form a valid path. Routes are never edited in place:
/// a regenerated route replaces the old one wholesale.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Route(Vec<Coordinate>);

impl Route {
    /// Wraps a coordinate sequence without validation.
    pub fn new(points: Vec<Coordinate>) -> Self {
        Self(points)
    }

    /// Wraps a coordinate sequence, rejecting degenerate or out-of-range input.
    pub fn try_new(points: Vec<Coordinate>) -> Result<Self> {
        if points.len() < 2 {
            return Err(GeoError::DegenerateRoute(format!(
                "expected at least 2 points, got {}",
                points.len()
            )));
        }
        if let Some(bad) = points.iter().find(|p| !p.is_valid()) {
            return Err(GeoError::InvalidCoordinate(bad.to_string()));
        }
        Ok(Self(points))
    }

    /// Synthesizes a straight-line route with `waypoints` evenly spaced
    /// interior points, for `waypoints + 2` points in total.
    ///
    /// # Example
    /// ```
    /// use swiftify_geo::{Coordinate, Route};
    ///
    /// let route = Route::straight_line(Coordinate::new(0.0, 0.0), Coordinate::new(6.0, 6.0), 5);
    /// assert_eq!(route.len(), 7);
    /// assert_eq!(route.points()[3], Coordinate::new(3.0, 3.0));
    /// ```
    pub fn straight_line(origin: Coordinate, destination: Coordinate, waypoints: usize) -> Self {
        let steps = (waypoints + 1) as f64;
        let mut points = Vec::with_capacity(waypoints + 2);
        points.push(origin);
        points.extend((1..=waypoints).map(|i| interpolate(&origin, &destination, i as f64 / steps)));
        points.push(destination);
        Self(points)
    }

    pub fn points(&self) -> &[Coordinate] {
        &self.0
    }

    pub fn into_points(self) -> Vec<Coordinate> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True once a provider has produced any points.
    pub fn is_resolved(&self) -> bool {
        !self.0.is_empty()
    }

    /// True when the route has an origin and a distinct final point.
    pub fn is_valid(&self) -> bool {
        self.0.len() >= 2
    }

    pub fn origin(&self) -> Option<&Coordinate> {
        self.0.first()
    }

    pub fn destination(&self) -> Option<&Coordinate> {
        if self.is_valid() { self.0.last() } else { None }
    }

    /// Interior points, excluding origin and destination.
    pub fn waypoints(&self) -> &[Coordinate] {
        if self.is_valid() { &self.0[1..self.0.len() - 1] } else { &[] }
    }

    pub fn get(&self, index: usize) -> Option<&Coordinate> {
        self.0.get(index)
    }

    /// Total path length in kilometers, summed over consecutive legs.
    pub fn length_km(&self) -> f64 {
        self.0
            .windows(2)
            .map(|leg| haversine_distance(&leg[0], &leg[1]))
            .sum()
    }

    /// Great-circle distance between origin and destination in kilometers.
    pub fn direct_km(&self) -> f64 {
        match (self.origin(), self.destination()) {
            (Some(a), Some(b)) => haversine_distance(a, b),
            _ => 0.0,
        }
    }
}

impl From<Vec<Coordinate>> for Route {
    fn from(points: Vec<Coordinate>) -> Self {
        Self::new(points)
    }
}

impl FromIterator<Coordinate> for Route {
    fn from_iter<I: IntoIterator<Item = Coordinate>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const SAN_FRANCISCO: Coordinate = Coordinate { latitude: 37.7749, longitude: -122.4194 };
    const LOS_ANGELES: Coordinate = Coordinate { latitude: 34.0522, longitude: -118.2437 };

    #[test]
    fn test_straight_line_default_length() {
        let route = Route::straight_line(SAN_FRANCISCO, LOS_ANGELES, 5);
        assert_eq!(route.len(), 7);
        assert_eq!(route.origin(), Some(&SAN_FRANCISCO));
        assert_eq!(route.destination(), Some(&LOS_ANGELES));
        assert_eq!(route.waypoints().len(), 5);
    }

    #[test]
    fn test_straight_line_zero_waypoints() {
        let route = Route::straight_line(SAN_FRANCISCO, LOS_ANGELES, 0);
        assert_eq!(route.points(), &[SAN_FRANCISCO, LOS_ANGELES]);
    }

    #[test]
    fn test_straight_line_length_matches_direct_distance() {
        let route = Route::straight_line(SAN_FRANCISCO, LOS_ANGELES, 8);
        let direct = haversine_distance(&SAN_FRANCISCO, &LOS_ANGELES);
        // Planar interpolation bends slightly off the great circle
        assert!((route.length_km() - direct).abs() / direct < 0.01);
        assert!((route.direct_km() - direct).abs() < 1e-9);
    }

    #[test]
    fn test_resolution_states() {
        let empty = Route::default();
        assert!(!empty.is_resolved());
        assert!(!empty.is_valid());
        assert_eq!(empty.length_km(), 0.0);

        let single = Route::new(vec![SAN_FRANCISCO]);
        assert!(single.is_resolved());
        assert!(!single.is_valid());
        assert_eq!(single.destination(), None);
        assert!(single.waypoints().is_empty());
    }

    #[test]
    fn test_try_new_rejects_degenerate() {
        let err = Route::try_new(vec![SAN_FRANCISCO]).unwrap_err();
        assert_eq!(err.code(), crate::GeoErrorCode::DegenerateRoute);

        let err = Route::try_new(vec![SAN_FRANCISCO, Coordinate::new(95.0, 0.0)]).unwrap_err();
        assert_eq!(err.code(), crate::GeoErrorCode::InvalidCoordinate);
    }

    #[test]
    fn test_serializes_as_plain_array() {
        let route = Route::new(vec![Coordinate::new(1.0, 2.0), Coordinate::new(3.0, 4.0)]);
        let json = serde_json::to_value(&route).unwrap();
        assert!(json.is_array());
        assert_eq!(json[1]["latitude"], 3.0);
    }

    proptest! {
        #[test]
        fn prop_straight_line_has_n_plus_two_points(n in 0usize..32) {
            let route = Route::straight_line(SAN_FRANCISCO, LOS_ANGELES, n);
            prop_assert_eq!(route.len(), n + 2);
            prop_assert!(route.is_valid());
        }

        #[test]
        fn prop_straight_line_is_monotonic_toward_destination(n in 1usize..16) {
            let route = Route::straight_line(SAN_FRANCISCO, LOS_ANGELES, n);
            let remaining: Vec<f64> = route
                .points()
                .iter()
                .map(|p| haversine_distance(p, &LOS_ANGELES))
                .collect();
            for pair in remaining.windows(2) {
                prop_assert!(pair[1] <= pair[0] + 1e-9);
            }
        }
    }
}
