//! Linear interpolation between coordinates.

use crate::Coordinate;

/// Linearly interpolates between two coordinates in latitude/longitude space.
///
/// A `fraction` of 0 yields `from` and 1 yields `to`. Values outside `[0, 1]`
/// are not clamped and extrapolate along the same line. This is a planar
/// approximation, not a great-circle path, which is accurate enough for
/// regional delivery routes.
///
/// # Example
/// ```
/// use swiftify_geo::{interpolate, Coordinate};
///
/// let mid = interpolate(&Coordinate::new(0.0, 0.0), &Coordinate::new(10.0, 20.0), 0.5);
/// assert_eq!(mid, Coordinate::new(5.0, 10.0));
/// ```
#[inline]
pub fn interpolate(from: &Coordinate, to: &Coordinate, fraction: f64) -> Coordinate {
    // Weighted form is exact at both endpoints
    let keep = 1.0 - fraction;
    Coordinate::new(
        from.latitude * keep + to.latitude * fraction,
        from.longitude * keep + to.longitude * fraction,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const A: Coordinate = Coordinate { latitude: 37.7749, longitude: -122.4194 };
    const B: Coordinate = Coordinate { latitude: 34.0522, longitude: -118.2437 };

    #[test]
    fn test_endpoints() {
        assert_eq!(interpolate(&A, &B, 0.0), A);
        assert_eq!(interpolate(&A, &B, 1.0), B);
    }

    #[test]
    fn test_midpoint() {
        let mid = interpolate(&Coordinate::new(0.0, 0.0), &Coordinate::new(10.0, 20.0), 0.5);
        assert_eq!(mid, Coordinate::new(5.0, 10.0));
    }

    #[test]
    fn test_extrapolates_outside_unit_range() {
        let from = Coordinate::new(0.0, 0.0);
        let to = Coordinate::new(10.0, 10.0);
        assert_eq!(interpolate(&from, &to, 2.0), Coordinate::new(20.0, 20.0));
        assert_eq!(interpolate(&from, &to, -0.5), Coordinate::new(-5.0, -5.0));
    }

    #[test]
    fn test_endpoints_are_exact_for_awkward_values() {
        let from = Coordinate::new(0.1, 10.3);
        let to = Coordinate::new(0.7, 51.9);
        assert_eq!(interpolate(&from, &to, 0.0), from);
        assert_eq!(interpolate(&from, &to, 1.0), to);
    }

    fn coordinate() -> impl Strategy<Value = Coordinate> {
        (-90.0f64..=90.0, -180.0f64..=180.0).prop_map(|(lat, lng)| Coordinate::new(lat, lng))
    }

    proptest! {
        #[test]
        fn prop_endpoints_are_exact(a in coordinate(), b in coordinate()) {
            prop_assert_eq!(interpolate(&a, &b, 0.0), a);
            prop_assert_eq!(interpolate(&a, &b, 1.0), b);
        }

        #[test]
        fn prop_interpolated_point_stays_within_bounds(t in 0.0f64..=1.0) {
            let p = interpolate(&A, &B, t);
            prop_assert!(p.latitude <= A.latitude.max(B.latitude) + 1e-9);
            prop_assert!(p.latitude >= A.latitude.min(B.latitude) - 1e-9);
            prop_assert!(p.longitude <= A.longitude.max(B.longitude) + 1e-9);
            prop_assert!(p.longitude >= A.longitude.min(B.longitude) - 1e-9);
        }
    }
}
