//! Routing and geocoding for Swiftify
//!
//! Both providers hide backend failures behind explicit result variants:
//!
//! - [`RouteProvider::resolve_route`] returns [`RouteResolution::Live`] from
//!   OSRM, or [`RouteResolution::Fallback`] with a synthesized straight line
//! - [`GeocodeProvider::resolve_address`] returns
//!   [`GeocodeResolution::Resolved`] from Google or Nominatim, or
//!   [`GeocodeResolution::Unresolved`]
//!
//! # Example
//!
//! ```
//! use swiftify_geo::Coordinate;
//! use swiftify_maps::RouteProvider;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let provider = RouteProvider::offline();
//! let resolution = provider
//!     .resolve_route(Coordinate::new(37.7749, -122.4194), Coordinate::new(34.0522, -118.2437))
//!     .await;
//! assert!(resolution.is_fallback());
//! assert_eq!(resolution.route().len(), 7);
//! # }
//! ```

mod error;
pub mod geocoding;
pub mod routing;

pub use error::{ProviderError, ProviderErrorCode, Result};
pub use geocoding::{
    GeocodeProvider, GeocodeResolution, GeocodedAddress, GeocodingBackend, GoogleGeocoder,
    NominatimGeocoder,
};
pub use routing::{OsrmRouter, RouteProvider, RouteResolution, RoutingBackend};
