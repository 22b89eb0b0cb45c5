//! Route resolution with a straight-line fallback.
//!
//! [`RouteProvider::resolve_route`] always produces a usable [`Route`]. A live
//! backend is tried first; any failure (disabled, unreachable, slow, or a
//! malformed answer) yields a synthesized straight line instead, and the
//! result variant records which path was taken.

use crate::error::{ProviderError, Result};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use swiftify_core::config::RoutingConfig;
use swiftify_geo::{parse_geojson_line, Coordinate, Route};
use swiftify_telemetry::{metrics, Timer};
use tracing::{debug, warn};

/// Interior waypoints used for the synthesized fallback route
pub const DEFAULT_FALLBACK_WAYPOINTS: usize = 5;

/// Default time allowed for a live routing call
pub const DEFAULT_ROUTING_TIMEOUT: Duration = Duration::from_secs(8);

/// A service that can compute a driving route between two points
#[async_trait]
pub trait RoutingBackend: Send + Sync {
    /// Short name used in logs and provenance
    fn name(&self) -> &'static str;

    /// Compute a route from `origin` to `destination`
    async fn route(&self, origin: Coordinate, destination: Coordinate) -> Result<Route>;
}

/// OSRM routing over HTTP
///
/// Requests `GET {base}/route/v1/driving/{lng},{lat};{lng},{lat}` with full
/// GeoJSON geometry and returns the first route's coordinates as-is.
#[derive(Debug, Clone)]
pub struct OsrmRouter {
    client: reqwest::Client,
    base_url: String,
}

impl OsrmRouter {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("swiftify-maps/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn route_url(&self, origin: &Coordinate, destination: &Coordinate) -> String {
        format!(
            "{}/route/v1/driving/{},{};{},{}",
            self.base_url, origin.longitude, origin.latitude, destination.longitude, destination.latitude
        )
    }
}

#[async_trait]
impl RoutingBackend for OsrmRouter {
    fn name(&self) -> &'static str {
        "osrm"
    }

    async fn route(&self, origin: Coordinate, destination: Coordinate) -> Result<Route> {
        let url = self.route_url(&origin, &destination);
        debug!(url = %url, "Requesting OSRM route");

        let resp = self
            .client
            .get(&url)
            .query(&[("overview", "full"), ("geometries", "geojson")])
            .send()
            .await?;

        let status = resp.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ProviderError::RateLimited("osrm"));
        }
        if !status.is_success() {
            return Err(ProviderError::Status {
                backend: "osrm",
                status: status.as_u16(),
            });
        }

        let body: Value = resp.json().await?;
        parse_osrm_response(&body)
    }
}

/// Extracts the first route's geometry from an OSRM response body.
pub(crate) fn parse_osrm_response(body: &Value) -> Result<Route> {
    if let Some(code) = body.get("code").and_then(Value::as_str) {
        if code != "Ok" {
            let message = body.get("message").and_then(Value::as_str).unwrap_or(code);
            return Err(ProviderError::malformed(format!("OSRM answered {code}: {message}")));
        }
    }

    let geometry = body
        .get("routes")
        .and_then(Value::as_array)
        .and_then(|routes| routes.first())
        .and_then(|route| route.get("geometry"))
        .ok_or_else(|| ProviderError::malformed("OSRM response has no routes[0].geometry"))?;

    let route = parse_geojson_line(geometry)?;
    Ok(Route::try_new(route.into_points())?)
}

/// Outcome of [`RouteProvider::resolve_route`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "source", rename_all = "lowercase")]
pub enum RouteResolution {
    /// Route computed by a live backend
    Live {
        route: Route,
        provider: &'static str,
    },
    /// Straight line synthesized locally
    Fallback {
        route: Route,
        /// Why the live path was not used
        reason: String,
    },
}

impl RouteResolution {
    pub fn route(&self) -> &Route {
        match self {
            RouteResolution::Live { route, .. } | RouteResolution::Fallback { route, .. } => route,
        }
    }

    pub fn into_route(self) -> Route {
        match self {
            RouteResolution::Live { route, .. } | RouteResolution::Fallback { route, .. } => route,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, RouteResolution::Fallback { .. })
    }

    /// Backend name, or `"straight-line"` for the fallback
    pub fn provenance(&self) -> &'static str {
        match self {
            RouteResolution::Live { provider, .. } => provider,
            RouteResolution::Fallback { .. } => "straight-line",
        }
    }
}

/// Resolves routes, degrading to a straight line when the backend fails
#[derive(Clone)]
pub struct RouteProvider {
    backend: Option<Arc<dyn RoutingBackend>>,
    timeout: Duration,
    fallback_waypoints: usize,
}

impl RouteProvider {
    /// Provider backed by `backend`, with default timeout and fallback density
    pub fn new(backend: Arc<dyn RoutingBackend>) -> Self {
        Self {
            backend: Some(backend),
            timeout: DEFAULT_ROUTING_TIMEOUT,
            fallback_waypoints: DEFAULT_FALLBACK_WAYPOINTS,
        }
    }

    /// Provider that only ever synthesizes straight lines
    pub fn offline() -> Self {
        Self {
            backend: None,
            timeout: DEFAULT_ROUTING_TIMEOUT,
            fallback_waypoints: DEFAULT_FALLBACK_WAYPOINTS,
        }
    }

    /// Build from the `[routing]` config section
    ///
    /// A disabled section, or an OSRM client that cannot be built, leaves the
    /// provider offline.
    pub fn from_config(config: &RoutingConfig) -> Self {
        let base = if config.enabled {
            match OsrmRouter::new(config.osrm_url.clone()) {
                Ok(router) => Self::new(Arc::new(router)),
                Err(e) => {
                    warn!(error = %e, "Could not build OSRM client, routing offline");
                    Self::offline()
                }
            }
        } else {
            Self::offline()
        };

        base.with_timeout(config.timeout())
            .with_fallback_waypoints(config.fallback_waypoints)
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_fallback_waypoints(mut self, waypoints: usize) -> Self {
        self.fallback_waypoints = waypoints;
        self
    }

    pub fn fallback_waypoints(&self) -> usize {
        self.fallback_waypoints
    }

    /// Name of the live backend, if one is configured
    pub fn backend_name(&self) -> Option<&'static str> {
        self.backend.as_ref().map(|b| b.name())
    }

    /// Resolve a route from `origin` to `destination`
    ///
    /// Never fails. The returned route always has at least two points.
    pub async fn resolve_route(&self, origin: Coordinate, destination: Coordinate) -> RouteResolution {
        let Some(backend) = &self.backend else {
            return self.fallback(origin, destination, "routing backend not configured".to_string());
        };

        let timer = Timer::start("routing.latency_ms");
        let outcome = match tokio::time::timeout(self.timeout, backend.route(origin, destination)).await {
            Ok(result) => result,
            Err(_) => Err(ProviderError::Timeout {
                backend: backend.name(),
                millis: self.timeout.as_millis(),
            }),
        };
        timer.stop();

        match outcome {
            Ok(route) if route.is_valid() => {
                metrics().increment("routing.live");
                debug!(provider = backend.name(), points = route.len(), "Route resolved");
                RouteResolution::Live {
                    route,
                    provider: backend.name(),
                }
            }
            Ok(route) => self.fallback(
                origin,
                destination,
                format!("{} returned {} point(s)", backend.name(), route.len()),
            ),
            Err(e) => {
                warn!(provider = backend.name(), error = %e, "Routing failed, using straight line");
                self.fallback(origin, destination, e.to_string())
            }
        }
    }

    fn fallback(&self, origin: Coordinate, destination: Coordinate, reason: String) -> RouteResolution {
        metrics().increment("routing.fallback");
        RouteResolution::Fallback {
            route: Route::straight_line(origin, destination, self.fallback_waypoints),
            reason,
        }
    }
}

impl std::fmt::Debug for RouteProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteProvider")
            .field("backend", &self.backend_name())
            .field("timeout", &self.timeout)
            .field("fallback_waypoints", &self.fallback_waypoints)
            .finish()
    }
}
