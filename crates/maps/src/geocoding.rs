//! Address geocoding.
//!
//! [`GeocodeProvider`] asks each configured backend in preference order
//! (Google when enabled, then Nominatim) and returns the first match. There is
//! no synthetic fallback: when every backend fails or finds nothing the result
//! is [`GeocodeResolution::Unresolved`] and the caller decides what to do.

use crate::error::{ProviderError, Result};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use swiftify_core::config::GeocodingConfig;
use swiftify_core::rate_limit::{RateLimitConfig, RateLimiter};
use swiftify_geo::Coordinate;
use swiftify_telemetry::{metrics, Timer};
use tracing::{debug, warn};

const GOOGLE_GEOCODE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";

/// Bucket key for the Nominatim limiter
const NOMINATIM_BUCKET: &str = "nominatim";

/// A geocoded match
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeocodedAddress {
    pub coordinate: Coordinate,
    /// Human-readable name of the match, when the backend returns one
    pub display_name: Option<String>,
    /// Backend that produced the match
    pub provider: &'static str,
}

/// A service that turns free-text addresses into coordinates
#[async_trait]
pub trait GeocodingBackend: Send + Sync {
    /// Short name used in logs and provenance
    fn name(&self) -> &'static str;

    /// Best match for `query`, or `None` when nothing matched
    async fn geocode(&self, query: &str) -> Result<Option<GeocodedAddress>>;
}

fn http_client() -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .user_agent(concat!("swiftify-maps/", env!("CARGO_PKG_VERSION")))
        .build()?)
}

/// OpenStreetMap Nominatim free-form search
///
/// The public instance allows at most one request per second, so calls wait
/// on a local token bucket before going out.
pub struct NominatimGeocoder {
    client: reqwest::Client,
    base_url: String,
    limiter: RateLimiter,
}

impl NominatimGeocoder {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client: http_client()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            limiter: RateLimiter::new(RateLimitConfig::strict(1, Duration::from_secs(1))),
        })
    }

    async fn wait_for_slot(&self) {
        while !self.limiter.try_acquire(NOMINATIM_BUCKET) {
            let wait = self.limiter.time_until_available(NOMINATIM_BUCKET);
            debug!(wait_ms = wait.as_millis(), "Waiting for Nominatim rate limit");
            tokio::time::sleep(wait.max(Duration::from_millis(10))).await;
        }
    }
}

#[async_trait]
impl GeocodingBackend for NominatimGeocoder {
    fn name(&self) -> &'static str {
        "nominatim"
    }

    async fn geocode(&self, query: &str) -> Result<Option<GeocodedAddress>> {
        self.wait_for_slot().await;

        let resp = self
            .client
            .get(format!("{}/search", self.base_url))
            .query(&[("format", "json"), ("q", query), ("limit", "1")])
            .send()
            .await?;

        let status = resp.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ProviderError::RateLimited("nominatim"));
        }
        if !status.is_success() {
            return Err(ProviderError::Status {
                backend: "nominatim",
                status: status.as_u16(),
            });
        }

        let body: Value = resp.json().await?;
        parse_nominatim_response(&body)
    }
}

/// Parses a Nominatim search response. Coordinates arrive as strings.
pub(crate) fn parse_nominatim_response(body: &Value) -> Result<Option<GeocodedAddress>> {
    let results = body
        .as_array()
        .ok_or_else(|| ProviderError::malformed("Nominatim response is not an array"))?;

    let Some(first) = results.first() else {
        return Ok(None);
    };

    let lat = coordinate_field(first, "lat")?;
    let lon = coordinate_field(first, "lon")?;
    let coordinate =
        Coordinate::try_new(lat, lon).map_err(|e| ProviderError::malformed(e.to_string()))?;

    Ok(Some(GeocodedAddress {
        coordinate,
        display_name: first
            .get("display_name")
            .and_then(Value::as_str)
            .map(String::from),
        provider: "nominatim",
    }))
}

fn coordinate_field(entry: &Value, field: &str) -> Result<f64> {
    let raw = entry
        .get(field)
        .ok_or_else(|| ProviderError::malformed(format!("missing '{field}'")))?;

    match raw {
        Value::String(s) => s
            .parse()
            .map_err(|_| ProviderError::malformed(format!("'{field}' is not a number: {s}"))),
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| ProviderError::malformed(format!("'{field}' is out of range"))),
        other => Err(ProviderError::malformed(format!("'{field}' has unexpected type: {other}"))),
    }
}

/// Google Geocoding API
pub struct GoogleGeocoder {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl GoogleGeocoder {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client: http_client()?,
            base_url: GOOGLE_GEOCODE_URL.to_string(),
            api_key: api_key.into(),
        })
    }

    /// Point at a different endpoint, e.g. a regional mirror
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl GeocodingBackend for GoogleGeocoder {
    fn name(&self) -> &'static str {
        "google"
    }

    async fn geocode(&self, query: &str) -> Result<Option<GeocodedAddress>> {
        let resp = self
            .client
            .get(&self.base_url)
            .query(&[("address", query), ("key", self.api_key.as_str())])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ProviderError::Status {
                backend: "google",
                status: status.as_u16(),
            });
        }

        let body: Value = resp.json().await?;
        parse_google_response(&body)
    }
}

/// Parses a Google Geocoding response.
pub(crate) fn parse_google_response(body: &Value) -> Result<Option<GeocodedAddress>> {
    match body.get("status").and_then(Value::as_str) {
        Some("OK") => {}
        Some("ZERO_RESULTS") => return Ok(None),
        Some("OVER_QUERY_LIMIT") => return Err(ProviderError::RateLimited("google")),
        Some(other) => {
            let message = body
                .get("error_message")
                .and_then(Value::as_str)
                .unwrap_or_default();
            return Err(ProviderError::malformed(format!("Google answered {other}: {message}")));
        }
        None => return Err(ProviderError::malformed("Google response has no status")),
    }

    let Some(first) = body
        .get("results")
        .and_then(Value::as_array)
        .and_then(|results| results.first())
    else {
        return Ok(None);
    };

    let location = first
        .pointer("/geometry/location")
        .ok_or_else(|| ProviderError::malformed("missing geometry.location"))?;
    let lat = location.get("lat").and_then(Value::as_f64);
    let lng = location.get("lng").and_then(Value::as_f64);
    let (Some(lat), Some(lng)) = (lat, lng) else {
        return Err(ProviderError::malformed("geometry.location lacks lat/lng"));
    };

    let coordinate =
        Coordinate::try_new(lat, lng).map_err(|e| ProviderError::malformed(e.to_string()))?;

    Ok(Some(GeocodedAddress {
        coordinate,
        display_name: first
            .get("formatted_address")
            .and_then(Value::as_str)
            .map(String::from),
        provider: "google",
    }))
}

/// Outcome of [`GeocodeProvider::resolve_address`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "result", rename_all = "lowercase")]
pub enum GeocodeResolution {
    Resolved(GeocodedAddress),
    /// No backend produced a match; the caller should ask for manual entry
    Unresolved,
}

impl GeocodeResolution {
    pub fn coordinate(&self) -> Option<Coordinate> {
        match self {
            GeocodeResolution::Resolved(address) => Some(address.coordinate),
            GeocodeResolution::Unresolved => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, GeocodeResolution::Resolved(_))
    }

    pub fn into_address(self) -> Option<GeocodedAddress> {
        match self {
            GeocodeResolution::Resolved(address) => Some(address),
            GeocodeResolution::Unresolved => None,
        }
    }
}

/// Resolves addresses against an ordered list of backends
#[derive(Clone)]
pub struct GeocodeProvider {
    backends: Vec<Arc<dyn GeocodingBackend>>,
    timeout: Duration,
}

impl GeocodeProvider {
    /// Provider trying `backends` in order
    pub fn new(backends: Vec<Arc<dyn GeocodingBackend>>) -> Self {
        Self {
            backends,
            timeout: Duration::from_secs(8),
        }
    }

    /// Build from the `[geocoding]` config section
    ///
    /// Google is consulted first when it has a key and is enabled; Nominatim is
    /// always present as the free backend.
    pub fn from_config(config: &GeocodingConfig) -> Self {
        let mut backends: Vec<Arc<dyn GeocodingBackend>> = Vec::with_capacity(2);

        if config.google_enabled() {
            let key = config.google_api_key.clone().unwrap_or_default();
            match GoogleGeocoder::new(key) {
                Ok(google) => backends.push(Arc::new(google)),
                Err(e) => warn!(error = %e, "Could not build Google geocoder"),
            }
        }

        match NominatimGeocoder::new(config.nominatim_url.clone()) {
            Ok(nominatim) => backends.push(Arc::new(nominatim)),
            Err(e) => warn!(error = %e, "Could not build Nominatim geocoder"),
        }

        Self::new(backends).with_timeout(config.timeout())
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Names of the configured backends, in preference order
    pub fn backend_names(&self) -> Vec<&'static str> {
        self.backends.iter().map(|b| b.name()).collect()
    }

    /// Resolve `text` to a coordinate
    ///
    /// Network failures, timeouts and empty results all map to
    /// [`GeocodeResolution::Unresolved`]; this never returns an error.
    pub async fn resolve_address(&self, text: &str) -> GeocodeResolution {
        let query = text.trim();
        if query.is_empty() {
            return GeocodeResolution::Unresolved;
        }

        let _timer = Timer::start("geocoding.latency_ms");

        for backend in &self.backends {
            let outcome = match tokio::time::timeout(self.timeout, backend.geocode(query)).await {
                Ok(result) => result,
                Err(_) => Err(ProviderError::Timeout {
                    backend: backend.name(),
                    millis: self.timeout.as_millis(),
                }),
            };

            match outcome {
                Ok(Some(address)) => {
                    metrics().increment("geocoding.resolved");
                    debug!(provider = backend.name(), coordinate = %address.coordinate, "Address resolved");
                    return GeocodeResolution::Resolved(address);
                }
                Ok(None) => debug!(provider = backend.name(), query, "No geocoding match"),
                Err(e) => warn!(provider = backend.name(), error = %e, "Geocoding failed"),
            }
        }

        metrics().increment("geocoding.unresolved");
        GeocodeResolution::Unresolved
    }
}

impl std::fmt::Debug for GeocodeProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeocodeProvider")
            .field("backends", &self.backend_names())
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedGeocoder {
        name: &'static str,
        answer: Option<Coordinate>,
        calls: AtomicUsize,
    }

    impl FixedGeocoder {
        fn new(name: &'static str, answer: Option<Coordinate>) -> Arc<Self> {
            Arc::new(Self {
                name,
                answer,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl GeocodingBackend for FixedGeocoder {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn geocode(&self, _query: &str) -> Result<Option<GeocodedAddress>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.answer.map(|coordinate| GeocodedAddress {
                coordinate,
                display_name: None,
                provider: self.name,
            }))
        }
    }

    struct DownGeocoder;

    #[async_trait]
    impl GeocodingBackend for DownGeocoder {
        fn name(&self) -> &'static str {
            "down"
        }

        async fn geocode(&self, _query: &str) -> Result<Option<GeocodedAddress>> {
            Err(ProviderError::Status {
                backend: "down",
                status: 502,
            })
        }
    }

    struct StalledGeocoder;

    #[async_trait]
    impl GeocodingBackend for StalledGeocoder {
        fn name(&self) -> &'static str {
            "stalled"
        }

        async fn geocode(&self, _query: &str) -> Result<Option<GeocodedAddress>> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(None)
        }
    }

    const SF: Coordinate = Coordinate::new(37.7749, -122.4194);

    #[tokio::test]
    async fn test_first_match_wins() {
        let first = FixedGeocoder::new("first", Some(SF));
        let second = FixedGeocoder::new("second", Some(Coordinate::new(0.0, 0.0)));
        let provider = GeocodeProvider::new(vec![first.clone(), second.clone()]);

        let resolution = provider.resolve_address("San Francisco, CA").await;
        assert_eq!(resolution.coordinate(), Some(SF));
        assert_eq!(second.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failure_falls_through_to_next_backend() {
        let nominatim = FixedGeocoder::new("nominatim", Some(SF));
        let provider = GeocodeProvider::new(vec![Arc::new(DownGeocoder), nominatim]);

        let address = provider.resolve_address("San Francisco").await.into_address().unwrap();
        assert_eq!(address.provider, "nominatim");
    }

    #[tokio::test]
    async fn test_no_match_is_unresolved() {
        let provider = GeocodeProvider::new(vec![
            FixedGeocoder::new("empty", None),
            Arc::new(DownGeocoder),
        ]);
        assert_eq!(provider.resolve_address("nowhere").await, GeocodeResolution::Unresolved);
    }

    #[tokio::test]
    async fn test_blank_query_skips_backends() {
        let backend = FixedGeocoder::new("fixed", Some(SF));
        let provider = GeocodeProvider::new(vec![backend.clone()]);

        assert!(!provider.resolve_address("   ").await.is_resolved());
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_is_unresolved() {
        let provider = GeocodeProvider::new(vec![Arc::new(StalledGeocoder)])
            .with_timeout(Duration::from_secs(2));
        assert_eq!(provider.resolve_address("slow street").await, GeocodeResolution::Unresolved);
    }

    #[tokio::test]
    async fn test_no_backends_is_unresolved() {
        let provider = GeocodeProvider::new(Vec::new());
        assert!(!provider.resolve_address("anything").await.is_resolved());
    }

    #[test]
    fn test_from_config_backend_order() {
        let config = GeocodingConfig::default();
        assert_eq!(GeocodeProvider::from_config(&config).backend_names(), vec!["nominatim"]);

        let keyed_but_disabled = GeocodingConfig {
            google_api_key: Some("key".into()),
            ..GeocodingConfig::default()
        };
        assert_eq!(
            GeocodeProvider::from_config(&keyed_but_disabled).backend_names(),
            vec!["nominatim"]
        );

        let enabled = GeocodingConfig {
            google_api_key: Some("key".into()),
            enable_google: true,
            ..GeocodingConfig::default()
        };
        assert_eq!(
            GeocodeProvider::from_config(&enabled).backend_names(),
            vec!["google", "nominatim"]
        );
    }

    #[test]
    fn test_parse_nominatim_result() {
        let body = json!([{
            "lat": "37.7790262",
            "lon": "-122.419906",
            "display_name": "San Francisco, California, United States"
        }]);

        let address = parse_nominatim_response(&body).unwrap().unwrap();
        assert!((address.coordinate.latitude - 37.779_026_2).abs() < 1e-9);
        assert!((address.coordinate.longitude + 122.419_906).abs() < 1e-9);
        assert_eq!(
            address.display_name.as_deref(),
            Some("San Francisco, California, United States")
        );
    }

    #[test]
    fn test_parse_nominatim_empty() {
        assert!(parse_nominatim_response(&json!([])).unwrap().is_none());
    }

    #[test]
    fn test_parse_nominatim_malformed() {
        assert!(parse_nominatim_response(&json!({"error": "bad"})).is_err());
        assert!(parse_nominatim_response(&json!([{"lat": "north", "lon": "0"}])).is_err());
        assert!(parse_nominatim_response(&json!([{"lat": "95.0", "lon": "0"}])).is_err());
    }

    #[test]
    fn test_parse_google_result() {
        let body = json!({
            "status": "OK",
            "results": [{
                "formatted_address": "Los Angeles, CA, USA",
                "geometry": {"location": {"lat": 34.0522, "lng": -118.2437}}
            }]
        });

        let address = parse_google_response(&body).unwrap().unwrap();
        assert_eq!(address.coordinate, Coordinate::new(34.0522, -118.2437));
        assert_eq!(address.provider, "google");
    }

    #[test]
    fn test_parse_google_statuses() {
        assert!(parse_google_response(&json!({"status": "ZERO_RESULTS", "results": []}))
            .unwrap()
            .is_none());
        assert!(matches!(
            parse_google_response(&json!({"status": "OVER_QUERY_LIMIT"})),
            Err(ProviderError::RateLimited("google"))
        ));
        assert!(parse_google_response(&json!({"status": "REQUEST_DENIED", "error_message": "bad key"})).is_err());
    }
}
