//! Main API client implementation

use crate::config::ClientConfig;
use crate::endpoints::{AdminApi, ContactApi, HealthApi, ShipmentsApi};
use crate::error::{ApiError, ApiResult};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use swiftify_core::rate_limit::RateLimiter;
use swiftify_core::retry::{CircuitBreaker, CircuitBreakerConfig, CircuitState};
use tracing::{debug, instrument, warn};
use uuid::Uuid;

/// Request correlation ID header
const X_REQUEST_ID: &str = "X-Request-ID";

/// Swiftify backend client with built-in resilience patterns
///
/// This client wraps `reqwest` and adds:
/// - Automatic retry with exponential backoff
/// - Circuit breaker to prevent cascading failures
/// - Rate limiting to avoid throttling
/// - Request correlation IDs for tracing
///
/// Clones share the circuit breaker and rate limiter.
#[derive(Clone)]
pub struct SwiftifyClient {
    inner: Client,
    config: Arc<ClientConfig>,
    bearer_token: Option<Arc<str>>,
    circuit_breaker: Arc<CircuitBreaker>,
    rate_limiter: Arc<RateLimiter>,
}

impl SwiftifyClient {
    /// Create a new client with default configuration from environment
    pub fn new() -> ApiResult<Self> {
        let config = ClientConfig::from_env()?;
        Self::with_config(config)
    }

    /// Create a new client with specific configuration
    pub fn with_config(config: ClientConfig) -> ApiResult<Self> {
        config.validate()?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        default_headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("swiftify-api-client/", env!("CARGO_PKG_VERSION"))),
        );

        let inner = Client::builder()
            .timeout(config.timeout)
            .default_headers(default_headers)
            .build()
            .map_err(ApiError::Request)?;

        let circuit_breaker = Arc::new(CircuitBreaker::new(CircuitBreakerConfig::default()));
        let rate_limiter = Arc::new(RateLimiter::new(config.rate_limit.clone()));
        let bearer_token = config.admin_token.as_deref().map(Arc::from);

        Ok(Self {
            inner,
            config: Arc::new(config),
            bearer_token,
            circuit_breaker,
            rate_limiter,
        })
    }

    /// A client that sends `token` as a bearer token on every request
    #[must_use]
    pub fn with_bearer_token(&self, token: impl AsRef<str>) -> Self {
        Self {
            bearer_token: Some(Arc::from(token.as_ref())),
            ..self.clone()
        }
    }

    /// Whether a bearer token is attached
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.bearer_token.is_some()
    }

    /// Get the current configuration
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Get the base URL
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Get circuit breaker state
    #[must_use]
    pub fn circuit_state(&self) -> CircuitState {
        self.circuit_breaker.state()
    }

    /// Reset the circuit breaker
    pub fn reset_circuit(&self) {
        self.circuit_breaker.reset();
    }

    /// Reset rate limits for a specific endpoint
    pub fn reset_rate_limit(&self, endpoint: &str) {
        self.rate_limiter.reset(endpoint);
    }

    // -------------------------------------------------------------------------
    // Endpoint API accessors
    // -------------------------------------------------------------------------

    /// Access shipment scheduling and tracking endpoints
    #[must_use]
    pub fn shipments(&self) -> ShipmentsApi {
        ShipmentsApi::new(self.clone())
    }

    /// Access admin endpoints
    #[must_use]
    pub fn admin(&self) -> AdminApi {
        AdminApi::new(self.clone())
    }

    /// Access the contact form endpoint
    #[must_use]
    pub fn contact(&self) -> ContactApi {
        ContactApi::new(self.clone())
    }

    /// Access health check endpoints
    #[must_use]
    pub fn health(&self) -> HealthApi {
        HealthApi::new(self.clone())
    }

    // -------------------------------------------------------------------------
    // Low-level HTTP methods with resilience
    // -------------------------------------------------------------------------

    /// Perform a GET request with resilience patterns
    #[instrument(skip(self), fields(request_id))]
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.request(Method::GET, path, Option::<&()>::None).await
    }

    /// Perform a POST request with resilience patterns
    #[instrument(skip(self, body), fields(request_id))]
    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        self.request(Method::POST, path, Some(body)).await
    }

    /// Perform a PATCH request with resilience patterns
    #[instrument(skip(self, body), fields(request_id))]
    pub async fn patch<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        self.request(Method::PATCH, path, Some(body)).await
    }

    /// Absolute URL for a path under the base URL
    #[must_use]
    pub fn url_for(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Execute a request with full resilience patterns
    async fn request<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> ApiResult<T> {
        let url = self.url_for(path);
        let request_id = Uuid::new_v4().to_string();
        tracing::Span::current().record("request_id", request_id.as_str());
        let rate_limit_key = extract_rate_limit_key(path);

        // Check circuit breaker
        if !self.circuit_breaker.can_execute() {
            warn!(
                request_id = %request_id,
                url = %url,
                "Circuit breaker is open, rejecting request"
            );
            return Err(ApiError::CircuitOpen);
        }

        // Check rate limiter
        if !self.rate_limiter.try_acquire(&rate_limit_key) {
            warn!(
                request_id = %request_id,
                url = %url,
                retry_in_ms = self.rate_limiter.time_until_available(&rate_limit_key).as_millis() as u64,
                "Rate limited"
            );
            return Err(ApiError::RateLimited);
        }

        // Execute with retry
        self.execute_with_retry(&request_id, method, &url, body)
            .await
    }

    /// Execute request with retry logic
    async fn execute_with_retry<T: DeserializeOwned, B: Serialize>(
        &self,
        request_id: &str,
        method: Method,
        url: &str,
        body: Option<&B>,
    ) -> ApiResult<T> {
        let retry_config = &self.config.retry;
        let mut last_error: Option<ApiError> = None;

        for attempt in 0..retry_config.max_attempts {
            // Wait before retry (except first attempt)
            if attempt > 0 {
                let delay = retry_config.delay_for_attempt(attempt);
                debug!(
                    request_id = %request_id,
                    attempt = attempt,
                    delay_ms = delay.as_millis(),
                    "Retrying after delay"
                );
                tokio::time::sleep(delay).await;
            }

            let start = Instant::now();
            let result = self
                .execute_single_request(request_id, method.clone(), url, body)
                .await;
            let elapsed = start.elapsed();

            match result {
                Ok(value) => {
                    self.circuit_breaker.record_success();
                    debug!(
                        request_id = %request_id,
                        attempt = attempt + 1,
                        elapsed_ms = elapsed.as_millis(),
                        "Request succeeded"
                    );
                    return Ok(value);
                }
                Err(e) => {
                    // A 4xx is an answer, not an outage
                    if e.is_client_error() {
                        self.circuit_breaker.record_success();
                    } else {
                        self.circuit_breaker.record_failure();
                    }

                    if e.is_retryable() && attempt + 1 < retry_config.max_attempts {
                        debug!(
                            request_id = %request_id,
                            attempt = attempt + 1,
                            error = %e,
                            "Request failed, will retry"
                        );
                        last_error = Some(e);
                    } else {
                        debug!(
                            request_id = %request_id,
                            attempt = attempt + 1,
                            error = %e,
                            "Request failed, not retrying"
                        );
                        return Err(e);
                    }
                }
            }
        }

        Err(ApiError::RetriesExhausted {
            attempts: retry_config.max_attempts,
            last_error: last_error.map_or_else(|| "Unknown error".to_string(), |e| e.to_string()),
        })
    }

    /// Execute a single request without retry
    async fn execute_single_request<T: DeserializeOwned, B: Serialize>(
        &self,
        request_id: &str,
        method: Method,
        url: &str,
        body: Option<&B>,
    ) -> ApiResult<T> {
        let mut request = self
            .inner
            .request(method, url)
            .header(X_REQUEST_ID, request_id);

        if let Some(ref token) = self.bearer_token {
            request = request.header(AUTHORIZATION, format!("Bearer {token}"));
        }

        if let Some(b) = body {
            request = request.json(b);
        }

        let response = request.send().await?;
        self.handle_response(response).await
    }

    /// Handle HTTP response and deserialize
    async fn handle_response<T: DeserializeOwned>(&self, response: Response) -> ApiResult<T> {
        let status = response.status();

        if status.is_success() {
            response.json().await.map_err(ApiError::Request)
        } else {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            Err(ApiError::api_response(status.as_u16(), error_message(&body)))
        }
    }

    /// Get duration timing for a request
    pub async fn timed_get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<(T, Duration)> {
        let start = Instant::now();
        let result = self.get(path).await?;
        Ok((result, start.elapsed()))
    }
}

/// Error body shape used by the backend: `{"detail": "..."}`
#[derive(Deserialize)]
struct ErrorBody {
    detail: String,
}

/// Extract the backend's error detail, falling back to the raw body
fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => parsed.detail,
        Err(_) if body.trim().is_empty() => "An error occurred".to_string(),
        Err(_) => body.to_string(),
    }
}

/// Extract a rate limit key from a request path (its first segment)
fn extract_rate_limit_key(path: &str) -> String {
    path.split('?')
        .next()
        .and_then(|s| s.trim_start_matches('/').split('/').next())
        .filter(|s| !s.is_empty())
        .unwrap_or("default")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_rate_limit_key() {
        assert_eq!(extract_rate_limit_key("track/SWIFT-ABCDEFGH"), "track");
        assert_eq!(extract_rate_limit_key("/admin/parcels?limit=5"), "admin");
        assert_eq!(extract_rate_limit_key("health"), "health");
        assert_eq!(extract_rate_limit_key(""), "default");
    }

    #[test]
    fn test_error_message_prefers_detail() {
        assert_eq!(error_message(r#"{"detail": "Tracking ID not found"}"#), "Tracking ID not found");
        assert_eq!(error_message("Bad Gateway"), "Bad Gateway");
        assert_eq!(error_message(""), "An error occurred");
    }

    #[test]
    fn test_url_for_joins_cleanly() {
        let client = SwiftifyClient::with_config(
            ClientConfig::default().with_base_url("http://localhost:8000/api/"),
        )
        .unwrap();
        assert_eq!(client.url_for("/track/SWIFT-ABCDEFGH"), "http://localhost:8000/api/track/SWIFT-ABCDEFGH");
    }

    #[test]
    fn test_client_creation() {
        let client = SwiftifyClient::with_config(ClientConfig::default()).unwrap();
        assert!(!client.is_authenticated());
        assert_eq!(client.circuit_state(), CircuitState::Closed);

        let admin = client.with_bearer_token("abc");
        assert!(admin.is_authenticated());
        assert!(!client.is_authenticated());
    }

    #[test]
    fn test_client_rejects_invalid_config() {
        let result = SwiftifyClient::with_config(ClientConfig::default().with_base_url("localhost"));
        assert!(matches!(result, Err(ApiError::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_unavailable() {
        // Port 9 (discard) is closed on test machines
        let config = ClientConfig::default()
            .with_base_url("http://127.0.0.1:9/api")
            .with_retry(swiftify_core::retry::RetryConfig::no_retry());
        let client = SwiftifyClient::with_config(config).unwrap();

        let err = client.get::<serde_json::Value>("health").await.unwrap_err();
        assert!(err.is_unavailable(), "unexpected error: {err}");
    }
}
