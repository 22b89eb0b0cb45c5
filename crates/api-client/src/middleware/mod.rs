//! Middleware components for request/response processing
//!
//! This module re-exports the resilience components from `swiftify-core`.

pub use swiftify_core::rate_limit::{RateLimitConfig, RateLimitStatus, RateLimiter};
pub use swiftify_core::retry::{CircuitBreaker, CircuitBreakerConfig, CircuitState, RetryConfig};
