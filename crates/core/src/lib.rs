//! Core utilities shared by the Swiftify crates
//!
//! This crate provides the ambient plumbing used across the workspace:
//!
//! - **Error handling**: structured errors with codes, context and recovery suggestions
//! - **Configuration**: `swiftify.toml` loading with defaults and environment overrides
//! - **Retry**: backoff policies and a circuit breaker for outbound calls
//! - **Rate limiting**: per-endpoint token buckets
//!
//! # Example
//!
//! ```rust,no_run
//! use swiftify_core::config::Config;
//!
//! let config = Config::load(None).expect("invalid swiftify.toml");
//! println!("simulation tick: {:?}", config.schema.simulation.interval());
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod rate_limit;
pub mod retry;

pub use error::{Error, ErrorCode, Result, ResultExt};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{Config, ConfigSchema};
    pub use crate::error::{exit_codes, Error, ErrorCode, Result, ResultExt};
    pub use crate::rate_limit::{RateLimitConfig, RateLimiter};
    pub use crate::retry::{CircuitBreaker, CircuitBreakerConfig, CircuitState, RetryConfig};
}
