//! Client for the Swiftify backend REST API
//!
//! This crate provides a resilient HTTP client for scheduling, tracking and
//! admin operations against the Swiftify backend.
//!
//! # Features
//!
//! - **Environment-based configuration**: Load the API URL and admin token from environment variables
//! - **Retry with exponential backoff**: Automatic retry for transient failures
//! - **Circuit breaker**: Prevent cascading failures during outages
//! - **Rate limiting**: Avoid hitting API throttling limits
//! - **Request correlation**: Track requests with unique IDs for debugging
//!
//! # Example
//!
//! ```rust,no_run
//! use swiftify_api_client::SwiftifyClient;
//! use swiftify_tracking::TrackingId;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = SwiftifyClient::new()?;
//!
//!     let health = client.health().check().await?;
//!     println!("Backend status: {}", health.status);
//!
//!     let record = client.shipments().track(&TrackingId::parse("SWIFT-ABCDEFGH")?).await?;
//!     println!("{} is {}", record.id, record.status);
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod middleware;

pub use client::SwiftifyClient;
pub use config::{ClientConfig, Environment};
pub use error::{ApiError, ApiResult};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::client::SwiftifyClient;
    pub use crate::config::{ClientConfig, Environment};
    pub use crate::endpoints::{AdminApi, ContactApi, HealthApi, ShipmentsApi};
    pub use crate::error::{ApiError, ApiResult};
}
