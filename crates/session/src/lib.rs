//! Scheduling, tracking and admin workflows for Swiftify
//!
//! Every workflow takes its collaborators from an explicit [`SessionContext`]
//! built at the top of the call stack: route and geocode providers, the cost
//! estimator, the local [`ShipmentStore`] and, optionally, the remote
//! [`ShipmentBackend`].
//!
//! Backend outages degrade instead of failing:
//!
//! - scheduling mints a local ID and stores the record ([`Scheduled::Local`])
//! - tracking falls back to the local store, then a demo record
//!   ([`Provenance`])
//!
//! # Example
//!
//! ```
//! use swiftify_session::{Provenance, SessionContext};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), swiftify_session::SessionError> {
//! let ctx = SessionContext::in_memory();
//! let lookup = ctx.tracking().lookup("SWIFT-ABCDEFGH").await?;
//! assert_eq!(lookup.provenance, Provenance::Demo);
//! # Ok(())
//! # }
//! ```

pub mod admin;
pub mod backend;
pub mod context;
mod error;
pub mod scheduling;
pub mod store;
pub mod tracking;

#[cfg(test)]
mod test_support;

pub use admin::AdminSession;
pub use backend::ShipmentBackend;
pub use context::SessionContext;
pub use error::{AddressRole, Result, SessionError, SessionErrorCode};
pub use scheduling::{Quote, Scheduled, SchedulingSession};
pub use store::{FileStore, MemoryStore, ShipmentStore};
pub use tracking::{LiveTracking, Provenance, TrackingLookup, TrackingSession};
