//! Shipment tracking for Swiftify
//!
//! - [`TrackingId`]: generation and validation of `SWIFT-` identifiers
//! - [`CostEstimator`]: price quotes from weight class and distance
//! - [`eta`]: delivery time estimates
//! - [`ShipmentRecord`]: the tracked shipment as stored locally and by the backend
//! - [`ParcelSimulator`]: timed movement of a parcel along its route
//!
//! # Example
//!
//! ```
//! use swiftify_tracking::{CostEstimator, TrackingId, WeightClass};
//!
//! let id = TrackingId::generate();
//! assert!(TrackingId::is_valid(id.as_str()));
//!
//! let quote = CostEstimator::default().estimate(&WeightClass::from_label("1-5kg"), 100.0);
//! assert_eq!(quote, 18.0);
//! ```

pub mod demo;
mod error;
pub mod eta;
pub mod pricing;
pub mod shipment;
pub mod simulator;
mod tracking_id;

pub use error::{Result, TrackingError, TrackingErrorCode};
pub use pricing::{CostEstimator, WeightClass};
pub use shipment::{
    Contact, Dimensions, HistoryEvent, ParcelDetails, RoutePoint, ScheduleRequest, ShipmentRecord,
    ShipmentStats, ShipmentStatus, ShipmentUpdate, TrackingMode,
};
pub use simulator::{ParcelSimulator, PositionUpdate, SimulationHandle, SimulationState, SimulatorPhase};
pub use tracking_id::{TrackingId, PREFIX};
