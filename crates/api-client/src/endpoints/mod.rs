//! Endpoint-specific API implementations
//!
//! Each module provides a typed interface for a specific set of backend endpoints.
//!
//! ## Mapping to the Swiftify backend
//!
//! | Module | Routes | Description |
//! |--------|--------|-------------|
//! | `shipments` | `POST /schedule`, `GET /track/{id}` | Scheduling and public tracking |
//! | `admin` | `POST /admin/login`, `GET /admin/parcels`, `PATCH /admin/parcel/{id}` | Operator dashboard |
//! | `contact` | `POST /contact` | Contact form submissions |
//! | `health` | `GET /health` | Health check |

pub mod admin;
pub mod contact;
pub mod health;
pub mod shipments;

pub use admin::AdminApi;
pub use contact::ContactApi;
pub use health::HealthApi;
pub use shipments::ShipmentsApi;
