//! Configuration loading and schema definitions
//!
//! Shared `swiftify.toml` configuration used by the provider, session and
//! CLI crates.

mod loader;
mod schema;

pub use loader::Config;
pub use schema::*;
