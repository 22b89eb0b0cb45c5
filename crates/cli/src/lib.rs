//! Terminal helpers for the Swiftify command line
//!
//! - Status messages and value formatting
//! - Spinners for network calls and a delivery progress bar

#![warn(missing_docs)]

pub mod output;
pub mod progress;
