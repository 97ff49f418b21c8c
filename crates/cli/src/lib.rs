//! Terminal helpers for the fuelroute command line
//!
//! Provides shared CLI functionality:
//! - Status messages and number formatting
//! - Human-readable plan summaries
//! - Spinners for slow loads

#![warn(missing_docs)]

pub mod output;
pub mod progress;
