//! Configuration loading and schema definitions
//!
//! Vehicle profile, station search radii, data locations and logging
//! settings, read from `fuelroute.toml`.

mod loader;
mod schema;

pub use loader::Config;
pub use schema::*;
