//! Fuel stop planning for long-haul routes
//!
//! Given a driving route and a catalog of priced fuel stations, this crate
//! picks low-price stations near the route at regular intervals and
//! estimates the fuel cost of the trip:
//!
//! - **Catalog**: price records cleaned, deduplicated and geocoded
//! - **Locator**: stations within a radius, cheapest first
//! - **Planner**: waypoint placement and per-waypoint station choice
//! - **Cost**: per-segment and total fuel consumption and cost
//! - **Report**: rounded, serializable response view
//!
//! # Example
//!
//! ```rust
//! use fuelroute_core::prelude::*;
//! use fuelroute_geo::Coordinate;
//!
//! let stations = vec![Station {
//!     id: StationId::new("1"),
//!     name: "Midway Fuel".into(),
//!     address: "Exit 12".into(),
//!     city: "Nowhere".into(),
//!     state: "KS".into(),
//!     location: Coordinate::new(0.0, 0.5),
//!     price: 3.19,
//! }];
//! let catalog = StationCatalog::from_stations(stations).unwrap();
//! let route = Route::new(69.1, vec![Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 1.0)]);
//!
//! let optimized = Optimizer::new().optimize(&route, &catalog).unwrap();
//! assert_eq!(optimized.result.stops.len(), 1);
//! assert!((optimized.result.total_gallons - 6.91).abs() < 1e-9);
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod catalog;
pub mod config;
pub mod cost;
pub mod error;
pub mod locator;
pub mod optimizer;
pub mod planner;
pub mod report;
pub mod route;

pub use error::{Error, ErrorCode, Result, ResultExt};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::catalog::{GeocodeTable, PriceRecord, Station, StationCatalog, StationId};
    pub use crate::config::{Config, ConfigSchema, SearchConfig, VehicleConfig};
    pub use crate::cost::{aggregate, OptimizationResult, Segment};
    pub use crate::error::{exit_codes, Error, ErrorCode, Result, ResultExt};
    pub use crate::locator::{nearby, StationCandidate};
    pub use crate::optimizer::{Optimized, Optimizer, PlanStats};
    pub use crate::planner::{waypoints, FuelStop, GreedyPlanner, StopPlan, StopPlanner};
    pub use crate::report::PlanReport;
    pub use crate::route::{Endpoint, Route, RouteFile, RouteSource};
}
