//! End-to-end planning: route + catalog in, fuel estimate out.

use crate::catalog::StationCatalog;
use crate::config::ConfigSchema;
use crate::cost::{aggregate, OptimizationResult};
use crate::error::{Error, Result};
use crate::planner::{GreedyPlanner, StopPlanner};
use crate::route::Route;
use serde::Serialize;

/// What the planner saw while building the result.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlanStats {
    pub waypoints: usize,
    pub stops: usize,
    pub widened_searches: usize,
    pub missed_waypoints: Vec<f64>,
}

/// An optimization result with its planning statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Optimized {
    pub result: OptimizationResult,
    pub stats: PlanStats,
}

/// Runs a [`StopPlanner`] and prices its stops.
#[derive(Debug, Clone)]
pub struct Optimizer<P = GreedyPlanner> {
    planner: P,
    config: ConfigSchema,
}

impl Optimizer<GreedyPlanner> {
    /// Greedy planner with default settings.
    pub fn new() -> Self {
        Self::from_config(ConfigSchema::default())
    }

    /// Greedy planner with the configured vehicle and search settings.
    pub fn from_config(config: ConfigSchema) -> Self {
        let planner = GreedyPlanner::new(config.vehicle, config.search);
        Self { planner, config }
    }
}

impl Default for Optimizer<GreedyPlanner> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: StopPlanner> Optimizer<P> {
    /// Wrap a custom planner.
    ///
    /// Fuel math uses the planner's own vehicle profile when it reports one,
    /// and `config.vehicle` otherwise.
    pub fn with_planner(planner: P, config: ConfigSchema) -> Self {
        Self { planner, config }
    }

    /// Plan stops along `route` and price the trip.
    ///
    /// Fails only on invalid input; waypoints without a nearby station just
    /// produce fewer stops.
    pub fn optimize(&self, route: &Route, catalog: &StationCatalog) -> Result<Optimized> {
        let plan = self
            .planner
            .plan(&route.polyline, route.total_distance_miles, catalog.stations())?;

        let fallback_price = catalog.average_price().ok_or_else(Error::empty_catalog)?;

        let stats = PlanStats {
            waypoints: plan.waypoints.len(),
            stops: plan.stops.len(),
            widened_searches: plan.widened_searches,
            missed_waypoints: plan.missed_waypoints,
        };

        let vehicle = self.planner.vehicle().unwrap_or(&self.config.vehicle);
        let result = aggregate(plan.stops, route.total_distance_miles, fallback_price, vehicle);

        tracing::info!(
            distance_miles = result.total_distance_miles,
            stops = stats.stops,
            missed = stats.missed_waypoints.len(),
            gallons = result.total_gallons,
            total_cost = result.total_cost,
            "Route optimized"
        );

        Ok(Optimized { result, stats })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Station, StationId};
    use crate::config::{SearchConfig, VehicleConfig};
    use crate::error::ErrorCode;
    use crate::planner::StopPlan;
    use fuelroute_geo::{haversine_miles, Coordinate};

    fn miles_per_degree() -> f64 {
        haversine_miles(&Coordinate::new(0.0, 0.0), &Coordinate::new(0.0, 1.0))
    }

    fn route(miles: f64) -> Route {
        let degrees = miles / miles_per_degree();
        Route::new(
            miles,
            (0..=10).map(|i| Coordinate::new(0.0, degrees * i as f64 / 10.0)).collect(),
        )
    }

    fn station(id: &str, miles_east: f64, price: f64) -> Station {
        Station {
            id: StationId::new(id),
            name: id.to_string(),
            address: String::new(),
            city: String::new(),
            state: String::new(),
            location: Coordinate::new(0.0, miles_east / miles_per_degree()),
            price,
        }
    }

    #[test]
    fn test_optimize_long_route() {
        let catalog = StationCatalog::from_stations(vec![
            station("a", 410.0, 3.00),
            station("b", 790.0, 4.00),
            station("c", 600.0, 2.00),
        ])
        .unwrap();

        let optimized = Optimizer::new().optimize(&route(1000.0), &catalog).unwrap();
        let result = &optimized.result;

        assert_eq!(optimized.stats.waypoints, 2);
        assert_eq!(result.stops.len(), 2);
        assert_eq!(result.stops[0].station.id.as_str(), "a");
        assert_eq!(result.stops[1].station.id.as_str(), "b");
        assert_eq!(result.average_price, 3.5);
        assert_eq!(result.segments.len(), 3);
    }

    #[test]
    fn test_no_station_anywhere_uses_catalog_average() {
        // Every station is far from the route
        let catalog = StationCatalog::from_stations(vec![
            station("x", 5000.0, 3.00),
            station("y", 5200.0, 4.00),
        ])
        .unwrap();

        let optimized = Optimizer::new().optimize(&route(450.0), &catalog).unwrap();

        assert!(optimized.result.stops.is_empty());
        assert!(optimized.result.segments.is_empty());
        assert_eq!(optimized.stats.missed_waypoints, vec![225.0]);
        assert_eq!(optimized.result.average_price, 3.5);
        assert!((optimized.result.total_cost - 45.0 * 3.5).abs() < 1e-9);
    }

    #[test]
    fn test_empty_catalog_is_invalid_input() {
        let err = Optimizer::new()
            .optimize(&route(100.0), &StationCatalog::default())
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::EmptyCatalog);
    }

    struct NoStops;

    impl StopPlanner for NoStops {
        fn plan(&self, _: &[Coordinate], _: f64, _: &[Station]) -> Result<StopPlan> {
            Ok(StopPlan::default())
        }
    }

    #[test]
    fn test_prices_with_planner_vehicle() {
        let catalog = StationCatalog::from_stations(vec![station("a", 50.0, 3.0)]).unwrap();
        let vehicle = VehicleConfig { mpg: 5.0, ..VehicleConfig::default() };
        let planner = GreedyPlanner::new(vehicle, SearchConfig::default());

        let optimized = Optimizer::with_planner(planner, ConfigSchema::default())
            .optimize(&route(100.0), &catalog)
            .unwrap();

        assert_eq!(optimized.result.vehicle.mpg, 5.0);
        assert!((optimized.result.total_gallons - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_custom_planner() {
        let catalog = StationCatalog::from_stations(vec![station("a", 10.0, 2.0)]).unwrap();
        let optimized = Optimizer::with_planner(NoStops, ConfigSchema::default())
            .optimize(&route(100.0), &catalog)
            .unwrap();
        assert!(optimized.result.stops.is_empty());
        assert_eq!(optimized.result.average_price, 2.0);
    }
}
