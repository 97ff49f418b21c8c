//! Fuel stop planning along a route.
//!
//! Waypoints are placed at fixed cumulative distances, each waypoint is
//! resolved to a coordinate on the route, and the cheapest station near it
//! becomes the stop. Runner-up stations are kept as alternatives.
//!
//! The greedy planner treats every waypoint independently. It does not
//! backtrack and does not check that consecutive stops are within tank
//! range of each other.

use crate::catalog::Station;
use crate::config::{SearchConfig, VehicleConfig};
use crate::error::{Error, Result};
use crate::locator::{nearby, StationCandidate};
use fuelroute_geo::{point_at_distance, Coordinate};
use serde::Serialize;

/// A chosen station and where on the route it is used.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FuelStop {
    pub station: Station,
    /// Cumulative route distance of the waypoint this stop serves
    pub miles_from_start: f64,
    /// Straight-line distance from the waypoint to the station
    pub distance_from_route_miles: f64,
    /// Runner-up candidates, best first
    pub alternatives: Vec<StationCandidate>,
}

/// Planner output: the stops plus what happened at each waypoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StopPlan {
    /// Stops in strictly increasing `miles_from_start` order
    pub stops: Vec<FuelStop>,
    /// Every waypoint considered, in order
    pub waypoints: Vec<f64>,
    /// Waypoints that needed the widened search radius
    pub widened_searches: usize,
    /// Waypoints with no station even after widening
    pub missed_waypoints: Vec<f64>,
}

/// Turns a route and a station set into fuel stops.
///
/// Alternate strategies (look-ahead, range-checked) implement this trait and
/// plug into [`crate::optimizer::Optimizer`] unchanged.
pub trait StopPlanner {
    /// Plan stops for a route.
    ///
    /// # Errors
    /// Returns an input error for an empty polyline, a non-positive or
    /// non-finite distance, or an empty station set.
    fn plan(
        &self,
        polyline: &[Coordinate],
        total_distance_miles: f64,
        stations: &[Station],
    ) -> Result<StopPlan>;

    /// Vehicle profile the planner spaces waypoints for, if it uses one.
    ///
    /// The optimizer prices the trip with this profile so the reported
    /// vehicle matches the one that shaped the plan.
    fn vehicle(&self) -> Option<&VehicleConfig> {
        None
    }
}

/// Check the caller's side of the planning contract.
pub fn validate_inputs(
    polyline: &[Coordinate],
    total_distance_miles: f64,
    stations: &[Station],
) -> Result<()> {
    if polyline.is_empty() {
        return Err(Error::empty_route());
    }
    if !total_distance_miles.is_finite() || total_distance_miles <= 0.0 {
        return Err(Error::invalid_distance(total_distance_miles));
    }
    if stations.is_empty() {
        return Err(Error::empty_catalog());
    }
    Ok(())
}

/// Cumulative distances at which a refuel is considered.
///
/// Routes within tank range get one optional waypoint at the halfway mark.
/// Longer routes get one every `refuel_interval_miles`, strictly before the
/// destination.
pub fn waypoints(total_distance_miles: f64, vehicle: &VehicleConfig) -> Vec<f64> {
    if total_distance_miles <= vehicle.max_range_miles {
        return vec![total_distance_miles * 0.5];
    }

    (1..)
        .map(|k| vehicle.refuel_interval_miles * k as f64)
        .take_while(|miles| *miles < total_distance_miles)
        .collect()
}

/// Picks the cheapest nearby station at each waypoint.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyPlanner {
    vehicle: VehicleConfig,
    search: SearchConfig,
}

impl GreedyPlanner {
    pub fn new(vehicle: VehicleConfig, search: SearchConfig) -> Self {
        Self { vehicle, search }
    }

    /// Search the primary radius, then the fallback radius once.
    ///
    /// Returns the candidates and whether the fallback was needed.
    fn candidates(&self, point: &Coordinate, stations: &[Station]) -> (Vec<StationCandidate>, bool) {
        let found = nearby(point, stations, self.search.primary_radius_miles, self.search.top_n);
        if !found.is_empty() {
            return (found, false);
        }

        let widened = nearby(point, stations, self.search.fallback_radius_miles, self.search.top_n);
        (widened, true)
    }
}

impl StopPlanner for GreedyPlanner {
    fn plan(
        &self,
        polyline: &[Coordinate],
        total_distance_miles: f64,
        stations: &[Station],
    ) -> Result<StopPlan> {
        validate_inputs(polyline, total_distance_miles, stations)?;

        let mut plan = StopPlan {
            waypoints: waypoints(total_distance_miles, &self.vehicle),
            ..StopPlan::default()
        };

        for &waypoint_miles in &plan.waypoints {
            let point = point_at_distance(polyline, waypoint_miles)?;
            let (candidates, widened) = self.candidates(&point, stations);
            if widened {
                plan.widened_searches += 1;
            }

            let mut candidates = candidates.into_iter();
            let Some(best) = candidates.next() else {
                tracing::warn!(
                    waypoint_miles,
                    lat = point.latitude,
                    lon = point.longitude,
                    radius = self.search.fallback_radius_miles,
                    "No station near waypoint, skipping stop"
                );
                plan.missed_waypoints.push(waypoint_miles);
                continue;
            };

            tracing::debug!(
                waypoint_miles,
                station = %best.station.id,
                price = best.station.price,
                distance = best.distance_miles,
                widened,
                "Stop selected"
            );

            plan.stops.push(FuelStop {
                station: best.station,
                miles_from_start: waypoint_miles,
                distance_from_route_miles: best.distance_miles,
                alternatives: candidates.collect(),
            });
        }

        Ok(plan)
    }

    fn vehicle(&self) -> Option<&VehicleConfig> {
        Some(&self.vehicle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::StationId;
    use crate::error::ErrorCode;
    use fuelroute_geo::haversine_miles;

    fn miles_per_degree() -> f64 {
        haversine_miles(&Coordinate::new(0.0, 0.0), &Coordinate::new(0.0, 1.0))
    }

    /// Straight route east along the equator, `miles` long.
    fn equator_route(miles: f64) -> Vec<Coordinate> {
        let degrees = miles / miles_per_degree();
        let steps = 20;
        (0..=steps)
            .map(|i| Coordinate::new(0.0, degrees * i as f64 / steps as f64))
            .collect()
    }

    fn station(id: &str, miles_east: f64, miles_north: f64, price: f64) -> Station {
        Station {
            id: StationId::new(id),
            name: format!("Stop {}", id),
            address: String::new(),
            city: String::new(),
            state: String::new(),
            location: Coordinate::new(
                miles_north / miles_per_degree(),
                miles_east / miles_per_degree(),
            ),
            price,
        }
    }

    fn planner() -> GreedyPlanner {
        GreedyPlanner::default()
    }

    #[test]
    fn test_short_route_single_midpoint_waypoint() {
        assert_eq!(waypoints(450.0, &VehicleConfig::default()), vec![225.0]);
        assert_eq!(waypoints(500.0, &VehicleConfig::default()), vec![250.0]);
    }

    #[test]
    fn test_long_route_waypoints_every_interval() {
        assert_eq!(waypoints(1000.0, &VehicleConfig::default()), vec![400.0, 800.0]);
        // A waypoint landing exactly on the destination is dropped
        assert_eq!(waypoints(800.0, &VehicleConfig::default()), vec![400.0]);
        assert_eq!(waypoints(2801.0, &VehicleConfig::default()).len(), 7);
    }

    #[test]
    fn test_equator_scenario_midpoint() {
        let route = vec![Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 1.0)];
        let stations = vec![station("mid", 34.585, 0.0, 3.10)];

        let plan = planner().plan(&route, 69.17, &stations).unwrap();

        assert_eq!(plan.waypoints, vec![34.585]);
        assert_eq!(plan.stops.len(), 1);
        let stop = &plan.stops[0];
        assert_eq!(stop.miles_from_start, 34.585);
        assert!(stop.distance_from_route_miles < 0.5);
    }

    #[test]
    fn test_picks_cheapest_and_keeps_alternatives() {
        let route = equator_route(450.0);
        let stations = vec![
            station("a", 225.0, 10.0, 3.50),
            station("b", 225.0, 40.0, 3.00),
            station("c", 230.0, 0.0, 3.20),
            station("d", 220.0, 5.0, 3.90),
        ];

        let plan = planner().plan(&route, 450.0, &stations).unwrap();
        let stop = &plan.stops[0];

        assert_eq!(stop.station.id.as_str(), "b");
        let alt_ids: Vec<&str> = stop.alternatives.iter().map(|c| c.station.id.as_str()).collect();
        assert_eq!(alt_ids, vec!["c", "a"]);
    }

    #[test]
    fn test_widens_radius_when_needed() {
        let route = equator_route(450.0);
        // 100 miles off the route: outside 75, inside 150
        let stations = vec![station("remote", 225.0, 100.0, 3.40)];

        let plan = planner().plan(&route, 450.0, &stations).unwrap();

        assert_eq!(plan.widened_searches, 1);
        assert_eq!(plan.stops.len(), 1);
        assert_eq!(plan.stops[0].station.id.as_str(), "remote");
    }

    #[test]
    fn test_missing_station_skips_waypoint() {
        let route = equator_route(1000.0);
        // Only the 800 mile waypoint has a station nearby
        let stations = vec![station("late", 800.0, 0.0, 3.10)];

        let plan = planner().plan(&route, 1000.0, &stations).unwrap();

        assert_eq!(plan.waypoints, vec![400.0, 800.0]);
        assert_eq!(plan.missed_waypoints, vec![400.0]);
        assert_eq!(plan.stops.len(), 1);
        assert_eq!(plan.stops[0].miles_from_start, 800.0);
    }

    #[test]
    fn test_stops_strictly_increasing() {
        let route = equator_route(2000.0);
        let stations: Vec<Station> = (0..=40)
            .map(|i| station(&i.to_string(), i as f64 * 50.0, 3.0, 3.0 + (i % 7) as f64 * 0.1))
            .collect();

        let plan = planner().plan(&route, 2000.0, &stations).unwrap();

        assert_eq!(plan.stops.len(), 4);
        for pair in plan.stops.windows(2) {
            assert!(pair[0].miles_from_start < pair[1].miles_from_start);
        }
    }

    #[test]
    fn test_input_validation() {
        let route = equator_route(100.0);
        let stations = vec![station("a", 50.0, 0.0, 3.0)];

        let err = planner().plan(&[], 100.0, &stations).unwrap_err();
        assert_eq!(err.code, ErrorCode::EmptyRoute);

        let err = planner().plan(&route, 0.0, &stations).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidDistance);

        let err = planner().plan(&route, f64::NAN, &stations).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidDistance);

        let err = planner().plan(&route, 100.0, &[]).unwrap_err();
        assert_eq!(err.code, ErrorCode::EmptyCatalog);
    }

    #[test]
    fn test_custom_search_config() {
        let route = equator_route(450.0);
        let stations: Vec<Station> = (0..5)
            .map(|i| station(&i.to_string(), 225.0, i as f64, 3.0 + i as f64 * 0.01))
            .collect();
        let search = SearchConfig { top_n: 5, ..SearchConfig::default() };

        let plan = GreedyPlanner::new(VehicleConfig::default(), search)
            .plan(&route, 450.0, &stations)
            .unwrap();

        assert_eq!(plan.stops[0].alternatives.len(), 4);
    }
}
