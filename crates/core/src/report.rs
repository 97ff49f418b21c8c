//! Serializable response view of an optimization.
//!
//! Values are rounded for display here and nowhere else: miles to 0.1,
//! prices to 0.001, gallons and dollars to 0.01.

use crate::cost::{OptimizationResult, Segment};
use crate::locator::StationCandidate;
use crate::optimizer::Optimized;
use crate::planner::FuelStop;
use crate::error::Result;
use crate::route::{Endpoint, Route};
use fuelroute_geo::encoding::{self, DEFAULT_MAX_POINTS};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct PlanReport {
    pub route: RouteSummary,
    pub fuel_optimization: FuelOptimization,
}

#[derive(Debug, Clone, Serialize)]
pub struct RouteSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<Endpoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<Endpoint>,
    pub total_distance_miles: f64,
    pub estimated_duration_hours: f64,
    /// Encoded polyline, precision 5
    pub polyline: String,
    /// Thinned geometry for map rendering
    pub waypoints: Vec<LatLon>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct FuelOptimization {
    pub fuel_stops: Vec<StopView>,
    pub segments: Vec<SegmentView>,
    pub summary: Summary,
}

#[derive(Debug, Clone, Serialize)]
pub struct StopView {
    pub station_id: String,
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub lat: f64,
    pub lon: f64,
    pub retail_price_per_gallon: f64,
    pub miles_from_start: f64,
    pub alternatives: Vec<AlternativeView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AlternativeView {
    pub station_id: String,
    pub name: String,
    pub city: String,
    pub state: String,
    pub price: f64,
    pub lat: f64,
    pub lon: f64,
    pub distance_miles: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SegmentView {
    pub from_miles: f64,
    pub to_miles: f64,
    pub segment_miles: f64,
    pub gallons_needed: f64,
    pub cost_usd: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub total_fuel_stops: usize,
    pub total_distance_miles: f64,
    pub total_gallons_needed: f64,
    pub average_price_per_gallon: f64,
    pub total_fuel_cost_usd: f64,
    pub vehicle_mpg: f64,
    pub vehicle_max_range_miles: f64,
    /// Waypoints where no station was found
    pub uncovered_waypoints: Vec<f64>,
}

impl PlanReport {
    /// Build the report for a route and its optimization.
    pub fn new(route: &Route, optimized: &Optimized) -> Result<Self> {
        let result = &optimized.result;

        let route_summary = RouteSummary {
            start: route.start.clone(),
            end: route.end.clone(),
            total_distance_miles: round_to(result.total_distance_miles, 1),
            estimated_duration_hours: round_to(route.duration_hours(), 2),
            polyline: encoding::encode(&route.polyline)?,
            waypoints: encoding::thin(&route.polyline, DEFAULT_MAX_POINTS)
                .into_iter()
                .map(|c| LatLon { lat: c.latitude, lon: c.longitude })
                .collect(),
        };

        Ok(Self {
            route: route_summary,
            fuel_optimization: FuelOptimization {
                fuel_stops: result.stops.iter().map(StopView::from).collect(),
                segments: result.segments.iter().map(SegmentView::from).collect(),
                summary: Summary::new(result, &optimized.stats.missed_waypoints),
            },
        })
    }
}

impl Summary {
    fn new(result: &OptimizationResult, missed: &[f64]) -> Self {
        Self {
            total_fuel_stops: result.stop_count(),
            total_distance_miles: round_to(result.total_distance_miles, 1),
            total_gallons_needed: round_to(result.total_gallons, 2),
            average_price_per_gallon: round_to(result.average_price, 3),
            total_fuel_cost_usd: round_to(result.total_cost, 2),
            vehicle_mpg: result.vehicle.mpg,
            vehicle_max_range_miles: result.vehicle.max_range_miles,
            uncovered_waypoints: missed.iter().map(|m| round_to(*m, 1)).collect(),
        }
    }
}

impl From<&FuelStop> for StopView {
    fn from(stop: &FuelStop) -> Self {
        let station = &stop.station;
        Self {
            station_id: station.id.to_string(),
            name: station.name.clone(),
            address: station.address.clone(),
            city: station.city.clone(),
            state: station.state.clone(),
            lat: station.location.latitude,
            lon: station.location.longitude,
            retail_price_per_gallon: round_to(station.price, 3),
            miles_from_start: round_to(stop.miles_from_start, 1),
            alternatives: stop.alternatives.iter().map(AlternativeView::from).collect(),
        }
    }
}

impl From<&StationCandidate> for AlternativeView {
    fn from(candidate: &StationCandidate) -> Self {
        let station = &candidate.station;
        Self {
            station_id: station.id.to_string(),
            name: station.name.clone(),
            city: station.city.clone(),
            state: station.state.clone(),
            price: round_to(station.price, 3),
            lat: station.location.latitude,
            lon: station.location.longitude,
            distance_miles: round_to(candidate.distance_miles, 1),
        }
    }
}

impl From<&Segment> for SegmentView {
    fn from(segment: &Segment) -> Self {
        Self {
            from_miles: round_to(segment.from_miles, 1),
            to_miles: round_to(segment.to_miles, 1),
            segment_miles: round_to(segment.miles, 1),
            gallons_needed: round_to(segment.gallons, 2),
            cost_usd: round_to(segment.cost, 2),
        }
    }
}

/// Round half away from zero to `places` decimals.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Station, StationCatalog, StationId};
    use crate::optimizer::Optimizer;
    use fuelroute_geo::{haversine_miles, Coordinate};

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(3.14159, 3), 3.142);
        assert_eq!(round_to(34.56, 1), 34.6);
        assert_eq!(round_to(12.0, 2), 12.0);
    }

    #[test]
    fn test_report_shape() {
        let per_degree = haversine_miles(&Coordinate::new(0.0, 0.0), &Coordinate::new(0.0, 1.0));
        let route = Route {
            total_distance_miles: 69.0,
            duration_seconds: 3600.0,
            polyline: vec![Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 1.0)],
            start: Some(Endpoint { label: "A".into(), lat: 0.0, lon: 0.0 }),
            end: Some(Endpoint { label: "B".into(), lat: 0.0, lon: 1.0 }),
        };
        let catalog = StationCatalog::from_stations(vec![Station {
            id: StationId::new("42"),
            name: "Midway".into(),
            address: "Exit 12".into(),
            city: "Nowhere".into(),
            state: "XX".into(),
            location: Coordinate::new(0.0, 30.0 / per_degree),
            price: 3.45678,
        }])
        .unwrap();

        let optimized = Optimizer::new().optimize(&route, &catalog).unwrap();
        let report = PlanReport::new(&route, &optimized).unwrap();
        let json = serde_json::to_value(&report).unwrap();

        let stop = &json["fuel_optimization"]["fuel_stops"][0];
        assert_eq!(stop["station_id"], "42");
        assert_eq!(stop["retail_price_per_gallon"], 3.457);
        assert_eq!(stop["miles_from_start"], 34.5);

        let summary = &json["fuel_optimization"]["summary"];
        assert_eq!(summary["total_fuel_stops"], 1);
        assert_eq!(summary["vehicle_mpg"], 10.0);
        assert_eq!(summary["total_distance_miles"], 69.0);

        assert_eq!(json["route"]["estimated_duration_hours"], 1.0);
        assert_eq!(json["route"]["waypoints"].as_array().unwrap().len(), 2);
        assert!(!json["route"]["polyline"].as_str().unwrap().is_empty());
        assert_eq!(json["fuel_optimization"]["segments"].as_array().unwrap().len(), 2);
    }
}
