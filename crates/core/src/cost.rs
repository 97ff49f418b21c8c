//! Fuel consumption and cost for a planned route.

use crate::catalog::StationId;
use crate::config::VehicleConfig;
use crate::planner::FuelStop;
use serde::Serialize;

/// A stretch of route between refuel events, with the fuel it burns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Segment {
    pub from_miles: f64,
    pub to_miles: f64,
    pub miles: f64,
    pub gallons: f64,
    pub price_per_gallon: f64,
    pub cost: f64,
    /// Stop whose price was applied
    pub priced_at: StationId,
}

/// The complete fuel estimate for one route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimizationResult {
    pub total_distance_miles: f64,
    pub total_gallons: f64,
    pub average_price: f64,
    pub total_cost: f64,
    pub stops: Vec<FuelStop>,
    pub segments: Vec<Segment>,
    pub vehicle: VehicleConfig,
}

impl OptimizationResult {
    pub fn stop_count(&self) -> usize {
        self.stops.len()
    }

    /// Sum of per-segment costs.
    ///
    /// Differs from `total_cost`, which prices the whole trip at the
    /// average stop price.
    pub fn segment_cost(&self) -> f64 {
        self.segments.iter().map(|s| s.cost).sum()
    }
}

/// Derive segments and totals from the chosen stops.
///
/// `fallback_average_price` (normally the catalog-wide mean) prices the trip
/// when no stop was found. Each segment ending at a stop is priced at that
/// stop; the trailing segment to the destination uses the last stop's price.
/// With no stops the segment list is empty.
pub fn aggregate(
    stops: Vec<FuelStop>,
    total_distance_miles: f64,
    fallback_average_price: f64,
    vehicle: &VehicleConfig,
) -> OptimizationResult {
    let mpg = vehicle.mpg;
    let total_gallons = total_distance_miles / mpg;

    let average_price = if stops.is_empty() {
        fallback_average_price
    } else {
        stops.iter().map(|s| s.station.price).sum::<f64>() / stops.len() as f64
    };

    let segment = |from: f64, to: f64, stop: &FuelStop| {
        let miles = to - from;
        let gallons = miles / mpg;
        Segment {
            from_miles: from,
            to_miles: to,
            miles,
            gallons,
            price_per_gallon: stop.station.price,
            cost: gallons * stop.station.price,
            priced_at: stop.station.id.clone(),
        }
    };

    let mut segments = Vec::with_capacity(stops.len() + 1);
    let mut previous = 0.0;
    for stop in &stops {
        segments.push(segment(previous, stop.miles_from_start, stop));
        previous = stop.miles_from_start;
    }
    if let Some(last) = stops.last() {
        segments.push(segment(previous, total_distance_miles, last));
    }

    OptimizationResult {
        total_distance_miles,
        total_gallons,
        average_price,
        total_cost: total_gallons * average_price,
        stops,
        segments,
        vehicle: *vehicle,
    }
}
