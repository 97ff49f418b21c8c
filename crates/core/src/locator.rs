//! Station lookup around a point.
//!
//! Measures the query point against every station in one batch, keeps those
//! inside the radius, and ranks them cheapest first with distance breaking
//! ties. A linear scan per waypoint is cheap at truck-stop catalog sizes.

use crate::catalog::Station;
use fuelroute_geo::{batch::distances_by, Coordinate};
use serde::Serialize;
use std::cmp::Ordering;

/// A station with its distance from the query point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationCandidate {
    pub station: Station,
    pub distance_miles: f64,
}

/// Stations within `radius_miles` of `point`, cheapest first, at most `top_n`.
///
/// An empty result is a normal outcome; callers decide whether to widen the
/// search.
pub fn nearby(
    point: &Coordinate,
    stations: &[Station],
    radius_miles: f64,
    top_n: usize,
) -> Vec<StationCandidate> {
    let distances = distances_by(point, stations, |station| station.location);

    let mut within: Vec<(&Station, f64)> = stations
        .iter()
        .zip(distances)
        .filter(|(_, distance)| *distance <= radius_miles)
        .collect();

    within.sort_by(|(a, da), (b, db)| rank(a.price, *da, b.price, *db));
    within.truncate(top_n);

    within
        .into_iter()
        .map(|(station, distance_miles)| StationCandidate {
            station: station.clone(),
            distance_miles,
        })
        .collect()
}

/// Price ascending, then distance ascending.
#[inline]
fn rank(price_a: f64, dist_a: f64, price_b: f64, dist_b: f64) -> Ordering {
    price_a
        .total_cmp(&price_b)
        .then_with(|| dist_a.total_cmp(&dist_b))
}
