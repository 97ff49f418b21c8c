//! Haversine distance calculation.
//!
//! The Haversine formula calculates the great-circle distance between two points
//! on a sphere given their longitudes and latitudes. Route planning works in
//! statute miles, so the miles variant is the primary entry point.

use crate::Coordinate;

/// Earth's mean radius in statute miles.
pub const EARTH_RADIUS_MILES: f64 = 3958.8;

/// Earth's mean radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Calculates the great-circle distance between two coordinates in miles.
///
/// Total function: identical points yield `0.0`.
///
/// # Example
/// ```
/// use fuelroute_geo::{haversine_miles, Coordinate};
///
/// let a = Coordinate::new(0.0, 0.0);
/// let b = Coordinate::new(0.0, 1.0);
///
/// // One degree of longitude at the equator
/// assert!((haversine_miles(&a, &b) - 69.09).abs() < 0.1);
/// ```
#[inline]
pub fn haversine_miles(from: &Coordinate, to: &Coordinate) -> f64 {
    haversine_distance_with_radius(from, to, EARTH_RADIUS_MILES)
}

/// Calculates the great-circle distance between two coordinates in kilometers.
#[inline]
pub fn haversine_distance(from: &Coordinate, to: &Coordinate) -> f64 {
    haversine_distance_with_radius(from, to, EARTH_RADIUS_KM)
}

#[inline]
fn haversine_distance_with_radius(from: &Coordinate, to: &Coordinate, radius: f64) -> f64 {
    let (lat1, lon1) = from.to_radians();
    let (lat2, lon2) = to.to_radians();

    let d_lat = lat2 - lat1;
    let d_lon = lon2 - lon1;

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);

    // Rounding can push `a` a hair above 1 for antipodal points.
    let c = 2.0 * a.sqrt().min(1.0).asin();

    radius * c
}
