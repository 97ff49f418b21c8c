//! Compact route payloads.
//!
//! Routes coming back from a routing service can carry thousands of vertices.
//! For display they are shipped either as an encoded polyline (Google's
//! algorithm, precision 5) or thinned down to a bounded number of points.

use crate::{Coordinate, GeoError, Result};
use geo_types::Coord;

/// Precision used by the encoded polyline format.
pub const POLYLINE_PRECISION: u32 = 5;

/// Default cap on the number of thinned display points.
pub const DEFAULT_MAX_POINTS: usize = 200;

/// Encode coordinates as a polyline string.
///
/// # Errors
/// Returns [`GeoError::PolylineEncoding`] if a coordinate is out of range.
pub fn encode(points: &[Coordinate]) -> Result<String> {
    let coords = points.iter().map(|p| Coord { x: p.longitude, y: p.latitude });
    polyline::encode_coordinates(coords, POLYLINE_PRECISION).map_err(GeoError::PolylineEncoding)
}

/// Decode a polyline string back into coordinates.
///
/// # Errors
/// Returns [`GeoError::PolylineEncoding`] for malformed input.
pub fn decode(encoded: &str) -> Result<Vec<Coordinate>> {
    let line = polyline::decode_polyline(encoded, POLYLINE_PRECISION)
        .map_err(GeoError::PolylineEncoding)?;
    Ok(line.coords().map(|c| Coordinate::new(c.y, c.x)).collect())
}

/// Thin a route to roughly `max_points` vertices by striding.
///
/// Routes at or under the cap come back unchanged. Longer routes keep every
/// `len / max_points`-th vertex starting with the first, so the result can
/// slightly exceed the cap when the length is not an exact multiple.
pub fn thin(points: &[Coordinate], max_points: usize) -> Vec<Coordinate> {
    if max_points == 0 || points.len() <= max_points {
        return points.to_vec();
    }

    let step = points.len() / max_points;
    points.iter().step_by(step).copied().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_known_value() {
        // Reference example from the polyline format documentation
        let points = [
            Coordinate::new(38.5, -120.2),
            Coordinate::new(40.7, -120.95),
            Coordinate::new(43.252, -126.453),
        ];
        assert_eq!(encode(&points).unwrap(), "_p~iF~ps|U_ulLnnqC_mqNvxq`@");
    }

    #[test]
    fn test_decode_known_value() {
        let points = decode("_p~iF~ps|U_ulLnnqC_mqNvxq`@").unwrap();
        assert_eq!(points.len(), 3);
        assert!((points[0].latitude - 38.5).abs() < 1e-5);
        assert!((points[2].longitude + 126.453).abs() < 1e-5);
    }

    #[test]
    fn test_thin_short_route_unchanged() {
        let points: Vec<Coordinate> = (0..10).map(|i| Coordinate::new(0.0, i as f64)).collect();
        assert_eq!(thin(&points, DEFAULT_MAX_POINTS), points);
    }

    #[test]
    fn test_thin_long_route() {
        let points: Vec<Coordinate> =
            (0..1000).map(|i| Coordinate::new(0.0, i as f64 * 0.01)).collect();
        let thinned = thin(&points, 200);
        assert_eq!(thinned.len(), 200);
        assert_eq!(thinned[0], points[0]);
        assert_eq!(thinned[1], points[5]);
    }

    #[test]
    fn test_thin_uneven_stride() {
        let points: Vec<Coordinate> = (0..450).map(|i| Coordinate::new(0.0, i as f64 * 0.001)).collect();
        // stride 2 over 450 points keeps 225
        assert_eq!(thin(&points, 200).len(), 225);
    }
}
