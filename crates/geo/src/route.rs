//! Route sampling along a polyline.
//!
//! A route is an ordered slice of coordinates from origin to destination.
//! Distances are measured segment by segment with the haversine formula and
//! positions inside a segment are linearly interpolated in latitude/longitude.

use crate::{haversine_miles, Coordinate, GeoError, Result};

/// Where a cumulative distance lands on a polyline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoutePosition {
    /// Index of the segment's starting vertex
    pub segment_index: usize,
    /// Fraction of the segment covered, in `[0, 1]`
    pub fraction: f64,
    /// Interpolated coordinate
    pub coordinate: Coordinate,
}

/// Total length of a polyline in miles.
///
/// Empty and single-point polylines have length `0.0`.
pub fn polyline_length_miles(polyline: &[Coordinate]) -> f64 {
    polyline
        .windows(2)
        .map(|pair| haversine_miles(&pair[0], &pair[1]))
        .sum()
}

/// Find the position `target_miles` along the polyline.
///
/// Walks the segments accumulating distance; the first segment whose end
/// reaches the target is interpolated. Negative targets are treated as `0`.
/// Targets past the end resolve to the final vertex.
///
/// # Errors
/// Returns [`GeoError::EmptyPolyline`] if `polyline` has no points.
pub fn locate_on_route(polyline: &[Coordinate], target_miles: f64) -> Result<RoutePosition> {
    let last = *polyline.last().ok_or(GeoError::EmptyPolyline)?;
    let target = target_miles.max(0.0);

    let mut accumulated = 0.0;
    for (index, pair) in polyline.windows(2).enumerate() {
        let (start, end) = (pair[0], pair[1]);
        let segment_miles = haversine_miles(&start, &end);

        if accumulated + segment_miles >= target {
            let fraction = if segment_miles > 0.0 {
                ((target - accumulated) / segment_miles).clamp(0.0, 1.0)
            } else {
                0.0
            };

            return Ok(RoutePosition {
                segment_index: index,
                fraction,
                coordinate: Coordinate::new(
                    start.latitude + fraction * (end.latitude - start.latitude),
                    start.longitude + fraction * (end.longitude - start.longitude),
                ),
            });
        }

        accumulated += segment_miles;
    }

    Ok(RoutePosition {
        segment_index: polyline.len().saturating_sub(2),
        fraction: if polyline.len() > 1 { 1.0 } else { 0.0 },
        coordinate: last,
    })
}

/// The interpolated coordinate `target_miles` along the polyline.
///
/// # Example
/// ```
/// use fuelroute_geo::{point_at_distance, Coordinate};
///
/// let route = [Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 1.0)];
/// let midpoint = point_at_distance(&route, 34.585).unwrap();
///
/// assert!((midpoint.longitude - 0.5).abs() < 0.01);
/// ```
///
/// # Errors
/// Returns [`GeoError::EmptyPolyline`] if `polyline` has no points.
pub fn point_at_distance(polyline: &[Coordinate], target_miles: f64) -> Result<Coordinate> {
    locate_on_route(polyline, target_miles).map(|position| position.coordinate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const EPS: f64 = 1e-9;

    fn equator_route() -> Vec<Coordinate> {
        vec![
            Coordinate::new(0.0, 0.0),
            Coordinate::new(0.0, 1.0),
            Coordinate::new(0.0, 2.0),
        ]
    }

    fn assert_close(a: Coordinate, b: Coordinate) {
        assert!(
            (a.latitude - b.latitude).abs() < 1e-6 && (a.longitude - b.longitude).abs() < 1e-6,
            "{:?} != {:?}",
            a,
            b
        );
    }

    #[test]
    fn test_empty_polyline_is_an_error() {
        assert!(matches!(point_at_distance(&[], 10.0), Err(GeoError::EmptyPolyline)));
    }

    #[test]
    fn test_single_point_returns_itself() {
        let only = Coordinate::new(35.0, -100.0);
        for target in [0.0, 1.0, 1_000.0] {
            assert_eq!(point_at_distance(&[only], target).unwrap(), only);
        }
    }

    #[test]
    fn test_halfway_along_one_degree() {
        let route = [Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 1.0)];
        let point = point_at_distance(&route, 69.17 * 0.5).unwrap();
        assert!(point.latitude.abs() < EPS);
        assert!((point.longitude - 0.5).abs() < 0.01, "{:?}", point);
    }

    #[test]
    fn test_second_segment_interpolation() {
        let route = equator_route();
        let one_degree = haversine_miles(&route[0], &route[1]);
        let position = locate_on_route(&route, one_degree * 1.25).unwrap();
        assert_eq!(position.segment_index, 1);
        assert!((position.fraction - 0.25).abs() < 1e-9);
        assert_close(position.coordinate, Coordinate::new(0.0, 1.25));
    }

    #[test]
    fn test_endpoints() {
        let route = equator_route();
        let total = polyline_length_miles(&route);
        assert_close(point_at_distance(&route, 0.0).unwrap(), route[0]);
        assert_close(point_at_distance(&route, total).unwrap(), route[2]);
        assert_close(point_at_distance(&route, total * 3.0).unwrap(), route[2]);
    }

    #[test]
    fn test_negative_target_clamps_to_start() {
        let route = equator_route();
        assert_close(point_at_distance(&route, -50.0).unwrap(), route[0]);
    }

    #[test]
    fn test_zero_length_segment() {
        let p = Coordinate::new(10.0, 10.0);
        let route = [p, p, Coordinate::new(10.0, 11.0)];
        let position = locate_on_route(&route, 0.0).unwrap();
        assert_eq!(position.segment_index, 0);
        assert_eq!(position.fraction, 0.0);
        assert_eq!(position.coordinate, p);
    }

    #[test]
    fn test_polyline_length() {
        assert_eq!(polyline_length_miles(&[]), 0.0);
        let route = equator_route();
        let expected = 2.0 * haversine_miles(&route[0], &route[1]);
        assert!((polyline_length_miles(&route) - expected).abs() < 1e-9);
    }

    fn route_strategy() -> impl Strategy<Value = Vec<Coordinate>> {
        (
            (-60.0f64..60.0, -170.0f64..170.0),
            prop::collection::vec((-0.5f64..0.5, -0.5f64..0.5), 1..20),
        )
            .prop_map(|((lat, lon), steps)| {
                let mut points = vec![Coordinate::new(lat, lon)];
                for (d_lat, d_lon) in steps {
                    let prev = points[points.len() - 1];
                    points.push(Coordinate::new(prev.latitude + d_lat, prev.longitude + d_lon));
                }
                points
            })
    }

    fn walked(route: &[Coordinate], position: &RoutePosition) -> f64 {
        let before = polyline_length_miles(&route[..=position.segment_index]);
        let segment = route
            .get(position.segment_index + 1)
            .map(|end| haversine_miles(&route[position.segment_index], end))
            .unwrap_or(0.0);
        before + position.fraction * segment
    }

    proptest! {
        #[test]
        fn prop_endpoints_match_route(route in route_strategy()) {
            let total = polyline_length_miles(&route);
            let start = point_at_distance(&route, 0.0).unwrap();
            let end = point_at_distance(&route, total).unwrap();
            let last = route[route.len() - 1];

            prop_assert!((start.latitude - route[0].latitude).abs() < 1e-6);
            prop_assert!((start.longitude - route[0].longitude).abs() < 1e-6);
            prop_assert!((end.latitude - last.latitude).abs() < 1e-6);
            prop_assert!((end.longitude - last.longitude).abs() < 1e-6);
        }

        #[test]
        fn prop_walked_distance_is_monotonic(
            route in route_strategy(),
            a in 0.0f64..1.2,
            b in 0.0f64..1.2,
        ) {
            let total = polyline_length_miles(&route);
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let first = locate_on_route(&route, lo * total).unwrap();
            let second = locate_on_route(&route, hi * total).unwrap();

            prop_assert!(walked(&route, &first) <= walked(&route, &second) + 1e-9);
        }
    }
}
