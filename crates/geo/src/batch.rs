//! Batch distance calculations with optional parallelism.
//!
//! Station lookups measure one query point against the whole catalog, so the
//! per-element work is tiny and the batch is embarrassingly parallel. With the
//! `parallel` feature the work is spread over the rayon pool; results are
//! identical either way and keep input order.

use crate::{haversine_miles, Coordinate};

/// Calculate the distance in miles from `origin` to every point in `points`.
///
/// The returned vector is index-aligned with `points`.
///
/// # Example
/// ```
/// use fuelroute_geo::{distances_from, Coordinate};
///
/// let origin = Coordinate::new(0.0, 0.0);
/// let points = [Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 1.0)];
///
/// let distances = distances_from(&origin, &points);
/// assert_eq!(distances.len(), 2);
/// assert_eq!(distances[0], 0.0);
/// ```
pub fn distances_from(origin: &Coordinate, points: &[Coordinate]) -> Vec<f64> {
    distances_by(origin, points, |point| *point)
}

/// Like [`distances_from`], but pulls the coordinate out of each item.
///
/// Lets callers measure against their own records without first copying the
/// coordinates into a separate buffer.
pub fn distances_by<T, F>(origin: &Coordinate, items: &[T], coordinate_of: F) -> Vec<f64>
where
    T: Sync,
    F: Fn(&T) -> Coordinate + Sync + Send,
{
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        items
            .par_iter()
            .map(|item| haversine_miles(origin, &coordinate_of(item)))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        items
            .iter()
            .map(|item| haversine_miles(origin, &coordinate_of(item)))
            .collect()
    }
}
