//! Contains a selection of distance metrics that can be chosen from to measure the distance
//! between two points stored inside the tree.

use crate::point::Coord;

/// Type distances are measured in.
///
/// Wide enough that no sum over `i32` axes can overflow, so two points are only ever
/// tied when their true distances are equal.
pub type Distance = u128;

/// Trait that needs to be implemented by any potential distance
/// metric to be used within queries
pub trait DistanceMetric {
    /// returns the distance between two k-d points, as measured
    /// by a particular distance metric
    fn dist(a: &[Coord], b: &[Coord]) -> Distance;

    /// returns the distance between two points along a single axis,
    /// as measured by a particular distance metric.
    ///
    /// (used by the nearest neighbour query as the lower bound on the distance
    /// to anything on the far side of a splitting plane, so it must never exceed
    /// `dist` for two points differing only on that axis)
    fn dist1(a: Coord, b: Coord) -> Distance;
}

#[inline]
fn axis_diff(a: Coord, b: Coord) -> Distance {
    Distance::from((i64::from(a) - i64::from(b)).unsigned_abs())
}

/// Returns the squared euclidean distance between two points.
///
/// Stays in integers, so distance comparisons (and the pruning bound used by
/// nearest neighbour queries) are exact. Preserves the same distance ordering
/// as Euclidean distance.
///
/// # Examples
///
/// ```rust
/// use kdspace::distance::{DistanceMetric, SquaredEuclidean};
///
/// assert_eq!(0, SquaredEuclidean::dist(&[0, 0], &[0, 0]));
/// assert_eq!(1, SquaredEuclidean::dist(&[0, 0], &[1, 0]));
/// assert_eq!(18, SquaredEuclidean::dist(&[2, 2], &[5, 5]));
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct SquaredEuclidean {}

impl DistanceMetric for SquaredEuclidean {
    #[inline]
    fn dist(a: &[Coord], b: &[Coord]) -> Distance {
        a.iter()
            .zip(b.iter())
            .map(|(&a_val, &b_val)| Self::dist1(a_val, b_val))
            .sum()
    }

    #[inline]
    fn dist1(a: Coord, b: Coord) -> Distance {
        // |a - b| < 2^32, so the square is below 2^64 and any realistic sum fits
        let diff = axis_diff(a, b);
        diff * diff
    }
}

/// Returns the Manhattan / "taxi cab" distance between two points.
///
/// # Examples
///
/// ```rust
/// use kdspace::distance::{DistanceMetric, Manhattan};
///
/// assert_eq!(0, Manhattan::dist(&[0, 0], &[0, 0]));
/// assert_eq!(1, Manhattan::dist(&[0, 0], &[1, 0]));
/// assert_eq!(2, Manhattan::dist(&[0, 0], &[1, -1]));
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct Manhattan {}

impl DistanceMetric for Manhattan {
    #[inline]
    fn dist(a: &[Coord], b: &[Coord]) -> Distance {
        a.iter()
            .zip(b.iter())
            .map(|(&a_val, &b_val)| axis_diff(a_val, b_val))
            .sum()
    }

    #[inline]
    fn dist1(a: Coord, b: Coord) -> Distance {
        axis_diff(a, b)
    }
}
