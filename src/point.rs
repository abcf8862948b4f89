//! Integer points stored in the tree, and the canonical ordering applied to query results.
use std::fmt;
use std::ops::Index;

/// Type used for each co-ordinate of a [`Point`].
pub type Coord = i32;

/// An immutable point with a fixed number of integer co-ordinates.
///
/// The derived ordering is lexicographic by axis (axis 0 first, ties broken by axis 1,
/// and so on), which is the order query results are returned in.
///
/// # Examples
///
/// ```rust
/// use kdspace::Point;
///
/// let a = Point::from([1, 5]);
/// let b = Point::from([2, 0]);
///
/// assert!(a < b);
/// assert_eq!(a.dims(), 2);
/// assert_eq!(a.to_string(), "1 5");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Point {
    coords: Box<[Coord]>,
}

impl Point {
    /// Creates a point from its co-ordinates.
    pub fn new(coords: impl Into<Box<[Coord]>>) -> Self {
        Self {
            coords: coords.into(),
        }
    }

    /// Number of co-ordinates in this point.
    #[inline]
    pub fn dims(&self) -> usize {
        self.coords.len()
    }

    /// The co-ordinates of this point, in axis order.
    #[inline]
    pub fn coords(&self) -> &[Coord] {
        &self.coords
    }
}

impl Index<usize> for Point {
    type Output = Coord;

    #[inline]
    fn index(&self, axis: usize) -> &Coord {
        &self.coords[axis]
    }
}

impl AsRef<[Coord]> for Point {
    fn as_ref(&self) -> &[Coord] {
        &self.coords
    }
}

impl From<Vec<Coord>> for Point {
    fn from(coords: Vec<Coord>) -> Self {
        Point::new(coords)
    }
}

impl From<&[Coord]> for Point {
    fn from(coords: &[Coord]) -> Self {
        Point::new(coords)
    }
}

impl<const K: usize> From<[Coord; K]> for Point {
    fn from(coords: [Coord; K]) -> Self {
        Point::new(coords.to_vec())
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut coords = self.coords.iter();
        if let Some(first) = coords.next() {
            write!(f, "{first}")?;
        }
        for c in coords {
            write!(f, " {c}")?;
        }
        Ok(())
    }
}

/// Puts a set of query results into canonical order.
///
/// Traversal order depends on tree shape, which in turn depends on the order points
/// were inserted in. Sorting with a stable merge sort on the lexicographic point order
/// makes output independent of both.
pub(crate) fn sort_canonical(points: &mut [&Point]) {
    points.sort();
}

/// Returns true if every co-ordinate of `point` lies within `low..=high` on its axis.
#[inline]
pub(crate) fn within_box(point: &[Coord], low: &[Coord], high: &[Coord]) -> bool {
    point
        .iter()
        .zip(low.iter().zip(high.iter()))
        .all(|(&p, (&lo, &hi))| lo <= p && p <= hi)
}
