//! The result of a nearest neighbour query
use std::cmp::Ordering;

use crate::distance::Distance;
use crate::point::{sort_canonical, Point};

/// Every stored point at the minimum distance from a query point, with `distance` being
/// that minimum according to the tree's distance metric.
///
/// Points are in canonical (lexicographic) order once returned from a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NearestNeighbours<'a> {
    /// the distance of every found point from the query point
    pub distance: Distance,
    /// the tie set, one entry per stored point (so duplicates appear more than once)
    pub points: Vec<&'a Point>,
}

impl<'a> NearestNeighbours<'a> {
    /// A tie set that any candidate can improve on.
    pub(crate) fn unbounded() -> Self {
        Self {
            distance: Distance::MAX,
            points: Vec::new(),
        }
    }

    /// Considers `point` at `distance`: a strictly closer point replaces the tie set, an
    /// equally distant one joins it, and anything further is discarded.
    #[inline]
    pub(crate) fn offer(&mut self, point: &'a Point, distance: Distance) {
        match distance.cmp(&self.distance) {
            Ordering::Less => {
                self.distance = distance;
                self.points.clear();
                self.points.push(point);
            }
            Ordering::Equal => self.points.push(point),
            Ordering::Greater => {}
        }
    }

    pub(crate) fn into_sorted(mut self) -> Self {
        sort_canonical(&mut self.points);
        self
    }

    /// Number of points in the tie set.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True if nothing was found.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Iterates over the tied points in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = &'a Point> + '_ {
        self.points.iter().copied()
    }
}

impl<'a> From<NearestNeighbours<'a>> for (Distance, Vec<&'a Point>) {
    fn from(elem: NearestNeighbours<'a>) -> Self {
        (elem.distance, elem.points)
    }
}

#[cfg(test)]
mod tests {
    use crate::nearest_neighbours::NearestNeighbours;
    use crate::point::Point;

    #[test]
    fn closer_point_replaces_the_tie_set() {
        let far = Point::from([9, 9]);
        let near = Point::from([1, 1]);
        let mut best = NearestNeighbours::unbounded();

        best.offer(&far, 50);
        best.offer(&near, 2);

        assert_eq!(best.distance, 2);
        assert_eq!(best.points, vec![&near]);
    }

    #[test]
    fn equal_distance_joins_and_greater_is_discarded() {
        let a = Point::from([1, 0]);
        let b = Point::from([0, 1]);
        let c = Point::from([5, 5]);
        let mut best = NearestNeighbours::unbounded();

        best.offer(&a, 1);
        best.offer(&c, 50);
        best.offer(&b, 1);

        assert_eq!(best.len(), 2);
        let best = best.into_sorted();
        assert_eq!(best.points, vec![&b, &a]);
    }

    #[test]
    fn the_largest_distance_is_still_accepted() {
        let p = Point::from([0]);
        let mut best = NearestNeighbours::unbounded();

        best.offer(&p, u128::MAX);

        assert_eq!(best.len(), 1);
    }

    #[test]
    fn test_into_tuple() {
        let p = Point::from([3, 4]);
        let nn = NearestNeighbours {
            distance: 25,
            points: vec![&p],
        };

        let (distance, points): (u128, Vec<&Point>) = nn.into();

        assert_eq!(distance, 25);
        assert_eq!(points, vec![&p]);
    }
}
