//! Random data generation and a brute-force linear scan, used to cross-check the tree.
use std::ops::Range;

use rand::Rng;

use crate::distance::{Distance, DistanceMetric};
use crate::point::{within_box, Coord, Point};

/// A point with `dims` co-ordinates drawn uniformly from `coords`.
pub fn rand_point(dims: usize, coords: Range<Coord>) -> Point {
    let mut rng = rand::rng();
    (0..dims)
        .map(|_| rng.random_range(coords.clone()))
        .collect::<Vec<_>>()
        .into()
}

/// `count` independent random points.
pub fn rand_points(count: usize, dims: usize, coords: Range<Coord>) -> Vec<Point> {
    (0..count).map(|_| rand_point(dims, coords.clone())).collect()
}

/// Minimum distance from `query` to any of `content`, and every point at that distance,
/// sorted. Returns `(Distance::MAX, [])` for empty content.
pub fn linear_nearest<D: DistanceMetric>(content: &[Point], query: &[Coord]) -> (Distance, Vec<Point>) {
    let best_dist = content
        .iter()
        .map(|p| D::dist(query, p.coords()))
        .min()
        .unwrap_or(Distance::MAX);

    let mut matching_items: Vec<Point> = content
        .iter()
        .filter(|p| D::dist(query, p.coords()) == best_dist)
        .cloned()
        .collect();
    matching_items.sort();

    (best_dist, matching_items)
}

/// Every point of `content` inside `low..=high`, sorted.
pub fn linear_range(content: &[Point], low: &[Coord], high: &[Coord]) -> Vec<Point> {
    let mut matching_items: Vec<Point> = content
        .iter()
        .filter(|p| within_box(p.coords(), low, high))
        .cloned()
        .collect();
    matching_items.sort();

    matching_items
}

/// Expands `$callee!` once per `(dims, size)` pair, labelling each run `"<dims>D"`.
#[macro_export]
macro_rules! batch_benches {
    ($group:ident, $callee:ident, [$(($k:tt, $size:tt)),+] ) => {
        { $($callee!($group, $k, $size, concat!($k, "D"));)* }
    }
}
