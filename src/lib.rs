#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
#![warn(rustdoc::private_intra_doc_links)]

//! # kdspace
//!
//! A k-d tree over fixed-dimensionality integer points.
//!
//! Points are inserted one at a time, each becoming a new leaf; the splitting axis cycles
//! with depth. Queries come in two flavours:
//!
//! * **nearest**: every stored point tied at the minimum distance from a query point,
//!   found by branch-and-bound search with a pluggable [`DistanceMetric`](distance::DistanceMetric)
//!   (squared euclidean by default)
//! * **range**: every stored point inside an inclusive axis-aligned box
//!
//! Results are always sorted lexicographically, so they do not depend on the shape of the
//! tree (which depends on insertion order).
//!
//! ## Usage
//! ```rust
//! use kdspace::{KdTree, Point};
//!
//! let mut tree = KdTree::new(2).unwrap();
//!
//! tree.insert([0, 0]).unwrap();
//! tree.insert([1, 1]).unwrap();
//! tree.insert([2, 2]).unwrap();
//!
//! assert_eq!(tree.size(), 3);
//!
//! let nearest = tree.nearest(&[0, 1]).unwrap().unwrap();
//! assert_eq!(nearest.distance, 1);
//! assert_eq!(nearest.points, vec![&Point::from([0, 0]), &Point::from([1, 1])]);
//!
//! assert_eq!(
//!     tree.range(&[0, 0], &[1, 1]).unwrap(),
//!     vec![&Point::from([0, 0]), &Point::from([1, 1])]
//! );
//! ```
//!
//! Point-set files can be bulk loaded, shuffled first to keep the tree balanced, with
//! [`loader::load_path`].

pub mod command;
mod construction;
pub mod distance;
mod error;
mod iter;
pub mod kdtree;
pub mod loader;
pub mod nearest_neighbours;
pub mod point;
mod query;
#[doc(hidden)]
#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;

pub use crate::error::{KdError, Result};
pub use crate::iter::TreeIter;
pub use crate::kdtree::{KdTree, Traversal};
pub use crate::nearest_neighbours::NearestNeighbours;
pub use crate::point::{Coord, Point};
