use std::ops::Rem;

use crate::distance::DistanceMetric;
use crate::error::Result;
use crate::kdtree::{KdNode, KdTree, Traversal};
use crate::nearest_neighbours::NearestNeighbours;
use crate::point::Coord;

#[cfg(feature = "tracing")]
use tracing::{event, Level};

/// Pending work for the explicit-stack traversal. Pushed in reverse of the order the
/// recursive traversal performs the same steps.
enum Visit<'a> {
    Descend(&'a KdNode, usize),
    Further(&'a KdNode, usize),
    Evaluate(&'a KdNode),
}

impl<D: DistanceMetric> KdTree<D> {
    /// Queries the tree to find every point at the minimum distance from `query`.
    ///
    /// Returns `Ok(None)` for an empty tree. Otherwise the minimum distance and all points
    /// tied at it (duplicates included), sorted lexicographically so the result does not
    /// depend on the tree's shape.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use kdspace::{KdTree, Point};
    ///
    /// let tree = KdTree::from_points(2, [[0, 0], [1, 1], [2, 2]]).unwrap();
    ///
    /// let nearest = tree.nearest(&[0, 1]).unwrap().unwrap();
    ///
    /// assert_eq!(nearest.distance, 1);
    /// assert_eq!(nearest.points, vec![&Point::from([0, 0]), &Point::from([1, 1])]);
    /// ```
    pub fn nearest(&self, query: &[Coord]) -> Result<Option<NearestNeighbours<'_>>> {
        self.check_dims("query", query)?;

        let Some(root) = self.root.as_deref() else {
            return Ok(None);
        };
        let best = self.nearest_recurse(query, root, 0, NearestNeighbours::unbounded());

        Ok(Some(Self::finish_nearest(best)))
    }

    /// Same as [`nearest`](KdTree::nearest), but walks the tree with a heap-allocated stack
    /// instead of recursion. Nodes are visited in exactly the same order.
    pub fn nearest_explicit_stack(&self, query: &[Coord]) -> Result<Option<NearestNeighbours<'_>>> {
        self.check_dims("query", query)?;

        let Some(root) = self.root.as_deref() else {
            return Ok(None);
        };

        let mut best = NearestNeighbours::unbounded();
        let mut stack = vec![Visit::Descend(root, 0)];

        while let Some(visit) = stack.pop() {
            match visit {
                Visit::Descend(node, split_dim) => {
                    let (closer, _) = Self::split_children(query, node, split_dim);
                    let next_split_dim = (split_dim + 1).rem(self.dims);

                    stack.push(Visit::Evaluate(node));
                    stack.push(Visit::Further(node, split_dim));
                    if let Some(closer) = closer {
                        stack.push(Visit::Descend(closer, next_split_dim));
                    }
                }
                Visit::Further(node, split_dim) => {
                    let (_, further) = Self::split_children(query, node, split_dim);

                    if let Some(further) = further {
                        if D::dist1(query[split_dim], node.point[split_dim]) <= best.distance {
                            stack.push(Visit::Descend(further, (split_dim + 1).rem(self.dims)));
                        }
                    }
                }
                Visit::Evaluate(node) => {
                    best.offer(&node.point, D::dist(query, node.point.coords()));
                }
            }
        }

        Ok(Some(Self::finish_nearest(best)))
    }

    /// Runs a nearest neighbour query using the selected traversal.
    pub fn nearest_with(
        &self,
        traversal: Traversal,
        query: &[Coord],
    ) -> Result<Option<NearestNeighbours<'_>>> {
        match traversal {
            Traversal::Recursive => self.nearest(query),
            Traversal::ExplicitStack => self.nearest_explicit_stack(query),
        }
    }

    fn nearest_recurse<'a>(
        &'a self,
        query: &[Coord],
        node: &'a KdNode,
        split_dim: usize,
        mut best: NearestNeighbours<'a>,
    ) -> NearestNeighbours<'a> {
        let (closer, further) = Self::split_children(query, node, split_dim);
        let next_split_dim = (split_dim + 1).rem(self.dims);

        if let Some(closer) = closer {
            best = self.nearest_recurse(query, closer, next_split_dim, best);
        }

        // `<=` rather than `<`: a point exactly on the far side of the plane at the
        // current best distance is a tie and must still be found
        if let Some(further) = further {
            if D::dist1(query[split_dim], node.point[split_dim]) <= best.distance {
                best = self.nearest_recurse(query, further, next_split_dim, best);
            }
        }

        best.offer(&node.point, D::dist(query, node.point.coords()));
        best
    }

    /// Children of `node` ordered (same side as the query, opposite side).
    #[inline]
    fn split_children<'a>(
        query: &[Coord],
        node: &'a KdNode,
        split_dim: usize,
    ) -> (Option<&'a KdNode>, Option<&'a KdNode>) {
        if query[split_dim] < node.point[split_dim] {
            (node.left.as_deref(), node.right.as_deref())
        } else {
            (node.right.as_deref(), node.left.as_deref())
        }
    }

    fn finish_nearest(best: NearestNeighbours<'_>) -> NearestNeighbours<'_> {
        #[cfg(feature = "tracing")]
        event!(
            Level::TRACE,
            distance = best.distance,
            ties = best.len(),
            "nearest neighbour query"
        );

        best.into_sorted()
    }
}
