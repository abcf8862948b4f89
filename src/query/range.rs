use std::ops::Rem;

use crate::error::Result;
use crate::kdtree::{KdNode, KdTree, Traversal};
use crate::point::{sort_canonical, within_box, Coord, Point};

#[cfg(feature = "tracing")]
use tracing::{event, Level};

impl<D> KdTree<D> {
    /// Finds every point inside the axis-aligned box `low..=high`, inclusive on both ends
    /// of every axis.
    ///
    /// Results are sorted lexicographically. A box with `low[i] > high[i]` on any axis
    /// contains nothing.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use kdspace::{KdTree, Point};
    ///
    /// let tree = KdTree::from_points(2, [[0, 0], [1, 1], [2, 2]]).unwrap();
    ///
    /// let found = tree.range(&[0, 0], &[1, 1]).unwrap();
    ///
    /// assert_eq!(found, vec![&Point::from([0, 0]), &Point::from([1, 1])]);
    /// ```
    pub fn range(&self, low: &[Coord], high: &[Coord]) -> Result<Vec<&Point>> {
        self.check_box(low, high)?;

        let mut matching_items = Vec::new();
        if let Some(root) = self.root.as_deref() {
            self.range_recurse(low, high, root, 0, &mut matching_items);
        }

        Ok(Self::finish_range(matching_items))
    }

    /// Same as [`range`](KdTree::range), but walks the tree with a heap-allocated stack
    /// instead of recursion.
    pub fn range_explicit_stack(&self, low: &[Coord], high: &[Coord]) -> Result<Vec<&Point>> {
        self.check_box(low, high)?;

        let mut matching_items = Vec::new();
        let mut stack: Vec<(&KdNode, usize)> = Vec::new();
        if let Some(root) = self.root.as_deref() {
            stack.push((root, 0));
        }

        while let Some((node, split_dim)) = stack.pop() {
            if within_box(node.point.coords(), low, high) {
                matching_items.push(&node.point);
            }

            let (left, right) = Self::range_children(low, high, node, split_dim);
            let next_split_dim = (split_dim + 1).rem(self.dims);
            stack.extend(right.map(|n| (n, next_split_dim)));
            stack.extend(left.map(|n| (n, next_split_dim)));
        }

        Ok(Self::finish_range(matching_items))
    }

    /// Runs a range query using the selected traversal.
    pub fn range_with(
        &self,
        traversal: Traversal,
        low: &[Coord],
        high: &[Coord],
    ) -> Result<Vec<&Point>> {
        match traversal {
            Traversal::Recursive => self.range(low, high),
            Traversal::ExplicitStack => self.range_explicit_stack(low, high),
        }
    }

    fn range_recurse<'a>(
        &'a self,
        low: &[Coord],
        high: &[Coord],
        node: &'a KdNode,
        split_dim: usize,
        matching_items: &mut Vec<&'a Point>,
    ) {
        if within_box(node.point.coords(), low, high) {
            matching_items.push(&node.point);
        }

        let (left, right) = Self::range_children(low, high, node, split_dim);
        let next_split_dim = (split_dim + 1).rem(self.dims);

        if let Some(left) = left {
            self.range_recurse(low, high, left, next_split_dim, matching_items);
        }
        if let Some(right) = right {
            self.range_recurse(low, high, right, next_split_dim, matching_items);
        }
    }

    /// Children of `node` that could hold points inside the box.
    ///
    /// Everything left of the split is strictly below it, so the left side is only
    /// worth visiting if `low` is too; the right side holds values `>=` the split.
    #[inline]
    fn range_children<'a>(
        low: &[Coord],
        high: &[Coord],
        node: &'a KdNode,
        split_dim: usize,
    ) -> (Option<&'a KdNode>, Option<&'a KdNode>) {
        let split_val = node.point[split_dim];
        let left = node.left.as_deref().filter(|_| low[split_dim] < split_val);
        let right = node.right.as_deref().filter(|_| high[split_dim] >= split_val);
        (left, right)
    }

    fn check_box(&self, low: &[Coord], high: &[Coord]) -> Result<()> {
        self.check_dims("lower corner", low)?;
        self.check_dims("upper corner", high)
    }

    fn finish_range(mut matching_items: Vec<&Point>) -> Vec<&Point> {
        #[cfg(feature = "tracing")]
        event!(Level::TRACE, found = matching_items.len(), "range query");

        sort_canonical(&mut matching_items);
        matching_items
    }
}
