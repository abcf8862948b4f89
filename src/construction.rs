use std::ops::Rem;

use crate::error::Result;
use crate::kdtree::{KdNode, KdTree};
use crate::point::Point;

impl<D> KdTree<D> {
    /// Adds a point to the tree as a new leaf.
    ///
    /// Starting from the root, the point goes left when its co-ordinate on the splitting
    /// axis is strictly less than the node's, and right otherwise. Duplicate points are
    /// stored as separate entries.
    ///
    /// Returns [`KdError::InvalidArgument`](crate::KdError::InvalidArgument) (and leaves the
    /// tree untouched) if the point does not have [`dims`](KdTree::dims) co-ordinates.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use kdspace::KdTree;
    ///
    /// let mut tree = KdTree::new(3).unwrap();
    ///
    /// tree.insert([1, 2, 5]).unwrap();
    /// tree.insert(vec![2, 3, 6]).unwrap();
    /// assert!(tree.insert([1, 2]).is_err());
    ///
    /// assert_eq!(tree.size(), 2);
    /// ```
    pub fn insert(&mut self, point: impl Into<Point>) -> Result<()> {
        let point = point.into();
        self.check_dims("point", point.coords())?;

        let mut slot = &mut self.root;
        let mut split_dim = 0;

        while let Some(node) = slot {
            slot = if point[split_dim] < node.point[split_dim] {
                &mut node.left
            } else {
                &mut node.right
            };

            split_dim = (split_dim + 1).rem(self.dims);
        }

        *slot = Some(KdNode::new(point));
        self.size += 1;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::error::KdError;
    use crate::kdtree::{KdNode, KdTree};
    use crate::point::Point;
    use rand::Rng;

    /// Checks the axis-cycling partition for every node, returning the number of nodes seen.
    fn assert_partitioned(node: &KdNode, depth: usize, dims: usize) -> usize {
        let axis = depth % dims;
        let split = node.point[axis];
        let mut count = 1;

        if let Some(left) = node.left.as_deref() {
            let mut below = vec![left];
            while let Some(n) = below.pop() {
                assert!(n.point[axis] < split, "{} not < {split} on axis {axis}", n.point);
                below.extend(n.left.as_deref());
                below.extend(n.right.as_deref());
            }
            count += assert_partitioned(left, depth + 1, dims);
        }
        if let Some(right) = node.right.as_deref() {
            let mut above = vec![right];
            while let Some(n) = above.pop() {
                assert!(n.point[axis] >= split, "{} not >= {split} on axis {axis}", n.point);
                above.extend(n.left.as_deref());
                above.extend(n.right.as_deref());
            }
            count += assert_partitioned(right, depth + 1, dims);
        }

        count
    }

    #[test]
    fn first_point_becomes_the_root() {
        let mut tree = KdTree::new(2).unwrap();

        tree.insert([4, 7]).unwrap();

        let root = tree.root.as_deref().unwrap();
        assert_eq!(root.point, Point::from([4, 7]));
        assert!(root.left.is_none());
        assert!(root.right.is_none());
    }

    #[test]
    fn descends_left_on_strictly_less_and_right_otherwise() {
        let mut tree = KdTree::new(2).unwrap();

        tree.insert([5, 5]).unwrap();
        tree.insert([4, 100]).unwrap(); // axis 0: 4 < 5
        tree.insert([5, -100]).unwrap(); // axis 0: 5 == 5
        tree.insert([6, 9]).unwrap(); // axis 0: right, then axis 1 vs -100: right

        let root = tree.root.as_deref().unwrap();
        assert_eq!(root.left.as_ref().unwrap().point, Point::from([4, 100]));
        let right = root.right.as_deref().unwrap();
        assert_eq!(right.point, Point::from([5, -100]));
        assert!(right.left.is_none());
        assert_eq!(right.right.as_ref().unwrap().point, Point::from([6, 9]));
        assert_eq!(tree.height(), 3);
    }

    #[test]
    fn duplicates_are_stored_separately() {
        let mut tree = KdTree::new(2).unwrap();

        for _ in 0..3 {
            tree.insert([1, 1]).unwrap();
        }

        assert_eq!(tree.size(), 3);
        assert_eq!(tree.iter().filter(|p| **p == Point::from([1, 1])).count(), 3);
    }

    #[test]
    fn wrong_dimensionality_is_rejected_without_modifying_the_tree() {
        let mut tree = KdTree::new(3).unwrap();
        tree.insert([1, 2, 3]).unwrap();

        let result = tree.insert([1, 2]);

        assert!(matches!(result, Err(KdError::InvalidArgument(_))));
        assert_eq!(tree.size(), 1);
        assert_eq!(tree.iter().count(), 1);
    }

    #[test]
    fn random_insertions_keep_the_partition_invariant() {
        const DIMS: usize = 3;
        let mut rng = rand::rng();
        let mut tree = KdTree::new(DIMS).unwrap();

        for _ in 0..2_000 {
            let point: Vec<i32> = (0..DIMS).map(|_| rng.random_range(-20..20)).collect();
            tree.insert(point).unwrap();
        }

        let root = tree.root.as_deref().unwrap();
        assert_eq!(assert_partitioned(root, 0, DIMS), 2_000);
        assert_eq!(tree.size(), 2_000);
    }
}
