//! Integer k-d tree, where each node holds exactly one point and owns its two subtrees.
//!
//! The splitting axis at depth `d` is `d % k`. Points strictly below a node's co-ordinate on
//! that axis live in its left subtree, everything else in its right subtree. The shape of the
//! tree is determined entirely by insertion order and is never rebalanced.

use std::fmt;
use std::marker::PhantomData;

use crate::distance::SquaredEuclidean;
use crate::error::{KdError, Result};
use crate::iter::TreeIter;
use crate::point::Point;

/// Integer k-d tree
///
/// The distance metric `D` used by nearest neighbour queries is fixed when the tree is
/// created. [`KdTree::new`] uses [`SquaredEuclidean`]; any other
/// [`DistanceMetric`](crate::distance::DistanceMetric) can be selected with
/// [`KdTree::with_metric`].
pub struct KdTree<D = SquaredEuclidean> {
    pub(crate) root: Option<Box<KdNode>>,
    pub(crate) dims: usize,
    pub(crate) size: usize,
    metric: PhantomData<fn() -> D>,
}

#[doc(hidden)]
#[derive(Debug)]
pub struct KdNode {
    pub(crate) point: Point,
    pub(crate) left: Option<Box<KdNode>>,
    pub(crate) right: Option<Box<KdNode>>,
}

impl KdNode {
    pub(crate) fn new(point: Point) -> Box<Self> {
        Box::new(Self {
            point,
            left: None,
            right: None,
        })
    }
}

/// Selects how queries walk the tree.
///
/// Both produce identical results. `ExplicitStack` keeps traversal state on the heap, so
/// a degenerate tree built from sorted input cannot exhaust the call stack.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Traversal {
    /// Native recursion, one call frame per tree level.
    #[default]
    Recursive,
    /// Iteration driven by a heap-allocated work stack.
    ExplicitStack,
}

impl KdTree<SquaredEuclidean> {
    /// Creates a new, empty tree of dimensionality `dims`, using squared euclidean distance.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use kdspace::KdTree;
    ///
    /// let mut tree = KdTree::new(3).unwrap();
    ///
    /// tree.insert([1, 2, 5]).unwrap();
    ///
    /// assert_eq!(tree.size(), 1);
    /// ```
    #[inline]
    pub fn new(dims: usize) -> Result<Self> {
        Self::with_metric(dims)
    }

    /// Builds a squared euclidean tree by inserting `points` in the order given.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use kdspace::KdTree;
    ///
    /// let tree = KdTree::from_points(2, [[0, 0], [1, 1], [2, 2]]).unwrap();
    ///
    /// assert_eq!(tree.size(), 3);
    /// ```
    #[inline]
    pub fn from_points<I, P>(dims: usize, points: I) -> Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: Into<Point>,
    {
        Self::from_points_with_metric(dims, points)
    }
}

impl<D> KdTree<D> {
    /// Creates a new, empty tree of dimensionality `dims` that measures distance with `D`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use kdspace::distance::Manhattan;
    /// use kdspace::KdTree;
    ///
    /// let tree: KdTree<Manhattan> = KdTree::with_metric(2).unwrap();
    ///
    /// assert!(tree.is_empty());
    /// ```
    pub fn with_metric(dims: usize) -> Result<Self> {
        if dims == 0 {
            return Err(KdError::InvalidArgument(
                "a tree needs at least one dimension".to_string(),
            ));
        }

        Ok(Self {
            root: None,
            dims,
            size: 0,
            metric: PhantomData,
        })
    }

    /// Builds a tree that measures distance with `D` by inserting `points` in the order given.
    ///
    /// Shape depends on that order: sorted input produces a degenerate, list-like tree.
    /// [`loader`](crate::loader) shuffles before calling this.
    pub fn from_points_with_metric<I, P>(dims: usize, points: I) -> Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: Into<Point>,
    {
        let mut tree = Self::with_metric(dims)?;
        for point in points {
            tree.insert(point)?;
        }
        Ok(tree)
    }

    /// Returns the number of points stored in the tree
    ///
    /// # Examples
    ///
    /// ```rust
    /// use kdspace::KdTree;
    ///
    /// let mut tree = KdTree::new(3).unwrap();
    ///
    /// tree.insert([1, 2, 5]).unwrap();
    /// tree.insert([1, 2, 5]).unwrap();
    ///
    /// assert_eq!(tree.size(), 2);
    /// ```
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns true if no points have been inserted.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// The dimensionality every stored and query point must have.
    #[inline]
    pub fn dims(&self) -> usize {
        self.dims
    }

    /// Number of levels in the tree: 0 when empty, 1 for a lone root.
    pub fn height(&self) -> usize {
        let mut stack: Vec<(&KdNode, usize)> = Vec::new();
        if let Some(root) = self.root.as_deref() {
            stack.push((root, 1));
        }

        let mut height = 0;
        while let Some((node, level)) = stack.pop() {
            height = height.max(level);
            for child in [node.left.as_deref(), node.right.as_deref()]
                .into_iter()
                .flatten()
            {
                stack.push((child, level + 1));
            }
        }
        height
    }

    /// Iterate over all stored points in arbitrary order.
    ///
    /// ```
    /// use kdspace::{KdTree, Point};
    ///
    /// let mut tree = KdTree::new(2).unwrap();
    /// tree.insert([1, 2]).unwrap();
    ///
    /// let points: Vec<&Point> = tree.iter().collect();
    /// assert_eq!(points, vec![&Point::from([1, 2])]);
    /// ```
    pub fn iter(&self) -> TreeIter<'_> {
        TreeIter::new(self.root.as_deref())
    }

    /// Releases every node in the tree.
    ///
    /// Consumes the tree, so no further operation can be issued against it. Equivalent to
    /// dropping it.
    pub fn teardown(self) {
        drop(self)
    }

    pub(crate) fn check_dims(&self, what: &str, coords: &[crate::point::Coord]) -> Result<()> {
        if coords.len() != self.dims {
            return Err(KdError::dimension_mismatch(what, self.dims, coords.len()));
        }
        Ok(())
    }
}

impl<D> Drop for KdTree<D> {
    fn drop(&mut self) {
        // Box's own drop recurses once per level, which overflows on degenerate trees.
        let mut stack: Vec<Box<KdNode>> = self.root.take().into_iter().collect();
        while let Some(mut node) = stack.pop() {
            stack.extend(node.left.take());
            stack.extend(node.right.take());
        }
    }
}

impl<D> fmt::Debug for KdTree<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KdTree")
            .field("dims", &self.dims)
            .field("size", &self.size)
            .field("metric", &std::any::type_name::<D>())
            .finish_non_exhaustive()
    }
}
