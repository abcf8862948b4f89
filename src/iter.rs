use crate::kdtree::KdNode;
use crate::point::Point;

/// Iterator over every point in a [`KdTree`](crate::KdTree), in pre-order.
#[derive(Debug)]
pub struct TreeIter<'a> {
    stack: Vec<&'a KdNode>,
}

impl<'a> TreeIter<'a> {
    pub(crate) fn new(root: Option<&'a KdNode>) -> Self {
        Self {
            stack: root.into_iter().collect(),
        }
    }
}

impl<'a> Iterator for TreeIter<'a> {
    type Item = &'a Point;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.right.as_deref());
        self.stack.extend(node.left.as_deref());
        Some(&node.point)
    }
}
