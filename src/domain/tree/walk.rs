//! Explicit-stack pre-order traversal.

use crate::domain::case::TreeNode;

/// Depth-first pre-order iterator yielding `(node, depth)` pairs.
///
/// Children are visited in their declared order.
pub struct PreOrder<'a> {
    stack: Vec<(&'a TreeNode, usize)>,
}

impl<'a> PreOrder<'a> {
    /// Walks `root`, reporting it at `start_depth`.
    pub fn new(root: &'a TreeNode, start_depth: usize) -> Self {
        Self {
            stack: vec![(root, start_depth)],
        }
    }
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = (&'a TreeNode, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let (node, depth) = self.stack.pop()?;
        self.stack
            .extend(node.children.iter().rev().map(|child| (child, depth + 1)));
        Some((node, depth))
    }
}
