//! Dendrogram node.

use core::fmt;

use serde::Serialize;

/// A node of a binary merge tree.
///
/// Leaves wrap the index of an original item; internal nodes record the
/// dissimilarity at which their two children were merged.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ClusterNode {
    /// An original item.
    Leaf {
        /// Index into the item list the tree was built from.
        index: usize,
    },
    /// A merge of two subtrees.
    Internal {
        /// Merge height (never below either child's height).
        height: f64,
        /// Number of leaves below this node.
        size: usize,
        /// First merged subtree.
        left: Box<ClusterNode>,
        /// Second merged subtree.
        right: Box<ClusterNode>,
    },
}

impl ClusterNode {
    /// Create a leaf.
    pub fn leaf(index: usize) -> Self {
        ClusterNode::Leaf { index }
    }

    /// Merge two subtrees at `height`.
    pub fn merge(left: ClusterNode, right: ClusterNode, height: f64) -> Self {
        let size = left.size() + right.size();
        ClusterNode::Internal {
            height,
            size,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Check if this is a leaf node.
    pub fn is_leaf(&self) -> bool {
        matches!(self, ClusterNode::Leaf { .. })
    }

    /// Merge height; 0 for leaves.
    pub fn height(&self) -> f64 {
        match self {
            ClusterNode::Leaf { .. } => 0.0,
            ClusterNode::Internal { height, .. } => *height,
        }
    }

    /// Number of leaves below (and including) this node.
    pub fn size(&self) -> usize {
        match self {
            ClusterNode::Leaf { .. } => 1,
            ClusterNode::Internal { size, .. } => *size,
        }
    }

    /// The two children of an internal node.
    pub fn children(&self) -> Option<(&ClusterNode, &ClusterNode)> {
        match self {
            ClusterNode::Leaf { .. } => None,
            ClusterNode::Internal { left, right, .. } => Some((left, right)),
        }
    }

    /// Leaf indices below this node, left to right.
    pub fn leaves(&self) -> Vec<usize> {
        let mut out = Vec::with_capacity(self.size());
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            match node {
                ClusterNode::Leaf { index } => out.push(*index),
                ClusterNode::Internal { left, right, .. } => {
                    stack.push(right);
                    stack.push(left);
                }
            }
        }
        out
    }
}

impl fmt::Display for ClusterNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClusterNode::Leaf { index } => write!(f, "Leaf[{index}]"),
            ClusterNode::Internal {
                height,
                left,
                right,
                ..
            } => write!(f, "({left} {right})@{height:.3}"),
        }
    }
}
