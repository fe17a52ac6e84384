//! Rooted cluster tree.

use serde::Serialize;

use super::node::ClusterNode;

/// A complete dendrogram over `n_leaves` items.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterTree {
    root: ClusterNode,
    n_leaves: usize,
}

impl ClusterTree {
    /// Wrap a root node.
    pub fn new(root: ClusterNode) -> Self {
        let n_leaves = root.size();
        Self { root, n_leaves }
    }

    /// Root node.
    pub fn root(&self) -> &ClusterNode {
        &self.root
    }

    /// Number of leaf nodes.
    pub fn n_leaves(&self) -> usize {
        self.n_leaves
    }

    /// Height of the root (the largest merge height).
    pub fn height(&self) -> f64 {
        self.root.height()
    }

    /// Heights of every internal node, in pre-order.
    pub fn merge_heights(&self) -> Vec<f64> {
        let mut heights = Vec::with_capacity(self.n_leaves.saturating_sub(1));
        let mut stack = vec![&self.root];
        while let Some(node) = stack.pop() {
            if let ClusterNode::Internal {
                height, left, right, ..
            } = node
            {
                heights.push(*height);
                stack.push(right);
                stack.push(left);
            }
        }
        heights
    }

    /// Leaf indices in drawing order (left to right).
    pub fn leaf_order(&self) -> Vec<usize> {
        self.root.leaves()
    }

    /// True when no internal node sits below either of its children.
    pub fn is_monotone(&self) -> bool {
        let mut stack = vec![&self.root];
        while let Some(node) = stack.pop() {
            if let ClusterNode::Internal {
                height, left, right, ..
            } = node
            {
                if *height < left.height() || *height < right.height() {
                    return false;
                }
                stack.push(left);
                stack.push(right);
            }
        }
        true
    }

    /// Height of the lowest common ancestor of leaves `i` and `j`.
    ///
    /// `None` when either index is not a leaf of this tree.
    pub fn cophenetic_distance(&self, i: usize, j: usize) -> Option<f64> {
        if i >= self.n_leaves || j >= self.n_leaves {
            return None;
        }
        if i == j {
            return Some(0.0);
        }
        let mut node = &self.root;
        while let ClusterNode::Internal {
            height, left, right, ..
        } = node
        {
            let lhs = left.leaves();
            match (lhs.contains(&i), lhs.contains(&j)) {
                (true, true) => node = left,
                (false, false) => node = right,
                _ => return Some(*height),
            }
        }
        None
    }

    /// Cophenetic distances: entry `(i, j)` is the height of the lowest
    /// common ancestor of leaves `i` and `j`.
    pub fn cophenetic_matrix(&self) -> Vec<Vec<f64>> {
        let n = self.n_leaves;
        let mut out = vec![vec![0.0; n]; n];
        let mut stack = vec![&self.root];
        while let Some(node) = stack.pop() {
            if let ClusterNode::Internal {
                height, left, right, ..
            } = node
            {
                let lhs = left.leaves();
                let rhs = right.leaves();
                for &a in &lhs {
                    for &b in &rhs {
                        if a < n && b < n {
                            out[a][b] = *height;
                            out[b][a] = *height;
                        }
                    }
                }
                stack.push(left);
                stack.push(right);
            }
        }
        out
    }
}
