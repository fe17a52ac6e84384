//! Cutting a dendrogram into a flat clustering.
//!
//! # Choosing the cut height
//!
//! With `n` leaves there are `n - 1` merge heights. Collapsing the `n - k`
//! lowest merges leaves exactly `k` groups, so the threshold is the
//! `(n - k)`-th smallest height:
//!
//! ```text
//! heights (sorted):  h1 <= h2 <= ... <= h(n-1)
//! cut(k)          =  h(n-k)
//! ```
//!
//! Every subtree whose root height is `<= cut` becomes one cluster; taller
//! subtrees are split and each child is examined in turn. When several
//! merges share the threshold height they all collapse, so ties can yield
//! fewer than `k` clusters.
//!
//! Cluster ids are handed out in depth-first, left-first order. They are
//! stable for a given tree but carry no meaning across trees.

use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, warn};

use super::node::ClusterNode;
use super::tree::ClusterTree;

/// Flat cluster labels, one per item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ClusterAssignment {
    labels: Vec<usize>,
}

impl ClusterAssignment {
    /// Wrap precomputed labels.
    pub fn from_labels(labels: Vec<usize>) -> Self {
        Self { labels }
    }

    /// Number of labelled items.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// True when no items are labelled.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Cluster id of item `i`.
    pub fn label(&self, i: usize) -> Option<usize> {
        self.labels.get(i).copied()
    }

    /// All labels, indexed by item.
    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    /// Number of distinct cluster ids.
    pub fn n_clusters(&self) -> usize {
        self.groups().len()
    }

    /// Items labelled `id`, ascending.
    pub fn members(&self, id: usize) -> Vec<usize> {
        self.labels
            .iter()
            .enumerate()
            .filter(|(_, &l)| l == id)
            .map(|(i, _)| i)
            .collect()
    }

    /// Cluster id -> member items, in order of first appearance.
    pub fn groups(&self) -> IndexMap<usize, Vec<usize>> {
        let mut groups: IndexMap<usize, Vec<usize>> = IndexMap::new();
        for (i, &l) in self.labels.iter().enumerate() {
            groups.entry(l).or_default().push(i);
        }
        groups
    }
}

/// Cut `tree` into (at most) `k` clusters over `n` leaves.
///
/// - `k == 0`: every leaf in cluster 0.
/// - `k >= n`: every leaf in its own cluster (leaf `i` gets id `i`).
/// - otherwise: cut at the `(n - k)`-th smallest merge height.
///
/// Every index in `0..n` receives a label; a leaf the tree does not
/// mention falls back to cluster 0.
pub fn cut_tree(tree: &ClusterTree, k: usize, n: usize) -> ClusterAssignment {
    if k == 0 {
        return ClusterAssignment::from_labels(vec![0; n]);
    }
    if k >= n {
        return ClusterAssignment::from_labels((0..n).collect());
    }

    let mut heights = tree.merge_heights();
    heights.sort_by(f64::total_cmp);
    let cut = heights
        .get(n - k - 1)
        .or_else(|| heights.last())
        .copied()
        .unwrap_or(f64::INFINITY);

    let mut labels: Vec<Option<usize>> = vec![None; n];
    let mut next_id = 0usize;
    let mut stack: Vec<&ClusterNode> = vec![tree.root()];

    while let Some(node) = stack.pop() {
        match node {
            ClusterNode::Internal {
                height, left, right, ..
            } if *height > cut => {
                stack.push(right);
                stack.push(left);
            }
            _ => {
                for leaf in node.leaves() {
                    match labels.get_mut(leaf) {
                        Some(slot) => *slot = Some(next_id),
                        None => warn!(leaf, n, "leaf index outside item range ignored"),
                    }
                }
                next_id += 1;
            }
        }
    }

    let missing = labels.iter().filter(|l| l.is_none()).count();
    if missing > 0 {
        warn!(missing, "unassigned leaves defaulted to cluster 0");
    }
    debug!(k, n, cut, clusters = next_id, "cut dendrogram");

    ClusterAssignment::from_labels(labels.into_iter().map(|l| l.unwrap_or(0)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn four_leaf_tree() -> ClusterTree {
        let ab = ClusterNode::merge(ClusterNode::leaf(0), ClusterNode::leaf(1), 0.1);
        let cd = ClusterNode::merge(ClusterNode::leaf(2), ClusterNode::leaf(3), 0.2);
        ClusterTree::new(ClusterNode::merge(ab, cd, 0.9))
    }

    #[test]
    fn test_k_zero_is_one_cluster() {
        let a = cut_tree(&four_leaf_tree(), 0, 4);
        assert_eq!(a.labels(), &[0, 0, 0, 0]);
    }

    #[test]
    fn test_k_at_least_n_is_singletons() {
        let tree = four_leaf_tree();
        assert_eq!(cut_tree(&tree, 4, 4).labels(), &[0, 1, 2, 3]);
        assert_eq!(cut_tree(&tree, 10, 4).n_clusters(), 4);
    }

    #[test]
    fn test_cut_two() {
        let a = cut_tree(&four_leaf_tree(), 2, 4);
        assert_eq!(a.labels(), &[0, 0, 1, 1]);
        assert_eq!(a.members(1), vec![2, 3]);
    }

    #[test]
    fn test_cut_three_splits_taller_pair() {
        let a = cut_tree(&four_leaf_tree(), 3, 4);
        // {0,1} merged at 0.1 stays together; {2,3} at 0.2 splits.
        assert_eq!(a.labels(), &[0, 0, 1, 2]);
        assert_eq!(a.n_clusters(), 3);
    }

    #[test]
    fn test_cut_one_collapses_root() {
        let a = cut_tree(&four_leaf_tree(), 1, 4);
        assert_eq!(a.n_clusters(), 1);
    }

    #[test]
    fn test_ties_collapse_together() {
        let ab = ClusterNode::merge(ClusterNode::leaf(0), ClusterNode::leaf(1), 0.2);
        let cd = ClusterNode::merge(ClusterNode::leaf(2), ClusterNode::leaf(3), 0.2);
        let tree = ClusterTree::new(ClusterNode::merge(ab, cd, 0.9));
        let a = cut_tree(&tree, 3, 4);
        assert_eq!(a.n_clusters(), 2);
    }

    #[test]
    fn test_missing_leaf_defaults_to_zero() {
        // Tree only knows leaves 0 and 1, caller claims three items.
        let tree = ClusterTree::new(ClusterNode::merge(
            ClusterNode::leaf(0),
            ClusterNode::leaf(1),
            0.4,
        ));
        let a = cut_tree(&tree, 2, 3);
        assert_eq!(a.len(), 3);
        assert_eq!(a.label(2), Some(0));
    }

    #[test]
    fn test_groups_first_seen_order() {
        let a = ClusterAssignment::from_labels(vec![2, 0, 2, 1]);
        let groups: Vec<_> = a.groups().into_iter().collect();
        assert_eq!(groups, vec![(2, vec![0, 2]), (0, vec![1]), (1, vec![3])]);
    }
}
