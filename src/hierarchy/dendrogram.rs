//! Merge log produced by agglomerative clustering.
//!
//! Linkage backends report merges in SciPy order: leaves are labelled
//! `0..n`, and merge `i` creates cluster `n + i`. [`Dendrogram`] records that
//! log verbatim; [`Dendrogram::to_tree`] turns it into a [`ClusterTree`].

use tracing::warn;

use super::node::ClusterNode;
use super::tree::ClusterTree;
use crate::error::ClusteringError;

/// A dendrogram as a sequence of merges.
#[derive(Debug, Clone)]
pub struct Dendrogram {
    merges: Vec<Merge>,
    n_items: usize,
}

/// A single merge operation in the dendrogram.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Merge {
    /// First cluster being merged (label).
    pub cluster_a: usize,
    /// Second cluster being merged (label).
    pub cluster_b: usize,
    /// Dissimilarity at which the merge occurred.
    pub distance: f64,
    /// Size of resulting cluster.
    pub size: usize,
}

impl Dendrogram {
    /// Create an empty merge log for `n_items` leaves.
    pub fn new(n_items: usize) -> Self {
        Self {
            merges: Vec::with_capacity(n_items.saturating_sub(1)),
            n_items,
        }
    }

    /// Record a merge operation.
    pub fn add_merge(&mut self, cluster_a: usize, cluster_b: usize, distance: f64, size: usize) {
        self.merges.push(Merge {
            cluster_a,
            cluster_b,
            distance,
            size,
        });
    }

    /// Number of original items.
    pub fn n_items(&self) -> usize {
        self.n_items
    }

    /// Number of merges recorded.
    pub fn n_merges(&self) -> usize {
        self.merges.len()
    }

    /// Iterate over merges.
    pub fn merges(&self) -> impl Iterator<Item = &Merge> {
        self.merges.iter()
    }

    /// Merge distances in log order.
    pub fn distances(&self) -> Vec<f64> {
        self.merges.iter().map(|m| m.distance).collect()
    }

    /// Build the binary tree described by the log.
    ///
    /// Each internal height is raised to the larger of its children's
    /// heights if the backend reported an inversion, so heights never
    /// decrease on the way to the root.
    pub fn to_tree(&self) -> Result<ClusterTree, ClusteringError> {
        let n = self.n_items;
        if n == 0 {
            return Err(ClusteringError::TooFewItems { found: 0 });
        }
        if self.merges.len() != n - 1 {
            return Err(ClusteringError::MalformedMerges(format!(
                "{} items need {} merges, found {}",
                n,
                n - 1,
                self.merges.len()
            )));
        }

        let mut slots: Vec<Option<ClusterNode>> = (0..n).map(|i| Some(ClusterNode::leaf(i))).collect();
        slots.resize(2 * n - 1, None);

        for (i, merge) in self.merges.iter().enumerate() {
            let label = n + i;
            if !merge.distance.is_finite() {
                return Err(ClusteringError::MalformedMerges(format!(
                    "merge {i} has non-finite height {}",
                    merge.distance
                )));
            }
            let left = take_cluster(&mut slots, merge.cluster_a, label)?;
            let right = take_cluster(&mut slots, merge.cluster_b, label)?;

            let floor = left.height().max(right.height());
            let height = if merge.distance < floor {
                warn!(
                    merge = i,
                    reported = merge.distance,
                    clamped = floor,
                    "merge height inversion clamped"
                );
                floor
            } else {
                merge.distance
            };
            slots[label] = Some(ClusterNode::merge(left, right, height));
        }

        slots[2 * n - 2]
            .take()
            .map(ClusterTree::new)
            .ok_or_else(|| ClusteringError::MalformedMerges("no root produced".to_string()))
    }
}

/// Remove cluster `id` from the slot table so it can become a child of `label`.
fn take_cluster(
    slots: &mut [Option<ClusterNode>],
    id: usize,
    label: usize,
) -> Result<ClusterNode, ClusteringError> {
    if id >= label {
        return Err(ClusteringError::MalformedMerges(format!(
            "cluster {label} references cluster {id} before it exists"
        )));
    }
    slots
        .get_mut(id)
        .and_then(Option::take)
        .ok_or_else(|| ClusteringError::MalformedMerges(format!("cluster {id} merged twice")))
}
