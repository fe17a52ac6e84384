//! Per-item cluster cohesion, used to colour dendrogram cells.
//!
//! For every item we report the mean similarity to the other members of its
//! cluster. A singleton cluster scores 1.0. The minimum and maximum of those
//! means across the view are kept so a renderer can scale colour intensity
//! with [`ClusterSummary::intensity`].

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

use crate::error::{Error, Result};
use crate::hierarchy::ClusterAssignment;
use crate::matrix::SimilarityMatrix;

/// Cluster membership and cohesion of one item.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerItemClusterInfo {
    /// Cluster id from the assignment.
    pub cluster_id: usize,
    /// Mean similarity to the other members (1.0 when alone).
    pub avg_similarity: f64,
    /// Other items in the same cluster, in item order.
    pub members: Vec<String>,
}

/// Cohesion of every item in one view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterSummary {
    /// Per-item information, in item order.
    pub items: IndexMap<String, PerItemClusterInfo>,
    /// Smallest per-item average (None for an empty view).
    pub min_avg_similarity: Option<f64>,
    /// Largest per-item average (None for an empty view).
    pub max_avg_similarity: Option<f64>,
}

impl ClusterSummary {
    /// Information for `item`.
    pub fn get(&self, item: &str) -> Option<&PerItemClusterInfo> {
        self.items.get(item)
    }

    /// Average similarity of `item`, rescaled so the view's minimum maps to 0
    /// and its maximum to 1. Every item maps to 1.0 when all averages are equal.
    pub fn intensity(&self, item: &str) -> Option<f64> {
        let avg = self.items.get(item)?.avg_similarity;
        let (lo, hi) = (self.min_avg_similarity?, self.max_avg_similarity?);
        let range = hi - lo;
        if range > 0.0 {
            Some((avg - lo) / range)
        } else {
            Some(1.0)
        }
    }
}

/// Fail with `Error::InvalidParameter` when an id appears twice in `items`.
pub(crate) fn ensure_unique_items<S: AsRef<str>>(items: &[S]) -> Result<()> {
    let mut seen = IndexSet::with_capacity(items.len());
    for item in items {
        if !seen.insert(item.as_ref()) {
            return Err(Error::InvalidParameter {
                name: "items",
                message: format!("duplicate item id {:?}", item.as_ref()),
            });
        }
    }
    Ok(())
}

/// Summarise how tightly each item sits in its cluster.
///
/// `assignment` must label exactly `items.len()` items, and item ids must
/// be unique. Similarities use
/// the symmetric lookup with the zero fallback; values are not clamped.
pub fn summarize_clusters<S: AsRef<str>>(
    assignment: &ClusterAssignment,
    matrix: &SimilarityMatrix,
    items: &[S],
) -> Result<ClusterSummary> {
    if assignment.len() != items.len() {
        return Err(Error::LengthMismatch {
            expected: items.len(),
            found: assignment.len(),
        });
    }
    ensure_unique_items(items)?;

    let groups = assignment.groups();
    let mut out = IndexMap::with_capacity(items.len());
    let mut min_avg: Option<f64> = None;
    let mut max_avg: Option<f64> = None;

    for (i, item) in items.iter().enumerate() {
        let item = item.as_ref();
        let cluster_id = assignment.labels()[i];
        let others: Vec<usize> = groups
            .get(&cluster_id)
            .map(|members| members.iter().copied().filter(|&j| j != i).collect())
            .unwrap_or_default();

        let avg_similarity = if others.is_empty() {
            1.0
        } else {
            let total: f64 = others
                .iter()
                .map(|&j| matrix.similarity_or_zero(item, items[j].as_ref()))
                .sum();
            total / others.len() as f64
        };

        min_avg = Some(min_avg.map_or(avg_similarity, |m| m.min(avg_similarity)));
        max_avg = Some(max_avg.map_or(avg_similarity, |m| m.max(avg_similarity)));

        out.insert(
            item.to_string(),
            PerItemClusterInfo {
                cluster_id,
                avg_similarity,
                members: others.iter().map(|&j| items[j].as_ref().to_string()).collect(),
            },
        );
    }

    Ok(ClusterSummary {
        items: out,
        min_avg_similarity: min_avg,
        max_avg_similarity: max_avg,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix() -> SimilarityMatrix {
        let mut m = SimilarityMatrix::new();
        m.insert("a", "b", 0.9);
        m.insert("c", "a", 0.5);
        m.insert("b", "c", 0.7);
        m
    }

    #[test]
    fn test_cohesion_and_singletons() {
        let assignment = ClusterAssignment::from_labels(vec![0, 0, 1]);
        let summary = summarize_clusters(&assignment, &matrix(), &["a", "b", "c"]).unwrap();

        let a = summary.get("a").unwrap();
        assert_eq!(a.cluster_id, 0);
        assert!((a.avg_similarity - 0.9).abs() < 1e-10);
        assert_eq!(a.members, vec!["b".to_string()]);

        let c = summary.get("c").unwrap();
        assert_eq!(c.avg_similarity, 1.0);
        assert!(c.members.is_empty());

        assert_eq!(summary.min_avg_similarity, Some(0.9));
        assert_eq!(summary.max_avg_similarity, Some(1.0));
    }

    #[test]
    fn test_one_cluster_average() {
        let assignment = ClusterAssignment::from_labels(vec![3, 3, 3]);
        let summary = summarize_clusters(&assignment, &matrix(), &["a", "b", "c"]).unwrap();
        // a: (0.9 + 0.5) / 2
        assert!((summary.get("a").unwrap().avg_similarity - 0.7).abs() < 1e-10);
        // c: (0.5 + 0.7) / 2
        assert!((summary.get("c").unwrap().avg_similarity - 0.6).abs() < 1e-10);
    }

    #[test]
    fn test_intensity_scaling() {
        let assignment = ClusterAssignment::from_labels(vec![0, 0, 0]);
        let summary = summarize_clusters(&assignment, &matrix(), &["a", "b", "c"]).unwrap();
        // a: 0.7, b: 0.8, c: 0.6
        assert!((summary.intensity("c").unwrap() - 0.0).abs() < 1e-10);
        assert!((summary.intensity("b").unwrap() - 1.0).abs() < 1e-10);
        assert!((summary.intensity("a").unwrap() - 0.5).abs() < 1e-10);
        assert_eq!(summary.intensity("zzz"), None);
    }

    #[test]
    fn test_flat_range_is_full_intensity() {
        let assignment = ClusterAssignment::from_labels(vec![0, 1]);
        let summary = summarize_clusters(&assignment, &matrix(), &["a", "b"]).unwrap();
        assert_eq!(summary.intensity("a"), Some(1.0));
    }

    #[test]
    fn test_missing_similarity_counts_as_zero() {
        let assignment = ClusterAssignment::from_labels(vec![0, 0]);
        let summary = summarize_clusters(&assignment, &matrix(), &["a", "zzz"]).unwrap();
        assert_eq!(summary.get("a").unwrap().avg_similarity, 0.0);
    }

    #[test]
    fn test_length_mismatch() {
        let assignment = ClusterAssignment::from_labels(vec![0]);
        let err = summarize_clusters(&assignment, &matrix(), &["a", "b"]).unwrap_err();
        assert!(matches!(err, Error::LengthMismatch { expected: 2, found: 1 }));
    }

    #[test]
    fn test_duplicate_items_rejected() {
        let assignment = ClusterAssignment::from_labels(vec![0, 0, 1]);
        let err = summarize_clusters(&assignment, &matrix(), &["a", "b", "a"]).unwrap_err();
        assert!(matches!(err, Error::InvalidParameter { name: "items", .. }));
    }
}
