//! Per-prompt clustering pipeline.
//!
//! similarity matrix -> distance matrix -> linkage tree -> flat cut -> cohesion summary.
//!
//! Prompts are independent, so the batch entry point clusters them in
//! parallel when the `parallel` feature is on. A prompt that cannot be
//! clustered keeps its error; the others are unaffected.

use indexmap::IndexMap;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, warn};

use crate::cluster::{cluster, Linkage};
use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::hierarchy::{cut_tree, ClusterAssignment, ClusterTree};
use crate::matrix::SimilarityMatrix;
use crate::summary::{ensure_unique_items, summarize_clusters, ClusterSummary};

/// Everything a dendrogram view needs for one prompt.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptClustering {
    /// Items clustered, in matrix order. Leaf `i` is `items[i]`.
    pub items: Vec<String>,
    /// Merge tree.
    pub tree: ClusterTree,
    /// Flat clusters, indexed like `items`.
    pub assignment: ClusterAssignment,
    /// Cohesion of every item in its cluster.
    pub summary: ClusterSummary,
    /// Leaf indices in left-to-right display order.
    pub leaf_order: Vec<usize>,
}

impl PromptClustering {
    /// Item ids in display order.
    pub fn ordered_items(&self) -> Vec<&str> {
        self.leaf_order
            .iter()
            .map(|&i| self.items[i].as_str())
            .collect()
    }
}

/// Cluster the `items` of one prompt into (at most) `k` groups.
///
/// Item ids must be unique.
pub fn analyze_prompt<S: AsRef<str>>(
    matrix: &SimilarityMatrix,
    items: &[S],
    k: usize,
    linkage: Linkage,
) -> Result<PromptClustering> {
    ensure_unique_items(items)?;
    let n = items.len();
    let distances = matrix.to_distance_matrix(items);
    let tree = cluster(&distances, linkage)?;
    let assignment = cut_tree(&tree, k, n);
    let summary = summarize_clusters(&assignment, matrix, items)?;
    let leaf_order = tree.leaf_order();
    debug!(n, k, clusters = assignment.n_clusters(), "clustered prompt");

    Ok(PromptClustering {
        items: items.iter().map(|s| s.as_ref().to_string()).collect(),
        tree,
        assignment,
        summary,
        leaf_order,
    })
}

/// Cluster every prompt, keyed and ordered like `prompts`.
///
/// The configured ideal model is removed from each prompt's items.
pub fn analyze_prompts(
    prompts: &IndexMap<String, SimilarityMatrix>,
    config: &AnalysisConfig,
) -> IndexMap<String, Result<PromptClustering>> {
    let run = |(prompt, matrix): (&String, &SimilarityMatrix)| {
        let items: Vec<&str> = matrix
            .ids()
            .into_iter()
            .filter(|id| *id != config.ideal_model_id)
            .collect();
        let result = analyze_prompt(matrix, &items, config.cluster_count, config.linkage);
        if let Err(err) = &result {
            warn!(prompt = %prompt, error = %err, "could not cluster prompt");
        }
        (prompt.clone(), result)
    };

    let entries: Vec<(&String, &SimilarityMatrix)> = prompts.iter().collect();

    #[cfg(feature = "parallel")]
    let results: Vec<(String, Result<PromptClustering>)> =
        entries.into_par_iter().map(run).collect();

    #[cfg(not(feature = "parallel"))]
    let results: Vec<(String, Result<PromptClustering>)> = entries.into_iter().map(run).collect();

    results.into_iter().collect()
}
