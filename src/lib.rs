//! # evalscope
//!
//! Similarity clustering and headline statistics for comparing model
//! responses across an evaluation run.
//!
//! Per prompt, a pairwise similarity matrix is turned into distances,
//! clustered with Ward linkage, cut into a few groups, and summarised so a
//! dendrogram view can colour each cell by how tightly it sits in its
//! cluster. Across prompts, [`stats`] computes the dashboard numbers
//! (best and worst models, most and least consistent prompts, coverage
//! ranges, judge disagreement, outliers) and [`projection`] lays models out
//! on a single axis.
//!
//! ```rust
//! use evalscope::{analyze_prompt, Linkage, SimilarityMatrix};
//!
//! let mut sim = SimilarityMatrix::new();
//! sim.insert("m1", "m2", 0.8);
//! sim.insert("m1", "m3", 0.3);
//! sim.insert("m2", "m3", 0.4);
//!
//! let out = analyze_prompt(&sim, &["m1", "m2", "m3"], 2, Linkage::Ward).unwrap();
//! assert_eq!(out.assignment.label(0), out.assignment.label(1));
//! assert_ne!(out.assignment.label(0), out.assignment.label(2));
//! ```
//!
//! Missing data is normal here: absent or NaN similarities and failed
//! coverage cells are excluded (or treated as zero similarity where a full
//! matrix is required) and never raise an error.

pub mod cluster;
pub mod config;
/// Error types used across `evalscope`.
pub mod error;
pub mod hierarchy;
pub mod matrix;
pub mod pipeline;
pub mod projection;
pub mod stats;
pub mod summary;

#[cfg(test)]
mod scenario_tests;

pub use cluster::{cluster, Clustering, HierarchicalClustering, Linkage};
pub use config::{AnalysisConfig, HybridWeights, IDEAL_MODEL_ID};
pub use error::{ClusteringError, Error, Result};
pub use hierarchy::{cut_tree, ClusterAssignment, ClusterNode, ClusterTree, Dendrogram};
pub use matrix::{DistanceMatrix, SimilarityMatrix};
pub use pipeline::{analyze_prompt, analyze_prompts, PromptClustering};
pub use projection::{project_to_axis, AxisCoord, AxisProjection};
pub use summary::{summarize_clusters, ClusterSummary, PerItemClusterInfo};
