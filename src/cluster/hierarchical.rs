//! Hierarchical (agglomerative) clustering over a distance matrix.
//!
//! Bottom-up clustering that builds a **dendrogram** by iteratively
//! merging the closest clusters. Cut the tree afterwards to get any
//! number of groups.
//!
//! # Linkage Methods
//!
//! | Linkage | Formula | Effect |
//! |---------|---------|--------|
//! | Single | min(d(a,b)) for a∈A, b∈B | Chaining; elongated clusters |
//! | Complete | max(d(a,b)) | Compact, spherical clusters |
//! | Average | mean(d(a,b)) | Balanced compromise |
//! | Ward | Δ variance | Minimizes within-cluster variance |
//!
//! ## Ward's Method
//!
//! Ward linkage merges the pair of clusters whose union increases total
//! within-cluster variance the least:
//!
//! ```text
//! Δ(A,B) = (nₐ × nᵦ)/(nₐ + nᵦ) × ||μₐ - μᵦ||²
//! ```
//!
//! Only pairwise dissimilarities are available here (response embeddings
//! are not), so the update runs through the Lance-Williams recurrence on
//! the distance matrix. Two singletons merge at exactly their distance.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::traits::Clustering;
use crate::error::{ClusteringError, Result};
use crate::hierarchy::{cut_tree, ClusterAssignment, ClusterTree, Dendrogram};
use crate::matrix::DistanceMatrix;
use kodama::{linkage as kodama_linkage, Method as KodamaMethod};

/// Linkage method for hierarchical clustering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Linkage {
    /// Single linkage: minimum distance between clusters.
    Single,
    /// Complete linkage: maximum distance between clusters.
    Complete,
    /// Average linkage: mean distance between clusters.
    Average,
    /// Ward's method: minimize within-cluster variance.
    #[default]
    Ward,
}

impl From<Linkage> for KodamaMethod {
    fn from(linkage: Linkage) -> Self {
        match linkage {
            Linkage::Single => KodamaMethod::Single,
            Linkage::Complete => KodamaMethod::Complete,
            Linkage::Average => KodamaMethod::Average,
            Linkage::Ward => KodamaMethod::Ward,
        }
    }
}

/// Build a dendrogram over every item of `distances`.
///
/// Fails when the matrix has fewer than two items or holds a non-finite
/// entry. Only the upper triangle is read.
pub fn cluster(
    distances: &DistanceMatrix,
    linkage: Linkage,
) -> std::result::Result<ClusterTree, ClusteringError> {
    HierarchicalClustering::new(1)
        .with_linkage(linkage)
        .fit_tree(distances)
}

/// Hierarchical (agglomerative) clustering.
#[derive(Debug, Clone)]
pub struct HierarchicalClustering {
    /// Number of clusters produced by [`Clustering::fit_predict`].
    n_clusters: usize,
    /// Linkage method.
    linkage: Linkage,
}

impl HierarchicalClustering {
    /// Create a new hierarchical clusterer (Ward linkage).
    pub fn new(n_clusters: usize) -> Self {
        Self {
            n_clusters,
            linkage: Linkage::Ward,
        }
    }

    /// Set linkage method.
    pub fn with_linkage(mut self, linkage: Linkage) -> Self {
        self.linkage = linkage;
        self
    }

    /// Linkage in use.
    pub fn linkage(&self) -> Linkage {
        self.linkage
    }

    /// Fit and return the raw merge log.
    pub fn fit_dendrogram(
        &self,
        distances: &DistanceMatrix,
    ) -> std::result::Result<Dendrogram, ClusteringError> {
        distances.validate()?;

        let n = distances.len();
        let mut condensed = distances.condensed();

        // kodama uses SciPy/MATLAB-style cluster labels:
        // - leaves: 0..n-1
        // - each merge i creates cluster id n+i
        let dend = kodama_linkage(&mut condensed, n, self.linkage.into());

        let mut dendro = Dendrogram::new(n);
        for step in dend.steps() {
            dendro.add_merge(step.cluster1, step.cluster2, step.dissimilarity, step.size);
        }
        debug!(n, linkage = ?self.linkage, "built dendrogram");

        Ok(dendro)
    }

    /// Fit and return the merge tree.
    pub fn fit_tree(
        &self,
        distances: &DistanceMatrix,
    ) -> std::result::Result<ClusterTree, ClusteringError> {
        self.fit_dendrogram(distances)?.to_tree()
    }
}

impl Clustering for HierarchicalClustering {
    fn fit_predict(&self, distances: &DistanceMatrix) -> Result<ClusterAssignment> {
        let tree = self.fit_tree(distances)?;
        Ok(cut_tree(&tree, self.n_clusters, distances.len()))
    }

    fn n_clusters(&self) -> usize {
        self.n_clusters
    }
}
