//! Clustering traits.

use crate::error::Result;
use crate::hierarchy::ClusterAssignment;
use crate::matrix::DistanceMatrix;

/// Trait for clustering algorithms that work from pairwise distances.
pub trait Clustering {
    /// Fit the model to a distance matrix and return cluster assignments.
    ///
    /// Returns one label per row of `distances`.
    fn fit_predict(&self, distances: &DistanceMatrix) -> Result<ClusterAssignment>;

    /// Get the number of clusters.
    fn n_clusters(&self) -> usize;
}
