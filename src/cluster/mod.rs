//! Clustering of model responses by semantic distance.
//!
//! Inputs are pairwise distances between responses (`1 - similarity`), not
//! embedding vectors, so only algorithms that run on a dissimilarity matrix
//! live here.
//!
//! ## Hierarchical (Agglomerative) Clustering
//!
//! Bottom-up: start with each response as its own cluster, repeatedly merge
//! the two closest clusters until one remains. The merge history forms a
//! **dendrogram**, a binary tree you can cut at any height to get k clusters.
//!
//! **Linkage methods** determine "distance between clusters":
//!
//! | Linkage | Distance | Effect |
//! |---------|----------|--------|
//! | Single | min(pairwise) | Chaining; elongated clusters |
//! | Complete | max(pairwise) | Compact, spherical clusters |
//! | Average | mean(pairwise) | Balanced compromise |
//! | Ward | Variance increase | Minimizes within-cluster variance |
//!
//! Ward is the default: it favours compact groups of roughly equal size,
//! which is what the per-prompt colouring wants.
//!
//! ## Usage
//!
//! ```rust
//! use evalscope::cluster::{cluster, Linkage};
//! use evalscope::hierarchy::cut_tree;
//! use evalscope::SimilarityMatrix;
//!
//! let mut sim = SimilarityMatrix::new();
//! sim.insert("a", "b", 0.95);
//! sim.insert("c", "d", 0.90);
//! for (x, y) in [("a", "c"), ("a", "d"), ("b", "c"), ("b", "d")] {
//!     sim.insert(x, y, 0.10);
//! }
//!
//! let items = ["a", "b", "c", "d"];
//! let tree = cluster(&sim.to_distance_matrix(&items), Linkage::Ward).unwrap();
//! let labels = cut_tree(&tree, 2, items.len());
//! assert_eq!(labels.label(0), labels.label(1));
//! assert_ne!(labels.label(0), labels.label(2));
//! ```

mod hierarchical;
mod traits;

pub use hierarchical::{cluster, HierarchicalClustering, Linkage};
pub use traits::Clustering;
