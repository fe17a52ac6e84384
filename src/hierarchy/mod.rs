//! Dendrograms and flat cuts.
//!
//! Agglomerative clustering produces a merge log ([`Dendrogram`]); the
//! rest of the crate works on the binary tree it describes:
//!
//! ```text
//!         * (height=0.9)
//!        / \
//!       *   * (height=0.2)
//!      / \ / \
//!     0  1 2  3 (leaves)
//!     (height=0.1)
//! ```
//!
//! - [`ClusterNode`] is a sum type: a leaf wraps an item index, an internal
//!   node holds a merge height and exactly two children.
//! - [`ClusterTree`] adds tree-wide queries: merge heights, drawing order,
//!   cophenetic distances.
//! - [`cut_tree`] turns a tree into a [`ClusterAssignment`] with a target
//!   number of groups.
//!
//! Heights never decrease from a leaf to the root, so the cophenetic
//! distances are ultrametric ([`is_ultrametric`]).

mod cut;
mod dendrogram;
pub mod foundations;
mod node;
mod tree;

pub use cut::{cut_tree, ClusterAssignment};
pub use dendrogram::{Dendrogram, Merge};
pub use foundations::is_ultrametric;
pub use node::ClusterNode;
pub use tree::ClusterTree;
