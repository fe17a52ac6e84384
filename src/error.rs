use thiserror::Error;

/// Result alias for `evalscope`.
pub type Result<T> = std::result::Result<T, Error>;

/// Reasons a distance matrix (or a merge log) cannot be turned into a tree.
///
/// Hosts are expected to catch these per prompt and render a
/// "could not generate dendrogram" state instead of failing the whole view.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClusteringError {
    /// Fewer than two items were supplied.
    #[error("need at least 2 items to cluster, got {found}")]
    TooFewItems {
        /// Number of items found.
        found: usize,
    },

    /// A row does not have as many columns as the matrix has rows.
    #[error("distance matrix is not square: expected {expected} columns, row {row} has {found}")]
    NotSquare {
        /// Offending row.
        row: usize,
        /// Expected column count.
        expected: usize,
        /// Found column count.
        found: usize,
    },

    /// An entry is NaN or infinite.
    #[error("distance matrix entry ({row}, {col}) is not finite")]
    NonFinite {
        /// Row index.
        row: usize,
        /// Column index.
        col: usize,
    },

    /// The merge log does not describe a single binary tree over all leaves.
    #[error("malformed merge log: {0}")]
    MalformedMerges(String),
}

/// Errors returned by `evalscope`.
#[derive(Debug, Error)]
pub enum Error {
    /// Clustering input was rejected.
    #[error(transparent)]
    Clustering(#[from] ClusteringError),

    /// Two inputs that must line up have different lengths.
    #[error("length mismatch: expected {expected}, found {found}")]
    LengthMismatch {
        /// Expected length.
        expected: usize,
        /// Found length.
        found: usize,
    },

    /// Invalid parameter value.
    #[error("invalid parameter '{name}': {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Error message.
        message: String,
    },

    /// Evaluation data or configuration could not be parsed.
    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
}
