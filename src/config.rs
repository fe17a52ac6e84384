//! Analysis configuration.
//!
//! The thresholds here are product-tuned and carried as constants; they are
//! not derived from the data. Override them through [`AnalysisConfig`] when a
//! dashboard needs different sensitivity.

use serde::{Deserialize, Serialize};

use crate::cluster::Linkage;
use crate::error::{Error, Result};

/// Reserved identifier of the reference ("ideal") response.
///
/// Never counted as a model, but usable as an anchor in similarity and axis views.
pub const IDEAL_MODEL_ID: &str = "IDEAL_MODEL_ID";

/// A model score is an outlier when it sits strictly more than this many
/// standard deviations from the prompt mean. A score exactly at the boundary
/// is not flagged.
pub const OUTLIER_STDDEV_MULTIPLE: f64 = 2.0;

/// Judge scores for one key point disagree when their population standard
/// deviation exceeds this.
pub const HIGH_DISAGREEMENT_STDDEV: f64 = 0.3;

/// Prompts whose score spread is at or below this never flag outliers.
pub const MIN_STDDEV: f64 = 1e-9;

/// Weight of semantic similarity in the hybrid score.
pub const HYBRID_SIMILARITY_WEIGHT: f64 = 0.35;

/// Weight of coverage extent in the hybrid score.
pub const HYBRID_COVERAGE_WEIGHT: f64 = 0.65;

/// Default number of clusters per prompt.
pub const DEFAULT_CLUSTER_COUNT: usize = 3;

/// Weights of the hybrid (similarity + coverage) score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HybridWeights {
    /// Weight applied to semantic similarity.
    pub similarity: f64,
    /// Weight applied to coverage extent.
    pub coverage: f64,
}

impl Default for HybridWeights {
    fn default() -> Self {
        Self {
            similarity: HYBRID_SIMILARITY_WEIGHT,
            coverage: HYBRID_COVERAGE_WEIGHT,
        }
    }
}

/// Configuration for clustering and summary statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnalysisConfig {
    /// Identifier of the reference response.
    pub ideal_model_id: String,
    /// Linkage used for per-prompt dendrograms.
    pub linkage: Linkage,
    /// Target number of clusters per prompt.
    pub cluster_count: usize,
    /// Outlier distance from the prompt mean, in standard deviations.
    pub outlier_stddev_multiple: f64,
    /// Judge standard deviation above which a key point is contested.
    pub high_disagreement_stddev: f64,
    /// Standard deviation floor for outlier detection.
    pub min_stddev: f64,
    /// Hybrid score weights.
    pub hybrid_weights: HybridWeights,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            ideal_model_id: IDEAL_MODEL_ID.to_string(),
            linkage: Linkage::Ward,
            cluster_count: DEFAULT_CLUSTER_COUNT,
            outlier_stddev_multiple: OUTLIER_STDDEV_MULTIPLE,
            high_disagreement_stddev: HIGH_DISAGREEMENT_STDDEV,
            min_stddev: MIN_STDDEV,
            hybrid_weights: HybridWeights::default(),
        }
    }
}

impl AnalysisConfig {
    /// Create a configuration with the default constants.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a (possibly partial) JSON configuration and validate it.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Set the reference model identifier.
    pub fn with_ideal_model_id(mut self, id: impl Into<String>) -> Self {
        self.ideal_model_id = id.into();
        self
    }

    /// Set the linkage method.
    pub fn with_linkage(mut self, linkage: Linkage) -> Self {
        self.linkage = linkage;
        self
    }

    /// Set the target cluster count.
    pub fn with_cluster_count(mut self, k: usize) -> Self {
        self.cluster_count = k;
        self
    }

    /// Set the outlier multiple.
    pub fn with_outlier_stddev_multiple(mut self, multiple: f64) -> Self {
        self.outlier_stddev_multiple = multiple;
        self
    }

    /// Set the judge disagreement threshold.
    pub fn with_high_disagreement_stddev(mut self, threshold: f64) -> Self {
        self.high_disagreement_stddev = threshold;
        self
    }

    /// Set the hybrid score weights.
    pub fn with_hybrid_weights(mut self, weights: HybridWeights) -> Self {
        self.hybrid_weights = weights;
        self
    }

    /// Reject thresholds that would make the statistics meaningless.
    pub fn validate(&self) -> Result<()> {
        let non_negative = [
            ("outlierStddevMultiple", self.outlier_stddev_multiple),
            ("highDisagreementStddev", self.high_disagreement_stddev),
            ("minStddev", self.min_stddev),
            ("hybridWeights.similarity", self.hybrid_weights.similarity),
            ("hybridWeights.coverage", self.hybrid_weights.coverage),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidParameter {
                    name,
                    message: format!("must be a finite non-negative number, got {value}"),
                });
            }
        }

        let total = self.hybrid_weights.similarity + self.hybrid_weights.coverage;
        if (total - 1.0).abs() > 1e-9 {
            return Err(Error::InvalidParameter {
                name: "hybridWeights",
                message: format!("weights must sum to 1, got {total}"),
            });
        }

        if self.ideal_model_id.is_empty() {
            return Err(Error::InvalidParameter {
                name: "idealModelId",
                message: "must not be empty".to_string(),
            });
        }

        Ok(())
    }
}
