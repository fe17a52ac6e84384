//! Per-prompt outlier detection.
//!
//! A model's score is an outlier on a prompt when it lies more than a fixed
//! multiple of the prompt's standard deviation away from the prompt mean.
//! Prompts where every model scores (nearly) the same never flag anything.

use serde::Serialize;

use super::coverage::CoverageTable;
use super::descriptive::{average, stddev};
use crate::config::AnalysisConfig;

/// True when `score` is strictly more than `multiple` standard deviations
/// from `mean`; a score exactly `multiple * stddev` away is not an outlier.
///
/// Always false when `stddev <= min_stddev` or any input is non-finite.
pub fn is_outlier(score: f64, mean: f64, stddev: f64, multiple: f64, min_stddev: f64) -> bool {
    if !(score.is_finite() && mean.is_finite() && stddev.is_finite()) || stddev <= min_stddev {
        return false;
    }
    (score - mean).abs() > multiple * stddev
}

/// A score that stands out on its prompt.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Outlier {
    /// Prompt identifier.
    pub prompt_id: String,
    /// Model identifier.
    pub model_id: String,
    /// The model's coverage score.
    pub score: f64,
    /// Mean coverage on the prompt.
    pub prompt_mean: f64,
    /// Signed distance from the mean, in standard deviations.
    pub deviations: f64,
}

/// Outlying coverage scores across the table, in prompt then model order.
pub fn find_outliers(table: &CoverageTable, config: &AnalysisConfig) -> Vec<Outlier> {
    let mut out = Vec::new();
    for (prompt, _) in table.iter() {
        let scores = table.prompt_scores(prompt, &config.ideal_model_id);
        let values: Vec<f64> = scores.values().copied().collect();
        let (Some(mean), Some(sd)) = (average(&values), stddev(&values)) else {
            continue;
        };

        for (model, score) in scores {
            if is_outlier(score, mean, sd, config.outlier_stddev_multiple, config.min_stddev) {
                out.push(Outlier {
                    prompt_id: prompt.clone(),
                    model_id: model.to_string(),
                    score,
                    prompt_mean: mean,
                    deviations: (score - mean) / sd,
                });
            }
        }
    }
    out
}
