//! Judge agreement on rubric key points.
//!
//! Several LLM judges score each key point. When their scores spread out
//! beyond a fixed standard deviation the key point is flagged as contested.

use serde::Serialize;

use super::coverage::CoverageTable;
use super::descriptive::stddev;
use crate::config::AnalysisConfig;

/// Spread of the judge scores for one key point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JudgeAgreement {
    /// Population standard deviation (None for fewer than two scores).
    pub stddev: Option<f64>,
    /// True when `stddev` exceeds the threshold.
    pub high_disagreement: bool,
}

/// Compare the spread of `scores` against `threshold`.
pub fn judge_disagreement(scores: &[f64], threshold: f64) -> JudgeAgreement {
    let stddev = stddev(scores);
    JudgeAgreement {
        stddev,
        high_disagreement: stddev.is_some_and(|s| s > threshold),
    }
}

/// A key point the judges disagree on.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContestedKeyPoint {
    /// Prompt identifier.
    pub prompt_id: String,
    /// Model whose response was judged.
    pub model_id: String,
    /// Key point text or identifier.
    pub key_point: String,
    /// Judge score standard deviation.
    pub stddev: f64,
}

/// Every key point, across the table, whose judges disagree.
pub fn disagreeing_key_points(table: &CoverageTable, config: &AnalysisConfig) -> Vec<ContestedKeyPoint> {
    let mut out = Vec::new();
    for (prompt, row) in table.iter() {
        for (model, result) in row {
            if *model == config.ideal_model_id {
                continue;
            }
            for point in result.points() {
                let agreement = judge_disagreement(&point.judge_scores, config.high_disagreement_stddev);
                if let (true, Some(stddev)) = (agreement.high_disagreement, agreement.stddev) {
                    out.push(ContestedKeyPoint {
                        prompt_id: prompt.clone(),
                        model_id: model.clone(),
                        key_point: point.key_point.clone(),
                        stddev,
                    });
                }
            }
        }
    }
    out
}
