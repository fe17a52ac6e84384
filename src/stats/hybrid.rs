//! Hybrid ranking: a weighted blend of semantic similarity to the reference
//! response and rubric coverage.

use indexmap::IndexMap;

use super::descriptive::EntityScore;
use crate::config::HybridWeights;

/// `similarity * w_s + coverage * w_c`; `None` unless both parts are finite.
pub fn hybrid_score(similarity: Option<f64>, coverage: Option<f64>, weights: &HybridWeights) -> Option<f64> {
    let similarity = similarity.filter(|v| v.is_finite())?;
    let coverage = coverage.filter(|v| v.is_finite())?;
    Some(similarity * weights.similarity + coverage * weights.coverage)
}

/// Models ranked by hybrid score, best first.
///
/// Only models present in both maps are ranked; equal scores keep the
/// order of `coverage_by_model`.
pub fn hybrid_ranking(
    similarity_by_model: &IndexMap<String, f64>,
    coverage_by_model: &IndexMap<String, f64>,
    weights: &HybridWeights,
) -> Vec<EntityScore> {
    let mut ranking: Vec<EntityScore> = coverage_by_model
        .iter()
        .filter_map(|(model, &coverage)| {
            let similarity = similarity_by_model.get(model).copied();
            hybrid_score(similarity, Some(coverage), weights).map(|score| EntityScore {
                id: model.clone(),
                score,
            })
        })
        .collect();
    ranking.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranking
}
