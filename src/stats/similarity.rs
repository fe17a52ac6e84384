//! Extremes over similarity matrices.
//!
//! Every function here reads pairs through [`SimilarityMatrix::get`], so
//! `M[a][b]` and `M[b][a]` are interchangeable. Unlike the distance
//! conversion, missing pairs are skipped rather than counted as 0.

use indexmap::IndexMap;
use serde::Serialize;

use super::descriptive::{average, find_extremes};
use crate::matrix::SimilarityMatrix;

/// A pair of items and their similarity.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PairValue {
    /// The two items, in matrix order.
    pub pair: [String; 2],
    /// Their similarity.
    pub value: f64,
}

/// Most and least similar pairs of a matrix.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimilarityExtremes {
    /// Pair with the highest similarity.
    pub most_similar: Option<PairValue>,
    /// Pair with the lowest similarity.
    pub least_similar: Option<PairValue>,
}

/// Unordered pairs of distinct ids with a usable similarity, in matrix order.
fn valid_pairs<'a>(
    matrix: &'a SimilarityMatrix,
    exclude: &'a [&'a str],
) -> impl Iterator<Item = (&'a str, &'a str, f64)> + 'a {
    let ids: Vec<&str> = matrix
        .ids()
        .into_iter()
        .filter(|id| !exclude.contains(id))
        .collect();
    let n = ids.len();
    (0..n)
        .flat_map(move |i| ((i + 1)..n).map(move |j| (i, j)))
        .filter_map(move |(i, j)| matrix.get(ids[i], ids[j]).map(|v| (ids[i], ids[j], v)))
}

/// Most and least similar pair over all distinct items.
///
/// Ties go to the pair found first. Both extremes are `None` when no pair
/// has a usable score.
pub fn find_similarity_extremes(matrix: &SimilarityMatrix) -> SimilarityExtremes {
    let mut out = SimilarityExtremes::default();
    for (a, b, value) in valid_pairs(matrix, &[]) {
        if out.most_similar.as_ref().map_or(true, |p| value > p.value) {
            out.most_similar = Some(PairValue {
                pair: [a.to_string(), b.to_string()],
                value,
            });
        }
        if out.least_similar.as_ref().map_or(true, |p| value < p.value) {
            out.least_similar = Some(PairValue {
                pair: [a.to_string(), b.to_string()],
                value,
            });
        }
    }
    out
}

/// Mean similarity over every usable pair of one prompt's matrix,
/// ignoring ids in `exclude`.
pub fn prompt_average_similarity(matrix: &SimilarityMatrix, exclude: &[&str]) -> Option<f64> {
    let values: Vec<f64> = valid_pairs(matrix, exclude).map(|(_, _, v)| v).collect();
    average(&values)
}

/// A prompt and how similar its responses are to each other.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptSimilarity {
    /// Prompt identifier.
    pub prompt_id: String,
    /// Mean pairwise similarity of its responses.
    pub average_similarity: f64,
}

/// Prompts on which models agree the most and the least.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptConsistency {
    /// Highest average similarity.
    pub most_consistent: PromptSimilarity,
    /// Lowest average similarity.
    pub least_consistent: PromptSimilarity,
}

/// Most and least consistent prompts.
///
/// Prompts without any usable pair are left out. `None` when nothing remains.
pub fn prompt_consistency(
    prompts: &IndexMap<String, SimilarityMatrix>,
    exclude: &[&str],
) -> Option<PromptConsistency> {
    let averages: IndexMap<String, f64> = prompts
        .iter()
        .filter_map(|(id, m)| prompt_average_similarity(m, exclude).map(|avg| (id.clone(), avg)))
        .collect();

    let ext = find_extremes(&averages)?;
    Some(PromptConsistency {
        most_consistent: PromptSimilarity {
            prompt_id: ext.best.id,
            average_similarity: ext.best.score,
        },
        least_consistent: PromptSimilarity {
            prompt_id: ext.worst.id,
            average_similarity: ext.worst.score,
        },
    })
}

/// Per-model mean similarity to `reference` across prompts.
///
/// Models appear in first-seen order; a model with no usable score against
/// the reference is omitted.
pub fn similarity_to_reference(
    prompts: &IndexMap<String, SimilarityMatrix>,
    reference: &str,
) -> IndexMap<String, f64> {
    let mut samples: IndexMap<String, Vec<f64>> = IndexMap::new();
    for matrix in prompts.values() {
        for id in matrix.ids() {
            if id == reference {
                continue;
            }
            if let Some(v) = matrix.get(id, reference) {
                samples.entry(id.to_string()).or_default().push(v);
            }
        }
    }
    samples
        .into_iter()
        .filter_map(|(id, values)| average(&values).map(|avg| (id, avg)))
        .collect()
}
