//! Means, spreads and extremes over samples with holes.
//!
//! Non-finite values are dropped before anything is computed. Coercing
//! them to 0 would drag averages down for every model that failed a prompt.

use indexmap::IndexMap;
use serde::Serialize;

/// Finite values of `values`, in order.
pub fn finite(values: &[f64]) -> Vec<f64> {
    values.iter().copied().filter(|v| v.is_finite()).collect()
}

/// Arithmetic mean of the finite values; `None` when there are none.
pub fn average(values: &[f64]) -> Option<f64> {
    let sample = finite(values);
    if sample.is_empty() {
        return None;
    }
    Some(sample.iter().sum::<f64>() / sample.len() as f64)
}

/// Population standard deviation (divides by `n`) of the finite values.
///
/// `None` for fewer than two finite values.
pub fn stddev(values: &[f64]) -> Option<f64> {
    let sample = finite(values);
    if sample.len() < 2 {
        return None;
    }
    let n = sample.len() as f64;
    let mean = sample.iter().sum::<f64>() / n;
    let variance = sample.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    Some(variance.sqrt())
}

/// Mean and spread of one sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleStats {
    /// Number of finite values used.
    pub count: usize,
    /// Mean, if any values were present.
    pub average: Option<f64>,
    /// Population standard deviation, if at least two values were present.
    pub stddev: Option<f64>,
}

/// Describe a sample.
pub fn describe(values: &[f64]) -> SampleStats {
    SampleStats {
        count: values.iter().filter(|v| v.is_finite()).count(),
        average: average(values),
        stddev: stddev(values),
    }
}

/// An entity and its score.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityScore {
    /// Model or prompt identifier.
    pub id: String,
    /// Its (average) score.
    pub score: f64,
}

/// Highest and lowest scoring entities.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Extremes {
    /// Entity with the maximum score.
    pub best: EntityScore,
    /// Entity with the minimum score.
    pub worst: EntityScore,
}

/// Best and worst entity by score.
///
/// Ties go to the entity encountered first. Non-finite scores are skipped;
/// `None` when no finite score remains.
pub fn find_extremes(per_entity: &IndexMap<String, f64>) -> Option<Extremes> {
    let mut best: Option<(&String, f64)> = None;
    let mut worst: Option<(&String, f64)> = None;

    for (id, &score) in per_entity {
        if !score.is_finite() {
            continue;
        }
        if best.map_or(true, |(_, b)| score > b) {
            best = Some((id, score));
        }
        if worst.map_or(true, |(_, w)| score < w) {
            worst = Some((id, score));
        }
    }

    let (best_id, best_score) = best?;
    let (worst_id, worst_score) = worst?;
    Some(Extremes {
        best: EntityScore {
            id: best_id.clone(),
            score: best_score,
        },
        worst: EntityScore {
            id: worst_id.clone(),
            score: worst_score,
        },
    })
}
