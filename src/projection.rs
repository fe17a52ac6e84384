//! One-dimensional layout of models by response similarity.
//!
//! A quick ranking view: place every model on a line so that similar
//! responses sit close together. This is a heuristic, not MDS.
//!
//! # Method
//!
//! 1. Distance between two models is `d(a, b) = sqrt(max(0, 1 - sim(a, b)))`,
//!    with missing similarity treated as 0.
//! 2. The two most distant models become anchors `A` (at 0) and `B`.
//! 3. Every model is placed by the law of cosines on triangle `A, B, item`:
//!
//! ```text
//! x(item) = (d(A,B)² + d(A,item)² - d(B,item)²) / (2 · d(A,B))
//! ```
//!
//! 4. Coordinates (including the optional reference point) are min-max
//!    rescaled to `[0, 1]`.
//!
//! When every pair is at distance 0 (or there is only one model) there is
//! no axis to project onto; models are spread evenly by index instead.

use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;

use crate::matrix::SimilarityMatrix;

/// A model's position on the axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisCoord {
    /// Item identifier.
    pub id: String,
    /// Position in `[0, 1]`.
    pub x: f64,
}

/// Result of [`project_to_axis`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisProjection {
    /// Positions in matrix order; the reference point, if any, comes last.
    pub coords: Vec<AxisCoord>,
    /// Axis extent, always `[0, 1]`.
    pub extent: [f64; 2],
}

impl AxisProjection {
    /// Position of `id`.
    pub fn x(&self, id: &str) -> Option<f64> {
        self.coords.iter().find(|c| c.id == id).map(|c| c.x)
    }
}

#[inline]
fn axis_distance(similarity: f64) -> f64 {
    (1.0 - similarity).max(0.0).sqrt()
}

#[inline]
fn law_of_cosines(d_ab: f64, d_a: f64, d_b: f64) -> f64 {
    (d_ab * d_ab + d_a * d_a - d_b * d_b) / (2.0 * d_ab)
}

/// Project every item of `matrix` onto one axis.
///
/// When `ideal_similarities` (model -> similarity to the reference response)
/// has usable values for both anchors, the reference is placed as an extra
/// point labelled `ideal_id`, and `ideal_id` is not treated as an ordinary
/// matrix item.
pub fn project_to_axis(
    matrix: &SimilarityMatrix,
    ideal_similarities: Option<&IndexMap<String, f64>>,
    ideal_id: &str,
) -> AxisProjection {
    let items: Vec<&str> = matrix
        .ids()
        .into_iter()
        .filter(|id| ideal_similarities.is_none() || *id != ideal_id)
        .collect();
    let n = items.len();
    let d = |a: &str, b: &str| axis_distance(matrix.similarity_or_zero(a, b));

    let mut anchors: Option<(usize, usize, f64)> = None;
    for i in 0..n {
        for j in (i + 1)..n {
            let dist = d(items[i], items[j]);
            if anchors.map_or(true, |(_, _, best)| dist > best) {
                anchors = Some((i, j, dist));
            }
        }
    }

    let (a, b, d_ab) = match anchors {
        Some(found) if found.2 > 0.0 => found,
        _ => {
            debug!(n, "no spread between items; using index layout");
            return AxisProjection {
                coords: index_layout(&items),
                extent: [0.0, 1.0],
            };
        }
    };
    debug!(anchor_a = items[a], anchor_b = items[b], d_ab, "projecting onto axis");

    let mut coords: Vec<AxisCoord> = items
        .iter()
        .map(|&item| AxisCoord {
            id: item.to_string(),
            x: law_of_cosines(d_ab, d(items[a], item), d(items[b], item)),
        })
        .collect();

    if let Some(ideal) = ideal_similarities {
        let sim_a = ideal.get(items[a]).copied().filter(|v| v.is_finite());
        let sim_b = ideal.get(items[b]).copied().filter(|v| v.is_finite());
        if let (Some(sim_a), Some(sim_b)) = (sim_a, sim_b) {
            coords.push(AxisCoord {
                id: ideal_id.to_string(),
                x: law_of_cosines(d_ab, axis_distance(sim_a), axis_distance(sim_b)),
            });
        }
    }

    normalize(&mut coords);
    AxisProjection {
        coords,
        extent: [0.0, 1.0],
    }
}

fn index_layout(items: &[&str]) -> Vec<AxisCoord> {
    let n = items.len();
    items
        .iter()
        .enumerate()
        .map(|(i, id)| AxisCoord {
            id: id.to_string(),
            x: if n > 1 { i as f64 / (n - 1) as f64 } else { 0.5 },
        })
        .collect()
}

fn normalize(coords: &mut [AxisCoord]) {
    let lo = coords.iter().map(|c| c.x).fold(f64::INFINITY, f64::min);
    let hi = coords.iter().map(|c| c.x).fold(f64::NEG_INFINITY, f64::max);
    let range = hi - lo;
    for c in coords.iter_mut() {
        c.x = if range > 0.0 { (c.x - lo) / range } else { 0.5 };
    }
}
