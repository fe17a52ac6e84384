//! Similarity and distance matrices.
//!
//! Similarity scores arrive from the embedding pipeline as a nested map
//! `model -> model -> score`. Storage is not guaranteed symmetric: often only
//! one of `M[a][b]` / `M[b][a]` is populated, and some cells are `null` or NaN
//! because a model failed to respond.
//!
//! # Missing values
//!
//! Every lookup goes through the same fallback chain:
//!
//! ```text
//! M[a][b]  (if finite)
//!   -> M[b][a]  (if finite)
//!     -> absent  (treated as similarity 0, i.e. distance 1)
//! ```
//!
//! The zero fallback is relied upon by the dendrogram and axis views; do not
//! replace it with an error.

use indexmap::{IndexMap, IndexSet};
use ndarray::Array2;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{ClusteringError, Result};

/// Absolute tolerance used when checking distance matrix symmetry.
pub const SYMMETRY_TOLERANCE: f64 = 1e-9;

/// Pairwise similarity scores keyed by item identifier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SimilarityMatrix {
    #[serde(deserialize_with = "rows_or_empty")]
    rows: IndexMap<String, IndexMap<String, Option<f64>>>,
}

/// Read an `id -> row` map where a `null` row counts as an empty row.
pub(crate) fn rows_or_empty<'de, D, V>(
    deserializer: D,
) -> std::result::Result<IndexMap<String, IndexMap<String, V>>, D::Error>
where
    D: Deserializer<'de>,
    V: Deserialize<'de>,
{
    let rows: IndexMap<String, Option<IndexMap<String, V>>> = IndexMap::deserialize(deserializer)?;
    Ok(rows
        .into_iter()
        .map(|(id, row)| (id, row.unwrap_or_default()))
        .collect())
}

impl SimilarityMatrix {
    /// Create an empty matrix.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a matrix from its JSON form (`{"a": {"b": 0.8, "c": null}}`).
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Set `M[a][b]`. The reverse direction is left untouched.
    pub fn insert(&mut self, a: impl Into<String>, b: impl Into<String>, value: f64) {
        self.rows
            .entry(a.into())
            .or_default()
            .insert(b.into(), Some(value));
    }

    /// Directional lookup of `M[a][b]`, `None` unless the cell holds a finite number.
    pub fn raw(&self, a: &str, b: &str) -> Option<f64> {
        self.rows
            .get(a)
            .and_then(|row| row.get(b))
            .copied()
            .flatten()
            .filter(|v| v.is_finite())
    }

    /// Symmetric lookup: `M[a][b]`, falling back to `M[b][a]`.
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        self.raw(a, b).or_else(|| self.raw(b, a))
    }

    /// Symmetric lookup with the zero-similarity fallback.
    pub fn similarity_or_zero(&self, a: &str, b: &str) -> f64 {
        self.get(a, b).unwrap_or(0.0)
    }

    /// Every identifier mentioned as a row or a column, in first-seen order.
    pub fn ids(&self) -> Vec<&str> {
        let mut seen: IndexSet<&str> = IndexSet::new();
        for (row, cols) in &self.rows {
            seen.insert(row.as_str());
            for col in cols.keys() {
                seen.insert(col.as_str());
            }
        }
        seen.into_iter().collect()
    }

    /// Number of distinct identifiers.
    pub fn len(&self) -> usize {
        self.ids().len()
    }

    /// True when no identifiers are present.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Copy of the matrix with every row and column for `id` removed.
    pub fn without(&self, id: &str) -> Self {
        let rows = self
            .rows
            .iter()
            .filter(|(row, _)| row.as_str() != id)
            .map(|(row, cols)| {
                let cols = cols
                    .iter()
                    .filter(|(col, _)| col.as_str() != id)
                    .map(|(col, v)| (col.clone(), *v))
                    .collect();
                (row.clone(), cols)
            })
            .collect();
        Self { rows }
    }

    /// Minimum and maximum similarity between `item` and the other `items`.
    ///
    /// Missing cells count as 0, the same as in the distance conversion.
    /// `None` when `items` holds nothing besides `item`.
    pub fn row_extent<S: AsRef<str>>(&self, item: &str, items: &[S]) -> Option<(f64, f64)> {
        items
            .iter()
            .map(AsRef::as_ref)
            .filter(|other| *other != item)
            .map(|other| self.similarity_or_zero(item, other))
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    /// Convert to a distance matrix over `items` (`D = 1 - similarity`).
    ///
    /// The diagonal is always 0. Values outside `[0, 1]` pass through unclamped.
    pub fn to_distance_matrix<S: AsRef<str>>(&self, items: &[S]) -> DistanceMatrix {
        let n = items.len();
        let data = Array2::from_shape_fn((n, n), |(i, j)| {
            if i == j {
                0.0
            } else {
                1.0 - self.similarity_or_zero(items[i].as_ref(), items[j].as_ref())
            }
        });
        DistanceMatrix { data }
    }
}

/// Square matrix of pairwise dissimilarities.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    data: Array2<f64>,
}

impl DistanceMatrix {
    /// Build from nested rows, rejecting ragged input.
    pub fn from_rows(rows: &[Vec<f64>]) -> std::result::Result<Self, ClusteringError> {
        let n = rows.len();
        if let Some((row, r)) = rows.iter().enumerate().find(|(_, r)| r.len() != n) {
            return Err(ClusteringError::NotSquare {
                row,
                expected: n,
                found: r.len(),
            });
        }
        let data = Array2::from_shape_fn((n, n), |(i, j)| rows[i][j]);
        Ok(Self { data })
    }

    /// Wrap an existing array, rejecting non-square shapes.
    pub fn from_array(data: Array2<f64>) -> std::result::Result<Self, ClusteringError> {
        let (rows, cols) = data.dim();
        if rows != cols {
            return Err(ClusteringError::NotSquare {
                row: 0,
                expected: rows,
                found: cols,
            });
        }
        Ok(Self { data })
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.data.nrows()
    }

    /// True for a 0x0 matrix.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Entry `(i, j)`.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[(i, j)]
    }

    /// Underlying array.
    pub fn as_array(&self) -> &Array2<f64> {
        &self.data
    }

    /// Rows as nested vectors (for renderers).
    pub fn rows(&self) -> Vec<Vec<f64>> {
        self.data.outer_iter().map(|row| row.to_vec()).collect()
    }

    /// Check `D[i][j] == D[j][i]` within `tolerance`.
    pub fn is_symmetric(&self, tolerance: f64) -> bool {
        let n = self.len();
        (0..n).all(|i| ((i + 1)..n).all(|j| (self.data[(i, j)] - self.data[(j, i)]).abs() <= tolerance))
    }

    /// Reject input the linkage step cannot handle.
    ///
    /// Requires at least two items and finite entries. Only the upper
    /// triangle is read by the linkage, so a matrix built from one-sided
    /// similarity scores that disagree by direction is still accepted.
    pub fn validate(&self) -> std::result::Result<(), ClusteringError> {
        let n = self.len();
        if n < 2 {
            return Err(ClusteringError::TooFewItems { found: n });
        }
        for ((row, col), v) in self.data.indexed_iter() {
            if !v.is_finite() {
                return Err(ClusteringError::NonFinite { row, col });
            }
        }
        Ok(())
    }

    /// Condensed upper triangle, row-major, length `n * (n - 1) / 2`.
    pub fn condensed(&self) -> Vec<f64> {
        let n = self.len();
        let mut condensed = Vec::with_capacity(n * n.saturating_sub(1) / 2);
        for row in 0..n.saturating_sub(1) {
            for col in (row + 1)..n {
                condensed.push(self.data[(row, col)]);
            }
        }
        condensed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_one_sided_entry_is_mirrored() {
        let mut m = SimilarityMatrix::new();
        m.insert("m1", "m2", 0.8);

        let d = m.to_distance_matrix(&["m1", "m2"]);
        assert!((d.get(0, 1) - 0.2).abs() < 1e-10);
        assert!((d.get(1, 0) - 0.2).abs() < 1e-10);
        assert_eq!(d.get(0, 0), 0.0);
    }

    #[test]
    fn test_missing_and_nan_are_max_distance() {
        let mut m = SimilarityMatrix::new();
        m.insert("a", "b", f64::NAN);
        let d = m.to_distance_matrix(&["a", "b", "c"]);
        assert_eq!(d.get(0, 1), 1.0);
        assert_eq!(d.get(0, 2), 1.0);
        assert_eq!(d.get(2, 1), 1.0);
    }

    #[test]
    fn test_nan_forward_falls_back_to_reverse() {
        let mut m = SimilarityMatrix::new();
        m.insert("a", "b", f64::NAN);
        m.insert("b", "a", 0.4);
        assert_eq!(m.get("a", "b"), Some(0.4));
    }

    #[test]
    fn test_json_null_is_absent() {
        let m = SimilarityMatrix::from_json_str(r#"{"a": {"b": null, "c": 0.5}}"#).unwrap();
        assert_eq!(m.get("a", "b"), None);
        assert_eq!(m.get("c", "a"), Some(0.5));
        assert_eq!(m.ids(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_json_null_row_is_empty() {
        let m = SimilarityMatrix::from_json_str(r#"{"a": {"b": 0.8}, "b": null}"#).unwrap();
        assert_eq!(m.get("b", "a"), Some(0.8));
        assert_eq!(m.ids(), vec!["a", "b"]);

        let d = m.to_distance_matrix(&["a", "b"]);
        assert!((d.get(1, 0) - 0.2).abs() < 1e-10);
    }

    #[test]
    fn test_out_of_range_passes_through() {
        let mut m = SimilarityMatrix::new();
        m.insert("a", "b", 1.5);
        let d = m.to_distance_matrix(&["a", "b"]);
        assert!((d.get(0, 1) + 0.5).abs() < 1e-10);
    }

    #[test]
    fn test_row_extent() {
        let mut m = SimilarityMatrix::new();
        m.insert("a", "b", 0.9);
        m.insert("c", "a", 0.3);
        assert_eq!(m.row_extent("a", &["a", "b", "c", "d"]), Some((0.0, 0.9)));
        assert_eq!(m.row_extent("a", &["a"]), None);
    }

    #[test]
    fn test_without_removes_rows_and_columns() {
        let mut m = SimilarityMatrix::new();
        m.insert("a", "b", 0.9);
        m.insert("a", "ideal", 0.7);
        m.insert("ideal", "b", 0.6);
        let trimmed = m.without("ideal");
        assert_eq!(trimmed.ids(), vec!["a", "b"]);
    }

    #[test]
    fn test_validate_rejects_bad_input() {
        let single = DistanceMatrix::from_rows(&[vec![0.0]]).unwrap();
        assert_eq!(single.validate(), Err(ClusteringError::TooFewItems { found: 1 }));

        let ragged = DistanceMatrix::from_rows(&[vec![0.0, 1.0], vec![1.0]]);
        assert!(matches!(ragged, Err(ClusteringError::NotSquare { row: 1, .. })));

        let nan = DistanceMatrix::from_rows(&[vec![0.0, f64::NAN], vec![f64::NAN, 0.0]]).unwrap();
        assert!(matches!(nan.validate(), Err(ClusteringError::NonFinite { .. })));

        let skew = DistanceMatrix::from_rows(&[vec![0.0, 0.2], vec![0.3, 0.0]]).unwrap();
        assert!(skew.validate().is_ok());
        assert!(!skew.is_symmetric(SYMMETRY_TOLERANCE));
    }

    #[test]
    fn test_condensed_layout() {
        let d = DistanceMatrix::from_rows(&[
            vec![0.0, 1.0, 2.0],
            vec![1.0, 0.0, 3.0],
            vec![2.0, 3.0, 0.0],
        ])
        .unwrap();
        assert_eq!(d.condensed(), vec![1.0, 2.0, 3.0]);
    }

    fn sparse_matrix() -> impl Strategy<Value = (SimilarityMatrix, Vec<String>)> {
        (2usize..8).prop_flat_map(|n| {
            proptest::collection::vec(
                (proptest::option::of(0.0f64..=1.0), any::<bool>()),
                n * n,
            )
            .prop_map(move |cells| {
                let ids: Vec<String> = (0..n).map(|i| format!("m{i}")).collect();
                let mut m = SimilarityMatrix::new();
                for i in 0..n {
                    for j in 0..n {
                        if let (Some(v), true) = cells[i * n + j] {
                            m.insert(ids[i].clone(), ids[j].clone(), v);
                        }
                    }
                }
                (m, ids)
            })
        })
    }

    proptest! {
        #[test]
        fn distance_matrix_has_zero_diagonal((m, ids) in sparse_matrix()) {
            let d = m.to_distance_matrix(&ids);
            for i in 0..ids.len() {
                prop_assert_eq!(d.get(i, i), 0.0);
            }
        }

        #[test]
        fn distance_values_stay_in_unit_interval((m, ids) in sparse_matrix()) {
            let d = m.to_distance_matrix(&ids);
            for v in d.as_array().iter() {
                prop_assert!((0.0..=1.0).contains(v));
            }
        }
    }

    #[test]
    fn test_symmetric_when_single_direction_populated() {
        let mut m = SimilarityMatrix::new();
        m.insert("a", "b", 0.7);
        m.insert("c", "a", 0.2);
        m.insert("b", "c", 0.5);
        let d = m.to_distance_matrix(&["a", "b", "c"]);
        assert!(d.is_symmetric(0.0));
    }
}
