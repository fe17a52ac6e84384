//! Rubric coverage aggregation.
//!
//! A coverage table maps `prompt -> model -> result`. A result either carries
//! an `avgCoverageExtent` in `[0, 1]` or an `error` from the judging pipeline.
//! Errors, missing cells and non-finite scores are all excluded from every
//! sample; the reference ("ideal") response is never counted as a model.
//! A `null` cell or a `null` prompt row reads as missing data, not as an error.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use super::descriptive::{average, describe, find_extremes, EntityScore, Extremes, SampleStats};
use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::matrix::rows_or_empty;

/// Judged coverage of one rubric key point.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct KeyPointCoverage {
    /// Key point text or identifier.
    pub key_point: String,
    /// Consolidated coverage extent.
    pub coverage_extent: Option<f64>,
    /// Individual judge scores.
    pub judge_scores: Vec<f64>,
}

/// Coverage verdict for one model on one prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CoverageResult {
    /// The judging pipeline failed for this cell.
    Failed {
        /// Error reported by the pipeline.
        error: String,
    },
    /// The response was judged.
    Scored {
        /// Mean coverage over the prompt's key points.
        #[serde(rename = "avgCoverageExtent", default)]
        avg_coverage_extent: Option<f64>,
        /// Per key point detail.
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        points: Vec<KeyPointCoverage>,
    },
    /// No result was recorded (`null` in JSON).
    Missing,
}

impl CoverageResult {
    /// A scored result with no key point detail.
    pub fn scored(avg_coverage_extent: f64) -> Self {
        CoverageResult::Scored {
            avg_coverage_extent: Some(avg_coverage_extent),
            points: Vec::new(),
        }
    }

    /// A failed result.
    pub fn failed(error: impl Into<String>) -> Self {
        CoverageResult::Failed {
            error: error.into(),
        }
    }

    /// The average coverage, if this cell holds a usable score.
    pub fn score(&self) -> Option<f64> {
        match self {
            CoverageResult::Scored {
                avg_coverage_extent: Some(v),
                ..
            } if v.is_finite() => Some(*v),
            _ => None,
        }
    }

    /// Key point detail (empty for failed cells).
    pub fn points(&self) -> &[KeyPointCoverage] {
        match self {
            CoverageResult::Scored { points, .. } => points,
            CoverageResult::Failed { .. } | CoverageResult::Missing => &[],
        }
    }
}

/// Coverage results keyed by prompt, then by model.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CoverageTable {
    #[serde(deserialize_with = "rows_or_empty")]
    prompts: IndexMap<String, IndexMap<String, CoverageResult>>,
}

impl CoverageTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a table from JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Record the result of `model` on `prompt`.
    pub fn insert(
        &mut self,
        prompt: impl Into<String>,
        model: impl Into<String>,
        result: CoverageResult,
    ) {
        self.prompts
            .entry(prompt.into())
            .or_default()
            .insert(model.into(), result);
    }

    /// Result of `model` on `prompt`.
    pub fn get(&self, prompt: &str, model: &str) -> Option<&CoverageResult> {
        self.prompts.get(prompt).and_then(|row| row.get(model))
    }

    /// Iterate over prompts and their per-model results.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &IndexMap<String, CoverageResult>)> {
        self.prompts.iter()
    }

    /// Number of prompts.
    pub fn len(&self) -> usize {
        self.prompts.len()
    }

    /// True when the table holds no prompts.
    pub fn is_empty(&self) -> bool {
        self.prompts.is_empty()
    }

    /// Models other than `ideal_id`, in first-seen order.
    pub fn model_ids(&self, ideal_id: &str) -> Vec<&str> {
        let models: IndexSet<&str> = self
            .prompts
            .values()
            .flat_map(|row| row.keys())
            .map(String::as_str)
            .filter(|m| *m != ideal_id)
            .collect();
        models.into_iter().collect()
    }

    /// Usable scores of `prompt`, skipping `ideal_id`.
    pub fn prompt_scores(&self, prompt: &str, ideal_id: &str) -> IndexMap<&str, f64> {
        self.prompts
            .get(prompt)
            .map(|row| valid_scores(row, ideal_id))
            .unwrap_or_default()
    }
}

fn valid_scores<'a>(row: &'a IndexMap<String, CoverageResult>, ideal_id: &str) -> IndexMap<&'a str, f64> {
    row.iter()
        .filter(|(model, _)| model.as_str() != ideal_id)
        .filter_map(|(model, result)| result.score().map(|s| (model.as_str(), s)))
        .collect()
}

/// Average coverage per prompt over every real model with a usable score.
///
/// Prompts with no usable score are omitted rather than reported as 0.
pub fn prompt_average_coverage(table: &CoverageTable, ideal_id: &str) -> IndexMap<String, f64> {
    table
        .iter()
        .filter_map(|(prompt, row)| {
            let scores: Vec<f64> = valid_scores(row, ideal_id).into_values().collect();
            average(&scores).map(|avg| (prompt.clone(), avg))
        })
        .collect()
}

/// Average coverage per model across prompts.
pub fn model_average_coverage(table: &CoverageTable, ideal_id: &str) -> IndexMap<String, f64> {
    let mut samples: IndexMap<String, Vec<f64>> = IndexMap::new();
    for (_, row) in table.iter() {
        for (model, score) in valid_scores(row, ideal_id) {
            samples.entry(model.to_string()).or_default().push(score);
        }
    }
    samples
        .into_iter()
        .filter_map(|(model, scores)| average(&scores).map(|avg| (model, avg)))
        .collect()
}

/// Lowest and highest prompt averages.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageRange {
    /// Prompt with the lowest average coverage.
    pub lowest: EntityScore,
    /// Prompt with the highest average coverage.
    pub highest: EntityScore,
    /// `highest - lowest`.
    pub spread: f64,
}

/// Range of per-prompt averages; `None` when no prompt has a usable score.
pub fn coverage_range(prompt_averages: &IndexMap<String, f64>) -> Option<CoverageRange> {
    let ext = find_extremes(prompt_averages)?;
    let spread = ext.best.score - ext.worst.score;
    Some(CoverageRange {
        lowest: ext.worst,
        highest: ext.best,
        spread,
    })
}

/// Headline coverage statistics for one run (or one system-prompt variant).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageOverview {
    /// Number of real models (the reference is not counted).
    pub model_count: usize,
    /// Mean and spread over every usable cell.
    pub overall: SampleStats,
    /// Best and worst model by average coverage.
    pub models: Option<Extremes>,
    /// Lowest and highest prompt averages.
    pub prompts: Option<CoverageRange>,
}

/// Compute the headline coverage statistics of a table.
pub fn coverage_overview(table: &CoverageTable, config: &AnalysisConfig) -> CoverageOverview {
    let ideal = config.ideal_model_id.as_str();
    let cells: Vec<f64> = table
        .iter()
        .flat_map(|(_, row)| valid_scores(row, ideal).into_values())
        .collect();

    CoverageOverview {
        model_count: table.model_ids(ideal).len(),
        overall: describe(&cells),
        models: find_extremes(&model_average_coverage(table, ideal)),
        prompts: coverage_range(&prompt_average_coverage(table, ideal)),
    }
}

/// Headline statistics per system-prompt variant; output index = variant index.
pub fn variant_overviews(tables: &[CoverageTable], config: &AnalysisConfig) -> Vec<CoverageOverview> {
    tables
        .iter()
        .map(|table| coverage_overview(table, config))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IDEAL_MODEL_ID;

    fn table() -> CoverageTable {
        let mut t = CoverageTable::new();
        t.insert("p1", "m1", CoverageResult::scored(0.8));
        t.insert("p1", "m2", CoverageResult::scored(0.6));
        t.insert("p1", "m3", CoverageResult::failed("timeout"));
        t.insert("p1", IDEAL_MODEL_ID, CoverageResult::scored(1.0));
        t.insert("p2", "m1", CoverageResult::scored(0.4));
        t.insert("p2", "m3", CoverageResult::scored(0.2));
        t.insert("p3", "m2", CoverageResult::failed("rate limited"));
        t
    }

    #[test]
    fn test_parse_results() {
        let json = r#"{
            "p1": {
                "m1": {"avgCoverageExtent": 0.8, "points": [{"keyPoint": "k1", "coverageExtent": 0.8, "judgeScores": [0.7, 0.9]}]},
                "m2": {"error": "timeout"},
                "m3": {"avgCoverageExtent": null}
            }
        }"#;
        let t = CoverageTable::from_json_str(json).unwrap();
        let m1 = t.get("p1", "m1").unwrap();
        assert_eq!(m1.score(), Some(0.8));
        assert_eq!(m1.points()[0].judge_scores, vec![0.7, 0.9]);
        assert_eq!(t.get("p1", "m2").unwrap(), &CoverageResult::failed("timeout"));
        assert_eq!(t.get("p1", "m3").unwrap().score(), None);
    }

    #[test]
    fn test_null_cells_and_rows_are_missing() {
        let json = r#"{
            "p1": {
                "m1": {"avgCoverageExtent": 0.8},
                "m2": {"avgCoverageExtent": 0.6},
                "m3": null
            },
            "p2": null
        }"#;
        let t = CoverageTable::from_json_str(json).unwrap();
        let m3 = t.get("p1", "m3").unwrap();
        assert_eq!(m3, &CoverageResult::Missing);
        assert_eq!(m3.score(), None);
        assert!(m3.points().is_empty());

        let avgs = prompt_average_coverage(&t, IDEAL_MODEL_ID);
        assert!((avgs["p1"] - 0.7).abs() < 1e-12);
        assert!(!avgs.contains_key("p2"));

        let overview = coverage_overview(&t, &AnalysisConfig::default());
        assert_eq!(overview.model_count, 3);
        assert_eq!(overview.overall.count, 2);
    }

    #[test]
    fn test_prompt_average_excludes_errors_and_ideal() {
        let avgs = prompt_average_coverage(&table(), IDEAL_MODEL_ID);
        assert!((avgs["p1"] - 0.7).abs() < 1e-12);
        assert!((avgs["p2"] - 0.3).abs() < 1e-12);
        assert!(!avgs.contains_key("p3"));
    }

    #[test]
    fn test_model_average() {
        let avgs = model_average_coverage(&table(), IDEAL_MODEL_ID);
        assert!((avgs["m1"] - 0.6).abs() < 1e-12);
        assert!((avgs["m2"] - 0.6).abs() < 1e-12);
        assert!((avgs["m3"] - 0.2).abs() < 1e-12);
        assert!(!avgs.contains_key(IDEAL_MODEL_ID));
    }

    #[test]
    fn test_overview() {
        let overview = coverage_overview(&table(), &AnalysisConfig::default());
        assert_eq!(overview.model_count, 3);
        assert_eq!(overview.overall.count, 4);
        assert!((overview.overall.average.unwrap() - 0.5).abs() < 1e-12);

        let models = overview.models.unwrap();
        assert_eq!(models.best.id, "m1");
        assert_eq!(models.worst.id, "m3");

        let prompts = overview.prompts.unwrap();
        assert_eq!(prompts.highest.id, "p1");
        assert_eq!(prompts.lowest.id, "p2");
        assert!((prompts.spread - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_empty_table_is_all_none() {
        let overview = coverage_overview(&CoverageTable::new(), &AnalysisConfig::default());
        assert_eq!(overview.model_count, 0);
        assert_eq!(overview.overall.average, None);
        assert!(overview.models.is_none());
        assert!(overview.prompts.is_none());
    }

    #[test]
    fn test_variant_overviews_keep_order() {
        let mut second = CoverageTable::new();
        second.insert("p1", "m9", CoverageResult::scored(0.1));
        let overviews = variant_overviews(&[table(), second], &AnalysisConfig::default());
        assert_eq!(overviews.len(), 2);
        assert_eq!(overviews[1].model_count, 1);
        assert_eq!(overviews[1].models.as_ref().unwrap().best.id, "m9");
    }
}
