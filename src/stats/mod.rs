//! Headline statistics for the comparison dashboard.
//!
//! | Function | Input | Output |
//! |----------|-------|--------|
//! | [`average`], [`stddev`], [`describe`] | sample | mean / population spread |
//! | [`find_extremes`] | entity -> score | best / worst entity |
//! | [`find_similarity_extremes`] | similarity matrix | most / least similar pair |
//! | [`prompt_consistency`] | prompt -> matrix | most / least consistent prompt |
//! | [`similarity_to_reference`] | prompt -> matrix | model -> mean similarity to the ideal |
//! | [`prompt_average_coverage`] | coverage table | prompt -> mean coverage |
//! | [`model_average_coverage`] | coverage table | model -> mean coverage |
//! | [`coverage_overview`] | coverage table | counts, grand mean, best / worst, range |
//! | [`judge_disagreement`] | judge scores | contested flag |
//! | [`find_outliers`] | coverage table | scores far from their prompt mean |
//! | [`hybrid_ranking`] | similarity + coverage | blended ranking |
//!
//! # Missing data
//!
//! NaN, absent cells and `{error: ...}` results are excluded from samples and
//! never coerced to 0. A statistic with nothing to work on is `None`, which
//! a renderer shows as "N/A".

mod coverage;
mod descriptive;
mod hybrid;
mod judges;
mod outliers;
mod similarity;

pub use coverage::{
    coverage_overview, coverage_range, model_average_coverage, prompt_average_coverage,
    variant_overviews, CoverageOverview, CoverageRange, CoverageResult, CoverageTable,
    KeyPointCoverage,
};
pub use descriptive::{
    average, describe, find_extremes, finite, stddev, EntityScore, Extremes, SampleStats,
};
pub use hybrid::{hybrid_ranking, hybrid_score};
pub use judges::{disagreeing_key_points, judge_disagreement, ContestedKeyPoint, JudgeAgreement};
pub use outliers::{find_outliers, is_outlier, Outlier};
pub use similarity::{
    find_similarity_extremes, prompt_average_similarity, prompt_consistency,
    similarity_to_reference, PairValue, PromptConsistency, PromptSimilarity, SimilarityExtremes,
};
