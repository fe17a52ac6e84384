use evalscope::stats::{
    coverage_overview, find_outliers, find_similarity_extremes, hybrid_ranking,
    prompt_consistency, similarity_to_reference, CoverageResult, CoverageTable,
};
use evalscope::{analyze_prompts, project_to_axis, AnalysisConfig, SimilarityMatrix, IDEAL_MODEL_ID};
use indexmap::IndexMap;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Small end-to-end report over a hand-written run: two prompts, four models
    // plus the reference response. `RUST_LOG=debug` shows the pipeline logs.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = AnalysisConfig::default().with_cluster_count(2);

    let mut prompts: IndexMap<String, SimilarityMatrix> = IndexMap::new();
    for (prompt, close, far) in [("summarise", 0.92, 0.15), ("translate", 0.7, 0.45)] {
        let mut m = SimilarityMatrix::new();
        m.insert("gpt", "claude", close);
        m.insert("llama", "mistral", close - 0.05);
        for (a, b) in [("gpt", "llama"), ("gpt", "mistral"), ("claude", "llama"), ("claude", "mistral")] {
            m.insert(a, b, far);
        }
        m.insert("gpt", IDEAL_MODEL_ID, 0.8);
        m.insert("claude", IDEAL_MODEL_ID, 0.75);
        m.insert("llama", IDEAL_MODEL_ID, 0.3);
        m.insert("mistral", IDEAL_MODEL_ID, 0.35);
        prompts.insert(prompt.to_string(), m);
    }

    println!("== clusters ==");
    for (prompt, result) in analyze_prompts(&prompts, &config) {
        match result {
            Ok(c) => {
                println!("{prompt}: {}", c.tree.root());
                for id in c.ordered_items() {
                    let info = &c.summary.items[id];
                    println!(
                        "  {id:<8} cluster {} cohesion {:.3} intensity {:.2}",
                        info.cluster_id,
                        info.avg_similarity,
                        c.summary.intensity(id).unwrap_or(1.0)
                    );
                }
            }
            Err(err) => println!("{prompt}: could not generate dendrogram ({err})"),
        }
    }

    println!("== similarity ==");
    for (prompt, m) in &prompts {
        let ext = find_similarity_extremes(&m.without(IDEAL_MODEL_ID));
        if let (Some(most), Some(least)) = (ext.most_similar, ext.least_similar) {
            println!(
                "{prompt}: most {:?} {:.2}, least {:?} {:.2}",
                most.pair, most.value, least.pair, least.value
            );
        }
    }
    if let Some(c) = prompt_consistency(&prompts, &[IDEAL_MODEL_ID]) {
        println!(
            "most consistent: {} ({:.3}), least consistent: {} ({:.3})",
            c.most_consistent.prompt_id,
            c.most_consistent.average_similarity,
            c.least_consistent.prompt_id,
            c.least_consistent.average_similarity
        );
    }

    let mut coverage = CoverageTable::new();
    for (prompt, scores) in [
        ("summarise", [0.9, 0.85, 0.4, 0.5]),
        ("translate", [0.7, 0.75, 0.6, 0.65]),
    ] {
        for (model, score) in ["gpt", "claude", "llama", "mistral"].into_iter().zip(scores) {
            coverage.insert(prompt, model, CoverageResult::scored(score));
        }
    }
    coverage.insert("translate", "mistral", CoverageResult::failed("timeout"));

    println!("== coverage ==");
    let overview = coverage_overview(&coverage, &config);
    println!("{}", serde_json::to_string_pretty(&overview)?);
    println!("outliers: {}", find_outliers(&coverage, &config).len());

    let sim_to_ideal = similarity_to_reference(&prompts, IDEAL_MODEL_ID);
    let cov = evalscope::stats::model_average_coverage(&coverage, IDEAL_MODEL_ID);
    println!("== hybrid ranking ==");
    for entry in hybrid_ranking(&sim_to_ideal, &cov, &config.hybrid_weights) {
        println!("  {:<8} {:.3}", entry.id, entry.score);
    }

    println!("== axis ==");
    let first = prompts.get_index(0).map(|(_, m)| m);
    if let Some(m) = first {
        let ideal: IndexMap<String, f64> = m
            .ids()
            .into_iter()
            .filter(|id| *id != IDEAL_MODEL_ID)
            .filter_map(|id| m.get(id, IDEAL_MODEL_ID).map(|v| (id.to_string(), v)))
            .collect();
        for coord in project_to_axis(m, Some(&ideal), IDEAL_MODEL_ID).coords {
            println!("  {:<16} {:.3}", coord.id, coord.x);
        }
    }

    Ok(())
}
