#[cfg(test)]
mod tests {
    use indexmap::IndexMap;
    use proptest::prelude::*;

    use crate::stats::{
        average, find_similarity_extremes, prompt_average_coverage, stddev, CoverageTable,
    };
    use crate::{
        analyze_prompt, analyze_prompts, cluster, cut_tree, project_to_axis, AnalysisConfig,
        DistanceMatrix, Linkage, Result, SimilarityMatrix, IDEAL_MODEL_ID,
    };

    #[test]
    fn test_two_obvious_groups() -> Result<()> {
        let mut sim = SimilarityMatrix::new();
        sim.insert("A", "B", 0.95);
        sim.insert("C", "D", 0.90);
        for (x, y) in [("A", "C"), ("A", "D"), ("B", "C"), ("B", "D")] {
            sim.insert(x, y, 0.10);
        }

        let out = analyze_prompt(&sim, &["A", "B", "C", "D"], 2, Linkage::Ward)?;
        let labels = out.assignment.labels();
        assert_eq!(labels[0], labels[1]);
        assert_eq!(labels[2], labels[3]);
        assert_ne!(labels[0], labels[2]);
        assert_eq!(out.assignment.n_clusters(), 2);
        Ok(())
    }

    #[test]
    fn test_one_sided_similarity_is_mirrored() -> Result<()> {
        let sim = SimilarityMatrix::from_json_str(r#"{"m1": {"m2": 0.8}, "m2": {"m1": null}}"#)?;
        let d = sim.to_distance_matrix(&["m1", "m2"]);
        assert!((d.get(0, 1) - 0.2).abs() < 1e-10);
        assert!((d.get(1, 0) - 0.2).abs() < 1e-10);
        assert_eq!(d.get(0, 0), 0.0);
        Ok(())
    }

    #[test]
    fn test_failed_coverage_cell_is_ignored() -> Result<()> {
        let table = CoverageTable::from_json_str(
            r#"{
                "p1": {
                    "m1": {"avgCoverageExtent": 0.8},
                    "m2": {"avgCoverageExtent": 0.6},
                    "m3": {"error": "timeout"}
                }
            }"#,
        )?;
        let avgs = prompt_average_coverage(&table, IDEAL_MODEL_ID);
        assert!((avgs["p1"] - 0.7).abs() < 1e-10);
        Ok(())
    }

    #[test]
    fn test_projection_midpoint() {
        let mut sim = SimilarityMatrix::new();
        sim.insert("X", "Y", 0.1);
        sim.insert("X", "Z", 0.9);
        sim.insert("Y", "Z", 0.9);

        let p = project_to_axis(&sim, None, IDEAL_MODEL_ID);
        let (x, y, z) = (p.x("X").unwrap(), p.x("Y").unwrap(), p.x("Z").unwrap());
        assert!((z - (x + y) / 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_samples_are_none() {
        assert_eq!(average(&[]), None);
        assert_eq!(stddev(&[0.4]), None);
        assert_eq!(average(&[f64::NAN]), None);
    }

    #[test]
    fn test_cut_cardinality_with_distinct_heights() -> Result<()> {
        // Points on a line at 0, 1, 3, 7, 15: single-linkage merges at 1, 2, 4, 8.
        let pos = [0.0, 1.0, 3.0, 7.0, 15.0];
        let rows: Vec<Vec<f64>> = pos
            .iter()
            .map(|a: &f64| pos.iter().map(|b| (a - b).abs()).collect())
            .collect();
        let d = DistanceMatrix::from_rows(&rows)?;
        let tree = cluster(&d, Linkage::Single)?;
        let n = pos.len();

        for k in 1..n {
            assert_eq!(cut_tree(&tree, k, n).n_clusters(), k, "k = {k}");
        }
        assert_eq!(cut_tree(&tree, 0, n).n_clusters(), 1);
        assert_eq!(cut_tree(&tree, n, n).n_clusters(), n);
        assert_eq!(cut_tree(&tree, n + 3, n).n_clusters(), n);
        Ok(())
    }

    #[test]
    fn test_batch_with_json_input() -> Result<()> {
        let json = r#"{
            "p1": {
                "a": {"b": 0.9, "c": 0.2, "IDEAL_MODEL_ID": 0.7},
                "b": {"c": 0.25},
                "c": {}
            },
            "p2": {
                "a": {"IDEAL_MODEL_ID": 0.5}
            }
        }"#;
        let prompts: IndexMap<String, SimilarityMatrix> = serde_json::from_str(json)?;
        let config = AnalysisConfig::default().with_cluster_count(2);
        let results = analyze_prompts(&prompts, &config);

        let p1 = results["p1"].as_ref().unwrap();
        assert_eq!(p1.items, vec!["a", "b", "c"]);
        assert_eq!(p1.assignment.label(0), p1.assignment.label(1));
        assert_ne!(p1.assignment.label(0), p1.assignment.label(2));
        assert!(results["p2"].is_err());
        Ok(())
    }

    const IDS: [&str; 5] = ["a", "b", "c", "d", "e"];

    /// Upper-triangle similarities (None = missing) plus a direction flag per pair.
    fn one_sided_pairs() -> impl Strategy<Value = Vec<(Option<f64>, bool)>> {
        proptest::collection::vec(
            (proptest::option::of(0.0f64..=1.0), any::<bool>()),
            IDS.len() * (IDS.len() - 1) / 2,
        )
    }

    fn build(pairs: &[(Option<f64>, bool)], flip_all: bool) -> SimilarityMatrix {
        let mut m = SimilarityMatrix::new();
        for id in IDS {
            m.insert(id, id, 1.0);
        }
        let mut it = pairs.iter();
        for i in 0..IDS.len() {
            for j in (i + 1)..IDS.len() {
                if let Some(&(Some(v), forward)) = it.next() {
                    if forward != flip_all {
                        m.insert(IDS[i], IDS[j], v);
                    } else {
                        m.insert(IDS[j], IDS[i], v);
                    }
                }
            }
        }
        m
    }

    proptest! {
        #[test]
        fn distances_are_symmetric_with_zero_diagonal(pairs in one_sided_pairs()) {
            let d = build(&pairs, false).to_distance_matrix(&IDS);
            for i in 0..IDS.len() {
                prop_assert_eq!(d.get(i, i), 0.0);
                for j in 0..IDS.len() {
                    prop_assert_eq!(d.get(i, j), d.get(j, i));
                }
            }
        }

        #[test]
        fn extremes_ignore_direction(pairs in one_sided_pairs()) {
            prop_assert_eq!(
                find_similarity_extremes(&build(&pairs, false)),
                find_similarity_extremes(&build(&pairs, true))
            );
        }

        #[test]
        fn clustering_is_deterministic(pairs in one_sided_pairs(), k in 0usize..7) {
            let m = build(&pairs, false);
            let first = analyze_prompt(&m, &IDS, k, Linkage::Ward).unwrap();
            let second = analyze_prompt(&m, &IDS, k, Linkage::Ward).unwrap();
            prop_assert_eq!(&first.assignment, &second.assignment);
            prop_assert!(first.tree.is_monotone());
            prop_assert_eq!(first.assignment.len(), IDS.len());
        }
    }
}
