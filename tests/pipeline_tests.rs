#[cfg(test)]
mod pipeline_tests {
    use std::fs;
    use std::io::Write;
    use std::path::{Path, PathBuf};

    use tempfile::{NamedTempFile, TempDir};

    use netsift::analysis::reanalyze::reanalyze_file;
    use netsift::config::Config;
    use netsift::ip::NetworkKey;
    use netsift::orchestrator::{run_aggregate, run_classify, run_reanalyze};

    fn write_file(dir: &Path, name: &str, lines: &[&str]) -> PathBuf {
        let path = dir.join(name);
        let mut file = fs::File::create(&path).unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        path
    }

    fn key(s: &str) -> NetworkKey {
        NetworkKey::normalize(s).unwrap()
    }

    fn aggregate_config(dir: &TempDir, input: PathBuf, registry: Option<PathBuf>, min_hits: u64) -> Config {
        Config {
            input: Some(input),
            report_output: Some(dir.path().join("output").join("top.txt")),
            registry,
            min_hits,
            ..Default::default()
        }
    }

    /// A matched Class B record lands in the table with its full hit count
    #[test]
    fn test_matched_record_is_aggregated() {
        let dir = TempDir::new().unwrap();
        let input = write_file(dir.path(), "traffic.txt", &["500 130.45.67.89"]);
        let registry = write_file(dir.path(), "networks.csv", &["130.45.0.0/16,KR,ASN"]);

        let run = run_aggregate(&aggregate_config(&dir, input, Some(registry), 1)).unwrap();
        let stats = run.table.get(&key("130.45")).unwrap();
        assert_eq!(stats.hits, 500);
        assert!(stats.matched);

        let text = fs::read_to_string(dir.path().join("output").join("top.txt")).unwrap();
        assert!(text.contains("   500  130.45.67.89     130.45.0.0/16     MATCH"));
        assert!(text.contains("130.45.0.0/16: 500 hits"));
    }

    /// Non Class B addresses are NONE and never reach the table
    #[test]
    fn test_non_b_class_record() {
        let dir = TempDir::new().unwrap();
        let input = write_file(dir.path(), "traffic.txt", &["10 8.8.8.8"]);

        let config = Config {
            input: Some(input.clone()),
            classification_output: Some(dir.path().join("output.txt")),
            ..Default::default()
        };
        run_classify(&config).unwrap();
        assert_eq!(fs::read_to_string(dir.path().join("output.txt")).unwrap(), "8.8.8.8 -> NONE\n");

        let run = run_aggregate(&aggregate_config(&dir, input, None, 1)).unwrap();
        assert!(run.table.is_empty());
        assert_eq!(run.report.summary.none_count, 1);
    }

    /// A non-numeric hit count is not a format error; it is counted and skipped
    #[test]
    fn test_non_numeric_hit_count() {
        let dir = TempDir::new().unwrap();
        let input = write_file(dir.path(), "traffic.txt", &["not_a_number 150.1.2.3", "7 150.1.2.3"]);

        let run = run_aggregate(&aggregate_config(&dir, input.clone(), None, 1)).unwrap();
        let summary = &run.report.summary;
        assert_eq!(summary.invalid_format, 0);
        assert_eq!(summary.invalid_hits, 1);
        assert_eq!(run.table.get(&key("150.1")).unwrap().hits, 7);

        let config = Config {
            input: Some(input),
            classification_output: Some(dir.path().join("output.txt")),
            ..Default::default()
        };
        let classified = run_classify(&config).unwrap();
        assert_eq!(classified.network_count, 2);
    }

    /// Malformed lines are echoed as warnings, counted, and never aggregated
    #[test]
    fn test_malformed_line() {
        let dir = TempDir::new().unwrap();
        let input = write_file(dir.path(), "traffic.txt", &["only_one_token", "", "3 140.2.3.4"]);
        let output = dir.path().join("output.txt");

        let config = Config {
            input: Some(input.clone()),
            classification_output: Some(output.clone()),
            ..Default::default()
        };
        let summary = run_classify(&config).unwrap();
        assert_eq!(summary.lines_read, 3);
        assert_eq!(summary.invalid_format, 1);
        assert_eq!(
            fs::read_to_string(&output).unwrap(),
            "Warning: Invalid line format: only_one_token\n140.2.3.4 -> 140.2.0.0/16\n"
        );

        let run = run_aggregate(&aggregate_config(&dir, input, None, 1)).unwrap();
        assert_eq!(run.report.summary.invalid_format, 1);
        assert_eq!(run.report.summary.total_lines, 3);
        assert_eq!(run.table.len(), 1);
    }

    /// Classifying the same input twice yields byte-identical files
    #[test]
    fn test_classify_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let input = write_file(
            dir.path(),
            "traffic.txt",
            &["500 130.45.67.89", "10 8.8.8.8", "bad", "  4   191.0.0.1  ", "1 999.0.0.1"],
        );

        let mut outputs = Vec::new();
        for name in ["first.txt", "second.txt"] {
            let config = Config {
                input: Some(input.clone()),
                classification_output: Some(dir.path().join(name)),
                prefilter: true,
                ..Default::default()
            };
            run_classify(&config).unwrap();
            outputs.push(fs::read(dir.path().join(name)).unwrap());
        }
        assert_eq!(outputs[0], outputs[1]);
    }

    /// Re-aggregation recovers the classify counters from line shapes alone
    #[test]
    fn test_reanalysis_recovers_classification_counts() {
        let dir = TempDir::new().unwrap();
        let input = write_file(
            dir.path(),
            "traffic.txt",
            &[
                "900000 130.45.67.89",
                "1 130.45.1.1",
                "5 150.1.2.3",
                "10 8.8.8.8",
                "x",
                "",
                "2 3 4",
                "7 not-an-ip",
            ],
        );
        let output = dir.path().join("output.txt");
        let stats = dir.path().join("stats.txt");

        let config = Config {
            input: Some(input),
            classification_output: Some(output.clone()),
            stats_output: Some(stats.clone()),
            ..Default::default()
        };
        let classified = run_classify(&config).unwrap();
        let reanalyzed = run_reanalyze(&config).unwrap();

        assert_eq!(reanalyzed.total_lines, classified.emitted());
        assert_eq!(reanalyzed.invalid_format, classified.invalid_format);
        assert_eq!(reanalyzed.none_count, classified.none_count);
        assert_eq!(reanalyzed.network_lines, classified.network_count);
        assert_eq!(reanalyzed.unrecognized, 0);

        // Occurrences, not hits: 900000 and 1 count once each
        assert_eq!(reanalyzed.networks[&key("130.45")], 2);
        assert_eq!(reanalyzed.networks[&key("150.1")], 1);

        let text = fs::read_to_string(&stats).unwrap();
        assert!(text.contains("Total lines analyzed: 7\n"));
        assert!(text.contains("130.45.0.0/16: 2 occurrences\n150.1.0.0/16: 1 occurrences\n"));
        assert!(text.contains("B-class networks: 42.86%\n"));
    }

    /// Threshold filtering and ranking order across several networks
    #[test]
    fn test_threshold_and_ranking() {
        let dir = TempDir::new().unwrap();
        let input = write_file(
            dir.path(),
            "traffic.txt",
            &[
                "150 160.2.0.1",
                "150 160.1.0.1",
                "99 170.1.0.1",
                "400 170.1.0.2",
                "100 180.1.0.1",
                "1000 180.9.9.9",
            ],
        );
        let registry = write_file(dir.path(), "networks.csv", &["160.1.,A", "160.2.,B", "170.1.,C", "180.1.,D"]);

        let mut config = aggregate_config(&dir, input, Some(registry), 100);
        config.top_n = 3;
        let run = run_aggregate(&config).unwrap();

        assert_eq!(run.report.summary.below_threshold, 1);
        assert_eq!(run.report.summary.aggregated, 5);
        assert_eq!(run.report.summary.matched, 4);
        assert_eq!(run.table.get(&key("170.1")).unwrap().hits, 400);

        let top: Vec<&str> = run.report.top_networks.iter().map(|r| r.network.as_str()).collect();
        assert_eq!(top, vec!["170.1.0.0/16", "160.1.0.0/16", "160.2.0.0/16"]);

        config.include_unmatched = true;
        let run = run_aggregate(&config).unwrap();
        assert_eq!(run.report.top_networks[0].network.as_str(), "180.9.0.0/16");
    }

    /// A missing registry degrades to unmatched networks
    #[test]
    fn test_missing_registry_is_not_fatal() {
        let dir = TempDir::new().unwrap();
        let input = write_file(dir.path(), "traffic.txt", &["500 130.45.67.89"]);

        let config = aggregate_config(&dir, input, Some(dir.path().join("absent.csv")), 1);
        let run = run_aggregate(&config).unwrap();
        assert!(!run.table.get(&key("130.45")).unwrap().matched);
        assert_eq!(run.report.summary.matched, 0);
        assert!(run.report.top_networks.is_empty());
    }

    /// A missing input aborts the run without leaving an output file
    #[test]
    fn test_missing_input_leaves_no_output() {
        let dir = TempDir::new().unwrap();
        let config = Config {
            input: Some(dir.path().join("absent.txt")),
            classification_output: Some(dir.path().join("output.txt")),
            ..aggregate_config(&dir, dir.path().join("absent.txt"), None, 1)
        };

        assert!(run_classify(&config).is_err());
        assert!(run_aggregate(&config).is_err());
        assert!(!dir.path().join("output.txt").exists());
        assert!(!dir.path().join("output").join("top.txt").exists());
    }

    /// Empty input yields zero percentages rather than a division error
    #[test]
    fn test_empty_input() {
        let dir = TempDir::new().unwrap();
        let input = write_file(dir.path(), "traffic.txt", &[]);

        let run = run_aggregate(&aggregate_config(&dir, input, None, 1)).unwrap();
        assert_eq!(run.report.summary.total_lines, 0);
        let text = fs::read_to_string(dir.path().join("output").join("top.txt")).unwrap();
        assert!(text.contains("NONE results: 0.00%"));

        let empty = NamedTempFile::new().unwrap();
        let summary = reanalyze_file(empty.path(), 1000).unwrap();
        assert_eq!(summary.total_lines, 0);
    }

    /// JSON output mirrors the text report summary
    #[test]
    fn test_json_report() {
        let dir = TempDir::new().unwrap();
        let input = write_file(dir.path(), "traffic.txt", &["5 130.45.1.1", "6 130.45.2.2"]);
        let registry = write_file(dir.path(), "networks.csv", &["130.45.,KR"]);

        let mut config = aggregate_config(&dir, input, Some(registry), 1);
        config.json_output = Some(dir.path().join("report.json"));
        run_aggregate(&config).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(dir.path().join("report.json")).unwrap()).unwrap();
        assert_eq!(json["summary"]["total_hits"], 11);
        assert_eq!(json["top_networks"][0]["network"], "130.45.0.0/16");
        assert_eq!(json["top_networks"][0]["status"], "MATCH");
    }
}
