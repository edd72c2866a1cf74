//! Pipeline orchestrator.
//!
//! This module coordinates each run mode from a resolved [`Config`]:
//! opening inputs, loading the registry, driving the streaming stages and
//! writing their reports.

use std::collections::HashSet;
use std::path::Path;

use color_eyre::eyre::{Context, Result};
use log::{debug, info, warn};

use crate::analysis::aggregator::{build_prefilter, Aggregator, RecordOutcome};
use crate::analysis::classify::classify_file;
use crate::analysis::reanalyze::reanalyze_file;
use crate::analysis::record_parser::{open_lines, parse_line};
use crate::analysis::report::{
    generate_json_report, generate_reanalysis_report, AggregateReport, ListingWriter, ReportMetadata,
};
use crate::analysis::{AggregationTable, ClassifySummary, ReanalysisSummary};
use crate::config::Config;
use crate::ip::{classify, Classification, NetworkRegistry};
use crate::utils::output::AtomicOutput;
use crate::utils::progress::Progress;

/// Result of a hit-weighted aggregation run
#[derive(Debug, Clone)]
pub struct AggregateRun {
    pub report: AggregateReport,
    pub table: AggregationTable,
}

/// Load the configured registry, or an empty one when none is configured
pub fn load_registry(config: &Config) -> NetworkRegistry {
    match &config.registry {
        Some(path) => NetworkRegistry::load(path),
        None => {
            warn!("No registry configured; all networks will be unmatched");
            NetworkRegistry::new()
        }
    }
}

fn load_prefilter(config: &Config, input: &Path) -> Result<Option<HashSet<String>>> {
    if config.prefilter {
        Ok(Some(build_prefilter(input, config.progress_interval)?))
    } else {
        Ok(None)
    }
}

/// Classify-and-emit: raw input to per-record classification output
pub fn run_classify(config: &Config) -> Result<ClassifySummary> {
    let input = config.require_input()?;
    let output = config.require_classification_output()?;

    let prefilter = load_prefilter(config, input)?;
    classify_file(input, output, prefilter.as_ref(), config.progress_interval)
}

/// Hit-weighted aggregation with a ranked text report
pub fn run_aggregate(config: &Config) -> Result<AggregateRun> {
    let input = config.require_input()?;
    let report_path = config.require_report_output()?;

    // Open the input before creating any output, so a missing input file
    // leaves nothing behind
    let lines = open_lines(input)?;

    let registry = load_registry(config);
    let prefilter = load_prefilter(config, input)?;

    let mut aggregator = Aggregator::new(&registry, config.min_hits);
    if let Some(valid_ips) = &prefilter {
        aggregator = aggregator.with_prefilter(valid_ips);
    }

    let output = AtomicOutput::create(report_path)?;
    let mut listing = ListingWriter::new(output, config.min_hits)
        .with_context(|| format!("Failed to write {}", report_path.display()))?;
    let mut progress = Progress::new("Processing", config.progress_interval);

    for line_result in lines {
        let line = line_result
            .with_context(|| format!("Failed to read line from {}", input.display()))?;
        aggregator.observe_line();
        progress.tick();

        let record = match parse_line(&line) {
            Ok(Some(record)) => record,
            Ok(None) => continue,
            Err(e) => {
                debug!("Skipping line: {}", e);
                aggregator.reject(&e);
                continue;
            }
        };

        if let RecordOutcome::Aggregated { network, status } = aggregator.accumulate(&record) {
            listing
                .write_row(record.hits, &record.address, &network, status)
                .with_context(|| format!("Failed to write {}", report_path.display()))?;
        }
    }

    let (table, summary) = aggregator.finish();
    let filter = config.match_filter();
    let report = AggregateReport {
        metadata: ReportMetadata {
            generated_at: chrono::Utc::now().to_rfc3339(),
            input: input.display().to_string(),
            registry: config.registry.as_ref().map(|p| p.display().to_string()),
            registry_networks: registry.len(),
            min_hits: config.min_hits,
            top_n: config.top_n,
        },
        summary,
        networks_seen: table.len(),
        top_networks: table.ranked(config.top_n, filter),
    };

    let output = listing
        .finish(&report, filter)
        .with_context(|| format!("Failed to write {}", report_path.display()))?;
    output.commit()?;
    info!("Analysis completed. Results written to: {}", report_path.display());

    if let Some(json_path) = &config.json_output {
        generate_json_report(&report, json_path)?;
    }

    Ok(AggregateRun { report, table })
}

/// Re-aggregation: classification output to occurrence statistics
pub fn run_reanalyze(config: &Config) -> Result<ReanalysisSummary> {
    let input = config.require_classification_output()?;
    let stats_path = config.require_stats_output()?;

    let summary = reanalyze_file(input, config.progress_interval)?;
    generate_reanalysis_report(&summary, config.top_n, stats_path)?;
    Ok(summary)
}

/// One line per address: its classification, plus registry status when a
/// registry is given.
pub fn check_addresses(addresses: &[String], registry: Option<&NetworkRegistry>) -> Vec<String> {
    addresses
        .iter()
        .map(|raw| {
            let address = raw.trim();
            match (classify(address), registry) {
                (Classification::Network(network), Some(registry)) => {
                    format!("{} -> {} ({})", address, network, registry.status(&network))
                }
                (outcome, _) => format!("{} -> {}", address, outcome),
            }
        })
        .collect()
}
