//! Report generation for aggregation and re-aggregation runs.
//!
//! Text reports are the primary output; the aggregation report can also be
//! written as JSON.

use std::io::{self, Write};
use std::path::Path;

use color_eyre::eyre::{Context, Result};
use serde::{Deserialize, Serialize};

use super::types::*;
use crate::ip::{MatchStatus, NetworkKey};
use crate::utils::format::{percentage, with_separators};
use crate::utils::output::write_atomic;

const LISTING_RULE_WIDTH: usize = 65;
const TOP_RULE_WIDTH: usize = 40;

/// Context of an aggregation run, carried into the JSON report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_at: String,
    pub input: String,
    pub registry: Option<String>,
    pub registry_networks: usize,
    pub min_hits: u64,
    pub top_n: usize,
}

/// Finalized result of an aggregation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregateReport {
    pub metadata: ReportMetadata,
    pub summary: AggregateSummary,
    pub networks_seen: usize,
    pub top_networks: Vec<RankedNetwork>,
}

/// Fixed-width listing row: hits, address, network, status
pub fn format_listing_row(hits: u64, address: &str, network: &NetworkKey, status: MatchStatus) -> String {
    format!("{:>6}  {:<15}  {:<16}  {}", hits, address, network.as_str(), status)
}

/// Streams the per-record listing of an aggregation report in file order
pub struct ListingWriter<W: Write> {
    out: W,
}

impl<W: Write> ListingWriter<W> {
    /// Write the listing header
    pub fn new(mut out: W, min_hits: u64) -> io::Result<Self> {
        writeln!(out, "B-Class IPs with {}+ hits:", min_hits)?;
        writeln!(out, "{}", "-".repeat(LISTING_RULE_WIDTH))?;
        writeln!(out, "{:<6}  {:<15}  {:<16}  {}", "Hits", "IP", "B-Class Network", "Status")?;
        writeln!(out, "{}", "-".repeat(LISTING_RULE_WIDTH))?;
        Ok(Self { out })
    }

    pub fn write_row(
        &mut self,
        hits: u64,
        address: &str,
        network: &NetworkKey,
        status: MatchStatus,
    ) -> io::Result<()> {
        writeln!(self.out, "{}", format_listing_row(hits, address, network, status))
    }

    /// Close the listing and append the summary sections
    pub fn finish(mut self, report: &AggregateReport, filter: MatchFilter) -> io::Result<W> {
        writeln!(self.out, "{}", "-".repeat(LISTING_RULE_WIDTH))?;
        write!(self.out, "{}", render_aggregate_summary(report, filter))?;
        Ok(self.out)
    }
}

/// Summary, percentage and top-N sections of an aggregation report
pub fn render_aggregate_summary(report: &AggregateReport, filter: MatchFilter) -> String {
    let s = &report.summary;
    let mut lines: Vec<String> = Vec::new();

    lines.push(String::new());
    lines.push("Summary:".to_string());
    lines.push(format!("Total processed lines: {}", with_separators(s.total_lines)));
    lines.push(format!("Invalid format lines: {}", with_separators(s.invalid_format)));
    lines.push(format!("Invalid hit counts: {}", with_separators(s.invalid_hits)));
    lines.push(format!("NONE results: {}", with_separators(s.none_count)));
    lines.push(format!("Below threshold: {}", with_separators(s.below_threshold)));
    lines.push(format!("Aggregated records: {}", with_separators(s.aggregated)));
    lines.push(format!("Matched networks: {}", with_separators(s.matched)));
    lines.push(format!("Total hits: {}", with_separators(s.total_hits)));
    lines.push(format!("Matched hits: {}", with_separators(s.matched_hits)));

    lines.push(String::new());
    lines.push("Percentages:".to_string());
    lines.push(format!("Invalid format lines: {}", percentage(s.invalid_format, s.total_lines)));
    lines.push(format!("NONE results: {}", percentage(s.none_count, s.total_lines)));
    lines.push(format!("Aggregated records: {}", percentage(s.aggregated, s.total_lines)));
    lines.push(format!("Matched networks: {}", percentage(s.matched, s.total_lines)));

    if !report.top_networks.is_empty() {
        let title = match filter {
            MatchFilter::MatchedOnly => "Matched Networks",
            MatchFilter::All => "Networks",
        };
        lines.push(String::new());
        lines.push(format!("Top {} {} by Hits:", report.metadata.top_n, title));
        lines.push("-".repeat(TOP_RULE_WIDTH));
        for row in &report.top_networks {
            lines.push(format!("{}: {} hits", row.network, with_separators(row.hits)));
        }
    }

    let mut text = lines.join("\n");
    text.push('\n');
    text
}

/// Statistics report of a re-aggregation run
pub fn render_reanalysis_report(summary: &ReanalysisSummary, top_n: usize) -> String {
    let total = summary.total_lines;
    let mut lines: Vec<String> = Vec::new();

    lines.push("=== Analysis Results ===".to_string());
    lines.push(format!("Total lines analyzed: {}", with_separators(total)));
    lines.push(format!("Invalid format lines: {}", with_separators(summary.invalid_format)));
    lines.push(format!("NONE results: {}", with_separators(summary.none_count)));
    lines.push(format!("B-class networks found: {}", with_separators(summary.network_lines)));
    if summary.unrecognized > 0 {
        lines.push(format!("Unrecognized lines: {}", with_separators(summary.unrecognized)));
    }
    lines.push(String::new());

    lines.push("=== Top B-class Networks ===".to_string());
    for (network, count) in summary.top_networks(top_n) {
        lines.push(format!("{}: {} occurrences", network, with_separators(count)));
    }
    lines.push(String::new());

    lines.push("=== Percentages ===".to_string());
    lines.push(format!("Invalid format lines: {}", percentage(summary.invalid_format, total)));
    lines.push(format!("NONE results: {}", percentage(summary.none_count, total)));
    lines.push(format!("B-class networks: {}", percentage(summary.network_lines, total)));

    let mut text = lines.join("\n");
    text.push('\n');
    text
}

/// Write the statistics report of a re-aggregation run
pub fn generate_reanalysis_report(summary: &ReanalysisSummary, top_n: usize, output_path: &Path) -> Result<()> {
    write_atomic(output_path, &render_reanalysis_report(summary, top_n))?;
    log::info!("Statistics written to {}", output_path.display());
    Ok(())
}

/// Generate JSON report
pub fn generate_json_report(report: &AggregateReport, output_path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report)
        .context("Failed to serialize report to JSON")?;

    write_atomic(output_path, &json)
        .with_context(|| format!("Failed to write JSON report to {}", output_path.display()))?;

    log::info!("JSON report written to {}", output_path.display());
    Ok(())
}

/// Print an aggregation summary to stdout
pub fn print_aggregate_summary(report: &AggregateReport) {
    let s = &report.summary;
    println!("\n=== AGGREGATION SUMMARY ===\n");
    println!("Lines: {}", with_separators(s.total_lines));
    println!("Invalid format: {}", with_separators(s.invalid_format));
    println!("Invalid hit counts: {}", with_separators(s.invalid_hits));
    println!("NONE: {}", with_separators(s.none_count));
    println!("Aggregated: {} ({} matched)", with_separators(s.aggregated), with_separators(s.matched));
    println!("Total hits: {}", with_separators(s.total_hits));
    println!("Networks: {}", report.networks_seen);

    if let Some(top) = report.top_networks.first() {
        println!("\nTop network: {} ({} hits, {})", top.network, with_separators(top.hits), top.status);
    }
    println!();
}

/// Print classify-and-emit counters to stdout
pub fn print_classify_summary(summary: &ClassifySummary) {
    println!("\n=== CLASSIFICATION SUMMARY ===\n");
    println!("Lines read: {}", with_separators(summary.lines_read));
    println!("B-class networks: {}", with_separators(summary.network_count));
    println!("NONE: {}", with_separators(summary.none_count));
    println!("Invalid format: {}", with_separators(summary.invalid_format));
    println!();
}

/// Print re-aggregation counters to stdout
pub fn print_reanalysis_summary(summary: &ReanalysisSummary) {
    println!("\n=== REANALYSIS SUMMARY ===\n");
    println!("Lines analyzed: {}", with_separators(summary.total_lines));
    println!(
        "B-class networks: {} ({} distinct)",
        with_separators(summary.network_lines),
        summary.networks.len()
    );
    println!("NONE: {}", with_separators(summary.none_count));
    println!("Invalid format: {}", with_separators(summary.invalid_format));
    println!();
}
