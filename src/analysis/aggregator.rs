//! Hit-weighted aggregation of traffic records per Class B network.

use std::collections::HashSet;
use std::path::Path;

use color_eyre::eyre::{Context, Result};

use super::record_parser::{open_lines, split_fields, ParseError};
use super::types::{AggregateSummary, AggregationTable, TrafficRecord};
use crate::ip::{classify, is_valid_ipv4, Classification, MatchStatus, NetworkKey, NetworkRegistry};
use crate::utils::progress::Progress;

/// What happened to one record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    /// Added to the table
    Aggregated {
        network: NetworkKey,
        status: MatchStatus,
    },
    /// Class B, but under the hit threshold
    BelowThreshold,
    /// Invalid address, outside Class B, or rejected by the prefilter
    Unclassified,
}

/// Accumulates records into an [`AggregationTable`] and run counters.
///
/// The registry only annotates networks; a network missing from it is
/// still aggregated, with [`MatchStatus::None`].
pub struct Aggregator<'a> {
    registry: &'a NetworkRegistry,
    prefilter: Option<&'a HashSet<String>>,
    min_hits: u64,
    table: AggregationTable,
    summary: AggregateSummary,
}

impl<'a> Aggregator<'a> {
    pub fn new(registry: &'a NetworkRegistry, min_hits: u64) -> Self {
        Self {
            registry,
            prefilter: None,
            min_hits,
            table: AggregationTable::new(),
            summary: AggregateSummary::default(),
        }
    }

    /// Only aggregate addresses contained in `valid_ips`
    pub fn with_prefilter(mut self, valid_ips: &'a HashSet<String>) -> Self {
        self.prefilter = Some(valid_ips);
        self
    }

    /// Count a line read from the input, blank or not
    pub fn observe_line(&mut self) {
        self.summary.total_lines += 1;
    }

    /// Count a line that produced no record
    pub fn reject(&mut self, error: &ParseError) {
        match error {
            ParseError::InvalidFormat { .. } => self.summary.invalid_format += 1,
            ParseError::InvalidHitCount { .. } => self.summary.invalid_hits += 1,
        }
    }

    /// Classify a record and add its hits to the table when it qualifies
    pub fn accumulate(&mut self, record: &TrafficRecord) -> RecordOutcome {
        let passes_prefilter = self
            .prefilter
            .map_or(true, |valid| valid.contains(&record.address));

        let network = match classify(&record.address) {
            Classification::Network(network) if passes_prefilter => network,
            _ => {
                self.summary.none_count += 1;
                return RecordOutcome::Unclassified;
            }
        };

        if record.hits < self.min_hits {
            self.summary.below_threshold += 1;
            return RecordOutcome::BelowThreshold;
        }

        let status = self.registry.status(&network);
        self.table.add(&network, record.hits, status);

        self.summary.aggregated += 1;
        self.summary.total_hits = self.summary.total_hits.saturating_add(record.hits);
        if status.is_match() {
            self.summary.matched += 1;
            self.summary.matched_hits = self.summary.matched_hits.saturating_add(record.hits);
        }

        RecordOutcome::Aggregated { network, status }
    }

    pub fn summary(&self) -> &AggregateSummary {
        &self.summary
    }

    /// Finalize into the table and counters
    pub fn finish(self) -> (AggregationTable, AggregateSummary) {
        (self.table, self.summary)
    }
}

/// First pass over an input file collecting every valid address that
/// appears in the address position of a well-formed line.
pub fn build_prefilter(path: &Path, progress_interval: u64) -> Result<HashSet<String>> {
    let mut valid_ips = HashSet::new();
    let mut progress = Progress::new("Collecting addresses", progress_interval);

    for line_result in open_lines(path)? {
        let line = line_result
            .with_context(|| format!("Failed to read line from {}", path.display()))?;
        progress.tick();

        if let Ok(Some((_, address))) = split_fields(&line) {
            if is_valid_ipv4(address) {
                valid_ips.insert(address.to_string());
            }
        }
    }

    log::info!("Collected {} distinct valid addresses", valid_ips.len());
    Ok(valid_ips)
}
