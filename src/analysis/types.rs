//! Core data types for traffic classification and aggregation.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::ip::{MatchStatus, NetworkKey};

/// One parsed `(hit-count, address)` input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrafficRecord {
    pub hits: u64,
    pub address: String,
}

/// Aggregated hits of one network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NetworkStats {
    pub hits: u64,
    pub matched: bool,
}

impl NetworkStats {
    pub fn status(&self) -> MatchStatus {
        if self.matched {
            MatchStatus::Match
        } else {
            MatchStatus::None
        }
    }
}

/// Which table entries take part in a ranking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchFilter {
    /// Only networks present in the registry
    #[default]
    MatchedOnly,
    /// Every aggregated network
    All,
}

impl MatchFilter {
    fn accepts(self, stats: &NetworkStats) -> bool {
        match self {
            MatchFilter::MatchedOnly => stats.matched,
            MatchFilter::All => true,
        }
    }
}

/// One row of a ranked network listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedNetwork {
    pub network: NetworkKey,
    pub hits: u64,
    pub status: MatchStatus,
}

/// Hit totals per network key.
///
/// Entries are only ever created or increased; the table is handed to the
/// reporter once the input is exhausted.
#[derive(Debug, Clone, Default)]
pub struct AggregationTable {
    entries: HashMap<NetworkKey, NetworkStats>,
}

impl AggregationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `hits` to `network`, creating the entry at zero if needed
    pub fn add(&mut self, network: &NetworkKey, hits: u64, status: MatchStatus) {
        let entry = self.entries.entry(network.clone()).or_default();
        entry.hits = entry.hits.saturating_add(hits);
        entry.matched = status.is_match();
    }

    pub fn get(&self, network: &NetworkKey) -> Option<&NetworkStats> {
        self.entries.get(network)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NetworkKey, &NetworkStats)> {
        self.entries.iter()
    }

    /// Top `n` networks by hits, ties broken by ascending key
    pub fn ranked(&self, n: usize, filter: MatchFilter) -> Vec<RankedNetwork> {
        let counts = self
            .entries
            .iter()
            .filter(|(_, stats)| filter.accepts(stats))
            .map(|(network, stats)| (network, stats.hits));

        rank_by_count(counts, n)
            .into_iter()
            .map(|(network, hits)| {
                let status = self.entries[&network].status();
                RankedNetwork { network, hits, status }
            })
            .collect()
    }
}

/// Sort `(network, count)` pairs by count descending then network ascending,
/// keeping the first `n`.
pub fn rank_by_count<'a, I>(counts: I, n: usize) -> Vec<(NetworkKey, u64)>
where
    I: IntoIterator<Item = (&'a NetworkKey, u64)>,
{
    let mut ranked: Vec<(&NetworkKey, u64)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ranked
        .into_iter()
        .take(n)
        .map(|(network, count)| (network.clone(), count))
        .collect()
}

/// Run-level counters of a hit-weighted aggregation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateSummary {
    /// Every line read, blank lines included
    pub total_lines: u64,
    /// Lines that did not split into exactly two tokens
    pub invalid_format: u64,
    /// Two-token lines whose hit count is not a number
    pub invalid_hits: u64,
    /// Records whose address classified as NONE
    pub none_count: u64,
    /// Class B records under the hit threshold
    pub below_threshold: u64,
    /// Records added to the aggregation table
    pub aggregated: u64,
    /// Aggregated records whose network is in the registry
    pub matched: u64,
    /// Sum of hits over aggregated records
    pub total_hits: u64,
    /// Sum of hits over matched records
    pub matched_hits: u64,
}

/// Counters of one classify-and-emit run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifySummary {
    /// Every line read, blank lines included
    pub lines_read: u64,
    pub invalid_format: u64,
    pub none_count: u64,
    pub network_count: u64,
}

impl ClassifySummary {
    /// Number of lines written to the classification output
    pub fn emitted(&self) -> u64 {
        self.invalid_format + self.none_count + self.network_count
    }
}

/// Line-occurrence statistics over a classification output file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReanalysisSummary {
    /// Non-blank lines
    pub total_lines: u64,
    pub invalid_format: u64,
    pub none_count: u64,
    /// Lines naming a network
    pub network_lines: u64,
    /// Non-blank lines matching no known shape
    pub unrecognized: u64,
    /// Occurrences per network
    pub networks: HashMap<NetworkKey, u64>,
}

impl ReanalysisSummary {
    /// Top `n` networks by occurrence count, ties broken by ascending key
    pub fn top_networks(&self, n: usize) -> Vec<(NetworkKey, u64)> {
        rank_by_count(self.networks.iter().map(|(k, v)| (k, *v)), n)
    }
}
