//! Re-aggregation over a classification output file.
//!
//! Counts line occurrences per shape and per network. Hit counts are not
//! part of a classification output, so this view is independent of the
//! original traffic weights.

use std::path::Path;
use std::sync::LazyLock;

use color_eyre::eyre::{Context, Result};
use log::{debug, info};
use regex::Regex;

use super::record_parser::open_lines;
use super::types::ReanalysisSummary;
use crate::ip::NetworkKey;
use crate::utils::progress::Progress;

/// Marker of an echoed malformed input line
pub const INVALID_FORMAT_MARKER: &str = "Invalid line format";

/// Suffix of a line whose address did not classify
pub const NONE_MARKER: &str = "-> NONE";

/// Match: "<address> -> <network>"
static CLASSIFIED_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\S+)\s*->\s*(\S+)$").expect("Invalid classified line regex"));

/// Shape of one classification output line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineShape {
    Blank,
    InvalidFormat,
    None,
    Network(NetworkKey),
    Unrecognized,
}

/// Determine the shape of a line
pub fn line_shape(line: &str) -> LineShape {
    let line = line.trim();
    if line.is_empty() {
        return LineShape::Blank;
    }
    if line.contains(INVALID_FORMAT_MARKER) {
        return LineShape::InvalidFormat;
    }
    if line.ends_with(NONE_MARKER) {
        return LineShape::None;
    }

    CLASSIFIED_LINE
        .captures(line)
        .and_then(|caps| caps.get(2))
        .and_then(|m| NetworkKey::normalize(m.as_str()))
        .map_or(LineShape::Unrecognized, LineShape::Network)
}

impl ReanalysisSummary {
    /// Count one line
    pub fn observe(&mut self, line: &str) {
        let shape = line_shape(line);
        if shape == LineShape::Blank {
            return;
        }

        self.total_lines += 1;
        match shape {
            LineShape::Blank => {}
            LineShape::InvalidFormat => self.invalid_format += 1,
            LineShape::None => self.none_count += 1,
            LineShape::Network(network) => {
                self.network_lines += 1;
                *self.networks.entry(network).or_insert(0) += 1;
            }
            LineShape::Unrecognized => {
                debug!("Unrecognized classification line: {}", line.trim());
                self.unrecognized += 1;
            }
        }
    }
}

/// Stream a classification output file into occurrence statistics
pub fn reanalyze_file(path: &Path, progress_interval: u64) -> Result<ReanalysisSummary> {
    info!("Analyzing file: {}", path.display());

    let mut summary = ReanalysisSummary::default();
    let mut progress = Progress::new("Analyzing", progress_interval);

    for line_result in open_lines(path)? {
        let line = line_result
            .with_context(|| format!("Failed to read line from {}", path.display()))?;
        progress.tick();
        summary.observe(&line);
    }

    if summary.unrecognized > 0 {
        log::warn!(
            "{} lines in {} matched no classification shape",
            summary.unrecognized,
            path.display()
        );
    }
    info!("Analysis completed. Total {} lines analyzed", summary.total_lines);
    Ok(summary)
}
