//! Classify-and-emit stage.
//!
//! Writes one line per non-blank input record:
//!
//! ```text
//! 130.45.67.89 -> 130.45.0.0/16
//! 8.8.8.8 -> NONE
//! Warning: Invalid line format: only_one_token
//! ```
//!
//! The hit count is not read here. The output depends only on the input
//! file, so repeated runs produce identical files.

use std::collections::HashSet;
use std::io::Write;
use std::path::Path;

use color_eyre::eyre::{Context, Result};
use log::info;

use super::record_parser::{open_lines, split_fields};
use super::types::ClassifySummary;
use crate::ip::{classify, Classification};
use crate::utils::output::AtomicOutput;
use crate::utils::progress::Progress;

/// Shape of one classification output line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputLine {
    Network { address: String, line: String },
    None { line: String },
    InvalidFormat { line: String },
}

impl OutputLine {
    pub fn text(&self) -> &str {
        match self {
            OutputLine::Network { line, .. } | OutputLine::None { line } | OutputLine::InvalidFormat { line } => line,
        }
    }
}

/// Classification output line for one raw input line; `None` for blanks.
///
/// With a prefilter, addresses absent from it are reported as NONE.
pub fn classification_line(raw: &str, prefilter: Option<&HashSet<String>>) -> Option<OutputLine> {
    let (_, address) = match split_fields(raw) {
        Ok(Some(fields)) => fields,
        Ok(None) => return None,
        Err(e) => {
            return Some(OutputLine::InvalidFormat {
                line: format!("Warning: {}", e),
            })
        }
    };

    let seen = prefilter.map_or(true, |valid| valid.contains(address));
    match classify(address) {
        Classification::Network(network) if seen => Some(OutputLine::Network {
            address: address.to_string(),
            line: format!("{} -> {}", address, network),
        }),
        _ => Some(OutputLine::None {
            line: format!("{} -> NONE", address),
        }),
    }
}

/// Stream `input` into a classification output file at `output`.
///
/// The output only appears once the whole input has been processed.
pub fn classify_file(
    input: &Path,
    output: &Path,
    prefilter: Option<&HashSet<String>>,
    progress_interval: u64,
) -> Result<ClassifySummary> {
    info!("Classifying {} -> {}", input.display(), output.display());

    let lines = open_lines(input)?;
    let mut out = AtomicOutput::create(output)?;
    let mut summary = ClassifySummary::default();
    let mut progress = Progress::new("Processing", progress_interval);

    for line_result in lines {
        let line = line_result
            .with_context(|| format!("Failed to read line from {}", input.display()))?;
        summary.lines_read += 1;
        progress.tick();

        let Some(result) = classification_line(&line, prefilter) else {
            continue;
        };
        match result {
            OutputLine::Network { .. } => summary.network_count += 1,
            OutputLine::None { .. } => summary.none_count += 1,
            OutputLine::InvalidFormat { .. } => summary.invalid_format += 1,
        }
        writeln!(out, "{}", result.text())
            .with_context(|| format!("Failed to write {}", output.display()))?;
    }

    out.commit()?;
    info!(
        "Processing completed. Total {} lines processed; results written to {}",
        summary.lines_read,
        output.display()
    );
    Ok(summary)
}
