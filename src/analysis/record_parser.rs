//! Parsing of raw `<hits> <address>` traffic lines.
//!
//! Input files are consumed as a stream of lines; nothing here holds more
//! than one line at a time.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use color_eyre::eyre::{Context, Result};
use thiserror::Error;

use super::types::TrafficRecord;

/// Why a non-blank line did not yield a record
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The line does not split into exactly two whitespace-separated tokens
    #[error("Invalid line format: {line}")]
    InvalidFormat { line: String },

    /// Two tokens, but the first is not a non-negative number
    #[error("Invalid hit count '{token}': {line}")]
    InvalidHitCount { token: String, line: String },
}

/// Streaming line iterator that decodes bytes lossily.
///
/// Stray non-UTF-8 bytes become U+FFFD instead of aborting the run; the
/// affected line then simply fails address validation.
pub struct LineReader<R> {
    reader: R,
    buf: Vec<u8>,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
        }
    }
}

impl<R: BufRead> Iterator for LineReader<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => None,
            Ok(_) => {
                if self.buf.last() == Some(&b'\n') {
                    self.buf.pop();
                    if self.buf.last() == Some(&b'\r') {
                        self.buf.pop();
                    }
                }
                Some(Ok(String::from_utf8_lossy(&self.buf).into_owned()))
            }
            Err(e) => Some(Err(e)),
        }
    }
}

/// Open a file for streaming line-by-line reading
pub fn open_lines(path: &Path) -> Result<LineReader<BufReader<File>>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open input file: {}", path.display()))?;
    Ok(LineReader::new(BufReader::with_capacity(64 * 1024, file)))
}

/// Split a raw line into its hit token and address.
///
/// Returns `Ok(None)` for blank lines. The hit token is not inspected.
pub fn split_fields(line: &str) -> Result<Option<(&str, &str)>, ParseError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let mut tokens = trimmed.split_whitespace();
    match (tokens.next(), tokens.next(), tokens.next()) {
        (Some(hits), Some(address), None) => Ok(Some((hits, address))),
        _ => Err(ParseError::InvalidFormat {
            line: trimmed.to_string(),
        }),
    }
}

/// Parse a hit count.
///
/// Integers are taken as-is. Finite non-negative decimals such as `"12.0"`
/// are tolerated and truncated toward zero.
pub fn parse_hits(token: &str) -> Option<u64> {
    token.parse::<u64>().ok().or_else(|| {
        token
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && *v >= 0.0)
            .map(|v| v.trunc() as u64)
    })
}

/// Parse one raw line into a [`TrafficRecord`].
///
/// Returns `Ok(None)` for blank lines.
pub fn parse_line(line: &str) -> Result<Option<TrafficRecord>, ParseError> {
    let Some((hits_token, address)) = split_fields(line)? else {
        return Ok(None);
    };

    let hits = parse_hits(hits_token).ok_or_else(|| ParseError::InvalidHitCount {
        token: hits_token.to_string(),
        line: line.trim().to_string(),
    })?;

    Ok(Some(TrafficRecord {
        hits,
        address: address.to_string(),
    }))
}
