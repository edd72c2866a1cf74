//! Registry of known-valid networks.
//!
//! The registry is loaded once per run from a comma-separated reference file
//! and is read-only afterwards. Entries are stored by their two-octet prefix
//! so that `"130.45."` in the file and the key `"130.45.0.0/16"` produced by
//! the classifier compare equal.

use std::collections::HashSet;
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use super::classifier::NetworkKey;
use crate::analysis::record_parser::LineReader;

/// Registry status of an aggregated network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MatchStatus {
    Match,
    None,
}

impl MatchStatus {
    pub fn is_match(self) -> bool {
        self == MatchStatus::Match
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchStatus::Match => write!(f, "MATCH"),
            MatchStatus::None => write!(f, "NONE"),
        }
    }
}

/// Set of known-valid network prefixes
#[derive(Debug, Default, Clone)]
pub struct NetworkRegistry {
    networks: HashSet<String>,
}

impl NetworkRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the registry from a reference file.
    ///
    /// A missing or unreadable file is not fatal: a warning is logged and an
    /// empty registry is returned, so every network reports
    /// [`MatchStatus::None`].
    pub fn load(path: &Path) -> Self {
        if path.is_dir() {
            warn!(
                "Registry path {} is a directory; all networks will be unmatched",
                path.display()
            );
            return Self::new();
        }

        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) => {
                warn!(
                    "Registry file {} could not be opened ({}); all networks will be unmatched",
                    path.display(),
                    e
                );
                return Self::new();
            }
        };

        let registry = Self::from_reader(BufReader::new(file));
        info!("Loaded {} registry networks from {}", registry.len(), path.display());
        registry
    }

    /// Build a registry from any line source.
    ///
    /// Lines are decoded lossily so non-UTF-8 bytes in ignored fields do not
    /// drop the entry. A read error ends loading with the entries seen so far.
    pub fn from_reader<R: BufRead>(reader: R) -> Self {
        let mut registry = Self::new();
        for line_result in LineReader::new(reader) {
            match line_result {
                Ok(line) => registry.insert_line(&line),
                Err(e) => {
                    warn!(
                        "Registry read failed after {} networks: {}",
                        registry.len(),
                        e
                    );
                    break;
                }
            }
        }
        registry
    }

    /// Insert one reference line. Blank lines and lines with fewer than two
    /// comma-separated fields are skipped.
    fn insert_line(&mut self, line: &str) {
        let line = line.trim();
        if line.is_empty() {
            return;
        }

        let mut fields = line.split(',');
        let (Some(first), Some(_)) = (fields.next(), fields.next()) else {
            return;
        };

        let entry = first.trim().trim_end_matches('.');
        match NetworkKey::normalize(entry) {
            Some(key) => {
                self.networks.insert(key.prefix().to_string());
            }
            None => {
                self.networks.insert(entry.to_string());
            }
        }
    }

    /// Registry status of a network key
    pub fn status(&self, key: &NetworkKey) -> MatchStatus {
        if self.networks.contains(key.prefix()) {
            MatchStatus::Match
        } else {
            MatchStatus::None
        }
    }

    pub fn contains(&self, key: &NetworkKey) -> bool {
        self.status(key).is_match()
    }

    pub fn len(&self) -> usize {
        self.networks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.networks.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for NetworkRegistry {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut registry = Self::new();
        for line in iter {
            registry.insert_line(line.as_ref());
        }
        registry
    }
}
