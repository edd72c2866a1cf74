//! Run configuration.
//!
//! Every path and threshold the pipeline uses is explicit here; nothing is
//! discovered from the working directory. A configuration can come from a
//! YAML file, from command-line flags, or both (flags win).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::analysis::MatchFilter;
use crate::utils::progress::DEFAULT_PROGRESS_INTERVAL;

/// Pipeline configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Raw `<hits> <address>` input file
    pub input: Option<PathBuf>,
    /// Per-record classification output (classify) or input (reanalyze)
    pub classification_output: Option<PathBuf>,
    /// Aggregation text report
    pub report_output: Option<PathBuf>,
    /// Optional aggregation JSON report
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json_output: Option<PathBuf>,
    /// Re-aggregation statistics report
    pub stats_output: Option<PathBuf>,
    /// Registry reference file; absent means every network is unmatched
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registry: Option<PathBuf>,
    /// Minimum hit count of an aggregated record
    pub min_hits: u64,
    /// Length of the top-networks section
    pub top_n: usize,
    /// Lines between progress messages
    pub progress_interval: u64,
    /// Build the valid-address prefilter in a first pass over the input
    pub prefilter: bool,
    /// Rank unmatched networks alongside matched ones
    pub include_unmatched: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: None,
            classification_output: None,
            report_output: None,
            json_output: None,
            stats_output: None,
            registry: None,
            min_hits: 1,
            top_n: 10,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            prefilter: false,
            include_unmatched: false,
        }
    }
}

/// Configuration problems detected before any file is touched
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required path: {0}")]
    MissingPath(&'static str),
    #[error("Empty path for {0}")]
    EmptyPath(&'static str),
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

impl Config {
    /// Validate value ranges and any paths that are set
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.top_n == 0 {
            return Err(ConfigError::InvalidValue {
                field: "top_n",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.progress_interval == 0 {
            return Err(ConfigError::InvalidValue {
                field: "progress_interval",
                reason: "must be at least 1".to_string(),
            });
        }

        let paths = [
            ("input", &self.input),
            ("classification_output", &self.classification_output),
            ("report_output", &self.report_output),
            ("json_output", &self.json_output),
            ("stats_output", &self.stats_output),
            ("registry", &self.registry),
        ];
        for (name, path) in paths {
            if path.as_ref().is_some_and(|p| p.as_os_str().is_empty()) {
                return Err(ConfigError::EmptyPath(name));
            }
        }

        Ok(())
    }

    /// Ranking filter implied by `include_unmatched`
    pub fn match_filter(&self) -> MatchFilter {
        if self.include_unmatched {
            MatchFilter::All
        } else {
            MatchFilter::MatchedOnly
        }
    }

    pub fn require_input(&self) -> Result<&Path, ConfigError> {
        require(&self.input, "input")
    }

    pub fn require_classification_output(&self) -> Result<&Path, ConfigError> {
        require(&self.classification_output, "classification_output")
    }

    pub fn require_report_output(&self) -> Result<&Path, ConfigError> {
        require(&self.report_output, "report_output")
    }

    pub fn require_stats_output(&self) -> Result<&Path, ConfigError> {
        require(&self.stats_output, "stats_output")
    }
}

fn require<'a>(path: &'a Option<PathBuf>, name: &'static str) -> Result<&'a Path, ConfigError> {
    path.as_deref().ok_or(ConfigError::MissingPath(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.min_hits, 1);
        assert_eq!(config.top_n, 10);
        assert_eq!(config.progress_interval, 1000);
        assert_eq!(config.match_filter(), MatchFilter::MatchedOnly);
    }

    #[test]
    fn test_zero_top_n_is_rejected() {
        let config = Config { top_n: 0, ..Default::default() };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { field: "top_n", .. })
        ));
    }

    #[test]
    fn test_empty_path_is_rejected() {
        let config = Config {
            registry: Some(PathBuf::new()),
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::EmptyPath("registry")));
    }

    #[test]
    fn test_require_reports_missing_paths() {
        let config = Config::default();
        assert_eq!(config.require_input(), Err(ConfigError::MissingPath("input")));

        let config = Config {
            input: Some(PathBuf::from("traffic.txt")),
            ..Default::default()
        };
        assert_eq!(config.require_input(), Ok(Path::new("traffic.txt")));
    }

    #[test]
    fn test_parse_partial_yaml() {
        let yaml = r#"
input: traffic.txt
registry: networks.csv
min_hits: 100
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.input, Some(PathBuf::from("traffic.txt")));
        assert_eq!(config.min_hits, 100);
        assert_eq!(config.top_n, 10);
        assert!(!config.prefilter);
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        assert!(serde_yaml::from_str::<Config>("min_hitz: 3\n").is_err());
    }
}
