use crate::config::Config;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::info;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Load and validate configuration from a YAML file
pub fn load_config(config_path: &Path) -> Result<Config> {
    info!("Loading configuration from: {:?}", config_path);

    let file = File::open(config_path)
        .wrap_err_with(|| format!("Failed to open configuration file '{}'", config_path.display()))?;

    let config: Config = serde_yaml::from_reader(file)
        .wrap_err_with(|| format!("Failed to parse configuration file '{}'", config_path.display()))?;

    config.validate()?;

    Ok(config)
}

/// Command-line values that override the configuration file
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub input: Option<PathBuf>,
    pub classification_output: Option<PathBuf>,
    pub report_output: Option<PathBuf>,
    pub json_output: Option<PathBuf>,
    pub stats_output: Option<PathBuf>,
    pub registry: Option<PathBuf>,
    pub min_hits: Option<u64>,
    pub top_n: Option<usize>,
    pub progress_interval: Option<u64>,
    pub prefilter: bool,
    pub include_unmatched: bool,
}

/// Apply CLI overrides to a configuration.
///
/// Boolean flags can only switch a feature on; a file setting of `true`
/// is kept when the flag is absent.
pub fn apply_overrides(config: &mut Config, overrides: CliOverrides) -> Result<()> {
    fn set<T>(slot: &mut Option<T>, value: Option<T>) {
        if value.is_some() {
            *slot = value;
        }
    }

    set(&mut config.input, overrides.input);
    set(&mut config.classification_output, overrides.classification_output);
    set(&mut config.report_output, overrides.report_output);
    set(&mut config.json_output, overrides.json_output);
    set(&mut config.stats_output, overrides.stats_output);
    set(&mut config.registry, overrides.registry);

    if let Some(min_hits) = overrides.min_hits {
        config.min_hits = min_hits;
    }
    if let Some(top_n) = overrides.top_n {
        config.top_n = top_n;
    }
    if let Some(interval) = overrides.progress_interval {
        config.progress_interval = interval;
    }
    config.prefilter |= overrides.prefilter;
    config.include_unmatched |= overrides.include_unmatched;

    // Re-validate after applying overrides
    config.validate()?;

    Ok(())
}

/// Load the configuration file if one was given, then apply overrides
pub fn resolve_config(config_path: Option<&Path>, overrides: CliOverrides) -> Result<Config> {
    let mut config = match config_path {
        Some(path) => load_config(path)?,
        None => Config::default(),
    };
    apply_overrides(&mut config, overrides)?;
    Ok(config)
}
