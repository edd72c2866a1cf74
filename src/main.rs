use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::Result;
use env_logger::Env;
use log::info;

use netsift::analysis::report::{print_aggregate_summary, print_classify_summary, print_reanalysis_summary};
use netsift::config_loader::{resolve_config, CliOverrides};
use netsift::orchestrator;

/// Class B network classification and hit aggregation for IP traffic logs
#[derive(Parser, Debug)]
#[command(name = "netsift", author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to a YAML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Lines between progress messages
    #[arg(long, global = true)]
    progress_interval: Option<u64>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Classify every input record and write one result line per record
    Classify {
        /// Raw "<hits> <address>" input file
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Classification output file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Build the valid-address prefilter in a first pass
        #[arg(long)]
        prefilter: bool,
    },

    /// Aggregate hits per network and write a ranked report
    Aggregate {
        /// Raw "<hits> <address>" input file
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Text report file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Registry reference file
        #[arg(short, long)]
        registry: Option<PathBuf>,

        /// Also write the report as JSON
        #[arg(long)]
        json: Option<PathBuf>,

        /// Minimum hit count of an aggregated record
        #[arg(short = 'm', long)]
        min_hits: Option<u64>,

        /// Number of networks in the top section
        #[arg(short = 'n', long)]
        top: Option<usize>,

        /// Build the valid-address prefilter in a first pass
        #[arg(long)]
        prefilter: bool,

        /// Rank unmatched networks too
        #[arg(long)]
        include_unmatched: bool,
    },

    /// Recount a classification output file by line occurrence
    Reanalyze {
        /// Classification output file to analyze
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Statistics report file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Number of networks in the top section
        #[arg(short = 'n', long)]
        top: Option<usize>,
    },

    /// Classify addresses given on the command line
    Check {
        /// Addresses to classify
        #[arg(required = true)]
        addresses: Vec<String>,

        /// Registry reference file
        #[arg(short, long)]
        registry: Option<PathBuf>,
    },
}

impl Commands {
    fn overrides(&self, progress_interval: Option<u64>) -> CliOverrides {
        let base = CliOverrides {
            progress_interval,
            ..Default::default()
        };
        match self {
            Commands::Classify { input, output, prefilter } => CliOverrides {
                input: input.clone(),
                classification_output: output.clone(),
                prefilter: *prefilter,
                ..base
            },
            Commands::Aggregate {
                input,
                output,
                registry,
                json,
                min_hits,
                top,
                prefilter,
                include_unmatched,
            } => CliOverrides {
                input: input.clone(),
                report_output: output.clone(),
                registry: registry.clone(),
                json_output: json.clone(),
                min_hits: *min_hits,
                top_n: *top,
                prefilter: *prefilter,
                include_unmatched: *include_unmatched,
                ..base
            },
            Commands::Reanalyze { input, output, top } => CliOverrides {
                classification_output: input.clone(),
                stats_output: output.clone(),
                top_n: *top,
                ..base
            },
            Commands::Check { registry, .. } => CliOverrides {
                registry: registry.clone(),
                ..base
            },
        }
    }
}

fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    let cli = Cli::parse();

    // Initialize logging with the requested default filter level
    env_logger::Builder::from_env(Env::default().default_filter_or(&cli.log_level)).init();

    let overrides = cli.command.overrides(cli.progress_interval);
    let config = resolve_config(cli.config.as_deref(), overrides)?;

    match &cli.command {
        Commands::Classify { .. } => {
            let summary = orchestrator::run_classify(&config)?;
            print_classify_summary(&summary);
        }
        Commands::Aggregate { .. } => {
            let run = orchestrator::run_aggregate(&config)?;
            print_aggregate_summary(&run.report);
        }
        Commands::Reanalyze { .. } => {
            let summary = orchestrator::run_reanalyze(&config)?;
            print_reanalysis_summary(&summary);
        }
        Commands::Check { addresses, .. } => {
            let registry = config.registry.as_ref().map(|_| orchestrator::load_registry(&config));
            for line in orchestrator::check_addresses(addresses, registry.as_ref()) {
                println!("{}", line);
            }
        }
    }

    info!("Done");
    Ok(())
}
