//! # Netsift - Class B network classification for IP traffic logs
//!
//! This library classifies the addresses of `(hit-count, address)` traffic
//! records into Class B /16 networks, checks those networks against a
//! registry of known-valid prefixes, aggregates hits per network and writes
//! ranked text reports.
//!
//! ## Pipeline
//!
//! ```text
//! raw input ──► record parser ──► validator + classifier ──► aggregator ──► report
//!                     │                                          ▲
//!                     │                                   registry (MATCH/NONE)
//!                     ▼
//!           classification output ──► re-aggregation ──► statistics
//! ```
//!
//! Every stage streams its input line by line, so memory use does not grow
//! with the input file, only with the number of distinct networks.
//!
//! ## Architecture
//!
//! - `ip`: IPv4 validation, Class B classification, network registry
//! - `analysis`: record parsing, aggregation, classification output,
//!   re-aggregation and reports
//! - `config` / `config_loader`: run configuration and YAML loading
//! - `orchestrator`: high-level drivers for each run mode
//! - `utils`: formatting, atomic output files, progress reporting
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::path::PathBuf;
//! use netsift::{config::Config, orchestrator};
//!
//! let config = Config {
//!     input: Some(PathBuf::from("traffic.txt")),
//!     report_output: Some(PathBuf::from("output/top.txt")),
//!     registry: Some(PathBuf::from("networks.csv")),
//!     min_hits: 100,
//!     ..Default::default()
//! };
//!
//! let run = orchestrator::run_aggregate(&config)?;
//! println!("{} networks", run.table.len());
//! # Ok::<(), color_eyre::eyre::Error>(())
//! ```
//!
//! ## Error Handling
//!
//! Malformed lines, bad hit counts and invalid addresses are counted in the
//! reports and never abort a run. Only an unreadable primary input (or an
//! unwritable output) is fatal; such errors are returned as
//! `color_eyre::eyre::Error` with context.

pub mod analysis;
pub mod config;
pub mod config_loader;
pub mod ip;
pub mod orchestrator;
pub mod utils;
