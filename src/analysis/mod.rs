//! Traffic record parsing, aggregation and reporting.
//!
//! Two counting semantics share the [`NetworkKey`](crate::ip::NetworkKey)
//! vocabulary: hit-weighted aggregation over raw traffic records
//! ([`aggregator`]) and line-occurrence re-aggregation over a previously
//! written classification output ([`reanalyze`]).

pub mod types;
pub mod record_parser;
pub mod aggregator;
pub mod classify;
pub mod reanalyze;
pub mod report;

pub use types::*;
pub use record_parser::{parse_line, split_fields, ParseError};
pub use aggregator::{Aggregator, RecordOutcome};
pub use classify::classify_file;
pub use reanalyze::reanalyze_file;
pub use report::{generate_json_report, generate_reanalysis_report, AggregateReport};
