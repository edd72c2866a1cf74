//! Shared utilities: number formatting, atomic output files, progress.

pub mod format;
pub mod output;
pub mod progress;

pub use format::{percentage, with_separators};
pub use output::{write_atomic, AtomicOutput};
pub use progress::Progress;
