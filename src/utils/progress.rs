//! Line-count progress reporting.

use log::info;

/// Default number of lines between progress messages
pub const DEFAULT_PROGRESS_INTERVAL: u64 = 1_000;

/// Counts processed lines and logs every `interval` lines
#[derive(Debug, Clone)]
pub struct Progress {
    label: &'static str,
    interval: u64,
    lines: u64,
}

impl Progress {
    pub fn new(label: &'static str, interval: u64) -> Self {
        Self {
            label,
            interval: interval.max(1),
            lines: 0,
        }
    }

    /// Record one line. Returns true when a progress message was emitted.
    pub fn tick(&mut self) -> bool {
        self.lines += 1;
        if self.lines % self.interval == 0 {
            info!("{}... {} lines", self.label, self.lines);
            true
        } else {
            false
        }
    }

    pub fn lines(&self) -> u64 {
        self.lines
    }
}
