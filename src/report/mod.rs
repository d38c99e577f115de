//! Progress and best-mix reporting
//!
//! Reporters are only ever called from the thread that started the search;
//! workers hand their events to the coordinator, which forwards them here.

use crate::search::result::SearchResult;
use std::io::Write;

/// How many evaluated mixes a worker batches before publishing progress.
///
/// The node count grows exponentially with depth, so deeper levels report
/// more sparsely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressPolicy {
    /// Interval at shallow depths
    pub base_interval: u64,
    /// Depths above this use the deep interval
    pub deep_threshold: usize,
    /// Multiplied by how far past the threshold the depth is
    pub deep_step: u64,
}

impl Default for ProgressPolicy {
    fn default() -> Self {
        Self {
            base_interval: 10_000,
            deep_threshold: 5,
            deep_step: 50_000,
        }
    }
}

impl ProgressPolicy {
    /// Report every `interval` nodes at every depth
    pub fn fixed(interval: u64) -> Self {
        Self {
            base_interval: interval.max(1),
            deep_threshold: usize::MAX,
            deep_step: interval.max(1),
        }
    }

    /// Nodes between reports at `depth`
    pub fn interval(&self, depth: usize) -> u64 {
        if depth > self.deep_threshold {
            let past = (depth - self.deep_threshold + 1) as u64;
            self.deep_step.saturating_mul(past).max(1)
        } else {
            self.base_interval.max(1)
        }
    }
}

/// One progress tuple
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressUpdate {
    pub depth: usize,
    pub processed: u64,
    pub total: u64,
}

impl ProgressUpdate {
    /// `processed` clamped for consumers limited to 32-bit counters
    pub fn processed_u32(&self) -> u32 {
        u32::try_from(self.processed).unwrap_or(u32::MAX)
    }

    /// `total` clamped for consumers limited to 32-bit counters
    pub fn total_u32(&self) -> u32 {
        u32::try_from(self.total).unwrap_or(u32::MAX)
    }

    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            100.0
        } else {
            self.processed as f64 * 100.0 / self.total as f64
        }
    }

    pub fn is_complete(&self) -> bool {
        self.processed >= self.total
    }
}

/// Receiver of search events
pub trait Reporter {
    /// Periodic progress; best-effort frequency
    fn progress(&mut self, _update: ProgressUpdate) {}

    /// The global best improved
    fn best_mix(&mut self, _best: &SearchResult) {}
}

/// Discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NullReporter;

impl Reporter for NullReporter {}

/// Adapts a `(depth, processed, total)` closure into a `Reporter`
pub struct ProgressFn<F>(pub F);

impl<F> Reporter for ProgressFn<F>
where
    F: FnMut(usize, u64, u64),
{
    fn progress(&mut self, update: ProgressUpdate) {
        (self.0)(update.depth, update.processed, update.total);
    }
}

/// Writes progress and improvements to stderr
#[derive(Debug, Default)]
pub struct ConsoleReporter {
    show_progress: bool,
    progress_line_open: bool,
}

impl ConsoleReporter {
    pub fn new(show_progress: bool) -> Self {
        Self {
            show_progress,
            progress_line_open: false,
        }
    }

    fn close_progress_line(&mut self) {
        if self.progress_line_open {
            eprintln!();
            self.progress_line_open = false;
        }
    }
}

impl Reporter for ConsoleReporter {
    fn progress(&mut self, update: ProgressUpdate) {
        if !self.show_progress {
            return;
        }
        eprint!(
            "\rProgress: Depth {}, {}/{} ({:.1}%)",
            update.depth,
            update.processed,
            update.total,
            update.percent()
        );
        let _ = std::io::stderr().flush();
        self.progress_line_open = true;
        if update.is_complete() {
            self.close_progress_line();
        }
    }

    fn best_mix(&mut self, best: &SearchResult) {
        self.close_progress_line();
        eprintln!(
            "Best mix so far: [{}] with profit {:.2}, price {:.2}, cost {:.2}",
            best.mix_path.join(", "),
            best.profit(),
            best.sell_price(),
            best.cost()
        );
    }
}
