//! Configuration for parallel search execution.

use std::time::Duration;

/// Hard upper bound on worker threads.
pub const MAX_WORKERS: usize = 16;

/// Configuration for parallel search execution.
#[derive(Debug, Clone)]
pub struct ParallelConfig {
    /// Requested number of worker threads (1..=MAX_WORKERS).
    pub num_workers: usize,
    /// Overall timeout for the parallel search.
    pub timeout: Option<Duration>,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            num_workers: MAX_WORKERS,
            timeout: None,
        }
    }
}

impl ParallelConfig {
    /// Set the number of workers, clamped to 1..=MAX_WORKERS.
    pub fn with_workers(mut self, num_workers: usize) -> Self {
        self.num_workers = num_workers.clamp(1, MAX_WORKERS);
        self
    }

    /// Set the overall timeout for parallel search.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the overall timeout from an Option.
    pub fn with_timeout_option(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Workers actually spawned for a catalog of `substance_count` substances.
    pub fn workers_for(&self, substance_count: usize) -> usize {
        self.num_workers.clamp(1, MAX_WORKERS).min(substance_count)
    }
}
