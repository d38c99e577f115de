//! Shared state and message channel between search workers and the coordinator.

use crate::search::candidate::BestMix;
use crate::search::config::Algorithm;
use crate::search::result::SearchStatistics;
use crossbeam_channel::{Receiver, Sender, unbounded};
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Message sent from workers to the coordinator.
#[derive(Debug, Clone)]
pub enum WorkerMessage {
    /// Processed counter after a worker published a batch.
    Progress {
        worker_id: usize,
        depth: usize,
        processed: u64,
    },
    /// Worker's mix became the global best.
    Improvement { worker_id: usize, best: BestMix },
    /// Worker has finished searching.
    Finished {
        worker_id: usize,
        statistics: SearchStatistics,
    },
}

/// State shared by every worker of one run.
///
/// The best record is the only lock; the profit hint lets workers skip it
/// when their candidate cannot win.
#[derive(Debug)]
pub struct SharedSearchContext {
    best: Mutex<Option<BestMix>>,
    /// Profit of the current global best (i64::MIN means no best yet).
    profit_hint: AtomicI64,
    processed: AtomicU64,
    cancelled: AtomicBool,
}

impl Default for SharedSearchContext {
    fn default() -> Self {
        Self {
            best: Mutex::new(None),
            profit_hint: AtomicI64::new(i64::MIN),
            processed: AtomicU64::new(0),
            cancelled: AtomicBool::new(false),
        }
    }
}

impl SharedSearchContext {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_best(&self) -> MutexGuard<'_, Option<BestMix>> {
        // A panicking worker is re-raised by the coordinator; the record
        // itself is always left consistent.
        self.best.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Offer a worker's best. Returns true if it became the global best.
    pub fn offer(&self, candidate: &BestMix, algorithm: Algorithm) -> bool {
        if candidate.profit_cents < self.profit_hint.load(Ordering::Acquire) {
            return false;
        }

        let mut best = self.lock_best();
        let wins = match best.as_ref() {
            None => true,
            Some(current) => algorithm.outranks(candidate.profit_cents, &candidate.path, current),
        };
        if wins {
            *best = Some(candidate.clone());
            self.profit_hint
                .fetch_max(candidate.profit_cents, Ordering::AcqRel);
        }
        wins
    }

    /// True until a run has recorded a best or counted a mix.
    pub fn is_fresh(&self) -> bool {
        self.processed() == 0 && self.lock_best().is_none()
    }

    /// Snapshot of the global best.
    pub fn best(&self) -> Option<BestMix> {
        self.lock_best().clone()
    }

    /// Add a batch of evaluated mixes; returns the new total.
    pub fn add_processed(&self, count: u64) -> u64 {
        self.processed.fetch_add(count, Ordering::AcqRel) + count
    }

    pub fn processed(&self) -> u64 {
        self.processed.load(Ordering::Acquire)
    }

    /// Signal all workers to stop.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Check if we should stop searching.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Channel endpoints for a worker.
#[derive(Debug, Clone)]
pub struct WorkerChannels {
    /// Send messages to coordinator.
    pub to_coordinator: Sender<WorkerMessage>,
    /// Shared state.
    pub shared: Arc<SharedSearchContext>,
}

/// Channel endpoints for the coordinator.
#[derive(Debug)]
pub struct CoordinatorChannels {
    /// Receive messages from workers.
    pub from_workers: Receiver<WorkerMessage>,
    /// Shared state.
    pub shared: Arc<SharedSearchContext>,
}

/// Create channels for parallel search with the given number of workers.
pub fn create_channels(
    num_workers: usize,
    shared: Arc<SharedSearchContext>,
) -> (CoordinatorChannels, Vec<WorkerChannels>) {
    // Unbounded: workers never block on the coordinator
    let (worker_tx, coordinator_rx) = unbounded();

    let worker_channels = (0..num_workers)
        .map(|_| WorkerChannels {
            to_coordinator: worker_tx.clone(),
            shared: Arc::clone(&shared),
        })
        .collect();

    let coordinator = CoordinatorChannels {
        from_workers: coordinator_rx,
        shared,
    };

    (coordinator, worker_channels)
}
