//! Parallel search coordinator that manages worker threads.

use crate::error::{MixError, MixResult};
use crate::model::Catalog;
use crate::report::{ProgressPolicy, ProgressUpdate, Reporter};
use crate::search::candidate::{BestMix, total_search_space};
use crate::search::config::{Algorithm, SearchConfig};
use crate::search::enumerative::new_search;
use crate::search::parallel::channel::{
    CoordinatorChannels, SharedSearchContext, WorkerChannels, WorkerMessage, create_channels,
};
use crate::search::parallel::config::ParallelConfig;
use crate::search::result::{SearchResult, SearchStatistics};
use crate::search::SearchObserver;
use crossbeam_channel::RecvTimeoutError;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Result from parallel search execution.
#[derive(Debug)]
pub struct ParallelResult {
    /// The best mix found across all workers (None only if cancelled before any evaluation).
    pub best_result: Option<SearchResult>,
    /// Statistics aggregated from all workers.
    pub total_statistics: SearchStatistics,
    /// Per-worker statistics, ordered by worker id.
    pub worker_statistics: Vec<(usize, SearchStatistics)>,
    /// Whether the run stopped early.
    pub cancelled: bool,
}

/// Run parallel search with the given configuration.
pub fn run_parallel_search(
    catalog: Arc<Catalog>,
    search_config: &SearchConfig,
    parallel_config: &ParallelConfig,
    reporter: &mut dyn Reporter,
) -> MixResult<ParallelResult> {
    run_parallel_search_in(
        Arc::new(SharedSearchContext::new()),
        catalog,
        search_config,
        parallel_config,
        reporter,
    )
}

/// Run parallel search against a caller-owned context.
///
/// Cancelling `shared` from another thread stops the workers at their next
/// node expansion. The context must be fresh: one that already holds a best
/// or a processed count is rejected with `MixError::ContextInUse`.
pub fn run_parallel_search_in(
    shared: Arc<SharedSearchContext>,
    catalog: Arc<Catalog>,
    search_config: &SearchConfig,
    parallel_config: &ParallelConfig,
    reporter: &mut dyn Reporter,
) -> MixResult<ParallelResult> {
    search_config.validate()?;
    let substance_count = catalog.substance_count();
    if substance_count == 0 {
        return Err(MixError::NoSubstances);
    }
    if !shared.is_fresh() {
        return Err(MixError::ContextInUse);
    }

    let start_time = Instant::now();
    let num_workers = parallel_config.workers_for(substance_count);
    let total = total_search_space(substance_count, search_config.max_depth);
    if total > i32::MAX as u64 {
        warn!(
            total,
            "search space exceeds 32-bit progress counters; clamped views will saturate"
        );
    }
    info!(
        substances = substance_count,
        max_depth = search_config.max_depth,
        algorithm = %search_config.algorithm,
        workers = num_workers,
        memoize = search_config.memoize,
        total,
        "starting search"
    );

    let (coordinator_channels, worker_channels) = create_channels(num_workers, shared);
    let search_config = Arc::new(search_config.clone());

    let mut handles: Vec<JoinHandle<()>> = Vec::with_capacity(num_workers);
    for (worker_id, channels) in worker_channels.into_iter().enumerate() {
        let catalog = Arc::clone(&catalog);
        let search_config = Arc::clone(&search_config);

        let spawned = thread::Builder::new()
            .name(format!("mixopt-worker-{}", worker_id))
            .spawn(move || run_worker(worker_id, num_workers, &catalog, &search_config, channels));

        match spawned {
            Ok(handle) => handles.push(handle),
            Err(source) => {
                coordinator_channels.shared.cancel();
                for handle in handles {
                    let _ = handle.join();
                }
                return Err(MixError::WorkerSpawn { worker_id, source });
            }
        }
    }

    let result = run_coordinator(
        &catalog,
        coordinator_channels,
        &search_config,
        parallel_config,
        num_workers,
        total,
        start_time,
        reporter,
    );

    // Wait for all workers to finish; re-raise the first panic
    let mut panic = None;
    for handle in handles {
        if let Err(payload) = handle.join() {
            panic.get_or_insert(payload);
        }
    }
    if let Some(payload) = panic {
        std::panic::resume_unwind(payload);
    }

    Ok(result)
}

/// Coordinator loop that receives messages from workers and aggregates results.
#[allow(clippy::too_many_arguments)]
fn run_coordinator(
    catalog: &Catalog,
    channels: CoordinatorChannels,
    search_config: &SearchConfig,
    parallel_config: &ParallelConfig,
    num_workers: usize,
    total: u64,
    start_time: Instant,
    reporter: &mut dyn Reporter,
) -> ParallelResult {
    let algorithm = search_config.algorithm;
    let mut reported: Option<BestMix> = None;
    let mut worker_stats: Vec<(usize, SearchStatistics)> = Vec::with_capacity(num_workers);
    let mut finished_count = 0;
    let mut last_processed = 0;

    let deadline = parallel_config.timeout.map(|t| start_time + t);

    loop {
        if deadline.is_some_and(|d| Instant::now() >= d) && !channels.shared.is_cancelled() {
            debug!("timeout reached, cancelling workers");
            channels.shared.cancel();
        }

        // Receive with timeout to allow periodic checks
        let recv_timeout = Duration::from_millis(100);
        match channels.from_workers.recv_timeout(recv_timeout) {
            Ok(WorkerMessage::Progress {
                depth, processed, ..
            }) => {
                // Batches from different workers may arrive out of order
                last_processed = processed.max(last_processed);
                reporter.progress(ProgressUpdate {
                    depth,
                    processed: last_processed.min(total),
                    total,
                });
            }
            Ok(WorkerMessage::Improvement { worker_id, best }) => {
                let newer = reported
                    .as_ref()
                    .is_none_or(|current| algorithm.outranks(best.profit_cents, &best.path, current));
                if newer {
                    debug!(
                        worker_id,
                        profit_cents = best.profit_cents,
                        path = ?best.path,
                        "global best improved"
                    );
                    reporter.best_mix(&SearchResult::from_best(&best, catalog));
                    reported = Some(best);
                }
            }
            Ok(WorkerMessage::Finished {
                worker_id,
                statistics,
            }) => {
                debug!(
                    worker_id,
                    nodes = statistics.nodes_evaluated,
                    "worker finished"
                );
                worker_stats.push((worker_id, statistics));
                finished_count += 1;
                if finished_count >= num_workers {
                    break;
                }
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                // All senders dropped, we're done
                break;
            }
        }
    }

    let cancelled = channels.shared.is_cancelled();
    let processed = channels.shared.processed();
    reporter.progress(ProgressUpdate {
        depth: search_config.max_depth,
        processed,
        total,
    });

    worker_stats.sort_by_key(|(worker_id, _)| *worker_id);
    let mut total_stats = SearchStatistics::new(algorithm);
    for (_, stats) in &worker_stats {
        total_stats.absorb(stats);
    }
    total_stats.elapsed_time = start_time.elapsed();
    total_stats.workers = num_workers;

    let best_result = channels
        .shared
        .best()
        .map(|best| SearchResult::from_best(&best, catalog));

    info!(
        nodes = total_stats.nodes_evaluated,
        elapsed = ?total_stats.elapsed_time,
        cancelled,
        profit_cents = best_result.as_ref().map(|r| r.profit_cents),
        "search finished"
    );

    ParallelResult {
        best_result,
        total_statistics: total_stats,
        worker_statistics: worker_stats,
        cancelled,
    }
}

/// Forwards a traversal's events to the shared context and the coordinator.
struct WorkerObserver<'a> {
    worker_id: usize,
    algorithm: Algorithm,
    policy: ProgressPolicy,
    pending: u64,
    channels: &'a WorkerChannels,
}

impl WorkerObserver<'_> {
    fn publish(&mut self, depth: usize) {
        let processed = self.channels.shared.add_processed(self.pending);
        self.pending = 0;
        let _ = self.channels.to_coordinator.send(WorkerMessage::Progress {
            worker_id: self.worker_id,
            depth,
            processed,
        });
    }

    /// Publish whatever is left below the reporting interval
    fn flush(&mut self, depth: usize) {
        if self.pending > 0 {
            self.publish(depth);
        }
    }
}

impl SearchObserver for WorkerObserver<'_> {
    fn node_evaluated(&mut self, depth: usize) {
        self.pending += 1;
        if self.pending >= self.policy.interval(depth) {
            self.publish(depth);
        }
    }

    fn improved(&mut self, best: &BestMix) {
        if self.channels.shared.offer(best, self.algorithm) {
            let _ = self.channels.to_coordinator.send(WorkerMessage::Improvement {
                worker_id: self.worker_id,
                best: best.clone(),
            });
        }
    }

    fn should_stop(&self) -> bool {
        self.channels.shared.is_cancelled()
    }
}

/// Worker function: searches every start substance dealt to `worker_id`.
fn run_worker(
    worker_id: usize,
    num_workers: usize,
    catalog: &Catalog,
    config: &SearchConfig,
    channels: WorkerChannels,
) {
    let starts: Vec<usize> = (worker_id..catalog.substance_count())
        .step_by(num_workers)
        .collect();
    debug!(worker_id, ?starts, "worker started");

    let mut search = new_search(config.algorithm);
    let mut observer = WorkerObserver {
        worker_id,
        algorithm: config.algorithm,
        policy: config.progress,
        pending: 0,
        channels: &channels,
    };

    for start in starts {
        if channels.shared.is_cancelled() {
            break;
        }
        search.search_from(catalog, start, config, &mut observer);
    }
    observer.flush(config.max_depth);

    let mut statistics = search.statistics();
    statistics.workers = 1;
    let _ = channels.to_coordinator.send(WorkerMessage::Finished {
        worker_id,
        statistics,
    });
}
