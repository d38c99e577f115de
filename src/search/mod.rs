//! Search algorithms for finding the most profitable mix
//!
//! This module provides the exhaustive traversals over mix space:
//! - Depth-first: explicit-stack backtracking over one mutable path
//! - Breadth-first: level-by-level frontier expansion
//! - Parallel: a coordinator fanning first-substance subtrees out to workers

pub mod cache;
pub mod candidate;
pub mod config;
pub mod enumerative;
pub mod parallel;
pub mod result;

pub use candidate::{BestMix, MixCandidate, MixPath, PATH_CAPACITY, total_search_space};
pub use config::{Algorithm, SearchConfig};
pub use enumerative::{BreadthFirstSearch, DepthFirstSearch, new_search};
pub use parallel::{ParallelConfig, ParallelResult, run_parallel_search};
pub use result::{SearchResult, SearchStatistics};

use crate::model::Catalog;

/// Hooks a traversal calls while it runs
pub trait SearchObserver {
    /// One mix at `depth` has been evaluated
    fn node_evaluated(&mut self, depth: usize);

    /// The traversal's own best-so-far improved
    fn improved(&mut self, best: &BestMix);

    /// Polled between node expansions; returning `true` abandons the traversal
    fn should_stop(&self) -> bool {
        false
    }
}

/// Observer that ignores everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl SearchObserver for NoopObserver {
    fn node_evaluated(&mut self, _depth: usize) {}

    fn improved(&mut self, _best: &BestMix) {}
}

/// Trait for traversals that enumerate every mix rooted at a first substance
pub trait SearchAlgorithm {
    /// Evaluate every mix of length 1..=`config.max_depth` that starts with
    /// `start`.
    ///
    /// The best mix is kept across calls until `reset`, so calling this for
    /// several starts yields the best over all of them. A start outside the
    /// catalog or a config that fails `SearchConfig::validate` evaluates
    /// nothing.
    ///
    /// # Returns
    /// The best mix seen so far, or `None` if stopped before any evaluation
    fn search_from(
        &mut self,
        catalog: &Catalog,
        start: usize,
        config: &SearchConfig,
        observer: &mut dyn SearchObserver,
    ) -> Option<BestMix>;

    /// Get statistics accumulated since the last reset
    fn statistics(&self) -> SearchStatistics;

    /// Reset the search state for a new run
    fn reset(&mut self);
}
