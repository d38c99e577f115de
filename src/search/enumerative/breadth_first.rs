//! Breadth-first enumeration
//!
//! Expands the whole frontier one length at a time. Every frontier node
//! carries its own effect set, so memory grows as n^depth; prefer
//! depth-first for deep searches.

use crate::model::{Catalog, EffectSet};
use crate::search::candidate::{BestMix, MixCandidate};
use crate::search::config::{Algorithm, SearchConfig};
use crate::search::enumerative::{BestTracker, CacheSlot};
use crate::search::result::SearchStatistics;
use crate::search::{SearchAlgorithm, SearchObserver};
use std::time::Instant;

/// Exhaustive breadth-first search
#[derive(Debug)]
pub struct BreadthFirstSearch {
    tracker: BestTracker,
    cache: CacheSlot,
}

impl BreadthFirstSearch {
    pub fn new() -> Self {
        Self {
            tracker: BestTracker::new(Algorithm::BreadthFirst),
            cache: CacheSlot::default(),
        }
    }
}

impl Default for BreadthFirstSearch {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchAlgorithm for BreadthFirstSearch {
    fn search_from(
        &mut self,
        catalog: &Catalog,
        start: usize,
        config: &SearchConfig,
        observer: &mut dyn SearchObserver,
    ) -> Option<BestMix> {
        let start_time = Instant::now();
        let n = catalog.substance_count();
        let max_depth = config.max_depth;

        if start >= n || config.validate().is_err() || observer.should_stop() {
            return self.tracker.best.clone();
        }

        let tracker = &mut self.tracker;
        let cache = self.cache.prepare(catalog, config, &mut tracker.statistics);

        let mut root = MixCandidate::new();
        root.push(start, catalog);
        let root_effects = cache.resolve(catalog, catalog.initial_effects(), start, 0);
        let mut frontier: Vec<(MixCandidate, EffectSet)> = vec![(root, root_effects)];

        'levels: for depth in 1..=max_depth {
            for (candidate, effects) in &frontier {
                if observer.should_stop() {
                    break 'levels;
                }
                tracker.evaluate(catalog, candidate, effects, observer);
            }

            if depth == max_depth {
                break;
            }

            let mut next = Vec::with_capacity(frontier.len().saturating_mul(n));
            for (candidate, effects) in &frontier {
                if observer.should_stop() {
                    break 'levels;
                }
                for index in 0..n {
                    let child_effects = cache.resolve(catalog, effects, index, depth);
                    next.push((candidate.child(index, catalog), child_effects));
                }
            }
            frontier = next;
        }

        tracker.statistics.elapsed_time += start_time.elapsed();
        tracker.best.clone()
    }

    fn statistics(&self) -> SearchStatistics {
        self.cache.snapshot(&self.tracker.statistics)
    }

    fn reset(&mut self) {
        self.tracker.reset();
        self.cache.clear();
    }
}
