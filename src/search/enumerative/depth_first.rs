//! Depth-first enumeration
//!
//! Walks one mutable path with an explicit stack of "next child" cursors.
//! The effects cache holds the effect set of every prefix of the current
//! path, so each step applies exactly one substance.

use crate::model::Catalog;
use crate::search::candidate::{BestMix, MixCandidate};
use crate::search::config::{Algorithm, SearchConfig};
use crate::search::enumerative::{BestTracker, CacheSlot};
use crate::search::result::SearchStatistics;
use crate::search::{SearchAlgorithm, SearchObserver};
use std::time::Instant;

/// Exhaustive depth-first search
#[derive(Debug)]
pub struct DepthFirstSearch {
    tracker: BestTracker,
    cache: CacheSlot,
}

impl DepthFirstSearch {
    pub fn new() -> Self {
        Self {
            tracker: BestTracker::new(Algorithm::DepthFirst),
            cache: CacheSlot::default(),
        }
    }
}

impl Default for DepthFirstSearch {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchAlgorithm for DepthFirstSearch {
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

        let mut candidate = MixCandidate::new();
        candidate.push(start, catalog);
        let effects = cache.descend(catalog, 1, start);
        tracker.evaluate(catalog, &candidate, effects, observer);

        // One cursor per path length still being extended
        let mut stack: Vec<usize> = Vec::with_capacity(max_depth);
        if max_depth > 1 {
            stack.push(0);
        }

        while let Some(next) = stack.last_mut() {
            if observer.should_stop() {
                break;
            }
            if *next >= n {
                stack.pop();
                candidate.pop(catalog);
                continue;
            }

            let index = *next;
            *next += 1;

            candidate.push(index, catalog);
            let depth = candidate.depth();
            let effects = cache.descend(catalog, depth, index);
            tracker.evaluate(catalog, &candidate, effects, observer);

            if depth < max_depth {
                stack.push(0);
            } else {
                candidate.pop(catalog);
            }
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
