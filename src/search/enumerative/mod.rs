//! Exhaustive enumeration of mix space
//!
//! Both traversals evaluate every node, not only leaves, since profit can
//! peak before the maximum depth. They differ only in visit order and in
//! memory profile.

pub mod breadth_first;
pub mod depth_first;

pub use breadth_first::BreadthFirstSearch;
pub use depth_first::DepthFirstSearch;

use crate::model::{Catalog, EffectSet};
use crate::search::cache::EffectsCache;
use crate::search::candidate::{BestMix, MixCandidate};
use crate::search::config::{Algorithm, SearchConfig};
use crate::search::result::SearchStatistics;
use crate::search::{SearchAlgorithm, SearchObserver};

/// Create the traversal selected by `algorithm`
pub fn new_search(algorithm: Algorithm) -> Box<dyn SearchAlgorithm + Send> {
    match algorithm {
        Algorithm::DepthFirst => Box::new(DepthFirstSearch::new()),
        Algorithm::BreadthFirst => Box::new(BreadthFirstSearch::new()),
    }
}

/// Run the configured traversal over every start substance on the current
/// thread.
pub fn search_all(
    catalog: &Catalog,
    config: &SearchConfig,
    observer: &mut dyn SearchObserver,
) -> (Option<BestMix>, SearchStatistics) {
    let mut search = new_search(config.algorithm);
    let mut best = None;
    for start in 0..catalog.substance_count() {
        if observer.should_stop() {
            break;
        }
        best = search.search_from(catalog, start, config, observer);
    }
    (best, search.statistics())
}

/// Best-so-far bookkeeping shared by both traversals
#[derive(Debug, Default)]
pub(crate) struct BestTracker {
    pub(crate) best: Option<BestMix>,
    pub(crate) statistics: SearchStatistics,
}

impl BestTracker {
    pub(crate) fn new(algorithm: Algorithm) -> Self {
        Self {
            best: None,
            statistics: SearchStatistics::new(algorithm),
        }
    }

    /// Price one mix and keep it if it outranks the current best
    pub(crate) fn evaluate(
        &mut self,
        catalog: &Catalog,
        candidate: &MixCandidate,
        effects: &EffectSet,
        observer: &mut dyn SearchObserver,
    ) {
        let sell_price = catalog.sell_price_cents(effects);
        let profit = sell_price - candidate.cost_cents;

        self.statistics.nodes_evaluated += 1;
        observer.node_evaluated(candidate.depth());

        let improves = match &self.best {
            None => true,
            Some(best) => self
                .statistics
                .algorithm
                .outranks(profit, &candidate.path, best),
        };
        if improves {
            let best = BestMix::new(candidate, sell_price);
            observer.improved(&best);
            self.best = Some(best);
            self.statistics.improvements_found += 1;
        }
    }

    pub(crate) fn reset(&mut self) {
        let algorithm = self.statistics.algorithm;
        *self = Self::new(algorithm);
    }
}

/// (max depth, memoize, memo capacity) a cache was built for
type CacheShape = (usize, bool, Option<usize>);

/// Lazily built effects cache that survives across start substances.
///
/// Rebuilt when the config changes shape; counters from a retired cache are
/// folded into the owner's statistics first.
#[derive(Debug, Default)]
pub(crate) struct CacheSlot {
    cache: Option<(CacheShape, EffectsCache)>,
}

impl CacheSlot {
    pub(crate) fn prepare(
        &mut self,
        catalog: &Catalog,
        config: &SearchConfig,
        statistics: &mut SearchStatistics,
    ) -> &mut EffectsCache {
        let shape = (config.max_depth, config.memoize, config.memo_capacity);
        if self.cache.as_ref().is_some_and(|(built, _)| *built != shape) {
            self.retire(statistics);
        }
        let (_, cache) = self.cache.get_or_insert_with(|| {
            let cache = EffectsCache::new(catalog, config.max_depth, config.memoize)
                .with_capacity_limit(config.memo_capacity);
            (shape, cache)
        });
        cache
    }

    /// Drop the cache, keeping its counters
    pub(crate) fn retire(&mut self, statistics: &mut SearchStatistics) {
        if let Some((_, cache)) = self.cache.take() {
            statistics.cache_hits += cache.hits();
            statistics.cache_misses += cache.misses();
        }
    }

    /// Live counters of the current cache
    pub(crate) fn counters(&self) -> (u64, u64) {
        self.cache
            .as_ref()
            .map_or((0, 0), |(_, cache)| (cache.hits(), cache.misses()))
    }

    pub(crate) fn clear(&mut self) {
        self.cache = None;
    }

    /// Fold live counters into a statistics snapshot
    pub(crate) fn snapshot(&self, statistics: &SearchStatistics) -> SearchStatistics {
        let (hits, misses) = self.counters();
        let mut stats = statistics.clone();
        stats.cache_hits += hits;
        stats.cache_misses += misses;
        stats
    }
}
