//! Effect memoization for search workers
//!
//! Two layers:
//! - a path register holding the effect set at each depth of the current
//!   depth-first path, overwritten as the path backtracks;
//! - a memo from (substance, parent effect set) to the resulting set, shared
//!   by every branch the worker explores.
//!
//! Memo keys are the effect sets themselves, compared by full equality, so a
//! hash collision between distinct sets can never return a wrong result.
//! Whether the default-effect cap applies is part of the key as well, since
//! the same pair yields different sets before and after the cap.

use crate::model::{Catalog, EffectSet};
use crate::semantics::rules::{adds_default_effect, apply_rules};
use std::collections::HashMap;

/// Worker-local effects cache. Never shared between threads.
#[derive(Debug)]
pub struct EffectsCache {
    /// `levels[d]` is the effect set after the first `d` substances of the current path
    levels: Vec<EffectSet>,
    /// One map per (substance, cap applies) pair; `None` when memoization is off
    memo: Option<Vec<HashMap<EffectSet, EffectSet>>>,
    memo_entries: usize,
    memo_capacity: Option<usize>,
    hits: u64,
    misses: u64,
}

impl EffectsCache {
    pub fn new(catalog: &Catalog, max_depth: usize, memoize: bool) -> Self {
        let mut levels = vec![EffectSet::new(); max_depth + 1];
        levels[0] = catalog.initial_effects().clone();
        let memo = memoize.then(|| vec![HashMap::new(); catalog.substance_count() * 2]);
        Self {
            levels,
            memo,
            memo_entries: 0,
            memo_capacity: None,
            hits: 0,
            misses: 0,
        }
    }

    /// Stop inserting once the memo holds `capacity` entries
    pub fn with_capacity_limit(mut self, capacity: Option<usize>) -> Self {
        self.memo_capacity = capacity;
        self
    }

    pub fn is_memoizing(&self) -> bool {
        self.memo.is_some()
    }

    /// Effect set recorded for `depth` on the current path
    pub fn level(&self, depth: usize) -> &EffectSet {
        &self.levels[depth]
    }

    /// Record the effect set for `depth` by applying `substance` to the set
    /// at `depth - 1`. Anything previously recorded at `depth` or deeper
    /// belongs to an abandoned branch and is overwritten.
    pub fn descend(&mut self, catalog: &Catalog, depth: usize, substance: usize) -> &EffectSet {
        debug_assert!(depth >= 1 && depth < self.levels.len());
        let (parents, rest) = self.levels.split_at_mut(depth);
        let parent = &parents[depth - 1];
        let next = Self::lookup(
            &mut self.memo,
            &mut self.memo_entries,
            self.memo_capacity,
            &mut self.hits,
            &mut self.misses,
            catalog,
            parent,
            substance,
            depth - 1,
        );
        rest[0] = next;
        &self.levels[depth]
    }

    /// Apply `substance` at mix position `mix_length_so_far` to `parent`,
    /// going through the memo when enabled. Used by breadth-first search,
    /// whose frontier carries its own effect sets.
    pub fn resolve(
        &mut self,
        catalog: &Catalog,
        parent: &EffectSet,
        substance: usize,
        mix_length_so_far: usize,
    ) -> EffectSet {
        Self::lookup(
            &mut self.memo,
            &mut self.memo_entries,
            self.memo_capacity,
            &mut self.hits,
            &mut self.misses,
            catalog,
            parent,
            substance,
            mix_length_so_far,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn lookup(
        memo: &mut Option<Vec<HashMap<EffectSet, EffectSet>>>,
        entries: &mut usize,
        capacity: Option<usize>,
        hits: &mut u64,
        misses: &mut u64,
        catalog: &Catalog,
        parent: &EffectSet,
        substance: usize,
        mix_length_so_far: usize,
    ) -> EffectSet {
        let Some(maps) = memo.as_mut() else {
            return apply_rules(parent, catalog.substance(substance), mix_length_so_far);
        };

        let slot = substance * 2 + usize::from(adds_default_effect(mix_length_so_far));
        let map = &mut maps[slot];
        if let Some(cached) = map.get(parent) {
            *hits += 1;
            return cached.clone();
        }

        *misses += 1;
        let result = apply_rules(parent, catalog.substance(substance), mix_length_so_far);
        if capacity.is_none_or(|cap| *entries < cap) {
            map.insert(parent.clone(), result.clone());
            *entries += 1;
        }
        result
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    /// Number of memoized results
    pub fn len(&self) -> usize {
        self.memo_entries
    }

    pub fn is_empty(&self) -> bool {
        self.memo_entries == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MultiplierTable, Product, Rule, Substance};
    use crate::semantics::rules::effects_for_mix;

    fn catalog() -> Catalog {
        Catalog::compile(
            &Product::new("Weed", "Calming"),
            &[
                Substance::new("Cuke", 200, "Energizing"),
                Substance::new("Banana", 200, "Gingeritis")
                    .with_rule(Rule::replace(&["Energizing"], &[], "Energizing", "Thought-Provoking")),
            ],
            &MultiplierTable::new(),
        )
        .unwrap()
    }

    #[test]
    fn test_descend_matches_direct_application() {
        let catalog = catalog();
        let mut cache = EffectsCache::new(&catalog, 3, true);

        cache.descend(&catalog, 1, 0);
        cache.descend(&catalog, 2, 1);
        let third = cache.descend(&catalog, 3, 0).clone();

        assert_eq!(third, effects_for_mix(&catalog, &[0, 1, 0]));
        assert_eq!(cache.level(2), &effects_for_mix(&catalog, &[0, 1]));
    }

    #[test]
    fn test_descend_overwrites_on_backtrack() {
        let catalog = catalog();
        let mut cache = EffectsCache::new(&catalog, 2, false);

        cache.descend(&catalog, 1, 0);
        cache.descend(&catalog, 2, 1);
        cache.descend(&catalog, 1, 1);
        let second = cache.descend(&catalog, 2, 0).clone();

        assert_eq!(second, effects_for_mix(&catalog, &[1, 0]));
    }

    #[test]
    fn test_memo_hits_on_repeated_parent() {
        let catalog = catalog();
        let mut cache = EffectsCache::new(&catalog, 2, true);
        let parent = catalog.initial_effects().clone();

        let first = cache.resolve(&catalog, &parent, 0, 0);
        let second = cache.resolve(&catalog, &parent, 0, 1);
        assert_eq!(first, second);
        assert_eq!(cache.misses(), 1);
        assert_eq!(cache.hits(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_memo_separates_default_effect_cap() {
        let catalog = catalog();
        let mut cache = EffectsCache::new(&catalog, 2, true);
        let parent = catalog.initial_effects().clone();

        let before_cap = cache.resolve(&catalog, &parent, 0, 8);
        let after_cap = cache.resolve(&catalog, &parent, 0, 9);
        assert_ne!(before_cap, after_cap);
        assert_eq!(cache.hits(), 0);
        assert_eq!(cache.misses(), 2);
    }

    #[test]
    fn test_memo_disabled_counts_nothing() {
        let catalog = catalog();
        let mut cache = EffectsCache::new(&catalog, 2, false);
        let parent = catalog.initial_effects().clone();

        cache.resolve(&catalog, &parent, 0, 0);
        cache.resolve(&catalog, &parent, 0, 0);
        assert!(!cache.is_memoizing());
        assert_eq!(cache.hits(), 0);
        assert_eq!(cache.misses(), 0);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_memo_capacity_limit() {
        let catalog = catalog();
        let mut cache = EffectsCache::new(&catalog, 2, true).with_capacity_limit(Some(1));
        let parent = catalog.initial_effects().clone();

        cache.resolve(&catalog, &parent, 0, 0);
        let uncached = cache.resolve(&catalog, &parent, 1, 0);
        let again = cache.resolve(&catalog, &parent, 1, 0);

        assert_eq!(uncached, again);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.misses(), 3);
    }
}
