//! Mix paths, candidates and search-space arithmetic

use crate::model::Catalog;
use std::fmt;

/// Longest mix a `MixPath` can hold
pub const PATH_CAPACITY: usize = 16;

/// Fixed-capacity sequence of substance indices.
///
/// Pushing past `PATH_CAPACITY` is a logic error; search configs are
/// validated against the capacity before any traversal starts.
#[derive(Clone)]
pub struct MixPath {
    indices: [usize; PATH_CAPACITY],
    len: usize,
}

impl MixPath {
    pub fn new() -> Self {
        Self {
            indices: [0; PATH_CAPACITY],
            len: 0,
        }
    }

    pub fn push(&mut self, index: usize) {
        assert!(self.len < PATH_CAPACITY, "mix path capacity exceeded");
        self.indices[self.len] = index;
        self.len += 1;
    }

    pub fn pop(&mut self) -> Option<usize> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        Some(self.indices[self.len])
    }

    pub fn last(&self) -> Option<usize> {
        self.as_slice().last().copied()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.indices[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Default for MixPath {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for MixPath {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl Eq for MixPath {}

impl fmt::Debug for MixPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

/// A path plus its running cost
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MixCandidate {
    pub path: MixPath,
    pub cost_cents: i64,
}

impl MixCandidate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a substance and add its cost
    pub fn push(&mut self, index: usize, catalog: &Catalog) {
        self.path.push(index);
        self.cost_cents += catalog.cost_cents(index);
    }

    /// Remove the last substance and subtract its cost
    pub fn pop(&mut self, catalog: &Catalog) -> Option<usize> {
        let index = self.path.pop()?;
        self.cost_cents -= catalog.cost_cents(index);
        Some(index)
    }

    /// A copy extended by one substance
    pub fn child(&self, index: usize, catalog: &Catalog) -> Self {
        let mut child = self.clone();
        child.push(index, catalog);
        child
    }

    pub fn depth(&self) -> usize {
        self.path.len()
    }
}

/// A fully evaluated mix, kept as a best-so-far record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BestMix {
    pub path: MixPath,
    pub sell_price_cents: i64,
    pub cost_cents: i64,
    pub profit_cents: i64,
}

impl BestMix {
    pub fn new(candidate: &MixCandidate, sell_price_cents: i64) -> Self {
        Self {
            path: candidate.path.clone(),
            sell_price_cents,
            cost_cents: candidate.cost_cents,
            profit_cents: sell_price_cents - candidate.cost_cents,
        }
    }
}

/// Number of mixes of length 1 through `max_depth`: Σ n^d.
///
/// Saturates at `u64::MAX` instead of overflowing.
pub fn total_search_space(substance_count: usize, max_depth: usize) -> u64 {
    let n = substance_count as u64;
    let mut total: u64 = 0;
    let mut level: u64 = 1;
    for _ in 0..max_depth {
        level = level.saturating_mul(n);
        total = total.saturating_add(level);
    }
    total
}
