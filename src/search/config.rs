//! Configuration types for mix search

use crate::error::{MixError, MixResult};
use crate::report::ProgressPolicy;
use crate::search::candidate::{BestMix, MixPath, PATH_CAPACITY};
use std::cmp::Ordering;

/// Traversal strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Algorithm {
    /// Explicit-stack backtracking over a single mutable path
    #[default]
    DepthFirst,
    /// Level-by-level expansion of the full frontier
    BreadthFirst,
}

impl Algorithm {
    /// Order in which this strategy first visits mixes.
    ///
    /// Depth-first visits in lexicographic order of the index path (a prefix
    /// before its extensions); breadth-first visits shorter mixes first, then
    /// lexicographically. Among equally profitable mixes the earlier one wins.
    pub fn visit_order(&self, a: &MixPath, b: &MixPath) -> Ordering {
        match self {
            Algorithm::DepthFirst => a.as_slice().cmp(b.as_slice()),
            Algorithm::BreadthFirst => a
                .len()
                .cmp(&b.len())
                .then_with(|| a.as_slice().cmp(b.as_slice())),
        }
    }

    /// Whether a mix at `path` with `profit_cents` should replace `incumbent`:
    /// strictly more profit, or equal profit and visited earlier.
    pub fn outranks(&self, profit_cents: i64, path: &MixPath, incumbent: &BestMix) -> bool {
        match profit_cents.cmp(&incumbent.profit_cents) {
            Ordering::Greater => true,
            Ordering::Less => false,
            Ordering::Equal => self.visit_order(path, &incumbent.path) == Ordering::Less,
        }
    }
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Algorithm::DepthFirst => write!(f, "depth-first"),
            Algorithm::BreadthFirst => write!(f, "breadth-first"),
        }
    }
}

impl std::str::FromStr for Algorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "depth-first" | "dfs" => Ok(Algorithm::DepthFirst),
            "breadth-first" | "bfs" => Ok(Algorithm::BreadthFirst),
            _ => Err(format!(
                "Unknown algorithm: '{}'. Valid options: dfs, bfs",
                s
            )),
        }
    }
}

/// Main search configuration
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Traversal strategy
    pub algorithm: Algorithm,
    /// Longest mix to consider
    pub max_depth: usize,
    /// Reuse rule-engine results across converging branches
    pub memoize: bool,
    /// Upper bound on memo entries per worker (None = unbounded)
    pub memo_capacity: Option<usize>,
    /// How often workers publish progress
    pub progress: ProgressPolicy,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::default(),
            max_depth: 5,
            memoize: true,
            memo_capacity: None,
            progress: ProgressPolicy::default(),
        }
    }
}

impl SearchConfig {
    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_memoize(mut self, memoize: bool) -> Self {
        self.memoize = memoize;
        self
    }

    pub fn with_memo_capacity(mut self, capacity: usize) -> Self {
        self.memo_capacity = Some(capacity);
        self
    }

    pub fn with_memo_capacity_option(mut self, capacity: Option<usize>) -> Self {
        self.memo_capacity = capacity;
        self
    }

    pub fn with_progress(mut self, progress: ProgressPolicy) -> Self {
        self.progress = progress;
        self
    }

    /// Fail fast if `max_depth` does not fit the path representation
    pub fn validate(&self) -> MixResult<()> {
        if self.max_depth == 0 || self.max_depth > PATH_CAPACITY {
            return Err(MixError::InvalidDepth {
                requested: self.max_depth,
                capacity: PATH_CAPACITY,
            });
        }
        Ok(())
    }
}
