//! Search result types and statistics

use crate::model::Catalog;
use crate::search::candidate::BestMix;
use crate::search::config::Algorithm;
use crate::semantics::pricing::cents_to_dollars;
use serde::Serialize;
use std::time::Duration;

/// The most profitable mix of a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    /// Substance names in application order
    pub mix_path: Vec<String>,
    pub profit_cents: i64,
    pub sell_price_cents: i64,
    pub cost_cents: i64,
}

impl SearchResult {
    pub fn from_best(best: &BestMix, catalog: &Catalog) -> Self {
        Self {
            mix_path: catalog.mix_names(best.path.as_slice()),
            profit_cents: best.profit_cents,
            sell_price_cents: best.sell_price_cents,
            cost_cents: best.cost_cents,
        }
    }

    pub fn profit(&self) -> f64 {
        cents_to_dollars(self.profit_cents)
    }

    pub fn sell_price(&self) -> f64 {
        cents_to_dollars(self.sell_price_cents)
    }

    pub fn cost(&self) -> f64 {
        cents_to_dollars(self.cost_cents)
    }
}

impl std::fmt::Display for SearchResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Best mix ({} substances):", self.mix_path.len())?;
        for (i, name) in self.mix_path.iter().enumerate() {
            writeln!(f, "  {}. {}", i + 1, name)?;
        }
        writeln!(f, "Sell price: ${:.2}", self.sell_price())?;
        writeln!(f, "Cost: ${:.2}", self.cost())?;
        write!(f, "Profit: ${:.2}", self.profit())
    }
}

/// Statistics from a search operation
#[derive(Debug, Clone, Default)]
pub struct SearchStatistics {
    /// Traversal strategy used
    pub algorithm: Algorithm,
    /// Total time spent searching
    pub elapsed_time: Duration,
    /// Number of mixes evaluated
    pub nodes_evaluated: u64,
    /// Effect memo hits
    pub cache_hits: u64,
    /// Effect memo misses
    pub cache_misses: u64,
    /// Number of times the best-so-far improved
    pub improvements_found: u64,
    /// Workers that took part
    pub workers: usize,
}

impl SearchStatistics {
    pub fn new(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            ..Default::default()
        }
    }

    /// Fold another worker's counters into this one
    pub fn absorb(&mut self, other: &SearchStatistics) {
        self.nodes_evaluated += other.nodes_evaluated;
        self.cache_hits += other.cache_hits;
        self.cache_misses += other.cache_misses;
        self.improvements_found += other.improvements_found;
    }

    /// Fraction of memo lookups answered from the memo (0.0 to 1.0)
    pub fn cache_hit_rate(&self) -> f64 {
        let lookups = self.cache_hits + self.cache_misses;
        if lookups == 0 {
            0.0
        } else {
            self.cache_hits as f64 / lookups as f64
        }
    }

    /// Mixes evaluated per second
    pub fn throughput(&self) -> f64 {
        let secs = self.elapsed_time.as_secs_f64();
        if secs == 0.0 {
            0.0
        } else {
            self.nodes_evaluated as f64 / secs
        }
    }

    /// Format statistics as a human-readable string
    pub fn format_summary(&self) -> String {
        let mut s = String::new();
        s.push_str(&format!("Algorithm: {}\n", self.algorithm));
        s.push_str(&format!("Workers: {}\n", self.workers));
        s.push_str(&format!("Time: {:.2?}\n", self.elapsed_time));
        s.push_str(&format!("Mixes evaluated: {}\n", self.nodes_evaluated));
        s.push_str(&format!("Throughput: {:.0} mixes/sec\n", self.throughput()));
        if self.cache_hits + self.cache_misses > 0 {
            s.push_str(&format!(
                "Effect cache hit rate: {:.2}%\n",
                self.cache_hit_rate() * 100.0
            ));
        }
        s.push_str(&format!("Improvements found: {}\n", self.improvements_found));
        s
    }
}
