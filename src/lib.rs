//! mixopt - exhaustive mix profit optimizer
//!
//! Finds, among all sequences of up to `max_depth` substances applied to a
//! product, the one with the highest sell price minus ingredient cost.
//!
//! ```ignore
//! let best = mixopt::run(&product, &substances, &multipliers, 5, None)?;
//! println!("{}", best);
//! ```

pub mod error;
pub mod loader;
pub mod model;
pub mod report;
pub mod search;
pub mod semantics;

pub use error::{MixError, MixResult};
pub use model::{Catalog, MultiplierTable, Product, Rule, RuleKind, Substance};
pub use report::{ConsoleReporter, NullReporter, ProgressFn, ProgressPolicy, ProgressUpdate, Reporter};
pub use search::{Algorithm, ParallelConfig, ParallelResult, SearchConfig, SearchResult};

use std::sync::Arc;

/// Search with the default configuration: depth-first, memoized, up to 16 workers.
///
/// `progress` receives `(depth, processed, total)` on the calling thread; the
/// last call always has `processed == total`.
pub fn run(
    product: &Product,
    substances: &[Substance],
    multipliers: &MultiplierTable,
    max_depth: usize,
    progress: Option<&mut dyn FnMut(usize, u64, u64)>,
) -> MixResult<SearchResult> {
    let config = SearchConfig::default().with_max_depth(max_depth);
    let parallel = ParallelConfig::default();

    let result = match progress {
        Some(callback) => run_with_config(
            product,
            substances,
            multipliers,
            &config,
            &parallel,
            &mut ProgressFn(callback),
        )?,
        None => run_with_config(
            product,
            substances,
            multipliers,
            &config,
            &parallel,
            &mut NullReporter,
        )?,
    };

    result.best_result.ok_or(MixError::Cancelled)
}

/// Search with explicit configuration, returning the full parallel result.
pub fn run_with_config(
    product: &Product,
    substances: &[Substance],
    multipliers: &MultiplierTable,
    config: &SearchConfig,
    parallel: &ParallelConfig,
    reporter: &mut dyn Reporter,
) -> MixResult<ParallelResult> {
    config.validate()?;
    let catalog = Arc::new(Catalog::compile(product, substances, multipliers)?);
    search::run_parallel_search(catalog, config, parallel, reporter)
}
