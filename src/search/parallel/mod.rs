//! Parallel search execution across first-substance subtrees.
//!
//! # Architecture
//!
//! The parallel search system consists of:
//! - A **coordinator** that spawns worker threads, drives the reporter and
//!   aggregates results
//! - Multiple **workers**, each running one traversal over the start
//!   substances dealt to it
//! - A **channel** carrying progress, improvements and completion from
//!   workers to the coordinator
//! - **Shared state** holding the global best behind a single lock, plus
//!   atomics for the processed count and cancellation
//!
//! # Example
//!
//! ```ignore
//! use mixopt::search::parallel::{ParallelConfig, run_parallel_search};
//!
//! let config = ParallelConfig::default()
//!     .with_workers(4)
//!     .with_timeout(Duration::from_secs(60));
//!
//! let result = run_parallel_search(catalog, &search_config, &config, &mut reporter)?;
//! ```

pub mod channel;
pub mod config;
pub mod coordinator;

pub use channel::SharedSearchContext;
pub use config::{MAX_WORKERS, ParallelConfig};
pub use coordinator::{ParallelResult, run_parallel_search, run_parallel_search_in};
