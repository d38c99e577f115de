//! Error types for the mix optimizer core

use thiserror::Error;

/// Precondition violations and fatal conditions of a search run.
///
/// Nothing inside the rule or pricing engines produces an error; unknown
/// effect names are simply absent. These variants cover what is checked
/// before a run starts and the one fatal condition during it.
#[derive(Error, Debug)]
pub enum MixError {
    #[error("at least one substance is required")]
    NoSubstances,

    #[error("max depth must be between 1 and {capacity}, got {requested}")]
    InvalidDepth { requested: usize, capacity: usize },

    #[error("too many distinct effect names (limit is {limit})")]
    TooManyEffects { limit: usize },

    #[error("search was cancelled before any mix was evaluated")]
    Cancelled,

    #[error("search context already holds results from an earlier run")]
    ContextInUse,

    #[error("failed to spawn search worker {worker_id}: {source}")]
    WorkerSpawn {
        worker_id: usize,
        #[source]
        source: std::io::Error,
    },
}

pub type MixResult<T> = Result<T, MixError>;
