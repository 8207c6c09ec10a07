//! Error definitions.
use std::path::PathBuf;

use thiserror::Error;

/// Crate-wide error type.
#[derive(Error, Debug)]
pub enum BenchError {
    /// The corpus file is missing, unreadable or could not be read in full.
    #[error("Error loading corpus '{}': {source}", path.display())]
    CorpusRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A benchmark needs at least one timed trial.
    #[error("Trial count must be positive")]
    InvalidTrialCount,

    /// Two registered hash functions share a display name.
    #[error("Hash function '{0}' is already registered")]
    DuplicateHash(String),

    /// A requested hash function is not in the registry.
    #[error("Unknown hash function '{0}'")]
    UnknownHash(String),

    /// Nothing to benchmark.
    #[error("No hash functions registered")]
    EmptyRegistry,

    /// Writing the results failed.
    #[error("Failed to write results: {0}")]
    Output(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BenchError>;
