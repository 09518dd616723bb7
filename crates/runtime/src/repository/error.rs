//! Error types raised by repository implementations.

use thiserror::Error;

/// Errors surfaced by entity store implementations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("repository lock was poisoned")]
    LockPoisoned,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("corrupted data: {0}")]
    CorruptedData(String),

    #[error("{0} is not stored")]
    MissingRecord(String),
}

pub type Result<T> = std::result::Result<T, RepositoryError>;
