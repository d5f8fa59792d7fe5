//! # Store Errors
//!
//! Failures raised by the document store. None of these are client errors:
//! the REST layer renders every one of them as an opaque 500.

use std::io;

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Document store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// The identifier cannot be cast to the store's id format
    #[error("Cast to id failed for value \"{0}\"")]
    MalformedId(String),

    /// A lock guarding the collection was poisoned by a panicking writer
    #[error("Collection lock poisoned")]
    LockPoisoned,

    /// Reading or writing the data file failed
    #[error("Data file I/O failed: {0}")]
    Io(#[from] io::Error),

    /// The data file holds something that is not a product collection
    #[error("Data file is corrupt: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A write task on the blocking pool panicked or was cancelled
    #[error("Store task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
