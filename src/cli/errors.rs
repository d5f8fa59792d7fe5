//! CLI-specific error types
//!
//! All CLI errors are fatal: they are printed and the process exits 1.

use std::io;

use thiserror::Error;

use crate::http_server::ConfigError;
use crate::store::StoreError;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// CLI error
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Server error: {0}")]
    Io(#[from] io::Error),

    /// Seeding needs somewhere durable to write
    #[error("DATA_FILE is not set; seeding requires a persistent data file")]
    MissingDataFile,
}
