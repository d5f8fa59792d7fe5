//! CLI module for the catalog service
//!
//! Provides command-line interface for:
//! - serve: Load config, open the store, serve HTTP
//! - seed: Reset the persisted catalog to the sample products

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command};
pub use commands::{run_command, seed, serve};
pub use errors::{CliError, CliResult};

/// Parse arguments, set up logging and run the requested command
pub async fn run() -> CliResult<()> {
    crate::observability::init_tracing();
    run_command(Cli::parse_args().command()).await
}
