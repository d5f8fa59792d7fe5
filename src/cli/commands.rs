//! CLI command implementations

use std::path::Path;
use std::sync::Arc;

use crate::http_server::{HttpServer, ServerConfig};
use crate::store::seed::sample_products;
use crate::store::InMemoryStore;

use super::args::Command;
use super::errors::{CliError, CliResult};

/// Dispatch a parsed command
pub async fn run_command(command: Command) -> CliResult<()> {
    match command {
        Command::Serve { config } => serve(config.as_deref()).await,
        Command::Seed { config } => {
            let config = ServerConfig::load(config.as_deref())?;
            seed(&config).map(|_| ())
        }
    }
}

/// Open the store and serve HTTP until shutdown
pub async fn serve(config_path: Option<&Path>) -> CliResult<()> {
    let config = ServerConfig::load(config_path)?;
    let store = open_store(&config)?;

    match store.data_file() {
        Some(path) => tracing::info!(
            path = %path.display(),
            products = store.len()?,
            "Product store opened"
        ),
        None => tracing::warn!("DATA_FILE is not set; products are kept in memory only"),
    }

    HttpServer::new(config, Arc::new(store)).start().await?;
    Ok(())
}

/// Replace the persisted catalog with the sample products.
///
/// Returns the number of products inserted.
pub fn seed(config: &ServerConfig) -> CliResult<usize> {
    let path = config.data_file.as_ref().ok_or(CliError::MissingDataFile)?;
    let store = InMemoryStore::open(path)?;

    let before = store.len()?;
    tracing::info!(count = before, "Products before seeding");

    let inserted = store.replace_all(sample_products())?;
    tracing::info!(
        inserted = inserted.len(),
        total = store.len()?,
        "Seeded product catalog"
    );
    Ok(inserted.len())
}

fn open_store(config: &ServerConfig) -> CliResult<InMemoryStore> {
    Ok(match &config.data_file {
        Some(path) => InMemoryStore::open(path)?,
        None => InMemoryStore::new(),
    })
}
