//! # HTTP Server Module
//!
//! Serves the catalog over HTTP.
//!
//! # Endpoints
//!
//! - `/` - Service banner
//! - `/health` - Liveness check
//! - `/api/products/*` - Catalog API (requires `x-api-key`)

pub mod config;
pub mod observability_routes;
pub mod server;

pub use config::{ConfigError, ServerConfig};
pub use server::{CatalogApp, HttpServer};
