//! product-catalog - a product catalog over HTTP
//!
//! Untrusted query strings and JSON bodies are translated into bounded,
//! validated store operations; every failure leaves through one typed
//! error contract.

pub mod auth;
pub mod cli;
pub mod http_server;
pub mod observability;
pub mod rest_api;
pub mod store;
