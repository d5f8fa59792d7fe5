//! # Access Control
//!
//! Single shared-key authorization for the catalog API.

pub mod api_key;
pub mod crypto;

pub use api_key::{authorize, ApiKeyGate, API_KEY_HEADER};
