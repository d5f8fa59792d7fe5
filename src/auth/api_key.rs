//! # API Key Gate
//!
//! Every catalog route is protected by one shared secret presented in the
//! `x-api-key` header. The configured secret is handed to the gate when it
//! is built; the gate never looks at process state itself.

use std::fmt;

use crate::rest_api::errors::{ApiError, ApiResult};

use super::crypto::constant_time_str_eq;

/// Header carrying the presented key
pub const API_KEY_HEADER: &str = "x-api-key";

/// Check a presented key against the configured one.
///
/// A server with no configured key rejects everything.
pub fn authorize(provided: Option<&str>, configured: Option<&str>) -> ApiResult<()> {
    let Some(expected) = configured.filter(|k| !k.is_empty()) else {
        return Err(ApiError::unauthorized("API key is not configured"));
    };

    match provided {
        Some(key) if constant_time_str_eq(key, expected) => Ok(()),
        _ => Err(ApiError::unauthorized("Invalid or missing API key")),
    }
}

/// The access gate holding the server-side secret
#[derive(Clone, Default)]
pub struct ApiKeyGate {
    configured: Option<String>,
}

impl ApiKeyGate {
    pub fn new(configured: Option<String>) -> Self {
        Self {
            configured: configured.filter(|k| !k.is_empty()),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.configured.is_some()
    }

    /// Authorize a request given the value of its API key header
    pub fn authorize(&self, provided: Option<&str>) -> ApiResult<()> {
        authorize(provided, self.configured.as_deref())
    }
}

impl fmt::Debug for ApiKeyGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKeyGate")
            .field("configured", &self.configured.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}
