//! # REST API Errors
//!
//! The closed error taxonomy of the catalog API and the terminal responder
//! that turns any error into the `{success: false, ...}` response contract.
//!
//! Only the four known kinds ever reach the client with their own message.
//! Everything else is rendered as an opaque 500 and logged server-side.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::store::StoreError;

/// Result type for REST operations
pub type ApiResult<T> = Result<T, ApiError>;

/// Message sent for every unclassified failure
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";

/// Classified failure kinds a client is allowed to see
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    BadRequest,
    Unauthorized,
    NotFound,
    ValidationFailed,
}

impl ErrorKind {
    /// Get HTTP status code for this kind
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorKind::BadRequest => StatusCode::BAD_REQUEST,
            ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::ValidationFailed => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    /// Message used when none is given
    pub fn default_message(&self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "Bad request",
            ErrorKind::Unauthorized => "Unauthorized",
            ErrorKind::NotFound => "Resource not found",
            ErrorKind::ValidationFailed => "Validation failed",
        }
    }
}

/// REST API errors
#[derive(Debug, Error)]
pub enum ApiError {
    /// A classified error whose message is safe to return
    #[error("{message}")]
    Known {
        kind: ErrorKind,
        message: String,
        details: Option<Value>,
    },

    // ==================
    // Unclassified (500)
    // ==================
    /// Store failure, never reclassified by handlers
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Any other internal failure
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        ApiError::Known {
            kind,
            message: message.into(),
            details: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::BadRequest, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthorized, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ValidationFailed, message)
    }

    /// Attach structured diagnostics. Unclassified errors never carry any.
    pub fn with_details(self, value: Value) -> Self {
        match self {
            ApiError::Known { kind, message, .. } => ApiError::Known {
                kind,
                message,
                details: Some(value),
            },
            other => other,
        }
    }

    /// The known kind, or `None` for unclassified errors
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            ApiError::Known { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    pub fn details(&self) -> Option<&Value> {
        match self {
            ApiError::Known { details, .. } => details.as_ref(),
            _ => None,
        }
    }

    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        self.kind()
            .map(|kind| kind.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl From<ErrorKind> for ApiError {
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind, kind.default_message())
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl From<ApiError> for ErrorResponse {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Known {
                message, details, ..
            } => Self {
                success: false,
                message,
                details,
            },
            _ => Self {
                success: false,
                message: INTERNAL_ERROR_MESSAGE.to_string(),
                details: None,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if self.kind().is_none() {
            tracing::error!(error = %self, "Unhandled error");
        }
        let body = Json(ErrorResponse::from(self));
        (status, body).into_response()
    }
}
