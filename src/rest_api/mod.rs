//! # Catalog REST API Module
//!
//! Request-to-query translation, payload validation, handler orchestration
//! and the error contract for the `/api/products` endpoints.

pub mod errors;
pub mod handler;
pub mod parser;
pub mod response;
pub mod server;
pub mod validator;

pub use errors::{ApiError, ApiResult, ErrorKind, ErrorResponse};
pub use handler::ProductHandler;
pub use parser::{ListQuery, MAX_LIMIT, SEARCH_LIMIT};
pub use server::{product_routes, route_not_found};
pub use validator::{validate_create, validate_update};
