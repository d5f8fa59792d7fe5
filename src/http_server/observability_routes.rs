//! Service Info Routes
//!
//! Unauthenticated banner and liveness endpoints.

use std::time::Instant;

use axum::{extract::State, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
    /// Seconds since the server started
    pub uptime: f64,
}

/// Endpoint index shown in the banner
#[derive(Debug, Serialize)]
pub struct EndpointIndex {
    pub products: &'static str,
    pub search: &'static str,
    pub stats: &'static str,
}

/// Root banner response
#[derive(Debug, Serialize)]
pub struct BannerResponse {
    pub message: &'static str,
    pub version: &'static str,
    pub endpoints: EndpointIndex,
    pub documentation: &'static str,
}

/// Banner at `/` and health check at `/health`
pub fn info_routes(started_at: Instant) -> Router {
    Router::new()
        .route("/", get(banner_handler))
        .route("/health", get(health_handler))
        .with_state(started_at)
}

async fn banner_handler() -> Json<BannerResponse> {
    Json(BannerResponse {
        message: "Welcome to the Product API!",
        version: env!("CARGO_PKG_VERSION"),
        endpoints: EndpointIndex {
            products: "/api/products",
            search: "/api/products/search?q=searchterm",
            stats: "/api/products/stats/category",
        },
        documentation: "See README.md for full API documentation",
    })
}

async fn health_handler(State(started_at): State<Instant>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK",
        timestamp: Utc::now().to_rfc3339(),
        uptime: started_at.elapsed().as_secs_f64(),
    })
}
