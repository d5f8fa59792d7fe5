//! # HTTP Server
//!
//! Combines the info routes and the catalog API into one axum app with
//! access logging, CORS and a JSON 404 fallback. A trailing slash is
//! trimmed before routing, so `/api/products/` serves the list.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{extract::Request, response::Response, Router};
use tokio::net::TcpListener;
use tower::Layer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::trace::TraceLayer;
use tracing::Span;

use crate::auth::ApiKeyGate;
use crate::rest_api::{product_routes, route_not_found, ProductHandler};
use crate::store::ProductStore;

use super::config::ServerConfig;
use super::observability_routes::info_routes;

/// The service as served: the router behind trailing-slash normalization
pub type CatalogApp = NormalizePath<Router>;

/// HTTP server for the product catalog
pub struct HttpServer {
    config: ServerConfig,
    router: Router,
}

impl HttpServer {
    /// Create a server over the given store
    pub fn new<S: ProductStore + 'static>(config: ServerConfig, store: Arc<S>) -> Self {
        let router = Self::build_router(&config, store);
        Self { config, router }
    }

    /// Build the combined router with all endpoints
    fn build_router<S: ProductStore + 'static>(config: &ServerConfig, store: Arc<S>) -> Router {
        let gate = ApiKeyGate::new(config.api_key.clone());
        if !gate.is_configured() {
            tracing::warn!("No API key configured; every /api/products request will be rejected");
        }

        let cors = if config.cors_origins.is_empty() {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            let origins: Vec<_> = config
                .cors_origins
                .iter()
                .filter_map(|s| s.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        };

        Router::new()
            .merge(info_routes(Instant::now()))
            .nest("/api/products", product_routes(ProductHandler::new(store), gate))
            .fallback(route_not_found)
            .layer(cors)
            // One line per response: method, uri, status and latency
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(|request: &Request| {
                        tracing::info_span!("request", method = %request.method(), uri = %request.uri())
                    })
                    .on_response(|response: &Response, latency: Duration, _span: &Span| {
                        tracing::info!(
                            status = response.status().as_u16(),
                            latency_ms = latency.as_secs_f64() * 1000.0,
                            "request completed"
                        );
                    }),
            )
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// The complete service, ready to serve or to drive in tests
    pub fn app(self) -> CatalogApp {
        NormalizePathLayer::trim_trailing_slash().layer(self.router)
    }

    /// Bind and serve until Ctrl-C
    pub async fn start(self) -> Result<(), std::io::Error> {
        let addr = self.config.socket_addr();
        let listener = TcpListener::bind(&addr).await?;

        tracing::info!(address = %addr, "Server is running on http://{}", addr);
        tracing::info!(environment = %self.config.environment, "Environment");

        let app = axum::ServiceExt::<Request>::into_make_service(self.app());
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;

    fn create_test_server(config: ServerConfig) -> HttpServer {
        HttpServer::new(config, Arc::new(InMemoryStore::new()))
    }

    #[test]
    fn test_server_creation() {
        let server = create_test_server(ServerConfig::default());
        assert_eq!(server.socket_addr(), "0.0.0.0:3000");
    }

    #[test]
    fn test_server_with_custom_port() {
        let server = create_test_server(ServerConfig {
            port: 8080,
            ..Default::default()
        });
        assert_eq!(server.socket_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn test_router_builds_with_origins() {
        let config = ServerConfig {
            cors_origins: vec!["http://localhost:5173".to_string()],
            ..Default::default()
        };
        let _app = create_test_server(config).app();
    }
}
