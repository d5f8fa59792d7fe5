//! # REST API Router
//!
//! Axum routes for `/api/products`. The API key gate wraps the whole router,
//! fallback included, so nothing under the prefix answers unauthenticated.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{
        rejection::{BytesRejection, QueryRejection},
        OriginalUri, Path, Query, Request, State,
    },
    http::{header::CONTENT_TYPE, HeaderMap, Method, StatusCode},
    middleware::{self, Next},
    response::Response,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::auth::{ApiKeyGate, API_KEY_HEADER};
use crate::store::ProductStore;

use super::errors::{ApiError, ApiResult};
use super::handler::ProductHandler;
use super::response::{
    ListResponse, MessageResponse, ProductResponse, SearchResponse, StatsResponse,
};

/// Shared state type
type HandlerState<S> = Arc<ProductHandler<S>>;

/// Build the catalog router, to be nested under `/api/products`
pub fn product_routes<S: ProductStore + 'static>(
    handler: ProductHandler<S>,
    gate: ApiKeyGate,
) -> Router {
    Router::new()
        .route(
            "/",
            get(list_handler::<S>)
                .post(create_handler::<S>)
                .fallback(route_not_found),
        )
        .route("/search", get(search_handler::<S>).fallback(route_not_found))
        .route(
            "/stats/category",
            get(stats_handler::<S>).fallback(route_not_found),
        )
        .route(
            "/:id",
            get(get_handler::<S>)
                .put(update_handler::<S>)
                .delete(delete_handler::<S>)
                .fallback(route_not_found),
        )
        .fallback(route_not_found)
        .with_state(Arc::new(handler))
        .layer(middleware::from_fn_with_state(
            Arc::new(gate),
            require_api_key,
        ))
}

/// Reject the request unless it presents the configured API key
async fn require_api_key(
    State(gate): State<Arc<ApiKeyGate>>,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    let provided = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok());
    gate.authorize(provided)?;
    Ok(next.run(request).await)
}

/// Body for requests that match no route
#[derive(Debug, Serialize)]
pub struct RouteNotFound {
    pub success: bool,
    pub message: String,
    pub error: &'static str,
}

/// Fallback for unmatched routes and unsupported methods
pub async fn route_not_found(
    method: Method,
    OriginalUri(uri): OriginalUri,
) -> (StatusCode, Json<RouteNotFound>) {
    let target = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| uri.path());
    (
        StatusCode::NOT_FOUND,
        Json(RouteNotFound {
            success: false,
            message: format!("Cannot {} {}", method, target),
            error: "Route not found",
        }),
    )
}

fn query_params(
    query: Result<Query<HashMap<String, String>>, QueryRejection>,
) -> ApiResult<HashMap<String, String>> {
    query.map(|Query(params)| params).map_err(|e| {
        ApiError::bad_request("Malformed query string")
            .with_details(json!({ "reason": e.body_text() }))
    })
}

/// Read a request body as a JSON document.
///
/// A blank body, or one sent without a JSON content type, reads as an empty
/// object so the validators report what is missing.
fn json_body(headers: &HeaderMap, body: Result<Bytes, BytesRejection>) -> ApiResult<Value> {
    let body = body.map_err(|e| {
        ApiError::bad_request("Unreadable request body")
            .with_details(json!({ "reason": e.body_text() }))
    })?;

    if !is_json_content_type(headers) || body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Map::new()));
    }

    serde_json::from_slice(&body).map_err(|e| {
        ApiError::bad_request("Malformed JSON body").with_details(json!({ "reason": e.to_string() }))
    })
}

/// `application/json` or any `application/*+json` media type
fn is_json_content_type(headers: &HeaderMap) -> bool {
    let Some(mime) = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
    else {
        return false;
    };

    let mime = mime.trim().to_ascii_lowercase();
    mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
}

/// List products handler
async fn list_handler<S: ProductStore + 'static>(
    State(handler): State<HandlerState<S>>,
    query: Result<Query<HashMap<String, String>>, QueryRejection>,
) -> ApiResult<Json<ListResponse>> {
    let params = query_params(query)?;
    Ok(Json(handler.list(&params).await?))
}

/// Search handler
async fn search_handler<S: ProductStore + 'static>(
    State(handler): State<HandlerState<S>>,
    query: Result<Query<HashMap<String, String>>, QueryRejection>,
) -> ApiResult<Json<SearchResponse>> {
    let params = query_params(query)?;
    let q = params.get("q").map(String::as_str);
    Ok(Json(handler.search(q).await?))
}

/// Category stats handler
async fn stats_handler<S: ProductStore + 'static>(
    State(handler): State<HandlerState<S>>,
) -> ApiResult<Json<StatsResponse>> {
    Ok(Json(handler.stats().await?))
}

/// Get single product handler
async fn get_handler<S: ProductStore + 'static>(
    State(handler): State<HandlerState<S>>,
    Path(id): Path<String>,
) -> ApiResult<Json<ProductResponse>> {
    Ok(Json(handler.get(&id).await?))
}

/// Create product handler
async fn create_handler<S: ProductStore + 'static>(
    State(handler): State<HandlerState<S>>,
    headers: HeaderMap,
    payload: Result<Bytes, BytesRejection>,
) -> ApiResult<(StatusCode, Json<ProductResponse>)> {
    let body = json_body(&headers, payload)?;
    let created = handler.create(&body).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update product handler
async fn update_handler<S: ProductStore + 'static>(
    State(handler): State<HandlerState<S>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    payload: Result<Bytes, BytesRejection>,
) -> ApiResult<Json<ProductResponse>> {
    let body = json_body(&headers, payload)?;
    Ok(Json(handler.update(&id, &body).await?))
}

/// Delete product handler
async fn delete_handler<S: ProductStore + 'static>(
    State(handler): State<HandlerState<S>>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    Ok(Json(handler.delete(&id).await?))
}
