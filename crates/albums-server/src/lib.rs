//! Album catalog server library logic.

pub mod api;
pub mod config;

use albums_db::DbPool;
use axum::{
    extract::DefaultBodyLimit,
    http::Method,
    routing::get,
    Extension, Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: DbPool,
}

/// Maximum request body size (1 MiB).
const MAX_REQUEST_BODY_BYTES: usize = 1024 * 1024;

/// Health check handler.
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Builds the application router with all routes.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/albums",
            get(api::list_albums_handler).post(api::create_album_handler),
        )
        .route(
            "/albums/{id}",
            get(api::get_album_handler).delete(api::delete_album_handler),
        )
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::PATCH,
                    Method::DELETE,
                    Method::HEAD,
                ])
                .allow_headers(Any),
        )
        .layer(Extension(Arc::new(state)))
}
