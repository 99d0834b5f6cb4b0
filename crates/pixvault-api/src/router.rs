//! Route definitions for the PixVault HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`.
//! The router receives `AppState` and passes it to all handlers via Axum's `State` extractor.

use std::time::Duration;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{delete, get, patch, post},
};
use tower_http::compression::CompressionLayer;
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Headroom for multipart boundaries and text fields on top of the file ceiling.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Build the complete Axum router with all routes and middleware.
///
/// Receives the fully-constructed `AppState` and threads it through
/// every route via `.with_state(state)`. When blobs live on the local
/// filesystem they are served back under `/blobs`.
pub fn build_router(state: AppState) -> Router {
    let max_body = state.config.storage.max_upload_size_bytes as usize + MULTIPART_OVERHEAD;
    let timeout = Duration::from_secs(state.config.server.request_timeout_seconds);

    let api_routes = Router::new()
        .merge(file_routes())
        .merge(folder_routes())
        .merge(health_routes());

    let mut router = Router::new().nest("/api", api_routes);
    if state.config.storage.provider == "local" {
        router = router.nest_service(
            "/blobs",
            ServeDir::new(&state.config.storage.local.root_path),
        );
    }

    let cors = middleware::cors::build_cors_layer(&state.config.server.cors);

    router
        .layer(DefaultBodyLimit::max(max_body))
        .layer(TimeoutLayer::new(timeout))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(
            middleware::logging::request_logging,
        ))
        .with_state(state)
}

/// Listing, upload, lifecycle toggles, and purge
fn file_routes() -> Router<AppState> {
    Router::new()
        .route("/files", get(handlers::file::list_files))
        .route("/files/counts", get(handlers::file::view_counts))
        .route("/files/upload", post(handlers::file::upload_file))
        .route("/files/empty-trash", delete(handlers::file::empty_trash))
        .route("/files/{id}", get(handlers::file::get_file))
        .route("/files/{id}/breadcrumbs", get(handlers::file::breadcrumbs))
        .route("/files/{id}/urls", get(handlers::file::retrieval_urls))
        .route("/files/{id}/star", patch(handlers::file::toggle_star))
        .route("/files/{id}/trash", patch(handlers::file::toggle_trash))
        .route("/files/{id}/delete", delete(handlers::file::delete_file))
}

/// Folder creation
fn folder_routes() -> Router<AppState> {
    Router::new().route("/folders/create", post(handlers::folder::create_folder))
}

/// Health check
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
