//! Route definitions for the FileForge HTTP API.
//!
//! API routes are mounted under `/api`; conversion artifacts are served
//! statically under the configured output URL prefix.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::middleware::cors::build_cors_layer;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    // Body limit sits one megabyte above the validation cap so the
    // size check owns the user-facing rejection message.
    let max_body = (state.config.scratch.max_upload_mb as usize + 1) * 1024 * 1024;

    let api_routes = Router::new()
        .route("/convert", post(handlers::convert::convert_file))
        .route("/health", get(handlers::health::health));

    let cors = build_cors_layer(&state.config.server.cors);
    let output_prefix = state.scratch.url_prefix().to_string();
    let output_service = ServeDir::new(state.scratch.output_dir().to_path_buf());

    Router::new()
        .nest("/api", api_routes)
        .nest_service(&output_prefix, output_service)
        .layer(DefaultBodyLimit::max(max_body))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(
            middleware::logging::request_logging,
        ))
        .with_state(state)
}
