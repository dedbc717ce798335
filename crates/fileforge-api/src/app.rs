//! Application builder — wires router + middleware + state into an Axum app.

use std::sync::Arc;

use axum::Router;

use fileforge_convert::{ConversionDispatcher, ConversionRegistry, ScratchArea};
use fileforge_core::config::AppConfig;
use fileforge_core::error::AppError;

use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    build_router(state)
}

/// Construct the shared state for a configuration: scratch area, registry,
/// and dispatcher.
pub fn build_state(config: AppConfig) -> AppState {
    let scratch = Arc::new(ScratchArea::new(&config.scratch));
    let registry = Arc::new(ConversionRegistry::standard(
        Arc::clone(&scratch),
        &config.conversion,
    ));
    let dispatcher = Arc::new(ConversionDispatcher::new(registry, Arc::clone(&scratch)));

    AppState {
        config: Arc::new(config),
        dispatcher,
        scratch,
    }
}

/// Runs the FileForge server with the given configuration.
pub async fn run_server(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting FileForge server...");

    let state = build_state(config);

    // Wipe crash leftovers; uploads and artifacts never outlive a run.
    state.scratch.reset().await?;

    let addr = format!(
        "{}:{}",
        state.config.server.host, state.config.server.port
    );
    let scratch = Arc::clone(&state.scratch);
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("FileForge server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    tracing::info!("Clearing scratch areas before exit");
    scratch.reset().await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
