//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use fileforge_convert::{ConversionDispatcher, ScratchArea};
use fileforge_core::config::AppConfig;

/// Shared dependencies, passed to every handler via `State<AppState>`.
///
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// The conversion orchestrator.
    pub dispatcher: Arc<ConversionDispatcher>,
    /// Upload and output directory owner.
    pub scratch: Arc<ScratchArea>,
}
