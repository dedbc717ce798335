//! # fileforge-api
//!
//! The HTTP surface of FileForge: one multipart conversion endpoint, a
//! health probe, and static serving of conversion artifacts.

pub mod app;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, run_server};
pub use state::AppState;
