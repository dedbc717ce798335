//! # fileforge-core
//!
//! Core crate for FileForge. Contains the `Converter` trait, configuration
//! schemas, the conversion domain types, and the unified error system.
//!
//! This crate has **no** internal dependencies on other FileForge crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
