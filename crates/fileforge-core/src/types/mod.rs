//! Domain types shared across FileForge crates.

pub mod conversion;

pub use conversion::{ConversionResult, OutputArtifact, UploadedFile};
