//! Conversion orchestration.
//!
//! Derives the source extension, resolves a capability in the registry,
//! invokes the executor, and normalizes every failure into a
//! `success=false` result. The input scratch file is scheduled for
//! deferred deletion on every path; output artifacts are never touched.

use std::sync::Arc;

use fileforge_core::error::AppError;
use fileforge_core::result::AppResult;
use fileforge_core::types::{ConversionResult, UploadedFile};

use crate::registry::ConversionRegistry;
use crate::scratch::ScratchArea;

/// Orchestrates one conversion request end to end.
pub struct ConversionDispatcher {
    registry: Arc<ConversionRegistry>,
    scratch: Arc<ScratchArea>,
}

impl ConversionDispatcher {
    /// Create a dispatcher over a built registry and scratch area.
    pub fn new(registry: Arc<ConversionRegistry>, scratch: Arc<ScratchArea>) -> Self {
        Self { registry, scratch }
    }

    /// Dispatch an uploaded file to the converter selected by its source
    /// extension and the requested target format.
    ///
    /// Never returns an error: dispatch and executor failures surface as a
    /// result with `success=false` and a descriptive message. Transport
    /// status codes are the HTTP layer's concern.
    pub async fn dispatch(
        &self,
        file: UploadedFile,
        target: Option<&str>,
    ) -> ConversionResult {
        let outcome = self.run(&file, target).await;

        // Input cleanup happens regardless of outcome.
        self.scratch.schedule_unlink(file.path.clone());

        match outcome {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(
                    original_name = %file.original_name,
                    error = %e,
                    "Conversion failed"
                );
                ConversionResult::failure(e.message)
            }
        }
    }

    async fn run(
        &self,
        file: &UploadedFile,
        target: Option<&str>,
    ) -> AppResult<ConversionResult> {
        let ext = file
            .source_extension()
            .ok_or_else(|| AppError::unsupported("Unsupported file type."))?;

        let converter = self.registry.resolve(&ext, target)?;

        tracing::info!(
            converter = converter.name(),
            source = %ext,
            target = target.unwrap_or("-"),
            declared_mime = file.declared_mime.as_deref().unwrap_or("-"),
            "Dispatching conversion"
        );

        converter.convert(file).await
    }
}
