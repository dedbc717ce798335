//! The conversion capability interface.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::{ConversionResult, UploadedFile};

/// A registered conversion procedure for one (source, target) pair.
///
/// Implementations perform the transform — in-process codec work or an
/// external tool invocation — and return a successful [`ConversionResult`]
/// describing the produced artifacts. Failures are returned as `Err` and
/// recovered by the dispatcher into a `success=false` result; converters
/// never panic on malformed input.
///
/// Object-safe so the registry can hold `Arc<dyn Converter>` and unit tests
/// can substitute fakes without spawning real processes.
#[async_trait]
pub trait Converter: Send + Sync + std::fmt::Debug {
    /// Stable converter name used in logs.
    fn name(&self) -> &'static str;

    /// Perform the conversion for the given scratch file.
    async fn convert(&self, file: &UploadedFile) -> AppResult<ConversionResult>;
}
