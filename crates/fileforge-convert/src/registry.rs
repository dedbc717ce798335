//! The conversion capability registry.
//!
//! Maps a source extension to a small ordered set of capabilities, each
//! tagged with the target format it produces. Adding a conversion is a
//! data-registration act here, not a control-flow edit.

use std::collections::HashMap;
use std::sync::Arc;

use fileforge_core::config::conversion::ConversionConfig;
use fileforge_core::error::AppError;
use fileforge_core::result::AppResult;
use fileforge_core::traits::Converter;

use crate::executors::office::DocxToPdfConverter;
use crate::executors::pdf::{PdfToJpgConverter, PdfToTxtConverter};
use crate::executors::raster::RasterConverter;
use crate::executors::text::{JpgToPdfConverter, TxtToPdfConverter};
use crate::scratch::ScratchArea;

/// One registered conversion procedure with the target it produces.
#[derive(Clone)]
pub struct Capability {
    /// Target format this capability produces, lowercase.
    pub target: String,
    /// The converter implementation.
    pub converter: Arc<dyn Converter>,
}

/// Process-wide mapping from source extension to registered capabilities.
///
/// Built once at startup and read-only at request time.
#[derive(Default)]
pub struct ConversionRegistry {
    capabilities: HashMap<String, Vec<Capability>>,
}

impl ConversionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the registry with every supported conversion pair.
    pub fn standard(scratch: Arc<ScratchArea>, config: &ConversionConfig) -> Self {
        let mut registry = Self::new();

        registry.register("jpg", "png", Arc::new(RasterConverter::jpg_to_png(scratch.clone())));
        registry.register("jpg", "pdf", Arc::new(JpgToPdfConverter::new(scratch.clone())));
        registry.register("png", "jpg", Arc::new(RasterConverter::png_to_jpg(scratch.clone())));
        registry.register("pdf", "jpg", Arc::new(PdfToJpgConverter::new(scratch.clone(), config)));
        registry.register("pdf", "txt", Arc::new(PdfToTxtConverter::new(scratch.clone(), config)));
        registry.register("docx", "pdf", Arc::new(DocxToPdfConverter::new(scratch.clone(), config)));
        registry.register("txt", "pdf", Arc::new(TxtToPdfConverter::new(scratch)));

        registry
    }

    /// Register a converter for a (source extension, target format) pair.
    pub fn register(
        &mut self,
        source_ext: &str,
        target: &str,
        converter: Arc<dyn Converter>,
    ) {
        self.capabilities
            .entry(source_ext.to_ascii_lowercase())
            .or_default()
            .push(Capability {
                target: target.to_ascii_lowercase(),
                converter,
            });
    }

    /// Resolve a converter for the given source extension and requested
    /// target format.
    ///
    /// A lone capability is returned regardless of the target (the field is
    /// then advisory). With several capabilities the target must name one of
    /// them; a missing or unknown target is rejected before any executor
    /// runs.
    pub fn resolve(
        &self,
        source_ext: &str,
        target: Option<&str>,
    ) -> AppResult<Arc<dyn Converter>> {
        let caps = self
            .capabilities
            .get(source_ext)
            .filter(|caps| !caps.is_empty())
            .ok_or_else(|| AppError::unsupported("Unsupported file type."))?;

        if caps.len() == 1 {
            return Ok(caps[0].converter.clone());
        }

        let requested = target.map(str::to_ascii_lowercase).unwrap_or_default();
        caps.iter()
            .find(|c| c.target == requested)
            .map(|c| c.converter.clone())
            .ok_or_else(|| {
                let targets: Vec<&str> = caps.iter().map(|c| c.target.as_str()).collect();
                AppError::unsupported(format!(
                    "Please specify target: {}",
                    targets.join(" or ")
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use fileforge_core::error::ErrorKind;
    use fileforge_core::types::{ConversionResult, UploadedFile};

    #[derive(Debug)]
    struct FakeConverter(&'static str);

    #[async_trait]
    impl Converter for FakeConverter {
        fn name(&self) -> &'static str {
            self.0
        }

        async fn convert(&self, _file: &UploadedFile) -> AppResult<ConversionResult> {
            Ok(ConversionResult::single("fake", "txt", "/output", "x.txt"))
        }
    }

    fn registry() -> ConversionRegistry {
        let mut registry = ConversionRegistry::new();
        registry.register("pdf", "jpg", Arc::new(FakeConverter("pdf_to_jpg")));
        registry.register("pdf", "txt", Arc::new(FakeConverter("pdf_to_txt")));
        registry.register("txt", "pdf", Arc::new(FakeConverter("txt_to_pdf")));
        registry
    }

    #[test]
    fn test_unknown_extension_is_unsupported() {
        let err = registry().resolve("exe", None).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unsupported);
        assert_eq!(err.message, "Unsupported file type.");
    }

    #[test]
    fn test_single_capability_ignores_target() {
        let converter = registry().resolve("txt", Some("docx")).unwrap();
        assert_eq!(converter.name(), "txt_to_pdf");
    }

    #[test]
    fn test_ambiguous_source_requires_target() {
        let registry = registry();
        let err = registry.resolve("pdf", None).unwrap_err();
        assert!(err.message.contains("Please specify target: jpg or txt"));

        let err = registry.resolve("pdf", Some("docx")).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unsupported);

        let converter = registry.resolve("pdf", Some("TXT")).unwrap();
        assert_eq!(converter.name(), "pdf_to_txt");
    }
}
