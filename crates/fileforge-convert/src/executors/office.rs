//! Office document conversion via a headless LibreOffice run.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use fileforge_core::config::conversion::ConversionConfig;
use fileforge_core::error::AppError;
use fileforge_core::result::AppResult;
use fileforge_core::traits::Converter;
use fileforge_core::types::{ConversionResult, UploadedFile};

use crate::scratch::ScratchArea;
use crate::tool::ToolRunner;

/// DOCX → PDF via `soffice --headless`.
#[derive(Debug)]
pub struct DocxToPdfConverter {
    scratch: Arc<ScratchArea>,
    runner: ToolRunner,
    command: String,
}

impl DocxToPdfConverter {
    pub fn new(scratch: Arc<ScratchArea>, config: &ConversionConfig) -> Self {
        Self {
            scratch,
            runner: ToolRunner::new(config.tool_timeout_seconds),
            command: config.soffice_command.clone(),
        }
    }
}

#[async_trait]
impl Converter for DocxToPdfConverter {
    fn name(&self) -> &'static str {
        "docx_to_pdf"
    }

    async fn convert(&self, file: &UploadedFile) -> AppResult<ConversionResult> {
        let output_dir = self.scratch.output_dir();
        let args = vec![
            "--headless".to_string(),
            "--convert-to".to_string(),
            "pdf".to_string(),
            "--outdir".to_string(),
            output_dir.to_string_lossy().into_owned(),
            file.path.to_string_lossy().into_owned(),
        ];
        self.runner.run(&self.command, &args).await?;

        let output_name = format!("{}.pdf", file.base_name());
        let expected = output_dir.join(&output_name);
        if !expected.exists() {
            reconcile_output(output_dir, &file.original_name, &expected).await?;
        }

        Ok(ConversionResult::single(
            "Conversion: DOCX → PDF",
            "pdf",
            self.scratch.url_prefix(),
            output_name,
        ))
    }
}

/// Some converter builds name the output after the document title instead
/// of the input file. Recover the artifact by renaming the file derived
/// from the original name; anything else is a hard failure.
async fn reconcile_output(
    output_dir: &Path,
    original_name: &str,
    expected: &Path,
) -> AppResult<()> {
    let stem = original_name
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .unwrap_or(original_name);
    let alternate = output_dir.join(format!("{stem}.pdf"));

    if alternate.exists() {
        tracing::warn!(
            from = %alternate.display(),
            to = %expected.display(),
            "Reconciling misnamed converter output"
        );
        tokio::fs::rename(&alternate, expected)
            .await
            .map_err(|e| AppError::storage(format!("Failed to rename converter output: {e}")))?;
        return Ok(());
    }

    Err(AppError::conversion(
        "Converter did not produce the expected output.",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use fileforge_core::config::scratch::ScratchConfig;

    fn scratch(dir: &tempfile::TempDir) -> Arc<ScratchArea> {
        Arc::new(ScratchArea::new(&ScratchConfig {
            upload_dir: dir.path().join("uploads").to_string_lossy().into_owned(),
            output_dir: dir.path().join("output").to_string_lossy().into_owned(),
            output_url_prefix: "/output".to_string(),
            max_upload_mb: 10,
            unlink_delay_ms: 10,
        }))
    }

    #[tokio::test]
    async fn test_missing_soffice_is_a_conversion_error() {
        let dir = tempfile::tempdir().unwrap();
        let scratch = scratch(&dir);
        scratch.ensure().await.unwrap();
        let file = scratch.store_upload("memo.docx", None, b"PK\x03\x04").await.unwrap();

        let config = ConversionConfig {
            soffice_command: "fileforge-no-such-tool".to_string(),
            ..ConversionConfig::default()
        };
        let err = DocxToPdfConverter::new(scratch, &config)
            .convert(&file)
            .await
            .unwrap_err();
        assert!(err.message.contains("Failed to launch"));
    }

    #[tokio::test]
    async fn test_reconcile_renames_alternate_output() {
        let dir = tempfile::tempdir().unwrap();
        let expected = dir.path().join("abc123.pdf");
        tokio::fs::write(dir.path().join("memo.pdf"), b"%PDF")
            .await
            .unwrap();

        reconcile_output(dir.path(), "memo.docx", &expected)
            .await
            .unwrap();
        assert!(expected.exists());
        assert!(!dir.path().join("memo.pdf").exists());
    }

    #[tokio::test]
    async fn test_reconcile_without_any_output_fails() {
        let dir = tempfile::tempdir().unwrap();
        let expected = dir.path().join("abc123.pdf");

        let err = reconcile_output(dir.path(), "memo.docx", &expected)
            .await
            .unwrap_err();
        assert!(err.message.contains("did not produce"));
    }
}
