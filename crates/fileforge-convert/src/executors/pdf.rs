//! PDF source conversions: rasterization to JPEG pages and text extraction.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;

use fileforge_core::config::conversion::ConversionConfig;
use fileforge_core::error::AppError;
use fileforge_core::result::AppResult;
use fileforge_core::traits::Converter;
use fileforge_core::types::{ConversionResult, OutputArtifact, UploadedFile};

use crate::scratch::ScratchArea;
use crate::tool::ToolRunner;

/// PDF → JPG via `pdftoppm`, one artifact per page in a per-document
/// subdirectory of the output root.
#[derive(Debug)]
pub struct PdfToJpgConverter {
    scratch: Arc<ScratchArea>,
    runner: ToolRunner,
    command: String,
    dpi: u32,
}

impl PdfToJpgConverter {
    pub fn new(scratch: Arc<ScratchArea>, config: &ConversionConfig) -> Self {
        Self {
            scratch,
            runner: ToolRunner::new(config.tool_timeout_seconds),
            command: config.pdftoppm_command.clone(),
            dpi: config.raster_dpi,
        }
    }
}

#[async_trait]
impl Converter for PdfToJpgConverter {
    fn name(&self) -> &'static str {
        "pdf_to_jpg"
    }

    async fn convert(&self, file: &UploadedFile) -> AppResult<ConversionResult> {
        let base = file.base_name();
        let page_dir = self.scratch.output_dir().join(&base);
        tokio::fs::create_dir_all(&page_dir)
            .await
            .map_err(|e| AppError::storage(format!("Failed to create page dir: {e}")))?;

        let args = vec![
            "-jpeg".to_string(),
            "-r".to_string(),
            self.dpi.to_string(),
            file.path.to_string_lossy().into_owned(),
            page_dir.join("page").to_string_lossy().into_owned(),
        ];
        self.runner.run(&self.command, &args).await?;

        let pages = collect_pages(&page_dir).await?;
        if pages.is_empty() {
            return Err(AppError::conversion("Converter produced no pages."));
        }

        let total = pages.len();
        let mut files = Vec::with_capacity(total);
        for (index, path) in pages.into_iter().enumerate() {
            let name = page_name(index, total);
            let renamed = page_dir.join(&name);
            if path != renamed {
                tokio::fs::rename(&path, &renamed)
                    .await
                    .map_err(|e| AppError::storage(format!("Failed to rename page: {e}")))?;
            }
            files.push(OutputArtifact {
                url: format!("{}/{base}/{name}", self.scratch.url_prefix()),
                name,
            });
        }

        Ok(ConversionResult::multi("Conversion: PDF → JPG", "jpg", files))
    }
}

/// Ordinal page name zero-padded to the page count's width, so lexical
/// order matches page order for any document length.
fn page_name(index: usize, total: usize) -> String {
    let width = total.to_string().len().max(3);
    format!("page-{:0width$}.jpg", index + 1)
}

/// List the raster pages `pdftoppm` wrote, ordered by page number rather
/// than by name (the tool pads page numbers only when it has to).
async fn collect_pages(dir: &Path) -> AppResult<Vec<PathBuf>> {
    let mut pages: Vec<(u32, PathBuf)> = Vec::new();
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .map_err(|e| AppError::storage(format!("Failed to list page dir: {e}")))?;
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| AppError::storage(format!("Failed to list page dir: {e}")))?
    {
        let path = entry.path();
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let Some(number) = stem
            .rsplit('-')
            .next()
            .and_then(|n| n.parse::<u32>().ok())
        else {
            continue;
        };
        pages.push((number, path));
    }
    pages.sort_by_key(|(number, _)| *number);
    Ok(pages.into_iter().map(|(_, path)| path).collect())
}

/// PDF → TXT: in-process extraction first, `pdftotext` as fallback for
/// documents the parser cannot read or that yield no text.
#[derive(Debug)]
pub struct PdfToTxtConverter {
    scratch: Arc<ScratchArea>,
    runner: ToolRunner,
    command: String,
}

impl PdfToTxtConverter {
    pub fn new(scratch: Arc<ScratchArea>, config: &ConversionConfig) -> Self {
        Self {
            scratch,
            runner: ToolRunner::new(config.tool_timeout_seconds),
            command: config.pdftotext_command.clone(),
        }
    }

    async fn extract_in_process(path: PathBuf) -> AppResult<String> {
        tokio::task::spawn_blocking(move || -> AppResult<String> {
            let doc = lopdf::Document::load(&path)
                .map_err(|e| AppError::conversion(format!("Failed to parse PDF: {e}")))?;
            let page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();
            doc.extract_text(&page_numbers)
                .map_err(|e| AppError::conversion(format!("Failed to extract text: {e}")))
        })
        .await
        .map_err(|e| AppError::internal(format!("Conversion task failed: {e}")))?
    }
}

#[async_trait]
impl Converter for PdfToTxtConverter {
    fn name(&self) -> &'static str {
        "pdf_to_txt"
    }

    async fn convert(&self, file: &UploadedFile) -> AppResult<ConversionResult> {
        let output_name = format!("{}.txt", file.base_name());
        let output = self.scratch.output_dir().join(&output_name);

        match Self::extract_in_process(file.path.clone()).await {
            Ok(text) if !text.trim().is_empty() => {
                tokio::fs::write(&output, text)
                    .await
                    .map_err(|e| AppError::storage(format!("Failed to write text output: {e}")))?;
            }
            primary => {
                if let Err(e) = &primary {
                    tracing::warn!(error = %e, "In-process extraction failed, falling back");
                } else {
                    tracing::warn!("In-process extraction yielded no text, falling back");
                }
                let args = vec![
                    file.path.to_string_lossy().into_owned(),
                    output.to_string_lossy().into_owned(),
                ];
                self.runner.run(&self.command, &args).await?;
                if !output.exists() {
                    return Err(AppError::conversion("Converter produced no text output."));
                }
            }
        }

        Ok(ConversionResult::single(
            "Conversion: PDF → TXT",
            "txt",
            self.scratch.url_prefix(),
            output_name,
        ))
    }
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

    fn missing_tools() -> ConversionConfig {
        ConversionConfig {
            soffice_command: "fileforge-no-such-tool".to_string(),
            pdftoppm_command: "fileforge-no-such-tool".to_string(),
            pdftotext_command: "fileforge-no-such-tool".to_string(),
            tool_timeout_seconds: 5,
            raster_dpi: 150,
        }
    }

    #[tokio::test]
    async fn test_pdf_to_txt_extracts_in_process() {
        let dir = tempfile::tempdir().unwrap();
        let scratch = scratch(&dir);
        scratch.ensure().await.unwrap();

        let pdf = crate::compose::text_to_pdf("extractable body text");
        let file = scratch.store_upload("doc.pdf", None, &pdf).await.unwrap();

        // Tools are unavailable, so success proves the in-process path ran.
        let result = PdfToTxtConverter::new(scratch.clone(), &missing_tools())
            .convert(&file)
            .await
            .unwrap();

        assert!(result.success);
        let text = tokio::fs::read_to_string(scratch.output_dir().join(&result.files[0].name))
            .await
            .unwrap();
        assert!(text.contains("extractable"));
    }

    #[tokio::test]
    async fn test_pdf_to_txt_fallback_failure_surfaces_tool_error() {
        let dir = tempfile::tempdir().unwrap();
        let scratch = scratch(&dir);
        scratch.ensure().await.unwrap();
        let file = scratch
            .store_upload("broken.pdf", None, b"%PDF-1.4 truncated garbage")
            .await
            .unwrap();

        let err = PdfToTxtConverter::new(scratch, &missing_tools())
            .convert(&file)
            .await
            .unwrap_err();
        assert!(err.message.contains("Failed to launch"));
    }

    #[tokio::test]
    async fn test_pdf_to_jpg_missing_tool_is_a_conversion_error() {
        let dir = tempfile::tempdir().unwrap();
        let scratch = scratch(&dir);
        scratch.ensure().await.unwrap();
        let file = scratch.store_upload("doc.pdf", None, b"%PDF-1.4").await.unwrap();

        let err = PdfToJpgConverter::new(scratch, &missing_tools())
            .convert(&file)
            .await
            .unwrap_err();
        assert!(err.message.contains("Failed to launch"));
    }

    #[test]
    fn test_page_names_stay_lexically_ordered_for_any_length() {
        assert_eq!(page_name(0, 3), "page-001.jpg");
        assert_eq!(page_name(0, 1200), "page-0001.jpg");

        let names: Vec<String> = (0..1200).map(|i| page_name(i, 1200)).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }

    #[tokio::test]
    async fn test_collect_pages_orders_numerically() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["page-10.jpg", "page-2.jpg", "page-1.jpg"] {
            tokio::fs::write(dir.path().join(name), b"jpg").await.unwrap();
        }

        let pages = collect_pages(dir.path()).await.unwrap();
        let names: Vec<_> = pages
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["page-1.jpg", "page-2.jpg", "page-10.jpg"]);
    }
}
