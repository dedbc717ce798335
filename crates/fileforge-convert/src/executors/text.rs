//! In-process PDF composition executors: plain text and JPEG into PDF.

use std::sync::Arc;

use async_trait::async_trait;

use fileforge_core::error::AppError;
use fileforge_core::result::AppResult;
use fileforge_core::traits::Converter;
use fileforge_core::types::{ConversionResult, UploadedFile};

use crate::compose;
use crate::scratch::ScratchArea;

/// TXT → PDF via in-process composition.
#[derive(Debug)]
pub struct TxtToPdfConverter {
    scratch: Arc<ScratchArea>,
}

impl TxtToPdfConverter {
    pub fn new(scratch: Arc<ScratchArea>) -> Self {
        Self { scratch }
    }
}

#[async_trait]
impl Converter for TxtToPdfConverter {
    fn name(&self) -> &'static str {
        "txt_to_pdf"
    }

    async fn convert(&self, file: &UploadedFile) -> AppResult<ConversionResult> {
        let data = tokio::fs::read(&file.path)
            .await
            .map_err(|e| AppError::storage(format!("Failed to read uploaded text: {e}")))?;
        // Uploaded text is not guaranteed to be UTF-8.
        let text = String::from_utf8_lossy(&data).into_owned();

        let pdf = tokio::task::spawn_blocking(move || compose::text_to_pdf(&text))
            .await
            .map_err(|e| AppError::internal(format!("Conversion task failed: {e}")))?;

        let output_name = format!("{}.pdf", file.base_name());
        tokio::fs::write(self.scratch.output_dir().join(&output_name), pdf)
            .await
            .map_err(|e| AppError::storage(format!("Failed to write PDF output: {e}")))?;

        Ok(ConversionResult::single(
            "Conversion: TXT → PDF",
            "pdf",
            self.scratch.url_prefix(),
            output_name,
        ))
    }
}

/// JPG → PDF: a single page sized to the image.
#[derive(Debug)]
pub struct JpgToPdfConverter {
    scratch: Arc<ScratchArea>,
}

impl JpgToPdfConverter {
    pub fn new(scratch: Arc<ScratchArea>) -> Self {
        Self { scratch }
    }
}

#[async_trait]
impl Converter for JpgToPdfConverter {
    fn name(&self) -> &'static str {
        "jpg_to_pdf"
    }

    async fn convert(&self, file: &UploadedFile) -> AppResult<ConversionResult> {
        let input = file.path.clone();
        let pdf = tokio::task::spawn_blocking(move || -> AppResult<Vec<u8>> {
            let img = image::open(&input)
                .map_err(|e| AppError::conversion(format!("Failed to decode image: {e}")))?;
            compose::image_to_pdf(&img)
        })
        .await
        .map_err(|e| AppError::internal(format!("Conversion task failed: {e}")))??;

        let output_name = format!("{}.pdf", file.base_name());
        tokio::fs::write(self.scratch.output_dir().join(&output_name), pdf)
            .await
            .map_err(|e| AppError::storage(format!("Failed to write PDF output: {e}")))?;

        Ok(ConversionResult::single(
            "Conversion: JPG → PDF",
            "pdf",
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

    #[tokio::test]
    async fn test_txt_to_pdf_writes_document() {
        let dir = tempfile::tempdir().unwrap();
        let scratch = scratch(&dir);
        scratch.ensure().await.unwrap();
        let file = scratch
            .store_upload("notes.txt", None, b"first line\nsecond line")
            .await
            .unwrap();

        let result = TxtToPdfConverter::new(scratch.clone())
            .convert(&file)
            .await
            .unwrap();

        assert!(result.success);
        assert_eq!(result.file_type.as_deref(), Some("pdf"));
        let written = tokio::fs::read(scratch.output_dir().join(&result.files[0].name))
            .await
            .unwrap();
        assert!(written.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn test_jpg_to_pdf_writes_document() {
        let dir = tempfile::tempdir().unwrap();
        let scratch = scratch(&dir);
        scratch.ensure().await.unwrap();

        let img = image::RgbImage::from_pixel(16, 16, image::Rgb([0, 0, 255]));
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Jpeg)
            .unwrap();
        let file = scratch.store_upload("pic.jpg", None, &bytes).await.unwrap();

        let result = JpgToPdfConverter::new(scratch.clone())
            .convert(&file)
            .await
            .unwrap();

        assert!(result.success);
        assert!(result.files[0].name.ends_with(".pdf"));
        let written = tokio::fs::read(scratch.output_dir().join(&result.files[0].name))
            .await
            .unwrap();
        assert!(written.starts_with(b"%PDF"));
    }
}
