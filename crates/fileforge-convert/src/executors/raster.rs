//! Raster image format conversions (JPG↔PNG) via the `image` crate.

use std::sync::Arc;

use async_trait::async_trait;
use image::{DynamicImage, ImageFormat};

use fileforge_core::error::AppError;
use fileforge_core::result::AppResult;
use fileforge_core::traits::Converter;
use fileforge_core::types::{ConversionResult, UploadedFile};

use crate::scratch::ScratchArea;

/// In-process raster recode between JPEG and PNG.
#[derive(Debug)]
pub struct RasterConverter {
    name: &'static str,
    title: &'static str,
    target_ext: &'static str,
    format: ImageFormat,
    scratch: Arc<ScratchArea>,
}

impl RasterConverter {
    /// JPG → PNG.
    pub fn jpg_to_png(scratch: Arc<ScratchArea>) -> Self {
        Self {
            name: "jpg_to_png",
            title: "Conversion: JPG → PNG",
            target_ext: "png",
            format: ImageFormat::Png,
            scratch,
        }
    }

    /// PNG → JPG.
    pub fn png_to_jpg(scratch: Arc<ScratchArea>) -> Self {
        Self {
            name: "png_to_jpg",
            title: "Conversion: PNG → JPG",
            target_ext: "jpg",
            format: ImageFormat::Jpeg,
            scratch,
        }
    }
}

#[async_trait]
impl Converter for RasterConverter {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn convert(&self, file: &UploadedFile) -> AppResult<ConversionResult> {
        let output_name = format!("{}.{}", file.base_name(), self.target_ext);
        let input = file.path.clone();
        let output = self.scratch.output_dir().join(&output_name);
        let format = self.format;

        // Decoding and re-encoding are CPU-bound; keep them off the
        // request tasks.
        tokio::task::spawn_blocking(move || -> AppResult<()> {
            let img = image::open(&input)
                .map_err(|e| AppError::conversion(format!("Failed to decode image: {e}")))?;
            // JPEG has no alpha channel; flatten before encoding.
            let img = if format == ImageFormat::Jpeg {
                DynamicImage::ImageRgb8(img.to_rgb8())
            } else {
                img
            };
            img.save_with_format(&output, format)
                .map_err(|e| AppError::conversion(format!("Failed to encode image: {e}")))?;
            Ok(())
        })
        .await
        .map_err(|e| AppError::internal(format!("Conversion task failed: {e}")))??;

        Ok(ConversionResult::single(
            self.title,
            self.target_ext,
            self.scratch.url_prefix(),
            output_name,
        ))
    }
}
