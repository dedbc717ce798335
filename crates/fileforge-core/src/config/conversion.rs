//! External conversion tool configuration.

use serde::{Deserialize, Serialize};

/// Settings for executors that shell out to external converters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionConfig {
    /// LibreOffice binary used for DOCX rendering.
    #[serde(default = "default_soffice")]
    pub soffice_command: String,
    /// Poppler rasterizer used for PDF page rendering.
    #[serde(default = "default_pdftoppm")]
    pub pdftoppm_command: String,
    /// Poppler text extractor used as the PDF text fallback.
    #[serde(default = "default_pdftotext")]
    pub pdftotext_command: String,
    /// Timeout for a single external tool invocation, in seconds.
    #[serde(default = "default_tool_timeout")]
    pub tool_timeout_seconds: u64,
    /// Raster resolution for PDF page rendering, in DPI.
    #[serde(default = "default_raster_dpi")]
    pub raster_dpi: u32,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            soffice_command: default_soffice(),
            pdftoppm_command: default_pdftoppm(),
            pdftotext_command: default_pdftotext(),
            tool_timeout_seconds: default_tool_timeout(),
            raster_dpi: default_raster_dpi(),
        }
    }
}

fn default_soffice() -> String {
    "soffice".to_string()
}

fn default_pdftoppm() -> String {
    "pdftoppm".to_string()
}

fn default_pdftotext() -> String {
    "pdftotext".to_string()
}

fn default_tool_timeout() -> u64 {
    120
}

fn default_raster_dpi() -> u32 {
    150
}
