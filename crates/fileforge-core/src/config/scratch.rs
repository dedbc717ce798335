//! Scratch-area (upload/output) configuration.

use serde::{Deserialize, Serialize};

/// Transient storage configuration for uploads and conversion output.
///
/// Both directories are wiped and recreated at process start and during
/// graceful shutdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScratchConfig {
    /// Directory receiving uploaded scratch files.
    #[serde(default = "default_upload_dir")]
    pub upload_dir: String,
    /// Directory receiving conversion output artifacts.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    /// Public URL prefix under which the output directory is served.
    #[serde(default = "default_output_url_prefix")]
    pub output_url_prefix: String,
    /// Maximum accepted upload size in megabytes.
    #[serde(default = "default_max_upload_mb")]
    pub max_upload_mb: u64,
    /// Grace delay before a scratch input file is unlinked, in milliseconds.
    /// Guards against deleting a file a response stream is still reading.
    #[serde(default = "default_unlink_delay_ms")]
    pub unlink_delay_ms: u64,
}

impl Default for ScratchConfig {
    fn default() -> Self {
        Self {
            upload_dir: default_upload_dir(),
            output_dir: default_output_dir(),
            output_url_prefix: default_output_url_prefix(),
            max_upload_mb: default_max_upload_mb(),
            unlink_delay_ms: default_unlink_delay_ms(),
        }
    }
}

fn default_upload_dir() -> String {
    "./data/uploads".to_string()
}

fn default_output_dir() -> String {
    "./data/output".to_string()
}

fn default_output_url_prefix() -> String {
    "/output".to_string()
}

fn default_max_upload_mb() -> u64 {
    10
}

fn default_unlink_delay_ms() -> u64 {
    300
}
