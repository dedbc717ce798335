//! Upload validation: size, extension allow-list, double-extension
//! rejection, and content sniffing.
//!
//! Read-only inspection — the caller is responsible for deleting the
//! scratch file when validation fails.

use std::path::Path;

use tokio::fs;

use fileforge_core::error::AppError;
use fileforge_core::result::AppResult;

use crate::sniff;

/// Extensions the service accepts, lowercase and without the dot.
pub const ALLOWED_EXTENSIONS: &[&str] = &["pdf", "txt", "jpg", "png", "docx"];

/// Media types a sniffed upload may resolve to.
pub const ALLOWED_MIME_TYPES: &[&str] = &[
    "application/pdf",
    "text/plain",
    "image/jpeg",
    "image/png",
    sniff::DOCX,
];

/// Validate an uploaded scratch file before any conversion runs.
///
/// Checks run in order and short-circuit on the first failure:
/// size cap, extension allow-list, double-extension spoofing, and
/// magic-byte content sniffing. Plain text is exempt from strict sniffing
/// since it carries no reliable signature.
pub async fn validate_upload(
    path: &Path,
    original_name: &str,
    allowed_extensions: &[&str],
    allowed_mime_types: &[&str],
    max_size_mb: u64,
) -> AppResult<()> {
    let meta = fs::metadata(path)
        .await
        .map_err(|e| AppError::storage(format!("Failed to stat upload: {e}")))?;

    let size_mb = meta.len() as f64 / (1024.0 * 1024.0);
    if size_mb > max_size_mb as f64 {
        return Err(AppError::validation(format!(
            "File is too large. Max size: {max_size_mb} MB"
        )));
    }

    let ext = extension_of(original_name);
    let Some(ext) = ext.filter(|e| allowed_extensions.contains(&e.as_str())) else {
        return Err(AppError::validation(format!(
            "Invalid file extension. Allowed: {}",
            allowed_extensions.join(", ")
        )));
    };

    // `evil.exe.pdf` carries two suffix segments; one dot is the limit.
    if original_name.split('.').count() > 2 {
        return Err(AppError::validation(
            "Suspicious file name. Multiple extensions are not allowed.",
        ));
    }

    let data = fs::read(path)
        .await
        .map_err(|e| AppError::storage(format!("Failed to read upload: {e}")))?;
    let detected = sniff::detect(&data);

    if ext == "txt" {
        // Plain text has no magic signature. Accept no detection, a generic
        // binary-stream classification, or any text-family type.
        return match detected {
            None => Ok(()),
            Some(mime) if mime == "application/octet-stream" || mime.starts_with("text/") => Ok(()),
            Some(mime) => Err(AppError::validation(format!(
                "Invalid MIME type for TXT. Detected: {mime}"
            ))),
        };
    }

    match detected {
        Some(mime) if allowed_mime_types.contains(&mime) => Ok(()),
        Some(mime) => Err(AppError::validation(format!(
            "Invalid MIME type. Detected: {mime}"
        ))),
        None => Err(AppError::validation("Invalid MIME type. Detected: unknown")),
    }
}

/// Lowercased extension of a filename, without the dot.
fn extension_of(name: &str) -> Option<String> {
    let ext = name.rsplit('.').next()?;
    if ext == name {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}
