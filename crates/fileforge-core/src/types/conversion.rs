//! Conversion domain types: the uploaded scratch file, output artifacts,
//! and the canonical response shape.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// An uploaded file persisted to the scratch upload area.
///
/// Ephemeral: owned exclusively by the current request and unlinked
/// (after a short grace delay) once the request completes, whether the
/// conversion succeeded or not.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// The filename the client supplied. Untrusted; used only for
    /// extension derivation and error messages, never for output naming.
    pub original_name: String,
    /// Absolute path of the scratch copy.
    pub path: PathBuf,
    /// Size of the scratch copy in bytes.
    pub size_bytes: u64,
    /// Media type declared by the upload transport, if any.
    pub declared_mime: Option<String>,
}

impl UploadedFile {
    /// Lowercased extension of the client-supplied filename, without the dot.
    pub fn source_extension(&self) -> Option<String> {
        let name = self.original_name.rsplit('.').next()?;
        if name == self.original_name {
            return None;
        }
        Some(name.to_ascii_lowercase())
    }

    /// Base identifier for output naming: the stem of the scratch file
    /// (server-generated), not the attacker-controlled original name.
    pub fn base_name(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// One output file produced by a conversion, exposed by URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputArtifact {
    /// Public URL path, relative to the server origin.
    pub url: String,
    /// Display name of the artifact.
    pub name: String,
}

/// The canonical conversion response shape the frontend depends on.
///
/// Invariant: when `success` is true the artifact list is non-empty and
/// `error` is absent; when false, only `error` is populated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionResult {
    /// Whether the conversion succeeded.
    pub success: bool,
    /// Human-readable conversion title, e.g. `"Conversion: PDF → JPG"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Result media family, e.g. `"jpg"`.
    #[serde(rename = "fileType", skip_serializing_if = "Option::is_none")]
    pub file_type: Option<String>,
    /// Ordered output artifacts. Empty on failure.
    #[serde(default)]
    pub files: Vec<OutputArtifact>,
    /// Error message, present only on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ConversionResult {
    /// Successful result with a single artifact synthesized from `name`
    /// under the public output URL prefix.
    pub fn single(
        title: impl Into<String>,
        file_type: impl Into<String>,
        url_prefix: &str,
        name: impl Into<String>,
    ) -> Self {
        let name = name.into();
        Self {
            success: true,
            title: Some(title.into()),
            file_type: Some(file_type.into()),
            files: vec![OutputArtifact {
                url: format!("{}/{}", url_prefix.trim_end_matches('/'), name),
                name,
            }],
            error: None,
        }
    }

    /// Successful result using the supplied artifact list verbatim.
    pub fn multi(
        title: impl Into<String>,
        file_type: impl Into<String>,
        files: Vec<OutputArtifact>,
    ) -> Self {
        Self {
            success: true,
            title: Some(title.into()),
            file_type: Some(file_type.into()),
            files,
            error: None,
        }
    }

    /// Failed result carrying only the error message.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            title: None,
            file_type: None,
            files: Vec::new(),
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_extension_lowercases() {
        let file = UploadedFile {
            original_name: "Report.PDF".to_string(),
            path: PathBuf::from("/tmp/abc123.pdf"),
            size_bytes: 10,
            declared_mime: None,
        };
        assert_eq!(file.source_extension().as_deref(), Some("pdf"));
        assert_eq!(file.base_name(), "abc123");
    }

    #[test]
    fn test_source_extension_absent_without_dot() {
        let file = UploadedFile {
            original_name: "README".to_string(),
            path: PathBuf::from("/tmp/abc"),
            size_bytes: 1,
            declared_mime: None,
        };
        assert_eq!(file.source_extension(), None);
    }

    #[test]
    fn test_single_synthesizes_artifact_url() {
        let result = ConversionResult::single("Conversion: TXT → PDF", "pdf", "/output", "a.pdf");
        assert!(result.success);
        assert_eq!(result.files.len(), 1);
        assert_eq!(result.files[0].url, "/output/a.pdf");
        assert_eq!(result.files[0].name, "a.pdf");
    }

    #[test]
    fn test_failure_carries_only_error() {
        let result = ConversionResult::failure("boom");
        assert!(!result.success);
        assert!(result.files.is_empty());
        assert_eq!(result.error.as_deref(), Some("boom"));
        assert!(result.title.is_none());
    }

    #[test]
    fn test_serialized_shape_uses_file_type_camel_case() {
        let result = ConversionResult::single("t", "png", "/output", "x.png");
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["fileType"], "png");
        assert!(json.get("error").is_none());
    }
}
