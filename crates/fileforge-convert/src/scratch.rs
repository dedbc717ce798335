//! Scratch-area lifecycle: upload persistence, output root, and
//! deferred best-effort cleanup.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::fs;
use uuid::Uuid;

use fileforge_core::config::scratch::ScratchConfig;
use fileforge_core::error::AppError;
use fileforge_core::result::AppResult;
use fileforge_core::types::UploadedFile;

/// Owner of the transient upload and output directories.
///
/// Both roots are process-wide mutable filesystem state; all path joins go
/// through this type instead of being scattered across call sites. `reset`
/// wipes crash leftovers at startup and clears everything again during
/// graceful shutdown.
#[derive(Debug, Clone)]
pub struct ScratchArea {
    upload_dir: PathBuf,
    output_dir: PathBuf,
    url_prefix: String,
    unlink_delay: Duration,
}

impl ScratchArea {
    /// Create a scratch area from configuration. Directories are not
    /// touched until [`reset`](Self::reset) or
    /// [`ensure`](Self::ensure) runs.
    pub fn new(config: &ScratchConfig) -> Self {
        Self {
            upload_dir: PathBuf::from(&config.upload_dir),
            output_dir: PathBuf::from(&config.output_dir),
            url_prefix: config.output_url_prefix.trim_end_matches('/').to_string(),
            unlink_delay: Duration::from_millis(config.unlink_delay_ms),
        }
    }

    /// Root directory for conversion output artifacts.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Root directory for uploaded scratch files.
    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    /// Public URL prefix under which the output root is served.
    pub fn url_prefix(&self) -> &str {
        &self.url_prefix
    }

    /// Create both roots if they do not exist yet.
    pub async fn ensure(&self) -> AppResult<()> {
        for dir in [&self.upload_dir, &self.output_dir] {
            fs::create_dir_all(dir).await.map_err(|e| {
                AppError::storage(format!(
                    "Failed to create scratch dir '{}': {e}",
                    dir.display()
                ))
            })?;
        }
        Ok(())
    }

    /// Recursively wipe and recreate both roots.
    ///
    /// Idempotent: calling it twice leaves both roots present and empty.
    /// No conversion may be in flight — callers stop accepting requests
    /// before the shutdown wipe.
    pub async fn reset(&self) -> AppResult<()> {
        for dir in [&self.upload_dir, &self.output_dir] {
            match fs::remove_dir_all(dir).await {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    return Err(AppError::storage(format!(
                        "Failed to clear scratch dir '{}': {e}",
                        dir.display()
                    )));
                }
            }
        }
        self.ensure().await
    }

    /// Persist an uploaded payload into the upload root.
    ///
    /// The scratch file is named by a fresh UUID plus the original
    /// extension, so output naming never depends on the client-supplied
    /// filename.
    pub async fn store_upload(
        &self,
        original_name: &str,
        declared_mime: Option<&str>,
        data: &[u8],
    ) -> AppResult<UploadedFile> {
        let ext = original_name
            .rsplit('.')
            .next()
            .filter(|e| *e != original_name)
            .map(str::to_ascii_lowercase)
            .unwrap_or_else(|| "bin".to_string());

        let stored = format!("{}.{ext}", Uuid::new_v4().simple());
        let path = self.upload_dir.join(stored);

        fs::write(&path, data)
            .await
            .map_err(|e| AppError::storage(format!("Failed to persist upload: {e}")))?;

        Ok(UploadedFile {
            original_name: original_name.to_string(),
            path,
            size_bytes: data.len() as u64,
            declared_mime: declared_mime.map(str::to_string),
        })
    }

    /// Schedule deferred, best-effort deletion of a scratch file.
    ///
    /// Fire-and-forget: waits a short grace delay so an in-flight response
    /// stream can finish reading, then unlinks. Failures are swallowed.
    pub fn schedule_unlink(&self, path: PathBuf) {
        let delay = self.unlink_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Err(e) = fs::remove_file(&path).await {
                tracing::debug!(path = %path.display(), error = %e, "Deferred unlink failed");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area(dir: &tempfile::TempDir) -> ScratchArea {
        ScratchArea::new(&ScratchConfig {
            upload_dir: dir.path().join("uploads").to_string_lossy().into_owned(),
            output_dir: dir.path().join("output").to_string_lossy().into_owned(),
            output_url_prefix: "/output".to_string(),
            max_upload_mb: 10,
            unlink_delay_ms: 10,
        })
    }

    #[tokio::test]
    async fn test_reset_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let scratch = area(&dir);

        scratch.reset().await.unwrap();
        tokio::fs::write(scratch.output_dir().join("stale.jpg"), b"x")
            .await
            .unwrap();

        scratch.reset().await.unwrap();
        scratch.reset().await.unwrap();

        assert!(scratch.upload_dir().is_dir());
        assert!(scratch.output_dir().is_dir());
        let mut entries = tokio::fs::read_dir(scratch.output_dir()).await.unwrap();
        assert!(entries.next_entry().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_store_upload_names_by_uuid_not_client_name() {
        let dir = tempfile::tempdir().unwrap();
        let scratch = area(&dir);
        scratch.ensure().await.unwrap();

        let file = scratch
            .store_upload("../../etc/passwd.txt", None, b"data")
            .await
            .unwrap();

        assert!(file.path.starts_with(scratch.upload_dir()));
        assert!(!file.base_name().contains("passwd"));
        assert_eq!(file.size_bytes, 4);
        assert!(file.path.exists());
    }

    #[tokio::test]
    async fn test_store_upload_records_declared_mime() {
        let dir = tempfile::tempdir().unwrap();
        let scratch = area(&dir);
        scratch.ensure().await.unwrap();

        let file = scratch
            .store_upload("report.pdf", Some("application/pdf"), b"%PDF")
            .await
            .unwrap();
        assert_eq!(file.declared_mime.as_deref(), Some("application/pdf"));

        let file = scratch.store_upload("notes.txt", None, b"text").await.unwrap();
        assert_eq!(file.declared_mime, None);
    }

    #[tokio::test]
    async fn test_schedule_unlink_deletes_after_delay() {
        let dir = tempfile::tempdir().unwrap();
        let scratch = area(&dir);
        scratch.ensure().await.unwrap();

        let file = scratch.store_upload("a.txt", None, b"data").await.unwrap();
        scratch.schedule_unlink(file.path.clone());

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(!file.path.exists());
    }

    #[tokio::test]
    async fn test_schedule_unlink_swallows_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let scratch = area(&dir);
        scratch.schedule_unlink(dir.path().join("never-existed.txt"));
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
}
