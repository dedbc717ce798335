//! External converter process invocation.
//!
//! Runs conversion tools as child processes with captured output and a
//! configurable timeout. Any spawn failure, timeout, or non-zero exit is
//! surfaced as a conversion error with a descriptive message.

use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;

use fileforge_core::error::AppError;
use fileforge_core::result::AppResult;

/// Captured output of a successful tool invocation.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    /// Standard output of the process.
    pub stdout: String,
    /// Standard error of the process.
    pub stderr: String,
}

/// Runner for external conversion commands.
#[derive(Debug, Clone)]
pub struct ToolRunner {
    timeout: Duration,
}

impl ToolRunner {
    /// Create a runner with a per-invocation timeout.
    pub fn new(timeout_seconds: u64) -> Self {
        Self {
            timeout: Duration::from_secs(timeout_seconds),
        }
    }

    /// Execute `command` with `args`, waiting for completion.
    pub async fn run(&self, command: &str, args: &[String]) -> AppResult<ToolOutput> {
        tracing::info!(command, ?args, "Executing external converter");

        let mut cmd = Command::new(command);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let result = tokio::time::timeout(self.timeout, cmd.output()).await;

        let output = match result {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                tracing::error!(command, error = %e, "Failed to launch external converter");
                return Err(AppError::conversion(format!(
                    "Failed to launch converter '{command}': {e}"
                )));
            }
            Err(_) => {
                tracing::error!(command, timeout_s = self.timeout.as_secs(), "Converter timed out");
                return Err(AppError::conversion(format!(
                    "Converter '{command}' timed out after {}s",
                    self.timeout.as_secs()
                )));
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            tracing::error!(
                command,
                code,
                stderr = %stderr.chars().take(500).collect::<String>(),
                "Converter exited with failure"
            );
            return Err(AppError::conversion(format!(
                "Converter '{command}' exited with code {code}: {}",
                stderr.chars().take(500).collect::<String>()
            )));
        }

        Ok(ToolOutput { stdout, stderr })
    }
}
