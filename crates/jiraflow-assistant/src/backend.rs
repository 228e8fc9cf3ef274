//! Assistant backends

use crate::response::clean_response;
use crate::{Error, Result};
use async_trait::async_trait;
use jiraflow_core::models::AssistantConfig;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// A source of generated text. The production backend shells out to the
/// external assistant CLI; tests substitute canned responses.
#[async_trait]
pub trait AssistantBackend: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Whether the backend can be invoked at all
    async fn is_available(&self) -> bool {
        true
    }

    /// Short description for logs and dry-run output
    fn describe(&self) -> String;
}

/// Backend that invokes the assistant CLI (`claude --print <prompt>` by
/// default) and captures stdout.
pub struct CliBackend {
    command: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CliBackend {
    pub fn new(config: &AssistantConfig) -> Self {
        Self {
            command: config.command.clone(),
            args: config.args.clone(),
            timeout: Duration::from_secs(config.timeout_seconds),
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }
}

#[async_trait]
impl AssistantBackend for CliBackend {
    /// Whether the assistant command resolves on PATH
    async fn is_available(&self) -> bool {
        Command::new(&self.command)
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .is_ok()
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        let mut command = Command::new(&self.command);
        command
            .args(&self.args)
            .arg(prompt)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        tracing::debug!(command = %self.command, "invoking assistant");

        let output = tokio::time::timeout(self.timeout, command.output())
            .await
            .map_err(|_| Error::Timeout(self.timeout.as_secs()))?
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    Error::NotFound(self.command.clone())
                } else {
                    Error::Io(e)
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::CommandFailed {
                status: output.status.code().unwrap_or(-1),
                stderr: stderr.chars().take(500).collect(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let cleaned = clean_response(&stdout);
        if cleaned.trim().is_empty() {
            return Err(Error::EmptyResponse);
        }

        Ok(cleaned)
    }

    fn describe(&self) -> String {
        format!("{} {}", self.command, self.args.join(" "))
    }
}

/// Backend used under `--dry-run`: echoes what would be asked without
/// invoking anything.
pub struct DryRunBackend;

#[async_trait]
impl AssistantBackend for DryRunBackend {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let header: String = prompt.lines().take(3).collect::<Vec<_>>().join("\n");
        Ok(format!("# Dry Run\n\nPrompt preview:\n\n{}\n", header))
    }

    fn describe(&self) -> String {
        "dry-run (no assistant invoked)".to_string()
    }
}
