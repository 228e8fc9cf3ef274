//! Team configuration

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TeamConfig {
    pub team: String,
    pub jira_base_url: Option<String>,
    #[serde(default)]
    pub assistant: AssistantConfig,
    #[serde(default)]
    pub repositories: Vec<RepoTarget>,
    pub cluster_console_url: Option<String>,
    pub jenkins_base_url: Option<String>,
    /// Free-form keys carried through from team config files.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssistantConfig {
    pub command: String,
    pub args: Vec<String>,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RepoTarget {
    pub name: String,
    pub url: String,
    pub branch: Option<String>,
}

impl TeamConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.team.trim().is_empty() {
            return Err(Error::Validation("Team name cannot be empty".to_string()));
        }

        if let Some(ref url) = self.jira_base_url {
            validate_http_url("JIRA base URL", url)?;
        }

        if let Some(ref url) = self.cluster_console_url {
            validate_http_url("Cluster console URL", url)?;
        }

        if let Some(ref url) = self.jenkins_base_url {
            validate_http_url("Jenkins base URL", url)?;
        }

        self.assistant.validate()?;

        for repo in &self.repositories {
            repo.validate()?;
        }

        Ok(())
    }
}

impl Default for TeamConfig {
    fn default() -> Self {
        Self {
            team: "default".to_string(),
            jira_base_url: None,
            assistant: AssistantConfig::default(),
            repositories: Vec::new(),
            cluster_console_url: None,
            jenkins_base_url: None,
            extra: BTreeMap::new(),
        }
    }
}

impl AssistantConfig {
    /// Validate assistant configuration
    pub fn validate(&self) -> Result<()> {
        if self.command.trim().is_empty() {
            return Err(Error::Validation(
                "Assistant command cannot be empty".to_string(),
            ));
        }

        if self.timeout_seconds == 0 {
            return Err(Error::Validation(
                "Assistant timeout must be greater than 0".to_string(),
            ));
        }

        // One generation call should never block a run for more than an hour
        const MAX_TIMEOUT: u64 = 3600;
        if self.timeout_seconds > MAX_TIMEOUT {
            return Err(Error::Validation(format!(
                "Assistant timeout too long (max {} seconds)",
                MAX_TIMEOUT
            )));
        }

        Ok(())
    }
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            command: "claude".to_string(),
            args: vec!["--print".to_string()],
            timeout_seconds: 300,
        }
    }
}

impl RepoTarget {
    /// Validate a repository target
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Validation(
                "Repository name cannot be empty".to_string(),
            ));
        }

        if self.url.trim().is_empty() {
            return Err(Error::Validation(
                "Repository URL cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

fn validate_http_url(label: &str, url: &str) -> Result<()> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(Error::Validation(format!(
            "{} must start with http:// or https://",
            label
        )));
    }
    Ok(())
}
