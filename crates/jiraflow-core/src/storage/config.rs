//! Team configuration storage operations

use crate::{models::TeamConfig, Result};
use std::path::PathBuf;

pub struct TeamConfigStorage {
    path: PathBuf,
}

impl TeamConfigStorage {
    /// Storage backed by an explicit config file path
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Storage backed by the default location under the config dir
    pub fn default_location() -> Result<Self> {
        let config_dir = super::init_config_dir()?;
        Ok(Self {
            path: config_dir.join("team.yaml"),
        })
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    pub fn load(&self) -> Result<TeamConfig> {
        if !self.path.exists() {
            return Ok(TeamConfig::default());
        }

        let content = std::fs::read_to_string(&self.path)?;

        // Handle empty file case
        if content.trim().is_empty() {
            return Ok(TeamConfig::default());
        }

        let config: TeamConfig = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, config: &TeamConfig) -> Result<()> {
        config.validate()?;

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_yaml::to_string(config)?;
        std::fs::write(&self.path, content)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_returns_default() {
        let temp_dir = TempDir::new().unwrap();
        let storage = TeamConfigStorage::new(temp_dir.path().join("team.yaml"));
        let config = storage.load().unwrap();
        assert_eq!(config.team, "default");
    }

    #[test]
    fn test_load_empty_returns_default() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("team.yaml");
        std::fs::write(&path, "  \n").unwrap();

        let storage = TeamConfigStorage::new(path);
        let config = storage.load().unwrap();
        assert_eq!(config.team, "default");
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let storage = TeamConfigStorage::new(temp_dir.path().join("team.yaml"));

        let mut config = TeamConfig::default();
        config.team = "clc".to_string();
        config.jira_base_url = Some("https://issues.example.com".to_string());
        storage.save(&config).unwrap();

        let loaded = storage.load().unwrap();
        assert_eq!(loaded.team, "clc");
        assert_eq!(
            loaded.jira_base_url.as_deref(),
            Some("https://issues.example.com")
        );
    }

    #[test]
    fn test_invalid_config_rejected_on_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("team.yaml");
        std::fs::write(
            &path,
            "team: clc\njira_base_url: not-a-url\nassistant:\n  command: claude\n  args: []\n  timeout_seconds: 300\n",
        )
        .unwrap();

        let storage = TeamConfigStorage::new(path);
        assert!(storage.load().is_err());
    }
}
