use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

const LOCAL_CONFIG_FILE_NAME: &str = ".bugreport.json";

/// Per-directory preferences, currently the default repository for reports
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct LocalConfig {
    /// Repository id as returned by GitHub
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_repository_id: Option<u64>,
    /// `owner/name`, for display
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_repository_name: Option<String>,
}

impl LocalConfig {
    /// Load local config from the current directory
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read local config: {}", path.display()))?;

        serde_json::from_str(&content).context("Failed to parse local config")
    }

    /// Save local config to the current directory
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        let content = serde_json::to_string_pretty(self)?;
        fs::write(&path, content)
            .with_context(|| format!("Failed to write local config: {}", path.display()))?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(std::env::current_dir()?.join(LOCAL_CONFIG_FILE_NAME))
    }

    pub fn set_default_repository(&mut self, id: u64, name: String) {
        self.default_repository_id = Some(id);
        self.default_repository_name = Some(name);
    }

    pub fn is_empty(&self) -> bool {
        self.default_repository_id.is_none()
    }

    /// Delete the config file
    pub fn delete() -> Result<()> {
        let path = Self::config_path()?;
        if path.exists() {
            fs::remove_file(&path)
                .with_context(|| format!("Failed to delete local config: {}", path.display()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_only_set_fields() {
        let empty = LocalConfig::default();
        assert!(empty.is_empty());
        assert_eq!(serde_json::to_string(&empty).unwrap(), "{}");

        let mut config = LocalConfig::default();
        config.set_default_repository(42, "acme/widgets".to_string());
        let json = serde_json::to_string(&config).unwrap();
        let back: LocalConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(back.default_repository_id, Some(42));
        assert_eq!(back.default_repository_name.as_deref(), Some("acme/widgets"));
    }
}
