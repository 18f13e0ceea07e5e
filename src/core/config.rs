//! Persistent user configuration.
//!
//! Stored as `config.json` in the directory returned by
//! [`get_config_directory`](crate::core::dirs::get_config_directory). A missing file
//! yields the defaults; a malformed one is an error.

use crate::core::dirs::get_config_directory;
use crate::core::error::{Result, TreeCompareError};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

pub const DEFAULT_DEBOUNCE_MS: u64 = 2000;

/// Which folder the tree below the base node starts at
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TreeRootSetting {
    /// The repository root
    Repository,
    /// The directory the tool was started from
    #[default]
    Workspace,
}

impl fmt::Display for TreeRootSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeRootSetting::Repository => write!(f, "repository"),
            TreeRootSetting::Workspace => write!(f, "workspace"),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct TreeCompareConfig {
    pub root: TreeRootSetting,
    /// Refresh index stat data before diffing so touched-only files are not reported
    pub refresh_index: bool,
    /// Quiet window for coalescing change notifications
    pub debounce_ms: u64,
}

impl Default for TreeCompareConfig {
    fn default() -> Self {
        Self {
            root: TreeRootSetting::default(),
            refresh_index: true,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
        }
    }
}

impl TreeCompareConfig {
    pub fn config_file() -> Result<PathBuf> {
        Ok(get_config_directory()?.join("config.json"))
    }

    pub fn load_or_default() -> Result<Self> {
        Self::load_from(&Self::config_file()?)
    }

    pub fn load_from(config_file: &Path) -> Result<Self> {
        if !config_file.exists() {
            log::debug!("No config at {}, using defaults", config_file.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(config_file)?;
        serde_json::from_str(&content)
            .map_err(|e| TreeCompareError::config_parse_failed(config_file, e))
    }

    pub fn save(&self) -> Result<PathBuf> {
        let config_file = Self::config_file()?;
        self.save_to(&config_file)?;
        Ok(config_file)
    }

    pub fn save_to(&self, config_file: &Path) -> Result<()> {
        if let Some(dir) = config_file.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(config_file, content)?;
        log::debug!("Saved config to {}", config_file.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = TreeCompareConfig::default();
        assert_eq!(config.root, TreeRootSetting::Workspace);
        assert!(config.refresh_index);
        assert_eq!(config.debounce_ms, 2000);
    }

    #[test]
    fn test_missing_file_gives_defaults() -> Result<()> {
        let dir = TempDir::new()?;
        let config = TreeCompareConfig::load_from(&dir.path().join("config.json"))?;
        assert_eq!(config, TreeCompareConfig::default());
        Ok(())
    }

    #[test]
    fn test_save_and_load() -> Result<()> {
        let dir = TempDir::new()?;
        let file = dir.path().join("nested").join("config.json");
        let config = TreeCompareConfig {
            root: TreeRootSetting::Repository,
            refresh_index: false,
            debounce_ms: 500,
        };
        config.save_to(&file)?;
        assert_eq!(TreeCompareConfig::load_from(&file)?, config);
        Ok(())
    }

    #[test]
    fn test_partial_file_fills_defaults() -> Result<()> {
        let dir = TempDir::new()?;
        let file = dir.path().join("config.json");
        std::fs::write(&file, r#"{ "root": "repository" }"#)?;
        let config = TreeCompareConfig::load_from(&file)?;
        assert_eq!(config.root, TreeRootSetting::Repository);
        assert_eq!(config.debounce_ms, DEFAULT_DEBOUNCE_MS);
        Ok(())
    }

    #[test]
    fn test_malformed_file_is_error() -> Result<()> {
        let dir = TempDir::new()?;
        let file = dir.path().join("config.json");
        std::fs::write(&file, "{ not json")?;
        let err = TreeCompareConfig::load_from(&file).unwrap_err();
        assert!(matches!(err, TreeCompareError::ConfigParseFailed { .. }));
        Ok(())
    }
}
