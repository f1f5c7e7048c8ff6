//! Configuration handling for the pedigree manager
//!
//! Configuration is stored in `.pedigree/config.toml` (workspace) and
//! `~/.config/pedigree/config.toml` (global).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::DEFAULT_ROOT_NAME;

/// Storage key used when the config doesn't name one
pub const DEFAULT_STORAGE_KEY: &str = "horse_app_data_v1";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Workspace-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceConfig {
    /// Snapshot file name (without `.json`) inside `.pedigree/`
    pub storage_key: String,

    /// Root horse name used when `init`/`reset` get none
    pub default_root_name: String,

    /// Decimals shown for scores in trees and lists
    pub score_precision: usize,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            default_root_name: DEFAULT_ROOT_NAME.to_string(),
            score_precision: 2,
        }
    }
}

impl WorkspaceConfig {
    /// Checks values that would break file naming or formatting
    pub fn validate(&self) -> Result<(), ConfigError> {
        let key = self.storage_key.trim();
        if key.is_empty() {
            return Err(ConfigError::Invalid("storage_key must not be empty".to_string()));
        }
        if key.contains(['/', '\\']) || key.starts_with('.') {
            return Err(ConfigError::Invalid(format!(
                "storage_key '{}' must be a plain file name",
                key
            )));
        }
        if self.score_precision > 10 {
            return Err(ConfigError::Invalid(format!(
                "score_precision must be at most 10, got {}",
                self.score_precision
            )));
        }
        Ok(())
    }
}

/// Global user configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GlobalConfig {
    /// Default output format (text or json)
    pub default_format: OutputFormat,
}

/// Output format for commands
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Combined configuration (global + workspace)
#[derive(Debug, Clone)]
pub struct Config {
    pub workspace: WorkspaceConfig,
    pub global: GlobalConfig,
}

impl Config {
    /// Loads configuration from default locations
    pub fn load() -> Result<Self> {
        let global = Self::load_global()?;
        let workspace = match Self::find_workspace_root() {
            Some(root) => Self::load_workspace_config(&root)?,
            None => WorkspaceConfig::default(),
        };

        Ok(Self { workspace, global })
    }

    /// Loads configuration for a specific workspace
    pub fn for_workspace(workspace_root: &Path) -> Result<Self> {
        let global = Self::load_global()?;
        let workspace = Self::load_workspace_config(workspace_root)?;

        Ok(Self { workspace, global })
    }

    /// Returns the global config directory
    pub fn global_config_dir() -> Option<PathBuf> {
        ProjectDirs::from("dev", "pedigree", "pedigree-cli")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Loads global configuration
    fn load_global() -> Result<GlobalConfig> {
        let config_dir = match Self::global_config_dir() {
            Some(dir) => dir,
            None => return Ok(GlobalConfig::default()),
        };

        let config_path = config_dir.join("config.toml");
        if !config_path.exists() {
            return Ok(GlobalConfig::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read global config: {}", config_path.display()))?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .context("Failed to parse global config")
    }

    /// Loads workspace configuration from a specific root
    fn load_workspace_config(workspace_root: &Path) -> Result<WorkspaceConfig> {
        let config_path = workspace_root.join(".pedigree").join("config.toml");

        if !config_path.exists() {
            return Ok(WorkspaceConfig::default());
        }

        let content = fs::read_to_string(&config_path).with_context(|| {
            format!("Failed to read workspace config: {}", config_path.display())
        })?;

        let config: WorkspaceConfig = toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .context("Failed to parse workspace config")?;
        config.validate()?;
        Ok(config)
    }

    /// Finds the workspace root by looking for a `.pedigree/` directory
    pub fn find_workspace_root() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;

        loop {
            if current.join(".pedigree").is_dir() {
                return Some(current);
            }

            if !current.pop() {
                return None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config() {
        let config = Config {
            workspace: WorkspaceConfig::default(),
            global: GlobalConfig::default(),
        };

        assert_eq!(config.workspace.storage_key, "horse_app_data_v1");
        assert_eq!(config.workspace.score_precision, 2);
        assert_eq!(config.global.default_format, OutputFormat::Text);
    }

    #[test]
    fn parse_workspace_config() {
        let toml = r#"
storage_key = "stud_book"
score_precision = 4
"#;

        let config: WorkspaceConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.storage_key, "stud_book");
        assert_eq!(config.score_precision, 4);
        assert_eq!(config.default_root_name, DEFAULT_ROOT_NAME);
    }

    #[test]
    fn parse_global_config() {
        let config: GlobalConfig = toml::from_str("default_format = \"json\"").unwrap();
        assert_eq!(config.default_format, OutputFormat::Json);
    }

    #[test]
    fn validate_rejects_bad_values() {
        let mut config = WorkspaceConfig::default();
        assert!(config.validate().is_ok());

        config.storage_key = "../escape".to_string();
        assert!(config.validate().is_err());

        config.storage_key = "  ".to_string();
        assert!(config.validate().is_err());

        config = WorkspaceConfig {
            score_precision: 11,
            ..WorkspaceConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn workspace_config_from_disk() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join(".pedigree")).unwrap();
        fs::write(
            dir.path().join(".pedigree").join("config.toml"),
            "default_root_name = \"Fohlen\"\n",
        )
        .unwrap();

        let config = Config::for_workspace(dir.path()).unwrap();
        assert_eq!(config.workspace.default_root_name, "Fohlen");
        assert_eq!(config.workspace.storage_key, DEFAULT_STORAGE_KEY);
    }

    #[test]
    fn invalid_workspace_config_fails() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join(".pedigree")).unwrap();
        fs::write(
            dir.path().join(".pedigree").join("config.toml"),
            "storage_key = \"a/b\"\n",
        )
        .unwrap();

        assert!(Config::for_workspace(dir.path()).is_err());
    }
}
