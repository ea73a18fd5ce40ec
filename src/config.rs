//! Configuration file handling.
//!
//! # Configuration Location
//!
//! - Linux: `~/.config/mise-osquery-extension/config.toml`
//! - macOS: `~/Library/Application Support/mise-osquery-extension/config.toml`
//! - Windows: `%APPDATA%\mise-osquery-extension\config.toml`
//!
//! # Example Configuration
//!
//! ```toml
//! managers = ["mise", "asdf"]
//! default_format = "table"
//! parallel = true
//! ```
//!
//! Installs directories are not configured here. Each manager's own
//! `*_DATA_DIR` variable is honored instead.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use crate::model::Manager;
use crate::scanner::{get_scanner, Scanner};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Managers scanned when no `--manager` flag is provided.
    ///
    /// Default: all managers
    pub managers: Vec<Manager>,

    /// Default output format when no `--format` flag is provided.
    ///
    /// Valid values: "table", "json"
    /// Default: "table"
    pub default_format: String,

    /// Whether to scan managers concurrently.
    ///
    /// Default: true
    pub parallel: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            managers: Manager::all().to_vec(),
            default_format: "table".to_string(),
            parallel: true,
        }
    }
}

impl Config {
    /// Loads configuration from the config file, or defaults if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        let path = Self::config_path();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        Self::from_toml(&content).with_context(|| format!("Invalid config file: {:?}", path))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Saves the configuration, creating the parent directory if needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();

        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("mise-osquery-extension")
            .join("config.toml")
    }

    pub fn generate_default_config() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }

    /// Scanners for the configured managers, in configured order. A manager
    /// listed twice is scanned once.
    pub fn enabled_scanners(&self) -> Vec<Arc<dyn Scanner>> {
        let mut seen = HashSet::new();
        self.managers
            .iter()
            .filter(|m| seen.insert(**m))
            .map(|m| get_scanner(*m))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();

        assert_eq!(config.managers, vec![Manager::Mise, Manager::Asdf]);
        assert_eq!(config.default_format, "table");
        assert!(config.parallel);
    }

    #[test]
    fn test_config_partial_toml() {
        let config = Config::from_toml("managers = [\"asdf\"]\n").unwrap();

        assert_eq!(config.managers, vec![Manager::Asdf]);
        assert_eq!(config.default_format, "table");
        assert!(config.parallel);
    }

    #[test]
    fn test_config_rejects_unknown_manager() {
        assert!(Config::from_toml("managers = [\"nvm\"]\n").is_err());
    }

    #[test]
    fn test_default_config_round_trips() {
        let text = Config::generate_default_config();
        let config = Config::from_toml(&text).unwrap();
        assert_eq!(config.managers.len(), 2);
    }

    #[test]
    fn test_enabled_scanners() {
        let config = Config::from_toml("managers = [\"mise\"]\nparallel = false\n").unwrap();
        let scanners = config.enabled_scanners();

        assert_eq!(scanners.len(), 1);
        assert_eq!(scanners[0].manager(), Manager::Mise);
        assert!(!config.parallel);
    }

    #[test]
    fn test_enabled_scanners_skips_repeated_managers() {
        let config = Config::from_toml("managers = [\"mise\", \"asdf\", \"mise\"]\n").unwrap();
        let managers: Vec<Manager> = config
            .enabled_scanners()
            .iter()
            .map(|s| s.manager())
            .collect();

        assert_eq!(managers, vec![Manager::Mise, Manager::Asdf]);
    }
}
