//! Configuration management for pdump CLI

use crate::cli::OutputFormat;
use anyhow::{Context, Result};
use pdump::LoadOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    pub format: Option<OutputFormat>,
    pub skip_malformed: Option<bool>,
}

impl Config {
    /// Get the default path to the config file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("pdump");

        Ok(config_dir.join("config.toml"))
    }

    /// Resolve an explicit path, falling back to the default location
    pub fn resolve_path(path: Option<&Path>) -> Result<PathBuf> {
        match path {
            Some(p) => Ok(p.to_path_buf()),
            None => Self::config_path(),
        }
    }

    /// Load configuration from file, or return defaults if it doesn't exist
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        // Create config directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory at {}", parent.display())
            })?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, contents)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;

        Ok(())
    }

    /// Output format, with a CLI flag taking precedence
    pub fn format_or(&self, flag: Option<OutputFormat>) -> OutputFormat {
        flag.or(self.format).unwrap_or_default()
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            skip_malformed: self.skip_malformed.unwrap_or(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempdir().unwrap();
        let config = Config::load(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.format_or(None), OutputFormat::Table);
        assert!(!config.load_options().skip_malformed);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = Config {
            format: Some(OutputFormat::Json),
            skip_malformed: Some(true),
        };
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded, config);
        assert!(loaded.load_options().skip_malformed);
    }

    #[test]
    fn test_flag_overrides_config() {
        let config = Config {
            format: Some(OutputFormat::Json),
            skip_malformed: None,
        };
        assert_eq!(config.format_or(None), OutputFormat::Json);
        assert_eq!(config.format_or(Some(OutputFormat::Table)), OutputFormat::Table);
    }

    #[test]
    fn test_invalid_config_is_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "format = \"yaml\"\n").unwrap();
        assert!(Config::load(&path).is_err());
    }
}
