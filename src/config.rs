//! Layered configuration for the runbook CLI

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory holding document and run-state files
    #[serde(default = "default_documents_dir")]
    pub documents: String,
}

fn default_documents_dir() -> String {
    ".runbooks".to_string()
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            documents: default_documents_dir(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to log to a file under the documents directory instead of stderr
    #[serde(default)]
    pub to_file: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            to_file: false,
        }
    }
}

impl Config {
    /// Path to the optional user config file (`~/.config/runbook/config.toml`)
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("runbook").join("config.toml"))
    }

    pub fn load(config_path: Option<&str>) -> Result<Self> {
        // Start with embedded defaults so the CLI works without config files
        let defaults = Config::default();
        let defaults_json =
            serde_json::to_string(&defaults).context("Failed to serialize default config")?;

        let mut builder = config::Config::builder().add_source(config::File::from_str(
            &defaults_json,
            config::FileFormat::Json,
        ));

        // User config in ~/.config/runbook/ (optional overrides)
        if let Some(user_config) = Self::user_config_path() {
            if user_config.exists() {
                builder = builder.add_source(config::File::from(user_config));
            }
        }

        // Explicit config file (CLI override)
        if let Some(path) = config_path {
            builder = builder.add_source(config::File::with_name(path));
        }

        // Environment variables with RUNBOOK_ prefix
        builder = builder.add_source(
            config::Environment::with_prefix("RUNBOOK")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().context("Failed to load configuration")?;
        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Save config as TOML to the given path
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }
        let toml_str =
            toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;
        std::fs::write(path, toml_str).context("Failed to write config file")?;
        Ok(())
    }

    /// Absolute path to the documents directory
    pub fn documents_path(&self) -> PathBuf {
        let path = PathBuf::from(&self.paths.documents);
        if path.is_absolute() {
            path
        } else {
            std::env::current_dir().unwrap_or_default().join(path)
        }
    }

    /// Directory for log files
    pub fn logs_path(&self) -> PathBuf {
        self.documents_path().join("logs")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.paths.documents, ".runbooks");
        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.to_file);
    }

    #[test]
    fn test_documents_path_keeps_absolute_paths() {
        let mut config = Config::default();
        config.paths.documents = "/var/runbooks".to_string();
        assert_eq!(config.documents_path(), PathBuf::from("/var/runbooks"));
    }

    #[test]
    fn test_logs_path_under_documents() {
        let config = Config::default();
        assert!(config.logs_path().ends_with(".runbooks/logs"));
    }

    #[test]
    fn test_save_and_reload() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");

        let mut config = Config::default();
        config.logging.level = "debug".to_string();
        config.save(&path).unwrap();

        let loaded = Config::load(Some(path.to_str().unwrap())).unwrap();
        assert_eq!(loaded.logging.level, "debug");
    }
}
