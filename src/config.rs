//! Application configuration
//!
//! TOML-backed configuration with versioned metadata, stored in the
//! platform config directory by default. The CLI loads this at startup;
//! the library itself never reads it.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::logging::LogConfig;

/// Current configuration format version
const CONFIG_VERSION: &str = "1.0";

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Configuration metadata
    pub metadata: ConfigMetadata,

    /// General application settings
    pub settings: AppSettings,

    /// Logging configuration
    pub logging: LogConfig,
}

/// Configuration metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigMetadata {
    /// Configuration format version
    pub version: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    /// Data directory path
    pub data_dir: PathBuf,

    /// Database file name, resolved against `data_dir` unless absolute
    pub database_file: PathBuf,

    /// Default sleep analysis window ("week", "month", "year", or days)
    pub default_analysis_period: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            metadata: ConfigMetadata {
                version: CONFIG_VERSION.to_string(),
                created_at: now,
                updated_at: now,
            },
            settings: AppSettings {
                data_dir: default_data_dir(),
                database_file: PathBuf::from("wellrs.db"),
                default_analysis_period: "week".to_string(),
            },
            logging: LogConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Load the configuration at `path`, falling back to defaults when the
    /// file does not exist
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration as TOML, creating parent directories as needed
    pub fn save<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        self.metadata.updated_at = Utc::now();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config dir: {}", parent.display()))?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Full path to the SQLite database file
    pub fn database_path(&self) -> PathBuf {
        if self.settings.database_file.is_absolute() {
            self.settings.database_file.clone()
        } else {
            self.settings.data_dir.join(&self.settings.database_file)
        }
    }
}

/// Default location of the config file
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("wellrs")
        .join("config.toml")
}

/// Default data directory
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("wellrs")
}
