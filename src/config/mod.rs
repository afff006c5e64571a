//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cors_origin() -> String {
    "*".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

/// Leaderboard sizing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardConfig {
    /// Entries returned when the caller gives no limit
    #[serde(default = "default_leaderboard_size")]
    pub default_size: usize,

    /// Upper bound on a caller-supplied limit
    #[serde(default = "default_leaderboard_max")]
    pub max_size: usize,
}

fn default_leaderboard_size() -> usize {
    10
}

fn default_leaderboard_max() -> usize {
    100
}

impl Default for LeaderboardConfig {
    fn default() -> Self {
        Self {
            default_size: default_leaderboard_size(),
            max_size: default_leaderboard_max(),
        }
    }
}

impl LeaderboardConfig {
    /// Resolve a requested limit against the configured bounds.
    pub fn limit(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.default_size)
            .clamp(1, self.max_size)
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_dataset_path")]
    pub dataset_path: PathBuf,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub leaderboard: LeaderboardConfig,
}

fn default_dataset_path() -> PathBuf {
    PathBuf::from("./data/data.json")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            dataset_path: default_dataset_path(),
            log_level: default_log_level(),
            server: ServerConfig::default(),
            leaderboard: LeaderboardConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            tracing::debug!("No config file at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "Server port must be greater than 0".to_string(),
            ));
        }

        if self.leaderboard.default_size == 0 {
            return Err(ConfigError::ValidationError(
                "Leaderboard default size must be greater than 0".to_string(),
            ));
        }

        if self.leaderboard.default_size > self.leaderboard.max_size {
            return Err(ConfigError::ValidationError(format!(
                "Leaderboard default size ({}) exceeds max size ({})",
                self.leaderboard.default_size, self.leaderboard.max_size
            )));
        }

        Ok(())
    }
}
