//! Configuration loading for the telemetry server
//!
//! Supports JSON configuration files for:
//! - Store location (the bot's SQLite database)
//! - Listen address
//! - Per-endpoint slice bounds

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration for the telemetry server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Path to the SQLite database written by the trading process
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,

    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Per-endpoint slice bounds
    #[serde(default)]
    pub slice_limits: SliceLimits,
}

fn default_store_path() -> PathBuf {
    PathBuf::from("sniper_bot.db")
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
            server: ServerConfig::default(),
            slice_limits: SliceLimits::default(),
        }
    }
}

impl TelemetryConfig {
    /// Load configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            error: e.to_string(),
        })?;

        Self::from_json(&content)
    }

    /// Parse configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Maximum rows returned per display slice, enforced in the store query
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SliceLimits {
    #[serde(default = "default_closed_positions")]
    pub closed_positions: usize,
    #[serde(default = "default_recent_trades")]
    pub recent_trades: usize,
    #[serde(default = "default_decisions")]
    pub decisions: usize,
    #[serde(default = "default_active_positions")]
    pub active_positions: usize,
}

fn default_closed_positions() -> usize {
    50
}
fn default_recent_trades() -> usize {
    20
}
fn default_decisions() -> usize {
    20
}
fn default_active_positions() -> usize {
    3
}

impl Default for SliceLimits {
    fn default() -> Self {
        Self {
            closed_positions: default_closed_positions(),
            recent_trades: default_recent_trades(),
            decisions: default_decisions(),
            active_positions: default_active_positions(),
        }
    }
}

/// Configuration errors
#[derive(Debug, Clone)]
pub enum ConfigError {
    Io { path: String, error: String },
    Parse(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io { path, error } => {
                write!(f, "Failed to read config file '{}': {}", path, error)
            }
            ConfigError::Parse(e) => write!(f, "Failed to parse config: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}
