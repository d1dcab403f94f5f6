//! Application configuration.

use inkroom_core::history::HistoryConfig;
use inkroom_core::records::SerializableColor;
use inkroom_core::room::DEFAULT_JOIN_DELAY;
use inkroom_core::tools::{ToolError, ToolSettings};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid tool defaults: {0}")]
    Tool(#[from] ToolError),
    #[error("Viewport must be non-empty, got {0}x{1}")]
    EmptyViewport(u32, u32),
}

/// Application configuration. Missing fields fall back to defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub background_color: SerializableColor,
    /// Tool settings at startup.
    pub tools: ToolSettings,
    pub history: HistoryConfig,
    /// Delay before the simulated participant joins, in milliseconds.
    pub join_delay_ms: u64,
    /// Origin used for room share links.
    pub share_origin: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "InkRoom".to_string(),
            width: 1280,
            height: 800,
            background_color: SerializableColor::white(),
            tools: ToolSettings::default(),
            history: HistoryConfig::default(),
            join_delay_ms: DEFAULT_JOIN_DELAY.as_millis() as u64,
            share_origin: "http://localhost:8080".to_string(),
        }
    }
}

impl AppConfig {
    /// Load and validate a JSON config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::EmptyViewport(self.width, self.height));
        }
        self.tools.validate()?;
        Ok(())
    }

    pub fn join_delay(&self) -> Duration {
        Duration::from_millis(self.join_delay_ms)
    }
}
