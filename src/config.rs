use crate::feed::DEFAULT_FEED_UTC_OFFSET_HOURS;
use crate::garage::Garage;
use crate::history::HISTORY_CAPACITY;
use crate::prediction::{DEFAULT_HORIZON_MINUTES, linear};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;
use time::UtcOffset;

pub const DEFAULT_CONFIG_PATH: &str = "config/config.toml";
pub const DEFAULT_SERVER_PORT: u16 = 8080;
pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub app: AppSection,
    pub logging: LoggingSection,
    #[serde(default)]
    pub server: Option<ServerSection>,
    #[serde(default)]
    pub history: Option<HistorySection>,
    #[serde(default)]
    pub prediction: Option<PredictionSection>,
    #[serde(default)]
    pub feed: Option<FeedSection>,
    #[serde(default)]
    pub garages: Vec<Garage>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppSection {
    pub name: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingSection {
    pub level: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSection {
    /// Port to listen on (default: 8080)
    pub port: Option<u16>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HistorySection {
    /// Samples kept per garage (default: 180)
    pub capacity: Option<usize>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PredictionSection {
    pub model: Option<String>,
    pub default_horizon_minutes: Option<u32>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FeedSection {
    /// Offset applied to feed timestamps that carry no zone (default: -6)
    pub utc_offset_hours: Option<i8>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Read(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

pub fn load_default() -> Result<Config, ConfigError> {
    load_from_path(DEFAULT_CONFIG_PATH)
}

pub fn load_from_path(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let contents = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&contents)?;
    config.validate()?;
    Ok(config)
}

impl Config {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.history_capacity() == 0 {
            return Err(ConfigError::Invalid(
                "history.capacity must be at least 1".to_string(),
            ));
        }
        self.feed_offset()?;
        Ok(())
    }

    /// Returns the server port (default: 8080)
    pub fn server_port(&self) -> u16 {
        self.server
            .as_ref()
            .and_then(|s| s.port)
            .unwrap_or(DEFAULT_SERVER_PORT)
    }

    pub fn log_level(&self) -> &str {
        let level = self.logging.level.trim();
        if level.is_empty() {
            DEFAULT_LOG_LEVEL
        } else {
            level
        }
    }

    pub fn history_capacity(&self) -> usize {
        self.history
            .as_ref()
            .and_then(|h| h.capacity)
            .unwrap_or(HISTORY_CAPACITY)
    }

    pub fn model_name(&self) -> &str {
        self.prediction
            .as_ref()
            .and_then(|p| p.model.as_deref())
            .unwrap_or(linear::MODEL_NAME)
    }

    pub fn default_horizon_minutes(&self) -> u32 {
        self.prediction
            .as_ref()
            .and_then(|p| p.default_horizon_minutes)
            .unwrap_or(DEFAULT_HORIZON_MINUTES)
    }

    pub fn feed_offset(&self) -> Result<UtcOffset, ConfigError> {
        let hours = self
            .feed
            .as_ref()
            .and_then(|f| f.utc_offset_hours)
            .unwrap_or(DEFAULT_FEED_UTC_OFFSET_HOURS);
        UtcOffset::from_hms(hours, 0, 0)
            .map_err(|err| ConfigError::Invalid(format!("feed.utc_offset_hours: {err}")))
    }
}
