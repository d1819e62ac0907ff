use std::path::Path;

use serde::{Deserialize, Serialize};

/// Configuration from an optional trellis.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub lists: ListsConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListsConfig {
    /// Lists created at session start
    #[serde(default = "default_seed")]
    pub seed: Vec<String>,
}

impl Default for ListsConfig {
    fn default() -> Self {
        ListsConfig {
            seed: default_seed(),
        }
    }
}

fn default_seed() -> Vec<String> {
    vec!["Work".to_string(), "Personal".to_string()]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Seconds between recurrence/reminder checks while the session idles
    #[serde(default = "default_tick_secs")]
    pub tick_secs: u64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        ScheduleConfig {
            tick_secs: default_tick_secs(),
        }
    }
}

fn default_tick_secs() -> u64 {
    60
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
}

impl Config {
    /// Load from the given path, or fall back to defaults when no path is
    /// given.
    pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
        let Some(path) = path else {
            return Ok(Config::default());
        };
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }
}
