//! Typed configuration loaded from `arena-config.yaml`.
//!
//! Every field has a default, so a missing file section (or an empty
//! mapping) yields a usable configuration.

use std::path::Path;

use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration for the engine binary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ArenaConfig {
    /// Defaults applied to newly created games.
    #[serde(default)]
    pub games: GameDefaults,

    /// Demo game seeded at startup.
    #[serde(default)]
    pub demo: DemoConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ArenaConfig {
    /// Load configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or does not parse.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Fails if the YAML does not match the expected structure.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_yml::from_str(content)?)
    }
}

/// Defaults applied to newly created games.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GameDefaults {
    /// Day length in minutes for games that don't specify one.
    #[serde(default = "default_day_length_minutes")]
    pub day_length_minutes: u64,

    /// Capacity for games that don't specify one.
    #[serde(default = "default_max_players")]
    pub max_players: u32,
}

impl Default for GameDefaults {
    fn default() -> Self {
        Self {
            day_length_minutes: default_day_length_minutes(),
            max_players: default_max_players(),
        }
    }
}

/// The demo game the binary seeds and runs at startup.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DemoConfig {
    /// Whether to seed and run a demo game.
    #[serde(default = "default_demo_enabled")]
    pub enabled: bool,

    /// How many bot players to seed.
    #[serde(default = "default_demo_bots")]
    pub bots: u32,

    /// Day length in minutes for the demo game. Zero runs the days back
    /// to back.
    #[serde(default)]
    pub day_length_minutes: u64,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            enabled: default_demo_enabled(),
            bots: default_demo_bots(),
            day_length_minutes: 0,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter used when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_day_length_minutes() -> u64 {
    10
}

fn default_max_players() -> u32 {
    24
}

fn default_demo_enabled() -> bool {
    true
}

fn default_demo_bots() -> u32 {
    8
}

fn default_log_level() -> String {
    "info".to_owned()
}
