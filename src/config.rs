//! Runtime configuration: an optional JSON file, then command-line overrides.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::LevelFilter;
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::entities::{Field, Rules};
use crate::error::{GameError, Result};

/// Log verbosity as written in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "off" => Some(LogLevel::Off),
            "error" => Some(LogLevel::Error),
            "warn" | "warning" => Some(LogLevel::Warn),
            "info" => Some(LogLevel::Info),
            "debug" => Some(LogLevel::Debug),
            "trace" => Some(LogLevel::Trace),
            _ => None,
        }
    }

    pub fn filter(&self) -> LevelFilter {
        match self {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Logical play field.  1000×600 by default; 800×600 matches the
    /// smaller variant.
    pub field: Field,
    pub rules: Rules,
    /// Simulation ticks per second.
    pub tick_rate_hz: u32,
    /// Fixed RNG seed for reproducible runs.
    pub seed: Option<u64>,
    pub log_file: PathBuf,
    pub log_level: LogLevel,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            field: Field::default(),
            rules: Rules::default(),
            tick_rate_hz: DEFAULT_TICK_RATE_HZ,
            seed: None,
            log_file: PathBuf::from("space_invaders.log"),
            log_level: LogLevel::Info,
        }
    }
}

impl GameConfig {
    /// Parse a config from JSON text.  Missing keys take their defaults.
    pub fn from_json(json: &str, origin: &Path) -> Result<Self> {
        let config: GameConfig =
            serde_json::from_str(json).map_err(|source| GameError::ConfigParse {
                path: origin.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path).map_err(|source| GameError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json, path)
    }

    /// Reject values the simulation geometry cannot work with.
    pub fn validate(&self) -> Result<()> {
        let Field { width, height } = self.field;
        if !(width >= MIN_FIELD_WIDTH) || !(height >= MIN_FIELD_HEIGHT) {
            return Err(GameError::InvalidConfig(format!(
                "field {width}x{height} is smaller than {MIN_FIELD_WIDTH}x{MIN_FIELD_HEIGHT}"
            )));
        }
        if self.tick_rate_hz == 0 || self.tick_rate_hz > MAX_TICK_RATE_HZ {
            return Err(GameError::InvalidConfig(format!(
                "tick rate {} must be within 1..={MAX_TICK_RATE_HZ}",
                self.tick_rate_hz
            )));
        }
        if !(self.rules.round_speed_multiplier >= 1.0) {
            return Err(GameError::InvalidConfig(format!(
                "round speed multiplier {} must be at least 1.0",
                self.rules.round_speed_multiplier
            )));
        }
        if self.rules.max_rounds == 0 {
            return Err(GameError::InvalidConfig(
                "max_rounds must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.tick_rate_hz.max(1) as f64)
    }
}
