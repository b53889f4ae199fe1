//! Configuration loading and typed config structures for the Critter simulation.
//!
//! The canonical configuration lives in `critter-config.yaml` at the project
//! root. This module defines strongly-typed structs that mirror the YAML
//! structure, and provides a loader that reads the file. Every key is
//! optional; anything missing falls back to the defaults documented on
//! each field.

use std::path::{Path, PathBuf};

use critter_vitals::VitalsConfig;
use serde::Deserialize;

/// Environment variable that overrides `engine.save_path`.
pub const SAVE_PATH_ENV: &str = "CRITTER_SAVE_PATH";

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

/// Top-level configuration.
///
/// Mirrors the structure of `critter-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CritterConfig {
    /// Stat, sleep, sickness, growth, elimination, and interaction tunables.
    #[serde(default)]
    pub vitals: VitalsConfig,

    /// How often each periodic check runs.
    #[serde(default)]
    pub schedule: ScheduleConfig,

    /// Engine loop settings.
    #[serde(default)]
    pub engine: EngineConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl CritterConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// `CRITTER_SAVE_PATH` overrides `engine.save_path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.engine.apply_env_overrides();
        Ok(config)
    }
}

/// Cadences of the periodic checks, in seconds.
///
/// The simulation is correct at any cadence; these only trade CPU for
/// responsiveness.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ScheduleConfig {
    /// Stat decay and sleep/sickness update.
    #[serde(default = "default_stat_tick_secs")]
    pub stat_tick_secs: u64,

    /// Stale-waste penalty check.
    #[serde(default = "default_staleness_secs")]
    pub staleness_secs: u64,

    /// Sleep state refresh for display layers.
    #[serde(default = "default_sleep_refresh_secs")]
    pub sleep_refresh_secs: u64,

    /// Waste generation roll.
    #[serde(default = "default_waste_check_secs")]
    pub waste_check_secs: u64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            stat_tick_secs: default_stat_tick_secs(),
            staleness_secs: default_staleness_secs(),
            sleep_refresh_secs: default_sleep_refresh_secs(),
            waste_check_secs: default_waste_check_secs(),
        }
    }
}

/// Engine loop settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EngineConfig {
    /// Real-time milliseconds between loop iterations.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Simulated seconds per real second. 1.0 is real time.
    #[serde(default = "default_time_scale")]
    pub time_scale: f64,

    /// Stop after this many loop iterations. `0` runs until interrupted.
    #[serde(default)]
    pub max_ticks: u64,

    /// Where the critter snapshot is loaded from and saved to.
    #[serde(default = "default_save_path")]
    pub save_path: PathBuf,

    /// Seed for waste rolls. Unset draws from the OS.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl EngineConfig {
    /// Apply environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var(SAVE_PATH_ENV) {
            self.save_path = PathBuf::from(val);
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            time_scale: default_time_scale(),
            max_ticks: 0,
            save_path: default_save_path(),
            seed: None,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions for serde
// ---------------------------------------------------------------------------

const fn default_stat_tick_secs() -> u64 {
    5
}

const fn default_staleness_secs() -> u64 {
    15
}

const fn default_sleep_refresh_secs() -> u64 {
    2
}

const fn default_waste_check_secs() -> u64 {
    30
}

const fn default_tick_interval_ms() -> u64 {
    1000
}

const fn default_time_scale() -> f64 {
    1.0
}

fn default_save_path() -> PathBuf {
    PathBuf::from("critter-save.json")
}

fn default_log_level() -> String {
    "info".to_owned()
}
