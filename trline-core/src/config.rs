//! Dashboard configuration
//!
//! Settings live in a small YAML file. A missing file means defaults, so a
//! fresh install works without any setup.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::palette::Rgb;
use crate::span::{SpanPolicy, DEFAULT_MISSING_END_DAYS, DEFAULT_PAD_DAYS};

/// Environment variable pointing at an explicit config file
pub const CONFIG_ENV_VAR: &str = "TRLINE_CONFIG";

/// Environment variable overriding the data file
pub const DATA_ENV_VAR: &str = "TRLINE_DATA";

/// Upper bound for any day-count setting (about a century)
pub const MAX_WINDOW_DAYS: i64 = 36_500;

/// Invalid configuration values
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{field} must not be negative (got {value})")]
    Negative { field: &'static str, value: i64 },

    #[error("{field} must be at most {max} days (got {value})")]
    TooLarge {
        field: &'static str,
        value: i64,
        max: i64,
    },

    #[error("row_step must be positive")]
    ZeroRowStep,

    #[error("palette must contain at least one colour")]
    EmptyPalette,

    #[error("invalid palette colour: {0}")]
    BadColour(String),
}

/// Tunables for timeline derivation and data lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    /// Margin added before the first and after the last date of a project
    pub pad_days: i64,
    /// Vertical distance between project rows
    pub row_step: u32,
    /// Window length used when a project has no dates at all
    pub missing_end_days: i64,
    /// Half-width of the axis when there are no projects
    pub empty_window_days: i64,
    /// Handling of spans whose end precedes their start
    pub span_policy: SpanPolicy,
    /// Tabular source file; the built-in sample is used when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_file: Option<PathBuf>,
    /// Custom project colours (hex); the built-in palette is used when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub palette: Option<Vec<String>>,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            pad_days: DEFAULT_PAD_DAYS,
            row_step: 30,
            missing_end_days: DEFAULT_MISSING_END_DAYS,
            empty_window_days: 30,
            span_policy: SpanPolicy::default(),
            data_file: None,
            palette: None,
        }
    }
}

impl TimelineConfig {
    /// Loads a config file, falling back to defaults when it does not exist
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            log::debug!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config: TimelineConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;
        config
            .validate()
            .with_context(|| format!("Invalid config file: {:?}", path))?;

        log::debug!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Serializes the config as YAML
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize config")
    }

    /// Saves the config, creating parent directories as needed
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = self.to_yaml()?;

        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write config to {:?}", path.as_ref()))?;

        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("pad_days", self.pad_days),
            ("missing_end_days", self.missing_end_days),
            ("empty_window_days", self.empty_window_days),
        ] {
            if value < 0 {
                return Err(ConfigError::Negative { field, value });
            }
            if value > MAX_WINDOW_DAYS {
                return Err(ConfigError::TooLarge {
                    field,
                    value,
                    max: MAX_WINDOW_DAYS,
                });
            }
        }
        if self.row_step == 0 {
            return Err(ConfigError::ZeroRowStep);
        }
        if let Some(palette) = &self.palette {
            if palette.is_empty() {
                return Err(ConfigError::EmptyPalette);
            }
            if let Some(bad) = palette.iter().find(|c| Rgb::from_hex(c).is_none()) {
                return Err(ConfigError::BadColour(bad.clone()));
            }
        }
        Ok(())
    }

    /// Data file to read: `explicit` (the `--data` flag), then `TRLINE_DATA`,
    /// then the config entry
    pub fn resolve_data_file(&self, explicit: Option<&Path>) -> Option<PathBuf> {
        self.data_file_from(explicit, std::env::var(DATA_ENV_VAR).ok())
    }

    /// Same as [`resolve_data_file`](Self::resolve_data_file) with the
    /// environment value passed in
    pub fn data_file_from(
        &self,
        explicit: Option<&Path>,
        env_value: Option<String>,
    ) -> Option<PathBuf> {
        explicit
            .map(Path::to_path_buf)
            .or_else(|| non_blank(env_value).map(PathBuf::from))
            .or_else(|| self.data_file.clone())
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Gets the path to the config file: `explicit` (the `--config` flag), then
/// `TRLINE_CONFIG`, then the user config directory
pub fn get_config_path(explicit: Option<&Path>) -> Result<PathBuf> {
    config_path_from(explicit, std::env::var(CONFIG_ENV_VAR).ok(), dirs::config_dir())
}

/// Same as [`get_config_path`] with the environment passed in
pub fn config_path_from(
    explicit: Option<&Path>,
    env_value: Option<String>,
    config_dir: Option<PathBuf>,
) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    if let Some(path) = non_blank(env_value) {
        return Ok(PathBuf::from(path));
    }

    let config_dir = config_dir.context("Failed to determine config directory")?;

    Ok(config_dir.join("trline").join("config.yaml"))
}
