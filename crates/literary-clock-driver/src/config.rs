use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use literary_clock_core::SelectionPolicy;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_TICK_INTERVAL_SECS: u64 = 5;

/// Presentation theme. Passed through to renderers; the resolver never reads it.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, Eq, PartialEq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("tick_interval_secs MUST be between 1 and 59, got {0}")]
    TickInterval(u64),
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ClockConfig {
    /// Directory of `HH_mm.json` files or a pipe-delimited table. `None` shows the fallback.
    pub corpus: Option<PathBuf>,
    pub tick_interval_secs: u64,
    pub selection: SelectionPolicy,
    pub theme: Theme,
    /// Drop quotes explicitly rated not safe for work.
    pub sfw_only: bool,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            corpus: None,
            tick_interval_secs: DEFAULT_TICK_INTERVAL_SECS,
            selection: SelectionPolicy::default(),
            theme: Theme::default(),
            sfw_only: false,
        }
    }
}

impl ClockConfig {
    /// Read and validate a YAML config file. A relative `corpus` path is taken relative to
    /// the directory holding the config file.
    ///
    /// # Errors
    /// Returns [`ConfigError`] when the file cannot be read, does not parse, or fails
    /// [`ClockConfig::validate`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(source) => return Err(ConfigError::Read { path: path.to_path_buf(), source }),
        };
        let mut config = Self::from_yaml(&text)?;

        if let (Some(corpus), Some(base)) = (config.corpus.as_ref(), path.parent()) {
            if corpus.is_relative() {
                config.corpus = Some(base.join(corpus));
            }
        }
        Ok(config)
    }

    /// # Errors
    /// Returns [`ConfigError::Parse`] for malformed YAML or unknown keys, and
    /// [`ConfigError::TickInterval`] for an out-of-range cadence.
    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        // An empty document means "all defaults".
        let config = if text.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str::<Self>(text)?
        };
        config.validate()?;
        Ok(config)
    }

    /// The cadence has to stay under a minute, otherwise a minute can pass without a tick.
    ///
    /// # Errors
    /// Returns [`ConfigError::TickInterval`] when `tick_interval_secs` is outside `1..=59`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=59).contains(&self.tick_interval_secs) {
            return Err(ConfigError::TickInterval(self.tick_interval_secs));
        }
        Ok(())
    }

    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(self.tick_interval_secs)
    }
}
