//! TOML configuration for the timeline.
//!
//! Layered the usual way: an explicit path, then the path named by the
//! `CRON_TIMELINE_CONFIG` environment variable, then the system location,
//! then compiled-in defaults.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::timeline::date::DEFAULT_DATE_FORMAT;
use crate::timeline::format::{DEFAULT_DETAILS_FORMAT, DEFAULT_HEADER_FORMAT};
use crate::timeline::{ScaleConfig, TimelineError};

pub const CONFIG_ENV: &str = "CRON_TIMELINE_CONFIG";
pub const SYSTEM_CONFIG_PATH: &str = "/etc/cron-timeline/timeline.toml";

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Root configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    /// Format of every stored timestamp (`scheduled_at`, `executed_at`, `finished_at`).
    pub date_format: String,
    /// Format of the day bucket labels.
    pub header_format: String,
    /// Format of timestamps in run details.
    pub details_format: String,
    /// Narrowest window the timeline shows, in hours.
    pub min_hours: u32,
    pub scale: ScaleConfig,
    pub logging: LoggingConfig,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            header_format: DEFAULT_HEADER_FORMAT.to_string(),
            details_format: DEFAULT_DETAILS_FORMAT.to_string(),
            min_hours: 24,
            scale: ScaleConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl TimelineConfig {
    /// Load configuration from a TOML file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("invalid config file: {}", path.display()))?;
        info!(path = %path.display(), "loaded timeline configuration");
        Ok(config)
    }

    /// Try the environment override, then the system location, then defaults.
    pub fn load_or_default() -> Self {
        let env_path = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        let system_path = Some(PathBuf::from(SYSTEM_CONFIG_PATH)).filter(|p| p.exists());
        Self::first_loadable(env_path.into_iter().chain(system_path))
    }

    /// The first candidate that loads cleanly, or defaults. Candidates that
    /// fail are logged and skipped.
    pub fn first_loadable(candidates: impl IntoIterator<Item = PathBuf>) -> Self {
        for path in candidates {
            match Self::load(&path) {
                Ok(cfg) => return cfg,
                Err(e) => warn!(
                    path = %path.display(),
                    error = %format!("{e:#}"),
                    "config file could not be loaded, trying next source"
                ),
            }
        }

        debug!("no usable config file, using compiled-in defaults");
        Self::default()
    }

    pub fn validate(&self) -> Result<(), TimelineError> {
        let formats = [
            ("date_format", &self.date_format),
            ("header_format", &self.header_format),
            ("details_format", &self.details_format),
        ];
        for (field, value) in formats {
            if value.trim().is_empty() {
                return Err(TimelineError::InvalidDateFormat { field });
            }
        }
        if self.min_hours == 0 {
            return Err(TimelineError::InvalidMinHours);
        }
        self.scale.normalized()?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` takes precedence.
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}
