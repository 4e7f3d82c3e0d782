//! Configuration management for levelup.
//!
//! Configuration is optional: a missing file yields [`TrackerConfig::default`],
//! which reproduces the stock behaviour (two-day retention for completed
//! tasks, escalation after three rollovers, five starter sets per exercise).

use crate::error::{LevelUpError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default configuration file name inside the data directory.
pub const CONFIG_FILE: &str = "levelup.toml";

/// Name of the application directory under the platform data dir.
const APP_DIR: &str = "levelup";

/// Categories offered before the user adds any of their own.
pub fn default_categories() -> Vec<String> {
    ["Finances", "Personal", "Work"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_retention_days() -> u32 {
    2
}

fn default_escalation_threshold() -> u32 {
    3
}

fn default_initial_sets() -> usize {
    5
}

/// Tunables for the goal, task and workout modules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Completed tasks older than this many days are expunged
    #[serde(default = "default_retention_days")]
    pub retention_days: u32,

    /// Rollovers after which a task is pushed into the next month
    #[serde(default = "default_escalation_threshold")]
    pub escalation_threshold: u32,

    /// Categories available before any custom category is added
    #[serde(default = "default_categories")]
    pub default_categories: Vec<String>,

    /// Number of empty sets a new exercise log starts with
    #[serde(default = "default_initial_sets")]
    pub initial_sets: usize,

    /// Override for the storage directory
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            retention_days: default_retention_days(),
            escalation_threshold: default_escalation_threshold(),
            default_categories: default_categories(),
            initial_sets: default_initial_sets(),
            data_dir: None,
        }
    }
}

impl TrackerConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns the default configuration if the file doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read, parsed, or
    /// fails validation.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            LevelUpError::config_with_path(
                format!("Failed to read config: {e}"),
                path.to_path_buf(),
            )
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| {
            LevelUpError::config_with_path(
                format!("Failed to parse config: {e}"),
                path.to_path_buf(),
            )
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Reject values that would break the engine's invariants.
    ///
    /// # Errors
    ///
    /// Returns [`LevelUpError::InvalidConfig`] naming the offending field.
    pub fn validate(&self) -> Result<()> {
        if self.retention_days == 0 {
            return Err(LevelUpError::invalid_config(
                "retention_days",
                "must be at least 1",
            ));
        }
        if self.escalation_threshold == 0 {
            return Err(LevelUpError::invalid_config(
                "escalation_threshold",
                "must be at least 1",
            ));
        }
        if self.default_categories.iter().any(|c| c.trim().is_empty()) {
            return Err(LevelUpError::invalid_config(
                "default_categories",
                "category names cannot be blank",
            ));
        }
        Ok(())
    }

    /// Resolve the directory where the store document lives.
    ///
    /// Uses the configured override, then the platform data directory, then
    /// a `.levelup` directory in the working directory.
    #[must_use]
    pub fn resolve_data_dir(&self) -> PathBuf {
        if let Some(ref dir) = self.data_dir {
            return dir.clone();
        }
        dirs::data_dir()
            .map(|d| d.join(APP_DIR))
            .unwrap_or_else(|| PathBuf::from(".levelup"))
    }

    /// Set retention window for completed tasks.
    #[must_use]
    pub fn with_retention_days(mut self, days: u32) -> Self {
        self.retention_days = days;
        self
    }

    /// Set rollover escalation threshold.
    #[must_use]
    pub fn with_escalation_threshold(mut self, threshold: u32) -> Self {
        self.escalation_threshold = threshold;
        self
    }

    /// Set the default category list.
    #[must_use]
    pub fn with_default_categories(mut self, categories: Vec<String>) -> Self {
        self.default_categories = categories;
        self
    }

    /// Set the storage directory override.
    #[must_use]
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }
}
