//! Custom error types for levelup.
//!
//! Only two things in the engine can genuinely fail: writing through the
//! persistence gateway and loading configuration. Everything else (unknown
//! ids, corrupt blobs) degrades to a no-op or an empty collection.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for levelup operations
#[derive(Error, Debug)]
pub enum LevelUpError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Failed to load configuration
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        path: Option<PathBuf>,
    },

    /// Invalid configuration value
    #[error("Invalid configuration: {field} - {reason}")]
    InvalidConfig { field: String, reason: String },

    // =========================================================================
    // Store Errors
    // =========================================================================
    /// Reading or writing a key failed
    #[error("Store error on '{key}': {message}")]
    Store { key: String, message: String },

    /// Could not acquire the store lock
    #[error("Failed to acquire store lock at {path}: {message}")]
    Lock { path: PathBuf, message: String },

    /// Stored blob could not be encoded
    #[error("Failed to encode '{key}': {message}")]
    Encode { key: String, message: String },

    // =========================================================================
    // Wrapped Errors
    // =========================================================================
    /// IO error wrapper
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON error wrapper
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// TOML parse error wrapper
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

impl LevelUpError {
    // =========================================================================
    // Constructor helpers
    // =========================================================================

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            path: None,
        }
    }

    /// Create a configuration error with path
    pub fn config_with_path(message: impl Into<String>, path: PathBuf) -> Self {
        Self::Config {
            message: message.into(),
            path: Some(path),
        }
    }

    /// Create an invalid configuration error
    pub fn invalid_config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create a store error
    pub fn store(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Store {
            key: key.into(),
            message: message.into(),
        }
    }

    // =========================================================================
    // Classification helpers
    // =========================================================================

    /// Check if retrying the same operation could succeed.
    ///
    /// Lock contention and transient I/O are recoverable; a bad config file is not.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Store { .. } | Self::Lock { .. } | Self::Io(_))
    }

    /// Get error code for exit status
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config { .. } | Self::InvalidConfig { .. } | Self::Toml(_) => 7,
            Self::Lock { .. } => 3,
            Self::Store { .. } | Self::Io(_) => 2,
            _ => 1,
        }
    }
}

/// Type alias for levelup results
pub type Result<T> = std::result::Result<T, LevelUpError>;
