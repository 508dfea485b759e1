//! Core error types for pomodash-core.
//!
//! Every failure in this library is local and recoverable: a rejected timer
//! command leaves the engine exactly as it was, and the caller re-collects
//! input or simply ignores the rejection.

use std::path::PathBuf;
use thiserror::Error;

use crate::timer::{Action, Phase};

/// Core error type for pomodash-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Timer command rejections
    #[error("Timer error: {0}")]
    Timer(#[from] TimerError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Rejections produced by the timer engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimerError {
    /// A cycle cannot start until a non-empty task description is captured.
    #[error("a task description is required before starting")]
    TaskRequired,

    /// A completed cycle cannot be logged without a non-empty reflection.
    #[error("a reflection is required to finish the session")]
    ReflectionRequired,

    /// The command is not valid in the current phase.
    #[error("cannot {action} while {phase}")]
    InvalidTransition { action: Action, phase: Phase },

    /// The duration is not one of the permitted values.
    #[error("unsupported duration: {0} minutes")]
    UnsupportedDuration(u32),
}

impl TimerError {
    /// True for rejections caused by bad input, which the caller should
    /// re-prompt for, as opposed to commands issued in the wrong phase.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            TimerError::TaskRequired
                | TimerError::ReflectionRequired
                | TimerError::UnsupportedDuration(_)
        )
    }
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),

    /// The home/config directory could not be prepared
    #[error("Config directory unavailable: {0}")]
    DirUnavailable(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
