mod config;

pub use config::{CliSection, Config, TimerSection};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/pomodash[-dev]/` based on POMODASH_ENV.
///
/// Set POMODASH_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("POMODASH_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("pomodash-dev")
    } else {
        base_dir.join("pomodash")
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::DirUnavailable(e.to_string()))?;
    Ok(dir)
}
