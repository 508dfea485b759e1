use serde::{Deserialize, Serialize};

use crate::error::TimerError;

/// Durations (in minutes) a cycle may be configured with.
pub const ALLOWED_DURATIONS: [u32; 6] = [15, 20, 25, 30, 45, 60];

pub const DEFAULT_DURATION_MINUTES: u32 = 25;

/// Countdown length of a cycle.
///
/// Always holds one of [`ALLOWED_DURATIONS`]; deserialization goes through
/// the same check as [`TimerConfig::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct TimerConfig {
    duration_minutes: u32,
}

impl TimerConfig {
    pub fn new(duration_minutes: u32) -> Result<Self, TimerError> {
        if ALLOWED_DURATIONS.contains(&duration_minutes) {
            Ok(Self { duration_minutes })
        } else {
            Err(TimerError::UnsupportedDuration(duration_minutes))
        }
    }

    pub fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }

    /// Get cycle duration in seconds.
    pub fn duration_secs(&self) -> u64 {
        u64::from(self.duration_minutes) * 60
    }
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            duration_minutes: DEFAULT_DURATION_MINUTES,
        }
    }
}

impl TryFrom<u32> for TimerConfig {
    type Error = TimerError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TimerConfig> for u32 {
    fn from(config: TimerConfig) -> Self {
        config.duration_minutes
    }
}

/// Render seconds as a zero-padded `MM:SS` clock face.
///
/// Minutes are not wrapped into hours, so 3600 renders as `60:00`.
pub fn format_clock(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
