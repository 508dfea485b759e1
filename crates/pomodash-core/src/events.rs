use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{Session, TimerSnapshot};

/// Every state change of the timer produces an Event.
/// Hosts render from them; the tick driver broadcasts them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TaskCaptured {
        task_description: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        task_id: Option<String>,
        at: DateTime<Utc>,
    },
    CycleStarted {
        cycle_number: u64,
        session_id: String,
        task_description: String,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        seconds_remaining: u64,
        at: DateTime<Utc>,
    },
    TimerResumed {
        seconds_remaining: u64,
        at: DateTime<Utc>,
    },
    Tick {
        seconds_remaining: u64,
        at: DateTime<Utc>,
    },
    /// The cycle entered `Completed`; a reflection is now required.
    TimerCompleted {
        cycle_number: u64,
        seconds_remaining: u64,
        ended_early: bool,
        at: DateTime<Utc>,
    },
    SessionLogged {
        session: Session,
        at: DateTime<Utc>,
    },
    TimerReset {
        /// Whether an unlogged session was thrown away.
        discarded: bool,
        at: DateTime<Utc>,
    },
    ConfigChanged {
        duration_minutes: u32,
        at: DateTime<Utc>,
    },
    StateSnapshot(TimerSnapshot),
}

impl Event {
    /// True for the once-per-second countdown updates, which hosts often
    /// filter out of their output.
    pub fn is_tick(&self) -> bool {
        matches!(self, Event::Tick { .. })
    }
}
