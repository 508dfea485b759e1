//! Session records and the append-only session log.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// The in-flight record of the current cycle.
///
/// Exists from `Idle -> Running` until the cycle is logged or discarded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveSession {
    pub id: String,
    pub cycle_number: u64,
    pub start_time: DateTime<Utc>,
    pub task_description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
}

/// One finished pomodoro. Never mutated after it enters the log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub cycle_number: u64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub elapsed_seconds: u64,
    pub task_description: String,
    pub reflection: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    /// Configured duration of the cycle this session came from.
    pub duration_minutes: u32,
    /// `false` when the user ended the cycle before the countdown hit zero.
    pub completed_naturally: bool,
}

impl Session {
    /// Elapsed time rounded to the nearest whole minute, as shown in the
    /// history badge.
    pub fn elapsed_minutes_rounded(&self) -> u64 {
        (self.elapsed_seconds + 30) / 60
    }
}

/// Aggregate figures for the session history view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SessionSummary {
    pub count: usize,
    pub total_elapsed_seconds: u64,
    pub total_minutes_rounded: u64,
}

/// Append-only sequence of finished sessions in completion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionLog {
    sessions: Vec<Session>,
}

impl SessionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn append(&mut self, session: Session) {
        self.sessions.push(session);
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Sessions in completion order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Session> {
        self.sessions.iter()
    }

    /// Sessions newest first, the order the history view displays them in.
    pub fn most_recent_first(&self) -> impl Iterator<Item = &Session> {
        self.sessions.iter().rev()
    }

    pub fn last(&self) -> Option<&Session> {
        self.sessions.last()
    }

    pub fn total_elapsed_seconds(&self) -> u64 {
        self.sessions.iter().map(|s| s.elapsed_seconds).sum()
    }

    /// Sessions whose `end_time` falls on the given UTC date.
    pub fn completed_on(&self, date: NaiveDate) -> impl Iterator<Item = &Session> {
        self.sessions
            .iter()
            .filter(move |s| s.end_time.date_naive() == date)
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            count: self.sessions.len(),
            total_elapsed_seconds: self.total_elapsed_seconds(),
            total_minutes_rounded: self
                .sessions
                .iter()
                .map(Session::elapsed_minutes_rounded)
                .sum(),
        }
    }
}

impl<'a> IntoIterator for &'a SessionLog {
    type Item = &'a Session;
    type IntoIter = std::slice::Iter<'a, Session>;

    fn into_iter(self) -> Self::IntoIter {
        self.sessions.iter()
    }
}
