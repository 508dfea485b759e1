//! Timer engine implementation.
//!
//! The timer engine is a pure state machine. It does not use internal
//! threads or read the monotonic clock - the caller delivers `tick()` once per
//! second while the engine is `Running` (see [`crate::driver::TimerDriver`]).
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running <-> Paused -> Completed -> Idle
//! ```
//!
//! `Idle` with no task and `Completed` are the two states that block on user
//! input; [`TimerEngine::prompt`] reports which one applies.
//!
//! ## Usage
//!
//! ```
//! use pomodash_core::timer::{Phase, TimerEngine};
//!
//! let mut engine = TimerEngine::new();
//! engine.set_task("Write report", None).unwrap();
//! engine.request_start().unwrap();
//! engine.tick();
//! assert_eq!(engine.phase(), Phase::Running);
//! ```

use std::fmt;

use chrono::Utc;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::duration::{format_clock, TimerConfig};
use super::session::{ActiveSession, Session, SessionLog};
use crate::error::TimerError;
use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Running,
    Paused,
    /// Countdown finished or ended early; waiting for a reflection.
    Completed,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Idle => "idle",
            Phase::Running => "running",
            Phase::Paused => "paused",
            Phase::Completed => "completed",
        };
        f.write_str(name)
    }
}

/// User-initiated commands, used to describe rejected transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    SetTask,
    Start,
    Resume,
    Pause,
    EndEarly,
    Finalize,
    Reset,
    SetConfig,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::SetTask => "set task",
            Action::Start => "start",
            Action::Resume => "resume",
            Action::Pause => "pause",
            Action::EndEarly => "end early",
            Action::Finalize => "finalize",
            Action::Reset => "reset",
            Action::SetConfig => "change duration",
        };
        f.write_str(name)
    }
}

/// Input the presentation layer has to collect before the engine can move on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Prompt {
    TaskRequired,
    ReflectionRequired,
}

/// Read-only view of the engine for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub phase: Phase,
    pub seconds_remaining: u64,
    pub total_seconds: u64,
    pub duration_minutes: u32,
    pub cycle_number: u64,
    pub pending_task_description: String,
    pub active_session: Option<ActiveSession>,
    pub progress_fraction: f64,
    pub clock: String,
    pub prompt: Option<Prompt>,
    pub sessions_logged: usize,
    pub at: chrono::DateTime<Utc>,
}

/// Core timer engine.
///
/// Owns the countdown, the current cycle, and the log of finished sessions.
/// Every mutation goes through one of the command methods, each of which
/// either applies a single transition or leaves the engine untouched.
#[derive(Debug, Clone)]
pub struct TimerEngine {
    config: TimerConfig,
    phase: Phase,
    seconds_remaining: u64,
    cycle_number: u64,
    pending_task: String,
    pending_task_id: Option<String>,
    active_session: Option<ActiveSession>,
    /// Set when the countdown, rather than the user, ended the cycle.
    completed_naturally: bool,
    log: SessionLog,
}

impl TimerEngine {
    /// Create an engine with the default 25-minute duration.
    pub fn new() -> Self {
        Self::with_config(TimerConfig::default())
    }

    pub fn with_config(config: TimerConfig) -> Self {
        Self {
            config,
            phase: Phase::Idle,
            seconds_remaining: config.duration_secs(),
            cycle_number: 0,
            pending_task: String::new(),
            pending_task_id: None,
            active_session: None,
            completed_naturally: false,
            log: SessionLog::new(),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn seconds_remaining(&self) -> u64 {
        self.seconds_remaining
    }

    pub fn cycle_number(&self) -> u64 {
        self.cycle_number
    }

    pub fn pending_task(&self) -> &str {
        &self.pending_task
    }

    pub fn active_session(&self) -> Option<&ActiveSession> {
        self.active_session.as_ref()
    }

    pub fn config(&self) -> TimerConfig {
        self.config
    }

    pub fn session_log(&self) -> &SessionLog {
        &self.log
    }

    pub fn total_secs(&self) -> u64 {
        self.config.duration_secs()
    }

    /// 0.0 .. 1.0 share of the cycle already elapsed. Presentation only.
    pub fn progress_fraction(&self) -> f64 {
        let total = self.total_secs();
        if total == 0 {
            return 0.0;
        }
        let elapsed = total.saturating_sub(self.seconds_remaining);
        (elapsed as f64 / total as f64).clamp(0.0, 1.0)
    }

    pub fn prompt(&self) -> Option<Prompt> {
        match self.phase {
            Phase::Idle if self.pending_task.is_empty() => Some(Prompt::TaskRequired),
            Phase::Completed => Some(Prompt::ReflectionRequired),
            _ => None,
        }
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            phase: self.phase,
            seconds_remaining: self.seconds_remaining,
            total_seconds: self.total_secs(),
            duration_minutes: self.config.duration_minutes(),
            cycle_number: self.cycle_number,
            pending_task_description: self.pending_task.clone(),
            active_session: self.active_session.clone(),
            progress_fraction: self.progress_fraction(),
            clock: format_clock(self.seconds_remaining),
            prompt: self.prompt(),
            sessions_logged: self.log.len(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Capture the task the next cycle will work on.
    pub fn set_task(
        &mut self,
        description: &str,
        task_id: Option<String>,
    ) -> Result<Event, TimerError> {
        if self.phase != Phase::Idle {
            return Err(self.reject(Action::SetTask));
        }
        let description = description.trim();
        if description.is_empty() {
            return Err(TimerError::TaskRequired);
        }
        self.pending_task = description.to_string();
        self.pending_task_id = task_id.clone();
        debug!("task captured: {description:?}");
        Ok(Event::TaskCaptured {
            task_description: self.pending_task.clone(),
            task_id,
            at: Utc::now(),
        })
    }

    /// Begin a new cycle from `Idle`, or resume from `Paused`.
    pub fn request_start(&mut self) -> Result<Event, TimerError> {
        match self.phase {
            Phase::Idle => {
                if self.pending_task.is_empty() {
                    return Err(TimerError::TaskRequired);
                }
                let now = Utc::now();
                self.cycle_number += 1;
                let session = ActiveSession {
                    id: Uuid::new_v4().to_string(),
                    cycle_number: self.cycle_number,
                    start_time: now,
                    task_description: self.pending_task.clone(),
                    task_id: self.pending_task_id.clone(),
                };
                let event = Event::CycleStarted {
                    cycle_number: self.cycle_number,
                    session_id: session.id.clone(),
                    task_description: session.task_description.clone(),
                    duration_secs: self.total_secs(),
                    at: now,
                };
                self.active_session = Some(session);
                self.seconds_remaining = self.total_secs();
                self.completed_naturally = false;
                self.phase = Phase::Running;
                info!(
                    "cycle {} started: {:?} ({} min)",
                    self.cycle_number,
                    self.pending_task,
                    self.config.duration_minutes()
                );
                Ok(event)
            }
            Phase::Paused => self.resume(),
            Phase::Running | Phase::Completed => Err(self.reject(Action::Start)),
        }
    }

    pub fn resume(&mut self) -> Result<Event, TimerError> {
        if self.phase != Phase::Paused {
            return Err(self.reject(Action::Resume));
        }
        self.phase = Phase::Running;
        debug!("resumed with {}s remaining", self.seconds_remaining);
        Ok(Event::TimerResumed {
            seconds_remaining: self.seconds_remaining,
            at: Utc::now(),
        })
    }

    pub fn pause(&mut self) -> Result<Event, TimerError> {
        if self.phase != Phase::Running {
            return Err(self.reject(Action::Pause));
        }
        self.phase = Phase::Paused;
        debug!("paused with {}s remaining", self.seconds_remaining);
        Ok(Event::TimerPaused {
            seconds_remaining: self.seconds_remaining,
            at: Utc::now(),
        })
    }

    /// Advance the countdown by one second.
    ///
    /// Returns `Some(Event::TimerCompleted)` exactly once per cycle, on the
    /// tick that reaches zero. Ticks outside `Running` are ignored.
    pub fn tick(&mut self) -> Option<Event> {
        if self.phase != Phase::Running || self.seconds_remaining == 0 {
            return None;
        }
        self.seconds_remaining -= 1;
        if self.seconds_remaining == 0 {
            return Some(self.complete(false));
        }
        Some(Event::Tick {
            seconds_remaining: self.seconds_remaining,
            at: Utc::now(),
        })
    }

    /// Stop the cycle before the countdown reaches zero.
    pub fn end_early(&mut self) -> Result<Event, TimerError> {
        match self.phase {
            Phase::Running | Phase::Paused => Ok(self.complete(true)),
            Phase::Idle | Phase::Completed => Err(self.reject(Action::EndEarly)),
        }
    }

    /// Record the reflection for a completed cycle and log it.
    pub fn finalize_session(&mut self, reflection: &str) -> Result<Event, TimerError> {
        if self.phase != Phase::Completed {
            return Err(self.reject(Action::Finalize));
        }
        let reflection = reflection.trim();
        if reflection.is_empty() {
            return Err(TimerError::ReflectionRequired);
        }
        let Some(active) = self.active_session.take() else {
            return Err(self.reject(Action::Finalize));
        };

        let end_time = Utc::now();
        let session = Session {
            id: active.id,
            cycle_number: active.cycle_number,
            start_time: active.start_time,
            end_time,
            elapsed_seconds: self.total_secs().saturating_sub(self.seconds_remaining),
            task_description: active.task_description,
            reflection: reflection.to_string(),
            task_id: active.task_id,
            duration_minutes: self.config.duration_minutes(),
            completed_naturally: self.completed_naturally,
        };
        info!(
            "cycle {} logged: {}s elapsed",
            session.cycle_number, session.elapsed_seconds
        );
        self.log.append(session.clone());

        self.pending_task.clear();
        self.pending_task_id = None;
        self.seconds_remaining = self.total_secs();
        self.completed_naturally = false;
        self.phase = Phase::Idle;
        Ok(Event::SessionLogged {
            session,
            at: end_time,
        })
    }

    /// Return to `Idle`, dropping any unlogged session.
    ///
    /// Rejected while `Running`; pause or end the cycle first.
    pub fn reset(&mut self) -> Result<Event, TimerError> {
        if self.phase == Phase::Running {
            return Err(self.reject(Action::Reset));
        }
        let discarded = self.active_session.take();
        if let Some(session) = &discarded {
            info!("cycle {} discarded without logging", session.cycle_number);
        }
        self.phase = Phase::Idle;
        self.seconds_remaining = self.total_secs();
        self.completed_naturally = false;
        Ok(Event::TimerReset {
            discarded: discarded.is_some(),
            at: Utc::now(),
        })
    }

    /// Change the cycle duration. Only allowed while `Idle`.
    pub fn set_config(&mut self, duration_minutes: u32) -> Result<Event, TimerError> {
        if self.phase != Phase::Idle {
            return Err(self.reject(Action::SetConfig));
        }
        self.config = TimerConfig::new(duration_minutes)?;
        self.seconds_remaining = self.total_secs();
        debug!("duration set to {duration_minutes} min");
        Ok(Event::ConfigChanged {
            duration_minutes,
            at: Utc::now(),
        })
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn complete(&mut self, ended_early: bool) -> Event {
        self.phase = Phase::Completed;
        self.completed_naturally = !ended_early;
        info!(
            "cycle {} completed ({}s remaining, ended_early={ended_early})",
            self.cycle_number, self.seconds_remaining
        );
        Event::TimerCompleted {
            cycle_number: self.cycle_number,
            seconds_remaining: self.seconds_remaining,
            ended_early,
            at: Utc::now(),
        }
    }

    fn reject(&self, action: Action) -> TimerError {
        debug!("rejected {action} while {}", self.phase);
        TimerError::InvalidTransition {
            action,
            phase: self.phase,
        }
    }
}

impl Default for TimerEngine {
    fn default() -> Self {
        Self::new()
    }
}
