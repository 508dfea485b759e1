//! # Pomodash Core Library
//!
//! Core logic for the Pomodash pomodoro timer: a countdown state machine with
//! a forced-reflection completion flow and an in-memory log of finished
//! sessions. The `pomodash` CLI is a thin host over this library.
//!
//! ## Architecture
//!
//! - **Timer Engine**: A pure state machine; the caller delivers `tick()`
//!   once per second while it is running
//! - **Tick Driver**: A tokio interval task that exists only while the engine
//!   is running, broadcasting every event
//! - **Storage**: TOML-based configuration (sessions are kept in memory only)
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: Core timer state machine
//! - [`TimerDriver`]: Periodic tick source and event broadcaster
//! - [`SessionLog`]: Append-only record of finished sessions
//! - [`Config`]: Application configuration management

pub mod driver;
pub mod error;
pub mod events;
pub mod storage;
pub mod timer;

pub use driver::{TimerDriver, DEFAULT_TICK_INTERVAL};
pub use error::{ConfigError, CoreError, TimerError};
pub use events::Event;
pub use storage::Config;
pub use timer::{
    ActiveSession, Phase, Prompt, Session, SessionLog, SessionSummary, TimerConfig, TimerEngine,
    TimerSnapshot,
};
