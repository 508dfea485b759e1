mod duration;
mod engine;
mod session;

pub use duration::{format_clock, TimerConfig, ALLOWED_DURATIONS, DEFAULT_DURATION_MINUTES};
pub use engine::{Action, Phase, Prompt, TimerEngine, TimerSnapshot};
pub use session::{ActiveSession, Session, SessionLog, SessionSummary};
