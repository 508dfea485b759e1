//! Periodic tick source for the timer engine.
//!
//! [`TimerDriver`] owns the engine and a tokio interval task. The task exists
//! only while the engine is `Running`: every command is followed by a
//! reconciliation step that spawns the ticker on entry to `Running` and aborts
//! it on exit, so repeated pause/resume cycles never stack up sources.

use std::sync::Arc;
use std::time::Duration;

use log::debug;
use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::error::TimerError;
use crate::events::Event;
use crate::timer::{Phase, SessionLog, TimerEngine, TimerSnapshot};

const EVENT_CAPACITY: usize = 256;

pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Clone)]
pub struct TimerDriver {
    engine: Arc<Mutex<TimerEngine>>,
    ticker: Arc<Mutex<Option<JoinHandle<()>>>>,
    events: broadcast::Sender<Event>,
    tick_interval: Duration,
}

impl TimerDriver {
    pub fn new(engine: TimerEngine, tick_interval: Duration) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            engine: Arc::new(Mutex::new(engine)),
            ticker: Arc::new(Mutex::new(None)),
            events,
            tick_interval,
        }
    }

    /// Receive every event the engine produces, including ticker output.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.events.subscribe()
    }

    pub async fn snapshot(&self) -> TimerSnapshot {
        self.engine.lock().await.snapshot()
    }

    pub async fn phase(&self) -> Phase {
        self.engine.lock().await.phase()
    }

    pub async fn session_log(&self) -> SessionLog {
        self.engine.lock().await.session_log().clone()
    }

    /// Whether a periodic source is currently alive.
    pub async fn is_ticking(&self) -> bool {
        self.ticker
            .lock()
            .await
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub async fn set_task(
        &self,
        description: &str,
        task_id: Option<String>,
    ) -> Result<Event, TimerError> {
        self.apply(|engine| engine.set_task(description, task_id))
            .await
    }

    pub async fn request_start(&self) -> Result<Event, TimerError> {
        self.apply(TimerEngine::request_start).await
    }

    pub async fn resume(&self) -> Result<Event, TimerError> {
        self.apply(TimerEngine::resume).await
    }

    pub async fn pause(&self) -> Result<Event, TimerError> {
        self.apply(TimerEngine::pause).await
    }

    pub async fn end_early(&self) -> Result<Event, TimerError> {
        self.apply(TimerEngine::end_early).await
    }

    pub async fn finalize_session(&self, reflection: &str) -> Result<Event, TimerError> {
        self.apply(|engine| engine.finalize_session(reflection))
            .await
    }

    pub async fn reset(&self) -> Result<Event, TimerError> {
        self.apply(TimerEngine::reset).await
    }

    pub async fn set_config(&self, duration_minutes: u32) -> Result<Event, TimerError> {
        self.apply(|engine| engine.set_config(duration_minutes))
            .await
    }

    /// Stop the periodic source regardless of phase.
    pub async fn shutdown(&self) {
        if let Some(handle) = self.ticker.lock().await.take() {
            handle.abort();
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    async fn apply<F>(&self, command: F) -> Result<Event, TimerError>
    where
        F: FnOnce(&mut TimerEngine) -> Result<Event, TimerError>,
    {
        let result = {
            let mut engine = self.engine.lock().await;
            command(&mut engine)
        };
        if let Ok(event) = &result {
            // No subscribers is fine.
            let _ = self.events.send(event.clone());
        }
        self.sync_ticker().await;
        result
    }

    /// Make the ticker's existence match `phase == Running`.
    async fn sync_ticker(&self) {
        let mut ticker = self.ticker.lock().await;
        let running = self.engine.lock().await.phase() == Phase::Running;
        let live = ticker.as_ref().is_some_and(|handle| !handle.is_finished());

        match (running, live) {
            (true, true) | (false, false) => {}
            (true, false) => {
                if let Some(finished) = ticker.take() {
                    finished.abort();
                }
                *ticker = Some(self.spawn_ticker());
                debug!("tick source started ({:?})", self.tick_interval);
            }
            (false, true) => {
                if let Some(handle) = ticker.take() {
                    handle.abort();
                }
                debug!("tick source stopped");
            }
        }
    }

    fn spawn_ticker(&self) -> JoinHandle<()> {
        let engine = self.engine.clone();
        let events = self.events.clone();
        let period = self.tick_interval;

        tokio::spawn(async move {
            // `interval` would fire immediately; the first tick is due one
            // period after the source starts.
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;

                let (event, still_running) = {
                    let mut guard = engine.lock().await;
                    if guard.phase() != Phase::Running {
                        debug!("tick source outlived running phase; exiting");
                        break;
                    }
                    let event = guard.tick();
                    (event, guard.phase() == Phase::Running)
                };

                if let Some(event) = event {
                    let _ = events.send(event);
                }
                if !still_running {
                    debug!("countdown reached zero; tick source exiting");
                    break;
                }
            }
        })
    }
}
