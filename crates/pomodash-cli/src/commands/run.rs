use std::error::Error;

use clap::Args;
use log::{info, warn};
use pomodash_core::{Config, Event, TimerConfig, TimerDriver, TimerEngine, TimerError};
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::{RecvError, TryRecvError};

use crate::shell::{parse_line, ShellCommand, HELP};

#[derive(Args)]
pub struct RunArgs {
    /// Cycle duration in minutes (overrides the configured default)
    #[arg(long)]
    duration: Option<u32>,
    /// Print every countdown tick
    #[arg(long)]
    verbose_ticks: bool,
}

#[derive(Serialize)]
struct Rejection<'a> {
    error: String,
    kind: &'a str,
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn Error>> {
    let config = Config::load()?;
    let timer_config = match args.duration {
        Some(minutes) => TimerConfig::new(minutes)?,
        None => config.timer_config()?,
    };
    let verbose_ticks = args.verbose_ticks || config.cli.verbose_ticks;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let engine = TimerEngine::with_config(timer_config);
    let result = runtime.block_on(session(
        TimerDriver::new(engine, config.tick_interval()?),
        verbose_ticks,
    ));
    // A stdin read may still be parked on the blocking pool.
    runtime.shutdown_background();
    result
}

async fn session(driver: TimerDriver, verbose_ticks: bool) -> Result<(), Box<dyn Error>> {
    let mut events = driver.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    info!("session started");
    print_json(&Event::StateSnapshot(driver.snapshot().await))?;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match parse_line(&line) {
                    Ok(None) => {}
                    Ok(Some(ShellCommand::Quit)) => break,
                    Ok(Some(command)) => execute(&driver, command).await?,
                    Err(message) => print_json(&Rejection { error: message, kind: "input" })?,
                }
            }
            event = events.recv() => match event {
                Ok(event) => print_event(&event, verbose_ticks)?,
                Err(RecvError::Lagged(skipped)) => warn!("dropped {skipped} events"),
                Err(RecvError::Closed) => break,
            },
        }
    }

    driver.shutdown().await;
    loop {
        match events.try_recv() {
            Ok(event) => print_event(&event, verbose_ticks)?,
            Err(TryRecvError::Lagged(_)) => {}
            Err(_) => break,
        }
    }
    info!("session ended");
    Ok(())
}

async fn execute(driver: &TimerDriver, command: ShellCommand) -> Result<(), Box<dyn Error>> {
    // Accepted commands are echoed through the event stream.
    let outcome = match command {
        ShellCommand::Task(text) => driver.set_task(&text, None).await,
        ShellCommand::Start => driver.request_start().await,
        ShellCommand::Resume => driver.resume().await,
        ShellCommand::Pause => driver.pause().await,
        ShellCommand::End => driver.end_early().await,
        ShellCommand::Finish(text) => driver.finalize_session(&text).await,
        ShellCommand::Reset => driver.reset().await,
        ShellCommand::Duration(minutes) => driver.set_config(minutes).await,
        ShellCommand::Status => {
            return print_json(&Event::StateSnapshot(driver.snapshot().await));
        }
        ShellCommand::Log => {
            let log = driver.session_log().await;
            let newest_first: Vec<_> = log.most_recent_first().collect();
            return print_json(&newest_first);
        }
        ShellCommand::Summary => {
            return print_json(&driver.session_log().await.summary());
        }
        ShellCommand::Export(path) => {
            let log = driver.session_log().await;
            // Write failures are reported and the session continues.
            if let Err(e) = std::fs::write(&path, serde_json::to_string_pretty(&log)?) {
                warn!("export to {} failed: {e}", path.display());
                return print_json(&Rejection {
                    error: format!("cannot write {}: {e}", path.display()),
                    kind: "io",
                });
            }
            info!("exported {} sessions to {}", log.len(), path.display());
            return print_json(&serde_json::json!({
                "exported": log.len(),
                "path": path.display().to_string(),
            }));
        }
        ShellCommand::Help => {
            println!("{HELP}");
            return Ok(());
        }
        ShellCommand::Quit => return Ok(()),
    };

    match outcome {
        Ok(_) => Ok(()),
        Err(err) => print_rejection(&err),
    }
}

fn print_rejection(err: &TimerError) -> Result<(), Box<dyn Error>> {
    let kind = if err.is_validation() { "validation" } else { "transition" };
    print_json(&Rejection {
        error: err.to_string(),
        kind,
    })
}

fn print_event(event: &Event, verbose_ticks: bool) -> Result<(), Box<dyn Error>> {
    if event.is_tick() && !verbose_ticks {
        return Ok(());
    }
    print_json(event)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
