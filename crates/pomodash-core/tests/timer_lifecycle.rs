//! Integration tests for complete timer cycles.
//!
//! These tests drive the engine through whole cycles, from task capture to
//! logging or discarding, and check what ends up in the session log.

use pomodash_core::{Event, Phase, Prompt, TimerConfig, TimerEngine, TimerError};

fn engine(minutes: u32) -> TimerEngine {
    TimerEngine::with_config(TimerConfig::new(minutes).unwrap())
}

#[test]
fn test_fifteen_minute_cycle_end_to_end() {
    let mut engine = engine(25);
    engine.set_config(15).unwrap();

    // No task captured yet: start is blocked.
    assert_eq!(engine.request_start(), Err(TimerError::TaskRequired));
    assert_eq!(engine.phase(), Phase::Idle);
    assert_eq!(engine.prompt(), Some(Prompt::TaskRequired));

    engine.set_task("Write report", None).unwrap();
    engine.request_start().unwrap();
    assert_eq!(engine.phase(), Phase::Running);
    assert_eq!(engine.seconds_remaining(), 900);

    for _ in 0..900 {
        engine.tick();
    }
    assert_eq!(engine.phase(), Phase::Completed);
    assert_eq!(engine.seconds_remaining(), 0);

    engine.finalize_session("Finished draft").unwrap();

    let log = engine.session_log();
    assert_eq!(log.len(), 1);
    let session = log.last().unwrap();
    assert_eq!(session.elapsed_seconds, 900);
    assert_eq!(session.task_description, "Write report");
    assert_eq!(session.reflection, "Finished draft");
    assert!(session.completed_naturally);
    assert_eq!(engine.phase(), Phase::Idle);
}

#[test]
fn test_pause_then_end_early_accounts_elapsed_time() {
    let mut engine = engine(25);
    engine.set_task("Deep work", None).unwrap();
    engine.request_start().unwrap();

    for _ in 0..300 {
        engine.tick();
    }
    assert_eq!(engine.seconds_remaining(), 1200);
    engine.pause().unwrap();
    engine.end_early().unwrap();
    engine.finalize_session("done").unwrap();

    let session = engine.session_log().last().unwrap();
    assert_eq!(session.elapsed_seconds, 300);
    assert_eq!(session.elapsed_minutes_rounded(), 5);
    assert!(!session.completed_naturally);
}

#[test]
fn test_cycle_numbers_increase_across_logged_and_reset_cycles() {
    let mut engine = engine(15);
    let mut numbers = Vec::new();

    // Cycle 1: logged.
    engine.set_task("one", None).unwrap();
    match engine.request_start().unwrap() {
        Event::CycleStarted { cycle_number, .. } => numbers.push(cycle_number),
        other => panic!("Expected CycleStarted, got {other:?}"),
    }
    engine.end_early().unwrap();
    engine.finalize_session("ok").unwrap();

    // Cycle 2: discarded.
    engine.set_task("two", None).unwrap();
    engine.request_start().unwrap();
    numbers.push(engine.cycle_number());
    engine.pause().unwrap();
    engine.reset().unwrap();

    // Resetting an idle engine does not count as a cycle.
    engine.reset().unwrap();
    assert_eq!(engine.cycle_number(), 2);

    // Cycle 3: reuses the task kept across the reset.
    engine.request_start().unwrap();
    numbers.push(engine.cycle_number());
    assert_eq!(engine.active_session().unwrap().task_description, "two");

    assert_eq!(numbers, vec![1, 2, 3]);
    assert_eq!(engine.session_log().len(), 1);
}

#[test]
fn test_rejected_reflection_keeps_prompt_open() {
    let mut engine = engine(20);
    engine.set_task("Review PR", Some("task-42".into())).unwrap();
    engine.request_start().unwrap();
    engine.end_early().unwrap();

    for input in ["", "   ", "\n\t"] {
        assert_eq!(
            engine.finalize_session(input),
            Err(TimerError::ReflectionRequired)
        );
        assert_eq!(engine.phase(), Phase::Completed);
        assert_eq!(engine.prompt(), Some(Prompt::ReflectionRequired));
    }
    assert!(engine.session_log().is_empty());

    engine.finalize_session("Left two comments").unwrap();
    let session = engine.session_log().last().unwrap();
    assert_eq!(session.task_id.as_deref(), Some("task-42"));
    assert_eq!(session.duration_minutes, 20);
}

#[test]
fn test_session_log_is_most_recent_first_for_display() {
    let mut engine = engine(15);
    for task in ["first", "second", "third"] {
        engine.set_task(task, None).unwrap();
        engine.request_start().unwrap();
        engine.tick();
        engine.end_early().unwrap();
        engine.finalize_session("noted").unwrap();
    }

    let tasks: Vec<&str> = engine
        .session_log()
        .most_recent_first()
        .map(|s| s.task_description.as_str())
        .collect();
    assert_eq!(tasks, vec!["third", "second", "first"]);

    let summary = engine.session_log().summary();
    assert_eq!(summary.count, 3);
    assert_eq!(summary.total_elapsed_seconds, 3);
}

#[test]
fn test_session_logged_event_serializes_with_type_tag() {
    let mut engine = engine(15);
    engine.set_task("Write report", None).unwrap();
    engine.request_start().unwrap();
    engine.end_early().unwrap();
    let event = engine.finalize_session("draft").unwrap();

    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(json["type"], "SessionLogged");
    assert_eq!(json["session"]["reflection"], "draft");
    assert_eq!(json["session"]["cycle_number"], 1);

    let snapshot = serde_json::to_value(Event::StateSnapshot(engine.snapshot())).unwrap();
    assert_eq!(snapshot["type"], "StateSnapshot");
    assert_eq!(snapshot["phase"], "idle");
    assert_eq!(snapshot["prompt"], "task_required");
}
