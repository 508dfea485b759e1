//! Property tests for the countdown state machine.

use pomodash_core::timer::ALLOWED_DURATIONS;
use pomodash_core::{Event, Phase, TimerConfig, TimerEngine};
use proptest::prelude::*;

#[derive(Debug, Clone, Copy)]
enum Op {
    Tick,
    Pause,
    Start,
    EndEarly,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        8 => Just(Op::Tick),
        1 => Just(Op::Pause),
        1 => Just(Op::Start),
        1 => Just(Op::EndEarly),
    ]
}

fn running_engine(minutes: u32) -> TimerEngine {
    let mut engine = TimerEngine::with_config(TimerConfig::new(minutes).unwrap());
    engine.set_task("prop", None).unwrap();
    engine.request_start().unwrap();
    engine
}

proptest! {
    #[test]
    fn ticks_decrease_by_one_until_zero(
        minutes in prop::sample::select(ALLOWED_DURATIONS.to_vec()),
        extra in 0u64..50,
    ) {
        let mut engine = running_engine(minutes);
        let total = engine.seconds_remaining();
        for _ in 0..(total + extra) {
            let before = engine.seconds_remaining();
            let was_running = engine.phase() == Phase::Running;
            engine.tick();
            if was_running {
                prop_assert_eq!(engine.seconds_remaining(), before - 1);
            } else {
                prop_assert_eq!(before, 0);
                prop_assert_eq!(engine.seconds_remaining(), 0);
            }
        }
        prop_assert_eq!(engine.seconds_remaining(), 0);
        prop_assert_eq!(engine.phase(), Phase::Completed);
    }

    #[test]
    fn completion_fires_at_most_once_per_cycle(ops in prop::collection::vec(op(), 0..2_000)) {
        let mut engine = running_engine(15);
        let mut completions = 0;
        let mut last_remaining = engine.seconds_remaining();

        for op in ops {
            let phase = engine.phase();
            let event = match op {
                Op::Tick => engine.tick(),
                Op::Pause => engine.pause().ok(),
                Op::Start => engine.request_start().ok(),
                Op::EndEarly => engine.end_early().ok(),
            };
            if matches!(event, Some(Event::TimerCompleted { .. })) {
                completions += 1;
            }
            if phase != Phase::Running {
                // Frozen unless the op started a new cycle, which it cannot
                // do here: the cycle is never finalized or reset.
                prop_assert_eq!(engine.seconds_remaining(), last_remaining);
            }
            prop_assert!(engine.seconds_remaining() <= last_remaining);
            last_remaining = engine.seconds_remaining();
        }

        prop_assert!(completions <= 1);
        prop_assert_eq!(completions == 1, engine.phase() == Phase::Completed);
        prop_assert_eq!(engine.cycle_number(), 1);
    }

    #[test]
    fn blank_task_never_starts(blank in "[ \t\n]{0,8}") {
        let mut engine = TimerEngine::new();
        prop_assert!(engine.set_task(&blank, None).is_err());
        prop_assert!(engine.request_start().is_err());
        prop_assert_eq!(engine.phase(), Phase::Idle);
        prop_assert_eq!(engine.cycle_number(), 0);
    }

    #[test]
    fn blank_reflection_never_logs(blank in "[ \t\n]{0,8}", ticks in 0u32..100) {
        let mut engine = running_engine(15);
        for _ in 0..ticks {
            engine.tick();
        }
        engine.end_early().unwrap();
        prop_assert!(engine.finalize_session(&blank).is_err());
        prop_assert_eq!(engine.phase(), Phase::Completed);
        prop_assert!(engine.session_log().is_empty());
    }
}
