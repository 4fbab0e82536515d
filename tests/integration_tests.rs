//! Integration tests for stepper-tick.
//!
//! These drive axes through a real scheduler, the way the timer interrupt
//! would, from TOML configuration down to pin levels.

mod common;

use common::{axis, NoDelay, PanicSink, RecordingPin};
use stepper_tick::config::{parse_config, PositionLimits};
use stepper_tick::error::{Error, SchedulerError};
use stepper_tick::{AxisStatus, AxisSystem, InterruptContext, OrFatal, TickScheduler};

fn interrupt() -> InterruptContext {
    // SAFETY: every test drives its own axes from a single thread.
    unsafe { InterruptContext::assume() }
}

// =============================================================================
// Command scenarios
// =============================================================================

#[test]
fn out_of_range_absolute_move_is_ignored() {
    let (axis, step, _dir) = axis(1, PositionLimits::new(i32::MIN, 100));

    axis.absolute_move(150);

    assert_eq!(axis.target_position(), 0);
    assert!(axis.is_stopped());
    assert_eq!(step.writes(), 0);
}

#[test]
fn three_steps_take_six_ticks() {
    let (axis, step, dir) = axis(1, PositionLimits::FULL);
    let cx = interrupt();

    axis.absolute_move(3);
    for expected in 1..=3 {
        stepper_tick::Tickable::tick(&axis, &cx);
        stepper_tick::Tickable::tick(&axis, &cx);
        assert_eq!(axis.current_position(), expected);
    }

    assert!(axis.is_stopped());
    assert_eq!(step.levels(), vec![true, false, true, false, true, false]);
    // Increasing drives DIR low.
    assert_eq!(dir.levels(), vec![false, false, false]);
}

#[test]
fn divisor_two_acts_on_even_ticks() {
    let (axis, step, _dir) = axis(2, PositionLimits::FULL);
    let cx = interrupt();

    axis.absolute_move(1);

    stepper_tick::Tickable::tick(&axis, &cx);
    assert_eq!(step.writes(), 0);
    stepper_tick::Tickable::tick(&axis, &cx);
    assert_eq!(step.levels(), vec![true]);
    stepper_tick::Tickable::tick(&axis, &cx);
    assert_eq!(step.writes(), 1);
    stepper_tick::Tickable::tick(&axis, &cx);
    assert_eq!(step.levels(), vec![true, false]);

    assert_eq!(axis.current_position(), 1);
    assert!(axis.is_stopped());
}

#[test]
fn stop_mid_motion_emits_no_further_pulses() {
    let (axis, step, _dir) = axis(1, PositionLimits::FULL);
    let cx = interrupt();

    axis.absolute_move(50);
    while axis.current_position() < 23 {
        stepper_tick::Tickable::tick(&axis, &cx);
    }
    // Finish the pulse in flight.
    stepper_tick::Tickable::tick(&axis, &cx);
    assert_eq!(step.last(), Some(false));

    axis.stop();
    let edges = step.rising_edges();
    for _ in 0..10 {
        stepper_tick::Tickable::tick(&axis, &cx);
    }

    assert_eq!(step.rising_edges(), edges);
    assert!(axis.is_stopped());
    assert_eq!(axis.current_position(), 23);
    assert_eq!(axis.target_position(), 23);
}

#[test]
fn reversal_flips_direction_pin() {
    let (axis, _step, dir) = axis(1, PositionLimits::FULL);
    let cx = interrupt();

    axis.absolute_move(2);
    for _ in 0..4 {
        stepper_tick::Tickable::tick(&axis, &cx);
    }
    axis.absolute_move(0);
    for _ in 0..4 {
        stepper_tick::Tickable::tick(&axis, &cx);
    }

    assert_eq!(axis.current_position(), 0);
    assert_eq!(dir.levels(), vec![false, false, true, true]);
}

#[test]
fn set_home_then_go_home() {
    let (axis, _step, _dir) = axis(1, PositionLimits::FULL);
    let cx = interrupt();

    axis.incremental_move(5);
    while !axis.is_stopped() {
        stepper_tick::Tickable::tick(&axis, &cx);
    }
    // Lower the last pulse.
    stepper_tick::Tickable::tick(&axis, &cx);

    axis.set_home();
    assert_eq!(axis.current_position(), 0);
    assert_eq!(axis.target_position(), 5);

    // Walk the stale target out again, then return to the new zero.
    while !axis.is_stopped() {
        stepper_tick::Tickable::tick(&axis, &cx);
    }
    stepper_tick::Tickable::tick(&axis, &cx);
    assert_eq!(axis.current_position(), 5);

    axis.go_home();
    assert_eq!(axis.target_position(), 0);
    assert_eq!(axis.status(), AxisStatus::Moving);
}

#[test]
fn commands_and_queries_from_two_threads() {
    let (axis, _step, _dir) = axis(1, PositionLimits::FULL);

    // Every normal-context access, including the is_stopped fast path, goes
    // through the host critical section, so threads serialize.
    std::thread::scope(|s| {
        s.spawn(|| {
            for i in 1..=10_000 {
                axis.absolute_move(i);
            }
        });
        s.spawn(|| {
            for _ in 0..10_000 {
                let _ = axis.is_stopped();
                let _ = axis.current_position();
            }
        });
    });

    assert_eq!(axis.target_position(), 10_000);
    assert_eq!(axis.current_position(), 0);
    assert!(!axis.is_stopped());
}

// =============================================================================
// Scheduler
// =============================================================================

#[test]
fn scheduler_interleaves_axes() {
    let (a, step_a, _) = axis(1, PositionLimits::FULL);
    let (b, step_b, _) = axis(1, PositionLimits::FULL);
    let scheduler: TickScheduler<'_, 4> = TickScheduler::new();
    let cx = interrupt();

    let _ra = scheduler.register(&a).or_fatal(&mut PanicSink);
    let _rb = scheduler.register(&b).or_fatal(&mut PanicSink);

    a.absolute_move(10);
    b.absolute_move(-10);
    // Each occupied slot is serviced once per four dispatches.
    for _ in 0..4 * 2 * 10 {
        scheduler.dispatch(&cx);
    }

    assert_eq!(a.current_position(), 10);
    assert_eq!(b.current_position(), -10);
    assert_eq!(step_a.rising_edges(), 10);
    assert_eq!(step_b.rising_edges(), 10);
    assert!(a.is_stopped() && b.is_stopped());
}

#[test]
fn unregistered_axis_stops_stepping() {
    let (a, step, _) = axis(1, PositionLimits::FULL);
    let scheduler: TickScheduler<'_, 1> = TickScheduler::new();
    let cx = interrupt();

    let registration = scheduler.register(&a).or_fatal(&mut PanicSink);
    a.absolute_move(100);
    for _ in 0..10 {
        scheduler.dispatch(&cx);
    }
    registration.cancel();
    let writes = step.writes();

    for _ in 0..10 {
        scheduler.dispatch(&cx);
    }
    assert_eq!(step.writes(), writes);
    assert_eq!(a.current_position(), 5);
    assert!(!scheduler.unregister(&a));
}

#[test]
fn capacity_error_is_reported() {
    let axes = [
        axis(1, PositionLimits::FULL).0,
        axis(1, PositionLimits::FULL).0,
        axis(1, PositionLimits::FULL).0,
    ];
    let scheduler: TickScheduler<'_, 2> = TickScheduler::new();

    let _r0 = scheduler.register(&axes[0]).unwrap();
    let _r1 = scheduler.register(&axes[1]).unwrap();

    let err = scheduler.register(&axes[2]).err().unwrap();
    assert_eq!(err, Error::Scheduler(SchedulerError::CapacityExceeded { capacity: 2 }));
}

#[test]
#[should_panic(expected = "Exceeded maximum controllable stepper outputs (4)")]
fn fifth_axis_is_fatal() {
    let axes: Vec<_> = (0..5).map(|_| axis(1, PositionLimits::FULL).0).collect();
    let scheduler: TickScheduler<'_> = TickScheduler::new();

    for axis in &axes {
        scheduler.register(axis).or_fatal(&mut PanicSink).leak();
    }
}

// =============================================================================
// Configuration to motion
// =============================================================================

const CONFIG: &str = r#"
[timer]
cpu_hz = 16000000
tick_hz = 64000

[setup]
setup_ns = 650
guaranteed_cycles = 15

[axes.pan]
name = "Pan"
min_position = -100
max_position = 100

[axes.tilt]
name = "Tilt"
tick_divisor = 2
invert_direction = true
"#;

#[test]
fn config_to_motion() {
    let mut system: AxisSystem = AxisSystem::from_config(parse_config(CONFIG).unwrap()).unwrap();
    let (pan_step, pan_dir) = (RecordingPin::new(), RecordingPin::new());
    let (tilt_step, tilt_dir) = (RecordingPin::new(), RecordingPin::new());

    let pan = system
        .build_axis("pan", pan_step.clone(), pan_dir.clone(), NoDelay)
        .unwrap();
    let tilt = system
        .build_axis("tilt", tilt_step.clone(), tilt_dir.clone(), NoDelay)
        .unwrap();

    let scheduler: TickScheduler<'_> = TickScheduler::new();
    let cx = interrupt();
    let _rp = scheduler.register(&pan).or_fatal(&mut PanicSink);
    let _rt = scheduler.register(&tilt).or_fatal(&mut PanicSink);

    pan.absolute_move(1_000);
    assert_eq!(pan.target_position(), 0);
    pan.absolute_move(-3);
    tilt.absolute_move(3);

    for _ in 0..200 {
        scheduler.dispatch(&cx);
    }

    assert_eq!(pan.current_position(), -3);
    assert_eq!(tilt.current_position(), 3);
    assert_eq!(pan_dir.last(), Some(true));
    // Inverted: increasing drives DIR high.
    assert_eq!(tilt_dir.last(), Some(true));
    assert_eq!(pan_step.rising_edges(), 3);
    assert_eq!(tilt_step.rising_edges(), 3);
}

#[test]
fn rejected_config() {
    let config = r#"
[axes.bad]
name = "Bad"
min_position = 10
max_position = -10
"#;

    assert!(parse_config(config).is_err());
}
