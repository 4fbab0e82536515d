//! Round-robin demo: two axes sharing one simulated timer.
//!
//! Builds both axes from TOML, registers them with a scheduler, then plays
//! the timer interrupt by calling `dispatch` in a loop. Pins and timer are
//! simulated, so this runs on the host.

use stepper_tick::config::parse_config;
use stepper_tick::scheduler::timer::{configure, AVR_TIMER2_PRESCALERS, EIGHT_BIT_TOP};
use stepper_tick::{
    AxisSystem, FatalSink, InterruptContext, OrFatal, Result, TickScheduler, TickTimer,
    TimerPlan,
};

/// Simulated output pin that counts rising edges.
#[derive(Default)]
struct SimPin {
    high: bool,
    rising_edges: u32,
}

impl embedded_hal::digital::ErrorType for SimPin {
    type Error = core::convert::Infallible;
}

impl embedded_hal::digital::OutputPin for SimPin {
    fn set_low(&mut self) -> core::result::Result<(), Self::Error> {
        self.high = false;
        Ok(())
    }

    fn set_high(&mut self) -> core::result::Result<(), Self::Error> {
        if !self.high {
            self.rising_edges += 1;
        }
        self.high = true;
        Ok(())
    }
}

/// Delay for demonstration.
struct SimDelay;

impl embedded_hal::delay::DelayNs for SimDelay {
    fn delay_ns(&mut self, _ns: u32) {
        // Simulated time does not advance here.
    }
}

/// Simulated 8-bit timer with the ATmega328P Timer2 prescalers.
struct SimTimer {
    plan: Option<TimerPlan>,
}

impl TickTimer for SimTimer {
    type Error = core::convert::Infallible;

    fn prescalers(&self) -> &[u16] {
        &AVR_TIMER2_PRESCALERS
    }

    fn max_top(&self) -> u16 {
        EIGHT_BIT_TOP
    }

    fn start_periodic(&mut self, plan: &TimerPlan) -> core::result::Result<(), Self::Error> {
        self.plan = Some(*plan);
        Ok(())
    }
}

/// Fatal sink that prints once and exits.
struct ExitSink;

impl FatalSink for ExitSink {
    fn fatal(&mut self, message: &str) -> ! {
        eprintln!("FATAL: {}", message);
        std::process::exit(1);
    }
}

fn main() -> Result<()> {
    println!("=== Round-Robin Tick Scheduler Example ===\n");

    let toml_content = r#"
[timer]
cpu_hz = 16000000
tick_hz = 64000

[axes.pan]
name = "pan"
min_position = -3200
max_position = 3200

[axes.tilt]
name = "tilt"
tick_divisor = 4
min_position = 0
max_position = 800
invert_direction = true
"#;

    let config = parse_config(toml_content)?;
    let timer_config = config.timer;
    let mut system: AxisSystem = AxisSystem::from_config(config)?;

    let mut timer = SimTimer { plan: None };
    let plan = configure(&mut timer, &timer_config)?;
    assert_eq!(timer.plan, Some(plan));
    println!(
        "Timer: prescaler {}, TOP {} -> {} Hz",
        plan.prescaler,
        plan.top,
        plan.actual_hz(timer_config.cpu_hz)
    );

    let pan = system.build_axis("pan", SimPin::default(), SimPin::default(), SimDelay)?;
    let tilt = system.build_axis("tilt", SimPin::default(), SimPin::default(), SimDelay)?;

    let scheduler: TickScheduler<'_> = TickScheduler::new();
    let slots = scheduler.capacity();
    for (name, divisor) in [("pan", 1u8), ("tilt", 4)] {
        println!(
            "  {}: up to {} steps/s",
            name,
            timer_config.max_step_rate_hz(slots, divisor)
        );
    }
    println!();

    let pan_slot = scheduler.register(&pan).or_fatal(&mut ExitSink);
    let tilt_slot = scheduler.register(&tilt).or_fatal(&mut ExitSink);

    // SAFETY: nothing else touches the axes while `main` plays the interrupt.
    let cx = unsafe { InterruptContext::assume() };

    pan.absolute_move(1600);
    tilt.absolute_move(200);
    // Outside the tilt limits: ignored.
    tilt.absolute_move(1000);

    let mut ticks: u64 = 0;
    while !(pan.is_stopped() && tilt.is_stopped()) {
        scheduler.dispatch(&cx);
        ticks += 1;
    }
    // One more round lowers any STEP left high.
    for _ in 0..slots * 4 {
        scheduler.dispatch(&cx);
    }

    let seconds = ticks as f64 / timer_config.tick_hz as f64;
    println!("Both axes stopped after {} ticks ({:.3} s)", ticks, seconds);
    println!("  pan:  position {}", pan.current_position());
    println!("  tilt: position {}", tilt.current_position());

    // 1600 + 2000 is past the pan limit: ignored.
    pan.incremental_move(2000);
    println!("\nAfter an out-of-range move, pan target stays {}", pan.target_position());

    pan_slot.cancel();
    tilt_slot.cancel();

    let (pan_step, _, _) = pan.release();
    let (tilt_step, tilt_dir, _) = tilt.release();
    println!("\nPin activity:");
    println!("  pan STEP rising edges:  {}", pan_step.rising_edges);
    println!("  tilt STEP rising edges: {}", tilt_step.rising_edges);
    println!("  tilt DIR high (inverted, increasing): {}", tilt_dir.high);

    Ok(())
}
