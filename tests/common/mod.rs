//! Shared test hardware.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use embedded_hal::digital::{ErrorType, OutputPin};
use stepper_tick::{Axis, AxisBuilder, FatalSink, PositionLimits};

/// Output pin that records every level written to it.
///
/// Clones share the record, so a test keeps one clone as a probe.
#[derive(Clone, Default)]
pub struct RecordingPin {
    levels: Arc<Mutex<Vec<bool>>>,
}

impl RecordingPin {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every level written so far, oldest first.
    pub fn levels(&self) -> Vec<bool> {
        self.levels.lock().unwrap().clone()
    }

    /// Number of writes.
    pub fn writes(&self) -> usize {
        self.levels.lock().unwrap().len()
    }

    /// Number of low-to-high transitions, starting from low.
    pub fn rising_edges(&self) -> usize {
        let mut previous = false;
        let mut edges = 0;
        for &level in self.levels.lock().unwrap().iter() {
            if level && !previous {
                edges += 1;
            }
            previous = level;
        }
        edges
    }

    /// Last level written, if any.
    pub fn last(&self) -> Option<bool> {
        self.levels.lock().unwrap().last().copied()
    }
}

impl ErrorType for RecordingPin {
    type Error = core::convert::Infallible;
}

impl OutputPin for RecordingPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.levels.lock().unwrap().push(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.levels.lock().unwrap().push(true);
        Ok(())
    }
}

/// Delay that does nothing.
pub struct NoDelay;

impl embedded_hal::delay::DelayNs for NoDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}

pub type TestAxis = Axis<RecordingPin, RecordingPin, NoDelay>;

/// Axis wired to fresh recording pins; returns the STEP and DIR probes.
pub fn axis(divisor: u8, limits: PositionLimits) -> (TestAxis, RecordingPin, RecordingPin) {
    let step = RecordingPin::new();
    let dir = RecordingPin::new();
    let axis = AxisBuilder::new()
        .name("test")
        .step_pin(step.clone())
        .dir_pin(dir.clone())
        .delay(NoDelay)
        .tick_divisor(core::num::NonZeroU8::new(divisor).unwrap())
        .limits(limits)
        .build()
        .unwrap();
    (axis, step, dir)
}

/// Fatal sink that turns the message into a test panic.
pub struct PanicSink;

impl FatalSink for PanicSink {
    fn fatal(&mut self, message: &str) -> ! {
        panic!("fatal: {}", message);
    }
}
