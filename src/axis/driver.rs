//! Interrupt-driven step/direction axis.
//!
//! Generic over embedded-hal 1.0 pin and delay types.

use core::num::NonZeroU8;
use core::sync::atomic::{compiler_fence, Ordering};

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::config::PositionLimits;
use crate::error::{AxisError, Result};
use crate::scheduler::Tickable;
use crate::sync::{InterruptContext, InterruptGuard, IsrCell};

use super::state::{AxisStatus, Direction};

/// State that only the tick touches.
struct Outputs<STEP, DIR, DELAY> {
    step_pin: STEP,
    dir_pin: DIR,
    delay: DELAY,
    tick_count: u8,
    pulse_high: bool,
    invert_direction: bool,
    setup_padding_ns: u32,
}

/// One stepper motor driven from the scheduler tick.
///
/// Generic over:
/// - `STEP`: STEP pin type (must implement `OutputPin`)
/// - `DIR`: DIR pin type (must implement `OutputPin`)
/// - `DELAY`: Delay provider for setup-time padding (must implement `DelayNs`)
///
/// Commands (`absolute_move`, `stop`, ...) run in normal context and, apart
/// from `set_home`, only write the target. The [`Tickable::tick`]
/// implementation runs in the timer interrupt and converges the position on
/// the target one step at a time: one eligible tick sets DIR and raises STEP,
/// the next lowers STEP.
pub struct Axis<STEP, DIR, DELAY>
where
    STEP: OutputPin,
    DIR: OutputPin,
    DELAY: DelayNs,
{
    /// Axis name for logging/debugging.
    name: heapless::String<32>,
    /// Written by the tick; normal context only under a guard.
    current: IsrCell<i32>,
    /// Written by commands under a guard; read by the tick.
    target: IsrCell<i32>,
    limits: IsrCell<PositionLimits>,
    tick_divisor: IsrCell<NonZeroU8>,
    faulted: IsrCell<bool>,
    outputs: IsrCell<Outputs<STEP, DIR, DELAY>>,
}

impl<STEP, DIR, DELAY> Axis<STEP, DIR, DELAY>
where
    STEP: OutputPin,
    DIR: OutputPin,
    DELAY: DelayNs,
{
    /// Create an axis at position 0 with target 0.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        step_pin: STEP,
        dir_pin: DIR,
        delay: DELAY,
        name: heapless::String<32>,
        limits: PositionLimits,
        tick_divisor: NonZeroU8,
        invert_direction: bool,
        setup_padding_ns: u32,
    ) -> Self {
        Self {
            name,
            current: IsrCell::new(0),
            target: IsrCell::new(0),
            limits: IsrCell::new(limits),
            tick_divisor: IsrCell::new(tick_divisor),
            faulted: IsrCell::new(false),
            outputs: IsrCell::new(Outputs {
                step_pin,
                dir_pin,
                delay,
                tick_count: 0,
                pulse_high: false,
                invert_direction,
                setup_padding_ns,
            }),
        }
    }

    /// Get the axis name.
    #[inline]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Move to an absolute position.
    ///
    /// Positions outside the limits are ignored without an error.
    pub fn absolute_move(&self, position: i32) {
        if !self.limits.get().contains(position as i64) {
            return;
        }
        self.target.set(position);
    }

    /// Move relative to the current target.
    ///
    /// The sum is formed in `i64`; a result outside the limits is ignored
    /// without an error.
    pub fn incremental_move(&self, delta: i32) {
        let limits = self.limits.get();
        let guard = InterruptGuard::acquire();
        let wanted = self.target.get_in(&guard) as i64 + delta as i64;
        if let Some(target) = limits.accept(wanted) {
            self.target.set_in(&guard, target);
        }
    }

    /// Wait for the axis to stop, then declare the current position 0.
    ///
    /// The target is left alone: an axis stopped at 100 is still targeting
    /// 100 afterwards and will step 100 more times. Blocks while moving.
    pub fn set_home(&self) {
        self.wait_until_stopped();
        self.current.set(0);
    }

    /// Wait for the axis to stop, then target position 0.
    ///
    /// Ignored, like any other move, if 0 is outside the limits.
    pub fn go_home(&self) {
        self.wait_until_stopped();
        self.absolute_move(0);
    }

    /// Cancel the move in progress by targeting the current position.
    ///
    /// Motion halts within one pulse: a raised STEP is still lowered.
    pub fn stop(&self) {
        let guard = InterruptGuard::acquire();
        let current = self.current.get_in(&guard);
        self.target.set_in(&guard, current);
    }

    /// Current position in steps.
    #[inline]
    pub fn current_position(&self) -> i32 {
        self.current.get()
    }

    /// Target position in steps.
    #[inline]
    pub fn target_position(&self) -> i32 {
        self.target.get()
    }

    /// Whether the current position equals the target.
    ///
    /// A cheap unsynchronized comparison runs first. Only when it reports
    /// equality are both fields re-read under one guard, so a torn read can
    /// never produce a false "stopped".
    pub fn is_stopped(&self) -> bool {
        if self.current.peek() != self.target.peek() {
            return false;
        }

        let guard = InterruptGuard::acquire();
        self.current.get_in(&guard) == self.target.get_in(&guard)
    }

    /// Spin until [`is_stopped`](Self::is_stopped) holds.
    ///
    /// No timeout, no yielding; only interrupts run while this spins.
    pub fn wait_until_stopped(&self) {
        while !self.is_stopped() {
            core::hint::spin_loop();
        }
    }

    /// Current position limits.
    pub fn limits(&self) -> PositionLimits {
        self.limits.get()
    }

    /// Replace the position limits.
    ///
    /// Current and target are not touched even if they fall outside the new
    /// limits; the limits only gate future commands. Inverted limits are
    /// ignored.
    pub fn set_limits(&self, limits: PositionLimits) {
        if limits.is_valid() {
            self.limits.set(limits);
        }
    }

    /// Number of dispatches per unit of work.
    pub fn tick_divisor(&self) -> NonZeroU8 {
        self.tick_divisor.get()
    }

    /// Change the number of dispatches per unit of work.
    pub fn set_tick_divisor(&self, divisor: NonZeroU8) {
        self.tick_divisor.set(divisor);
    }

    /// Runtime status.
    pub fn status(&self) -> AxisStatus {
        if self.faulted.get() {
            AxisStatus::Fault
        } else if self.is_stopped() {
            AxisStatus::Idle
        } else {
            AxisStatus::Moving
        }
    }

    /// Report a latched pin fault.
    ///
    /// # Errors
    ///
    /// [`AxisError::PinFault`] if a STEP or DIR write failed in the tick.
    pub fn check_fault(&self) -> Result<()> {
        if self.faulted.get() {
            warn!("axis {=str}: pin fault", self.name.as_str());
            return Err(AxisError::PinFault.into());
        }
        Ok(())
    }

    /// Resume ticking after a pin fault.
    ///
    /// The axis resumes stopped at its current position.
    pub fn clear_fault(&self) {
        if self.faulted.get() {
            self.stop();
            self.faulted.set(false);
            info!("axis {=str}: fault cleared", self.name.as_str());
        }
    }

    /// Take back the pins and delay provider.
    ///
    /// Consumes the axis, so it must no longer be registered.
    pub fn release(self) -> (STEP, DIR, DELAY) {
        let outputs = self.outputs.into_inner();
        (outputs.step_pin, outputs.dir_pin, outputs.delay)
    }

    /// Stop stepping after a failed pin write.
    fn halt(&self, cx: &InterruptContext) {
        self.faulted.isr_set(cx, true);
        self.target.isr_set(cx, self.current.isr_get(cx));
    }
}

impl<STEP, DIR, DELAY> Tickable for Axis<STEP, DIR, DELAY>
where
    STEP: OutputPin + Send,
    DIR: OutputPin + Send,
    DELAY: DelayNs + Send,
{
    fn tick(&self, cx: &InterruptContext) {
        if self.faulted.isr_get(cx) {
            return;
        }
        let divisor = self.tick_divisor.isr_get(cx).get();

        self.outputs.with_isr(cx, |out| {
            out.tick_count = out.tick_count.wrapping_add(1);
            if out.tick_count % divisor != 0 {
                return;
            }

            out.tick_count = 0;

            if out.pulse_high {
                // On failure STEP may still be high: retry after clear_fault.
                if out.step_pin.set_low().is_err() {
                    self.halt(cx);
                } else {
                    out.pulse_high = false;
                }
                return;
            }

            let current = self.current.isr_get(cx);
            let Some(direction) = Direction::toward(current, self.target.isr_get(cx)) else {
                return;
            };

            let dir_written = if direction.pin_high(out.invert_direction) {
                out.dir_pin.set_high()
            } else {
                out.dir_pin.set_low()
            };
            if dir_written.is_err() {
                self.halt(cx);
                return;
            }

            // DIR-to-STEP setup window: the bookkeeping below must stay
            // between the two pin writes.
            compiler_fence(Ordering::SeqCst);
            self.current.isr_set(cx, current + direction.sign());
            out.pulse_high = true;
            compiler_fence(Ordering::SeqCst);

            if out.setup_padding_ns > 0 {
                out.delay.delay_ns(out.setup_padding_ns);
            }

            if out.step_pin.set_high().is_err() {
                // No edge went out, so the step did not happen.
                self.current.isr_set(cx, current);
                out.pulse_high = false;
                self.halt(cx);
            }
        });
    }
}
