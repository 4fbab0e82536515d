//! Hardware tick timer setup.
//!
//! The scheduler needs one periodic interrupt at `TimerConfig::tick_hz`.
//! Register access belongs to the platform HAL, behind [`TickTimer`]; this
//! module only works out the prescaler and TOP value that produce the rate.

use crate::config::TimerConfig;
use crate::error::{Result, SchedulerError};

/// Prescalers of the ATmega328P Timer2 (TCCR2B CS22:0).
pub const AVR_TIMER2_PRESCALERS: [u16; 7] = [1, 8, 32, 64, 128, 256, 1024];

/// TOP limit of an 8-bit counter.
pub const EIGHT_BIT_TOP: u16 = u8::MAX as u16;

/// Prescaler and TOP register value for a periodic interrupt.
///
/// The counter runs at `cpu_hz / prescaler` and wraps after `top + 1` counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimerPlan {
    /// Clock divider applied before the counter.
    pub prescaler: u16,
    /// Value the counter resets after reaching.
    pub top: u16,
}

impl TimerPlan {
    /// Pick the smallest prescaler whose rounded count fits under `max_top`.
    ///
    /// The smallest prescaler gives the finest rate resolution.
    ///
    /// # Errors
    ///
    /// [`SchedulerError::RateUnreachable`] if no prescaler fits, or if either
    /// rate is zero.
    pub fn for_rate(cpu_hz: u32, tick_hz: u32, prescalers: &[u16], max_top: u16) -> Result<Self> {
        if cpu_hz == 0 || tick_hz == 0 {
            return Err(SchedulerError::RateUnreachable { tick_hz }.into());
        }

        for &prescaler in prescalers {
            if prescaler == 0 {
                continue;
            }
            let divisor = prescaler as u64 * tick_hz as u64;
            let counts = (cpu_hz as u64 + divisor / 2) / divisor;
            if counts >= 1 && counts <= max_top as u64 + 1 {
                return Ok(Self {
                    prescaler,
                    top: (counts - 1) as u16,
                });
            }
        }

        Err(SchedulerError::RateUnreachable { tick_hz }.into())
    }

    /// Interrupt rate this plan actually produces, rounded down.
    pub fn actual_hz(&self, cpu_hz: u32) -> u32 {
        let counts = self.prescaler as u64 * (self.top as u64 + 1);
        if counts == 0 {
            return 0;
        }
        (cpu_hz as u64 / counts) as u32
    }
}

/// A platform timer that can fire a periodic interrupt.
///
/// The implementation programs the registers (mode, prescaler, TOP) and
/// enables the interrupt whose handler calls
/// [`TickScheduler::dispatch`](super::TickScheduler::dispatch).
pub trait TickTimer {
    /// Platform error type.
    type Error: core::fmt::Debug;

    /// Prescalers the hardware supports, ascending.
    fn prescalers(&self) -> &[u16];

    /// Largest TOP value the counter accepts.
    fn max_top(&self) -> u16;

    /// Program and start the periodic interrupt.
    fn start_periodic(&mut self, plan: &TimerPlan) -> core::result::Result<(), Self::Error>;
}

/// Compute a plan for `config` and start `timer` with it.
///
/// # Errors
///
/// [`SchedulerError::RateUnreachable`] if the hardware cannot produce the
/// rate, [`SchedulerError::TimerStart`] if the platform rejects the plan.
pub fn configure<T: TickTimer>(timer: &mut T, config: &TimerConfig) -> Result<TimerPlan> {
    let plan = TimerPlan::for_rate(config.cpu_hz, config.tick_hz, timer.prescalers(), timer.max_top())?;

    timer
        .start_periodic(&plan)
        .map_err(|_| SchedulerError::TimerStart)?;

    info!(
        "tick timer: prescaler {=u16}, top {=u16}, {=u32} Hz",
        plan.prescaler,
        plan.top,
        plan.actual_hz(config.cpu_hz)
    );
    Ok(plan)
}
