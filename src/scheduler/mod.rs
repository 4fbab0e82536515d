//! Tick scheduler for stepper-tick.
//!
//! One hardware timer interrupt serves every axis. Each firing dispatches a
//! single registry slot, round-robin, so the time spent in the handler stays
//! short and evenly spread across firings.

mod registry;
pub mod timer;

pub use registry::{Registration, TickScheduler, DEFAULT_CAPACITY};
pub use timer::{configure, TickTimer, TimerPlan};

use crate::sync::InterruptContext;

/// Something the scheduler can advance by one tick.
///
/// Implementations run in interrupt context and must do a small, bounded
/// amount of work without blocking.
pub trait Tickable: Sync {
    /// Advance by one tick.
    fn tick(&self, cx: &InterruptContext);
}
