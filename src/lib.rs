//! # stepper-tick
//!
//! Interrupt-driven step/direction control for several stepper motors
//! sharing one hardware timer, with embedded-hal 1.0 support.
//!
//! ## Features
//!
//! - **One timer, many axes**: a fixed-capacity round-robin [`TickScheduler`]
//!   dispatches one axis per timer interrupt
//! - **embedded-hal 1.0**: Uses `OutputPin` for STEP/DIR, `DelayNs` for setup padding
//! - **no_std compatible**: Core library works without standard library
//! - **Non-blocking commands**: moves only set a target; the tick does the stepping
//! - **Position limits**: out-of-range commands are ignored
//! - **Configuration-driven**: Define the timer and axes in TOML files
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use stepper_tick::{AxisBuilder, InterruptContext, OrFatal, SerialSink, TickScheduler};
//!
//! static SCHEDULER: TickScheduler<'static> = TickScheduler::new();
//! static PAN: StaticCell<Axis<StepPin, DirPin, Delay>> = StaticCell::new();
//!
//! let pan = PAN.init(
//!     AxisBuilder::new()
//!         .name("pan")
//!         .step_pin(step_pin)
//!         .dir_pin(dir_pin)
//!         .delay(delay)
//!         .build()?,
//! );
//! SCHEDULER.register(pan).or_fatal(&mut SerialSink::new(uart)).leak();
//!
//! pan.absolute_move(3200);
//! pan.wait_until_stopped();
//!
//! #[interrupt]
//! fn TIMER2_COMPA() {
//!     // SAFETY: runs only inside the timer interrupt.
//!     let cx = unsafe { InterruptContext::assume() };
//!     SCHEDULER.dispatch(&cx);
//! }
//! ```
//!
//! ## Feature Flags
//!
//! - `std` (default): Enables file I/O and TOML parsing
//! - `defmt`: Enables defmt logging for embedded targets

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]
// Allow large error types - necessary for no_std with heapless strings
#![allow(clippy::result_large_err)]

// Must come first so the logging macros are visible everywhere.
#[macro_use]
mod fmt;

// Core modules
pub mod axis;
pub mod config;
pub mod error;
pub mod fatal;
pub mod scheduler;
#[allow(unsafe_code)]
pub mod sync;

// Re-exports for ergonomic API
pub use axis::{Axis, AxisBuilder, AxisStatus, AxisSystem, Direction};
pub use config::{validate_config, AxisConfig, PositionLimits, SetupTiming, SystemConfig, TimerConfig};
pub use error::{Error, Result};
pub use fatal::{FatalSink, OrFatal, SerialSink};
pub use scheduler::{Registration, TickScheduler, TickTimer, Tickable, TimerPlan};
pub use sync::{InterruptContext, InterruptGuard, IsrCell};

// Configuration loading (std only)
#[cfg(feature = "std")]
pub use config::{load_config, parse_config};
