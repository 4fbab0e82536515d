//! Axis module for stepper-tick.
//!
//! One [`Axis`] per motor: commands from normal context, stepping from the
//! scheduler tick.

mod builder;
mod driver;
pub mod state;
mod system;

pub use builder::AxisBuilder;
pub use driver::Axis;
pub use state::{AxisStatus, Direction};
pub use system::AxisSystem;
