//! Configuration module for stepper-tick.
//!
//! Provides types for loading and validating axis and timer configurations
//! from TOML files (with `std` feature) or pre-parsed data.

mod axis;
mod limits;
mod system;
pub mod timing;
#[cfg(feature = "std")]
mod loader;
mod validation;

pub use axis::AxisConfig;
pub use limits::PositionLimits;
pub use system::{SystemConfig, MAX_CONFIGURED_AXES};
pub use timing::{SetupTiming, TimerConfig};
pub use validation::validate_config;

#[cfg(feature = "std")]
pub use loader::{load_config, parse_config, parse_config_for};
