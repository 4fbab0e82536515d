//! Axis configuration from TOML.

use core::num::NonZeroU8;

use heapless::String;
use serde::Deserialize;

use super::limits::PositionLimits;

/// Complete axis configuration from TOML.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AxisConfig {
    /// Human-readable name (max 32 chars).
    pub name: String<32>,

    /// Number of scheduler dispatches per unit of work (1 = every dispatch).
    #[serde(default = "default_tick_divisor")]
    pub tick_divisor: NonZeroU8,

    /// Lowest allowed position in steps.
    #[serde(default = "default_min_position")]
    pub min_position: i32,

    /// Highest allowed position in steps.
    #[serde(default = "default_max_position")]
    pub max_position: i32,

    /// Swap the DIR pin polarity.
    #[serde(default)]
    pub invert_direction: bool,
}

fn default_tick_divisor() -> NonZeroU8 {
    NonZeroU8::MIN
}

fn default_min_position() -> i32 {
    i32::MIN
}

fn default_max_position() -> i32 {
    i32::MAX
}

impl AxisConfig {
    /// Create a configuration with full-range limits and divisor 1.
    pub fn new(name: &str) -> Self {
        Self {
            name: String::try_from(name).unwrap_or_default(),
            tick_divisor: NonZeroU8::MIN,
            min_position: i32::MIN,
            max_position: i32::MAX,
            invert_direction: false,
        }
    }

    /// Position bounds as a [`PositionLimits`].
    pub fn limits(&self) -> PositionLimits {
        PositionLimits::new(self.min_position, self.max_position)
    }
}
