//! Builder pattern for Axis.

use core::num::NonZeroU8;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::config::timing::REFERENCE_CPU_HZ;
use crate::config::{AxisConfig, PositionLimits, SetupTiming, SystemConfig};
use crate::error::{ConfigError, Error, Result};

use super::driver::Axis;

/// Builder for creating Axis instances.
pub struct AxisBuilder<STEP, DIR, DELAY>
where
    STEP: OutputPin,
    DIR: OutputPin,
    DELAY: DelayNs,
{
    step_pin: Option<STEP>,
    dir_pin: Option<DIR>,
    delay: Option<DELAY>,
    name: Option<heapless::String<32>>,
    tick_divisor: NonZeroU8,
    limits: PositionLimits,
    invert_direction: bool,
    setup: SetupTiming,
    cpu_hz: u32,
}

impl<STEP, DIR, DELAY> Default for AxisBuilder<STEP, DIR, DELAY>
where
    STEP: OutputPin,
    DIR: OutputPin,
    DELAY: DelayNs,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<STEP, DIR, DELAY> AxisBuilder<STEP, DIR, DELAY>
where
    STEP: OutputPin,
    DIR: OutputPin,
    DELAY: DelayNs,
{
    /// Create a new builder for the reference DRV8825 / 16 MHz setup.
    pub fn new() -> Self {
        Self {
            step_pin: None,
            dir_pin: None,
            delay: None,
            name: None,
            tick_divisor: NonZeroU8::MIN,
            limits: PositionLimits::FULL,
            invert_direction: false,
            setup: SetupTiming::DRV8825,
            cpu_hz: REFERENCE_CPU_HZ,
        }
    }

    /// Set the STEP pin.
    pub fn step_pin(mut self, pin: STEP) -> Self {
        self.step_pin = Some(pin);
        self
    }

    /// Set the DIR pin.
    pub fn dir_pin(mut self, pin: DIR) -> Self {
        self.dir_pin = Some(pin);
        self
    }

    /// Set the delay provider used for setup-time padding.
    pub fn delay(mut self, delay: DELAY) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Set the axis name.
    pub fn name(mut self, name: &str) -> Self {
        self.name = heapless::String::try_from(name).ok();
        self
    }

    /// Set how many dispatches make one unit of work.
    pub fn tick_divisor(mut self, divisor: NonZeroU8) -> Self {
        self.tick_divisor = divisor;
        self
    }

    /// Set position limits.
    pub fn limits(mut self, limits: PositionLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Set direction inversion.
    pub fn invert_direction(mut self, invert: bool) -> Self {
        self.invert_direction = invert;
        self
    }

    /// Set the driver's DIR-to-STEP setup requirement.
    pub fn setup_timing(mut self, setup: SetupTiming) -> Self {
        self.setup = setup;
        self
    }

    /// Set the CPU clock the setup padding is computed for.
    pub fn cpu_hz(mut self, cpu_hz: u32) -> Self {
        self.cpu_hz = cpu_hz;
        self
    }

    /// Configure from an AxisConfig.
    pub fn from_axis_config(mut self, config: &AxisConfig) -> Self {
        self.name = Some(config.name.clone());
        self.tick_divisor = config.tick_divisor;
        self.limits = config.limits();
        self.invert_direction = config.invert_direction;
        self
    }

    /// Configure from SystemConfig by axis name.
    ///
    /// Takes the axis entry plus the system-wide clock and setup timing.
    pub fn from_config(self, config: &SystemConfig, axis_name: &str) -> Result<Self> {
        let axis_config = config.axis(axis_name).ok_or_else(|| {
            Error::Config(ConfigError::AxisNotFound(
                heapless::String::try_from(axis_name).unwrap_or_default(),
            ))
        })?;

        Ok(self
            .from_axis_config(axis_config)
            .setup_timing(config.setup)
            .cpu_hz(config.timer.cpu_hz))
    }

    /// Build the Axis.
    ///
    /// # Errors
    ///
    /// Returns an error if a pin or the delay is missing, or if the limits are
    /// inverted.
    pub fn build(self) -> Result<Axis<STEP, DIR, DELAY>> {
        let step_pin = self
            .step_pin
            .ok_or(Error::Config(ConfigError::MissingField("step_pin")))?;

        let dir_pin = self
            .dir_pin
            .ok_or(Error::Config(ConfigError::MissingField("dir_pin")))?;

        let delay = self
            .delay
            .ok_or(Error::Config(ConfigError::MissingField("delay")))?;

        if !self.limits.is_valid() {
            return Err(Error::Config(ConfigError::InvalidLimits {
                min: self.limits.min,
                max: self.limits.max,
            }));
        }

        let name = self
            .name
            .unwrap_or_else(|| heapless::String::try_from("axis").unwrap_or_default());

        let padding = self.setup.padding_ns(self.cpu_hz);
        if padding > 0 {
            warn!(
                "axis {=str}: padding DIR-to-STEP setup by {=u32} ns",
                name.as_str(),
                padding
            );
        }

        Ok(Axis::new(
            step_pin,
            dir_pin,
            delay,
            name,
            self.limits,
            self.tick_divisor,
            self.invert_direction,
            padding,
        ))
    }
}
