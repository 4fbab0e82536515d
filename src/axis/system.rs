//! Axis system facade for multi-axis configuration.
//!
//! Provides a high-level API for building every axis of a machine from a
//! single configuration sized for one [`TickScheduler`](crate::scheduler::TickScheduler).

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use heapless::{FnvIndexMap, String};

use crate::config::{validate_config, AxisConfig, SystemConfig, MAX_CONFIGURED_AXES};
use crate::error::Result;
use crate::scheduler::DEFAULT_CAPACITY;

use super::{Axis, AxisBuilder};

/// A facade for building axes from configuration.
///
/// The configuration is validated against the scheduler capacity `N` up
/// front, so every configured axis is guaranteed a slot.
///
/// # Example
///
/// ```rust,ignore
/// use stepper_tick::axis::AxisSystem;
///
/// let config = stepper_tick::config::parse_config(CONFIG_TOML)?;
/// let mut system: AxisSystem = AxisSystem::from_config(config)?;
///
/// let pan = system.build_axis("pan", step_pin_a, dir_pin_a, delay_a)?;
/// let tilt = system.build_axis("tilt", step_pin_b, dir_pin_b, delay_b)?;
///
/// SCHEDULER.register(&pan)?.leak();
/// ```
pub struct AxisSystem<const N: usize = DEFAULT_CAPACITY> {
    /// The system configuration.
    config: SystemConfig,
    /// Names of axes built so far (axes are owned by the caller due to generic types).
    built: FnvIndexMap<String<32>, (), MAX_CONFIGURED_AXES>,
}

impl<const N: usize> AxisSystem<N> {
    /// Create a system from a configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if [`validate_config`] rejects the configuration for a
    /// scheduler with `N` slots.
    pub fn from_config(config: SystemConfig) -> Result<Self> {
        validate_config(&config, N)?;
        Ok(Self {
            config,
            built: FnvIndexMap::new(),
        })
    }

    /// Get the system configuration.
    pub fn config(&self) -> &SystemConfig {
        &self.config
    }

    /// Get an axis configuration by name.
    pub fn axis_config(&self, name: &str) -> Option<&AxisConfig> {
        self.config.axis(name)
    }

    /// Check if an axis name exists in the configuration.
    pub fn has_axis(&self, name: &str) -> bool {
        self.config.axis(name).is_some()
    }

    /// List all configured axis names.
    pub fn axis_names(&self) -> impl Iterator<Item = &str> {
        self.config.axis_names()
    }

    /// Build a configured axis with its hardware.
    ///
    /// # Errors
    ///
    /// Returns an error if the axis name doesn't exist in the configuration.
    pub fn build_axis<STEP, DIR, DELAY>(
        &mut self,
        name: &str,
        step_pin: STEP,
        dir_pin: DIR,
        delay: DELAY,
    ) -> Result<Axis<STEP, DIR, DELAY>>
    where
        STEP: OutputPin,
        DIR: OutputPin,
        DELAY: DelayNs,
    {
        let axis = AxisBuilder::new()
            .step_pin(step_pin)
            .dir_pin(dir_pin)
            .delay(delay)
            .from_config(&self.config, name)?
            .build()?;

        // Configured names fit the key type, so this only fails for names
        // the builder already rejected.
        if let Ok(key) = String::<32>::try_from(name) {
            let _ = self.built.insert(key, ());
        }

        debug!("axis system: built {=str}", name);
        Ok(axis)
    }

    /// Check if an axis has been built.
    pub fn is_built(&self, name: &str) -> bool {
        self.built.keys().any(|k| k.as_str() == name)
    }

    /// Get the number of axes built so far.
    pub fn built_count(&self) -> usize {
        self.built.len()
    }
}
