//! Configuration validation.

use crate::error::{ConfigError, Error, Result};

use super::{AxisConfig, SystemConfig};

/// Validate a system configuration against a scheduler capacity.
///
/// Checks:
/// - CPU clock and tick rate are non-zero, tick rate does not exceed the clock
/// - Every axis has `min_position <= max_position`
/// - No more axes than scheduler slots
///
/// A setup-time shortfall at the configured clock is not an error: the axes
/// pad it with a delay. It is logged as a warning.
pub fn validate_config(config: &SystemConfig, capacity: usize) -> Result<()> {
    let timer = &config.timer;

    if timer.cpu_hz == 0 {
        return Err(Error::Config(ConfigError::InvalidCpuClock(timer.cpu_hz)));
    }

    if timer.tick_hz == 0 || timer.tick_hz > timer.cpu_hz {
        return Err(Error::Config(ConfigError::InvalidTickRate {
            tick_hz: timer.tick_hz,
            cpu_hz: timer.cpu_hz,
        }));
    }

    if config.axis_count() > capacity {
        return Err(Error::Config(ConfigError::TooManyAxes {
            count: config.axis_count(),
            capacity,
        }));
    }

    for (_, axis) in config.axes.iter() {
        validate_axis(axis)?;
    }

    let padding = config.setup.padding_ns(timer.cpu_hz);
    if padding > 0 {
        warn!(
            "DIR-to-STEP setup not covered at {=u32} Hz, padding {=u32} ns per step",
            timer.cpu_hz,
            padding
        );
    }

    Ok(())
}

fn validate_axis(config: &AxisConfig) -> Result<()> {
    if config.min_position > config.max_position {
        return Err(Error::Config(ConfigError::InvalidLimits {
            min: config.min_position,
            max: config.max_position,
        }));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_axes(count: usize) -> SystemConfig {
        let mut config = SystemConfig::default();
        for i in 0..count {
            let mut name: heapless::String<32> = heapless::String::new();
            let _ = core::fmt::Write::write_fmt(&mut name, format_args!("axis{}", i));
            let _ = config.axes.insert(name.clone(), AxisConfig::new(name.as_str()));
        }
        config
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&SystemConfig::default(), 4).is_ok());
    }

    #[test]
    fn test_inverted_limits_rejected() {
        let mut config = config_with_axes(1);
        if let Some((_, axis)) = config.axes.iter_mut().next() {
            axis.min_position = 10;
            axis.max_position = -10;
        }

        let result = validate_config(&config, 4);
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::InvalidLimits { min: 10, max: -10 }))
        ));
    }

    #[test]
    fn test_too_many_axes() {
        let config = config_with_axes(5);

        let result = validate_config(&config, 4);
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::TooManyAxes {
                count: 5,
                capacity: 4
            }))
        ));
        assert!(validate_config(&config, 8).is_ok());
    }

    #[test]
    fn test_tick_rate_above_clock() {
        let mut config = SystemConfig::default();
        config.timer.tick_hz = config.timer.cpu_hz + 1;

        assert!(matches!(
            validate_config(&config, 4),
            Err(Error::Config(ConfigError::InvalidTickRate { .. }))
        ));
    }

    #[test]
    fn test_zero_clock() {
        let mut config = SystemConfig::default();
        config.timer.cpu_hz = 0;

        assert!(matches!(
            validate_config(&config, 4),
            Err(Error::Config(ConfigError::InvalidCpuClock(0)))
        ));
    }
}
