//! Configuration loading from files (std only).

use std::fs;
use std::path::Path;

use crate::error::{ConfigError, Error, Result};
use crate::scheduler::DEFAULT_CAPACITY;

use super::SystemConfig;

/// Load configuration from a TOML file.
///
/// The configuration is validated against [`DEFAULT_CAPACITY`] scheduler
/// slots; use [`parse_config_for`] for other capacities.
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed or validated.
///
/// # Example
///
/// ```rust,ignore
/// use stepper_tick::load_config;
///
/// let config = load_config("axes.toml")?;
/// ```
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<SystemConfig> {
    let content = fs::read_to_string(path.as_ref()).map_err(|e| {
        let msg = heapless::String::try_from(e.to_string().as_str()).unwrap_or_default();
        Error::Config(ConfigError::IoError(msg))
    })?;

    parse_config(&content)
}

/// Parse configuration from a TOML string for the default scheduler capacity.
///
/// # Errors
///
/// Returns an error if the TOML is invalid or fails validation.
pub fn parse_config(content: &str) -> Result<SystemConfig> {
    parse_config_for(content, DEFAULT_CAPACITY)
}

/// Parse configuration from a TOML string for a scheduler with `capacity` slots.
///
/// # Errors
///
/// Returns an error if the TOML is invalid or fails validation.
pub fn parse_config_for(content: &str, capacity: usize) -> Result<SystemConfig> {
    let config: SystemConfig = toml::from_str(content).map_err(|e| {
        let msg = truncated(e.message());
        Error::Config(ConfigError::ParseError(msg))
    })?;

    super::validation::validate_config(&config, capacity)?;

    Ok(config)
}

/// Keep as much of a parser message as fits instead of dropping it entirely.
fn truncated(message: &str) -> heapless::String<128> {
    let mut out = heapless::String::new();
    for c in message.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}
