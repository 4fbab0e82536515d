//! System configuration - root configuration structure.

use heapless::{FnvIndexMap, String};
use serde::Deserialize;

use super::axis::AxisConfig;
use super::timing::{SetupTiming, TimerConfig};

/// Maximum number of axes a configuration file may declare.
pub const MAX_CONFIGURED_AXES: usize = 8;

/// Root configuration structure from TOML.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SystemConfig {
    /// Timer interrupt rates.
    #[serde(default)]
    pub timer: TimerConfig,

    /// Driver DIR-to-STEP setup requirement.
    #[serde(default)]
    pub setup: SetupTiming,

    /// Named axis configurations.
    #[serde(default)]
    pub axes: FnvIndexMap<String<32>, AxisConfig, MAX_CONFIGURED_AXES>,
}

impl SystemConfig {
    /// Get an axis configuration by name.
    pub fn axis(&self, name: &str) -> Option<&AxisConfig> {
        self.axes
            .iter()
            .find(|(k, _)| k.as_str() == name)
            .map(|(_, v)| v)
    }

    /// List all axis names.
    pub fn axis_names(&self) -> impl Iterator<Item = &str> {
        self.axes.keys().map(|s| s.as_str())
    }

    /// Number of configured axes.
    pub fn axis_count(&self) -> usize {
        self.axes.len()
    }
}
