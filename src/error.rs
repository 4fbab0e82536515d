//! Error types for stepper-tick.
//!
//! Out-of-range motion commands are deliberately not errors: they are
//! ignored without a signal. What remains is configuration, scheduler
//! registration and pin faults.

use core::fmt;

/// Result type alias using the library's Error type.
pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for all stepper-tick operations.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Configuration parsing or validation error
    Config(ConfigError),
    /// Tick scheduler or timer setup error
    Scheduler(SchedulerError),
    /// Axis runtime error
    Axis(AxisError),
}

/// Configuration-related errors.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Failed to parse TOML configuration
    ParseError(heapless::String<128>),
    /// Axis name not found in configuration
    AxisNotFound(heapless::String<32>),
    /// A required builder field was not supplied
    MissingField(&'static str),
    /// Position limits with min greater than max
    InvalidLimits {
        /// Minimum position in steps
        min: i32,
        /// Maximum position in steps
        max: i32,
    },
    /// CPU clock of zero
    InvalidCpuClock(u32),
    /// Tick rate of zero or above the CPU clock
    InvalidTickRate {
        /// Requested tick rate in Hz
        tick_hz: u32,
        /// CPU clock in Hz
        cpu_hz: u32,
    },
    /// More axes configured than the scheduler has slots
    TooManyAxes {
        /// Number of configured axes
        count: usize,
        /// Scheduler capacity
        capacity: usize,
    },
    /// File I/O error (std only)
    #[cfg(feature = "std")]
    IoError(heapless::String<128>),
}

/// Tick scheduler and timer errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SchedulerError {
    /// Every registry slot is taken
    CapacityExceeded {
        /// Registry capacity
        capacity: usize,
    },
    /// The owner already holds a slot
    AlreadyRegistered,
    /// No prescaler/TOP pair reaches the requested tick rate
    RateUnreachable {
        /// Requested tick rate in Hz
        tick_hz: u32,
    },
    /// The platform timer refused the computed plan
    TimerStart,
}

/// Axis runtime errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AxisError {
    /// A STEP or DIR write failed inside the tick; the axis is halted
    PinFault,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(e) => write!(f, "Configuration error: {}", e),
            Error::Scheduler(e) => write!(f, "Scheduler error: {}", e),
            Error::Axis(e) => write!(f, "Axis error: {}", e),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            ConfigError::AxisNotFound(name) => write!(f, "Axis '{}' not found", name),
            ConfigError::MissingField(field) => write!(f, "{} is required", field),
            ConfigError::InvalidLimits { min, max } => {
                write!(f, "Invalid limits: min ({}) must be <= max ({})", min, max)
            }
            ConfigError::InvalidCpuClock(hz) => write!(f, "Invalid CPU clock: {} Hz", hz),
            ConfigError::InvalidTickRate { tick_hz, cpu_hz } => {
                write!(f, "Invalid tick rate {} Hz for a {} Hz CPU clock", tick_hz, cpu_hz)
            }
            ConfigError::TooManyAxes { count, capacity } => {
                write!(f, "{} axes configured, scheduler has {} slots", count, capacity)
            }
            #[cfg(feature = "std")]
            ConfigError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl fmt::Display for SchedulerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchedulerError::CapacityExceeded { capacity } => write!(
                f,
                "Exceeded maximum controllable stepper outputs ({})",
                capacity
            ),
            SchedulerError::AlreadyRegistered => write!(f, "Axis is already registered"),
            SchedulerError::RateUnreachable { tick_hz } => {
                write!(f, "No timer setting reaches {} Hz", tick_hz)
            }
            SchedulerError::TimerStart => write!(f, "Timer refused the tick configuration"),
        }
    }
}

impl fmt::Display for AxisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AxisError::PinFault => write!(f, "STEP/DIR pin write failed, axis halted"),
        }
    }
}

// Conversion impls
impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<SchedulerError> for Error {
    fn from(e: SchedulerError) -> Self {
        Error::Scheduler(e)
    }
}

impl From<AxisError> for Error {
    fn from(e: AxisError) -> Self {
        Error::Axis(e)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

#[cfg(feature = "std")]
impl std::error::Error for SchedulerError {}

#[cfg(feature = "std")]
impl std::error::Error for AxisError {}
