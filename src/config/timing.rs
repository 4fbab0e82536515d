//! Timer rate and driver setup-time constants.
//!
//! Everything rate-related hangs off two numbers: the CPU clock and the base
//! tick rate of the timer interrupt. Per-axis service rates, step rates and
//! the direction-to-step setup margin are all derived from them, so porting
//! to a different clock must go through here.

use serde::Deserialize;

/// CPU clock of the reference board (ATmega328P at 16 MHz).
pub const REFERENCE_CPU_HZ: u32 = 16_000_000;

/// Base tick rate of the reference build.
pub const REFERENCE_TICK_HZ: u32 = 64_000;

/// DRV8825 minimum DIR-to-STEP setup time (SLVSA73F, sec. 7.6, item 4).
pub const DRV8825_DIR_SETUP_NS: u32 = 650;

/// Cycles the fenced position/flag update is guaranteed to occupy between
/// the DIR and STEP writes on the reference build, at its most aggressive
/// optimization. Scope measurement of the same build showed ~1.62 us.
pub const REFERENCE_GUARANTEED_CYCLES: u32 = 15;

/// Timer interrupt rate configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimerConfig {
    /// CPU core clock in Hz.
    #[serde(default = "default_cpu_hz")]
    pub cpu_hz: u32,

    /// Base timer interrupt rate in Hz, shared by all scheduler slots.
    #[serde(default = "default_tick_hz")]
    pub tick_hz: u32,
}

fn default_cpu_hz() -> u32 {
    REFERENCE_CPU_HZ
}

fn default_tick_hz() -> u32 {
    REFERENCE_TICK_HZ
}

impl TimerConfig {
    /// The reference 16 MHz / 64 kHz configuration.
    pub const REFERENCE: Self = Self {
        cpu_hz: REFERENCE_CPU_HZ,
        tick_hz: REFERENCE_TICK_HZ,
    };

    /// Rate at which each scheduler slot is serviced.
    #[inline]
    pub const fn slot_rate_hz(&self, capacity: usize) -> u32 {
        if capacity == 0 {
            return 0;
        }
        self.tick_hz / capacity as u32
    }

    /// Highest step rate an axis can reach with the given divisor.
    ///
    /// A full step needs two eligible ticks (assert, then deassert).
    #[inline]
    pub const fn max_step_rate_hz(&self, capacity: usize, divisor: u8) -> u32 {
        if divisor == 0 {
            return 0;
        }
        self.slot_rate_hz(capacity) / (2 * divisor as u32)
    }
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self::REFERENCE
    }
}

/// Direction-to-step setup requirement of the driver IC.
///
/// The tick writes DIR, then does its bookkeeping, then raises STEP. The
/// bookkeeping sits between two compiler fences and takes at least
/// `guaranteed_cycles` CPU cycles. Whatever part of `setup_ns` those cycles
/// do not cover is padded with an explicit delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SetupTiming {
    /// Minimum DIR-to-STEP setup time in nanoseconds.
    #[serde(default = "default_setup_ns")]
    pub setup_ns: u32,

    /// Minimum cycles spent between the two pin writes without any padding.
    #[serde(default = "default_guaranteed_cycles")]
    pub guaranteed_cycles: u32,
}

fn default_setup_ns() -> u32 {
    DRV8825_DIR_SETUP_NS
}

fn default_guaranteed_cycles() -> u32 {
    REFERENCE_GUARANTEED_CYCLES
}

impl SetupTiming {
    /// DRV8825 on the reference build.
    pub const DRV8825: Self = Self {
        setup_ns: DRV8825_DIR_SETUP_NS,
        guaranteed_cycles: REFERENCE_GUARANTEED_CYCLES,
    };

    /// Time the guaranteed cycles take at `cpu_hz`, rounded down.
    pub const fn covered_ns(&self, cpu_hz: u32) -> u32 {
        if cpu_hz == 0 {
            return 0;
        }
        let ns = self.guaranteed_cycles as u64 * 1_000_000_000 / cpu_hz as u64;
        if ns > u32::MAX as u64 {
            u32::MAX
        } else {
            ns as u32
        }
    }

    /// Extra delay needed before raising STEP at `cpu_hz`.
    pub const fn padding_ns(&self, cpu_hz: u32) -> u32 {
        self.setup_ns.saturating_sub(self.covered_ns(cpu_hz))
    }

    /// Slack beyond the requirement; negative when padding is needed.
    pub const fn margin_ns(&self, cpu_hz: u32) -> i64 {
        self.covered_ns(cpu_hz) as i64 - self.setup_ns as i64
    }
}

impl Default for SetupTiming {
    fn default() -> Self {
        Self::DRV8825
    }
}

// 15 cycles at 16 MHz = 937 ns >= 650 ns. Changing either constant must keep
// the reference build delay-free.
const _: () = assert!(SetupTiming::DRV8825.padding_ns(REFERENCE_CPU_HZ) == 0);
