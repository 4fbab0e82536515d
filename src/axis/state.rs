//! Axis status and step direction.

/// Runtime status of an axis as seen from normal context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AxisStatus {
    /// Current position equals the target.
    Idle,
    /// The tick is still converging on the target.
    Moving,
    /// A pin write failed; the axis ignores ticks until the fault is cleared.
    Fault,
}

impl AxisStatus {
    /// Get the status name as a static string.
    pub fn name(self) -> &'static str {
        match self {
            AxisStatus::Idle => "Idle",
            AxisStatus::Moving => "Moving",
            AxisStatus::Fault => "Fault",
        }
    }
}

/// Direction of a single step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Position counts up.
    Increase,
    /// Position counts down.
    Decrease,
}

impl Direction {
    /// Direction that moves `current` toward `target`, if they differ.
    #[inline]
    pub fn toward(current: i32, target: i32) -> Option<Self> {
        match current.cmp(&target) {
            core::cmp::Ordering::Less => Some(Direction::Increase),
            core::cmp::Ordering::Greater => Some(Direction::Decrease),
            core::cmp::Ordering::Equal => None,
        }
    }

    /// Get the sign multiplier.
    #[inline]
    pub fn sign(self) -> i32 {
        match self {
            Direction::Increase => 1,
            Direction::Decrease => -1,
        }
    }

    /// DIR pin level for this direction.
    ///
    /// Decreasing drives DIR high, increasing drives it low; `invert` swaps.
    #[inline]
    pub fn pin_high(self, invert: bool) -> bool {
        match self {
            Direction::Decrease => !invert,
            Direction::Increase => invert,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_toward() {
        assert_eq!(Direction::toward(0, 5), Some(Direction::Increase));
        assert_eq!(Direction::toward(5, 0), Some(Direction::Decrease));
        assert_eq!(Direction::toward(i32::MIN, i32::MIN), None);
    }

    #[test]
    fn test_pin_polarity() {
        assert!(Direction::Decrease.pin_high(false));
        assert!(!Direction::Increase.pin_high(false));
        assert!(!Direction::Decrease.pin_high(true));
        assert!(Direction::Increase.pin_high(true));
    }
}
