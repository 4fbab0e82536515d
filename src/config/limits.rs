//! Position limits.

/// Inclusive position bounds in steps.
///
/// Commands that would leave these bounds are ignored without an error.
/// Limits never rewrite positions that are already out of range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PositionLimits {
    /// Minimum allowed position in steps.
    pub min: i32,
    /// Maximum allowed position in steps.
    pub max: i32,
}

impl PositionLimits {
    /// The whole representable range.
    pub const FULL: Self = Self {
        min: i32::MIN,
        max: i32::MAX,
    };

    /// Create new limits.
    pub const fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    /// Check if limits are valid (min <= max).
    pub const fn is_valid(&self) -> bool {
        self.min <= self.max
    }

    /// Check if a position is within limits.
    ///
    /// Takes `i64` so that sums of two `i32` can be checked before narrowing.
    #[inline]
    pub const fn contains(&self, position: i64) -> bool {
        position >= self.min as i64 && position <= self.max as i64
    }

    /// Narrow a wide position, rejecting anything outside the limits.
    #[inline]
    pub fn accept(&self, position: i64) -> Option<i32> {
        if self.contains(position) {
            i32::try_from(position).ok()
        } else {
            None
        }
    }
}

impl Default for PositionLimits {
    fn default() -> Self {
        Self::FULL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limits_inclusive() {
        let limits = PositionLimits::new(-100, 100);

        assert!(limits.contains(0));
        assert!(limits.contains(100));
        assert!(limits.contains(-100));
        assert!(!limits.contains(101));
        assert!(!limits.contains(-101));
    }

    #[test]
    fn test_full_range_rejects_overflow() {
        let limits = PositionLimits::FULL;

        assert_eq!(limits.accept(i32::MAX as i64), Some(i32::MAX));
        assert_eq!(limits.accept(i32::MAX as i64 + 1), None);
        assert_eq!(limits.accept(i32::MIN as i64 - 1), None);
    }

    #[test]
    fn test_validity() {
        assert!(PositionLimits::new(5, 5).is_valid());
        assert!(!PositionLimits::new(6, 5).is_valid());
    }
}
