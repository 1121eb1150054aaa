//! Fixed-point scheduling priority.

use core::fmt;

use crate::config::BattleConfig;

/// Non-negative decimal with 18 fractional digits.
///
/// Lower values act sooner. All arithmetic is integer and truncates toward
/// zero, so every node orders the queue identically.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Priority(u128);

impl Priority {
    pub const DECIMALS: u32 = 18;
    pub const SCALE: u128 = 10u128.pow(Self::DECIMALS);
    pub const ZERO: Self = Self(0);

    pub const fn from_raw(raw: u128) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u128 {
        self.0
    }

    /// `numerator / denominator`, truncated. A zero denominator is treated as 1.
    pub fn ratio(numerator: u32, denominator: u32) -> Self {
        let denominator = u128::from(denominator.max(1));
        Self(u128::from(numerator) * Self::SCALE / denominator)
    }

    /// Priority of a combatant that just acted or just spawned.
    ///
    /// SPD below 1 schedules like SPD 1.
    pub fn for_speed(turn_priority: u32, spd: i32) -> Self {
        Self::ratio(turn_priority, spd.max(1) as u32)
    }

    /// `self × 0.6`, truncated. Strictly smaller for any positive value.
    pub fn decay(self) -> Self {
        Self(self.0 * BattleConfig::DECAY_NUMERATOR / BattleConfig::DECAY_DENOMINATOR)
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / Self::SCALE;
        let fraction = self.0 % Self::SCALE;
        if fraction == 0 {
            return write!(f, "{whole}");
        }
        let digits = format!("{fraction:018}");
        write!(f, "{whole}.{}", digits.trim_end_matches('0'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn faster_combatant_has_lower_priority() {
        let fast = Priority::for_speed(100, 10);
        let slow = Priority::for_speed(100, 5);
        assert_eq!(fast.to_string(), "10");
        assert_eq!(slow.to_string(), "20");
        assert!(fast < slow);
    }

    #[test]
    fn division_truncates_at_eighteen_digits() {
        let third = Priority::ratio(100, 3);
        assert_eq!(third.to_string(), "33.333333333333333333");
        assert_eq!(third.raw(), 33_333_333_333_333_333_333);
    }

    #[test]
    fn decay_is_strictly_decreasing() {
        let mut priority = Priority::ratio(100, 7);
        for _ in 0..200 {
            let next = priority.decay();
            if priority.is_zero() {
                assert!(next.is_zero());
                break;
            }
            assert!(next < priority);
            priority = next;
        }
        assert_eq!(Priority::ratio(100, 10).decay().to_string(), "6");
        assert_eq!(Priority::from_raw(1).decay(), Priority::ZERO);
    }

    #[test]
    fn non_positive_speed_acts_like_one() {
        assert_eq!(Priority::for_speed(100, 0), Priority::ratio(100, 1));
        assert_eq!(Priority::for_speed(100, -4), Priority::ratio(100, 1));
    }
}
