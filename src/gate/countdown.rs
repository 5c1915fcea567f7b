//! Countdown arithmetic

use std::fmt;

const MS_PER_SECOND: u64 = 1000;
const MS_PER_MINUTE: u64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: u64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: u64 = 24 * MS_PER_HOUR;

/// Remaining time split into display units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Countdown {
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl Countdown {
    pub const ZERO: Self = Self {
        days: 0,
        hours: 0,
        minutes: 0,
        seconds: 0,
    };

    /// Milliseconds from `now_ms` until `target_ms`, clamped at zero
    pub fn remaining_ms(target_ms: i64, now_ms: i64) -> u64 {
        target_ms.saturating_sub(now_ms).max(0) as u64
    }

    /// Each unit is floored; the seconds unit drops any partial second
    pub fn from_ms(ms: u64) -> Self {
        Self {
            days: ms / MS_PER_DAY,
            hours: (ms / MS_PER_HOUR) % 24,
            minutes: (ms / MS_PER_MINUTE) % 60,
            seconds: (ms / MS_PER_SECOND) % 60,
        }
    }

    pub fn until(target_ms: i64, now_ms: i64) -> Self {
        Self::from_ms(Self::remaining_ms(target_ms, now_ms))
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    /// Total whole seconds represented
    pub fn total_seconds(&self) -> u64 {
        ((self.days * 24 + self.hours) * 60 + self.minutes) * 60 + self.seconds
    }
}

impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}d {}h {}m {}s",
            self.days, self.hours, self.minutes, self.seconds
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_units_are_floored() {
        let ms = 2 * MS_PER_DAY + 3 * MS_PER_HOUR + 4 * MS_PER_MINUTE + 5 * MS_PER_SECOND + 999;
        let countdown = Countdown::from_ms(ms);
        assert_eq!(
            countdown,
            Countdown {
                days: 2,
                hours: 3,
                minutes: 4,
                seconds: 5
            }
        );
        assert_eq!(countdown.to_string(), "2d 3h 4m 5s");
    }

    #[test]
    fn test_past_target_clamps_to_zero() {
        assert_eq!(Countdown::remaining_ms(1_000, 5_000), 0);
        assert!(Countdown::until(1_000, 5_000).is_zero());
        assert_eq!(Countdown::ZERO.to_string(), "0d 0h 0m 0s");
    }

    #[test]
    fn test_extreme_inputs_do_not_overflow() {
        assert_eq!(Countdown::remaining_ms(i64::MIN, i64::MAX), 0);
        assert!(Countdown::remaining_ms(i64::MAX, i64::MIN) > 0);
    }

    proptest! {
        #[test]
        fn prop_remaining_positive_before_target(target in 0i64..4_000_000_000_000, back in 1i64..10_000_000_000) {
            prop_assert!(Countdown::remaining_ms(target, target - back) > 0);
        }

        #[test]
        fn prop_remaining_non_increasing(target in 0i64..4_000_000_000_000, now in 0i64..4_000_000_000_000, step in 0i64..100_000_000) {
            let earlier = Countdown::remaining_ms(target, now);
            let later = Countdown::remaining_ms(target, now + step);
            prop_assert!(later <= earlier);
            prop_assert!(Countdown::from_ms(later).total_seconds() <= Countdown::from_ms(earlier).total_seconds());
        }

        #[test]
        fn prop_units_stay_in_range(ms in 0u64..1_000_000_000_000) {
            let countdown = Countdown::from_ms(ms);
            prop_assert!(countdown.hours < 24);
            prop_assert!(countdown.minutes < 60);
            prop_assert!(countdown.seconds < 60);
            prop_assert_eq!(countdown.total_seconds(), ms / 1000);
        }
    }
}
