//! Countdown target and remaining-time arithmetic

use chrono::{DateTime, FixedOffset, Utc};

/// The moment the clock counts down to
pub const TARGET_INSTANT: &str = "2025-10-16T15:00:00+02:00";

/// Source of the current wall-clock time
pub trait TimeSource: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// The system clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTime;

impl TimeSource for SystemTime {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// An immutable countdown target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    target: DateTime<FixedOffset>,
}

impl Countdown {
    pub fn new(target: DateTime<FixedOffset>) -> Self {
        Self { target }
    }

    /// Parse an RFC 3339 timestamp with offset
    pub fn from_rfc3339(target: &str) -> Result<Self, String> {
        DateTime::parse_from_rfc3339(target)
            .map(Self::new)
            .map_err(|e| format!("Invalid countdown target '{}': {}", target, e))
    }

    /// The built-in target
    pub fn fixed() -> Result<Self, String> {
        Self::from_rfc3339(TARGET_INSTANT)
    }

    pub fn target(&self) -> DateTime<FixedOffset> {
        self.target
    }

    /// Milliseconds left at `now`, zero once the target has passed
    pub fn remaining_at(&self, now: DateTime<Utc>) -> u64 {
        let diff = self.target.with_timezone(&Utc) - now;
        diff.num_milliseconds().max(0) as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::TimeFields;
    use chrono::Duration;

    #[test]
    fn fixed_target_parses() {
        let countdown = Countdown::fixed().unwrap();
        assert_eq!(countdown.target().to_rfc3339(), "2025-10-16T15:00:00+02:00");
    }

    #[test]
    fn rejects_garbage() {
        assert!(Countdown::from_rfc3339("next tuesday").is_err());
    }

    #[test]
    fn remaining_counts_down_and_clamps_at_zero() {
        let countdown = Countdown::fixed().unwrap();
        let target = countdown.target().with_timezone(&Utc);

        assert_eq!(countdown.remaining_at(target - Duration::milliseconds(1500)), 1500);
        assert_eq!(countdown.remaining_at(target), 0);
        assert_eq!(countdown.remaining_at(target + Duration::seconds(1)), 0);
        assert_eq!(countdown.remaining_at(target + Duration::days(400)), 0);
    }

    #[test]
    fn one_day_one_hour_one_minute_one_second() {
        let countdown = Countdown::fixed().unwrap();
        let now = countdown.target().with_timezone(&Utc) - Duration::milliseconds(90_061_001);
        assert_eq!(countdown.remaining_at(now), 90_061_001);
        assert_eq!(TimeFields::from_millis(countdown.remaining_at(now)), TimeFields::new(1, 1, 1, 1));
    }
}
