//! Splitting a remaining duration into clock fields

use serde::Serialize;

pub const MS_PER_SECOND: u64 = 1_000;
pub const MS_PER_MINUTE: u64 = 60 * MS_PER_SECOND;
pub const MS_PER_HOUR: u64 = 60 * MS_PER_MINUTE;
pub const MS_PER_DAY: u64 = 24 * MS_PER_HOUR;

/// Days, hours, minutes and seconds of a duration. Sub-second remainder is
/// dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TimeFields {
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl TimeFields {
    pub fn new(days: u64, hours: u64, minutes: u64, seconds: u64) -> Self {
        Self { days, hours, minutes, seconds }
    }

    pub fn from_millis(remaining_ms: u64) -> Self {
        Self {
            days: remaining_ms / MS_PER_DAY,
            hours: (remaining_ms % MS_PER_DAY) / MS_PER_HOUR,
            minutes: (remaining_ms % MS_PER_HOUR) / MS_PER_MINUTE,
            seconds: (remaining_ms % MS_PER_MINUTE) / MS_PER_SECOND,
        }
    }

    /// Whole milliseconds represented by the fields
    pub fn to_millis(&self) -> u64 {
        self.days * MS_PER_DAY
            + self.hours * MS_PER_HOUR
            + self.minutes * MS_PER_MINUTE
            + self.seconds * MS_PER_SECOND
    }

    /// The four fields zero-padded to at least two digits
    pub fn padded(&self) -> [String; 4] {
        [
            format!("{:02}", self.days),
            format!("{:02}", self.hours),
            format!("{:02}", self.minutes),
            format!("{:02}", self.seconds),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_of_each() {
        assert_eq!(TimeFields::from_millis(90_061_001), TimeFields::new(1, 1, 1, 1));
    }

    #[test]
    fn reconstruction_is_within_a_second() {
        let samples = [0, 1, 999, 1_000, 59_999, 3_599_999, 86_399_999, 86_400_000, 987_654_321_012];
        for d in samples {
            let fields = TimeFields::from_millis(d);
            let rebuilt = fields.to_millis() + d % 1000;
            assert_eq!(rebuilt, d);
            assert!(fields.to_millis() <= d && d - fields.to_millis() <= 999);
        }
    }

    #[test]
    fn fields_stay_within_their_modulus() {
        let fields = TimeFields::from_millis(u64::MAX);
        assert!(fields.hours < 24);
        assert!(fields.minutes < 60);
        assert!(fields.seconds < 60);
    }

    #[test]
    fn pads_without_truncating_days() {
        assert_eq!(TimeFields::new(3, 5, 9, 0).padded(), ["03", "05", "09", "00"]);
        assert_eq!(TimeFields::new(123, 23, 59, 59).padded()[0], "123");
    }
}
