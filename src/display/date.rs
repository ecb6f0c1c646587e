//! Target date line

use chrono::{DateTime, FixedOffset, Local, TimeZone};

/// Short en-US month, day, hour and minute, e.g. `Oct 16, 03:00 PM`
pub fn format_short<Tz: TimeZone>(date: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    date.format("%b %-d, %I:%M %p").to_string()
}

/// The target as seen in the local time zone
pub fn format_local(target: &DateTime<FixedOffset>) -> String {
    format_short(&target.with_timezone(&Local))
}
