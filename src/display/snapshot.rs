//! Serializable view of the clock for line-oriented output

use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;

use crate::clock::TimeFields;

/// Clock state at one tick
#[derive(Debug, Clone, Serialize)]
pub struct ClockSnapshot {
    pub target: DateTime<FixedOffset>,
    pub target_display: String,
    pub remaining_ms: u64,
    pub fields: TimeFields,
    /// Field strings in display order
    pub display: [String; 4],
    pub muted: bool,
    pub sound_active: bool,
    pub timestamp: DateTime<Utc>,
}

impl ClockSnapshot {
    /// `DD:HH:MM:SS`, days may be wider
    pub fn clock_text(&self) -> String {
        self.display.join(":")
    }
}
