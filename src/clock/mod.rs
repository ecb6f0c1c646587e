//! Clock module
//!
//! Duration decomposition, the per-digit flip state machine and the
//! arrangement of digits into a clock face.

pub mod composer;
pub mod digit_unit;
pub mod time_fields;

// Re-export main types
pub use composer::{compose, Cell, FlipClock};
pub use digit_unit::{DigitSnapshot, DigitUnit, FlipView, SoundCue, FLIP_DURATION};
pub use time_fields::TimeFields;
