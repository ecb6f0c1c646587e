//! State management module
//! 
//! This module contains the countdown target, the sound settings and the
//! application state that ties them together.

pub mod app_state;
pub mod countdown;
pub mod sound_state;

// Re-export main types
pub use app_state::{AppState, SoundFactory};
pub use countdown::{Countdown, SystemTime, TimeSource, TARGET_INSTANT};
pub use sound_state::SoundState;
