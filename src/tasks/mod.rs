//! Background tasks module
//! 
//! This module contains the countdown orchestrator and the audio output
//! tasks that run alongside it.

pub mod audio_output;
pub mod countdown;

// Re-export main functions
pub use audio_output::{audio_output_task, capture_sink_task};
pub use countdown::{countdown_task, CountdownHandle, TICK_INTERVAL};
