//! Audio module
//!
//! The flip sound description, the renderer and playback context it is
//! scheduled on, the mixer, and the capture tap the output passes through.

pub mod capture;
pub mod context;
pub mod graph;
pub mod mixer;
pub mod synth;

// Re-export main types
pub use capture::{CaptureOptions, CaptureProcessor};
pub use context::{ContextState, ScheduledSound, SoundContext, SynthContext};
pub use mixer::Mixer;
pub use synth::{flip_sound, play_flip_sound, FLIP_SOUND_DELAY};
