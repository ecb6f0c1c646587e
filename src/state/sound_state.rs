//! Mute flag and shared sound context

use std::sync::Arc;

use crate::audio::SoundContext;

/// Sound settings shared by every digit unit
#[derive(Debug, Clone)]
pub struct SoundState {
    /// Sound is muted until the user turns it on
    pub muted: bool,
    /// Created on the first user gesture, absent before that
    pub context: Option<Arc<dyn SoundContext>>,
}

impl SoundState {
    /// Create a muted state with no context
    pub fn new() -> Self {
        Self {
            muted: true,
            context: None,
        }
    }

    /// Whether a flip right now would make a sound
    pub fn audible(&self) -> bool {
        !self.muted && self.context.is_some()
    }
}

impl Default for SoundState {
    fn default() -> Self {
        Self::new()
    }
}
