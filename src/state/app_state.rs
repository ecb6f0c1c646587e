//! Main application state management

use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex,
    },
    time::Instant,
};
use chrono::{DateTime, Utc};
use tracing::info;

use crate::{audio::SoundContext, clock::TimeFields};
use super::{Countdown, SoundState};

/// Creates the sound context on the first user gesture
pub type SoundFactory = Box<dyn Fn() -> Arc<dyn SoundContext> + Send + Sync>;

/// Process-wide countdown state: target, remaining time and sound settings
pub struct AppState {
    /// Immutable target
    pub countdown: Countdown,
    /// Mute flag and the lazily created sound context
    pub sound_state: Arc<Mutex<SoundState>>,
    sound_factory: SoundFactory,
    /// Remaining milliseconds as of the last tick
    remaining_ms: AtomicU64,
    pub start_time: Instant,
}

impl AppState {
    /// Create a muted state with no sound context yet
    pub fn new(countdown: Countdown, sound_factory: SoundFactory) -> Self {
        Self {
            countdown,
            sound_state: Arc::new(Mutex::new(SoundState::new())),
            sound_factory,
            remaining_ms: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Recompute the remaining time for `now` and store it
    pub fn refresh_remaining(&self, now: DateTime<Utc>) -> u64 {
        let remaining = self.countdown.remaining_at(now);
        self.remaining_ms.store(remaining, Ordering::Release);
        remaining
    }

    /// Remaining time stored by the last refresh
    pub fn remaining(&self) -> u64 {
        self.remaining_ms.load(Ordering::Acquire)
    }

    /// The stored remaining time split into clock fields
    pub fn fields(&self) -> TimeFields {
        TimeFields::from_millis(self.remaining())
    }

    /// Get current sound state
    pub fn get_sound_state(&self) -> Result<SoundState, String> {
        self.sound_state.lock()
            .map(|state| state.clone())
            .map_err(|e| format!("Failed to lock sound state: {}", e))
    }

    pub fn is_muted(&self) -> bool {
        self.get_sound_state().map(|s| s.muted).unwrap_or(true)
    }

    pub fn sound_context(&self) -> Option<Arc<dyn SoundContext>> {
        self.get_sound_state().ok().and_then(|s| s.context)
    }

    /// Handle a user gesture: create the sound context if this is the
    /// first one, then toggle mute. Returns the new muted flag.
    pub fn user_gesture(&self) -> Result<bool, String> {
        let mut state = self.sound_state.lock()
            .map_err(|e| format!("Failed to lock sound state: {}", e))?;

        if state.context.is_none() {
            info!("First user gesture, creating sound context");
            state.context = Some((self.sound_factory)());
        }
        state.muted = !state.muted;
        let muted = state.muted;
        drop(state); // Release the lock early

        info!("Sound {}", if muted { "muted" } else { "unmuted" });
        Ok(muted)
    }

    /// Calculate uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }
}
