//! Countdown orchestrator task

use std::{sync::Arc, time::Duration};
use chrono::Utc;
use tokio::{
    task::JoinHandle,
    time::{interval, Instant, MissedTickBehavior},
};
use tracing::{debug, info, warn};

use crate::{
    clock::{FlipClock, SoundCue},
    display::{format_local, ClockSnapshot, Frame, Renderer},
    state::{AppState, TimeSource},
};

/// How often the remaining time is recomputed
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Build the snapshot for the last stored remaining time
pub fn snapshot(state: &AppState, target_display: &str) -> ClockSnapshot {
    let remaining_ms = state.remaining();
    let fields = state.fields();
    let sound = state.get_sound_state().unwrap_or_default();

    ClockSnapshot {
        target: state.countdown.target(),
        target_display: target_display.to_string(),
        remaining_ms,
        fields,
        display: fields.padded(),
        muted: sound.muted,
        sound_active: sound.audible(),
        timestamp: Utc::now(),
    }
}

/// Ticks the countdown once per second, drives the flip clock and draws it
pub async fn countdown_task(
    state: Arc<AppState>,
    time: Arc<dyn TimeSource>,
    mut renderer: Renderer,
    redraw_interval: Duration,
) {
    info!("Starting countdown task, target {}", state.countdown.target());

    let target_display = format_local(&state.countdown.target());
    state.refresh_remaining(time.now());
    let mut clock = FlipClock::new(&state.fields());
    let mut finished = false;

    let mut ticker = interval(TICK_INTERVAL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut frames = interval(redraw_interval);
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let remaining = state.refresh_remaining(time.now());
                let fields = state.fields();
                let sound = state.get_sound_state().unwrap_or_default();

                let flips = clock.update(&fields, SoundCue::new(sound.muted, sound.context.as_deref()));
                if flips > 0 {
                    debug!("Tick: {:?}, {} digits flipped", fields, flips);
                }

                if remaining == 0 && !finished {
                    info!("Countdown reached its target");
                    finished = true;
                }

                let snap = snapshot(&state, &target_display);
                let cells = clock.layout(Instant::now());
                if let Err(e) = renderer.tick(&Frame { cells: &cells, snapshot: &snap }) {
                    warn!("Failed to draw tick: {}", e);
                }
            }

            _ = frames.tick(), if renderer.is_animated() => {
                let snap = snapshot(&state, &target_display);
                let cells = clock.layout(Instant::now());
                if let Err(e) = renderer.redraw(&Frame { cells: &cells, snapshot: &snap }) {
                    warn!("Failed to redraw: {}", e);
                }
            }
        }
    }
}

/// Owns the running countdown task and cancels it when dropped
pub struct CountdownHandle {
    handle: Option<JoinHandle<()>>,
}

impl CountdownHandle {
    pub fn spawn(
        state: Arc<AppState>,
        time: Arc<dyn TimeSource>,
        renderer: Renderer,
        redraw_interval: Duration,
    ) -> Self {
        let handle = tokio::spawn(async move {
            countdown_task(state, time, renderer, redraw_interval).await;
        });
        Self { handle: Some(handle) }
    }

    /// Cancel the task and wait until its timers and renderer are dropped
    pub async fn shutdown(mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            if let Err(e) = handle.await {
                if !e.is_cancelled() {
                    warn!("Countdown task failed: {}", e);
                }
            }
            info!("Countdown task stopped");
        }
    }
}

impl Drop for CountdownHandle {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
