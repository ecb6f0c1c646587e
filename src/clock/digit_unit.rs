//! Flip state machine for a single displayed character

use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};
use tokio::{
    task::JoinHandle,
    time::{sleep_until, Instant},
};
use tracing::trace;

use crate::audio::{play_flip_sound, SoundContext, FLIP_SOUND_DELAY};

/// Length of the card animation
pub const FLIP_DURATION: Duration = Duration::from_millis(500);

/// Whether and where a flip should make a sound
#[derive(Clone, Copy)]
pub struct SoundCue<'a> {
    pub muted: bool,
    pub context: Option<&'a dyn SoundContext>,
}

impl<'a> SoundCue<'a> {
    pub fn silent() -> Self {
        Self { muted: true, context: None }
    }

    pub fn new(muted: bool, context: Option<&'a dyn SoundContext>) -> Self {
        Self { muted, context }
    }
}

#[derive(Debug, Clone)]
struct DigitState {
    current: char,
    previous: char,
    flip_started: Option<Instant>,
    /// Bumped on every flip so a stale completion never lands
    generation: u64,
}

/// Point-in-time copy of a unit's state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DigitSnapshot {
    pub current: char,
    pub previous: char,
    pub is_flipping: bool,
}

/// What to draw for a unit at a given instant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlipView {
    pub current: char,
    pub previous: char,
    /// Linear animation progress in `[0, 1)`, `None` when idle
    pub progress: Option<f32>,
}

impl FlipView {
    /// Overlay rotation in degrees, 0 showing `previous` on top and 180
    /// showing `current` folded onto the bottom half
    pub fn angle(&self) -> f32 {
        self.progress.map(|p| ease_in_out(p) * 180.0).unwrap_or(0.0)
    }

    /// Characters visible on the top and bottom halves
    pub fn faces(&self) -> (char, char) {
        match self.progress {
            None => (self.current, self.previous),
            // The overlay still covers the top half with the old card
            Some(_) if self.angle() < 90.0 => (self.previous, self.previous),
            // The overlay has folded down onto the bottom half
            Some(_) => (self.current, self.current),
        }
    }
}

/// cubic-bezier(0.45, 0, 0.55, 1)
pub fn ease_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    let (x1, y1, x2, y2) = (0.45f32, 0.0f32, 0.55f32, 1.0f32);
    let bezier = |a: f32, b: f32, s: f32| {
        let u = 1.0 - s;
        3.0 * u * u * s * a + 3.0 * u * s * s * b + s * s * s
    };

    // Bisection on x(s) = t, x is monotonic for these control points
    let (mut lo, mut hi) = (0.0f32, 1.0f32);
    for _ in 0..24 {
        let mid = (lo + hi) / 2.0;
        if bezier(x1, x2, mid) < t {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    bezier(y1, y2, (lo + hi) / 2.0)
}

/// One flip card. Owns its state and its pending completion timer.
pub struct DigitUnit {
    state: Arc<Mutex<DigitState>>,
    completion: Option<JoinHandle<()>>,
}

fn lock(state: &Mutex<DigitState>) -> MutexGuard<'_, DigitState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

impl DigitUnit {
    pub fn new(initial: char) -> Self {
        Self {
            state: Arc::new(Mutex::new(DigitState {
                current: initial,
                previous: initial,
                flip_started: None,
                generation: 0,
            })),
            completion: None,
        }
    }

    /// Feed the digit this position should show.
    ///
    /// Returns `true` when the digit changed and a flip started. Must be
    /// called from within a tokio runtime.
    pub fn update(&mut self, digit: char, cue: SoundCue<'_>) -> bool {
        let started = Instant::now();
        let generation = {
            let mut state = lock(&self.state);
            if state.current == digit {
                return false;
            }

            trace!("Flipping {} -> {}", state.current, digit);
            state.previous = state.current;
            state.current = digit;
            state.flip_started = Some(started);
            state.generation += 1;
            state.generation
        };

        if !cue.muted {
            play_flip_sound(cue.context, FLIP_SOUND_DELAY);
        }

        self.cancel_completion();
        let state = Arc::clone(&self.state);
        self.completion = Some(tokio::spawn(async move {
            sleep_until(started + FLIP_DURATION).await;
            let mut state = lock(&state);
            if state.generation == generation {
                state.previous = state.current;
                state.flip_started = None;
            }
        }));

        true
    }

    pub fn snapshot(&self) -> DigitSnapshot {
        let state = lock(&self.state);
        DigitSnapshot {
            current: state.current,
            previous: state.previous,
            is_flipping: state.flip_started.is_some(),
        }
    }

    pub fn view(&self, now: Instant) -> FlipView {
        let state = lock(&self.state);
        let progress = state.flip_started.map(|started| {
            let elapsed = now.saturating_duration_since(started).as_secs_f32();
            (elapsed / FLIP_DURATION.as_secs_f32()).min(0.999)
        });
        FlipView {
            current: state.current,
            previous: state.previous,
            progress,
        }
    }

    fn cancel_completion(&mut self) {
        if let Some(handle) = self.completion.take() {
            handle.abort();
        }
    }
}

impl Drop for DigitUnit {
    fn drop(&mut self) {
        self.cancel_completion();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{graph::SoundGraph, ContextState};
    use std::sync::Mutex as StdMutex;
    use tokio::time::advance;

    #[derive(Debug, Default)]
    struct Recorder {
        starts: StdMutex<Vec<f64>>,
    }

    impl SoundContext for Recorder {
        fn current_time(&self) -> f64 {
            0.0
        }
        fn state(&self) -> ContextState {
            ContextState::Running
        }
        fn resume(&self) {}
        fn schedule(&self, graph: SoundGraph) {
            self.starts.lock().unwrap().push(graph.start);
        }
    }

    async fn settle() {
        // Let spawned completion tasks observe the advanced clock
        for _ in 0..4 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn unchanged_digit_never_flips() {
        let recorder = Recorder::default();
        let mut unit = DigitUnit::new('5');
        assert!(!unit.update('5', SoundCue::new(false, Some(&recorder))));
        assert!(!unit.snapshot().is_flipping);
        assert!(recorder.starts.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn flip_completes_after_500ms() {
        let mut unit = DigitUnit::new('9');
        assert!(unit.update('8', SoundCue::silent()));
        assert_eq!(
            unit.snapshot(),
            DigitSnapshot { current: '8', previous: '9', is_flipping: true }
        );

        advance(Duration::from_millis(499)).await;
        settle().await;
        assert!(unit.snapshot().is_flipping);

        advance(Duration::from_millis(2)).await;
        settle().await;
        assert_eq!(
            unit.snapshot(),
            DigitSnapshot { current: '8', previous: '8', is_flipping: false }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn retrigger_mid_flight_replaces_the_pending_completion() {
        let mut unit = DigitUnit::new('3');
        unit.update('2', SoundCue::silent());

        advance(Duration::from_millis(300)).await;
        settle().await;
        unit.update('1', SoundCue::silent());
        assert_eq!(
            unit.snapshot(),
            DigitSnapshot { current: '1', previous: '2', is_flipping: true }
        );

        // The first flip's deadline passes without ending the second flip
        advance(Duration::from_millis(250)).await;
        settle().await;
        assert_eq!(
            unit.snapshot(),
            DigitSnapshot { current: '1', previous: '2', is_flipping: true }
        );

        advance(Duration::from_millis(260)).await;
        settle().await;
        assert_eq!(
            unit.snapshot(),
            DigitSnapshot { current: '1', previous: '1', is_flipping: false }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn sound_only_when_unmuted_with_a_context() {
        let recorder = Recorder::default();
        let mut unit = DigitUnit::new('0');

        unit.update('1', SoundCue::new(true, Some(&recorder)));
        assert!(recorder.starts.lock().unwrap().is_empty());

        unit.update('2', SoundCue::new(false, None));
        assert!(recorder.starts.lock().unwrap().is_empty());

        unit.update('3', SoundCue::new(false, Some(&recorder)));
        unit.update('3', SoundCue::new(false, Some(&recorder)));
        assert_eq!(*recorder.starts.lock().unwrap(), vec![FLIP_SOUND_DELAY]);
    }

    #[tokio::test(start_paused = true)]
    async fn view_tracks_animation_progress() {
        let mut unit = DigitUnit::new('4');
        let started = Instant::now();
        unit.update('3', SoundCue::silent());

        let early = unit.view(started + Duration::from_millis(100));
        assert_eq!(early.faces(), ('4', '4'));

        let late = unit.view(started + Duration::from_millis(400));
        assert_eq!(late.faces(), ('3', '3'));
        assert!(late.angle() > 90.0);

        advance(Duration::from_millis(600)).await;
        settle().await;
        let idle = unit.view(Instant::now());
        assert_eq!(idle.progress, None);
        assert_eq!(idle.angle(), 0.0);
    }

    #[test]
    fn easing_is_symmetric_and_bounded() {
        assert!(ease_in_out(0.0).abs() < 1e-3);
        assert!((ease_in_out(1.0) - 1.0).abs() < 1e-3);
        assert!((ease_in_out(0.5) - 0.5).abs() < 1e-3);
        assert!(ease_in_out(0.25) < 0.25);
        assert!(ease_in_out(0.75) > 0.75);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_a_unit_cancels_its_timer() {
        let mut unit = DigitUnit::new('1');
        unit.update('0', SoundCue::silent());
        let state = Arc::clone(&unit.state);
        drop(unit);

        advance(Duration::from_millis(600)).await;
        settle().await;
        assert!(lock(&state).flip_started.is_some());
    }
}
