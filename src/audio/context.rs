//! Playback contexts the flip sound is scheduled on

use std::{
    fmt,
    sync::atomic::{AtomicBool, Ordering},
};
use tokio::{sync::mpsc, time::Instant};
use tracing::{debug, info, warn};

use super::graph::{self, SoundGraph};

/// Activation state of a playback context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextState {
    Suspended,
    Running,
}

/// A clock plus a place to schedule sound graphs on it.
///
/// Implementations are shared by every digit unit, so all methods take `&self`.
pub trait SoundContext: Send + Sync + fmt::Debug {
    /// Context time in seconds
    fn current_time(&self) -> f64;

    fn state(&self) -> ContextState;

    /// Move a suspended context to running. Idempotent.
    fn resume(&self);

    /// Queue a graph for playback at `graph.start`
    fn schedule(&self, graph: SoundGraph);
}

/// A rendered sound positioned on the context timeline
#[derive(Debug, Clone)]
pub struct ScheduledSound {
    pub start: f64,
    pub samples: Vec<f32>,
}

/// Software context that renders graphs to PCM and hands them to the
/// audio output task
pub struct SynthContext {
    origin: Instant,
    sample_rate: u32,
    suspended: AtomicBool,
    output_tx: mpsc::UnboundedSender<ScheduledSound>,
}

impl SynthContext {
    /// Create a suspended context whose time zero is `origin`
    pub fn new(origin: Instant, sample_rate: u32, output_tx: mpsc::UnboundedSender<ScheduledSound>) -> Self {
        info!("Creating synth context at {} Hz", sample_rate);
        Self {
            origin,
            sample_rate,
            suspended: AtomicBool::new(true),
            output_tx,
        }
    }
}

impl fmt::Debug for SynthContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SynthContext")
            .field("sample_rate", &self.sample_rate)
            .field("state", &self.state())
            .finish()
    }
}

impl SoundContext for SynthContext {
    fn current_time(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }

    fn state(&self) -> ContextState {
        if self.suspended.load(Ordering::Acquire) {
            ContextState::Suspended
        } else {
            ContextState::Running
        }
    }

    fn resume(&self) {
        if self.suspended.swap(false, Ordering::AcqRel) {
            info!("Synth context resumed");
        }
    }

    fn schedule(&self, sound: SoundGraph) {
        if self.state() == ContextState::Suspended {
            debug!("Dropping sound scheduled on a suspended context");
            return;
        }

        let samples = graph::render(&sound, self.sample_rate, &mut rand::thread_rng());
        debug!("Scheduled {} samples at t={:.3}s", samples.len(), sound.start);

        if let Err(e) = self.output_tx.send(ScheduledSound { start: sound.start, samples }) {
            warn!("Audio output task is gone, sound dropped: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::synth::flip_sound;

    #[tokio::test(start_paused = true)]
    async fn suspended_context_renders_nothing_until_resumed() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let ctx = SynthContext::new(Instant::now(), 8000, tx);

        ctx.schedule(flip_sound(0.0));
        assert!(rx.try_recv().is_err());

        ctx.resume();
        ctx.resume();
        assert_eq!(ctx.state(), ContextState::Running);

        ctx.schedule(flip_sound(0.5));
        let sound = rx.try_recv().expect("sound should be queued");
        assert_eq!(sound.start, 0.5);
        assert_eq!(sound.samples.len(), 960);
    }

    #[tokio::test(start_paused = true)]
    async fn current_time_follows_the_runtime_clock() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let ctx = SynthContext::new(Instant::now(), 8000, tx);
        tokio::time::advance(std::time::Duration::from_millis(1500)).await;
        assert!((ctx.current_time() - 1.5).abs() < 1e-6);
    }
}
