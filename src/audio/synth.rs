//! Mechanical flip sound effect

use tracing::debug;

use super::{
    context::{ContextState, SoundContext},
    graph::{Automation, Compressor, Filter, Keyframe, SoundGraph, Source, Voice},
};

/// Delay between a digit change and the sound, lining the impact up with the
/// middle of the 500ms card animation
pub const FLIP_SOUND_DELAY: f64 = 0.38;

const ATTACK: f64 = 0.003;
const DECAY: f64 = 0.1;
const WHIRR_DURATION: f64 = 0.05;
const IMPACT_OFFSET: f64 = 0.02;
const SILENT: f32 = 0.0001;

/// Describe the flip sound starting at context time `start`.
///
/// Three voices: a rising sawtooth whirr, a band-passed noise impact and a
/// low-passed triangle body, summed through a compressor.
pub fn flip_sound(start: f64) -> SoundGraph {
    let impact = start + IMPACT_OFFSET;

    let whirr = Voice {
        name: "whirr",
        source: Source::Sawtooth {
            frequency: Automation::new(
                440.0,
                vec![Keyframe::set(start, 80.0), Keyframe::linear(start + WHIRR_DURATION, 120.0)],
            ),
        },
        filter: None,
        gain: Automation::new(
            1.0,
            vec![
                Keyframe::set(start, 0.0),
                Keyframe::linear(start + ATTACK, 0.1),
                Keyframe::exponential(start + WHIRR_DURATION, SILENT),
            ],
        ),
        start,
        stop: start + WHIRR_DURATION,
    };

    let noise = Voice {
        name: "impact",
        source: Source::Noise { buffer_seconds: DECAY },
        filter: Some(Filter::BandPass { frequency: 900.0, q: 5.0 }),
        gain: impact_envelope(impact, 1.0),
        start: impact,
        stop: impact + DECAY,
    };

    let body = Voice {
        name: "body",
        source: Source::Triangle {
            frequency: Automation::constant(120.0),
        },
        filter: Some(Filter::LowPass { frequency: 300.0 }),
        gain: impact_envelope(impact, 0.7),
        start: impact,
        stop: impact + DECAY,
    };

    SoundGraph {
        start,
        voices: vec![whirr, noise, body],
        compressor: Compressor {
            threshold_db: -30.0,
            knee_db: 30.0,
            ratio: 12.0,
            attack: 0.003,
            release: 0.15,
        },
    }
}

fn impact_envelope(at: f64, peak: f32) -> Automation {
    Automation::new(
        1.0,
        vec![
            Keyframe::set(at, 0.0),
            Keyframe::linear(at + ATTACK, peak),
            Keyframe::exponential(at + DECAY, SILENT),
        ],
    )
}

/// Schedule one flip sound `delay` seconds from now on `context`.
///
/// Resumes a suspended context first. Without a context this does nothing.
pub fn play_flip_sound(context: Option<&dyn SoundContext>, delay: f64) {
    let Some(context) = context else {
        return;
    };

    if context.state() == ContextState::Suspended {
        context.resume();
    }

    let start = context.current_time() + delay.max(0.0);
    debug!("Playing flip sound at t={:.3}s", start);
    context.schedule(flip_sound(start));
}
