//! Declarative audio graph description and an offline renderer for it

use rand::Rng;
use serde::Serialize;

/// How a parameter moves from the previous keyframe to this one
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Ramp {
    /// Jump to the value at the keyframe time
    Set,
    /// Linear interpolation from the previous keyframe
    Linear,
    /// Exponential interpolation from the previous keyframe
    Exponential,
}

/// A single automation point, times are absolute context seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Keyframe {
    pub time: f64,
    pub value: f32,
    pub ramp: Ramp,
}

impl Keyframe {
    pub fn set(time: f64, value: f32) -> Self {
        Self { time, value, ramp: Ramp::Set }
    }

    pub fn linear(time: f64, value: f32) -> Self {
        Self { time, value, ramp: Ramp::Linear }
    }

    pub fn exponential(time: f64, value: f32) -> Self {
        Self { time, value, ramp: Ramp::Exponential }
    }
}

/// A parameter timeline: a default value plus time-ordered keyframes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Automation {
    pub default: f32,
    pub keyframes: Vec<Keyframe>,
}

impl Automation {
    pub fn constant(value: f32) -> Self {
        Self { default: value, keyframes: vec![Keyframe::set(0.0, value)] }
    }

    pub fn new(default: f32, keyframes: Vec<Keyframe>) -> Self {
        Self { default, keyframes }
    }

    /// Evaluate the parameter at absolute time `t`.
    ///
    /// A ramp keyframe interpolates from the keyframe before it. Exponential
    /// ramps hold the previous value when either endpoint is not strictly
    /// positive.
    pub fn value_at(&self, t: f64) -> f32 {
        let mut prev: Option<(f64, f32)> = None;
        for frame in &self.keyframes {
            if t < frame.time {
                let Some((t0, v0)) = prev else {
                    return self.default;
                };
                let span = frame.time - t0;
                if span <= 0.0 {
                    return v0;
                }
                let progress = ((t - t0) / span) as f32;
                return match frame.ramp {
                    Ramp::Set => v0,
                    Ramp::Linear => v0 + (frame.value - v0) * progress,
                    Ramp::Exponential => {
                        if v0 > 0.0 && frame.value > 0.0 {
                            v0 * (frame.value / v0).powf(progress)
                        } else {
                            v0
                        }
                    }
                };
            }
            prev = Some((frame.time, frame.value));
        }
        prev.map(|(_, v)| v).unwrap_or(self.default)
    }
}

/// Sound source of a voice
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Source {
    Sawtooth { frequency: Automation },
    Triangle { frequency: Automation },
    /// Uniform white noise from a buffer of the given length in seconds
    Noise { buffer_seconds: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Filter {
    BandPass { frequency: f32, q: f32 },
    LowPass { frequency: f32 },
}

/// One synthesized layer of a sound
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Voice {
    pub name: &'static str,
    pub source: Source,
    pub filter: Option<Filter>,
    pub gain: Automation,
    pub start: f64,
    pub stop: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Compressor {
    pub threshold_db: f32,
    pub knee_db: f32,
    pub ratio: f32,
    pub attack: f32,
    pub release: f32,
}

/// A complete sound: voices summed through a compressor
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SoundGraph {
    pub start: f64,
    pub voices: Vec<Voice>,
    pub compressor: Compressor,
}

impl SoundGraph {
    /// Time the last voice stops
    pub fn end(&self) -> f64 {
        self.voices
            .iter()
            .map(|v| v.stop)
            .fold(self.start, f64::max)
    }

    pub fn duration(&self) -> f64 {
        self.end() - self.start
    }
}

/// Render a graph to mono samples beginning at `graph.start`
pub fn render<R: Rng>(graph: &SoundGraph, sample_rate: u32, rng: &mut R) -> Vec<f32> {
    let sr = sample_rate as f64;
    let len = (graph.duration() * sr).round() as usize;
    let mut mix = vec![0.0f32; len];

    for voice in &graph.voices {
        render_voice(voice, graph.start, sample_rate, rng, &mut mix);
    }

    compress(&mut mix, &graph.compressor, sample_rate);
    mix
}

fn render_voice<R: Rng>(
    voice: &Voice,
    origin: f64,
    sample_rate: u32,
    rng: &mut R,
    mix: &mut [f32],
) {
    let sr = sample_rate as f64;
    let first = (((voice.start - origin) * sr).round().max(0.0)) as usize;
    let last = (((voice.stop - origin) * sr).round() as usize).min(mix.len());
    if first >= last {
        return;
    }

    let noise: Vec<f32> = match &voice.source {
        Source::Noise { buffer_seconds } => {
            let n = ((buffer_seconds * sr) as usize).max(1);
            (0..n).map(|_| rng.gen_range(-1.0f32..1.0)).collect()
        }
        _ => Vec::new(),
    };

    let mut biquad = voice.filter.map(|f| Biquad::new(f, sample_rate));
    let mut phase = 0.0f64;

    for (n, out) in mix[first..last].iter_mut().enumerate() {
        let t = voice.start + n as f64 / sr;
        let raw = match &voice.source {
            Source::Sawtooth { frequency } => {
                let s = (2.0 * phase - 1.0) as f32;
                phase = (phase + frequency.value_at(t) as f64 / sr).fract();
                s
            }
            Source::Triangle { frequency } => {
                let s = (1.0 - 4.0 * (phase - 0.5).abs()) as f32;
                phase = (phase + frequency.value_at(t) as f64 / sr).fract();
                s
            }
            // The buffer source plays once and then falls silent
            Source::Noise { .. } => noise.get(n).copied().unwrap_or(0.0),
        };
        let filtered = match biquad.as_mut() {
            Some(b) => b.process(raw),
            None => raw,
        };
        *out += filtered * voice.gain.value_at(t);
    }
}

/// Direct form I biquad with cookbook coefficients
struct Biquad {
    b0: f32,
    b1: f32,
    b2: f32,
    a1: f32,
    a2: f32,
    x1: f32,
    x2: f32,
    y1: f32,
    y2: f32,
}

impl Biquad {
    fn new(filter: Filter, sample_rate: u32) -> Self {
        let (frequency, q) = match filter {
            Filter::BandPass { frequency, q } => (frequency, q),
            Filter::LowPass { frequency } => (frequency, std::f32::consts::FRAC_1_SQRT_2),
        };
        let w0 = std::f32::consts::TAU * frequency / sample_rate as f32;
        let (sin, cos) = w0.sin_cos();
        let alpha = sin / (2.0 * q);
        let a0 = 1.0 + alpha;

        let (b0, b1, b2) = match filter {
            Filter::BandPass { .. } => (alpha, 0.0, -alpha),
            Filter::LowPass { .. } => ((1.0 - cos) / 2.0, 1.0 - cos, (1.0 - cos) / 2.0),
        };

        Self {
            b0: b0 / a0,
            b1: b1 / a0,
            b2: b2 / a0,
            a1: -2.0 * cos / a0,
            a2: (1.0 - alpha) / a0,
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        }
    }

    fn process(&mut self, x: f32) -> f32 {
        let y = self.b0 * x + self.b1 * self.x1 + self.b2 * self.x2
            - self.a1 * self.y1
            - self.a2 * self.y2;
        self.x2 = self.x1;
        self.x1 = x;
        self.y2 = self.y1;
        self.y1 = y;
        y
    }
}

/// Static gain curve in dB for an input level in dB, soft knee centered on
/// the threshold
fn compressed_level_db(level_db: f32, c: &Compressor) -> f32 {
    let over = level_db - c.threshold_db;
    let half_knee = c.knee_db / 2.0;
    if over <= -half_knee {
        level_db
    } else if over >= half_knee || c.knee_db <= 0.0 {
        c.threshold_db + over / c.ratio
    } else {
        let x = over + half_knee;
        level_db + (1.0 / c.ratio - 1.0) * x * x / (2.0 * c.knee_db)
    }
}

fn compress(samples: &mut [f32], c: &Compressor, sample_rate: u32) {
    let sr = sample_rate as f32;
    let attack = (-1.0 / (c.attack.max(1e-6) * sr)).exp();
    let release = (-1.0 / (c.release.max(1e-6) * sr)).exp();
    let mut reduction_db = 0.0f32;

    for s in samples.iter_mut() {
        let level_db = 20.0 * s.abs().max(1e-9).log10();
        let target = level_db - compressed_level_db(level_db, c);
        let coeff = if target > reduction_db { attack } else { release };
        reduction_db = coeff * reduction_db + (1.0 - coeff) * target;
        *s *= 10f32.powf(-reduction_db / 20.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn linear_ramp_interpolates_between_keyframes() {
        let a = Automation::new(1.0, vec![Keyframe::set(0.0, 80.0), Keyframe::linear(1.0, 120.0)]);
        assert_eq!(a.value_at(0.0), 80.0);
        assert!((a.value_at(0.5) - 100.0).abs() < 1e-4);
        assert_eq!(a.value_at(2.0), 120.0);
    }

    #[test]
    fn value_before_first_keyframe_is_default() {
        let a = Automation::new(1.0, vec![Keyframe::set(0.5, 0.0)]);
        assert_eq!(a.value_at(0.1), 1.0);
        assert_eq!(a.value_at(0.6), 0.0);
    }

    #[test]
    fn exponential_ramp_decays_geometrically() {
        let a = Automation::new(0.0, vec![Keyframe::set(0.0, 1.0), Keyframe::exponential(1.0, 0.01)]);
        assert!((a.value_at(0.5) - 0.1).abs() < 1e-4);
    }

    #[test]
    fn exponential_ramp_from_zero_holds() {
        let a = Automation::new(0.0, vec![Keyframe::set(0.0, 0.0), Keyframe::exponential(1.0, 0.5)]);
        assert_eq!(a.value_at(0.5), 0.0);
        assert_eq!(a.value_at(1.5), 0.5);
    }

    #[test]
    fn soft_knee_is_continuous_at_its_edges() {
        let c = Compressor { threshold_db: -30.0, knee_db: 30.0, ratio: 12.0, attack: 0.003, release: 0.15 };
        let below = compressed_level_db(-45.0, &c);
        let above = compressed_level_db(-15.0, &c);
        assert!((below - -45.0).abs() < 1e-3);
        assert!((above - (-30.0 + 15.0 / 12.0)).abs() < 1e-3);
    }

    #[test]
    fn renders_silence_outside_voice_window() {
        let graph = SoundGraph {
            start: 1.0,
            voices: vec![Voice {
                name: "tone",
                source: Source::Triangle { frequency: Automation::constant(100.0) },
                filter: None,
                gain: Automation::constant(0.5),
                start: 1.05,
                stop: 1.1,
            }],
            compressor: Compressor { threshold_db: 0.0, knee_db: 0.0, ratio: 1.0, attack: 0.003, release: 0.1 },
        };
        let mut rng = StdRng::seed_from_u64(7);
        let samples = render(&graph, 1000, &mut rng);
        assert_eq!(samples.len(), 100);
        assert!(samples[..50].iter().all(|s| *s == 0.0));
        assert!(samples[50..].iter().any(|s| *s != 0.0));
    }
}
