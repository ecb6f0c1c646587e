//! Sample timeline that sums overlapping sounds

use super::context::ScheduledSound;

#[derive(Debug)]
struct Clip {
    first_sample: u64,
    samples: Vec<f32>,
}

impl Clip {
    fn end(&self) -> u64 {
        self.first_sample + self.samples.len() as u64
    }
}

/// Mixes scheduled sounds onto a sample-indexed timeline
#[derive(Debug)]
pub struct Mixer {
    sample_rate: u32,
    clips: Vec<Clip>,
}

impl Mixer {
    pub fn new(sample_rate: u32) -> Self {
        Self { sample_rate, clips: Vec::new() }
    }

    pub fn add(&mut self, sound: ScheduledSound) {
        let first_sample = (sound.start.max(0.0) * self.sample_rate as f64).round() as u64;
        self.clips.push(Clip { first_sample, samples: sound.samples });
    }

    pub fn is_idle(&self) -> bool {
        self.clips.is_empty()
    }

    /// Mix `[from, from + len)` and forget clips that ended before `from + len`.
    ///
    /// Returns `None` when nothing overlaps the window.
    pub fn take_frame(&mut self, from: u64, len: usize) -> Option<Vec<f32>> {
        let to = from + len as u64;
        let mut frame: Option<Vec<f32>> = None;

        for clip in &self.clips {
            if clip.end() <= from || clip.first_sample >= to {
                continue;
            }
            let out = frame.get_or_insert_with(|| vec![0.0; len]);
            let start = clip.first_sample.max(from);
            let stop = clip.end().min(to);
            for pos in start..stop {
                out[(pos - from) as usize] += clip.samples[(pos - clip.first_sample) as usize];
            }
        }

        self.clips.retain(|clip| clip.end() > to);
        frame
    }
}
