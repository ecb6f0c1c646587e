//! Audio output background tasks

use std::{path::PathBuf, time::Duration};
use tokio::{
    fs::File,
    io::AsyncWriteExt,
    sync::mpsc,
    time::{interval_at, Instant},
};
use tracing::{debug, error, info};

use crate::audio::{CaptureProcessor, Mixer, ScheduledSound};

/// Mixes rendered sounds on the context timeline and pushes them through
/// the capture processor one frame at a time.
///
/// `origin` must be the same instant the sound context counts from.
pub async fn audio_output_task(
    mut sounds: mpsc::UnboundedReceiver<ScheduledSound>,
    mut processor: CaptureProcessor,
    origin: Instant,
    sample_rate: u32,
) {
    let frame_size = processor.frame_size();
    info!("Starting audio output task: {} Hz, {} samples per frame", sample_rate, frame_size);

    let period = Duration::from_secs_f64(frame_size as f64 / sample_rate as f64);
    let mut frames = interval_at(origin, period);
    let mut mixer = Mixer::new(sample_rate);
    let mut cursor: u64 = 0;
    let mut open = true;

    loop {
        tokio::select! {
            received = sounds.recv(), if open => match received {
                Some(sound) => mixer.add(sound),
                None => {
                    debug!("Sound channel closed");
                    open = false;
                }
            },

            _ = frames.tick() => {
                let inputs = match mixer.take_frame(cursor, frame_size) {
                    Some(frame) => vec![vec![frame]],
                    None => Vec::new(),
                };
                processor.process(&inputs);
                cursor += frame_size as u64;

                if !open && mixer.is_idle() {
                    break;
                }
            }
        }
    }

    info!("Audio output task stopped");
}

/// Drains captured frames, appending them to `path` as little-endian f32
/// PCM when a path is given
pub async fn capture_sink_task(mut frames: mpsc::UnboundedReceiver<Vec<f32>>, path: Option<PathBuf>) {
    let mut file = match &path {
        Some(path) => match File::create(path).await {
            Ok(file) => {
                info!("Writing captured audio to {}", path.display());
                Some(file)
            }
            Err(e) => {
                error!("Failed to open {}: {}", path.display(), e);
                None
            }
        },
        None => None,
    };

    let mut captured: u64 = 0;
    while let Some(frame) = frames.recv().await {
        captured += frame.len() as u64;
        let Some(out) = file.as_mut() else {
            continue;
        };

        let bytes: Vec<u8> = frame.iter().flat_map(|s| s.to_le_bytes()).collect();
        if let Err(e) = out.write_all(&bytes).await {
            error!("Failed to write captured audio, disabling sink: {}", e);
            file = None;
        }
    }

    if let Some(mut out) = file {
        if let Err(e) = out.flush().await {
            error!("Failed to flush captured audio: {}", e);
        }
    }
    debug!("Capture sink stopped after {} samples", captured);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::CaptureOptions;

    #[tokio::test(start_paused = true)]
    async fn scheduled_sound_comes_out_framed() {
        let (sound_tx, sound_rx) = mpsc::unbounded_channel();
        let (port_tx, mut port_rx) = mpsc::unbounded_channel();
        let processor = CaptureProcessor::new(CaptureOptions { frame_size: Some(4) }, port_tx);
        let origin = Instant::now();

        // 1000 Hz, 4 samples per frame: frames every 4ms
        sound_tx.send(ScheduledSound { start: 0.006, samples: vec![0.5; 4] }).unwrap();
        drop(sound_tx);

        audio_output_task(sound_rx, processor, origin, 1000).await;

        let mut frames = Vec::new();
        while let Ok(frame) = port_rx.try_recv() {
            frames.push(frame);
        }
        assert_eq!(frames, vec![vec![0.0, 0.0, 0.5, 0.5], vec![0.5, 0.5, 0.0, 0.0]]);
    }

    #[tokio::test]
    async fn sink_writes_little_endian_floats() {
        let path = std::env::temp_dir().join(format!("flip-countdown-sink-{}.pcm", std::process::id()));
        let (tx, rx) = mpsc::unbounded_channel();
        tx.send(vec![1.0f32, -0.5]).unwrap();
        drop(tx);

        capture_sink_task(rx, Some(path.clone())).await;

        let bytes = tokio::fs::read(&path).await.unwrap();
        let _ = tokio::fs::remove_file(&path).await;
        let mut expected = 1.0f32.to_le_bytes().to_vec();
        expected.extend((-0.5f32).to_le_bytes());
        assert_eq!(bytes, expected);
    }
}
