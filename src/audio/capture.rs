//! Audio capture tap
//!
//! Forwards the first channel of every processed frame, copied, to its host.
//! It never analyses or modifies the audio.

use tokio::sync::mpsc;
use tracing::trace;

pub const DEFAULT_FRAME_SIZE: usize = 1024;

/// Construction options for [`CaptureProcessor`]
#[derive(Debug, Clone, Default)]
pub struct CaptureOptions {
    pub frame_size: Option<usize>,
}

/// One processing cycle's inputs: inputs, then channels, then samples
pub type Inputs<'a> = &'a [Vec<Vec<f32>>];

pub struct CaptureProcessor {
    frame_size: usize,
    port: mpsc::UnboundedSender<Vec<f32>>,
}

impl CaptureProcessor {
    pub fn new(options: CaptureOptions, port: mpsc::UnboundedSender<Vec<f32>>) -> Self {
        Self {
            frame_size: options.frame_size.filter(|n| *n > 0).unwrap_or(DEFAULT_FRAME_SIZE),
            port,
        }
    }

    pub fn frame_size(&self) -> usize {
        self.frame_size
    }

    /// Run one cycle. Always returns `true` so the host keeps calling.
    pub fn process(&mut self, inputs: Inputs<'_>) -> bool {
        let Some(channel) = inputs.first().and_then(|input| input.first()) else {
            trace!("No input this cycle");
            return true;
        };

        // A closed port means the host stopped listening; keep running anyway.
        let _ = self.port.send(channel.clone());
        true
    }
}
