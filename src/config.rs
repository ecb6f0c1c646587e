//! Configuration and CLI argument handling

use std::{path::PathBuf, time::Duration};
use clap::{builder::RangedU64ValueParser, Parser};

use crate::{audio::capture::DEFAULT_FRAME_SIZE, display::OutputMode};

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "flip-countdown")]
#[command(about = "A terminal flip clock counting down to a fixed moment")]
#[command(version = "1.0.0")]
pub struct Config {
    /// How to draw the clock; defaults to terminal when stdout is a terminal
    #[arg(short, long, value_enum)]
    pub output: Option<OutputMode>,

    /// Enable sound at startup instead of waiting for SIGUSR1
    #[arg(short, long)]
    pub sound: bool,

    /// Write captured flip audio to this file as raw f32 little-endian PCM
    #[arg(long)]
    pub audio_out: Option<PathBuf>,

    /// Sample rate of the synthesized sound
    #[arg(long, default_value = "48000", value_parser = clap::value_parser!(u32).range(1..))]
    pub sample_rate: u32,

    /// Samples per captured audio frame
    #[arg(
        long,
        default_value_t = DEFAULT_FRAME_SIZE,
        value_parser = RangedU64ValueParser::<usize>::new().range(1..)
    )]
    pub frame_size: usize,

    /// Milliseconds between animation frames
    #[arg(long, default_value = "50")]
    pub frame_interval_ms: u64,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    pub fn redraw_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms.max(10))
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}
