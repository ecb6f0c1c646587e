//! Flip Countdown - A terminal flip clock counting down to a fixed moment
//!
//! This is the main entry point for the flip-countdown application.

use std::{
    io::{self, IsTerminal},
    sync::Arc,
};
use tokio::{sync::mpsc, time::Instant};
use tracing::info;

use flip_countdown::{
    audio::{CaptureOptions, CaptureProcessor, SoundContext, SynthContext},
    config::Config,
    display::{OutputMode, Renderer, Surfaces},
    state::{AppState, Countdown, SoundFactory, SystemTime},
    tasks::{audio_output_task, capture_sink_task, CountdownHandle},
    utils::{gesture_listener, shutdown_signal, shutdown_signals},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Logs go to stderr, the clock owns stdout
    tracing_subscriber::fmt()
        .with_env_filter(format!("flip_countdown={}", config.log_level()))
        .with_writer(io::stderr)
        .init();

    info!("Starting flip-countdown v1.0.0");

    // Only stdout can host the clock; terminal mode needs a real terminal
    let stdout_is_terminal = io::stdout().is_terminal();
    let mode = config.output.unwrap_or_else(|| OutputMode::default_for(stdout_is_terminal));
    let mut surfaces = Surfaces::new();
    if !surfaces.register_root(mode, stdout_is_terminal, Box::new(io::stdout())) {
        tracing::warn!("{:?} output needs a terminal on stdout", mode);
    }

    let surface = match surfaces.mount() {
        Ok(surface) => surface,
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    };

    let countdown = match Countdown::fixed() {
        Ok(countdown) => countdown,
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    };

    let signals = match shutdown_signals() {
        Ok(signals) => signals,
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    };

    info!("Configuration: output={:?}, sample_rate={}, frame_size={}",
          mode, config.sample_rate, config.frame_size);

    // Audio pipeline: context -> output task -> capture processor -> sink
    let audio_origin = Instant::now();
    let (sound_tx, sound_rx) = mpsc::unbounded_channel();
    let (port_tx, port_rx) = mpsc::unbounded_channel();
    let processor = CaptureProcessor::new(
        CaptureOptions { frame_size: Some(config.frame_size) },
        port_tx,
    );
    tokio::spawn(audio_output_task(sound_rx, processor, audio_origin, config.sample_rate));
    tokio::spawn(capture_sink_task(port_rx, config.audio_out.clone()));

    let sample_rate = config.sample_rate;
    let sound_factory: SoundFactory = Box::new(move || {
        Arc::new(SynthContext::new(audio_origin, sample_rate, sound_tx.clone())) as Arc<dyn SoundContext>
    });

    // Create application state
    let state = Arc::new(AppState::new(countdown, sound_factory));
    if config.sound {
        state.user_gesture().map_err(anyhow::Error::msg)?;
    }

    tokio::spawn(gesture_listener(Arc::clone(&state)));

    let countdown_handle = CountdownHandle::spawn(
        Arc::clone(&state),
        Arc::new(SystemTime),
        Renderer::new(surface),
        config.redraw_interval(),
    );

    shutdown_signal(signals).await;
    info!("Shutdown signal received");

    countdown_handle.shutdown().await;
    info!("Shutdown complete after {}", state.get_uptime());
    Ok(())
}
