//! Signal handling for graceful shutdown and the sound toggle gesture

use std::sync::Arc;
use signal_hook_tokio::Signals;
use futures::stream::StreamExt;
use tracing::{info, warn};

use crate::state::AppState;

/// Register the shutdown signals (SIGTERM, SIGINT)
pub fn shutdown_signals() -> Result<Signals, String> {
    Signals::new(&[
        signal_hook::consts::SIGTERM,
        signal_hook::consts::SIGINT,
    ])
    .map_err(|e| format!("Failed to create signal handler: {}", e))
}

/// Wait for the first shutdown signal
pub async fn shutdown_signal(mut signals: Signals) {
    if let Some(signal) = signals.next().await {
        info!("Received signal: {}", signal);
    }
}

/// Treat every SIGUSR1 as a user gesture toggling the sound
pub async fn gesture_listener(state: Arc<AppState>) {
    let mut signals = match Signals::new(&[signal_hook::consts::SIGUSR1]) {
        Ok(signals) => signals,
        Err(e) => {
            warn!("Sound toggle unavailable, failed to listen for SIGUSR1: {}", e);
            return;
        }
    };

    while signals.next().await.is_some() {
        if let Err(e) = state.user_gesture() {
            warn!("Failed to toggle sound: {}", e);
        }
    }
}
