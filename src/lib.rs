//! Flip Countdown - A terminal flip clock counting down to a fixed moment
//! 
//! This library provides the countdown arithmetic, the per-digit flip state
//! machine, a synthesized mechanical flip sound and the terminal renderer.

pub mod audio;
pub mod clock;
pub mod config;
pub mod display;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use state::AppState;
pub use tasks::CountdownHandle;
pub use utils::signals::shutdown_signal;
