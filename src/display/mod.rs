//! Display module
//!
//! Output surfaces, the terminal and line renderers, and the target date line.

pub mod date;
pub mod renderer;
pub mod snapshot;
pub mod surface;

// Re-export main types
pub use date::format_local;
pub use renderer::{Frame, Renderer};
pub use snapshot::ClockSnapshot;
pub use surface::{OutputMode, Surface, Surfaces, MOUNT_ID};
