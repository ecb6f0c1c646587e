//! Named output surfaces the clock can be mounted on

use std::{collections::HashMap, io::Write};

use clap::ValueEnum;

/// Well-known id of the surface the clock mounts on
pub const MOUNT_ID: &str = "countdown-root";

/// How a surface wants to be drawn on
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    /// Animated flip cards redrawn in place
    Terminal,
    /// One text line per tick
    Plain,
    /// One JSON snapshot per tick
    Json,
}

impl OutputMode {
    /// Animated cards on a terminal, plain lines anywhere else
    pub fn default_for(is_terminal: bool) -> Self {
        if is_terminal { OutputMode::Terminal } else { OutputMode::Plain }
    }
}

pub struct Surface {
    pub mode: OutputMode,
    pub writer: Box<dyn Write + Send>,
}

impl Surface {
    pub fn new(mode: OutputMode, writer: Box<dyn Write + Send>) -> Self {
        Self { mode, writer }
    }
}

/// Registry of available surfaces
#[derive(Default)]
pub struct Surfaces {
    surfaces: HashMap<String, Surface>,
}

impl Surfaces {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, id: impl Into<String>, surface: Surface) {
        self.surfaces.insert(id.into(), surface);
    }

    /// Register `writer` as the clock's surface unless `mode` cannot be
    /// drawn on it. Terminal mode needs a real terminal; without one the
    /// mount point stays absent and [`Surfaces::mount`] fails.
    pub fn register_root(&mut self, mode: OutputMode, is_terminal: bool, writer: Box<dyn Write + Send>) -> bool {
        if mode == OutputMode::Terminal && !is_terminal {
            return false;
        }
        self.register(MOUNT_ID, Surface::new(mode, writer));
        true
    }

    /// Take the clock's surface, failing if nothing is registered under
    /// [`MOUNT_ID`]
    pub fn mount(&mut self) -> Result<Surface, String> {
        self.surfaces
            .remove(MOUNT_ID)
            .ok_or_else(|| format!("Could not find surface '{}' to mount to", MOUNT_ID))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mount_fails_without_the_root_surface() {
        let mut surfaces = Surfaces::new();
        surfaces.register("elsewhere", Surface::new(OutputMode::Plain, Box::new(std::io::sink())));
        let err = surfaces.mount().err().unwrap();
        assert!(err.contains(MOUNT_ID));
    }

    #[test]
    fn mount_takes_the_root_surface() {
        let mut surfaces = Surfaces::new();
        surfaces.register(MOUNT_ID, Surface::new(OutputMode::Json, Box::new(std::io::sink())));
        assert_eq!(surfaces.mount().map(|s| s.mode), Ok(OutputMode::Json));
        assert!(surfaces.mount().is_err());
    }

    #[test]
    fn terminal_mode_needs_a_terminal() {
        let mut surfaces = Surfaces::new();
        assert!(!surfaces.register_root(OutputMode::Terminal, false, Box::new(std::io::sink())));
        assert!(surfaces.mount().is_err());

        assert!(surfaces.register_root(OutputMode::Terminal, true, Box::new(std::io::sink())));
        assert_eq!(surfaces.mount().map(|s| s.mode), Ok(OutputMode::Terminal));
    }

    #[test]
    fn line_modes_mount_anywhere() {
        for mode in [OutputMode::Plain, OutputMode::Json] {
            let mut surfaces = Surfaces::new();
            assert!(surfaces.register_root(mode, false, Box::new(std::io::sink())));
            assert_eq!(surfaces.mount().map(|s| s.mode), Ok(mode));
        }
    }

    #[test]
    fn default_mode_follows_the_terminal() {
        assert_eq!(OutputMode::default_for(true), OutputMode::Terminal);
        assert_eq!(OutputMode::default_for(false), OutputMode::Plain);
    }
}
