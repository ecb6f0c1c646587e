//! Draws the clock onto a mounted surface

use std::io::Write;

use tracing::debug;

use crate::clock::{Cell, FlipView};
use super::{
    snapshot::ClockSnapshot,
    surface::{OutputMode, Surface},
};

pub const TITLE: &str = "Countdown to Webinar";

const HIDE_CURSOR: &str = "\x1b[?25l";
const SHOW_CURSOR: &str = "\x1b[?25h";
const CLEAR_LINE: &str = "\x1b[2K";

/// Everything needed to draw one frame
pub struct Frame<'a> {
    pub cells: &'a [Cell],
    pub snapshot: &'a ClockSnapshot,
}

/// The five text rows of a card, top border to bottom border
fn card_rows(view: &FlipView) -> [String; 5] {
    let (top, bottom) = view.faces();
    let hinge = if view.progress.is_some() { "├╌╌╌┤" } else { "├───┤" };
    [
        "┌───┐".to_string(),
        format!("│ {} │", top),
        hinge.to_string(),
        format!("│ {} │", bottom),
        "└───┘".to_string(),
    ]
}

const SEPARATOR_ROWS: [&str; 5] = ["   ", "   ", " : ", "   ", "   "];

/// Lay cells side by side as text rows
pub fn clock_rows(cells: &[Cell]) -> Vec<String> {
    let mut rows = vec![String::new(); 5];
    for cell in cells {
        match cell {
            Cell::Digit(view) => {
                for (row, part) in rows.iter_mut().zip(card_rows(view)) {
                    row.push_str(&part);
                }
            }
            Cell::Separator => {
                for (row, part) in rows.iter_mut().zip(SEPARATOR_ROWS) {
                    row.push_str(part);
                }
            }
        }
    }
    rows
}

fn status_line(snapshot: &ClockSnapshot) -> String {
    if snapshot.sound_active {
        "[♪ sound on]  send SIGUSR1 to mute".to_string()
    } else {
        "[✕ muted]  send SIGUSR1 for sound".to_string()
    }
}

/// Full terminal frame, top to bottom
pub fn terminal_lines(frame: &Frame<'_>) -> Vec<String> {
    let mut lines = vec![TITLE.to_string(), String::new()];
    lines.extend(clock_rows(frame.cells));
    lines.push(frame.snapshot.target_display.clone());
    lines.push(status_line(frame.snapshot));
    lines
}

pub fn plain_line(snapshot: &ClockSnapshot) -> String {
    format!(
        "{} {} ({}){}",
        TITLE,
        snapshot.clock_text(),
        snapshot.target_display,
        if snapshot.muted { "" } else { " ♪" }
    )
}

pub struct Renderer {
    surface: Surface,
    /// Lines drawn by the previous terminal frame
    drawn: usize,
}

impl Renderer {
    pub fn new(surface: Surface) -> Self {
        Self { surface, drawn: 0 }
    }

    /// Whether frames between ticks change anything
    pub fn is_animated(&self) -> bool {
        self.surface.mode == OutputMode::Terminal
    }

    /// Draw a frame produced by a countdown tick
    pub fn tick(&mut self, frame: &Frame<'_>) -> Result<(), String> {
        match self.surface.mode {
            OutputMode::Terminal => self.redraw(frame),
            OutputMode::Plain => self.write_line(&plain_line(frame.snapshot)),
            OutputMode::Json => {
                let json = serde_json::to_string(frame.snapshot)
                    .map_err(|e| format!("Failed to serialize snapshot: {}", e))?;
                self.write_line(&json)
            }
        }
    }

    /// Redraw the animated clock in place. Line modes ignore this.
    pub fn redraw(&mut self, frame: &Frame<'_>) -> Result<(), String> {
        if !self.is_animated() {
            return Ok(());
        }

        let lines = terminal_lines(frame);
        let mut out = String::new();
        if self.drawn == 0 {
            out.push_str(HIDE_CURSOR);
        } else {
            out.push_str(&format!("\x1b[{}A", self.drawn));
        }
        for line in &lines {
            out.push('\r');
            out.push_str(CLEAR_LINE);
            out.push_str(line);
            out.push('\n');
        }
        self.drawn = lines.len();
        self.write_raw(&out)
    }

    fn write_line(&mut self, line: &str) -> Result<(), String> {
        self.write_raw(&format!("{}\n", line))
    }

    fn write_raw(&mut self, text: &str) -> Result<(), String> {
        self.surface
            .writer
            .write_all(text.as_bytes())
            .and_then(|_| self.surface.writer.flush())
            .map_err(|e| format!("Failed to write to surface: {}", e))
    }
}

impl Drop for Renderer {
    fn drop(&mut self) {
        if self.drawn > 0 {
            debug!("Restoring terminal cursor");
            let _ = self.write_raw(SHOW_CURSOR);
        }
    }
}
