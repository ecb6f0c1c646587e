//! Arranges flip units into the days:hours:minutes:seconds clock

use tokio::time::Instant;
use tracing::debug;

use super::{
    digit_unit::{DigitUnit, FlipView, SoundCue},
    time_fields::TimeFields,
};

/// One slot of the clock face, left to right
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell {
    Digit(FlipView),
    Separator,
}

/// Field strings for a set of fields, in display order
pub fn compose(fields: &TimeFields) -> [String; 4] {
    fields.padded()
}

/// The whole clock: one group of units per field
pub struct FlipClock {
    groups: [Vec<DigitUnit>; 4],
}

impl FlipClock {
    pub fn new(fields: &TimeFields) -> Self {
        let groups = compose(fields).map(|text| text.chars().map(DigitUnit::new).collect());
        Self { groups }
    }

    /// Drive every unit from new field values. Returns how many units
    /// started a flip.
    pub fn update(&mut self, fields: &TimeFields, cue: SoundCue<'_>) -> usize {
        let mut flips = 0;
        for (units, text) in self.groups.iter_mut().zip(compose(fields)) {
            let digits: Vec<char> = text.chars().collect();
            resize_group(units, &digits);
            for (unit, digit) in units.iter_mut().zip(digits) {
                if unit.update(digit, cue) {
                    flips += 1;
                }
            }
        }
        flips
    }

    pub fn unit_count(&self) -> usize {
        self.groups.iter().map(Vec::len).sum()
    }

    /// Current digits of every unit, separators left out
    pub fn digits(&self) -> String {
        self.groups
            .iter()
            .flatten()
            .map(|unit| unit.snapshot().current)
            .collect()
    }

    /// Units and separators in display order
    pub fn layout(&self, now: Instant) -> Vec<Cell> {
        let mut cells = Vec::with_capacity(self.unit_count() + 3);
        for (i, units) in self.groups.iter().enumerate() {
            if i > 0 {
                cells.push(Cell::Separator);
            }
            cells.extend(units.iter().map(|unit| Cell::Digit(unit.view(now))));
        }
        cells
    }
}

/// Match the unit count to the digit count. Units are aligned from the
/// right so the ones digit keeps its unit when days gain or lose a digit.
fn resize_group(units: &mut Vec<DigitUnit>, digits: &[char]) {
    if units.len() == digits.len() {
        return;
    }
    debug!("Resizing field from {} to {} units", units.len(), digits.len());

    if units.len() > digits.len() {
        units.drain(..units.len() - digits.len());
    } else {
        let added = digits.len() - units.len();
        let fresh: Vec<DigitUnit> = digits[..added].iter().copied().map(DigitUnit::new).collect();
        units.splice(0..0, fresh);
    }
}
