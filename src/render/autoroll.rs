//! Per-layer autoroll machine.
//!
//! Mode requests (`Start`, `Stop`, `Next`, `Continue`) arrive through draw commands; the run
//! state (entry index and scroll offset) lives here and moves forward once per render cycle.

use crate::draw::command::AutoRoll;
use crate::foundation::core::LayerId;
use crate::foundation::error::{TowerError, TowerResult};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RollPhase {
    /// Never configured; the layer shows its text entries where they were written.
    #[default]
    Idle,
    Running,
    Stopped,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RollState {
    pub phase: RollPhase,
    /// Index of the entry at the left edge of the view.
    pub entry: usize,
    /// Pixels of `entry` already scrolled out of view.
    pub offset: u32,
    /// Gap between consecutive entries.
    pub separator: u32,
}

impl RollState {
    /// Whether the layer is drawn through the rolling view.
    pub fn is_active(&self) -> bool {
        self.phase != RollPhase::Idle
    }

    pub fn is_running(&self) -> bool {
        self.phase == RollPhase::Running
    }

    /// Apply a mode request. `count` is the number of entries the layer currently holds.
    pub fn apply(&mut self, layer: LayerId, roll: AutoRoll, count: usize) -> TowerResult<()> {
        if let Some(entry) = roll.entry() {
            check_entry(layer, entry, count)?;
        }

        match roll {
            AutoRoll::Start { entry, separator } => {
                self.phase = RollPhase::Running;
                self.entry = entry.unwrap_or(0);
                self.offset = 0;
                self.separator = separator;
            }
            AutoRoll::Stop => {
                self.phase = RollPhase::Stopped;
            }
            AutoRoll::Next { entry } => {
                self.entry = match entry {
                    Some(e) => e,
                    None if count == 0 => 0,
                    None => (self.entry + 1) % count,
                };
                self.offset = 0;
                if self.phase == RollPhase::Idle {
                    self.phase = RollPhase::Stopped;
                }
            }
            AutoRoll::Continue => {
                self.phase = RollPhase::Running;
            }
        }
        Ok(())
    }

    /// Scroll `step` pixels; entries wrap once their width plus the separator has passed.
    pub fn advance(&mut self, widths: &[u32], step: u32) {
        if !self.is_running() || widths.is_empty() {
            return;
        }
        self.entry %= widths.len();
        self.offset = self.offset.saturating_add(step);
        loop {
            let pitch = widths[self.entry].saturating_add(self.separator);
            if pitch == 0 {
                self.entry = (self.entry + 1) % widths.len();
                self.offset = 0;
                break;
            }
            if self.offset < pitch {
                break;
            }
            self.offset -= pitch;
            self.entry = (self.entry + 1) % widths.len();
        }
    }

    /// Entries visible in a view `view_width` wide, as `(entry index, left x)` pairs.
    pub fn layout(&self, widths: &[u32], view_width: u32) -> Vec<(usize, i32)> {
        let mut out = Vec::new();
        if widths.is_empty() {
            return out;
        }
        let mut idx = self.entry % widths.len();
        let mut x = -i64::from(self.offset);
        while x < i64::from(view_width) {
            let pitch = i64::from(widths[idx]) + i64::from(self.separator);
            out.push((idx, x as i32));
            if pitch == 0 && out.len() >= widths.len() {
                break;
            }
            x += pitch;
            idx = (idx + 1) % widths.len();
        }
        out
    }
}

fn check_entry(layer: LayerId, entry: usize, count: usize) -> TowerResult<()> {
    // Entry 0 is accepted on an empty layer so a roll can be armed before content arrives.
    if entry == 0 || entry < count {
        return Ok(());
    }
    Err(TowerError::InvalidEntryIndex {
        layer,
        entry,
        count,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/autoroll.rs"]
mod tests;
