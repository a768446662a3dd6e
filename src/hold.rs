//! Hold slot: one piece set aside, usable once per lock

use crate::tetromino::TetrominoType;

/// What the session should spawn after a successful hold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldOutcome {
    /// The slot was empty; spawn the next piece from the queue
    Stored,
    /// The slot held this piece; spawn it in base orientation
    Swapped(TetrominoType),
}

#[derive(Debug, Clone)]
pub struct HoldSlot {
    held: Option<TetrominoType>,
    can_hold: bool,
}

impl Default for HoldSlot {
    fn default() -> Self {
        Self::new()
    }
}

impl HoldSlot {
    pub fn new() -> Self {
        Self {
            held: None,
            can_hold: true,
        }
    }

    pub fn held(&self) -> Option<TetrominoType> {
        self.held
    }

    pub fn can_hold(&self) -> bool {
        self.can_hold
    }

    /// Put `current` in the slot. Returns None if hold was already used
    /// since the last lock.
    pub fn hold(&mut self, current: TetrominoType) -> Option<HoldOutcome> {
        if !self.can_hold {
            return None;
        }
        self.can_hold = false;
        Some(match self.held.replace(current) {
            Some(previous) => HoldOutcome::Swapped(previous),
            None => HoldOutcome::Stored,
        })
    }

    /// Re-enable hold (called whenever a piece locks)
    pub fn release(&mut self) {
        self.can_hold = true;
    }

    pub fn reset(&mut self) {
        self.held = None;
        self.can_hold = true;
    }
}
