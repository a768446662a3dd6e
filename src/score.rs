//! Scoring, level progression and gravity speed

use serde::{Deserialize, Serialize};

/// Lines needed per level
pub const LINES_PER_LEVEL: u32 = 10;

/// Gravity interval as a function of level:
/// `max(min_ms, base_ms - (level - 1) * step_ms)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeedCurve {
    pub base_ms: u64,
    pub step_ms: u64,
    pub min_ms: u64,
}

impl Default for SpeedCurve {
    fn default() -> Self {
        Self {
            base_ms: 700,
            step_ms: 55,
            min_ms: 90,
        }
    }
}

impl SpeedCurve {
    pub fn interval_for(&self, level: u32) -> u64 {
        let slowdown = u64::from(level.saturating_sub(1)).saturating_mul(self.step_ms);
        self.base_ms.saturating_sub(slowdown).max(self.min_ms)
    }
}

/// Base points for clearing 1-4 lines at once
pub fn line_clear_points(cleared: usize) -> u64 {
    match cleared {
        1 => 100,
        2 => 300,
        3 => 500,
        4 => 800,
        _ => 0,
    }
}

/// Score tracking
#[derive(Debug, Clone)]
pub struct Score {
    /// Current score
    pub points: u64,
    /// Total lines cleared
    pub lines: u32,
    /// Current level, derived from lines
    pub level: u32,
    /// Gravity interval for the current level
    pub drop_interval_ms: u64,
    curve: SpeedCurve,
}

impl Default for Score {
    fn default() -> Self {
        Self::new(SpeedCurve::default())
    }
}

impl Score {
    pub fn new(curve: SpeedCurve) -> Self {
        Self {
            points: 0,
            lines: 0,
            level: 1,
            drop_interval_ms: curve.interval_for(1),
            curve,
        }
    }

    /// Back to the initial values
    pub fn reset(&mut self) {
        *self = Self::new(self.curve);
    }

    /// Award a line clear and advance lines/level
    ///
    /// The multiplier is the level in effect before these lines count.
    /// Returns the points awarded.
    pub fn add_clear(&mut self, cleared: usize) -> u64 {
        let awarded = line_clear_points(cleared) * u64::from(self.level);
        self.points += awarded;
        self.lines += cleared as u32;
        self.update_level();
        awarded
    }

    /// Add score for a manual soft drop (1 point per row)
    pub fn add_soft_drop(&mut self, rows: u32) {
        self.points += u64::from(rows);
    }

    /// Add score for hard drop (2 points per row)
    pub fn add_hard_drop(&mut self, rows: u32) {
        self.points += u64::from(rows) * 2;
    }

    fn update_level(&mut self) {
        self.level = self.lines / LINES_PER_LEVEL + 1;
        self.drop_interval_ms = self.curve.interval_for(self.level);
    }
}
