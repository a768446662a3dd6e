//! Read-only view of a session for rendering

use crate::board::Cell;
use crate::game::GameState;
use crate::shape::Shape;
use crate::tetromino::TetrominoType;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActiveSnapshot {
    pub kind: TetrominoType,
    pub shape: Shape,
    pub x: i32,
    pub y: i32,
}

impl ActiveSnapshot {
    /// Board positions covered when the piece's top edge sits at row `y`
    pub fn cells_at(&self, y: i32) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.shape
            .filled_cells()
            .map(move |(dx, dy)| (self.x + dx, y + dy))
    }

    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.cells_at(self.y)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub state: GameState,
    /// Locked cells, row 0 on top
    pub board: Vec<Vec<Cell>>,
    pub active: Option<ActiveSnapshot>,
    /// Landing row of the active piece
    pub ghost_y: Option<i32>,
    pub hold: Option<TetrominoType>,
    pub can_hold: bool,
    pub next: Vec<TetrominoType>,
    pub score: u64,
    pub best: u64,
    pub lines: u32,
    pub level: u32,
    pub drop_interval_ms: u64,
    pub running: bool,
    pub paused: bool,
    pub game_over: bool,
}

impl Snapshot {
    pub fn rows(&self) -> usize {
        self.board.len()
    }

    pub fn cols(&self) -> usize {
        self.board.first().map_or(0, Vec::len)
    }

    /// Locked cell at (x, y), None when out of range
    pub fn cell(&self, x: usize, y: usize) -> Option<Cell> {
        self.board.get(y).and_then(|row| row.get(x)).copied()
    }
}
