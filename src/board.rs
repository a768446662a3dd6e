//! Game board representation and collision detection

use crate::piece::Piece;
use crate::shape::Shape;
use crate::tetromino::TetrominoType;
use serde::{Deserialize, Serialize};

/// Standard board dimensions
pub const DEFAULT_COLS: usize = 10;
pub const DEFAULT_ROWS: usize = 20;

/// A cell on the board - either empty or filled by a locked piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    Filled(TetrominoType),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn is_filled(&self) -> bool {
        matches!(self, Cell::Filled(_))
    }
}

/// The game board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    cols: usize,
    /// Grid stored as [row][col], row 0 is the top
    cells: Vec<Vec<Cell>>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new(DEFAULT_ROWS, DEFAULT_COLS)
    }
}

impl Board {
    /// Create a new empty board
    pub fn new(rows: usize, cols: usize) -> Self {
        assert!(rows > 0 && cols > 0, "board must have at least one cell");
        Self {
            cols,
            cells: vec![vec![Cell::Empty; cols]; rows],
        }
    }

    pub fn rows(&self) -> usize {
        self.cells.len()
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Get the cell at column `x`, row `y`
    /// Returns None if out of bounds
    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        if x < 0 || y < 0 {
            return None;
        }
        self.cells
            .get(y as usize)
            .and_then(|row| row.get(x as usize))
            .copied()
    }

    /// Set a cell
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) -> bool {
        if x < 0 || y < 0 {
            return false;
        }
        match self
            .cells
            .get_mut(y as usize)
            .and_then(|row| row.get_mut(x as usize))
        {
            Some(slot) => {
                *slot = cell;
                true
            }
            None => false,
        }
    }

    /// A whole row, top to bottom indexing
    pub fn row(&self, y: usize) -> &[Cell] {
        &self.cells[y]
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.iter().map(Vec::as_slice)
    }

    /// Whether `shape` placed with its top-left corner at (x, y) overlaps a
    /// wall, the floor, or a locked cell. Cells above row 0 are allowed.
    pub fn collides(&self, shape: &Shape, x: i32, y: i32) -> bool {
        shape.filled_cells().any(|(dx, dy)| {
            let (bx, by) = (x + dx, y + dy);
            if bx < 0 || bx >= self.cols as i32 || by >= self.rows() as i32 {
                return true;
            }
            by >= 0 && self.cells[by as usize][bx as usize].is_filled()
        })
    }

    /// Lock a piece onto the board
    pub fn merge(&mut self, piece: &Piece) {
        let cell = Cell::Filled(piece.kind);
        for (dx, dy) in piece.shape.filled_cells() {
            // Off-board cells are dropped
            self.set(piece.x + dx, piece.y + dy, cell);
        }
    }

    /// Clear completed lines and return the number cleared
    ///
    /// Scans bottom to top. A cleared row is replaced by the rows above it,
    /// so the same index is checked again before moving up.
    pub fn clear_full_lines(&mut self) -> usize {
        let mut cleared = 0;
        let mut y = self.rows();
        while y > 0 {
            let row = y - 1;
            if self.is_line_full(row) {
                self.cells.remove(row);
                self.cells.insert(0, vec![Cell::Empty; self.cols]);
                cleared += 1;
            } else {
                y -= 1;
            }
        }
        cleared
    }

    /// Check if a line is completely filled
    fn is_line_full(&self, row: usize) -> bool {
        self.cells[row].iter().all(|cell| cell.is_filled())
    }

    /// Empty every cell
    pub fn reset(&mut self) {
        for row in &mut self.cells {
            row.fill(Cell::Empty);
        }
    }

    /// Check if the board is completely empty
    pub fn is_empty(&self) -> bool {
        self.cells
            .iter()
            .all(|row| row.iter().all(|cell| cell.is_empty()))
    }
}
