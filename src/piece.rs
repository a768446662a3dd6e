//! Active falling piece logic

use crate::board::Board;
use crate::kick::kick_candidates;
use crate::shape::Shape;
use crate::tetromino::TetrominoType;

/// An active falling piece
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    /// The type of tetromino
    pub kind: TetrominoType,
    /// Current rotation state of the matrix
    pub shape: Shape,
    /// Top-left corner of the shape's bounding box; y grows downward
    pub x: i32,
    pub y: i32,
}

impl Piece {
    /// Create a new piece centred at the top of a board `cols` wide
    pub fn spawn(kind: TetrominoType, cols: usize) -> Self {
        let shape = kind.base_shape();
        let x = (cols / 2) as i32 - (shape.width() / 2) as i32;
        Self { kind, shape, x, y: 0 }
    }

    /// Whether the piece overlaps anything where it stands
    pub fn collides(&self, board: &Board) -> bool {
        board.collides(&self.shape, self.x, self.y)
    }

    /// Absolute board positions (x, y) of every block
    pub fn block_positions(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.shape
            .filled_cells()
            .map(|(dx, dy)| (self.x + dx, self.y + dy))
    }

    /// Try to shift by (dx, dy), returns true if successful
    pub fn move_by(&mut self, dx: i32, dy: i32, board: &Board) -> bool {
        if board.collides(&self.shape, self.x + dx, self.y + dy) {
            return false;
        }
        self.x += dx;
        self.y += dy;
        true
    }

    pub fn move_left(&mut self, board: &Board) -> bool {
        self.move_by(-1, 0, board)
    }

    pub fn move_right(&mut self, board: &Board) -> bool {
        self.move_by(1, 0, board)
    }

    pub fn move_down(&mut self, board: &Board) -> bool {
        self.move_by(0, 1, board)
    }

    /// Rotate clockwise, trying each wall kick in turn
    ///
    /// Leaves the piece untouched and returns false when every kick collides.
    pub fn rotate(&mut self, board: &Board) -> bool {
        let rotated = self.shape.rotated_cw();
        let Some(x) = kick_candidates(self.x).find(|&x| !board.collides(&rotated, x, self.y))
        else {
            return false;
        };
        self.shape = rotated;
        self.x = x;
        true
    }

    /// Get the ghost piece row (where the piece would land)
    pub fn ghost_row(&self, board: &Board) -> i32 {
        let mut y = self.y;
        while !board.collides(&self.shape, self.x, y + 1) {
            y += 1;
        }
        y
    }

    /// Hard drop - jump to the ghost row and return distance dropped
    pub fn hard_drop(&mut self, board: &Board) -> u32 {
        let target = self.ghost_row(board);
        let distance = (target - self.y) as u32;
        self.y = target;
        distance
    }
}
