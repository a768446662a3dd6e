//! Piece shape matrices
//!
//! A shape is a small binary matrix; rotation builds a new matrix and never
//! mutates the original.

use serde::{Deserialize, Serialize};

/// Binary occupancy matrix, stored as rows (row 0 on top)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Shape {
    cells: Vec<Vec<bool>>,
}

impl Shape {
    /// Build a shape from rows of 0/1 values
    ///
    /// Panics on an empty matrix or ragged rows; shape data is static.
    pub fn from_rows(rows: &[&[u8]]) -> Self {
        assert!(!rows.is_empty(), "shape needs at least one row");
        let width = rows[0].len();
        assert!(width > 0, "shape needs at least one column");
        assert!(
            rows.iter().all(|row| row.len() == width),
            "shape rows must have equal width"
        );
        Self {
            cells: rows
                .iter()
                .map(|row| row.iter().map(|&v| v != 0).collect())
                .collect(),
        }
    }

    pub fn width(&self) -> usize {
        self.cells[0].len()
    }

    pub fn height(&self) -> usize {
        self.cells.len()
    }

    /// Whether the cell at column `x`, row `y` is filled
    pub fn is_filled(&self, x: usize, y: usize) -> bool {
        self.cells
            .get(y)
            .and_then(|row| row.get(x))
            .copied()
            .unwrap_or(false)
    }

    /// Iterate the (x, y) offsets of every filled cell
    pub fn filled_cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.cells.iter().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, filled)| **filled)
                .map(move |(x, _)| (x as i32, y as i32))
        })
    }

    pub fn rows(&self) -> &[Vec<bool>] {
        &self.cells
    }

    /// Rotate 90° clockwise
    ///
    /// Each column of the original, read bottom to top, becomes a row:
    /// `rotated[i][j] = original[h - 1 - j][i]`.
    pub fn rotated_cw(&self) -> Shape {
        let h = self.height();
        let cells = (0..self.width())
            .map(|i| (0..h).map(|j| self.cells[h - 1 - j][i]).collect())
            .collect();
        Shape { cells }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tetromino::TetrominoType;

    #[test]
    fn test_rotate_i_becomes_vertical() {
        let shape = TetrominoType::I.base_shape().rotated_cw();
        assert_eq!(shape.width(), 1);
        assert_eq!(shape.height(), 4);
    }

    #[test]
    fn test_rotate_t_clockwise() {
        // ###      .#
        // .#.  ->  ##
        //          .#
        let rotated = TetrominoType::T.base_shape().rotated_cw();
        let expected = Shape::from_rows(&[&[0, 1], &[1, 1], &[0, 1]]);
        assert_eq!(rotated, expected);
    }

    #[test]
    fn test_four_rotations_is_identity() {
        for kind in TetrominoType::all() {
            let base = kind.base_shape();
            let spun = base.rotated_cw().rotated_cw().rotated_cw().rotated_cw();
            assert_eq!(spun, base, "{:?}", kind);
        }
    }

    #[test]
    fn test_rotation_keeps_cell_count() {
        for kind in TetrominoType::all() {
            let rotated = kind.base_shape().rotated_cw();
            assert_eq!(rotated.filled_cells().count(), 4);
        }
    }

    #[test]
    #[should_panic]
    fn test_ragged_rows_panic() {
        Shape::from_rows(&[&[1, 1], &[1]]);
    }
}
