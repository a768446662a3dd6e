//! Tetromino definitions and base shapes
//!
//! All 7 pieces in their spawn orientation. Rotated states are derived from
//! these with [`Shape::rotated_cw`].

use crate::shape::Shape;
use serde::{Deserialize, Serialize};

/// The 7 tetromino types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TetrominoType {
    I, // Cyan - long bar
    J, // Blue
    L, // Orange
    O, // Yellow - square
    S, // Green
    T, // Purple
    Z, // Red
}

impl TetrominoType {
    /// Get all tetromino types for bag randomization
    pub fn all() -> [TetrominoType; 7] {
        [
            TetrominoType::I,
            TetrominoType::J,
            TetrominoType::L,
            TetrominoType::O,
            TetrominoType::S,
            TetrominoType::T,
            TetrominoType::Z,
        ]
    }

    /// The spawn-orientation matrix for this piece, row 0 on top
    pub fn base_shape(&self) -> Shape {
        match self {
            TetrominoType::I => Shape::from_rows(&[&[1, 1, 1, 1]]),
            // J: ..#    L: #..
            //    ###       ###
            TetrominoType::J => Shape::from_rows(&[&[0, 0, 1], &[1, 1, 1]]),
            TetrominoType::L => Shape::from_rows(&[&[1, 0, 0], &[1, 1, 1]]),
            TetrominoType::O => Shape::from_rows(&[&[1, 1], &[1, 1]]),
            // S: .##    Z: ##.
            //    ##.       .##
            TetrominoType::S => Shape::from_rows(&[&[0, 1, 1], &[1, 1, 0]]),
            TetrominoType::T => Shape::from_rows(&[&[1, 1, 1], &[0, 1, 0]]),
            TetrominoType::Z => Shape::from_rows(&[&[1, 1, 0], &[0, 1, 1]]),
        }
    }

    /// Display color as an `#rrggbb` string
    pub fn hex_color(&self) -> &'static str {
        match self {
            TetrominoType::I => "#00fff7",
            TetrominoType::J => "#1e90ff",
            TetrominoType::L => "#ff9900",
            TetrominoType::O => "#ffe600",
            TetrominoType::S => "#39ff14",
            TetrominoType::T => "#d726ff",
            TetrominoType::Z => "#ff206e",
        }
    }

    /// Display color as RGB components
    pub fn rgb(&self) -> (u8, u8, u8) {
        let hex = &self.hex_color()[1..];
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).unwrap_or(0);
        (channel(0), channel(2), channel(4))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_every_piece_has_four_cells() {
        for kind in TetrominoType::all() {
            assert_eq!(kind.base_shape().filled_cells().count(), 4, "{:?}", kind);
        }
    }

    #[test]
    fn test_base_shape_sizes() {
        let size = |k: TetrominoType| {
            let s = k.base_shape();
            (s.height(), s.width())
        };
        assert_eq!(size(TetrominoType::I), (1, 4));
        assert_eq!(size(TetrominoType::O), (2, 2));
        for kind in [
            TetrominoType::J,
            TetrominoType::L,
            TetrominoType::S,
            TetrominoType::T,
            TetrominoType::Z,
        ] {
            assert_eq!(size(kind), (2, 3));
        }
    }

    #[test]
    fn test_colors_are_distinct() {
        let colors: HashSet<_> = TetrominoType::all().iter().map(|k| k.rgb()).collect();
        assert_eq!(colors.len(), 7);
        assert_eq!(TetrominoType::J.rgb(), (0x1e, 0x90, 0xff));
    }
}
