//! Wall kick offsets
//!
//! When a rotation would collide, these horizontal offsets are tried in
//! order. The same table applies to every piece and rotation state.

/// Horizontal kick offsets, in priority order
pub const WALL_KICKS: [i32; 5] = [0, -1, 1, -2, 2];

/// Candidate anchor columns for a rotation starting at `x`
pub fn kick_candidates(x: i32) -> impl Iterator<Item = i32> {
    WALL_KICKS.into_iter().map(move |dx| x + dx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_kick_is_identity() {
        assert_eq!(WALL_KICKS[0], 0);
    }

    #[test]
    fn test_candidate_order() {
        let xs: Vec<_> = kick_candidates(4).collect();
        assert_eq!(xs, vec![4, 3, 5, 2, 6]);
    }
}
