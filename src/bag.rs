//! 7-bag randomizer for piece generation
//!
//! All 7 pieces are shuffled, then dealt out before reshuffling. This
//! prevents long droughts. The preview queue sits on top of the bag.

use crate::tetromino::TetrominoType;
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use std::collections::VecDeque;

/// Number of upcoming pieces shown to the player
pub const NEXT_QUEUE_SIZE: usize = 3;

/// The 7-bag piece randomizer
#[derive(Debug, Clone)]
pub struct Bag {
    /// Remaining pieces of the current bag, dealt from the end
    pieces: Vec<TetrominoType>,
    rng: ChaCha8Rng,
}

impl Default for Bag {
    fn default() -> Self {
        Self::new()
    }
}

impl Bag {
    /// Create a bag seeded from the thread RNG
    pub fn new() -> Self {
        Self::with_seed(rand::random())
    }

    /// Create a bag with a fixed seed (deterministic sequences)
    pub fn with_seed(seed: u64) -> Self {
        Self {
            pieces: Vec::with_capacity(7),
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Replace the current bag with a freshly shuffled full set
    pub fn refill(&mut self) {
        let mut new_bag = TetrominoType::all().to_vec();
        new_bag.shuffle(&mut self.rng);
        self.pieces = new_bag;
    }

    /// Deal the next piece, refilling first when the bag is empty
    pub fn pop(&mut self) -> TetrominoType {
        if self.pieces.is_empty() {
            self.refill();
        }
        match self.pieces.pop() {
            Some(piece) => piece,
            None => unreachable!("bag refilled with 7 pieces"),
        }
    }

    /// Pieces left before the next refill
    pub fn remaining(&self) -> usize {
        self.pieces.len()
    }

    /// Throw away the current bag; the RNG stream continues
    pub fn reset(&mut self) {
        self.pieces.clear();
    }
}

/// Fixed-size preview of upcoming pieces
#[derive(Debug, Clone, Default)]
pub struct NextQueue {
    queue: VecDeque<TetrominoType>,
}

impl NextQueue {
    pub fn new() -> Self {
        Self {
            queue: VecDeque::with_capacity(NEXT_QUEUE_SIZE),
        }
    }

    /// Top the queue up to [`NEXT_QUEUE_SIZE`] from the bag
    pub fn fill(&mut self, bag: &mut Bag) {
        while self.queue.len() < NEXT_QUEUE_SIZE {
            self.queue.push_back(bag.pop());
        }
    }

    /// Take the front piece and immediately refill the back
    pub fn pull_next(&mut self, bag: &mut Bag) -> TetrominoType {
        self.fill(bag);
        let next = match self.queue.pop_front() {
            Some(piece) => piece,
            None => unreachable!("queue filled before pull"),
        };
        self.queue.push_back(bag.pop());
        next
    }

    /// The piece that will spawn next, if the queue has been filled
    pub fn peek(&self) -> Option<TetrominoType> {
        self.queue.front().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = TetrominoType> + '_ {
        self.queue.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn reset(&mut self) {
        self.queue.clear();
    }
}
