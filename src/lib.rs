//! BLOCKFALL - falling-block puzzle engine
//!
//! The engine is a plain owned value: construct a [`GameSession`], feed it
//! [`Intent`]s and clock ticks, and read back a [`Snapshot`] to draw.

pub mod bag;
pub mod board;
pub mod game;
pub mod hold;
pub mod kick;
pub mod piece;
pub mod score;
pub mod settings;
pub mod shape;
pub mod snapshot;
pub mod storage;
pub mod tetromino;

pub use board::{Board, Cell};
pub use game::{GameConfig, GameEvent, GameSession, GameState, Intent};
pub use settings::Settings;
pub use snapshot::{ActiveSnapshot, Snapshot};
pub use storage::{JsonFileStore, MemoryStore, ScoreStore};
pub use tetromino::TetrominoType;
