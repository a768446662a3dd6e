//! Core game state and logic
//!
//! [`GameSession`] owns the board, the falling piece, the queues and the
//! counters. It is driven by [`Intent`]s and [`GameSession::tick`] and never
//! draws anything; frontends read [`GameSession::snapshot`] and drain
//! [`GameEvent`]s.

use crate::bag::{Bag, NextQueue};
use crate::board::{Board, DEFAULT_COLS, DEFAULT_ROWS};
use crate::hold::{HoldOutcome, HoldSlot};
use crate::piece::Piece;
use crate::score::{Score, SpeedCurve};
use crate::snapshot::{ActiveSnapshot, Snapshot};
use crate::storage::{BEST_SCORE_KEY, ScoreStore};
use crate::tetromino::TetrominoType;
use serde::Serialize;
use tracing::{debug, info, warn};

/// Session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GameState {
    /// Constructed, waiting for the first start
    Idle,
    Running,
    Paused,
    /// Topped out; only a restart leaves this state
    GameOver,
}

/// Input intents the session can process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    MoveLeft,
    MoveRight,
    SoftDrop,
    HardDrop,
    Rotate,
    Hold,
    TogglePause,
    Start,
}

/// Things that happened, for the presentation to react to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    PieceLocked,
    LinesCleared { count: usize, points: u64 },
    LevelUp { level: u32 },
    Held(TetrominoType),
    GameOver { score: u64, new_best: bool },
}

/// Session tuning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    pub rows: usize,
    pub cols: usize,
    pub speed: SpeedCurve,
    /// Fixed bag seed; random when None
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            speed: SpeedCurve::default(),
            seed: None,
        }
    }
}

/// The game session
pub struct GameSession {
    board: Board,
    active: Option<Piece>,
    bag: Bag,
    next: NextQueue,
    hold: HoldSlot,
    score: Score,
    state: GameState,
    /// Timestamp of the last gravity step; None re-bases on the next tick
    last_drop_ms: Option<u64>,
    /// Best score seen, including the running game
    best: u64,
    /// Best score as last written to the store
    stored_best: u64,
    best_at_start: u64,
    store: Box<dyn ScoreStore>,
    events: Vec<GameEvent>,
}

impl GameSession {
    /// Create an idle session; the best score is read from `store`
    pub fn new(config: GameConfig, store: Box<dyn ScoreStore>) -> Self {
        let bag = match config.seed {
            Some(seed) => Bag::with_seed(seed),
            None => Bag::new(),
        };
        let best = match store.get(BEST_SCORE_KEY) {
            Ok(best) => best.unwrap_or(0),
            Err(e) => {
                warn!("Could not read best score: {:#}", e);
                0
            }
        };

        Self {
            board: Board::new(config.rows, config.cols),
            active: None,
            bag,
            next: NextQueue::new(),
            hold: HoldSlot::new(),
            score: Score::new(config.speed),
            state: GameState::Idle,
            last_drop_ms: None,
            best,
            stored_best: best,
            best_at_start: best,
            store,
            events: Vec::new(),
        }
    }

    /// Create a session with a fixed bag seed and default tuning
    pub fn with_seed(seed: u64, store: Box<dyn ScoreStore>) -> Self {
        let config = GameConfig {
            seed: Some(seed),
            ..GameConfig::default()
        };
        Self::new(config, store)
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn active(&self) -> Option<&Piece> {
        self.active.as_ref()
    }

    pub fn score(&self) -> &Score {
        &self.score
    }

    pub fn best_score(&self) -> u64 {
        self.best
    }

    pub fn held(&self) -> Option<TetrominoType> {
        self.hold.held()
    }

    pub fn next_pieces(&self) -> impl Iterator<Item = TetrominoType> + '_ {
        self.next.iter()
    }

    /// Landing row of the active piece
    pub fn ghost_row(&self) -> Option<i32> {
        self.active.as_ref().map(|piece| piece.ghost_row(&self.board))
    }

    /// Process one intent
    pub fn apply(&mut self, intent: Intent) {
        match intent {
            Intent::Start => self.start(),
            Intent::TogglePause => self.toggle_pause(),
            Intent::MoveLeft => {
                self.move_left();
            }
            Intent::MoveRight => {
                self.move_right();
            }
            Intent::SoftDrop => {
                self.soft_drop();
            }
            Intent::HardDrop => {
                self.hard_drop();
            }
            Intent::Rotate => {
                self.rotate();
            }
            Intent::Hold => {
                self.hold();
            }
        }
    }

    /// Reset everything and begin a new game
    pub fn start(&mut self) {
        self.board.reset();
        self.score.reset();
        self.hold.reset();
        self.bag.reset();
        self.next.reset();
        self.events.clear();
        self.active = None;
        self.last_drop_ms = None;
        self.best_at_start = self.best;
        self.state = GameState::Running;

        self.next.fill(&mut self.bag);
        self.spawn_next();
        info!(
            "Game started on a {}x{} board, best={}",
            self.board.cols(),
            self.board.rows(),
            self.best
        );
    }

    /// Pause a running game or resume a paused one
    pub fn toggle_pause(&mut self) {
        match self.state {
            GameState::Running => {
                self.state = GameState::Paused;
                debug!("Paused");
            }
            GameState::Paused => {
                self.state = GameState::Running;
                // Elapsed time while paused must not count toward gravity
                self.last_drop_ms = None;
                debug!("Resumed");
            }
            GameState::Idle | GameState::GameOver => {}
        }
    }

    /// Advance the gravity clock (call every frame)
    ///
    /// At most one automatic drop happens per call. Gravity drops score
    /// nothing.
    pub fn tick(&mut self, now_ms: u64) {
        if self.state != GameState::Running {
            return;
        }
        let Some(last) = self.last_drop_ms else {
            self.last_drop_ms = Some(now_ms);
            return;
        };
        if now_ms.saturating_sub(last) > self.score.drop_interval_ms {
            self.last_drop_ms = Some(now_ms);
            self.gravity_step();
        }
    }

    pub fn move_left(&mut self) -> bool {
        self.shift(-1)
    }

    pub fn move_right(&mut self) -> bool {
        self.shift(1)
    }

    fn shift(&mut self, dx: i32) -> bool {
        if self.state != GameState::Running {
            return false;
        }
        match &mut self.active {
            Some(piece) => piece.move_by(dx, 0, &self.board),
            None => false,
        }
    }

    pub fn rotate(&mut self) -> bool {
        if self.state != GameState::Running {
            return false;
        }
        match &mut self.active {
            Some(piece) => piece.rotate(&self.board),
            None => false,
        }
    }

    /// Player soft drop: one row for one point, locking if blocked
    pub fn soft_drop(&mut self) -> bool {
        if self.state != GameState::Running {
            return false;
        }
        let Some(piece) = &mut self.active else {
            return false;
        };
        if piece.move_down(&self.board) {
            self.score.add_soft_drop(1);
            self.update_best();
            true
        } else {
            self.lock_piece();
            false
        }
    }

    /// Drop to the ghost row, score 2 per row, and lock.
    /// Returns the distance dropped.
    pub fn hard_drop(&mut self) -> u32 {
        if self.state != GameState::Running {
            return 0;
        }
        let Some(piece) = &mut self.active else {
            return 0;
        };
        let distance = piece.hard_drop(&self.board);
        self.score.add_hard_drop(distance);
        self.update_best();
        self.lock_piece();
        distance
    }

    /// Swap the active piece with the hold slot, once per lock
    pub fn hold(&mut self) -> bool {
        if self.state != GameState::Running {
            return false;
        }
        let Some(current) = self.active.as_ref().map(|piece| piece.kind) else {
            return false;
        };
        let Some(outcome) = self.hold.hold(current) else {
            return false;
        };

        let kind = match outcome {
            HoldOutcome::Stored => self.next.pull_next(&mut self.bag),
            HoldOutcome::Swapped(held) => held,
        };
        debug!("Held {:?}, spawning {:?}", current, kind);
        self.events.push(GameEvent::Held(current));
        self.spawn_piece(kind);
        true
    }

    fn gravity_step(&mut self) {
        let Some(piece) = &mut self.active else {
            return;
        };
        if !piece.move_down(&self.board) {
            self.lock_piece();
        }
    }

    /// Lock the current piece and spawn next
    fn lock_piece(&mut self) {
        let Some(piece) = self.active.take() else {
            return;
        };

        self.board.merge(&piece);
        self.events.push(GameEvent::PieceLocked);

        let cleared = self.board.clear_full_lines();
        if cleared > 0 {
            let level_before = self.score.level;
            let points = self.score.add_clear(cleared);
            debug!(
                "Cleared {} line(s) for {} points, lines={}",
                cleared, points, self.score.lines
            );
            self.events.push(GameEvent::LinesCleared {
                count: cleared,
                points,
            });
            if self.score.level > level_before {
                info!(
                    "Level {} reached, drop interval {}ms",
                    self.score.level, self.score.drop_interval_ms
                );
                self.events.push(GameEvent::LevelUp {
                    level: self.score.level,
                });
            }
            self.update_best();
        } else {
            debug!("Locked {:?} at ({}, {})", piece.kind, piece.x, piece.y);
        }

        self.hold.release();
        self.spawn_next();
    }

    fn spawn_next(&mut self) {
        let kind = self.next.pull_next(&mut self.bag);
        self.spawn_piece(kind);
    }

    /// Place a fresh piece at the spawn point; a blocked spawn ends the game
    fn spawn_piece(&mut self, kind: TetrominoType) {
        let piece = Piece::spawn(kind, self.board.cols());
        let blocked = piece.collides(&self.board);
        self.active = Some(piece);
        if blocked {
            self.game_over();
        }
    }

    fn game_over(&mut self) {
        self.state = GameState::GameOver;
        self.last_drop_ms = None;
        let score = self.score.points;
        let new_best = score > self.best_at_start;
        info!(
            "Game over: score={}, lines={}, level={}, new_best={}",
            score, self.score.lines, self.score.level, new_best
        );
        self.flush_best();
        self.events.push(GameEvent::GameOver { score, new_best });
    }

    /// Raise the best score and write it through to the store
    fn update_best(&mut self) {
        if self.score.points > self.best {
            self.best = self.score.points;
            self.flush_best();
        }
    }

    /// Write the best score to the store if it improved
    pub fn flush_best(&mut self) {
        if self.best <= self.stored_best {
            return;
        }
        match self.store.set(BEST_SCORE_KEY, self.best) {
            Ok(()) => {
                info!("New best score {} saved", self.best);
                self.stored_best = self.best;
            }
            Err(e) => warn!("Could not save best score: {:#}", e),
        }
    }

    /// Take the events queued since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Everything a renderer needs
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            state: self.state,
            board: self.board.iter_rows().map(<[_]>::to_vec).collect(),
            active: self.active.as_ref().map(|piece| ActiveSnapshot {
                kind: piece.kind,
                shape: piece.shape.clone(),
                x: piece.x,
                y: piece.y,
            }),
            ghost_y: self.ghost_row(),
            hold: self.hold.held(),
            can_hold: self.hold.can_hold(),
            next: self.next.iter().collect(),
            score: self.score.points,
            best: self.best,
            lines: self.score.lines,
            level: self.score.level,
            drop_interval_ms: self.score.drop_interval_ms,
            running: self.state == GameState::Running,
            paused: self.state == GameState::Paused,
            game_over: self.state == GameState::GameOver,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bag::NEXT_QUEUE_SIZE;
    use crate::board::Cell;
    use crate::storage::MemoryStore;

    fn started(seed: u64) -> GameSession {
        let mut game = GameSession::with_seed(seed, Box::new(MemoryStore::new()));
        game.start();
        game
    }

    /// Replace the active piece with `kind` at its spawn transform
    fn force_piece(game: &mut GameSession, kind: TetrominoType) {
        game.active = Some(Piece::spawn(kind, game.board.cols()));
    }

    /// Fill row `y` except the given columns
    fn fill_row_except(game: &mut GameSession, y: i32, gaps: &[i32]) {
        for x in 0..game.board.cols() as i32 {
            if !gaps.contains(&x) {
                game.board.set(x, y, Cell::Filled(TetrominoType::Z));
            }
        }
    }

    #[test]
    fn test_idle_ignores_play_intents() {
        let mut game = GameSession::with_seed(1, Box::new(MemoryStore::new()));
        assert_eq!(game.state(), GameState::Idle);
        game.apply(Intent::MoveLeft);
        game.apply(Intent::HardDrop);
        game.apply(Intent::Hold);
        game.apply(Intent::TogglePause);
        game.tick(10_000);
        assert_eq!(game.state(), GameState::Idle);
        assert!(game.active().is_none());
        assert_eq!(game.score().points, 0);
    }

    #[test]
    fn test_start_spawns_and_fills_queue() {
        let game = started(7);
        assert_eq!(game.state(), GameState::Running);
        let piece = game.active().unwrap();
        assert_eq!(piece.y, 0);
        assert_eq!(piece.shape, piece.kind.base_shape());
        assert_eq!(game.next_pieces().count(), NEXT_QUEUE_SIZE);
        let snap = game.snapshot();
        assert!(snap.running);
        assert_eq!(snap.level, 1);
        assert_eq!(snap.drop_interval_ms, 700);
    }

    #[test]
    fn test_moves_and_rotation() {
        let mut game = started(3);
        force_piece(&mut game, TetrominoType::T);
        game.apply(Intent::MoveLeft);
        assert_eq!(game.active().unwrap().x, 3);
        game.apply(Intent::MoveRight);
        game.apply(Intent::MoveRight);
        assert_eq!(game.active().unwrap().x, 5);
        game.apply(Intent::Rotate);
        assert_eq!(game.active().unwrap().shape.height(), 3);
    }

    #[test]
    fn test_soft_drop_scores_gravity_does_not() {
        let mut game = started(11);
        force_piece(&mut game, TetrominoType::O);
        game.apply(Intent::SoftDrop);
        game.apply(Intent::SoftDrop);
        assert_eq!(game.active().unwrap().y, 2);
        assert_eq!(game.score().points, 2);

        game.tick(0);
        game.tick(701);
        assert_eq!(game.active().unwrap().y, 3);
        assert_eq!(game.score().points, 2);
    }

    #[test]
    fn test_tick_interval_is_strict() {
        let mut game = started(5);
        force_piece(&mut game, TetrominoType::I);
        // First tick only sets the base
        game.tick(1_000);
        assert_eq!(game.active().unwrap().y, 0);
        game.tick(1_700);
        assert_eq!(game.active().unwrap().y, 0);
        game.tick(1_701);
        assert_eq!(game.active().unwrap().y, 1);
        // One step per tick no matter how late
        game.tick(9_000);
        assert_eq!(game.active().unwrap().y, 2);
    }

    #[test]
    fn test_gravity_locks_on_floor() {
        let mut game = started(8);
        force_piece(&mut game, TetrominoType::O);
        game.active.as_mut().unwrap().y = 18;
        game.tick(0);
        game.tick(800);
        assert!(game.board.get(4, 19).unwrap().is_filled());
        assert_eq!(game.active().unwrap().y, 0);
        assert!(game.drain_events().contains(&GameEvent::PieceLocked));
    }

    #[test]
    fn test_pause_blocks_input_and_gravity() {
        let mut game = started(2);
        force_piece(&mut game, TetrominoType::T);
        game.tick(0);
        game.apply(Intent::TogglePause);
        assert_eq!(game.state(), GameState::Paused);
        assert!(game.snapshot().paused);

        game.apply(Intent::MoveLeft);
        game.apply(Intent::HardDrop);
        game.tick(5_000);
        assert_eq!(game.active().unwrap().x, 4);
        assert_eq!(game.active().unwrap().y, 0);

        // Resume re-bases the timer: no instant drop from stale time
        game.apply(Intent::TogglePause);
        assert_eq!(game.state(), GameState::Running);
        game.tick(60_000);
        assert_eq!(game.active().unwrap().y, 0);
        game.tick(60_701);
        assert_eq!(game.active().unwrap().y, 1);
    }

    #[test]
    fn test_hold_stores_then_ignores_rehold() {
        let mut game = started(21);
        let first = game.active().unwrap().kind;
        let upcoming = game.next_pieces().next().unwrap();

        game.apply(Intent::Hold);
        assert_eq!(game.held(), Some(first));
        assert_eq!(game.active().unwrap().kind, upcoming);
        assert_eq!(game.next_pieces().count(), NEXT_QUEUE_SIZE);

        let before = game.snapshot();
        game.apply(Intent::Hold);
        assert_eq!(game.snapshot(), before);
    }

    #[test]
    fn test_hold_swaps_after_lock() {
        let mut game = started(4);
        let first = game.active().unwrap().kind;
        game.apply(Intent::Hold);
        game.apply(Intent::HardDrop);
        assert!(game.snapshot().can_hold);

        let current = game.active().unwrap().kind;
        assert!(game.hold());
        assert_eq!(game.held(), Some(current));
        let swapped = game.active().unwrap();
        assert_eq!(swapped.kind, first);
        assert_eq!(swapped.shape, first.base_shape());
        assert_eq!(swapped.y, 0);
        assert_eq!(swapped.x, Piece::spawn(first, 10).x);
    }

    #[test]
    fn test_hold_into_blocked_spawn_ends_game() {
        let mut game = started(6);
        force_piece(&mut game, TetrominoType::O);
        game.active.as_mut().unwrap().y = 10;
        fill_row_except(&mut game, 0, &[0]);
        game.apply(Intent::Hold);
        assert_eq!(game.state(), GameState::GameOver);
    }

    #[test]
    fn test_single_line_clear_scores_table_value() {
        let mut game = started(9);
        fill_row_except(&mut game, 19, &[3, 4, 5, 6]);
        force_piece(&mut game, TetrominoType::I);

        assert_eq!(game.hard_drop(), 19);
        assert_eq!(game.score().points, 19 * 2 + 100);
        assert_eq!(game.score().lines, 1);
        assert!(game.board.is_empty());
    }

    #[test]
    fn test_double_clear_with_o_piece() {
        let mut game = started(10);
        fill_row_except(&mut game, 18, &[4, 5]);
        fill_row_except(&mut game, 19, &[4, 5]);
        force_piece(&mut game, TetrominoType::O);
        game.drain_events();

        game.apply(Intent::HardDrop);
        assert_eq!(game.score().points, 18 * 2 + 300);
        assert_eq!(game.score().lines, 2);
        let events = game.drain_events();
        assert!(events.contains(&GameEvent::LinesCleared {
            count: 2,
            points: 300
        }));
    }

    #[test]
    fn test_tetris_at_level_three() {
        let mut game = started(12);
        game.score.add_clear(4);
        game.score.add_clear(4);
        game.score.add_clear(4);
        game.score.add_clear(4);
        game.score.add_clear(4);
        game.score.points = 0;
        assert_eq!(game.score().level, 3);

        for y in 16..20 {
            fill_row_except(&mut game, y, &[0]);
        }
        force_piece(&mut game, TetrominoType::I);
        game.apply(Intent::Rotate);
        for _ in 0..3 {
            game.apply(Intent::MoveLeft);
        }
        assert_eq!(game.active().unwrap().x, 0);

        game.apply(Intent::HardDrop);
        assert_eq!(game.score().points, 16 * 2 + 800 * 3);
        assert_eq!(game.score().lines, 24);
    }

    #[test]
    fn test_repeated_hard_drops_fill_a_row() {
        let mut game = started(2024);
        fill_row_except(&mut game, 19, &[4, 5]);

        // Park everything except the O on the left; the O plugs the gap.
        // A fresh 7-bag guarantees an O within 7 pieces.
        for _ in 0..7 {
            let kind = game.active().unwrap().kind;
            if kind == TetrominoType::O {
                let before = game.score().points;
                let distance = game.hard_drop();
                assert_eq!(distance, 18);
                assert_eq!(game.score().points - before, 18 * 2 + 100);
                assert_eq!(game.score().lines, 1);
                assert_eq!(game.state(), GameState::Running);
                return;
            }
            while game.move_left() {}
            game.hard_drop();
            assert_eq!(game.score().lines, 0);
        }
        panic!("no O piece within one bag");
    }

    #[test]
    fn test_top_out_ends_game() {
        let mut game = GameSession::with_seed(31, Box::new(MemoryStore::with_best(10)));
        game.start();
        for y in 2..20 {
            fill_row_except(&mut game, y, &[9]);
        }
        force_piece(&mut game, TetrominoType::O);
        // Blocked soft drop locks the O across the spawn rows
        game.apply(Intent::SoftDrop);

        assert_eq!(game.state(), GameState::GameOver);
        let events = game.drain_events();
        assert!(events.contains(&GameEvent::GameOver {
            score: 0,
            new_best: false
        }));

        // Terminal: nothing moves, gravity stops
        let frozen = game.snapshot();
        assert!(frozen.game_over);
        game.apply(Intent::MoveLeft);
        game.apply(Intent::Rotate);
        game.apply(Intent::Hold);
        game.apply(Intent::TogglePause);
        game.tick(0);
        game.tick(100_000);
        assert_eq!(game.snapshot(), frozen);

        // Only start leaves game over
        game.apply(Intent::Start);
        assert_eq!(game.state(), GameState::Running);
        assert!(game.board.is_empty());
        assert_eq!(game.score().points, 0);
    }

    #[test]
    fn test_best_score_persisted_when_exceeded() {
        let mut game = GameSession::with_seed(13, Box::new(MemoryStore::with_best(50)));
        assert_eq!(game.best_score(), 50);
        game.start();
        force_piece(&mut game, TetrominoType::I);
        game.apply(Intent::HardDrop);
        // 19 rows * 2 points, not yet above the best
        assert_eq!(game.snapshot().best, 50);

        force_piece(&mut game, TetrominoType::I);
        game.apply(Intent::HardDrop);
        assert_eq!(game.score().points, 38 + 36);
        assert_eq!(game.snapshot().best, 74);
        // Written as soon as the score passes the previous best
        assert_eq!(game.store.get(BEST_SCORE_KEY).unwrap(), Some(74));

        for y in 2..18 {
            fill_row_except(&mut game, y, &[9]);
        }
        force_piece(&mut game, TetrominoType::O);
        game.apply(Intent::HardDrop);
        assert_eq!(game.state(), GameState::GameOver);
        assert_eq!(game.store.get(BEST_SCORE_KEY).unwrap(), Some(74));
        assert!(game.drain_events().contains(&GameEvent::GameOver {
            score: 74,
            new_best: true
        }));
    }

    #[test]
    fn test_first_points_reach_empty_store() {
        let mut game = GameSession::with_seed(14, Box::new(MemoryStore::new()));
        game.start();
        game.apply(Intent::HardDrop);
        let score = game.score().points;
        assert!(score > 0);
        assert_eq!(game.store.get(BEST_SCORE_KEY).unwrap(), Some(score));
        // Nothing new to write
        game.flush_best();
        assert_eq!(game.store.get(BEST_SCORE_KEY).unwrap(), Some(score));
    }

    #[test]
    fn test_snapshot_contents() {
        let mut game = started(15);
        force_piece(&mut game, TetrominoType::T);
        let snap = game.snapshot();
        assert_eq!(snap.rows(), 20);
        assert_eq!(snap.cols(), 10);
        let active = snap.active.as_ref().unwrap();
        assert_eq!(active.kind, TetrominoType::T);
        assert_eq!(snap.ghost_y, Some(18));
        assert_eq!(active.cells_at(18).count(), 4);
        assert_eq!(snap.next.len(), NEXT_QUEUE_SIZE);
        assert_eq!(snap.hold, None);
        assert!(snap.can_hold);
        assert_eq!(snap.cell(0, 0), Some(Cell::Empty));
    }

    #[test]
    fn test_custom_board_size() {
        let config = GameConfig {
            rows: 8,
            cols: 6,
            seed: Some(1),
            ..GameConfig::default()
        };
        let mut game = GameSession::new(config, Box::new(MemoryStore::new()));
        game.start();
        assert_eq!(game.board.rows(), 8);
        let piece = game.active().unwrap();
        assert_eq!(piece.x, 3 - (piece.shape.width() / 2) as i32);
    }
}
