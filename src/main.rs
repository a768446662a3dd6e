//! BLOCKFALL terminal frontend
//!
//! Owns the clock and the keyboard; everything else lives in the engine.

mod input;
mod ui;

use anyhow::{Context, Result};
use blockfall::{GameEvent, GameSession, JsonFileStore, MemoryStore, ScoreStore, Settings};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use input::{Command, KeyBindings};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::{
    io::{self, stdout},
    path::PathBuf,
    time::{Duration, Instant},
};
use tracing_subscriber::EnvFilter;

/// Target frame rate
const TARGET_FPS: u64 = 60;
const FRAME_DURATION: Duration = Duration::from_micros(1_000_000 / TARGET_FPS);

/// How long the board border stays lit after a clear
const FLASH_DURATION: Duration = Duration::from_millis(150);

/// Get the blockfall temp directory, creating it if needed
fn blockfall_temp_dir() -> PathBuf {
    let dir = std::env::temp_dir().join("blockfall");
    let _ = std::fs::create_dir_all(&dir);
    dir
}

fn open_store() -> Box<dyn ScoreStore> {
    match JsonFileStore::open_default() {
        Ok(store) => {
            tracing::info!("Best score stored at {}", store.path().display());
            Box::new(store)
        }
        Err(e) => {
            tracing::warn!("No score file available, best score kept in memory: {:#}", e);
            Box::new(MemoryStore::new())
        }
    }
}

fn main() -> Result<()> {
    // Generate session ID for this instance
    let session_id: u32 = rand::random();

    // Setup tracing to log file
    let log_dir = blockfall_temp_dir();
    let log_file = format!("{:08x}.log", session_id);
    let file_appender = tracing_appender::rolling::never(&log_dir, &log_file);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let filter = EnvFilter::from_default_env().add_directive(
        "blockfall=debug"
            .parse()
            .context("invalid log directive")?,
    );
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(filter)
        .with_ansi(false)
        .init();

    tracing::info!(
        "BLOCKFALL starting up, session={:08x}, log={}",
        session_id,
        log_dir.join(&log_file).display()
    );

    let settings = Settings::load();
    let keys = KeyBindings::from_settings(&settings);
    let mut session = GameSession::new(settings.gameplay.to_config(), open_store());

    // Setup terminal
    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Run app and capture result
    let result = run_app(&mut terminal, &mut session, &keys, &settings);

    session.flush_best();

    // Restore terminal
    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen)?;

    tracing::info!("BLOCKFALL shutting down");

    if result.is_ok() {
        let score = session.score();
        println!("\nThanks for playing BLOCKFALL!");
        println!("Final Score: {} | Best: {}", score.points, session.best_score());
        println!("Level: {} | Lines: {}", score.level, score.lines);
    }

    result.context("terminal I/O failed")
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    session: &mut GameSession,
    keys: &KeyBindings,
    settings: &Settings,
) -> io::Result<()> {
    let clock = Instant::now();
    let mut flash_until: Option<Instant> = None;

    loop {
        // Render
        let snap = session.snapshot();
        let fx = ui::Effects {
            flash: flash_until.is_some_and(|until| Instant::now() < until),
        };
        terminal.draw(|frame| ui::render_game(frame, &snap, &settings.visual, fx))?;

        // Handle input
        if event::poll(FRAME_DURATION)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match keys.command_for(key, session.state()) {
                        Some(Command::Quit) => return Ok(()),
                        Some(Command::Play(intent)) => session.apply(intent),
                        None => {}
                    }
                }
            }
        }

        // Update game logic
        session.tick(clock.elapsed().as_millis() as u64);

        for event in session.drain_events() {
            match event {
                GameEvent::LinesCleared { .. } => {
                    flash_until = Some(Instant::now() + FLASH_DURATION);
                }
                GameEvent::GameOver { score, new_best } => {
                    tracing::info!("Round finished with {} points (new best: {})", score, new_best);
                }
                _ => {}
            }
        }
    }
}
