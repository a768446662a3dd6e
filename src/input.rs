//! Keyboard mapping from terminal key events to session intents

use blockfall::settings::Settings;
use blockfall::{GameState, Intent};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// What a key press asks the frontend to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Play(Intent),
    Quit,
}

/// Key bindings configuration - supports multiple keys per intent
#[derive(Debug, Clone)]
pub struct KeyBindings {
    pub move_left: Vec<KeyCode>,
    pub move_right: Vec<KeyCode>,
    pub soft_drop: Vec<KeyCode>,
    pub hard_drop: Vec<KeyCode>,
    pub rotate: Vec<KeyCode>,
    pub hold: Vec<KeyCode>,
    pub pause: Vec<KeyCode>,
    pub start: Vec<KeyCode>,
    pub quit: Vec<KeyCode>,
}

impl KeyBindings {
    /// Parse a key string into KeyCode
    fn parse_key(s: &str) -> Option<KeyCode> {
        let code = match s.to_lowercase().as_str() {
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "space" => KeyCode::Char(' '),
            "enter" => KeyCode::Enter,
            "tab" => KeyCode::Tab,
            "esc" | "escape" => KeyCode::Esc,
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => KeyCode::Char(c),
                    _ => {
                        tracing::warn!("Unknown key name in settings: {:?}", s);
                        return None;
                    }
                }
            }
        };
        Some(code)
    }

    /// Parse a list of key strings into KeyCodes
    fn parse_keys(keys: &[String]) -> Vec<KeyCode> {
        keys.iter().filter_map(|s| Self::parse_key(s)).collect()
    }

    /// Create keybindings from settings
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            move_left: Self::parse_keys(&settings.keys.move_left),
            move_right: Self::parse_keys(&settings.keys.move_right),
            soft_drop: Self::parse_keys(&settings.keys.soft_drop),
            hard_drop: Self::parse_keys(&settings.keys.hard_drop),
            rotate: Self::parse_keys(&settings.keys.rotate),
            hold: Self::parse_keys(&settings.keys.hold),
            pause: Self::parse_keys(&settings.keys.pause),
            start: Self::parse_keys(&settings.keys.start),
            quit: Self::parse_keys(&settings.keys.quit),
        }
    }

    /// Translate a key press given the session's current state
    ///
    /// Between games the drop and rotate keys double as "start".
    pub fn command_for(&self, key: KeyEvent, state: GameState) -> Option<Command> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Some(Command::Quit);
        }

        let code = normalize_key(key.code);
        if self.quit.contains(&code) {
            return Some(Command::Quit);
        }
        if self.start.contains(&code) {
            return Some(Command::Play(Intent::Start));
        }

        let between_games = matches!(state, GameState::Idle | GameState::GameOver);
        if between_games {
            let starts = self.hard_drop.contains(&code) || self.rotate.contains(&code);
            return starts.then_some(Command::Play(Intent::Start));
        }

        let intent = if self.pause.contains(&code) {
            Intent::TogglePause
        } else if self.move_left.contains(&code) {
            Intent::MoveLeft
        } else if self.move_right.contains(&code) {
            Intent::MoveRight
        } else if self.soft_drop.contains(&code) {
            Intent::SoftDrop
        } else if self.hard_drop.contains(&code) {
            Intent::HardDrop
        } else if self.rotate.contains(&code) {
            Intent::Rotate
        } else if self.hold.contains(&code) {
            Intent::Hold
        } else {
            return None;
        };
        Some(Command::Play(intent))
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

/// Normalize key codes for consistent handling
fn normalize_key(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    }
}
