//! Key mapping from terminal events to game actions.
//!
//! Arrows, WASD and HJKL all work; `z`/`y` rotate counter-clockwise.
//! Letters are matched case-insensitively.

use crate::handler::HeldKey;
use crate::types::GameAction;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// The action a single press of `key` stands for.
///
/// Keys that [`HeldKey`] tracks map to the action of their first shot.
pub fn handle_key_event(key: KeyEvent) -> Option<GameAction> {
    if let Some(held) = HeldKey::from_code(key.code) {
        return Some(match held {
            HeldKey::Left => GameAction::MoveLeft,
            HeldKey::Right => GameAction::MoveRight,
            HeldKey::Down => GameAction::SoftDrop,
            HeldKey::Rotate => GameAction::RotateCw,
        });
    }

    match key.code {
        KeyCode::Char(' ') | KeyCode::Enter => Some(GameAction::HardDrop),
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'z' | 'y' => Some(GameAction::RotateCcw),
            'p' => Some(GameAction::Pause),
            'r' => Some(GameAction::Restart),
            _ => None,
        },
        _ => None,
    }
}

/// Quit on `q`, Esc, or Ctrl-C.
pub fn should_quit(key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q' | 'Q') => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}
