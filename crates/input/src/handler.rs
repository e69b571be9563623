//! Held-key input handler for terminal environments.
//!
//! Four keys are tracked while held:
//!
//! - **Left/Right**: one move on press, then a repeat after the DAS delay
//!   and every ARR interval after that.
//! - **Rotate**: a tap rotates clockwise once; holding it long enough adds a
//!   single counter-clockwise rotation.
//! - **Down**: a soft-drop step every interval while held; holding it long
//!   enough hard-drops once and suppresses further soft drops until release.
//!
//! Actions are produced by [`InputHandler::update`] in priority order:
//! horizontal, rotate, down. Terminals that do not report key releases are
//! handled with a timeout since the key's last press event.

use arrayvec::ArrayVec;
use crossterm::event::KeyCode;

use crate::types::GameAction;

/// Delay before horizontal auto-repeat starts
pub const DAS_MS: u32 = 150;
/// Horizontal auto-repeat interval
pub const ARR_MS: u32 = 50;
/// Soft-drop interval while down is held
pub const SOFT_DROP_MS: u32 = 50;
/// Hold time that turns the rotate key into one counter-clockwise turn
pub const HOLD_ROTATE_CCW_MS: u32 = 350;
/// Hold time that turns the down key into one hard drop
pub const HOLD_HARD_DROP_MS: u32 = 350;

// In terminals without key-release events, a short timeout prevents a single tap
// from turning into a sustained "held" state.
const DEFAULT_KEY_RELEASE_TIMEOUT_MS: u32 = 150;

/// At most one action per held key per update.
pub type Actions = ArrayVec<GameAction, 4>;

/// A key whose hold duration matters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeldKey {
    Left,
    Right,
    Down,
    Rotate,
}

impl HeldKey {
    pub fn from_code(code: KeyCode) -> Option<Self> {
        match code {
            KeyCode::Left | KeyCode::Char('h' | 'H' | 'a' | 'A') => Some(HeldKey::Left),
            KeyCode::Right | KeyCode::Char('l' | 'L' | 'd' | 'D') => Some(HeldKey::Right),
            KeyCode::Down | KeyCode::Char('j' | 'J' | 's' | 'S') => Some(HeldKey::Down),
            KeyCode::Up | KeyCode::Char('k' | 'K' | 'w' | 'W') => Some(HeldKey::Rotate),
            _ => None,
        }
    }

    fn index(self) -> usize {
        match self {
            HeldKey::Left => 0,
            HeldKey::Right => 1,
            HeldKey::Down => 2,
            HeldKey::Rotate => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct KeyState {
    down: bool,
    /// Pressed since the last update; keeps a tap alive for one update
    /// even if its release arrived first.
    latched: bool,
    hold_ms: u32,
    repeat_ms: u32,
    /// Time since the last press event, for auto-release
    idle_ms: u32,
    /// First shot (horizontal), clockwise turn (rotate) or hard drop (down)
    fired: bool,
    /// Counter-clockwise turn (rotate only)
    fired_alt: bool,
}

impl KeyState {
    fn press(&mut self) {
        if !self.down {
            *self = KeyState {
                down: true,
                latched: true,
                ..KeyState::default()
            };
        }
        self.idle_ms = 0;
    }

    fn active(&self) -> bool {
        self.down || self.latched
    }
}

/// Tracks held keys and turns them into game actions.
#[derive(Debug, Clone)]
pub struct InputHandler {
    keys: [KeyState; 4],
    /// `None` when the terminal reports releases
    key_release_timeout_ms: Option<u32>,
    /// Game paused or over: timers hold still and nothing fires
    frozen: bool,
}

impl InputHandler {
    pub fn new() -> Self {
        Self {
            keys: [KeyState::default(); 4],
            key_release_timeout_ms: Some(DEFAULT_KEY_RELEASE_TIMEOUT_MS),
            frozen: false,
        }
    }

    pub fn with_key_release_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.key_release_timeout_ms = Some(timeout_ms);
        self
    }

    /// For terminals that report key releases: keys stay held until released.
    pub fn without_auto_release(mut self) -> Self {
        self.key_release_timeout_ms = None;
        self
    }

    pub fn key_release_timeout_ms(&self) -> Option<u32> {
        self.key_release_timeout_ms
    }

    fn key(&mut self, key: HeldKey) -> &mut KeyState {
        &mut self.keys[key.index()]
    }

    /// Freeze or thaw the hold timers.
    ///
    /// While frozen, `update` fires nothing and leaves press latches and hold
    /// times alone, so a key pressed during a pause fires once play resumes.
    /// Auto-release still runs.
    pub fn set_frozen(&mut self, frozen: bool) {
        self.frozen = frozen;
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn is_held(&self, key: HeldKey) -> bool {
        self.keys[key.index()].down
    }

    /// Record a press (or terminal auto-repeat) event.
    ///
    /// Returns false if the code is not one of the held keys; the caller
    /// should map it as a one-shot action instead.
    pub fn handle_key_press(&mut self, code: KeyCode) -> bool {
        match HeldKey::from_code(code) {
            Some(key) => {
                self.key(key).press();
                true
            }
            None => false,
        }
    }

    pub fn handle_key_release(&mut self, code: KeyCode) {
        if let Some(key) = HeldKey::from_code(code) {
            self.key(key).down = false;
        }
    }

    /// Advance the hold timers by `elapsed_ms` and collect due actions
    pub fn update(&mut self, elapsed_ms: u32) -> Actions {
        let mut actions = Actions::new();

        if let Some(timeout) = self.key_release_timeout_ms {
            for key in self.keys.iter_mut().filter(|k| k.down) {
                key.idle_ms = key.idle_ms.saturating_add(elapsed_ms);
                if key.idle_ms > timeout {
                    key.down = false;
                }
            }
        }

        if self.frozen {
            return actions;
        }

        for key in self.keys.iter_mut().filter(|k| k.active()) {
            key.hold_ms = key.hold_ms.saturating_add(elapsed_ms);
            key.repeat_ms = key.repeat_ms.saturating_add(elapsed_ms);
        }

        for (held, action) in [
            (HeldKey::Left, GameAction::MoveLeft),
            (HeldKey::Right, GameAction::MoveRight),
        ] {
            let key = self.key(held);
            if !key.active() {
                continue;
            }
            if !key.fired {
                key.fired = true;
                key.repeat_ms = 0;
                let _ = actions.try_push(action);
            } else {
                let wait = if key.hold_ms < DAS_MS { DAS_MS } else { ARR_MS };
                if key.repeat_ms >= wait {
                    key.repeat_ms = 0;
                    let _ = actions.try_push(action);
                }
            }
        }

        let rotate = self.key(HeldKey::Rotate);
        if rotate.active() {
            if !rotate.fired {
                rotate.fired = true;
                let _ = actions.try_push(GameAction::RotateCw);
            } else if !rotate.fired_alt && rotate.hold_ms >= HOLD_ROTATE_CCW_MS {
                rotate.fired_alt = true;
                let _ = actions.try_push(GameAction::RotateCcw);
            }
        }

        let down = self.key(HeldKey::Down);
        if down.active() && !down.fired {
            if down.hold_ms >= HOLD_HARD_DROP_MS {
                down.fired = true;
                let _ = actions.try_push(GameAction::HardDrop);
            } else if down.repeat_ms >= SOFT_DROP_MS {
                down.repeat_ms = 0;
                let _ = actions.try_push(GameAction::SoftDrop);
            }
        }

        for key in self.keys.iter_mut() {
            key.latched = false;
        }

        actions
    }

    /// Release everything
    pub fn reset(&mut self) {
        self.keys = [KeyState::default(); 4];
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
