//! Gameplay controller - gravity, lock delay, spawning and player actions
//!
//! Per piece the controller moves through Empty -> Falling -> Grounded and
//! back to Empty when the piece locks, or from Grounded back to Falling when
//! the piece is moved off its support. All state that a renderer may need
//! lives in the [`Store`]; the timers here are private bookkeeping.
//!
//! Time is passed in seconds and tracked in milliseconds.

use std::fmt;

use crate::board::Board;
use crate::pieces::{ActivePiece, PieceSignature};
use crate::scoring::{gravity_interval_ms, line_clear_score};
use crate::srs::try_rotate;
use crate::store::{GameState, Store};
use crate::types::{GameAction, RotationDir, LOCK_DELAY_MS};

/// Read-only copy of the runtime timers
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TimersSnapshot {
    pub fall_ms: f64,
    pub lock_ms: f64,
    pub was_grounded: bool,
    pub ground_signature: Option<PieceSignature>,
}

#[derive(Debug, Clone, Copy, Default)]
struct RuntimeTimers {
    fall_ms: f64,
    lock_ms: f64,
    was_grounded: bool,
    ground_sig: Option<PieceSignature>,
}

impl RuntimeTimers {
    /// Forget the current grounded period
    fn clear_lock(&mut self) {
        self.was_grounded = false;
        self.lock_ms = 0.0;
        self.ground_sig = None;
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

pub type StopCallback = Box<dyn FnMut()>;

pub struct Gameplay {
    store: Store,
    timers: RuntimeTimers,
    stop: StopCallback,
    /// Set once the stop callback has fired for the current game
    stop_requested: bool,
}

impl fmt::Debug for Gameplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gameplay")
            .field("store", &self.store)
            .field("timers", &self.timers)
            .field("stop_requested", &self.stop_requested)
            .finish()
    }
}

impl Gameplay {
    /// `stop` is called when a spawn collides (game over), at most once per game.
    pub fn new<F>(seed: u32, stop: F) -> Self
    where
        F: FnMut() + 'static,
    {
        Self {
            store: Store::new(seed),
            timers: RuntimeTimers::default(),
            stop: Box::new(stop),
            stop_requested: false,
        }
    }

    /// Controller without a scheduler to stop
    pub fn headless(seed: u32) -> Self {
        Self::new(seed, || {})
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut Store {
        &mut self.store
    }

    /// Current snapshot
    pub fn state(&self) -> &GameState {
        self.store.state()
    }

    pub fn timers(&self) -> TimersSnapshot {
        TimersSnapshot {
            fall_ms: self.timers.fall_ms,
            lock_ms: self.timers.lock_ms,
            was_grounded: self.timers.was_grounded,
            ground_signature: self.timers.ground_sig,
        }
    }

    /// Where the active piece would land, for ghost rendering
    pub fn ghost(&self) -> Option<ActivePiece> {
        let state = self.state();
        state.active.map(|p| ghost_of(&state.board, &p))
    }

    /// Advance the simulation by `dt_seconds`
    pub fn update(&mut self, dt_seconds: f64) {
        let dt_ms = dt_seconds * 1000.0;
        let state = self.store.get_state();

        if state.paused || state.over {
            return;
        }

        let active = match state.active {
            Some(p) => p,
            None => {
                self.spawn_from_next();
                return;
            }
        };

        if !state.board.is_grounded(&active) {
            self.timers.clear_lock();
            self.timers.fall_ms += dt_ms;
            if self.timers.fall_ms >= gravity_interval_ms(state.level) {
                if let Some(moved) = state.board.try_move(&active, 0, 1) {
                    self.store.set_active(Some(moved));
                }
                self.timers.fall_ms = 0.0;
            }
            return;
        }

        let sig = active.signature();
        if !self.timers.was_grounded {
            self.timers.was_grounded = true;
            self.timers.lock_ms = 0.0;
            self.timers.ground_sig = Some(sig);
        } else if self.timers.ground_sig != Some(sig) {
            self.timers.lock_ms = 0.0;
            self.timers.ground_sig = Some(sig);
        } else {
            self.timers.lock_ms += dt_ms;
        }

        if self.timers.lock_ms >= LOCK_DELAY_MS {
            self.lock_active();
        }
    }

    /// Spawn the head of the queue if no piece is active.
    ///
    /// Returns false when a piece was already active or the spawn collided,
    /// which ends the game.
    pub fn spawn_from_next(&mut self) -> bool {
        if self.state().active.is_some() {
            return false;
        }

        let kind = self.store.consume_next();
        let piece = ActivePiece::spawn(kind);

        if self.state().board.collides(&piece) {
            self.store.set_over(true);
            self.store.set_paused(true);
            if !self.stop_requested {
                self.stop_requested = true;
                (self.stop)();
            }
            return false;
        }

        self.store.set_active(Some(piece));
        self.timers.reset();
        true
    }

    /// Fix the active piece, clear lines, score, and bring in the next piece
    fn lock_active(&mut self) {
        let state = self.store.get_state();
        let Some(piece) = state.active else {
            return;
        };

        let result = state.board.with_piece(&piece).clear_full_lines();

        // Drop the piece before committing the board so no snapshot shows
        // it overlapping its own stamped cells.
        self.store.set_active(None);
        self.store.set_board(result.board);
        self.store.add_score(line_clear_score(result.cleared));
        self.store.add_lines(result.cleared as u32);

        self.spawn_from_next();
        self.timers.reset();
    }

    /// Active piece if the game accepts player input right now
    fn controllable(&self) -> Option<ActivePiece> {
        let state = self.state();
        if state.paused || state.over {
            return None;
        }
        state.active
    }

    fn shift(&mut self, dx: i8, dy: i8) -> bool {
        let Some(piece) = self.controllable() else {
            return false;
        };
        match self.state().board.try_move(&piece, dx, dy) {
            Some(moved) => {
                self.store.set_active(Some(moved));
                self.timers.clear_lock();
                true
            }
            None => false,
        }
    }

    pub fn move_left(&mut self) -> bool {
        self.shift(-1, 0)
    }

    pub fn move_right(&mut self) -> bool {
        self.shift(1, 0)
    }

    /// One row down. No score.
    pub fn soft_drop_step(&mut self) -> bool {
        self.shift(0, 1)
    }

    /// Drop to the landing row and lock immediately
    pub fn hard_drop(&mut self) -> bool {
        let Some(piece) = self.controllable() else {
            return false;
        };
        let landed = ghost_of(&self.state().board, &piece);
        if landed != piece {
            self.store.set_active(Some(landed));
        }
        self.lock_active();
        true
    }

    fn rotate(&mut self, dir: RotationDir) -> bool {
        let Some(piece) = self.controllable() else {
            return false;
        };
        match try_rotate(&self.state().board, &piece, dir) {
            Some(rotated) => {
                self.store.set_active(Some(rotated));
                self.timers.clear_lock();
                true
            }
            None => false,
        }
    }

    pub fn rotate_cw(&mut self) -> bool {
        self.rotate(RotationDir::Cw)
    }

    pub fn rotate_ccw(&mut self) -> bool {
        self.rotate(RotationDir::Ccw)
    }

    /// Pausing is ignored once the game is over
    pub fn set_paused(&mut self, paused: bool) -> bool {
        if self.state().over || self.state().paused == paused {
            return false;
        }
        self.store.set_paused(paused);
        true
    }

    pub fn toggle_paused(&mut self) -> bool {
        let paused = !self.state().paused;
        self.set_paused(paused)
    }

    /// Start a new game: fresh store state, cleared timers, and the stop
    /// callback armed again.
    pub fn reset(&mut self) {
        self.store.reset();
        self.timers.reset();
        self.stop_requested = false;
    }

    /// Dispatch an input-layer action
    pub fn apply_action(&mut self, action: GameAction) -> bool {
        match action {
            GameAction::MoveLeft => self.move_left(),
            GameAction::MoveRight => self.move_right(),
            GameAction::SoftDrop => self.soft_drop_step(),
            GameAction::HardDrop => self.hard_drop(),
            GameAction::RotateCw => self.rotate_cw(),
            GameAction::RotateCcw => self.rotate_ccw(),
            GameAction::Pause => self.toggle_paused(),
            GameAction::Restart => {
                self.reset();
                true
            }
        }
    }
}

fn ghost_of(board: &Board, piece: &ActivePiece) -> ActivePiece {
    piece.shifted(0, board.drop_distance(piece))
}
