//! Core game logic - pure, deterministic, and testable
//!
//! Everything that decides what happens on the board lives here: shapes,
//! collision, SRS rotation, line clearing, the 7-bag, scoring, the state
//! store and the gameplay controller. There is no I/O and no dependency on
//! the terminal, so the same seed always plays the same game.
//!
//! # Module Structure
//!
//! - [`pieces`]: 4x4 shape bitmaps, orientations, spawn pose, [`ActivePiece`]
//! - [`board`]: 10x22 grid with collision queries and line clearing
//! - [`srs`]: Super Rotation System kick tables and [`try_rotate`]
//! - [`rng`]: seeded LCG and the seven-piece bag
//! - [`scoring`]: line-clear points, level formula, gravity table lookup
//! - [`store`]: immutable snapshots with subscribers
//! - [`gameplay`]: gravity, lock delay, spawning and player actions
//!
//! # Example
//!
//! ```
//! use srs_tetris_core::Gameplay;
//! use srs_tetris_core::types::GameAction;
//!
//! let mut game = Gameplay::headless(12345);
//! game.update(1.0 / 60.0); // spawns the first piece
//!
//! game.apply_action(GameAction::MoveRight);
//! game.apply_action(GameAction::RotateCw);
//! game.apply_action(GameAction::HardDrop);
//!
//! let state = game.state();
//! assert!(state.active.is_some());
//! assert_eq!(state.score, 0); // drops are not scored
//! ```

pub mod board;
pub mod gameplay;
pub mod pieces;
pub mod rng;
pub mod scoring;
pub mod srs;
pub mod store;

pub use srs_tetris_types as types;

// Re-export commonly used types for convenience
pub use board::{Board, LineClear};
pub use gameplay::{Gameplay, TimersSnapshot};
pub use pieces::{get_shape, shape_at, ActivePiece, PieceSignature};
pub use rng::{SevenBag, SimpleRng};
pub use scoring::{gravity_interval_ms, level_for_lines, line_clear_score};
pub use srs::{kick_candidates, try_rotate};
pub use store::{GameState, Store, SubscriptionId};
