//! Terminal input module (engine-facing).
//!
//! This module is independent of any UI framework. It maps `crossterm` key
//! events into [`crate::types::GameAction`] and provides a held-key handler
//! (DAS/ARR movement, tap/hold rotation, soft/hard drop on the down key)
//! that also works in terminals without key-release events.

pub mod handler;
pub mod map;

pub use srs_tetris_types as types;

pub use handler::{Actions, HeldKey, InputHandler};
pub use map::{handle_key_event, should_quit};
