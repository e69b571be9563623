//! Terminal "game renderer" module.
//!
//! A small, game-oriented rendering layer: no widget toolkit, just a
//! framebuffer of styled cells that is diffed and flushed to the terminal.
//!
//! - [`fb`]: framebuffer and styles
//! - [`game_view`]: game snapshot to framebuffer (pure)
//! - [`renderer`]: framebuffer to terminal (crossterm)
//! - [`throttle`]: when a redraw is worth doing

pub mod fb;
pub mod game_view;
pub mod renderer;
pub mod throttle;

pub use srs_tetris_core as core;
pub use srs_tetris_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{piece_color, AnchorY, GameView, Viewport};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
pub use throttle::RenderThrottle;
