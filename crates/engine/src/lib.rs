//! Frame scheduling for the simulation
//!
//! [`GameLoop`] turns irregular real frame times into a fixed number of
//! logical steps plus one render per frame. [`Session`] pairs it with a
//! [`Gameplay`](srs_tetris_core::Gameplay) so that a game over stops the loop.

pub mod game_loop;
pub mod session;

pub use game_loop::{FrameStats, GameLoop, LoopStopper};
pub use session::Session;
