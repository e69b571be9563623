//! SRS Tetris (workspace facade crate).
//!
//! Re-exports the workspace crates under short names and adds the pieces
//! shared by the two binaries: runtime configuration, the JSON observation
//! format with its event log, and the headless driver.

pub use srs_tetris_core as core;
pub use srs_tetris_engine as engine;
pub use srs_tetris_input as input;
pub use srs_tetris_term as term;
pub use srs_tetris_types as types;

pub mod config;
pub mod headless;
pub mod observe;
