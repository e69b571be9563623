//! Shared types and rule constants
//!
//! Pure data with no dependencies, usable from the simulation core, the
//! terminal front end and the headless driver alike.
//!
//! # Board Dimensions
//!
//! - **Width**: 10 columns (indexed 0-9)
//! - **Height**: 22 rows: 2 hidden spawn rows (0-1) above 20 visible rows (2-21)
//! - **Spawn position**: (3, 0) for most pieces, (4, 0) for O
//!
//! # Rule Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `LOCK_DELAY_MS` | 500 | Continuous unmoved grounding before a piece locks |
//! | `NEXT_QUEUE_MIN` | 3 | Minimum length of the upcoming-piece queue |
//! | `LINES_PER_LEVEL` | 10 | Cleared lines needed per level |
//! | `MAX_LEVEL` | 20 | Level cap |
//! | `FIXED_STEP_SECONDS` | 1/60 | Nominal logical update interval |
//! | `MAX_FRAME_SECONDS` | 0.25 | Catch-up cap for a single display frame |
//!
//! # Examples
//!
//! ```
//! use srs_tetris_types::{PieceKind, Rotation, GameAction, BOARD_WIDTH, BOARD_HEIGHT};
//!
//! let piece = PieceKind::from_id(3).unwrap();
//! assert_eq!(piece, PieceKind::T);
//! assert_eq!(PieceKind::ALL[piece.id() as usize - 1], piece);
//!
//! assert_eq!(Rotation::North.rotate_cw(), Rotation::East);
//! assert_ne!(GameAction::RotateCw, GameAction::RotateCcw);
//!
//! assert_eq!(BOARD_WIDTH, 10);
//! assert_eq!(BOARD_HEIGHT, 22);
//! ```

/// Board width in cells (10 columns)
pub const BOARD_WIDTH: u8 = 10;

/// Rows visible to the player
pub const VISIBLE_ROWS: u8 = 20;

/// Spawn rows above the visible area
pub const HIDDEN_ROWS: u8 = 2;

/// Total board height (visible + hidden)
pub const BOARD_HEIGHT: u8 = VISIBLE_ROWS + HIDDEN_ROWS;

/// Time a grounded, unmoved piece waits before it locks.
pub const LOCK_DELAY_MS: f64 = 500.0;

/// The next-queue is refilled to at least this many pieces after every draw.
pub const NEXT_QUEUE_MIN: usize = 3;

pub const LINES_PER_LEVEL: u32 = 10;

pub const MAX_LEVEL: u32 = 20;

/// Nominal fixed timestep for logical updates (60 Hz).
pub const FIXED_STEP_SECONDS: f64 = 1.0 / 60.0;

/// Elapsed time credited to a single display frame is capped at this value,
/// so a long stall does not trigger an unbounded burst of catch-up updates.
pub const MAX_FRAME_SECONDS: f64 = 0.25;

/// Gravity interval by level (milliseconds per row).
///
/// Index 0 is unused; levels are clamped to `1..=20` before lookup.
pub const GRAVITY_TABLE_MS: [u32; 21] = [
    0, // unused
    1000, 793, 618, 473, 355, 262, 190, 135, 94, 64, // 1-10
    43, 28, 18, 11, 7, 4, 3, 2, 1, 1, // 11-20
];

/// Points for clearing 0, 1, 2, 3 or 4 lines with one piece.
pub const LINE_SCORES: [u32; 5] = [0, 100, 300, 500, 800];

/// A board cell: `0` is empty, `1..=7` is the identifier of the piece that filled it.
pub type Cell = u8;

/// Value of an empty board cell.
pub const EMPTY: Cell = 0;

/// The seven tetromino piece kinds
///
/// Board identifiers follow the declaration order: I=1, O=2, T=3, L=4,
/// J=5, S=6, Z=7.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    I,
    O,
    T,
    L,
    J,
    S,
    Z,
}

impl PieceKind {
    /// All kinds, in identifier order.
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::L,
        PieceKind::J,
        PieceKind::S,
        PieceKind::Z,
    ];

    /// Identifier stamped into board cells when this kind locks.
    pub fn id(self) -> Cell {
        match self {
            PieceKind::I => 1,
            PieceKind::O => 2,
            PieceKind::T => 3,
            PieceKind::L => 4,
            PieceKind::J => 5,
            PieceKind::S => 6,
            PieceKind::Z => 7,
        }
    }

    /// Reverse of [`PieceKind::id`]. `None` for empty or unknown cells.
    ///
    /// ```
    /// use srs_tetris_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_id(2), Some(PieceKind::O));
    /// assert_eq!(PieceKind::from_id(0), None);
    /// assert_eq!(PieceKind::from_id(8), None);
    /// ```
    pub fn from_id(id: Cell) -> Option<Self> {
        match id {
            1 => Some(PieceKind::I),
            2 => Some(PieceKind::O),
            3 => Some(PieceKind::T),
            4 => Some(PieceKind::L),
            5 => Some(PieceKind::J),
            6 => Some(PieceKind::S),
            7 => Some(PieceKind::Z),
            _ => None,
        }
    }
}

/// Rotation states following the Super Rotation System (SRS)
///
/// - **North**: Spawn orientation (index 0)
/// - **East**: 90° clockwise (index 1)
/// - **South**: 180° (index 2)
/// - **West**: 270° clockwise (index 3)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rotation {
    North,
    East,
    South,
    West,
}

impl Rotation {
    /// Rotate clockwise (90°)
    ///
    /// ```
    /// use srs_tetris_types::Rotation;
    ///
    /// assert_eq!(Rotation::North.rotate_cw(), Rotation::East);
    /// assert_eq!(Rotation::West.rotate_cw(), Rotation::North);
    /// ```
    pub fn rotate_cw(&self) -> Self {
        Self::from_index((self.index() + 1) % 4)
    }

    /// Rotate counter-clockwise
    ///
    /// ```
    /// use srs_tetris_types::Rotation;
    ///
    /// assert_eq!(Rotation::North.rotate_ccw(), Rotation::West);
    /// assert_eq!(Rotation::East.rotate_ccw(), Rotation::North);
    /// ```
    pub fn rotate_ccw(&self) -> Self {
        Self::from_index((self.index() + 3) % 4)
    }

    pub fn rotate(&self, dir: RotationDir) -> Self {
        match dir {
            RotationDir::Cw => self.rotate_cw(),
            RotationDir::Ccw => self.rotate_ccw(),
        }
    }

    /// Number of clockwise quarter turns from North.
    pub fn index(&self) -> usize {
        match self {
            Rotation::North => 0,
            Rotation::East => 1,
            Rotation::South => 2,
            Rotation::West => 3,
        }
    }

    /// Inverse of [`Rotation::index`].
    ///
    /// # Panics
    ///
    /// Panics if `index > 3`; rotation indices are produced internally and an
    /// out-of-range value is a defect.
    pub fn from_index(index: usize) -> Self {
        match index {
            0 => Rotation::North,
            1 => Rotation::East,
            2 => Rotation::South,
            3 => Rotation::West,
            _ => panic!("rotation index out of range: {}", index),
        }
    }
}

/// Direction of a rotation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RotationDir {
    Cw,
    Ccw,
}

/// Player and lifecycle actions
///
/// Input layers translate key presses into these and hand them to the
/// gameplay controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    /// Move piece one cell left
    MoveLeft,
    /// Move piece one cell right
    MoveRight,
    /// Drop piece one cell down
    SoftDrop,
    /// Drop to the lowest valid row and lock immediately
    HardDrop,
    /// Rotate piece 90° clockwise
    RotateCw,
    /// Rotate piece 90° counter-clockwise
    RotateCcw,
    /// Toggle pause state
    Pause,
    /// Start a fresh game
    Restart,
}
