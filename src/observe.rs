//! JSON observations of the game state and the JSON Lines event log.

use std::cell::RefCell;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::rc::Rc;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

use crate::core::{GameState, Gameplay, Store, SubscriptionId, TimersSnapshot};
use crate::types::{PieceKind, Rotation, BOARD_WIDTH};

/// One row of board cells (0 = empty, 1-7 = piece id)
pub type RowCells = [u8; BOARD_WIDTH as usize];

/// Serializable view of one snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub version: u64,
    pub score: u32,
    pub level: u32,
    pub lines: u32,
    pub paused: bool,
    pub game_over: bool,
    /// All 22 rows, hidden rows first
    pub board: Vec<RowCells>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<ActiveObservation>,
    pub next_queue: Vec<PieceKindLower>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timers: Option<TimersObservation>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveObservation {
    pub kind: PieceKindLower,
    pub rotation: RotationLower,
    pub x: i8,
    pub y: i8,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimersObservation {
    pub fall_ms: f64,
    pub lock_ms: f64,
    pub grounded: bool,
}

impl From<TimersSnapshot> for TimersObservation {
    fn from(value: TimersSnapshot) -> Self {
        Self {
            fall_ms: value.fall_ms,
            lock_ms: value.lock_ms,
            grounded: value.was_grounded,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKindLower {
    #[serde(rename = "i")]
    I,
    #[serde(rename = "o")]
    O,
    #[serde(rename = "t")]
    T,
    #[serde(rename = "l")]
    L,
    #[serde(rename = "j")]
    J,
    #[serde(rename = "s")]
    S,
    #[serde(rename = "z")]
    Z,
}

impl From<PieceKind> for PieceKindLower {
    fn from(value: PieceKind) -> Self {
        match value {
            PieceKind::I => Self::I,
            PieceKind::O => Self::O,
            PieceKind::T => Self::T,
            PieceKind::L => Self::L,
            PieceKind::J => Self::J,
            PieceKind::S => Self::S,
            PieceKind::Z => Self::Z,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RotationLower {
    #[serde(rename = "north")]
    North,
    #[serde(rename = "east")]
    East,
    #[serde(rename = "south")]
    South,
    #[serde(rename = "west")]
    West,
}

impl From<Rotation> for RotationLower {
    fn from(value: Rotation) -> Self {
        match value {
            Rotation::North => Self::North,
            Rotation::East => Self::East,
            Rotation::South => Self::South,
            Rotation::West => Self::West,
        }
    }
}

impl Observation {
    pub fn from_state(state: &GameState) -> Self {
        let board = state
            .board
            .rows()
            .map(|row| {
                let mut cells = [0u8; BOARD_WIDTH as usize];
                cells.copy_from_slice(row);
                cells
            })
            .collect();

        Self {
            version: state.version,
            score: state.score,
            level: state.level,
            lines: state.lines,
            paused: state.paused,
            game_over: state.over,
            board,
            active: state.active.map(|p| ActiveObservation {
                kind: p.kind.into(),
                rotation: p.rotation.into(),
                x: p.x,
                y: p.y,
            }),
            next_queue: state.next_queue.iter().map(|&k| k.into()).collect(),
            timers: None,
        }
    }

    /// Snapshot plus the controller's runtime timers
    pub fn from_gameplay(gameplay: &Gameplay) -> Self {
        let mut obs = Self::from_state(gameplay.state());
        obs.timers = Some(gameplay.timers().into());
        obs
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| anyhow!("observe: encode failed: {}", e))
    }
}

/// Appends one observation per line to a file.
#[derive(Debug)]
pub struct EventLog {
    writer: BufWriter<File>,
    records: u64,
    write_errors: u64,
}

impl EventLog {
    /// Open `path` for appending, creating it if needed.
    pub fn open(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| anyhow!("event log: open {} failed: {}", path.display(), e))?;
        Ok(Self {
            writer: BufWriter::new(file),
            records: 0,
            write_errors: 0,
        })
    }

    pub fn record(&mut self, state: &GameState) -> Result<()> {
        let line = Observation::from_state(state).to_json()?;
        writeln!(self.writer, "{}", line).map_err(|e| anyhow!("event log: write failed: {}", e))?;
        self.records += 1;
        Ok(())
    }

    pub fn records(&self) -> u64 {
        self.records
    }

    pub fn write_errors(&self) -> u64 {
        self.write_errors
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer
            .flush()
            .map_err(|e| anyhow!("event log: flush failed: {}", e))
    }

    /// Subscribe the log to `store`. The store calls listeners right away,
    /// so the current snapshot is the first record. Write failures are
    /// counted, not raised, since listeners cannot return errors.
    pub fn attach(log: Rc<RefCell<EventLog>>, store: &mut Store) -> SubscriptionId {
        store.subscribe(move |state| {
            let mut log = log.borrow_mut();
            if log.record(state).is_err() {
                log.write_errors += 1;
            }
        })
    }
}
