//! Runtime configuration from the environment and the command line.

use std::env;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{anyhow, Result};

pub const DEFAULT_STEP_HZ: u32 = 60;
pub const MIN_STEP_HZ: u32 = 10;
pub const MAX_STEP_HZ: u32 = 240;

/// Settings for the terminal game
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Bag seed; identical seeds deal identical pieces
    pub seed: u32,
    /// Fixed logical updates per second
    pub step_hz: u32,
    /// JSON Lines event log, one observation per state change
    pub log_path: Option<PathBuf>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            seed: clock_seed(),
            step_hz: DEFAULT_STEP_HZ,
            log_path: None,
        }
    }
}

impl RunConfig {
    /// Read `SRS_TETRIS_SEED`, `SRS_TETRIS_STEP_HZ` and `SRS_TETRIS_LOG_PATH`.
    /// Missing or unparsable values fall back to the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) over any key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let seed = lookup("SRS_TETRIS_SEED")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or_else(clock_seed);

        let step_hz = lookup("SRS_TETRIS_STEP_HZ")
            .and_then(|s| s.trim().parse::<u32>().ok())
            .unwrap_or(DEFAULT_STEP_HZ)
            .clamp(MIN_STEP_HZ, MAX_STEP_HZ);

        let log_path = lookup("SRS_TETRIS_LOG_PATH")
            .map(|s| s.trim().to_string())
            .and_then(|s| if s.is_empty() { None } else { Some(PathBuf::from(s)) });

        Self {
            seed,
            step_hz,
            log_path,
        }
    }

    pub fn step_seconds(&self) -> f64 {
        1.0 / self.step_hz as f64
    }
}

/// Seed from the wall clock; never zero
pub fn clock_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() ^ (d.as_secs() as u32))
        .unwrap_or(1)
        .max(1)
}

/// Action policy of the headless driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// No input: pieces fall and lock under gravity
    Idle,
    /// A seeded random action every few steps
    Random,
}

impl Policy {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "idle" => Some(Policy::Idle),
            "random" => Some(Policy::Random),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Policy::Idle => "idle",
            Policy::Random => "random",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadlessArgs {
    pub seed: u32,
    /// Fixed steps to simulate
    pub frames: u32,
    pub policy: Policy,
}

impl Default for HeadlessArgs {
    fn default() -> Self {
        Self {
            seed: 1,
            frames: 3600,
            policy: Policy::Idle,
        }
    }
}

/// Parse `--seed N --frames N --policy idle|random` (arguments after the
/// program name).
pub fn parse_headless_args(args: &[String]) -> Result<HeadlessArgs> {
    let mut out = HeadlessArgs::default();
    let mut i = 0usize;
    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "--seed" | "--frames" | "--policy" => {
                i += 1;
                let v = args
                    .get(i)
                    .ok_or_else(|| anyhow!("headless: missing value for {}", flag))?;
                match flag {
                    "--seed" => {
                        out.seed = v
                            .parse::<u32>()
                            .map_err(|_| anyhow!("headless: invalid --seed value: {}", v))?;
                    }
                    "--frames" => {
                        out.frames = v
                            .parse::<u32>()
                            .map_err(|_| anyhow!("headless: invalid --frames value: {}", v))?;
                    }
                    _ => {
                        out.policy = Policy::from_str(v)
                            .ok_or_else(|| anyhow!("headless: invalid --policy value: {}", v))?;
                    }
                }
            }
            other => {
                return Err(anyhow!("headless: unknown argument: {}", other));
            }
        }
        i += 1;
    }
    Ok(out)
}
