//! Fixed-timestep loop
//!
//! Elapsed time is credited to an accumulator (at most
//! [`MAX_FRAME_SECONDS`] per frame). Every whole `step` in the accumulator
//! runs one update; the leftover fraction becomes the render `alpha`.

use std::cell::Cell;
use std::rc::Rc;

use srs_tetris_types::{FIXED_STEP_SECONDS, MAX_FRAME_SECONDS};

/// What one frame did
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStats {
    /// Logical updates run this frame
    pub steps: u32,
    /// Leftover accumulator as a fraction of a step, in `[0, 1)`
    pub alpha: f64,
}

/// Cloneable handle that halts a [`GameLoop`]
#[derive(Debug, Clone)]
pub struct LoopStopper {
    running: Rc<Cell<bool>>,
}

impl LoopStopper {
    pub fn stop(&self) {
        self.running.set(false);
    }
}

#[derive(Debug)]
pub struct GameLoop {
    step: f64,
    acc: f64,
    running: Rc<Cell<bool>>,
}

impl GameLoop {
    /// A stopped loop with a step of `step` seconds.
    ///
    /// # Panics
    ///
    /// Panics if `step` is not a positive finite number.
    pub fn new(step: f64) -> Self {
        assert!(step.is_finite() && step > 0.0, "step must be positive: {}", step);
        Self {
            step,
            acc: 0.0,
            running: Rc::new(Cell::new(false)),
        }
    }

    /// Loop stepping at `hz` updates per second
    pub fn with_rate(hz: u32) -> Self {
        Self::new(1.0 / hz.max(1) as f64)
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn is_running(&self) -> bool {
        self.running.get()
    }

    /// Start (or resume) with an empty accumulator. No-op if already running.
    pub fn start(&mut self) {
        if self.running.get() {
            return;
        }
        self.acc = 0.0;
        self.running.set(true);
    }

    /// No-op if already stopped
    pub fn stop(&mut self) {
        self.running.set(false);
    }

    pub fn stop_handle(&self) -> LoopStopper {
        LoopStopper {
            running: Rc::clone(&self.running),
        }
    }

    /// Credit `elapsed` seconds and run the due updates.
    ///
    /// Updates stop as soon as the loop is stopped, even by one of the
    /// updates themselves; the remainder of the frame is dropped.
    pub fn advance(&mut self, elapsed: f64, mut update: impl FnMut(f64)) -> FrameStats {
        if !self.running.get() {
            return FrameStats {
                steps: 0,
                alpha: 0.0,
            };
        }

        self.acc += elapsed.clamp(0.0, MAX_FRAME_SECONDS);

        let mut steps = 0;
        while self.acc >= self.step {
            if !self.running.get() {
                self.acc = 0.0;
                break;
            }
            update(self.step);
            self.acc -= self.step;
            steps += 1;
        }

        FrameStats {
            steps,
            alpha: self.acc / self.step,
        }
    }

    /// [`advance`](Self::advance), then render once with the frame's alpha
    pub fn frame(
        &mut self,
        elapsed: f64,
        update: impl FnMut(f64),
        render: impl FnOnce(f64),
    ) -> FrameStats {
        let stats = self.advance(elapsed, update);
        render(stats.alpha);
        stats
    }
}

impl Default for GameLoop {
    fn default() -> Self {
        Self::new(FIXED_STEP_SECONDS)
    }
}
