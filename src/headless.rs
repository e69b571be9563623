//! Fixed-step simulation without a terminal.

use crate::config::{HeadlessArgs, Policy};
use crate::core::SimpleRng;
use crate::engine::Session;
use crate::observe::Observation;
use crate::types::{GameAction, FIXED_STEP_SECONDS};

/// Actions the random policy picks from
const RANDOM_ACTIONS: [GameAction; 6] = [
    GameAction::MoveLeft,
    GameAction::MoveRight,
    GameAction::RotateCw,
    GameAction::RotateCcw,
    GameAction::SoftDrop,
    GameAction::HardDrop,
];

/// Steps between two random actions
const RANDOM_ACTION_INTERVAL: u32 = 6;

#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessReport {
    /// Steps actually simulated; stops early on game over
    pub frames: u32,
    /// Actions the policy issued that changed the state
    pub actions_applied: u32,
    pub observation: Observation,
}

/// Run a seeded game for `args.frames` fixed steps.
pub fn run_headless(args: &HeadlessArgs) -> HeadlessReport {
    let mut session = Session::new(args.seed, FIXED_STEP_SECONDS);
    let mut policy_rng = SimpleRng::new(args.seed ^ 0x9e37_79b9);
    let mut actions_applied = 0u32;
    let mut frames = 0u32;

    while frames < args.frames && session.is_running() {
        if args.policy == Policy::Random && frames % RANDOM_ACTION_INTERVAL == 0 {
            let idx = policy_rng.next_range(RANDOM_ACTIONS.len() as u32) as usize;
            if session.apply_action(RANDOM_ACTIONS[idx]) {
                actions_applied += 1;
            }
        }
        session.advance(FIXED_STEP_SECONDS);
        frames += 1;
    }

    HeadlessReport {
        frames,
        actions_applied,
        observation: Observation::from_gameplay(session.gameplay()),
    }
}
