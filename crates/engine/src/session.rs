//! A running game: controller plus scheduler

use srs_tetris_core::Gameplay;
use srs_tetris_types::GameAction;

use crate::game_loop::{FrameStats, GameLoop};

/// Gameplay driven by a [`GameLoop`]. Game over stops the loop through
/// the controller's stop callback; a restart starts it again.
#[derive(Debug)]
pub struct Session {
    gameplay: Gameplay,
    game_loop: GameLoop,
}

impl Session {
    /// Started session stepping every `step` seconds
    pub fn new(seed: u32, step: f64) -> Self {
        let mut game_loop = GameLoop::new(step);
        let stopper = game_loop.stop_handle();
        let gameplay = Gameplay::new(seed, move || stopper.stop());
        game_loop.start();
        Self {
            gameplay,
            game_loop,
        }
    }

    pub fn gameplay(&self) -> &Gameplay {
        &self.gameplay
    }

    pub fn gameplay_mut(&mut self) -> &mut Gameplay {
        &mut self.gameplay
    }

    pub fn game_loop(&self) -> &GameLoop {
        &self.game_loop
    }

    pub fn is_running(&self) -> bool {
        self.game_loop.is_running()
    }

    /// Run the updates due for `elapsed` seconds of real time
    pub fn advance(&mut self, elapsed: f64) -> FrameStats {
        let gameplay = &mut self.gameplay;
        self.game_loop.advance(elapsed, |dt| gameplay.update(dt))
    }

    /// [`advance`](Self::advance), then render once
    pub fn frame(&mut self, elapsed: f64, render: impl FnOnce(&Gameplay, f64)) -> FrameStats {
        let stats = self.advance(elapsed);
        render(&self.gameplay, stats.alpha);
        stats
    }

    /// Forward an action. Restart also restarts a loop stopped by game over.
    pub fn apply_action(&mut self, action: GameAction) -> bool {
        match action {
            GameAction::Restart => {
                self.restart();
                true
            }
            other => self.gameplay.apply_action(other),
        }
    }

    pub fn restart(&mut self) {
        self.gameplay.reset();
        self.game_loop.start();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use srs_tetris_core::Board;
    use srs_tetris_types::{PieceKind, BOARD_WIDTH};

    fn blocked_spawn_board() -> Board {
        let mut board = Board::new();
        for x in 0..BOARD_WIDTH as i8 {
            board.set(x, 1, PieceKind::O.id());
        }
        board
    }

    #[test]
    fn new_session_is_running_and_spawns_on_first_step() {
        let mut session = Session::new(1, 0.125);
        assert!(session.is_running());
        let stats = session.advance(0.125);
        assert_eq!(stats.steps, 1);
        assert!(session.gameplay().state().active.is_some());
    }

    #[test]
    fn game_over_stops_the_loop_and_restart_resumes_it() {
        let mut session = Session::new(1, 0.0625);
        session
            .gameplay_mut()
            .store_mut()
            .set_board(blocked_spawn_board());

        let stats = session.advance(0.25);
        assert_eq!(stats.steps, 1);
        assert!(session.gameplay().state().over);
        assert!(!session.is_running());

        assert!(session.apply_action(GameAction::Restart));
        assert!(session.is_running());
        assert!(!session.gameplay().state().over);
        assert_eq!(session.advance(0.0625).steps, 1);
        assert!(session.gameplay().state().active.is_some());
    }

    #[test]
    fn frame_passes_gameplay_to_render() {
        let mut session = Session::new(3, 0.125);
        let mut seen = None;
        session.frame(0.1875, |gameplay, alpha| {
            seen = Some((gameplay.state().active.is_some(), alpha));
        });
        assert_eq!(seen, Some((true, 0.5)));
    }
}
