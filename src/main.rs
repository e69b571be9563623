//! Terminal Tetris (default binary).
//!
//! crossterm input, a fixed-step [`Session`], and the framebuffer renderer.
//! Environment: `SRS_TETRIS_SEED`, `SRS_TETRIS_STEP_HZ`, `SRS_TETRIS_LOG_PATH`.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};

use srs_tetris::config::RunConfig;
use srs_tetris::engine::Session;
use srs_tetris::input::{handle_key_event, should_quit, InputHandler};
use srs_tetris::observe::EventLog;
use srs_tetris::term::{FrameBuffer, GameView, RenderThrottle, TerminalRenderer, Viewport};
use srs_tetris::types::GameAction;

/// Poll granularity of the main loop
const FRAME_BUDGET: Duration = Duration::from_millis(8);

/// Redraw at least this often even when nothing changed
const IDLE_REDRAW_MS: u64 = 250;

fn main() -> Result<()> {
    let config = RunConfig::from_env();

    let mut session = Session::new(config.seed, config.step_seconds());
    let log = match &config.log_path {
        Some(path) => {
            let log = Rc::new(RefCell::new(EventLog::open(path)?));
            EventLog::attach(log.clone(), session.gameplay_mut().store_mut());
            Some(log)
        }
        None => None,
    };

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, &mut session);

    // Always try to restore terminal state.
    let _ = term.exit();

    let state = session.gameplay().state();
    println!(
        "[Game] seed={} score={} level={} lines={}{}",
        config.seed,
        state.score,
        state.level,
        state.lines,
        if state.over { " (game over)" } else { "" }
    );
    if let (Some(log), Some(path)) = (log, &config.log_path) {
        let mut log = log.borrow_mut();
        log.flush()?;
        println!(
            "[Game] event log: {} records to {} ({} write errors)",
            log.records(),
            path.display(),
            log.write_errors()
        );
    }
    result
}

fn run(term: &mut TerminalRenderer, session: &mut Session) -> Result<()> {
    let view = GameView::default();
    let mut input = InputHandler::new();
    if term.reports_key_release() {
        input = input.without_auto_release();
    }
    let mut throttle = RenderThrottle::new(IDLE_REDRAW_MS);
    let mut fb = FrameBuffer::new(0, 0);

    let started = Instant::now();
    let mut last_frame = Instant::now();

    loop {
        let timeout = FRAME_BUDGET.saturating_sub(last_frame.elapsed());
        if event::poll(timeout)? {
            // Drain everything queued before simulating.
            loop {
                match event::read()? {
                    Event::Key(key) => {
                        if !handle_key(key, session, &mut input) {
                            return Ok(());
                        }
                    }
                    Event::Resize(_, _) => {
                        term.invalidate();
                        throttle.invalidate();
                    }
                    _ => {}
                }
                if !event::poll(Duration::ZERO)? {
                    break;
                }
            }
        }

        let now = Instant::now();
        let elapsed = now.duration_since(last_frame);
        last_frame = now;

        let state = session.gameplay().state();
        input.set_frozen(state.paused || state.over);
        for action in input.update(elapsed.as_millis() as u32) {
            session.apply_action(action);
        }
        session.advance(elapsed.as_secs_f64());

        let state = session.gameplay().state();
        let now_ms = started.elapsed().as_millis() as u64;
        if throttle.should_render(now_ms, state.version) {
            let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
            if fb.width() != w || fb.height() != h {
                fb.resize(w, h);
            }
            view.render_into(state, Viewport::new(w, h), &mut fb);
            term.draw_swap(&mut fb)?;
        }
    }
}

/// Returns false when the player asked to quit
fn handle_key(key: KeyEvent, session: &mut Session, input: &mut InputHandler) -> bool {
    match key.kind {
        KeyEventKind::Press | KeyEventKind::Repeat => {
            if should_quit(key) {
                return false;
            }
            if input.handle_key_press(key.code) {
                // Held keys fire from input.update().
                return true;
            }
            if key.kind == KeyEventKind::Repeat {
                return true;
            }
            if let Some(action) = handle_key_event(key) {
                if action == GameAction::Restart {
                    input.reset();
                }
                session.apply_action(action);
            }
        }
        KeyEventKind::Release => {
            input.handle_key_release(key.code);
        }
    }
    true
}
