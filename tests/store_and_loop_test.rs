//! Store notifications and the fixed-step scheduler.

use std::cell::RefCell;
use std::rc::Rc;

use srs_tetris::core::{ActivePiece, Store};
use srs_tetris::engine::{GameLoop, Session};
use srs_tetris::types::{GameAction, PieceKind};

#[test]
fn subscribers_see_each_committed_snapshot() {
    let mut store = Store::new(8);
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    let id = store.subscribe(move |state| sink.borrow_mut().push((state.version, state.level)));

    store.set_lines(25);
    store.set_lines(25); // unchanged, no notification
    store.add_score(0);
    store.set_active(Some(ActivePiece::spawn(PieceKind::I)));

    assert_eq!(*seen.borrow(), vec![(0, 1), (1, 3), (2, 3)]);

    assert!(store.unsubscribe(id));
    assert!(!store.unsubscribe(id));
    store.set_score(10);
    assert_eq!(seen.borrow().len(), 3);
}

#[test]
fn snapshots_are_immutable_once_published() {
    let mut store = Store::new(8);
    let before = store.get_state();
    store.set_score(500);
    store.set_paused(true);

    assert_eq!(before.score, 0);
    assert!(!before.paused);
    assert_eq!(store.state().score, 500);
    assert_eq!(store.state().version, before.version + 2);
}

#[test]
fn consuming_the_queue_keeps_three_upcoming() {
    let mut store = Store::new(8);
    let queue = store.state().next_queue.clone();
    let version = store.state().version;

    assert_eq!(store.consume_next(), queue[0]);
    assert_eq!(store.state().next_queue.len(), 3);
    assert_eq!(&store.state().next_queue[..2], &queue[1..]);
    assert_eq!(store.state().version, version + 1);
}

#[test]
fn reset_keeps_subscribers_and_version_order() {
    let mut store = Store::new(8);
    let count = Rc::new(RefCell::new(0));
    let c = count.clone();
    store.subscribe(move |_| *c.borrow_mut() += 1);
    store.set_score(300);
    store.set_over(true);

    let version = store.state().version;
    store.reset();
    assert_eq!(store.subscriber_count(), 1);
    assert_eq!(*count.borrow(), 4);
    let state = store.state();
    assert!(state.version > version);
    assert_eq!((state.score, state.level, state.lines), (0, 1, 0));
    assert!(!state.over && !state.paused);
    assert_eq!(state.next_queue.len(), 3);
}

#[test]
fn loop_caps_catch_up_and_reports_alpha() {
    let mut game_loop = GameLoop::new(0.0625);
    game_loop.start();
    let mut steps = 0;
    // A long stall still runs at most a quarter second of updates
    let stats = game_loop.advance(3.0, |_| steps += 1);
    assert_eq!(stats.steps, 4);
    assert_eq!(steps, 4);

    let stats = game_loop.advance(0.09375, |_| {});
    assert_eq!(stats.steps, 1);
    assert_eq!(stats.alpha, 0.5);
}

#[test]
fn stopped_loop_runs_nothing_but_still_renders() {
    let mut game_loop = GameLoop::new(0.0625);
    let mut updates = 0;
    let mut renders = 0;
    game_loop.frame(0.25, |_| updates += 1, |_| renders += 1);
    assert_eq!((updates, renders), (0, 1));

    game_loop.start();
    let stopper = game_loop.stop_handle();
    game_loop.frame(
        0.25,
        |_| {
            updates += 1;
            stopper.stop();
        },
        |_| renders += 1,
    );
    assert_eq!((updates, renders), (1, 2));
    assert!(!game_loop.is_running());
}

#[test]
fn session_replays_the_same_game_from_a_seed() {
    let run = || {
        let mut session = Session::new(99, 0.0625);
        for i in 0..400u32 {
            if i % 5 == 0 {
                session.apply_action(GameAction::MoveRight);
            }
            if i % 17 == 0 {
                session.apply_action(GameAction::HardDrop);
            }
            session.advance(0.0625);
        }
        session.gameplay().state().clone()
    };
    assert_eq!(run(), run());
}
