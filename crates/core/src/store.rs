//! Game state store - the single source of truth
//!
//! The store owns the current [`GameState`] behind an `Rc`. A mutation never
//! edits the shared value: it clones it, edits the clone, bumps `version`,
//! swaps the `Rc` and then notifies every subscriber in subscription order.
//! Anyone still holding an older `Rc` keeps a complete, consistent snapshot.
//!
//! The bag randomizer lives here as well, so queue consumption and refill
//! happen in one mutation.

use std::fmt;
use std::rc::Rc;

use crate::board::Board;
use crate::pieces::ActivePiece;
use crate::rng::SevenBag;
use crate::scoring::{clamp_level, level_for_lines};
use crate::types::{PieceKind, NEXT_QUEUE_MIN};

/// One immutable snapshot of the game
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    pub board: Board,
    pub active: Option<ActivePiece>,
    /// Upcoming kinds, head first
    pub next_queue: Vec<PieceKind>,
    pub score: u32,
    /// 1..=20
    pub level: u32,
    /// Lines cleared this game
    pub lines: u32,
    pub paused: bool,
    pub over: bool,
    /// Incremented by every committed mutation
    pub version: u64,
}

impl GameState {
    fn initial(next_queue: Vec<PieceKind>, version: u64) -> Self {
        Self {
            board: Board::new(),
            active: None,
            next_queue,
            score: 0,
            level: 1,
            lines: 0,
            paused: false,
            over: false,
            version,
        }
    }
}

/// Handle returned by [`Store::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub type Listener = Box<dyn FnMut(&GameState)>;

pub struct Store {
    state: Rc<GameState>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
    bag: SevenBag,
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("state", &self.state)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Store {
    /// Fresh store with the next queue already seeded from a bag
    pub fn new(seed: u32) -> Self {
        let mut bag = SevenBag::new(seed);
        let queue = (0..NEXT_QUEUE_MIN).map(|_| bag.next()).collect();
        Self {
            state: Rc::new(GameState::initial(queue, 0)),
            listeners: Vec::new(),
            next_subscription: 0,
            bag,
        }
    }

    /// Current snapshot
    pub fn get_state(&self) -> Rc<GameState> {
        Rc::clone(&self.state)
    }

    /// Borrow the current snapshot without bumping the refcount
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Register a listener. It is called right away with the current
    /// snapshot, then after every mutation until unsubscribed.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&GameState) + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;

        let mut listener: Listener = Box::new(listener);
        listener(&self.state);
        self.listeners.push((id, listener));
        id
    }

    /// Remove a listener. Returns false if the id was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.listeners.len()
    }

    fn commit(&mut self, edit: impl FnOnce(&mut GameState, &mut SevenBag)) {
        let mut next = GameState::clone(&self.state);
        edit(&mut next, &mut self.bag);
        next.version = self.state.version + 1;
        self.state = Rc::new(next);
        self.emit();
    }

    fn emit(&mut self) {
        let snapshot = Rc::clone(&self.state);
        for (_, listener) in self.listeners.iter_mut() {
            listener(&snapshot);
        }
    }

    /// Back to the initial state with a freshly filled queue. The partly
    /// used bag is discarded so the new game starts on a bag boundary; the
    /// generator carries on and subscribers stay registered.
    pub fn reset(&mut self) {
        self.commit(|state, bag| {
            bag.discard();
            let queue = (0..NEXT_QUEUE_MIN).map(|_| bag.next()).collect();
            *state = GameState::initial(queue, state.version);
        });
    }

    pub fn set_paused(&mut self, paused: bool) {
        if self.state.paused == paused {
            return;
        }
        self.commit(|state, _| state.paused = paused);
    }

    pub fn toggle_paused(&mut self) {
        let paused = !self.state.paused;
        self.set_paused(paused);
    }

    pub fn set_over(&mut self, over: bool) {
        if self.state.over == over {
            return;
        }
        self.commit(|state, _| state.over = over);
    }

    pub fn set_score(&mut self, score: u32) {
        if self.state.score == score {
            return;
        }
        self.commit(|state, _| state.score = score);
    }

    pub fn add_score(&mut self, delta: u32) {
        if delta == 0 {
            return;
        }
        let score = self.state.score.saturating_add(delta);
        self.set_score(score);
    }

    /// Raw override, clamped to 1..=20. The next line change recomputes it.
    pub fn set_level(&mut self, level: u32) {
        let level = clamp_level(level);
        if self.state.level == level {
            return;
        }
        self.commit(|state, _| state.level = level);
    }

    /// Set the line total; level follows in the same snapshot
    pub fn set_lines(&mut self, lines: u32) {
        if self.state.lines == lines {
            return;
        }
        self.commit(|state, _| {
            state.lines = lines;
            state.level = level_for_lines(lines);
        });
    }

    pub fn add_lines(&mut self, delta: u32) {
        if delta == 0 {
            return;
        }
        let lines = self.state.lines.saturating_add(delta);
        self.set_lines(lines);
    }

    pub fn set_board(&mut self, board: Board) {
        if self.state.board == board {
            return;
        }
        self.commit(|state, _| state.board = board);
    }

    pub fn set_active(&mut self, active: Option<ActivePiece>) {
        self.commit(|state, _| state.active = active);
    }

    pub fn set_next_queue(&mut self, queue: Vec<PieceKind>) {
        self.commit(|state, _| state.next_queue = queue);
    }

    pub fn push_next(&mut self, kind: PieceKind) {
        self.commit(|state, _| state.next_queue.push(kind));
    }

    /// Top the queue up to the minimum length from the bag
    pub fn fill_next_queue(&mut self) {
        self.commit(|state, bag| refill(&mut state.next_queue, bag));
    }

    /// Take the head of the queue and refill behind it, as one notification
    pub fn consume_next(&mut self) -> PieceKind {
        let mut head = PieceKind::I;
        self.commit(|state, bag| {
            refill(&mut state.next_queue, bag);
            head = state.next_queue.remove(0);
            refill(&mut state.next_queue, bag);
        });
        head
    }
}

fn refill(queue: &mut Vec<PieceKind>, bag: &mut SevenBag) {
    while queue.len() < NEXT_QUEUE_MIN {
        queue.push(bag.next());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn recording(store: &mut Store) -> (SubscriptionId, Rc<RefCell<Vec<u64>>>) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let id = store.subscribe(move |s| sink.borrow_mut().push(s.version));
        (id, seen)
    }

    #[test]
    fn initial_state() {
        let store = Store::new(1);
        let s = store.get_state();
        assert_eq!(s.board, Board::new());
        assert_eq!(s.active, None);
        assert_eq!(s.next_queue.len(), NEXT_QUEUE_MIN);
        assert_eq!((s.score, s.level, s.lines), (0, 1, 0));
        assert!(!s.paused && !s.over);
        assert_eq!(s.version, 0);
    }

    #[test]
    fn subscribe_calls_listener_immediately() {
        let mut store = Store::new(1);
        let (_, seen) = recording(&mut store);
        assert_eq!(*seen.borrow(), vec![0]);
    }

    #[test]
    fn unchanged_values_do_not_notify() {
        let mut store = Store::new(1);
        let (_, seen) = recording(&mut store);

        store.set_paused(false);
        store.set_over(false);
        store.set_score(0);
        store.add_score(0);
        store.set_lines(0);
        store.add_lines(0);
        store.set_level(1);
        store.set_board(Board::new());
        assert_eq!(seen.borrow().len(), 1);

        store.set_score(10);
        assert_eq!(*seen.borrow(), vec![0, 1]);
    }

    #[test]
    fn set_active_always_notifies() {
        let mut store = Store::new(1);
        let (_, seen) = recording(&mut store);
        store.set_active(None);
        store.set_active(None);
        assert_eq!(seen.borrow().len(), 3);
    }

    #[test]
    fn unsubscribe_stops_notifications() {
        let mut store = Store::new(1);
        let (id, seen) = recording(&mut store);
        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store.set_score(5);
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn listeners_run_in_subscription_order() {
        let mut store = Store::new(1);
        let order = Rc::new(RefCell::new(Vec::new()));
        for tag in 0..3 {
            let sink = Rc::clone(&order);
            store.subscribe(move |_| sink.borrow_mut().push(tag));
        }
        order.borrow_mut().clear();
        store.toggle_paused();
        assert_eq!(*order.borrow(), vec![0, 1, 2]);
    }

    #[test]
    fn old_snapshots_are_unaffected_by_mutation() {
        let mut store = Store::new(1);
        let before = store.get_state();
        store.add_score(100);
        assert_eq!(before.score, 0);
        assert_eq!(store.state().score, 100);
        assert_eq!(store.state().version, before.version + 1);
    }

    #[test]
    fn lines_drive_level() {
        let mut store = Store::new(1);
        store.add_lines(9);
        assert_eq!(store.state().level, 1);
        store.add_lines(1);
        assert_eq!(store.state().level, 2);
        store.set_lines(250);
        assert_eq!(store.state().level, 20);
    }

    #[test]
    fn set_level_is_clamped() {
        let mut store = Store::new(1);
        store.set_level(0);
        assert_eq!(store.state().level, 1);
        store.set_level(42);
        assert_eq!(store.state().level, 20);
    }

    #[test]
    fn consume_next_refills_in_one_notification() {
        let mut store = Store::new(3);
        let (_, seen) = recording(&mut store);
        let expected_head = store.state().next_queue[0];
        let second = store.state().next_queue[1];

        let head = store.consume_next();
        assert_eq!(head, expected_head);
        assert_eq!(store.state().next_queue.len(), NEXT_QUEUE_MIN);
        assert_eq!(store.state().next_queue[0], second);
        assert_eq!(seen.borrow().len(), 2);
    }

    #[test]
    fn consume_next_on_empty_queue_still_returns_a_piece() {
        let mut store = Store::new(3);
        store.set_next_queue(Vec::new());
        let _ = store.consume_next();
        assert_eq!(store.state().next_queue.len(), NEXT_QUEUE_MIN);
    }

    #[test]
    fn queue_ops_always_notify() {
        let mut store = Store::new(3);
        let (_, seen) = recording(&mut store);
        store.push_next(PieceKind::T);
        store.fill_next_queue();
        assert_eq!(seen.borrow().len(), 3);
        assert_eq!(store.state().next_queue.len(), NEXT_QUEUE_MIN + 1);
        assert_eq!(store.state().next_queue[NEXT_QUEUE_MIN], PieceKind::T);
    }

    #[test]
    fn reset_is_a_single_notification_and_keeps_subscribers() {
        let mut store = Store::new(1);
        store.add_score(300);
        store.add_lines(12);
        store.set_paused(true);
        store.set_over(true);
        let (_, seen) = recording(&mut store);

        store.reset();
        assert_eq!(seen.borrow().len(), 2);
        let s = store.state();
        assert_eq!((s.score, s.level, s.lines), (0, 1, 0));
        assert!(!s.paused && !s.over);
        assert_eq!(s.next_queue.len(), NEXT_QUEUE_MIN);
        assert_eq!(store.subscriber_count(), 1);

        store.set_score(1);
        assert_eq!(seen.borrow().len(), 3);
    }

    #[test]
    fn game_after_reset_opens_with_a_whole_bag() {
        let mut store = Store::new(5);
        // Three queued plus two dealt: two pieces left in the bag.
        for _ in 0..2 {
            store.consume_next();
        }
        store.reset();

        let mut dealt: Vec<PieceKind> = (0..7).map(|_| store.consume_next()).collect();
        dealt.sort_by_key(|k| k.id());
        assert_eq!(dealt, PieceKind::ALL.to_vec());
    }

    #[test]
    fn version_is_monotonic_across_reset() {
        let mut store = Store::new(1);
        store.set_score(1);
        let v = store.state().version;
        store.reset();
        assert!(store.state().version > v);
    }
}
