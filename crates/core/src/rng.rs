//! RNG module - 7-bag random piece generation
//!
//! Each bag holds one of each kind in a shuffled order. Pieces are drawn
//! from the front until the bag is empty, then a new bag is shuffled.
//! The generator is a seeded LCG so a game can be replayed from its seed.

use crate::types::PieceKind;

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Uniform value in `[0, max)`.
    ///
    /// Scales by the high bits; the low bits of a power-of-two LCG have
    /// short periods.
    pub fn next_range(&mut self, max: u32) -> u32 {
        ((self.next_u32() as u64 * max as u64) >> 32) as u32
    }

    /// Shuffle a slice using Fisher-Yates
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_range((i + 1) as u32) as usize;
            slice.swap(i, j);
        }
    }

    pub fn state(&self) -> u32 {
        self.state
    }
}

/// Seven-piece bag randomizer
#[derive(Debug, Clone)]
pub struct SevenBag {
    bag: [PieceKind; 7],
    /// Next unread slot; 7 means the bag is empty
    index: usize,
    rng: SimpleRng,
}

impl SevenBag {
    /// An empty bag; the first draw shuffles
    pub fn new(seed: u32) -> Self {
        Self {
            bag: PieceKind::ALL,
            index: 7,
            rng: SimpleRng::new(seed),
        }
    }

    fn refill(&mut self) {
        self.bag = PieceKind::ALL;
        self.rng.shuffle(&mut self.bag);
        self.index = 0;
    }

    /// Remove and return the first piece of the bag, reshuffling when empty
    pub fn next(&mut self) -> PieceKind {
        if self.index >= self.bag.len() {
            self.refill();
        }
        let piece = self.bag[self.index];
        self.index += 1;
        piece
    }

    /// Throw away the rest of the current bag; the next draw reshuffles.
    /// The generator keeps its state.
    pub fn discard(&mut self) {
        self.index = self.bag.len();
    }

    /// Pieces left before the next reshuffle
    pub fn remaining(&self) -> &[PieceKind] {
        &self.bag[self.index..]
    }
}
