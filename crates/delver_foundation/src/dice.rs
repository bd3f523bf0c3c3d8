//! Seeded dice roller.
//!
//! Every random decision the engine makes goes through [`Dice`]. Tests push
//! scripted results with [`Dice::script`]; each call to [`Dice::roll`] then
//! consumes exactly one scripted value as its whole result before falling
//! back to the RNG.

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::trace;

/// Dice roller with a deterministic RNG and a scripted-roll queue.
#[derive(Clone, Debug)]
pub struct Dice {
    rng: ChaCha8Rng,
    scripted: VecDeque<i32>,
}

impl Dice {
    /// Creates a roller seeded with the given value.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            scripted: VecDeque::new(),
        }
    }

    /// Creates a roller seeded from the operating system.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            rng: ChaCha8Rng::from_entropy(),
            scripted: VecDeque::new(),
        }
    }

    /// Queues results for upcoming rolls, consumed first-in first-out.
    pub fn script(&mut self, rolls: impl IntoIterator<Item = i32>) {
        self.scripted.extend(rolls);
    }

    /// Drops any scripted results that were not consumed.
    pub fn clear_script(&mut self) {
        self.scripted.clear();
    }

    /// Number of scripted results still waiting.
    #[must_use]
    pub fn scripted_remaining(&self) -> usize {
        self.scripted.len()
    }

    /// Rolls `dice` dice with `sides` sides each and returns the total.
    ///
    /// Zero sides always yields zero. Negative sides yield a negative total,
    /// so `roll(3, -1)` is `-3`.
    pub fn roll(&mut self, dice: i32, sides: i32) -> i32 {
        if let Some(value) = self.scripted.pop_front() {
            trace!(dice, sides, value, "scripted roll");
            return value;
        }
        if sides == 0 {
            return 0;
        }
        let faces = sides.abs();
        let total: i32 = (0..dice.max(0))
            .map(|_| self.rng.gen_range(1..=faces))
            .sum();
        let value = total * sides.signum();
        trace!(dice, sides, value, "roll");
        value
    }

    /// Rolls one percentile die.
    pub fn percent(&mut self) -> i32 {
        self.roll(1, 100)
    }

    /// Picks an index in `0..len` with a single die roll, or `None` when empty.
    ///
    /// Scripted results are interpreted as one-based positions.
    pub fn random_index(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        let sides = i32::try_from(len).unwrap_or(i32::MAX);
        let rolled = self.roll(1, sides).clamp(1, sides);
        usize::try_from(rolled - 1).ok()
    }

    /// Picks a cosmetic variant without touching the scripted queue.
    pub fn flavor_index(&mut self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        self.rng.gen_range(0..len)
    }
}

impl Default for Dice {
    fn default() -> Self {
        Self::from_entropy()
    }
}
