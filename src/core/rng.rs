//! Deterministic random number generation for dice and Chance draws.
//!
//! ## Key Features
//!
//! - **Deterministic**: Same seed produces identical sequence
//! - **Serializable**: O(1) state capture and restore, so a saved game
//!   resumes with the exact dice it would have rolled
//! - **Replaceable**: the engine only sees [`RandomSource`], so tests can
//!   script every die face with [`ScriptedRandom`]
//!
//! ```
//! use monopoly_engine::core::{GameRng, RandomSource};
//!
//! let mut rng = GameRng::new(42);
//! let mut same = GameRng::new(42);
//! assert_eq!(rng.roll_die(), same.roll_die());
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Source of randomness consumed by the rules.
pub trait RandomSource {
    /// One six-sided die, uniform over `1..=6`.
    fn roll_die(&mut self) -> u8;

    /// Uniform index in `0..len`. `len` is never zero.
    fn pick(&mut self, len: usize) -> usize;

    /// State to store in a snapshot, if this source can be restored.
    fn checkpoint(&self) -> Option<GameRngState> {
        None
    }
}

/// Seeded RNG backed by ChaCha8.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create an RNG seeded from the operating system.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    /// The seed this generator started from.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Generate a random usize in the given range.
    pub fn gen_range_usize(&mut self, range: std::ops::Range<usize>) -> usize {
        self.inner.gen_range(range)
    }

    /// Get the current state for serialization.
    #[must_use]
    pub fn state(&self) -> GameRngState {
        GameRngState {
            seed: self.seed,
            word_pos: self.inner.get_word_pos(),
        }
    }

    /// Restore from a saved state.
    #[must_use]
    pub fn from_state(state: &GameRngState) -> Self {
        let mut inner = ChaCha8Rng::seed_from_u64(state.seed);
        inner.set_word_pos(state.word_pos);
        Self {
            inner,
            seed: state.seed,
        }
    }
}

impl RandomSource for GameRng {
    fn roll_die(&mut self) -> u8 {
        self.inner.gen_range(1..=6)
    }

    fn pick(&mut self, len: usize) -> usize {
        self.gen_range_usize(0..len)
    }

    fn checkpoint(&self) -> Option<GameRngState> {
        Some(self.state())
    }
}

/// Serializable RNG state for checkpointing.
///
/// Uses the ChaCha8 word position so serialization is O(1) regardless of
/// how many dice have been rolled.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRngState {
    /// Original seed
    pub seed: u64,
    /// ChaCha8 word position (128-bit counter)
    pub word_pos: u128,
}

/// Replays fixed die faces and picks in order.
///
/// Panics when a sequence runs dry: a script that is too short is a bug in
/// the caller.
#[derive(Clone, Debug, Default)]
pub struct ScriptedRandom {
    dice: VecDeque<u8>,
    picks: VecDeque<usize>,
}

impl ScriptedRandom {
    /// Script the die faces, consumed one per `roll_die`.
    pub fn with_dice(dice: impl IntoIterator<Item = u8>) -> Self {
        Self {
            dice: dice.into_iter().collect(),
            picks: VecDeque::new(),
        }
    }

    /// Append picks, consumed one per `pick`.
    #[must_use]
    pub fn and_picks(mut self, picks: impl IntoIterator<Item = usize>) -> Self {
        self.picks.extend(picks);
        self
    }

    /// Die faces not yet consumed.
    #[must_use]
    pub fn remaining_dice(&self) -> usize {
        self.dice.len()
    }
}

impl RandomSource for ScriptedRandom {
    fn roll_die(&mut self) -> u8 {
        match self.dice.pop_front() {
            Some(face) => {
                assert!((1..=6).contains(&face), "scripted die face {face} out of range");
                face
            }
            None => panic!("ScriptedRandom ran out of dice"),
        }
    }

    fn pick(&mut self, len: usize) -> usize {
        match self.picks.pop_front() {
            Some(i) => i % len,
            None => panic!("ScriptedRandom ran out of picks"),
        }
    }
}
