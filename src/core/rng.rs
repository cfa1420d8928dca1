//! Deterministic, serializable random number generation.
//!
//! The only randomness in the game is reshuffling the discard pile back
//! into the draw pile. `GameRng` keeps that reproducible:
//!
//! - **Deterministic**: same seed produces the same shuffles
//! - **Serializable**: O(1) state capture and restore, so a loaded snapshot
//!   continues the exact shuffle stream it was saved with
//!
//! ```
//! use codex_engine::core::GameRng;
//!
//! let mut a = GameRng::new(42);
//! let mut b = GameRng::from_state(&a.state());
//!
//! let mut left = vec![1, 2, 3, 4, 5];
//! let mut right = left.clone();
//! a.shuffle(&mut left);
//! b.shuffle(&mut right);
//! assert_eq!(left, right);
//! ```

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Deterministic RNG for deck shuffles.
///
/// Uses ChaCha8 for speed; the word position makes the state cheap to save.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    /// Fresh shuffle stream for `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Shuffle a slice in place (Fisher–Yates).
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        slice.shuffle(&mut self.inner);
    }

    /// Position in the stream, written into snapshots.
    #[must_use]
    pub fn state(&self) -> GameRngState {
        GameRngState {
            seed: self.seed,
            word_pos: self.inner.get_word_pos(),
        }
    }

    /// Resume a stream saved with `state`.
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

/// Serializable RNG state for snapshots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRngState {
    pub seed: u64,
    /// Words consumed since seeding.
    pub word_pos: u128,
}
