//! Deterministic simulation-level RNG.
//!
//! The kernel itself is deterministic and never needs randomness.  `SimRng`
//! exists for the coordinator's shuffled dispatch order, which permutes the
//! imminent and receiver sets each cycle to show that results do not depend
//! on visiting order.

use rand::rngs::SmallRng;
use rand::SeedableRng;

/// Seeded `SmallRng` wrapper.  The same seed always yields the same stream.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// Shuffle a mutable slice in-place (Fisher-Yates).
    #[inline]
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        use rand::seq::SliceRandom;
        slice.shuffle(&mut self.0);
    }
}
