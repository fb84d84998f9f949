//! Random number generator construction.
//!
//! Stochastic calculators take `&mut impl Rng`. Tests pass [`seeded`] to
//! reproduce exact paths; applications pass [`from_entropy`].

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A reproducible generator.
pub fn seeded(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// A generator seeded from operating system entropy.
pub fn from_entropy() -> StdRng {
    StdRng::from_entropy()
}

/// Draws `count` child seeds so independent work items get their own generator.
pub fn child_seeds<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<u64> {
    (0..count).map(|_| rng.gen::<u64>()).collect()
}
