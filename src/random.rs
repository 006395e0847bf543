//! Seedable random source.
//!
//! Every stochastic decision of a run draws from one generator created here,
//! so a seed fully determines the selection, crossover and mutation trace.

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Creates the run generator from a seed.
pub fn create_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Draws a fresh seed for runs that did not request one.
///
/// The drawn seed is recorded in the run result so the run can be replayed.
pub fn fresh_seed() -> u64 {
    rand::random()
}
