//! Parent selection.
//!
//! Both strategies only compare fitness values, never their magnitudes, so
//! they work with any [`Fitness`](super::Fitness) order, including
//! lexicographic feasible-then-infeasible orders where a numeric weight
//! would be meaningless.
//!
//! # References
//!
//! - Blickle & Thiele (1996), "A Comparison of Selection Schemes used in
//!   Evolutionary Algorithms"
//! - Baker (1985), "Adaptive Selection Methods for Genetic Algorithms"

use super::types::Individual;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Selection strategy for choosing parents. Lower fitness is better.
///
/// ```
/// use u_gendesign::ga::Selection;
///
/// let sel = Selection::Tournament(3);
/// assert_eq!(sel, Selection::default());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Selection {
    /// Pick `k` individuals uniformly with replacement, keep the best.
    ///
    /// - k=2: light pressure
    /// - k=3-5: moderate pressure (typical default)
    /// - k>5: strong pressure, risk of premature convergence
    Tournament(usize),

    /// Linear ranking: the individual at rank `r` (0 = best) of `n` is
    /// drawn with weight `n - r`.
    Rank,
}

impl Default for Selection {
    fn default() -> Self {
        Selection::Tournament(3)
    }
}

impl Selection {
    /// Select a parent index from the population.
    ///
    /// # Panics
    /// Panics if `population` is empty.
    pub fn select<I: Individual, R: Rng>(&self, population: &[I], rng: &mut R) -> usize {
        assert!(
            !population.is_empty(),
            "cannot select from empty population"
        );

        match self {
            Selection::Tournament(k) => tournament(population, *k, rng),
            Selection::Rank => rank(population, rng),
        }
    }
}

fn tournament<I: Individual, R: Rng>(population: &[I], k: usize, rng: &mut R) -> usize {
    let k = k.max(1);
    let n = population.len();

    let mut best_idx = rng.random_range(0..n);
    for _ in 1..k {
        let idx = rng.random_range(0..n);
        if population[idx].fitness() < population[best_idx].fitness() {
            best_idx = idx;
        }
    }
    best_idx
}

fn rank<I: Individual, R: Rng>(population: &[I], rng: &mut R) -> usize {
    let n = population.len();
    if n == 1 {
        return 0;
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        population[a]
            .fitness()
            .partial_cmp(&population[b].fitness())
            .unwrap_or(Ordering::Equal)
    });

    let total = n * (n + 1) / 2;
    let threshold = rng.random_range(0..total);
    let mut cumulative = 0;
    for (rank, &idx) in order.iter().enumerate() {
        cumulative += n - rank;
        if cumulative > threshold {
            return idx;
        }
    }

    order[n - 1]
}
