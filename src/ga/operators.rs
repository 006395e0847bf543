//! Bounded real-valued genetic operators.
//!
//! Operate on `&[f64]` gene vectors with one closed `(lower, upper)` interval
//! per gene. Every operator clamps its output back into the bounds, so a
//! population built only through these functions never leaves the box.
//!
//! # Crossover Operators
//!
//! - [`blend_crossover`] (BLX-α): Eshelman & Schaffer (1993)
//!
//! # Mutation Operators
//!
//! - [`gaussian_mutation`]: per-gene normal perturbation scaled to the range
//! - [`uniform_mutation`]: per-gene uniform reset within the bounds
//!
//! # References
//!
//! - Eshelman & Schaffer (1993), "Real-Coded Genetic Algorithms and
//!   Interval-Schemata"
//! - Deb (2001), *Multi-Objective Optimization using Evolutionary Algorithms*,
//!   ch. 4

use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

/// Per-gene mutation applied to an offspring chosen for mutation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationOperator {
    /// [`gaussian_mutation`]
    #[default]
    Gaussian,
    /// [`uniform_mutation`]
    Uniform,
}

impl MutationOperator {
    /// Applies the operator; `scale` is ignored by uniform reset.
    pub fn apply<R: Rng>(
        self,
        genes: &mut [f64],
        bounds: &[(f64, f64)],
        gene_prob: f64,
        scale: f64,
        rng: &mut R,
    ) -> usize {
        match self {
            MutationOperator::Gaussian => gaussian_mutation(genes, bounds, gene_prob, scale, rng),
            MutationOperator::Uniform => uniform_mutation(genes, bounds, gene_prob, rng),
        }
    }
}

// ============================================================================
// Crossover operators
// ============================================================================

/// Blend crossover (BLX-α).
///
/// For each gene, with parents `a` and `b` and `d = |a − b|`, each child
/// draws uniformly from `[min(a, b) − α·d, max(a, b) + α·d]`, then clamps.
/// Identical parent genes are inherited unchanged.
///
/// # Panics
/// Panics if parents and bounds differ in length.
pub fn blend_crossover<R: Rng>(
    parent1: &[f64],
    parent2: &[f64],
    bounds: &[(f64, f64)],
    alpha: f64,
    rng: &mut R,
) -> (Vec<f64>, Vec<f64>) {
    assert_eq!(
        parent1.len(),
        parent2.len(),
        "parents must have equal length"
    );
    assert_eq!(parent1.len(), bounds.len(), "one bound per gene");

    let mut child1 = Vec::with_capacity(parent1.len());
    let mut child2 = Vec::with_capacity(parent1.len());
    for ((&a, &b), &(lower, upper)) in parent1.iter().zip(parent2).zip(bounds) {
        let (lo, hi) = (a.min(b), a.max(b));
        let spread = alpha * (hi - lo);
        let (from, to) = (lo - spread, hi + spread);
        for child in [&mut child1, &mut child2] {
            let gene = if to > from {
                rng.random_range(from..=to)
            } else {
                lo
            };
            child.push(gene.clamp(lower, upper));
        }
    }
    (child1, child2)
}

// ============================================================================
// Mutation operators
// ============================================================================

/// Gaussian mutation.
///
/// Each gene, with probability `gene_prob`, receives `N(0, σ)` noise where
/// `σ = scale · (upper − lower)`. Every gene is clamped afterwards.
///
/// Returns the number of perturbed genes.
///
/// # Panics
/// Panics if genes and bounds differ in length.
pub fn gaussian_mutation<R: Rng>(
    genes: &mut [f64],
    bounds: &[(f64, f64)],
    gene_prob: f64,
    scale: f64,
    rng: &mut R,
) -> usize {
    assert_eq!(genes.len(), bounds.len(), "one bound per gene");

    let mut mutated = 0;
    for (gene, &(lower, upper)) in genes.iter_mut().zip(bounds) {
        if rng.random::<f64>() < gene_prob {
            let sigma = scale * (upper - lower);
            // Degenerate intervals and a zero scale leave the gene in place.
            if let Some(normal) = Normal::new(0.0, sigma).ok().filter(|_| sigma > 0.0) {
                *gene += normal.sample(rng);
                mutated += 1;
            }
        }
        *gene = gene.clamp(lower, upper);
    }
    mutated
}

/// Uniform reset mutation.
///
/// Each gene, with probability `gene_prob`, is replaced by a uniform draw
/// from its interval.
///
/// Returns the number of reset genes.
///
/// # Panics
/// Panics if genes and bounds differ in length.
pub fn uniform_mutation<R: Rng>(
    genes: &mut [f64],
    bounds: &[(f64, f64)],
    gene_prob: f64,
    rng: &mut R,
) -> usize {
    assert_eq!(genes.len(), bounds.len(), "one bound per gene");

    let mut mutated = 0;
    for (gene, &(lower, upper)) in genes.iter_mut().zip(bounds) {
        if rng.random::<f64>() < gene_prob {
            *gene = if upper > lower {
                rng.random_range(lower..=upper)
            } else {
                lower
            };
            mutated += 1;
        }
        *gene = gene.clamp(lower, upper);
    }
    mutated
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;
    use proptest::prelude::*;

    fn within(genes: &[f64], bounds: &[(f64, f64)]) -> bool {
        genes
            .iter()
            .zip(bounds)
            .all(|(&g, &(lo, hi))| g >= lo && g <= hi)
    }

    const BOUNDS: [(f64, f64); 3] = [(0.0, 10.0), (-5.0, 5.0), (100.0, 200.0)];

    // ---- BLX-α ----

    #[test]
    fn test_blx_identical_parents_unchanged() {
        let mut rng = create_rng(42);
        let p = [3.0, 0.5, 150.0];
        let (c1, c2) = blend_crossover(&p, &p, &BOUNDS, 0.5, &mut rng);
        assert_eq!(c1, p.to_vec());
        assert_eq!(c2, p.to_vec());
    }

    #[test]
    fn test_blx_zero_alpha_stays_between_parents() {
        let mut rng = create_rng(42);
        let p1 = [1.0, -4.0, 110.0];
        let p2 = [9.0, 4.0, 190.0];
        for _ in 0..200 {
            let (c1, c2) = blend_crossover(&p1, &p2, &BOUNDS, 0.0, &mut rng);
            for child in [c1, c2] {
                for i in 0..3 {
                    assert!(child[i] >= p1[i].min(p2[i]) && child[i] <= p1[i].max(p2[i]));
                }
            }
        }
    }

    #[test]
    fn test_blx_clamps_extension_at_bounds() {
        let mut rng = create_rng(7);
        // Parents at the edges with a large α: most draws fall outside.
        let p1 = [0.0, -5.0, 100.0];
        let p2 = [10.0, 5.0, 200.0];
        let mut hit_edge = false;
        for _ in 0..100 {
            let (c1, _) = blend_crossover(&p1, &p2, &BOUNDS, 2.0, &mut rng);
            assert!(within(&c1, &BOUNDS));
            hit_edge |= c1[0] == 0.0 || c1[0] == 10.0;
        }
        assert!(hit_edge);
    }

    #[test]
    #[should_panic(expected = "one bound per gene")]
    fn test_blx_bounds_length_mismatch_panics() {
        let mut rng = create_rng(1);
        blend_crossover(&[1.0], &[2.0], &BOUNDS, 0.5, &mut rng);
    }

    // ---- Gaussian ----

    #[test]
    fn test_gaussian_zero_prob_is_noop() {
        let mut rng = create_rng(42);
        let mut genes = [3.0, 0.5, 150.0];
        assert_eq!(
            gaussian_mutation(&mut genes, &BOUNDS, 0.0, 0.1, &mut rng),
            0
        );
        assert_eq!(genes, [3.0, 0.5, 150.0]);
    }

    #[test]
    fn test_gaussian_full_prob_moves_every_gene() {
        let mut rng = create_rng(42);
        let mut genes = [5.0, 0.0, 150.0];
        assert_eq!(
            gaussian_mutation(&mut genes, &BOUNDS, 1.0, 0.1, &mut rng),
            3
        );
        assert!(genes.iter().zip([5.0, 0.0, 150.0]).all(|(a, b)| *a != b));
    }

    #[test]
    fn test_gaussian_scale_tracks_range() {
        let mut rng = create_rng(3);
        let bounds = [(0.0, 1000.0)];
        let mut total = 0.0;
        for _ in 0..2000 {
            let mut g = [500.0];
            gaussian_mutation(&mut g, &bounds, 1.0, 0.01, &mut rng);
            total += (g[0] - 500.0).abs();
        }
        // E|N(0, 10)| = 10·sqrt(2/π) ≈ 7.98
        let mean = total / 2000.0;
        assert!((mean - 7.98).abs() < 1.0, "mean deviation {mean}");
    }

    #[test]
    fn test_gaussian_degenerate_interval() {
        let mut rng = create_rng(1);
        let mut genes = [4.0];
        let moved = gaussian_mutation(&mut genes, &[(4.0, 4.0)], 1.0, 0.5, &mut rng);
        assert_eq!(moved, 0);
        assert_eq!(genes, [4.0]);
    }

    // ---- Uniform ----

    #[test]
    fn test_uniform_covers_interval() {
        let mut rng = create_rng(11);
        let bounds = [(0.0, 10.0)];
        let (mut low, mut high) = (false, false);
        for _ in 0..1000 {
            let mut g = [5.0];
            uniform_mutation(&mut g, &bounds, 1.0, &mut rng);
            low |= g[0] < 1.0;
            high |= g[0] > 9.0;
        }
        assert!(low && high);
    }

    #[test]
    fn test_operator_dispatch() {
        let bounds = [(0.0, 1.0); 4];
        let mut a = [0.5; 4];
        let mut b = [0.5; 4];
        let n = MutationOperator::Uniform.apply(&mut a, &bounds, 1.0, 0.0, &mut create_rng(5));
        let m = uniform_mutation(&mut b, &bounds, 1.0, &mut create_rng(5));
        assert_eq!((n, a), (m, b));
        // A zero scale disables Gaussian noise.
        let mut c = [0.5; 4];
        let n = MutationOperator::Gaussian.apply(&mut c, &bounds, 1.0, 0.0, &mut create_rng(5));
        assert_eq!(n, 0);
        assert_eq!(c, [0.5; 4]);
    }

    // ---- Clamping invariant ----

    fn case() -> impl Strategy<Value = (Vec<(f64, f64)>, Vec<f64>, Vec<f64>)> {
        prop::collection::vec((-1e3..1e3f64, 0.0..1e3f64), 1..12).prop_flat_map(|raw| {
            let bounds: Vec<(f64, f64)> = raw.iter().map(|&(lo, w)| (lo, lo + w)).collect();
            let genes = |b: &[(f64, f64)]| {
                b.iter()
                    .map(|&(lo, hi)| {
                        if hi > lo {
                            (lo..=hi).boxed()
                        } else {
                            Just(lo).boxed()
                        }
                    })
                    .collect::<Vec<_>>()
            };
            (Just(bounds.clone()), genes(&bounds), genes(&bounds))
        })
    }

    proptest! {
        #[test]
        fn prop_operators_stay_in_bounds(
            (bounds, p1, p2) in case(),
            alpha in 0.0..3.0f64,
            scale in 0.0..2.0f64,
            seed in any::<u64>(),
        ) {
            let mut rng = create_rng(seed);
            let (mut c1, mut c2) = blend_crossover(&p1, &p2, &bounds, alpha, &mut rng);
            prop_assert!(within(&c1, &bounds));
            prop_assert!(within(&c2, &bounds));

            gaussian_mutation(&mut c1, &bounds, 1.0, scale, &mut rng);
            uniform_mutation(&mut c2, &bounds, 0.5, &mut rng);
            prop_assert!(within(&c1, &bounds));
            prop_assert!(within(&c2, &bounds));
        }

        #[test]
        fn prop_out_of_bounds_input_is_clamped(
            (bounds, genes, _) in case(),
            offset in 1.0..1e4f64,
            seed in any::<u64>(),
        ) {
            let mut rng = create_rng(seed);
            let mut shifted: Vec<f64> = genes.iter().map(|g| g + offset).collect();
            gaussian_mutation(&mut shifted, &bounds, 0.0, 0.1, &mut rng);
            prop_assert!(within(&shifted, &bounds));
        }
    }
}
