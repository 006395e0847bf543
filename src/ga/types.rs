//! Core trait definitions for the GA framework.
//!
//! [`Individual`] and [`GaProblem`] are the contract between the generic
//! engine and a concrete problem. The engine owns the population and the
//! random generator; the problem owns representation, evaluation and the
//! variation operators.

use crate::error::ConfigError;
use rand::Rng;

/// Ordered fitness values.
///
/// Lower is better. Implementations used with constrained problems should
/// order every feasible value before every infeasible one so that sorting,
/// tournaments and elitism all honour the feasibility gate with a single
/// comparison.
///
/// Built-in implementations exist for `f64` and `f32` (always feasible).
pub trait Fitness: PartialOrd + Copy + Send + Sync + std::fmt::Debug + 'static {
    /// The worst possible fitness. Assigned to unevaluated individuals.
    fn worst() -> Self;

    /// Scalar view for logging and statistics.
    fn to_f64(self) -> f64;

    /// Whether this value satisfies every hard constraint.
    fn is_feasible(&self) -> bool {
        true
    }
}

impl Fitness for f64 {
    fn worst() -> Self {
        f64::INFINITY
    }

    fn to_f64(self) -> f64 {
        self
    }
}

impl Fitness for f32 {
    fn worst() -> Self {
        f32::INFINITY
    }

    fn to_f64(self) -> f64 {
        self as f64
    }
}

/// A candidate solution in the GA population.
///
/// Individuals carry their own evaluation record. The engine evaluates only
/// individuals that report `!is_evaluated()`, so any operation that changes
/// an individual's values must also drop its record.
///
/// ```ignore
/// #[derive(Clone)]
/// struct Point {
///     x: Vec<f64>,
///     score: Option<f64>,
/// }
///
/// impl Individual for Point {
///     type Fitness = f64;
///     fn fitness(&self) -> f64 { self.score.unwrap_or(f64::INFINITY) }
///     fn is_evaluated(&self) -> bool { self.score.is_some() }
/// }
/// ```
pub trait Individual: Clone + Send + Sync {
    type Fitness: Fitness;

    /// Current fitness; [`Fitness::worst`] until evaluated.
    fn fitness(&self) -> Self::Fitness;

    fn is_evaluated(&self) -> bool;
}

/// Defines a GA optimization problem.
///
/// # Thread Safety
///
/// `GaProblem` must be `Send + Sync`: with the `parallel` feature the runner
/// evaluates individuals concurrently. Variation operators are only ever
/// called from the driving thread, which owns the random generator.
pub trait GaProblem: Send + Sync {
    type Individual: Individual;

    /// Creates a random individual within the problem's bounds.
    fn create_individual<R: Rng>(&self, rng: &mut R) -> Self::Individual;

    /// Evaluates an individual in place, storing its record.
    ///
    /// Must not panic on bad candidates: a problem that cannot score a
    /// candidate should record it as maximally unfit instead.
    fn evaluate(&self, individual: &mut Self::Individual);

    /// Produces one or two offspring from two parents.
    ///
    /// The default implementation clones parent1 (no crossover).
    fn crossover<R: Rng>(
        &self,
        parent1: &Self::Individual,
        _parent2: &Self::Individual,
        _rng: &mut R,
    ) -> Vec<Self::Individual> {
        vec![parent1.clone()]
    }

    /// Mutates an individual in place. The default is a no-op.
    fn mutate<R: Rng>(&self, _individual: &mut Self::Individual, _rng: &mut R) {}

    /// Derives a new starting individual from a warm-start seed.
    ///
    /// Used to fill the initial population around supplied seeds. The
    /// default is a mutated clone.
    fn perturb<R: Rng>(&self, seed: &Self::Individual, rng: &mut R) -> Self::Individual {
        let mut child = seed.clone();
        self.mutate(&mut child, rng);
        child
    }

    /// Checks a warm-start seed before the run starts.
    ///
    /// Operators may assume every individual has the problem's shape, so a
    /// problem whose individuals can be malformed should reject them here.
    /// The default accepts every seed.
    fn check_seed(&self, _seed: &Self::Individual) -> Result<(), ConfigError> {
        Ok(())
    }

    /// Called after each generation has been ranked.
    fn on_generation(&self, _generation: usize, _best: &Self::Individual) {}
}
