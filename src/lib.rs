//! Constrained evolutionary generative design for engine components.
//!
//! Searches bounded geometric design spaces for the lightest crankshaft,
//! connecting rod, piston or cylinder block that satisfies analytical
//! stress, buckling, fatigue, frequency and geometric constraints. Parts
//! may be built from a lattice infill whose relative density is itself a
//! design variable.
//!
//! - **design**: components, bounded variables, presets
//! - **material**: solid materials and the Gibson–Ashby lattice decorator
//! - **load**: operating-mode load cases
//! - **physics**: pure analytical models, one per component
//! - **constraint**: named bounds and the normalized violation evaluator
//! - **ga**: generic genetic algorithm engine (tournament/rank selection,
//!   BLX-α crossover, Gaussian or uniform mutation, elitism)
//! - **optimize**: binds the above into runs, sweeps and material comparisons
//! - **export**: callback contract for turning a result into CAD geometry
//!
//! # Architecture
//!
//! The GA engine knows nothing about engines: it ranks individuals by a
//! totally ordered [`ga::Fitness`]. The [`optimize`] layer supplies
//! [`optimize::PenaltyFitness`], which puts every feasible design ahead of
//! every infeasible one, and evaluates candidates in parallel with `rayon`
//! when the `parallel` feature is enabled. Runs are reproducible from their
//! seed regardless of parallelism.

pub mod constraint;
pub mod design;
pub mod error;
pub mod export;
pub mod ga;
pub mod load;
pub mod material;
pub mod optimize;
pub mod physics;
pub mod random;
