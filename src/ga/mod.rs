//! Genetic Algorithm framework.
//!
//! A generic GA engine built on trait-based abstractions. A problem plugs in
//! by implementing [`GaProblem`], which specifies how to create, evaluate,
//! recombine and mutate individuals; the engine owns the population, the
//! random generator and the loop.
//!
//! # Core Traits
//!
//! - [`Fitness`]: ordered fitness values with a feasibility view
//! - [`Individual`]: a candidate carrying its lazily computed evaluation
//! - [`GaProblem`]: problem definition (initialization, evaluation, operators)
//!
//! # Key Types
//!
//! - [`GaConfig`]: algorithm parameters (population, elitism, operators, presets)
//! - [`GaRunner`]: executes the evolutionary loop
//! - [`GaResult`]: terminal population, best individual and per-generation statistics
//!
//! # Submodules
//!
//! - [`operators`]: bounded real-valued crossover (BLX-α) and mutation
//!   (Gaussian, uniform reset)
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*
//! - Deb (2000), "An efficient constraint handling method for genetic algorithms"

mod config;
pub mod operators;
mod runner;
mod selection;
mod types;

pub use config::GaConfig;
pub use operators::MutationOperator;
pub use runner::{GaResult, GaRunner, GenerationStats, Termination};
pub use selection::Selection;
pub use types::{Fitness, GaProblem, Individual};
