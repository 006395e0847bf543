//! Constrained mass minimization of engine components.
//!
//! Binds a [`DesignSpace`](crate::design::DesignSpace), a physics
//! [`Component`](crate::physics::Component) and a [`GaConfig`](crate::ga::GaConfig)
//! into a [`DesignProblem`] and drives it with the generic GA engine.
//!
//! # Fitness
//!
//! Candidates are ranked by [`PenaltyFitness`]: any feasible design beats
//! any infeasible one, feasible designs compare by mass and infeasible ones
//! by total normalized violation. Candidates whose physics failed rank last.
//! A run in which nothing is feasible still returns the least-violating
//! design.
//!
//! # Example
//!
//! ```ignore
//! use u_gendesign::design::ComponentKind;
//! use u_gendesign::ga::GaConfig;
//! use u_gendesign::optimize::{self, RunRequest};
//!
//! let request = RunRequest::preset(ComponentKind::ConnectingRod)
//!     .with_config(GaConfig::default().with_seed(42));
//! let result = optimize::run(&request)?;
//! println!("{:?} kg, feasible: {}", result.best_mass_kg(), result.is_feasible());
//! ```

pub mod batch;
mod fitness;
mod problem;
mod request;
mod result;

pub use batch::{compare_materials, run_seeds, BatchReport, MaterialRanking, MaterialRow};
pub use fitness::PenaltyFitness;
pub use problem::{Candidate, DesignProblem};
pub use request::{BoundsOverride, RunRequest, RunSpec};
pub use result::{select, RunResult, RunSummary, Selection};

use crate::error::ConfigError;
use crate::ga::GaRunner;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

/// Runs one optimization.
///
/// # Errors
///
/// Any [`ConfigError`] from the design space, model inputs, GA parameters
/// or seeds. Nothing is evaluated when the request is rejected.
pub fn run(request: &RunRequest) -> Result<RunResult, ConfigError> {
    run_with_cancel(request, None)
}

/// Runs one optimization that stops early once `cancel` is set.
///
/// A cancelled run returns the population of the last completed generation.
pub fn run_with_cancel(
    request: &RunRequest,
    cancel: Option<Arc<AtomicBool>>,
) -> Result<RunResult, ConfigError> {
    let problem = DesignProblem::new(
        request.design_space.clone(),
        request.model.clone(),
        &request.config,
    )?;
    let seeds = request.seed_candidates()?;

    info!(
        component = %request.design_space.component(),
        material = %request.design_space.material().name,
        variables = request.design_space.dimension(),
        constraints = problem.specs().len(),
        "design run started"
    );

    let ga = GaRunner::run_seeded(&problem, &request.config, seeds, cancel)?;
    let result = RunResult::from_ga(&problem, ga);

    info!(
        component = %result.component,
        mass_kg = result.best_mass_kg(),
        feasible = result.is_feasible(),
        feasible_count = result.feasible_count,
        "design run finished"
    );
    Ok(result)
}
