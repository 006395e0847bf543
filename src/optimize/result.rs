//! Picking the reported design and summarizing a run.

use super::problem::{Candidate, DesignProblem};
use crate::constraint::{ConstraintSpec, ViolationRow};
use crate::design::{ComponentKind, NamedValue};
use crate::export::GeometryExport;
use crate::ga::{GaResult, GenerationStats, Individual, Termination};
use serde::Serialize;

/// Position of the chosen candidate in a population, with the number of
/// feasible candidates seen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub index: usize,
    pub feasible_count: usize,
}

/// Picks the best candidate under the feasibility-first order.
///
/// With at least one feasible candidate this is the lightest feasible one;
/// otherwise it is the least-violating one. Ties keep the earliest index.
/// Returns `None` only for an empty population.
pub fn select(population: &[Candidate]) -> Option<Selection> {
    let feasible_count = population.iter().filter(|c| c.is_feasible()).count();
    population
        .iter()
        .enumerate()
        .reduce(|best, cur| {
            if cur.1.fitness() < best.1.fitness() {
                cur
            } else {
                best
            }
        })
        .map(|(index, _)| Selection {
            index,
            feasible_count,
        })
}

/// Outcome of one optimization run.
///
/// Having no feasible candidate is a valid outcome: `best` is then the
/// least-violating design and [`RunResult::is_feasible`] is false.
#[derive(Debug, Clone)]
pub struct RunResult {
    pub component: ComponentKind,
    pub material: String,
    pub load_case: String,
    pub best: Candidate,
    pub variables: Vec<NamedValue>,
    pub feasible_count: usize,
    pub population_size: usize,
    pub generations: usize,
    pub seed: u64,
    pub termination: Termination,
    pub stats: Vec<GenerationStats>,
    /// Terminal population, best first.
    pub population: Vec<Candidate>,
    pub specs: Vec<ConstraintSpec>,
}

impl RunResult {
    pub(crate) fn from_ga(problem: &DesignProblem, ga: GaResult<Candidate>) -> Self {
        let space = problem.space();
        let selection = select(&ga.population).unwrap_or_default();
        let best = ga
            .population
            .get(selection.index)
            .cloned()
            .unwrap_or(ga.best);
        Self {
            component: space.component(),
            material: space.material().name.clone(),
            load_case: space.load_case().name.clone(),
            variables: space.named_values(best.values()),
            best,
            feasible_count: selection.feasible_count,
            population_size: ga.population.len(),
            generations: ga.generations,
            seed: ga.seed,
            termination: ga.termination,
            stats: ga.stats,
            population: ga.population,
            specs: problem.specs().to_vec(),
        }
    }

    pub fn best_mass_kg(&self) -> Option<f64> {
        self.best.mass_kg()
    }

    pub fn is_feasible(&self) -> bool {
        self.best.is_feasible()
    }

    pub fn total_violation(&self) -> f64 {
        self.best
            .evaluation()
            .map_or(f64::INFINITY, |e| e.total_violation)
    }

    /// Per-constraint rows for the selected design.
    pub fn violation_report(&self) -> Vec<ViolationRow> {
        self.best
            .evaluation()
            .map(|e| e.violation_report(&self.specs))
            .unwrap_or_default()
    }

    /// Names of the constraints the selected design violates.
    pub fn violated(&self) -> Vec<String> {
        self.best
            .evaluation()
            .map(|e| e.violated(&self.specs).map(String::from).collect())
            .unwrap_or_default()
    }

    /// Geometry handed to an exporter. `None` when the selected design has
    /// no physics outputs, i.e. its evaluation failed.
    pub fn geometry_export(&self) -> Option<GeometryExport> {
        let outputs = self.best.evaluation()?.outputs.clone()?;
        Some(GeometryExport {
            component: self.component,
            variables: self.variables.clone(),
            outputs,
        })
    }

    pub fn summary(&self) -> RunSummary {
        let evaluation = self.best.evaluation();
        RunSummary {
            component: self.component,
            material: self.material.clone(),
            load_case: self.load_case.clone(),
            best_mass_kg: self.best_mass_kg(),
            feasible: self.is_feasible(),
            total_violation: self.total_violation(),
            feasible_count: self.feasible_count,
            population_size: self.population_size,
            generations: self.generations,
            seed: self.seed,
            termination: self.termination,
            variables: self.variables.clone(),
            constraints: self.violation_report(),
            failure: evaluation.and_then(|e| e.failure.clone()),
            history: self.stats.clone(),
        }
    }
}

/// Serializable report of a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub component: ComponentKind,
    pub material: String,
    pub load_case: String,
    /// Mass of the selected design; absent if its evaluation failed.
    pub best_mass_kg: Option<f64>,
    pub feasible: bool,
    pub total_violation: f64,
    pub feasible_count: usize,
    pub population_size: usize,
    pub generations: usize,
    pub seed: u64,
    pub termination: Termination,
    pub variables: Vec<NamedValue>,
    pub constraints: Vec<ViolationRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
    pub history: Vec<GenerationStats>,
}

impl RunSummary {
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
