//! Feasibility-first penalty fitness.

use crate::constraint::Evaluation;
use crate::ga::Fitness;
use serde::Serialize;
use std::cmp::Ordering;

/// Total order over candidates, best first:
///
/// 1. feasible candidates, by mass
/// 2. infeasible candidates, by total normalized violation
/// 3. candidates whose physics could not be evaluated, by recorded violation
///
/// A failed evaluation therefore ranks behind every scored candidate, no
/// matter how large that candidate's violation is. The order is total
/// (`f64::total_cmp`), so sorting and tournaments never see an incomparable
/// pair.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PenaltyFitness {
    Feasible { mass_kg: f64 },
    Infeasible { violation: f64 },
    Failed { violation: f64 },
}

impl PenaltyFitness {
    pub fn from_evaluation(evaluation: &Evaluation) -> Self {
        let violation = evaluation.total_violation;
        if evaluation.failure.is_some() {
            return PenaltyFitness::Failed { violation };
        }
        match evaluation.mass_kg() {
            Some(mass_kg) if evaluation.feasible => PenaltyFitness::Feasible { mass_kg },
            Some(_) => PenaltyFitness::Infeasible { violation },
            None => PenaltyFitness::Failed { violation },
        }
    }

    pub fn mass_kg(&self) -> Option<f64> {
        match self {
            PenaltyFitness::Feasible { mass_kg } => Some(*mass_kg),
            _ => None,
        }
    }

    fn class(&self) -> u8 {
        match self {
            PenaltyFitness::Feasible { .. } => 0,
            PenaltyFitness::Infeasible { .. } => 1,
            PenaltyFitness::Failed { .. } => 2,
        }
    }

    fn key(&self) -> f64 {
        match self {
            PenaltyFitness::Feasible { mass_kg } => *mass_kg,
            PenaltyFitness::Infeasible { violation } | PenaltyFitness::Failed { violation } => {
                *violation
            }
        }
    }
}

impl Ord for PenaltyFitness {
    fn cmp(&self, other: &Self) -> Ordering {
        self.class()
            .cmp(&other.class())
            .then_with(|| self.key().total_cmp(&other.key()))
    }
}

impl PartialOrd for PenaltyFitness {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for PenaltyFitness {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for PenaltyFitness {}

impl Fitness for PenaltyFitness {
    fn worst() -> Self {
        PenaltyFitness::Failed {
            violation: f64::INFINITY,
        }
    }

    /// Mass for feasible candidates, violation otherwise.
    fn to_f64(self) -> f64 {
        self.key()
    }

    fn is_feasible(&self) -> bool {
        matches!(self, PenaltyFitness::Feasible { .. })
    }
}
