use super::{ConstraintCategory, ConstraintSpec};
use crate::error::EvaluationError;
use crate::physics::PhysicsOutputs;
use serde::Serialize;

/// Violation assigned to every constraint of a candidate whose physics
/// evaluation failed, and to any constraint whose metric is missing.
pub const EVALUATION_FAILURE_VIOLATION: f64 = 1.0e9;

/// Maps physics outputs to a violation vector.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintEvaluator {
    specs: Vec<ConstraintSpec>,
}

impl ConstraintEvaluator {
    pub fn new(specs: Vec<ConstraintSpec>) -> Self {
        Self { specs }
    }

    pub fn specs(&self) -> &[ConstraintSpec] {
        &self.specs
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Scores outputs against every constraint.
    pub fn evaluate(&self, outputs: PhysicsOutputs) -> Evaluation {
        let violations: Vec<f64> = self
            .specs
            .iter()
            .map(|spec| match outputs.get(&spec.metric) {
                Some(value) => spec.violation(value),
                None => EVALUATION_FAILURE_VIOLATION,
            })
            .collect();
        Evaluation::from_violations(Some(outputs), violations, None)
    }

    /// Record for a candidate whose physics could not be evaluated.
    pub fn failed(&self, error: &EvaluationError) -> Evaluation {
        Evaluation::failed(&self.specs, error)
    }
}

/// Constraint outcome for one candidate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    /// Physics outputs; absent when evaluation failed.
    pub outputs: Option<PhysicsOutputs>,
    /// Signed normalized violations, aligned with the evaluator's specs.
    pub violations: Vec<f64>,
    /// Sum of the positive violations.
    pub total_violation: f64,
    /// True iff no violation is positive.
    pub feasible: bool,
    /// Why physics evaluation failed, if it did.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
}

impl Evaluation {
    fn from_violations(
        outputs: Option<PhysicsOutputs>,
        violations: Vec<f64>,
        failure: Option<String>,
    ) -> Self {
        let total_violation = violations.iter().filter(|v| **v > 0.0).sum();
        let feasible = failure.is_none() && violations.iter().all(|v| *v <= 0.0);
        Self {
            outputs,
            violations,
            total_violation,
            feasible,
            failure,
        }
    }

    /// Every constraint violated by [`EVALUATION_FAILURE_VIOLATION`].
    pub fn failed(specs: &[ConstraintSpec], error: &EvaluationError) -> Self {
        let violations = vec![EVALUATION_FAILURE_VIOLATION; specs.len().max(1)];
        Self::from_violations(None, violations, Some(error.to_string()))
    }

    pub fn mass_kg(&self) -> Option<f64> {
        self.outputs.as_ref().map(|o| o.mass_kg)
    }

    /// Named rows for reporting, one per spec.
    pub fn violation_report(&self, specs: &[ConstraintSpec]) -> Vec<ViolationRow> {
        specs
            .iter()
            .zip(&self.violations)
            .map(|(spec, &violation)| ViolationRow {
                constraint: spec.name.clone(),
                category: spec.category,
                value: self.outputs.as_ref().and_then(|o| o.get(&spec.metric)),
                limit: spec.limit,
                violation,
            })
            .collect()
    }

    /// Constraints with a positive violation.
    pub fn violated<'a>(&'a self, specs: &'a [ConstraintSpec]) -> impl Iterator<Item = &'a str> {
        specs
            .iter()
            .zip(&self.violations)
            .filter(|(_, v)| **v > 0.0)
            .map(|(spec, _)| spec.name.as_str())
    }
}

/// One line of a violation report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViolationRow {
    pub constraint: String,
    pub category: ConstraintCategory,
    pub value: Option<f64>,
    pub limit: f64,
    pub violation: f64,
}
