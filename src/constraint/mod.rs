//! Constraint specifications and the normalized violation evaluator.
//!
//! Each [`ConstraintSpec`] names one metric of a [`PhysicsOutputs`] and a
//! bound on it. The evaluator turns outputs into a signed violation vector:
//! positive means violated, zero or negative means satisfied, and every
//! entry is divided by the constraint's scale so that a 10 % overshoot of a
//! stress limit weighs the same as a 10 % overshoot of a mass limit.
//!
//! [`PhysicsOutputs`]: crate::physics::PhysicsOutputs

mod evaluator;

pub use evaluator::{ConstraintEvaluator, Evaluation, ViolationRow, EVALUATION_FAILURE_VIOLATION};

use serde::{Deserialize, Serialize};

/// Direction of a bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintKind {
    /// `value ≤ limit`
    AtMost,
    /// `value ≥ limit`
    AtLeast,
}

/// Whether a constraint guards a physical failure mode or manufacturability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintCategory {
    Physics,
    Geometric,
}

/// A single bound on a named physics metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstraintSpec {
    /// Report name, e.g. `"buckling_safety_factor"`.
    pub name: String,
    /// Metric key looked up in the physics outputs.
    pub metric: String,
    pub kind: ConstraintKind,
    pub limit: f64,
    /// Normalization divisor, always positive.
    pub scale: f64,
    pub category: ConstraintCategory,
}

impl ConstraintSpec {
    fn new(
        name: &str,
        metric: &str,
        kind: ConstraintKind,
        limit: f64,
        category: ConstraintCategory,
    ) -> Self {
        let scale = if limit != 0.0 && limit.is_finite() {
            limit.abs()
        } else {
            1.0
        };
        Self {
            name: name.to_string(),
            metric: metric.to_string(),
            kind,
            limit,
            scale,
            category,
        }
    }

    /// Physics bound `metric ≤ limit`; the constraint is named after the metric.
    pub fn at_most(metric: &str, limit: f64) -> Self {
        Self::new(
            metric,
            metric,
            ConstraintKind::AtMost,
            limit,
            ConstraintCategory::Physics,
        )
    }

    /// Physics bound `metric ≥ limit`.
    pub fn at_least(metric: &str, limit: f64) -> Self {
        Self::new(
            metric,
            metric,
            ConstraintKind::AtLeast,
            limit,
            ConstraintCategory::Physics,
        )
    }

    /// Marks the constraint as geometric.
    pub fn geometric(mut self) -> Self {
        self.category = ConstraintCategory::Geometric;
        self
    }

    /// Renames the constraint while keeping its metric.
    pub fn named(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// Overrides the normalization divisor. Non-positive scales fall back to 1.
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = if scale > 0.0 && scale.is_finite() {
            scale
        } else {
            1.0
        };
        self
    }

    /// Signed normalized violation of `value` against this bound.
    pub fn violation(&self, value: f64) -> f64 {
        match self.kind {
            ConstraintKind::AtMost => (value - self.limit) / self.scale,
            ConstraintKind::AtLeast => (self.limit - value) / self.scale,
        }
    }
}
