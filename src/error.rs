//! Error taxonomy.
//!
//! Configuration problems fail a run before the first generation is built.
//! Evaluation problems never leave a run: the offending candidate is scored
//! as maximally infeasible instead (see [`crate::constraint::Evaluation::failed`]).

use thiserror::Error;

/// A run could not be started because its configuration is invalid.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A variable's lower bound exceeds its upper bound.
    #[error("variable `{name}` has inverted bounds [{lower}, {upper}]")]
    InvertedBounds {
        name: String,
        lower: f64,
        upper: f64,
    },

    /// A bound is NaN or infinite.
    #[error("variable `{name}` has a non-finite bound")]
    NonFiniteBounds { name: String },

    /// A variable name was declared twice.
    #[error("variable `{0}` is declared more than once")]
    DuplicateVariable(String),

    /// A variable is not part of the component's ordered variable list.
    #[error("variable `{found}` at position {index} does not match expected `{expected}`")]
    UnexpectedVariable {
        index: usize,
        expected: String,
        found: String,
    },

    /// No variable with this name exists in the design space.
    #[error("unknown design variable `{0}`")]
    UnknownVariable(String),

    /// A vector has the wrong number of entries.
    #[error("expected {expected} design variables, got {found}")]
    VariableCountMismatch { expected: usize, found: usize },

    /// The material lacks a property the component model needs.
    #[error("material `{material}` is missing `{property}`")]
    MissingMaterialProperty {
        material: String,
        property: &'static str,
    },

    /// The material has a property outside its physical range.
    #[error("material `{material}`: {message}")]
    InvalidMaterial { material: String, message: String },

    /// The load case lacks a load the component model needs.
    #[error("load case `{load_case}` must define a positive `{load}`")]
    MissingLoad {
        load_case: String,
        load: &'static str,
    },

    /// A search-engine parameter is out of range.
    #[error("invalid parameter `{field}`: {message}")]
    InvalidParameter {
        field: &'static str,
        message: String,
    },
}

/// A physics formula could not produce a usable result for one candidate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvaluationError {
    /// A computed quantity is NaN or infinite.
    #[error("`{quantity}` evaluated to a non-finite value")]
    NonFinite { quantity: &'static str },

    /// A quantity used as a divisor (area, thickness, inertia) is not positive.
    #[error("`{quantity}` must be positive, got {value}")]
    NonPositive { quantity: &'static str, value: f64 },

    /// A material property or load the formula needs is absent.
    #[error("`{quantity}` is not available")]
    MissingInput { quantity: &'static str },

    /// A quantity lies outside its admissible interval.
    #[error("`{quantity}` is out of range: {value}")]
    OutOfRange { quantity: &'static str, value: f64 },

    /// The candidate vector does not match the model's variable count.
    #[error("model expects {expected} variables, got {found}")]
    Dimension { expected: usize, found: usize },
}

/// A geometry exporter rejected or failed to build a design.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExportError {
    /// The exporter could not construct a solid from the variables.
    #[error("geometry construction failed: {0}")]
    Construction(String),

    /// The exporter needs a variable that the design does not carry.
    #[error("design has no variable `{0}`")]
    MissingVariable(String),
}

/// Checks that `value` is finite, naming the quantity on failure.
pub(crate) fn finite(quantity: &'static str, value: f64) -> Result<f64, EvaluationError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(EvaluationError::NonFinite { quantity })
    }
}

/// Checks that `value` is finite and strictly positive.
pub(crate) fn positive(quantity: &'static str, value: f64) -> Result<f64, EvaluationError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(EvaluationError::NonPositive { quantity, value })
    }
}
