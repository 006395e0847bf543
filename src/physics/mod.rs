//! Analytical physics models.
//!
//! Every component implements [`ComponentModel`]: a pure map from a variable
//! vector, a [`LoadCase`] and a [`Material`] to [`PhysicsOutputs`], plus the
//! list of [`ConstraintSpec`]s that judge those outputs. [`Component`] is the
//! tagged union the rest of the crate works with.
//!
//! All lengths are mm, forces N, stresses MPa. Strength constraints are
//! expressed as utilizations (`stress / allowable`) because the allowable
//! depends on the candidate's lattice density.

mod connecting_rod;
mod crankshaft;
mod cylinder_block;
pub mod mechanics;
mod piston;

pub use connecting_rod::ConnectingRod;
pub use crankshaft::Crankshaft;
pub use cylinder_block::CylinderBlock;
pub use piston::Piston;

use crate::constraint::ConstraintSpec;
use crate::design::ComponentKind;
use crate::error::{finite, positive, ConfigError, EvaluationError};
use crate::load::LoadCase;
use crate::material::{Material, MaterialProperties};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Mass, volume and named response metrics of one candidate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhysicsOutputs {
    pub mass_kg: f64,
    pub volume_mm3: f64,
    pub metrics: BTreeMap<&'static str, f64>,
}

impl PhysicsOutputs {
    pub fn new(mass_kg: f64, volume_mm3: f64) -> Self {
        Self {
            mass_kg,
            volume_mm3,
            metrics: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, metric: &'static str, value: f64) {
        self.metrics.insert(metric, value);
    }

    /// Looks up a metric. `mass_kg` and `volume_mm3` resolve to the fields.
    pub fn get(&self, metric: &str) -> Option<f64> {
        match metric {
            "mass_kg" => Some(self.mass_kg),
            "volume_mm3" => Some(self.volume_mm3),
            _ => self.metrics.get(metric).copied(),
        }
    }

    /// Fails on the first non-finite entry.
    fn checked(self) -> Result<Self, EvaluationError> {
        finite("mass_kg", self.mass_kg)?;
        finite("volume_mm3", self.volume_mm3)?;
        for (&name, &value) in &self.metrics {
            finite(name, value)?;
        }
        Ok(self)
    }
}

/// Capability shared by all component models.
pub trait ComponentModel {
    fn kind(&self) -> ComponentKind;

    /// Ordered geometric variables, without the lattice density.
    fn variable_names(&self) -> &'static [&'static str] {
        self.kind().variable_names()
    }

    /// Checks that the load case and material carry what the model reads.
    fn validate_inputs(&self, load: &LoadCase, material: &Material) -> Result<(), ConfigError>;

    /// Computes outputs for one candidate. Deterministic and side-effect free.
    fn evaluate(
        &self,
        values: &[f64],
        load: &LoadCase,
        material: &Material,
    ) -> Result<PhysicsOutputs, EvaluationError>;

    /// Physics and geometric constraints over this model's metrics.
    fn constraints(&self) -> Vec<ConstraintSpec>;
}

/// One analytical model per component family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "component", rename_all = "kebab-case")]
pub enum Component {
    Crankshaft(Crankshaft),
    ConnectingRod(ConnectingRod),
    Piston(Piston),
    CylinderBlock(CylinderBlock),
}

impl Component {
    /// The model with its documented fixed geometry and limits.
    pub fn for_kind(kind: ComponentKind) -> Self {
        match kind {
            ComponentKind::Crankshaft => Component::Crankshaft(Crankshaft::default()),
            ComponentKind::ConnectingRod => Component::ConnectingRod(ConnectingRod::default()),
            ComponentKind::Piston => Component::Piston(Piston::default()),
            ComponentKind::CylinderBlock => Component::CylinderBlock(CylinderBlock::default()),
        }
    }

    fn model(&self) -> &dyn ComponentModel {
        match self {
            Component::Crankshaft(m) => m,
            Component::ConnectingRod(m) => m,
            Component::Piston(m) => m,
            Component::CylinderBlock(m) => m,
        }
    }
}

impl ComponentModel for Component {
    fn kind(&self) -> ComponentKind {
        self.model().kind()
    }

    fn validate_inputs(&self, load: &LoadCase, material: &Material) -> Result<(), ConfigError> {
        self.model().validate_inputs(load, material)
    }

    fn evaluate(
        &self,
        values: &[f64],
        load: &LoadCase,
        material: &Material,
    ) -> Result<PhysicsOutputs, EvaluationError> {
        self.model().evaluate(values, load, material)
    }

    fn constraints(&self) -> Vec<ConstraintSpec> {
        self.model().constraints()
    }
}

/// Splits a candidate into its geometric values and the effective material.
///
/// When the material is a lattice, the last entry is the relative density
/// and must lie in `(0, 1]`.
fn resolve<'a>(
    names: &[&str],
    values: &'a [f64],
    material: &Material,
) -> Result<(&'a [f64], MaterialProperties, Option<f64>), EvaluationError> {
    let lattice = material.lattice.is_some();
    let expected = names.len() + usize::from(lattice);
    if values.len() != expected {
        return Err(EvaluationError::Dimension {
            expected,
            found: values.len(),
        });
    }
    let (geometry, rest) = values.split_at(names.len());
    let relative_density = match rest.first() {
        Some(&rho) => {
            let rho = positive("lattice_relative_density", rho)?;
            if rho > 1.0 {
                return Err(EvaluationError::OutOfRange {
                    quantity: "lattice_relative_density",
                    value: rho,
                });
            }
            Some(rho)
        }
        None => None,
    };
    for value in geometry {
        finite("design_variable", *value)?;
    }
    Ok((
        geometry,
        material.effective_properties(relative_density),
        relative_density,
    ))
}

/// Destructures the geometric part of a candidate.
fn geometry<const N: usize>(values: &[f64]) -> Result<[f64; N], EvaluationError> {
    values.try_into().map_err(|_| EvaluationError::Dimension {
        expected: N,
        found: values.len(),
    })
}

fn require(quantity: &'static str, value: Option<f64>) -> Result<f64, EvaluationError> {
    value.ok_or(EvaluationError::MissingInput { quantity })
}

/// Adds the lattice bookkeeping metrics shared by every model.
fn record_material(out: &mut PhysicsOutputs, props: &MaterialProperties, rho: Option<f64>) {
    out.insert("effective_yield_strength_mpa", props.yield_strength_mpa);
    out.insert("effective_modulus_mpa", props.youngs_modulus_mpa);
    if let Some(rho) = rho {
        out.insert("lattice_relative_density", rho);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::design::DesignSpace;
    use crate::random::create_rng;

    fn midpoint(space: &DesignSpace) -> Vec<f64> {
        space
            .variables()
            .iter()
            .map(|v| 0.5 * (v.lower + v.upper))
            .collect()
    }

    #[test]
    fn test_evaluate_is_pure() {
        for kind in ComponentKind::ALL {
            let space = DesignSpace::preset(kind);
            let model = Component::for_kind(kind);
            let mut rng = create_rng(11);
            for _ in 0..20 {
                let x = space.sample(&mut rng);
                let a = model.evaluate(&x, space.load_case(), space.material());
                let b = model.evaluate(&x, space.load_case(), space.material());
                assert_eq!(a, b, "{kind} must be deterministic");
            }
        }
    }

    #[test]
    fn test_midpoints_evaluate() {
        for kind in ComponentKind::ALL {
            let space = DesignSpace::preset(kind);
            let model = Component::for_kind(kind);
            let out = model
                .evaluate(&midpoint(&space), space.load_case(), space.material())
                .unwrap();
            assert!(out.mass_kg > 0.0, "{kind} mass should be positive");
            assert!(out.volume_mm3 > 0.0);
        }
    }

    #[test]
    fn test_constraint_metrics_exist() {
        for kind in ComponentKind::ALL {
            let space = DesignSpace::preset(kind);
            let model = Component::for_kind(kind);
            let out = model
                .evaluate(&midpoint(&space), space.load_case(), space.material())
                .unwrap();
            for spec in model.constraints() {
                assert!(
                    out.get(&spec.metric).is_some(),
                    "{kind}: metric `{}` missing",
                    spec.metric
                );
            }
        }
    }

    #[test]
    fn test_wrong_dimension_is_evaluation_error() {
        let space = DesignSpace::preset(ComponentKind::Piston);
        let model = Component::for_kind(ComponentKind::Piston);
        let err = model
            .evaluate(&[10.0, 20.0], space.load_case(), space.material())
            .unwrap_err();
        assert_eq!(
            err,
            EvaluationError::Dimension {
                expected: 5,
                found: 2
            }
        );
    }

    #[test]
    fn test_lattice_density_out_of_range() {
        let space = DesignSpace::preset(ComponentKind::ConnectingRod);
        let model = Component::for_kind(ComponentKind::ConnectingRod);
        let (load, material) = (space.load_case(), space.material());
        let mut x = midpoint(&space);
        *x.last_mut().unwrap() = 0.0;
        assert!(model.evaluate(&x, load, material).is_err());
        *x.last_mut().unwrap() = 1.5;
        assert!(model.evaluate(&x, load, material).is_err());
    }

    #[test]
    fn test_nan_input_rejected() {
        let space = DesignSpace::preset(ComponentKind::CylinderBlock);
        let model = Component::for_kind(ComponentKind::CylinderBlock);
        let mut x = midpoint(&space);
        x[1] = f64::NAN;
        assert!(matches!(
            model.evaluate(&x, space.load_case(), space.material()),
            Err(EvaluationError::NonFinite { .. })
        ));
    }

    #[test]
    fn test_presets_validate_inputs() {
        for kind in ComponentKind::ALL {
            let space = DesignSpace::preset(kind);
            let model = Component::for_kind(kind);
            assert!(model
                .validate_inputs(space.load_case(), space.material())
                .is_ok());
        }
    }

    #[test]
    fn test_component_serde_tag() {
        let json = r#"{ "component": "cylinder-block", "hoop_stress_factor": 0.7 }"#;
        let model: Component = serde_json::from_str(json).unwrap();
        assert_eq!(model.kind(), ComponentKind::CylinderBlock);
        match model {
            Component::CylinderBlock(block) => assert_eq!(block.hoop_stress_factor, 0.7),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_outputs_get_fields() {
        let mut out = PhysicsOutputs::new(1.5, 200.0);
        out.insert("hoop_stress_mpa", 12.0);
        assert_eq!(out.get("mass_kg"), Some(1.5));
        assert_eq!(out.get("volume_mm3"), Some(200.0));
        assert_eq!(out.get("hoop_stress_mpa"), Some(12.0));
        assert_eq!(out.get("nope"), None);
    }
}
