//! Design-space descriptor.
//!
//! A [`DesignSpace`] fixes, for one run, which component is being designed,
//! the ordered bounded variables, the [`LoadCase`] and the [`Material`].
//! Construction validates everything up front: a bad descriptor is a
//! configuration error, never a runtime surprise.
//!
//! The variable order per component is canonical ([`ComponentKind::variable_names`]);
//! physics models read candidate vectors in that order. When the material
//! carries a lattice law, [`LATTICE_VARIABLE`] is appended last.

mod presets;

use crate::error::ConfigError;
use crate::load::LoadCase;
use crate::material::Material;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Name of the lattice relative-density variable.
pub const LATTICE_VARIABLE: &str = "lattice_relative_density";

/// The component families the engine can design.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComponentKind {
    Crankshaft,
    ConnectingRod,
    Piston,
    CylinderBlock,
}

impl ComponentKind {
    pub const ALL: [ComponentKind; 4] = [
        ComponentKind::Crankshaft,
        ComponentKind::ConnectingRod,
        ComponentKind::Piston,
        ComponentKind::CylinderBlock,
    ];

    /// Canonical variable order, excluding the lattice variable.
    pub fn variable_names(self) -> &'static [&'static str] {
        match self {
            ComponentKind::Crankshaft => &[
                "main_journal_diameter",
                "main_journal_width",
                "pin_diameter",
                "pin_width",
                "cheek_thickness",
                "cheek_radius",
                "cheek_hole_radius",
                "fillet_main",
                "fillet_pin",
            ],
            ComponentKind::ConnectingRod => &[
                "beam_height",
                "beam_width",
                "web_thickness",
                "flange_thickness",
                "big_end_width",
                "small_end_width",
                "small_end_diameter",
                "fillet_big",
                "fillet_small",
            ],
            ComponentKind::Piston => &[
                "crown_thickness",
                "pin_boss_width",
                "skirt_length",
                "skirt_thickness",
            ],
            ComponentKind::CylinderBlock => &[
                "bore_spacing",
                "deck_thickness",
                "cylinder_wall_thickness",
                "water_jacket_thickness",
                "main_bearing_width",
                "main_bearing_height",
                "skirt_depth",
                "pan_rail_width",
            ],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ComponentKind::Crankshaft => "crankshaft",
            ComponentKind::ConnectingRod => "connecting-rod",
            ComponentKind::Piston => "piston",
            ComponentKind::CylinderBlock => "cylinder-block",
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComponentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ComponentKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| format!("unknown component `{s}`"))
    }
}

/// A named scalar with a closed interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignVariable {
    pub name: String,
    pub lower: f64,
    pub upper: f64,
    /// Display unit ("mm", "-").
    #[serde(default = "default_unit")]
    pub unit: String,
}

fn default_unit() -> String {
    "mm".into()
}

impl DesignVariable {
    /// Creates a variable, rejecting inverted or non-finite bounds.
    pub fn new(name: impl Into<String>, lower: f64, upper: f64) -> Result<Self, ConfigError> {
        let var = Self {
            name: name.into(),
            lower,
            upper,
            unit: default_unit(),
        };
        var.validate()?;
        Ok(var)
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::InvalidParameter {
                field: "name",
                message: "design variable name must not be empty".into(),
            });
        }
        if !(self.lower.is_finite() && self.upper.is_finite()) {
            return Err(ConfigError::NonFiniteBounds {
                name: self.name.clone(),
            });
        }
        if self.lower > self.upper {
            return Err(ConfigError::InvertedBounds {
                name: self.name.clone(),
                lower: self.lower,
                upper: self.upper,
            });
        }
        Ok(())
    }

    pub fn range(&self) -> f64 {
        self.upper - self.lower
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.lower, self.upper)
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }

    /// Uniform sample from the interval.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> f64 {
        if self.range() > 0.0 {
            rng.random_range(self.lower..=self.upper)
        } else {
            self.lower
        }
    }
}

/// A variable value with its name and unit, as handed to reports and
/// geometry exporters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedValue {
    pub name: String,
    pub value: f64,
    pub unit: String,
}

/// A validated design space for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct DesignSpace {
    component: ComponentKind,
    variables: Vec<DesignVariable>,
    load_case: LoadCase,
    material: Material,
}

impl DesignSpace {
    /// Validates and assembles a design space.
    ///
    /// # Errors
    ///
    /// - inverted or non-finite bounds
    /// - duplicate variable names
    /// - variables that differ in count or order from the component's
    ///   canonical list (plus [`LATTICE_VARIABLE`] iff the material is a lattice)
    /// - a lattice variable with bounds outside `(0, 1]`
    /// - a non-finite or negative load
    /// - a non-physical material
    pub fn new(
        component: ComponentKind,
        variables: Vec<DesignVariable>,
        load_case: LoadCase,
        material: Material,
    ) -> Result<Self, ConfigError> {
        let space = Self {
            component,
            variables,
            load_case,
            material,
        };
        space.validate()?;
        Ok(space)
    }

    /// The documented bounds, load case and material for a component.
    pub fn preset(component: ComponentKind) -> Self {
        presets::preset(component)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for var in &self.variables {
            var.validate()?;
            if !seen.insert(var.name.as_str()) {
                return Err(ConfigError::DuplicateVariable(var.name.clone()));
            }
        }

        let expected = self.expected_names();
        if expected.len() != self.variables.len() {
            return Err(ConfigError::VariableCountMismatch {
                expected: expected.len(),
                found: self.variables.len(),
            });
        }
        for (index, (want, var)) in expected.iter().zip(&self.variables).enumerate() {
            if *want != var.name {
                return Err(ConfigError::UnexpectedVariable {
                    index,
                    expected: (*want).to_string(),
                    found: var.name.clone(),
                });
            }
        }

        if let Some(lattice) = self.lattice_variable() {
            if lattice.lower <= 0.0 || lattice.upper > 1.0 {
                return Err(ConfigError::InvalidParameter {
                    field: "lattice_relative_density",
                    message: format!(
                        "bounds [{}, {}] must lie within (0, 1]",
                        lattice.lower, lattice.upper
                    ),
                });
            }
        }

        self.load_case.validate()?;
        self.material.validate()
    }

    fn expected_names(&self) -> Vec<&'static str> {
        let mut names = self.component.variable_names().to_vec();
        if self.material.lattice.is_some() {
            names.push(LATTICE_VARIABLE);
        }
        names
    }

    /// Replaces one variable's bounds.
    pub fn with_bounds(mut self, name: &str, lower: f64, upper: f64) -> Result<Self, ConfigError> {
        let var = self
            .variables
            .iter_mut()
            .find(|v| v.name == name)
            .ok_or_else(|| ConfigError::UnknownVariable(name.to_string()))?;
        var.lower = lower;
        var.upper = upper;
        self.validate()?;
        Ok(self)
    }

    /// Replaces the load case, rejecting non-finite or negative loads.
    pub fn with_load_case(mut self, load_case: LoadCase) -> Result<Self, ConfigError> {
        load_case.validate()?;
        self.load_case = load_case;
        Ok(self)
    }

    /// Swaps the material, adding or removing the lattice variable so the
    /// variable list stays consistent with it.
    pub fn with_material(mut self, material: Material) -> Result<Self, ConfigError> {
        let had_lattice = self.material.lattice.is_some();
        let has_lattice = material.lattice.is_some();
        if had_lattice && !has_lattice {
            self.variables.retain(|v| v.name != LATTICE_VARIABLE);
        } else if !had_lattice && has_lattice {
            self.variables.push(presets::lattice_variable(0.2, 1.0));
        }
        self.material = material;
        self.validate()?;
        Ok(self)
    }

    pub fn component(&self) -> ComponentKind {
        self.component
    }

    pub fn variables(&self) -> &[DesignVariable] {
        &self.variables
    }

    pub fn load_case(&self) -> &LoadCase {
        &self.load_case
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn dimension(&self) -> usize {
        self.variables.len()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.variables.iter().map(|v| v.name.as_str())
    }

    /// `(lower, upper)` per variable, in order.
    pub fn bounds(&self) -> Vec<(f64, f64)> {
        self.variables.iter().map(|v| (v.lower, v.upper)).collect()
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.variables.iter().position(|v| v.name == name)
    }

    pub fn lattice_variable(&self) -> Option<&DesignVariable> {
        self.variables.iter().find(|v| v.name == LATTICE_VARIABLE)
    }

    /// Checks that a vector has the right length.
    pub fn check_len(&self, values: &[f64]) -> Result<(), ConfigError> {
        if values.len() == self.variables.len() {
            Ok(())
        } else {
            Err(ConfigError::VariableCountMismatch {
                expected: self.variables.len(),
                found: values.len(),
            })
        }
    }

    /// Clamps every value into its interval.
    pub fn clamp(&self, values: &mut [f64]) {
        for (v, var) in values.iter_mut().zip(&self.variables) {
            *v = var.clamp(*v);
        }
    }

    pub fn contains(&self, values: &[f64]) -> bool {
        values.len() == self.variables.len()
            && values
                .iter()
                .zip(&self.variables)
                .all(|(v, var)| var.contains(*v))
    }

    /// Pairs each value with its variable.
    pub fn named_values(&self, values: &[f64]) -> Vec<NamedValue> {
        self.variables
            .iter()
            .zip(values)
            .map(|(var, &value)| NamedValue {
                name: var.name.clone(),
                value,
                unit: var.unit.clone(),
            })
            .collect()
    }

    /// A uniform random vector within bounds.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> Vec<f64> {
        self.variables.iter().map(|var| var.sample(rng)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::GibsonAshby;
    use crate::random::create_rng;

    #[test]
    fn test_variable_rejects_inverted_bounds() {
        let err = DesignVariable::new("deck_thickness", 40.0, 5.0).unwrap_err();
        assert!(matches!(err, ConfigError::InvertedBounds { .. }));
    }

    #[test]
    fn test_variable_rejects_nan() {
        assert!(matches!(
            DesignVariable::new("x", f64::NAN, 1.0),
            Err(ConfigError::NonFiniteBounds { .. })
        ));
    }

    #[test]
    fn test_variable_rejects_empty_name() {
        assert!(matches!(
            DesignVariable::new(" ", 0.0, 1.0),
            Err(ConfigError::InvalidParameter { field: "name", .. })
        ));
    }

    #[test]
    fn test_degenerate_interval_allowed() {
        let var = DesignVariable::new("x", 3.0, 3.0).unwrap();
        let mut rng = create_rng(1);
        assert_eq!(var.sample(&mut rng), 3.0);
    }

    #[test]
    fn test_presets_are_valid() {
        for kind in ComponentKind::ALL {
            let space = DesignSpace::preset(kind);
            assert!(space.validate().is_ok(), "{kind} preset should validate");
            assert_eq!(space.component(), kind);
        }
    }

    #[test]
    fn test_conrod_preset_has_lattice_last() {
        let space = DesignSpace::preset(ComponentKind::ConnectingRod);
        assert_eq!(space.dimension(), 10);
        assert_eq!(space.variables().last().unwrap().name, LATTICE_VARIABLE);
        let lattice = space.lattice_variable().unwrap();
        assert_eq!((lattice.lower, lattice.upper), (0.5, 1.0));
    }

    #[test]
    fn test_with_bounds_inverted_rejected() {
        let space = DesignSpace::preset(ComponentKind::CylinderBlock);
        let err = space.with_bounds("deck_thickness", 40.0, 5.0).unwrap_err();
        assert!(matches!(err, ConfigError::InvertedBounds { .. }));
    }

    #[test]
    fn test_with_bounds_unknown() {
        let space = DesignSpace::preset(ComponentKind::Piston);
        assert_eq!(
            space.with_bounds("bore", 1.0, 2.0).unwrap_err(),
            ConfigError::UnknownVariable("bore".into())
        );
    }

    #[test]
    fn test_with_load_case_validates() {
        let space = DesignSpace::preset(ComponentKind::Crankshaft);
        let bad = LoadCase {
            torque_nm: f64::NAN,
            ..LoadCase::overdrive()
        };
        assert!(matches!(
            space.clone().with_load_case(bad),
            Err(ConfigError::InvalidParameter {
                field: "torque_nm",
                ..
            })
        ));

        let negative = LoadCase {
            rpm: -8500.0,
            ..LoadCase::overdrive()
        };
        assert!(space.clone().with_load_case(negative).is_err());

        let space = space.with_load_case(LoadCase::overdrive_30mpa()).unwrap();
        assert_eq!(space.load_case().name, "overdrive-30mpa");
    }

    #[test]
    fn test_new_rejects_bad_load_case() {
        let space = DesignSpace::preset(ComponentKind::Piston);
        let load = LoadCase {
            peak_pressure_mpa: -25.0,
            ..LoadCase::overdrive()
        };
        let err = DesignSpace::new(
            ComponentKind::Piston,
            space.variables().to_vec(),
            load,
            space.material().clone(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidParameter {
                field: "peak_pressure_mpa",
                ..
            }
        ));
    }

    #[test]
    fn test_wrong_count_rejected() {
        let space = DesignSpace::preset(ComponentKind::Piston);
        let mut vars = space.variables().to_vec();
        vars.pop();
        let err = DesignSpace::new(
            ComponentKind::Piston,
            vars,
            space.load_case().clone(),
            space.material().clone(),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::VariableCountMismatch { .. }));
    }

    #[test]
    fn test_wrong_order_rejected() {
        let space = DesignSpace::preset(ComponentKind::Crankshaft);
        let mut vars = space.variables().to_vec();
        vars.swap(0, 1);
        let err = DesignSpace::new(
            ComponentKind::Crankshaft,
            vars,
            space.load_case().clone(),
            space.material().clone(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::UnexpectedVariable { index: 0, .. }
        ));
    }

    #[test]
    fn test_duplicate_rejected() {
        let space = DesignSpace::preset(ComponentKind::Crankshaft);
        let mut vars = space.variables().to_vec();
        vars[1] = vars[0].clone();
        let err = DesignSpace::new(
            ComponentKind::Crankshaft,
            vars,
            space.load_case().clone(),
            space.material().clone(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            ConfigError::DuplicateVariable("main_journal_diameter".into())
        );
    }

    #[test]
    fn test_lattice_bounds_out_of_unit_interval() {
        let space = DesignSpace::preset(ComponentKind::ConnectingRod);
        assert!(space.with_bounds(LATTICE_VARIABLE, 0.0, 1.0).is_err());
        let space = DesignSpace::preset(ComponentKind::ConnectingRod);
        assert!(space.with_bounds(LATTICE_VARIABLE, 0.5, 1.2).is_err());
    }

    #[test]
    fn test_with_material_toggles_lattice_variable() {
        let space = DesignSpace::preset(ComponentKind::CylinderBlock);
        assert!(space.lattice_variable().is_none());
        let lattice = Material::aluminum_7075_t6().with_lattice(GibsonAshby::default());
        let space = space.with_material(lattice).unwrap();
        assert_eq!(space.dimension(), 9);
        assert!(space.lattice_variable().is_some());

        let space = space.with_material(Material::cgi_450()).unwrap();
        assert_eq!(space.dimension(), 8);
    }

    #[test]
    fn test_sample_and_clamp() {
        let space = DesignSpace::preset(ComponentKind::CylinderBlock);
        let mut rng = create_rng(3);
        for _ in 0..100 {
            assert!(space.contains(&space.sample(&mut rng)));
        }
        let mut v = vec![1e6; space.dimension()];
        space.clamp(&mut v);
        assert!(space.contains(&v));
        assert_eq!(v[0], 350.0);
        assert_eq!(space.bounds()[0], (100.0, 350.0));
    }

    #[test]
    fn test_named_values_follow_order() {
        let space = DesignSpace::preset(ComponentKind::Piston);
        let named = space.named_values(&[10.0, 20.0, 30.0, 4.0, 0.8]);
        assert_eq!(named.len(), 5);
        assert_eq!(named[0].name, "crown_thickness");
        assert_eq!(named[0].unit, "mm");
        assert_eq!(named[4].name, LATTICE_VARIABLE);
        assert_eq!(named[4].value, 0.8);
    }

    #[test]
    fn test_component_kind_parse() {
        for kind in ComponentKind::ALL {
            assert_eq!(kind.as_str().parse::<ComponentKind>().unwrap(), kind);
        }
        assert!("camshaft".parse::<ComponentKind>().is_err());
    }
}
