//! Engineering materials.
//!
//! A [`Material`] is an immutable record in catalogue units (kg/m³, MPa).
//! [`Material::properties`] resolves it once into model units (kg/mm³, MPa);
//! all physics formulas consume [`MaterialProperties`] only.
//!
//! Lattice infill is a decorator over the resolved properties, see
//! [`lattice`]. A material opts in by carrying a [`GibsonAshby`] law.

pub mod lattice;

pub use lattice::{GibsonAshby, LatticeInfill};

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

const KG_M3_TO_KG_MM3: f64 = 1.0e-9;

/// A solid engineering material, optionally printable as a lattice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub name: String,
    pub density_kg_m3: f64,
    pub yield_strength_mpa: f64,
    pub youngs_modulus_mpa: f64,
    #[serde(default)]
    pub shear_modulus_mpa: Option<f64>,
    #[serde(default)]
    pub shear_yield_mpa: Option<f64>,
    /// Fully reversed endurance limit.
    #[serde(default)]
    pub fatigue_limit_mpa: Option<f64>,
    /// Present when the part is built with a lattice infill.
    #[serde(default)]
    pub lattice: Option<GibsonAshby>,
}

/// Material properties in model units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialProperties {
    pub density_kg_mm3: f64,
    pub yield_strength_mpa: f64,
    pub youngs_modulus_mpa: f64,
    pub shear_modulus_mpa: Option<f64>,
    pub shear_yield_mpa: Option<f64>,
    pub fatigue_limit_mpa: Option<f64>,
}

impl Material {
    /// Creates a material with the three mandatory properties.
    pub fn new(
        name: impl Into<String>,
        density_kg_m3: f64,
        yield_strength_mpa: f64,
        youngs_modulus_mpa: f64,
    ) -> Self {
        Self {
            name: name.into(),
            density_kg_m3,
            yield_strength_mpa,
            youngs_modulus_mpa,
            shear_modulus_mpa: None,
            shear_yield_mpa: None,
            fatigue_limit_mpa: None,
            lattice: None,
        }
    }

    pub fn with_shear(mut self, modulus_mpa: f64, yield_mpa: f64) -> Self {
        self.shear_modulus_mpa = Some(modulus_mpa);
        self.shear_yield_mpa = Some(yield_mpa);
        self
    }

    pub fn with_fatigue_limit(mut self, limit_mpa: f64) -> Self {
        self.fatigue_limit_mpa = Some(limit_mpa);
        self
    }

    /// Builds parts from this material as a lattice infill.
    pub fn with_lattice(mut self, law: GibsonAshby) -> Self {
        self.lattice = Some(law);
        self
    }

    /// Builds parts from this material fully solid.
    pub fn solid(mut self) -> Self {
        self.lattice = None;
        self
    }

    /// 300M ultra-high-strength steel (forged or printed).
    pub fn steel_300m() -> Self {
        Self::new("300M steel", 7850.0, 1800.0, 210_000.0)
            .with_shear(79_300.0, 1000.0)
            .with_fatigue_limit(900.0)
    }

    /// 4340 forged steel.
    pub fn steel_4340() -> Self {
        Self::new("4340 steel", 7850.0, 800.0, 210_000.0)
            .with_shear(80_000.0, 460.0)
            .with_fatigue_limit(400.0)
    }

    /// Compacted graphite iron, grade 450.
    pub fn cgi_450() -> Self {
        Self::new("CGI-450", 7100.0, 450.0, 165_000.0).with_fatigue_limit(200.0)
    }

    /// Forged aluminum A356-T6.
    pub fn aluminum_a356_t6() -> Self {
        Self::new("A356-T6", 2700.0, 230.0, 71_000.0).with_fatigue_limit(90.0)
    }

    /// Billet aluminum 7075-T6.
    pub fn aluminum_7075_t6() -> Self {
        Self::new("7075-T6", 2810.0, 503.0, 71_700.0).with_fatigue_limit(160.0)
    }

    /// Rejects non-physical values. Does not check optional properties that
    /// no model has asked for; see [`Material::require`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        let checks = [
            ("density_kg_m3", self.density_kg_m3),
            ("yield_strength_mpa", self.yield_strength_mpa),
            ("youngs_modulus_mpa", self.youngs_modulus_mpa),
        ];
        for (property, value) in checks {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::InvalidMaterial {
                    material: self.name.clone(),
                    message: format!("`{property}` must be positive, got {value}"),
                });
            }
        }
        let optional = [
            ("shear_modulus_mpa", self.shear_modulus_mpa),
            ("shear_yield_mpa", self.shear_yield_mpa),
            ("fatigue_limit_mpa", self.fatigue_limit_mpa),
        ];
        for (property, value) in optional {
            if let Some(v) = value {
                if !(v.is_finite() && v > 0.0) {
                    return Err(ConfigError::InvalidMaterial {
                        material: self.name.clone(),
                        message: format!("`{property}` must be positive, got {v}"),
                    });
                }
            }
        }
        Ok(())
    }

    /// Returns the value of an optional property or a configuration error
    /// naming it.
    pub fn require(
        &self,
        property: &'static str,
        value: Option<f64>,
    ) -> Result<f64, ConfigError> {
        value.ok_or_else(|| ConfigError::MissingMaterialProperty {
            material: self.name.clone(),
            property,
        })
    }

    /// Solid properties in model units.
    pub fn properties(&self) -> MaterialProperties {
        MaterialProperties {
            density_kg_mm3: self.density_kg_m3 * KG_M3_TO_KG_MM3,
            yield_strength_mpa: self.yield_strength_mpa,
            youngs_modulus_mpa: self.youngs_modulus_mpa,
            shear_modulus_mpa: self.shear_modulus_mpa,
            shear_yield_mpa: self.shear_yield_mpa,
            fatigue_limit_mpa: self.fatigue_limit_mpa,
        }
    }

    /// Effective properties for a part with the given lattice relative
    /// density. Solid materials ignore the argument.
    pub fn effective_properties(&self, relative_density: Option<f64>) -> MaterialProperties {
        let solid = self.properties();
        match (self.lattice, relative_density) {
            (Some(law), Some(rho)) => law.infill(rho).apply(&solid),
            _ => solid,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_density_converted_once() {
        let props = Material::steel_300m().properties();
        assert!((props.density_kg_mm3 - 7.85e-6).abs() < 1e-15);
    }

    #[test]
    fn test_presets_validate() {
        for m in [
            Material::steel_300m(),
            Material::steel_4340(),
            Material::cgi_450(),
            Material::aluminum_a356_t6(),
            Material::aluminum_7075_t6(),
        ] {
            assert!(m.validate().is_ok(), "{} should validate", m.name);
        }
    }

    #[test]
    fn test_validate_rejects_zero_modulus() {
        let mut m = Material::cgi_450();
        m.youngs_modulus_mpa = 0.0;
        assert!(matches!(
            m.validate(),
            Err(ConfigError::InvalidMaterial { .. })
        ));
    }

    #[test]
    fn test_require_missing_property() {
        let m = Material::cgi_450();
        let err = m.require("shear_yield_mpa", m.shear_yield_mpa).unwrap_err();
        assert_eq!(
            err,
            ConfigError::MissingMaterialProperty {
                material: "CGI-450".into(),
                property: "shear_yield_mpa",
            }
        );
    }

    #[test]
    fn test_effective_properties_solid_ignores_density() {
        let m = Material::steel_4340();
        assert_eq!(m.effective_properties(Some(0.5)), m.properties());
    }

    #[test]
    fn test_effective_properties_lattice() {
        let m = Material::steel_4340().with_lattice(GibsonAshby::bending_dominated());
        let eff = m.effective_properties(Some(0.25));
        assert!((eff.youngs_modulus_mpa - 210_000.0 / 16.0).abs() < 1e-6);
        assert!((eff.yield_strength_mpa - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_serde_defaults() {
        let json = r#"{
            "name": "test",
            "density_kg_m3": 1000.0,
            "yield_strength_mpa": 100.0,
            "youngs_modulus_mpa": 1000.0
        }"#;
        let m: Material = serde_json::from_str(json).unwrap();
        assert!(m.lattice.is_none());
        assert!(m.fatigue_limit_mpa.is_none());
    }
}
