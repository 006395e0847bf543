//! Piston with a flat crown, twin pin bosses and a cylindrical skirt.

use super::mechanics::{annulus_area, circle_area, simply_supported_plate_stress};
use super::{geometry, record_material, resolve, ComponentModel, PhysicsOutputs};
use crate::constraint::ConstraintSpec;
use crate::design::ComponentKind;
use crate::error::{positive, ConfigError, EvaluationError};
use crate::load::LoadCase;
use crate::material::Material;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Piston {
    pub bore_mm: f64,
    /// Pin axis to crown top.
    pub compression_height_mm: f64,
    pub pin_diameter_mm: f64,
    /// Radial running clearance between skirt and bore.
    pub skirt_clearance_mm: f64,
    /// Boss height as a fraction of compression height.
    pub boss_height_fraction: f64,
    /// Allowed crown stress as a fraction of effective yield.
    pub crown_yield_fraction: f64,
    pub max_pin_bearing_mpa: f64,
    pub mass_limit_kg: f64,
}

impl Default for Piston {
    fn default() -> Self {
        Self {
            bore_mm: 94.5,
            compression_height_mm: 38.0,
            pin_diameter_mm: 28.0,
            skirt_clearance_mm: 0.5,
            boss_height_fraction: 0.6,
            crown_yield_fraction: 0.8,
            max_pin_bearing_mpa: 100.0,
            mass_limit_kg: 1.5,
        }
    }
}

impl ComponentModel for Piston {
    fn kind(&self) -> ComponentKind {
        ComponentKind::Piston
    }

    fn validate_inputs(&self, load: &LoadCase, _material: &Material) -> Result<(), ConfigError> {
        load.require("peak_pressure_mpa", load.peak_pressure_mpa)?;
        load.require("compressive_force_n", load.compressive_force_n)?;
        load.require("tensile_force_n", load.tensile_force_n)?;
        Ok(())
    }

    fn evaluate(
        &self,
        values: &[f64],
        load: &LoadCase,
        material: &Material,
    ) -> Result<PhysicsOutputs, EvaluationError> {
        let (x, props, rho) = resolve(self.variable_names(), values, material)?;
        let [t_crown, w_boss, skirt_len, t_skirt] = geometry(x)?;
        let t_crown = positive("crown_thickness", t_crown)?;
        let w_boss = positive("pin_boss_width", w_boss)?;
        let d_pin = self.pin_diameter_mm;
        let r_bore = self.bore_mm / 2.0;

        let crown = circle_area(self.bore_mm) * t_crown;
        let boss_h = self.compression_height_mm * self.boss_height_fraction;
        let bosses = 2.0 * boss_h * w_boss * (d_pin + 2.0 * w_boss);
        let r_skirt = r_bore - self.skirt_clearance_mm;
        let r_skirt_inner = r_skirt - t_skirt;
        let skirt = annulus_area(r_skirt, r_skirt_inner) * skirt_len;
        let volume = crown + bosses + skirt;

        let crown_stress = simply_supported_plate_stress(load.peak_pressure_mpa, r_bore, t_crown);
        let pin_area = 2.0 * d_pin * w_boss;
        let bearing_comp = load.compressive_force_n / pin_area;
        let bearing_tens = load.tensile_force_n / pin_area;

        let mut out = PhysicsOutputs::new(props.density_kg_mm3 * volume, volume);
        out.insert("crown_bending_mpa", crown_stress);
        let crown_ratio = crown_stress / props.yield_strength_mpa;
        out.insert("crown_stress_ratio", crown_ratio);
        out.insert("pin_bearing_comp_mpa", bearing_comp);
        out.insert("pin_bearing_tens_mpa", bearing_tens);
        out.insert("crown_volume_mm3", crown);
        out.insert("boss_volume_mm3", bosses);
        out.insert("skirt_volume_mm3", skirt);

        out.insert("crown_thickness_mm", t_crown);
        out.insert("boss_to_pin_diameter", w_boss / d_pin);
        out.insert("skirt_thickness_mm", t_skirt);
        out.insert("skirt_length_to_bore", skirt_len / self.bore_mm);
        out.insert("skirt_inner_radius_mm", r_skirt_inner);

        record_material(&mut out, &props, rho);
        out.checked()
    }

    fn constraints(&self) -> Vec<ConstraintSpec> {
        vec![
            ConstraintSpec::at_most("crown_stress_ratio", self.crown_yield_fraction),
            ConstraintSpec::at_most("pin_bearing_comp_mpa", self.max_pin_bearing_mpa),
            ConstraintSpec::at_most("pin_bearing_tens_mpa", self.max_pin_bearing_mpa),
            ConstraintSpec::at_most("mass_kg", self.mass_limit_kg),
            ConstraintSpec::at_least("crown_thickness_mm", 5.0).geometric(),
            ConstraintSpec::at_least("boss_to_pin_diameter", 0.3).geometric(),
            ConstraintSpec::at_least("skirt_thickness_mm", 2.0).geometric(),
            ConstraintSpec::at_most("skirt_length_to_bore", 0.8).geometric(),
            ConstraintSpec::at_least("skirt_inner_radius_mm", 0.0)
                .with_scale(self.bore_mm / 2.0)
                .geometric(),
        ]
    }
}
