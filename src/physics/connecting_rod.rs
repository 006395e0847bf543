//! I-beam connecting rod.

use super::mechanics::{critical_buckling_stress, goodman_safety_factor};
use super::{geometry, record_material, require, resolve, ComponentModel, PhysicsOutputs};
use crate::constraint::ConstraintSpec;
use crate::design::ComponentKind;
use crate::error::{positive, ConfigError, EvaluationError};
use crate::load::LoadCase;
use crate::material::Material;
use serde::{Deserialize, Serialize};

/// Connecting rod with an I-beam shank between two plain bearings.
///
/// Buckling is checked out of the plane of motion (about the weak axis),
/// eccentric bending in plane. Fatigue uses a modified-Goodman line between
/// the peak compressive and tensile states.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectingRod {
    /// Big-end to small-end center distance.
    pub center_length_mm: f64,
    /// Crank pin diameter seen by the big-end bearing.
    pub big_end_diameter_mm: f64,
    pub min_buckling_safety_factor: f64,
    pub min_fatigue_safety_factor: f64,
    /// Allowed total stress as a fraction of effective yield.
    pub stress_yield_fraction: f64,
    pub max_bearing_pressure_mpa: f64,
    pub mass_limit_kg: f64,
}

impl Default for ConnectingRod {
    fn default() -> Self {
        Self {
            center_length_mm: 150.0,
            big_end_diameter_mm: 86.5,
            min_buckling_safety_factor: 1.2,
            min_fatigue_safety_factor: 1.2,
            stress_yield_fraction: 0.6,
            max_bearing_pressure_mpa: 200.0,
            mass_limit_kg: 2.0,
        }
    }
}

impl ConnectingRod {
    pub fn with_mass_limit(mut self, mass_limit_kg: f64) -> Self {
        self.mass_limit_kg = mass_limit_kg;
        self
    }
}

impl ComponentModel for ConnectingRod {
    fn kind(&self) -> ComponentKind {
        ComponentKind::ConnectingRod
    }

    fn validate_inputs(&self, load: &LoadCase, material: &Material) -> Result<(), ConfigError> {
        load.require("compressive_force_n", load.compressive_force_n)?;
        load.require("tensile_force_n", load.tensile_force_n)?;
        if !(load.eccentricity_mm.is_finite() && load.eccentricity_mm >= 0.0) {
            return Err(ConfigError::InvalidParameter {
                field: "eccentricity_mm",
                message: format!("must be non-negative, got {}", load.eccentricity_mm),
            });
        }
        material.require("fatigue_limit_mpa", material.fatigue_limit_mpa)?;
        Ok(())
    }

    fn evaluate(
        &self,
        values: &[f64],
        load: &LoadCase,
        material: &Material,
    ) -> Result<PhysicsOutputs, EvaluationError> {
        let (x, props, rho) = resolve(self.variable_names(), values, material)?;
        let [
            h,
            b,
            tw,
            tf,
            big_w,
            small_w,
            small_d,
            fillet_big,
            fillet_small,
        ] = geometry(x)?;
        let length = self.center_length_mm;
        let e = props.youngs_modulus_mpa;
        let sy = props.yield_strength_mpa;
        let se = require("fatigue_limit_mpa", props.fatigue_limit_mpa)?;

        // Section
        let web_h = h - 2.0 * tf;
        let area = positive("cross_section_area", 2.0 * b * tf + web_h * tw)?;
        let ix = positive(
            "second_moment_x",
            (b * h.powi(3) - (b - tw) * web_h.powi(3)) / 12.0,
        )?;
        let iy = positive(
            "second_moment_y",
            (2.0 * tf * b.powi(3) + web_h * tw.powi(3)) / 12.0,
        )?;
        let slenderness = length / (iy / area).sqrt();

        // Stresses
        let (fc, ft) = (load.compressive_force_n, load.tensile_force_n);
        let axial_comp = fc / area;
        let axial_tens = ft / area;
        let bending = fc * load.eccentricity_mm * (h / 2.0) / ix;
        let total_comp = axial_comp + bending;
        let total_tens = axial_tens + bending;

        let critical = critical_buckling_stress(slenderness, e, sy);
        let buckling_sf = critical / axial_comp;

        let mean = (total_comp + total_tens) / 2.0;
        let amplitude = (total_comp - total_tens).abs() / 2.0;
        let fatigue_sf = goodman_safety_factor(amplitude, mean, se, sy);

        let p_big = fc / (self.big_end_diameter_mm * big_w);
        let p_small = fc / (small_d * small_w);

        let volume = area * length;
        let mut out = PhysicsOutputs::new(props.density_kg_mm3 * volume, volume);
        out.insert("cross_section_area_mm2", area);
        out.insert("slenderness_ratio", slenderness);
        out.insert("axial_stress_comp_mpa", axial_comp);
        out.insert("axial_stress_tens_mpa", axial_tens);
        out.insert("bending_stress_mpa", bending);
        out.insert("total_stress_comp_mpa", total_comp);
        out.insert("total_stress_tens_mpa", total_tens);
        out.insert("compressive_stress_ratio", total_comp / sy);
        out.insert("tensile_stress_ratio", total_tens / sy);
        out.insert("buckling_critical_stress_mpa", critical);
        out.insert("buckling_safety_factor", buckling_sf);
        out.insert("fatigue_safety_factor", fatigue_sf);
        out.insert("bearing_pressure_big_mpa", p_big);
        out.insert("bearing_pressure_small_mpa", p_small);
        out.insert("bearing_pressure_max_mpa", p_big.max(p_small));

        // Geometry
        out.insert("web_clearance_mm", b - tw);
        out.insert("web_height_mm", web_h);
        out.insert("flange_to_height", tf / h);
        out.insert("width_to_height", b / h);
        out.insert("height_to_width", h / b);
        out.insert("min_wall_mm", tw.min(tf));
        out.insert("big_end_width_mm", big_w);
        out.insert("small_end_width_mm", small_w);
        out.insert("min_fillet_mm", fillet_big.min(fillet_small));

        record_material(&mut out, &props, rho);
        out.checked()
    }

    fn constraints(&self) -> Vec<ConstraintSpec> {
        vec![
            ConstraintSpec::at_least("buckling_safety_factor", self.min_buckling_safety_factor),
            ConstraintSpec::at_most("compressive_stress_ratio", self.stress_yield_fraction),
            ConstraintSpec::at_most("tensile_stress_ratio", self.stress_yield_fraction),
            ConstraintSpec::at_most("bearing_pressure_max_mpa", self.max_bearing_pressure_mpa),
            ConstraintSpec::at_least("fatigue_safety_factor", self.min_fatigue_safety_factor),
            ConstraintSpec::at_most("mass_kg", self.mass_limit_kg),
            ConstraintSpec::at_least("web_clearance_mm", 2.0).geometric(),
            ConstraintSpec::at_least("web_height_mm", 2.0).geometric(),
            ConstraintSpec::at_most("flange_to_height", 0.4).geometric(),
            ConstraintSpec::at_most("width_to_height", 3.0).geometric(),
            ConstraintSpec::at_most("height_to_width", 3.0).geometric(),
            ConstraintSpec::at_least("min_wall_mm", 1.5).geometric(),
            ConstraintSpec::at_least("big_end_width_mm", 5.0).geometric(),
            ConstraintSpec::at_least("small_end_width_mm", 5.0).geometric(),
            ConstraintSpec::at_least("min_fillet_mm", 0.5).geometric(),
        ]
    }
}
