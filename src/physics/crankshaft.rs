//! Multi-throw crankshaft.

use super::mechanics::{
    annulus_area, circle_area, circle_polar_moment, circle_second_moment,
    fillet_stress_concentration, torsional_natural_frequency, torsional_shear_stress,
};
use super::{geometry, record_material, require, resolve, ComponentModel, PhysicsOutputs};
use crate::constraint::ConstraintSpec;
use crate::design::ComponentKind;
use crate::error::{positive, ConfigError, EvaluationError};
use crate::load::LoadCase;
use crate::material::Material;
use serde::{Deserialize, Serialize};

const MPA_TO_PA: f64 = 1.0e6;
const MM4_TO_M4: f64 = 1.0e-12;
const MM_TO_M: f64 = 1.0e-3;

/// Crankshaft built from cylindrical journals, crank pins and annular-sector
/// cheeks.
///
/// Torque is shared evenly by the main journals. The pin fillet carries the
/// full rod force at the stroke radius. The torsional mode lumps the journal
/// line into one spring against the rotating inertia of the load case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Crankshaft {
    /// Half the engine stroke.
    pub stroke_radius_mm: f64,
    pub main_journals: u32,
    pub crank_pins: u32,
    pub cheeks: u32,
    /// Fraction of a full annulus occupied by one cheek.
    pub cheek_sector_factor: f64,
    /// Allowed journal shear as a fraction of shear yield.
    pub shear_yield_fraction: f64,
    /// Required ratio of first torsional frequency to firing order (rpm/60).
    pub frequency_margin: f64,
    pub mass_limit_kg: f64,
}

impl Default for Crankshaft {
    fn default() -> Self {
        Self {
            stroke_radius_mm: 47.5,
            main_journals: 7,
            crank_pins: 6,
            cheeks: 12,
            cheek_sector_factor: 0.33,
            shear_yield_fraction: 0.5,
            frequency_margin: 1.5,
            mass_limit_kg: 50.0,
        }
    }
}

impl ComponentModel for Crankshaft {
    fn kind(&self) -> ComponentKind {
        ComponentKind::Crankshaft
    }

    fn validate_inputs(&self, load: &LoadCase, material: &Material) -> Result<(), ConfigError> {
        load.require("torque_nm", load.torque_nm)?;
        load.require("compressive_force_n", load.compressive_force_n)?;
        load.require("rpm", load.rpm)?;
        load.require("rotating_inertia_kg_m2", load.rotating_inertia_kg_m2)?;
        material.require("shear_modulus_mpa", material.shear_modulus_mpa)?;
        material.require("shear_yield_mpa", material.shear_yield_mpa)?;
        material.require("fatigue_limit_mpa", material.fatigue_limit_mpa)?;
        if self.main_journals == 0 {
            return Err(ConfigError::InvalidParameter {
                field: "main_journals",
                message: "must be at least 1".into(),
            });
        }
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
            d_main,
            w_main,
            d_pin,
            w_pin,
            t_cheek,
            r_cheek,
            r_hole,
            fillet_main,
            fillet_pin,
        ] = geometry(x)?;
        let d_main = positive("main_journal_diameter", d_main)?;
        let d_pin = positive("pin_diameter", d_pin)?;
        let g = require("shear_modulus_mpa", props.shear_modulus_mpa)?;
        let tau_y = require("shear_yield_mpa", props.shear_yield_mpa)?;
        let se = require("fatigue_limit_mpa", props.fatigue_limit_mpa)?;
        let mains = f64::from(self.main_journals);

        // Volume
        let cheek_face = self.cheek_sector_factor * annulus_area(r_cheek, r_hole);
        let vol_main = circle_area(d_main) * w_main * mains;
        let vol_pin = circle_area(d_pin) * w_pin * f64::from(self.crank_pins);
        let vol_cheek = cheek_face * t_cheek * f64::from(self.cheeks);
        let volume = vol_main + vol_pin + vol_cheek;

        // Torsion through the mains
        let torque_per_main = load.torque_nm * 1000.0 / mains;
        let shear = torsional_shear_stress(torque_per_main, d_main);

        // Pin fillet bending
        let kt = fillet_stress_concentration(fillet_pin, d_pin);
        let moment = load.compressive_force_n * self.stroke_radius_mm;
        let bending = kt * moment * (d_pin / 2.0) / circle_second_moment(d_pin);

        // Torsional mode, SI
        let journal_line_m = positive("journal_line_length", w_main * mains)? * MM_TO_M;
        let stiffness = g * MPA_TO_PA * circle_polar_moment(d_main) * MM4_TO_M4 / journal_line_m;
        let frequency = torsional_natural_frequency(stiffness, load.rotating_inertia_kg_m2);
        let firing_hz = load.rpm / 60.0;

        let (r_main, r_pin) = (d_main / 2.0, d_pin / 2.0);
        let overlap = r_main + r_pin - self.stroke_radius_mm;

        let mut out = PhysicsOutputs::new(props.density_kg_mm3 * volume, volume);
        out.insert("shear_stress_mpa", shear);
        out.insert("shear_stress_ratio", shear / tau_y);
        out.insert("stress_concentration_factor", kt);
        out.insert("bending_stress_mpa", bending);
        out.insert("bending_fatigue_ratio", bending / se);
        out.insert("torsional_stiffness_nm_per_rad", stiffness);
        out.insert("natural_frequency_hz", frequency);
        out.insert("frequency_ratio", frequency / firing_hz);

        out.insert("cheek_wall_mm", r_cheek - r_hole);
        out.insert("cheek_volume_mm3", vol_cheek);
        out.insert("cheek_thickness_mm", t_cheek);
        out.insert("cheek_thickness_to_radius", t_cheek / r_cheek);
        out.insert("pin_width_to_diameter", w_pin / d_pin);
        out.insert("main_width_to_diameter", w_main / d_main);
        out.insert("min_fillet_mm", fillet_main.min(fillet_pin));
        out.insert("pin_envelope_mm", r_cheek - (self.stroke_radius_mm + r_pin));
        out.insert("journal_pin_overlap_mm", overlap);
        out.insert("journal_pin_overlap_margin_mm", r_main.min(r_pin) - overlap);

        record_material(&mut out, &props, rho);
        out.checked()
    }

    fn constraints(&self) -> Vec<ConstraintSpec> {
        vec![
            ConstraintSpec::at_most("shear_stress_ratio", self.shear_yield_fraction),
            ConstraintSpec::at_most("bending_fatigue_ratio", 1.0),
            ConstraintSpec::at_least("frequency_ratio", self.frequency_margin),
            ConstraintSpec::at_most("mass_kg", self.mass_limit_kg),
            ConstraintSpec::at_least("cheek_wall_mm", 5.0).geometric(),
            ConstraintSpec::at_least("cheek_volume_mm3", 0.0)
                .with_scale(1000.0)
                .geometric(),
            ConstraintSpec::at_least("cheek_thickness_mm", 5.0).geometric(),
            ConstraintSpec::at_least("cheek_thickness_to_radius", 0.1).geometric(),
            ConstraintSpec::at_least("pin_width_to_diameter", 0.3).geometric(),
            ConstraintSpec::at_least("main_width_to_diameter", 0.3).geometric(),
            ConstraintSpec::at_least("min_fillet_mm", 1.0).geometric(),
            ConstraintSpec::at_least("pin_envelope_mm", 5.0).geometric(),
            ConstraintSpec::at_least("journal_pin_overlap_margin_mm", 0.0)
                .with_scale(self.stroke_radius_mm)
                .geometric(),
        ]
    }
}
