//! V-engine cylinder block.

use super::mechanics::{annulus_area, clamped_plate_stress, thick_cylinder_hoop_stress};
use super::{geometry, record_material, resolve, ComponentModel, PhysicsOutputs};
use crate::constraint::ConstraintSpec;
use crate::design::ComponentKind;
use crate::error::{positive, ConfigError, EvaluationError};
use crate::load::LoadCase;
use crate::material::Material;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Two-bank block with wet liners, a flat deck and main-bearing bulkheads.
///
/// Mass counts cylinder walls, the deck plate spanning both banks and the
/// bulkheads; water jackets and oil galleries are voids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CylinderBlock {
    pub bore_mm: f64,
    pub stroke_mm: f64,
    pub bank_angle_deg: f64,
    pub cylinders: u32,
    pub bulkheads: u32,
    /// Minimum metal between neighbouring jacket envelopes.
    pub envelope_clearance_mm: f64,
    /// Allowed hoop stress as a fraction of yield.
    pub hoop_stress_factor: f64,
    pub deck_yield_fraction: f64,
    pub bulkhead_yield_fraction: f64,
    pub max_bearing_pressure_mpa: f64,
    pub mass_limit_kg: f64,
}

impl Default for CylinderBlock {
    fn default() -> Self {
        Self {
            bore_mm: 94.5,
            stroke_mm: 94.5,
            bank_angle_deg: 60.0,
            cylinders: 12,
            bulkheads: 7,
            envelope_clearance_mm: 10.0,
            hoop_stress_factor: 0.8,
            deck_yield_fraction: 1.0,
            bulkhead_yield_fraction: 0.8,
            max_bearing_pressure_mpa: 120.0,
            mass_limit_kg: 200.0,
        }
    }
}

impl CylinderBlock {
    pub fn with_hoop_stress_factor(mut self, factor: f64) -> Self {
        self.hoop_stress_factor = factor;
        self
    }

    /// Hoop stress allowed for a material of the given yield strength.
    pub fn hoop_stress_limit(&self, yield_strength_mpa: f64) -> f64 {
        self.hoop_stress_factor * yield_strength_mpa
    }

    pub fn deck_stress_limit(&self, yield_strength_mpa: f64) -> f64 {
        self.deck_yield_fraction * yield_strength_mpa
    }
}

impl ComponentModel for CylinderBlock {
    fn kind(&self) -> ComponentKind {
        ComponentKind::CylinderBlock
    }

    fn validate_inputs(&self, load: &LoadCase, _material: &Material) -> Result<(), ConfigError> {
        load.require("peak_pressure_mpa", load.peak_pressure_mpa)?;
        if self.cylinders < 2 || self.cylinders % 2 != 0 {
            return Err(ConfigError::InvalidParameter {
                field: "cylinders",
                message: format!(
                    "a two-bank block needs an even count, got {}",
                    self.cylinders
                ),
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
        let [spacing, deck, wall, jacket, brg_w, brg_h, skirt, pan_rail] = geometry(x)?;
        let deck = positive("deck_thickness", deck)?;
        let wall = positive("cylinder_wall_thickness", wall)?;
        let brg_w = positive("main_bearing_width", brg_w)?;
        let brg_h = positive("main_bearing_height", brg_h)?;
        let p = load.peak_pressure_mpa;
        let sy = props.yield_strength_mpa;

        let r_bore = self.bore_mm / 2.0;
        let r_wall = r_bore + wall;
        let r_jacket = r_wall + jacket;
        let envelope = 2.0 * r_jacket;
        let bank_offset = spacing * (self.bank_angle_deg.to_radians() / 2.0).sin();
        let height = deck + self.stroke_mm / 2.0 + skirt;
        let per_bank = f64::from(self.cylinders) / 2.0;

        // Mass
        let walls = annulus_area(r_wall, r_bore) * height * f64::from(self.cylinders);
        let deck_plate = (spacing * per_bank) * (bank_offset * 2.0) * deck;
        let bulkheads = brg_w * brg_h * spacing * f64::from(self.bulkheads);
        let volume = walls + deck_plate + bulkheads;

        // Stresses
        let hoop = thick_cylinder_hoop_stress(p, r_bore, r_wall);
        let deck_stress = clamped_plate_stress(p, r_bore, deck);
        let gas_force = p * PI * r_bore * r_bore;
        let bearing = gas_force / (brg_w * brg_h);
        let section_modulus = brg_w * brg_h * brg_h / 6.0;
        let bulkhead = gas_force * (self.stroke_mm / 2.0) / section_modulus;

        // Cell: one cylinder's share of block envelope vs its bore and jacket.
        let cell = spacing * bank_offset * height;
        let cavities = (PI * r_bore * r_bore + annulus_area(r_jacket, r_wall)) * height;

        let mut out = PhysicsOutputs::new(props.density_kg_mm3 * volume, volume);
        out.insert("hoop_stress_mpa", hoop);
        out.insert("hoop_stress_limit_mpa", self.hoop_stress_limit(sy));
        out.insert("hoop_stress_ratio", hoop / sy);
        out.insert("deck_stress_mpa", deck_stress);
        out.insert("deck_stress_limit_mpa", self.deck_stress_limit(sy));
        out.insert("deck_stress_ratio", deck_stress / sy);
        out.insert("bearing_pressure_mpa", bearing);
        out.insert("bulkhead_bending_mpa", bulkhead);
        out.insert("bulkhead_stress_ratio", bulkhead / sy);
        out.insert("bank_offset_mm", bank_offset);

        let clearance = self.envelope_clearance_mm;
        out.insert("bore_spacing_to_envelope", spacing / (envelope + clearance));
        out.insert(
            "bank_offset_to_envelope",
            bank_offset / (envelope / 2.0 + clearance),
        );
        out.insert("cell_metal_fraction", (cell - cavities) / cavities);
        out.insert("deck_thickness_mm", deck);
        out.insert("cylinder_wall_thickness_mm", wall);
        out.insert("water_jacket_thickness_mm", jacket);
        out.insert("main_bearing_width_mm", brg_w);
        out.insert("main_bearing_height_mm", brg_h);
        out.insert("skirt_depth_mm", skirt);
        out.insert("pan_rail_width_mm", pan_rail);

        record_material(&mut out, &props, rho);
        out.checked()
    }

    fn constraints(&self) -> Vec<ConstraintSpec> {
        vec![
            ConstraintSpec::at_most("hoop_stress_ratio", self.hoop_stress_factor),
            ConstraintSpec::at_most("deck_stress_ratio", self.deck_yield_fraction),
            ConstraintSpec::at_most("bearing_pressure_mpa", self.max_bearing_pressure_mpa),
            ConstraintSpec::at_most("bulkhead_stress_ratio", self.bulkhead_yield_fraction),
            ConstraintSpec::at_most("mass_kg", self.mass_limit_kg),
            ConstraintSpec::at_least("bore_spacing_to_envelope", 1.0).geometric(),
            ConstraintSpec::at_least("bank_offset_to_envelope", 1.0).geometric(),
            ConstraintSpec::at_least("cell_metal_fraction", 0.0).geometric(),
            ConstraintSpec::at_least("deck_thickness_mm", 5.0).geometric(),
            ConstraintSpec::at_least("cylinder_wall_thickness_mm", 3.0).geometric(),
            ConstraintSpec::at_least("water_jacket_thickness_mm", 2.0).geometric(),
            ConstraintSpec::at_least("main_bearing_width_mm", 10.0).geometric(),
            ConstraintSpec::at_least("main_bearing_height_mm", 15.0).geometric(),
            ConstraintSpec::at_least("skirt_depth_mm", 10.0).geometric(),
            ConstraintSpec::at_least("pan_rail_width_mm", 5.0).geometric(),
        ]
    }
}
