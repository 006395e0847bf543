//! Documented design spaces per component.

use super::{ComponentKind, DesignSpace, DesignVariable, LATTICE_VARIABLE};
use crate::load::LoadCase;
use crate::material::{GibsonAshby, Material};

pub(super) fn lattice_variable(lower: f64, upper: f64) -> DesignVariable {
    DesignVariable {
        name: LATTICE_VARIABLE.to_string(),
        lower,
        upper,
        unit: "-".into(),
    }
}

fn mm(table: &[(&str, f64, f64)]) -> Vec<DesignVariable> {
    table
        .iter()
        .map(|&(name, lower, upper)| DesignVariable {
            name: name.to_string(),
            lower,
            upper,
            unit: "mm".into(),
        })
        .collect()
}

pub(super) fn preset(component: ComponentKind) -> DesignSpace {
    let load_case = LoadCase::overdrive();
    let (variables, material) = match component {
        ComponentKind::ConnectingRod => {
            let mut vars = mm(&[
                ("beam_height", 25.0, 200.0),
                ("beam_width", 15.0, 150.0),
                ("web_thickness", 3.0, 50.0),
                ("flange_thickness", 2.0, 35.0),
                ("big_end_width", 25.0, 200.0),
                ("small_end_width", 15.0, 200.0),
                ("small_end_diameter", 25.0, 120.0),
                ("fillet_big", 1.0, 30.0),
                ("fillet_small", 0.5, 25.0),
            ]);
            vars.push(lattice_variable(0.5, 1.0));
            let material = Material::steel_300m().with_lattice(GibsonAshby::bending_dominated());
            (vars, material)
        }
        ComponentKind::Crankshaft => {
            let vars = mm(&[
                ("main_journal_diameter", 70.0, 100.0),
                ("main_journal_width", 25.0, 45.0),
                ("pin_diameter", 60.0, 90.0),
                ("pin_width", 25.0, 45.0),
                ("cheek_thickness", 15.0, 35.0),
                ("cheek_radius", 80.0, 130.0),
                ("cheek_hole_radius", 30.0, 70.0),
                ("fillet_main", 2.0, 8.0),
                ("fillet_pin", 2.0, 8.0),
            ]);
            (vars, Material::steel_300m())
        }
        ComponentKind::Piston => {
            let mut vars = mm(&[
                ("crown_thickness", 8.0, 35.0),
                ("pin_boss_width", 10.0, 60.0),
                ("skirt_length", 30.0, 100.0),
                ("skirt_thickness", 2.0, 15.0),
            ]);
            vars.push(lattice_variable(0.6, 1.0));
            let material = Material::steel_4340().with_lattice(GibsonAshby::bending_dominated());
            (vars, material)
        }
        ComponentKind::CylinderBlock => {
            let vars = mm(&[
                ("bore_spacing", 100.0, 350.0),
                ("deck_thickness", 5.0, 40.0),
                ("cylinder_wall_thickness", 3.0, 15.0),
                ("water_jacket_thickness", 2.0, 12.0),
                ("main_bearing_width", 20.0, 100.0),
                ("main_bearing_height", 30.0, 150.0),
                ("skirt_depth", 40.0, 200.0),
                ("pan_rail_width", 8.0, 40.0),
            ]);
            (vars, Material::cgi_450())
        }
    };

    DesignSpace {
        component,
        variables,
        load_case,
        material,
    }
}
