//! Closed-form mechanics shared by the component models.
//!
//! Units are mm, N, MPa unless a function says otherwise.
//!
//! # References
//!
//! - Roark & Young (2011), *Roark's Formulas for Stress and Strain*, 8th ed.
//! - Shigley & Mischke (2014), *Mechanical Engineering Design*, 10th ed.

use std::f64::consts::PI;

/// Area of a solid circle of diameter `d`.
pub fn circle_area(d: f64) -> f64 {
    PI * d * d / 4.0
}

/// Area of an annulus between radii `inner` and `outer`.
pub fn annulus_area(outer: f64, inner: f64) -> f64 {
    PI * (outer * outer - inner * inner)
}

/// Second moment of area of a solid circle about a diameter.
pub fn circle_second_moment(d: f64) -> f64 {
    PI * d.powi(4) / 64.0
}

/// Polar moment of a solid circle.
pub fn circle_polar_moment(d: f64) -> f64 {
    PI * d.powi(4) / 32.0
}

/// Maximum torsional shear stress in a solid shaft, `16T/(πd³)`.
pub fn torsional_shear_stress(torque_nmm: f64, d: f64) -> f64 {
    16.0 * torque_nmm / (PI * d.powi(3))
}

/// Transition slenderness between Johnson and Euler columns,
/// `sqrt(2π²E/σy)`.
pub fn johnson_transition_slenderness(modulus: f64, yield_strength: f64) -> f64 {
    (2.0 * PI * PI * modulus / yield_strength).sqrt()
}

/// Critical buckling stress of a pinned column.
///
/// Euler `π²E/λ²` above the transition slenderness, Johnson parabola
/// `σy(1 − σy λ²/(4π²E))` below it.
pub fn critical_buckling_stress(slenderness: f64, modulus: f64, yield_strength: f64) -> f64 {
    let transition = johnson_transition_slenderness(modulus, yield_strength);
    if slenderness >= transition {
        PI * PI * modulus / (slenderness * slenderness)
    } else {
        yield_strength
            * (1.0 - yield_strength * slenderness * slenderness / (4.0 * PI * PI * modulus))
    }
}

/// Modified-Goodman safety factor `1/(σa/Se + σm/σy)`.
///
/// Returns infinity for a load with no alternating or mean component.
pub fn goodman_safety_factor(
    amplitude: f64,
    mean: f64,
    fatigue_limit: f64,
    yield_strength: f64,
) -> f64 {
    let damage = amplitude / fatigue_limit + mean / yield_strength;
    if damage > 0.0 {
        1.0 / damage
    } else {
        f64::INFINITY
    }
}

/// Lamé hoop stress at the bore of a thick cylinder under internal pressure.
pub fn thick_cylinder_hoop_stress(pressure: f64, inner_radius: f64, outer_radius: f64) -> f64 {
    let (ri2, ro2) = (inner_radius * inner_radius, outer_radius * outer_radius);
    pressure * (ri2 + ro2) / (ro2 - ri2)
}

/// Edge stress of a clamped circular plate under uniform pressure,
/// `0.75·p·(r/t)²`.
pub fn clamped_plate_stress(pressure: f64, radius: f64, thickness: f64) -> f64 {
    0.75 * pressure * (radius / thickness).powi(2)
}

/// Center stress of a simply supported circular plate, `3pr²/(4t²)`.
pub fn simply_supported_plate_stress(pressure: f64, radius: f64, thickness: f64) -> f64 {
    3.0 * pressure * radius * radius / (4.0 * thickness * thickness)
}

/// Shoulder-fillet stress concentration, `1 + 0.5·sqrt(r_f / (d/2))`.
pub fn fillet_stress_concentration(fillet: f64, d: f64) -> f64 {
    1.0 + 0.5 * (fillet / (d / 2.0)).sqrt()
}

/// First natural frequency of a single-degree torsional oscillator, Hz.
///
/// `stiffness` in N·m/rad, `inertia` in kg·m².
pub fn torsional_natural_frequency(stiffness: f64, inertia: f64) -> f64 {
    (stiffness / inertia).sqrt() / (2.0 * PI)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_euler_johnson_continuous_at_transition() {
        let (e, sy) = (210_000.0, 1800.0);
        let lc = johnson_transition_slenderness(e, sy);
        let below = critical_buckling_stress(lc - 1e-9, e, sy);
        let above = critical_buckling_stress(lc, e, sy);
        // Both branches give σy/2 at the transition.
        assert!((below - sy / 2.0).abs() < 1e-3);
        assert!((above - sy / 2.0).abs() < 1e-3);
    }

    #[test]
    fn test_johnson_short_column_approaches_yield() {
        let s = critical_buckling_stress(1.0, 210_000.0, 1800.0);
        assert!(s < 1800.0 && s > 1799.0);
    }

    #[test]
    fn test_euler_long_column() {
        let s = critical_buckling_stress(200.0, 210_000.0, 1800.0);
        assert!((s - PI * PI * 210_000.0 / 40_000.0).abs() < 1e-9);
    }

    #[test]
    fn test_goodman() {
        let sf = goodman_safety_factor(100.0, 200.0, 400.0, 800.0);
        assert!((sf - 2.0).abs() < 1e-12);
        assert_eq!(goodman_safety_factor(0.0, 0.0, 1.0, 1.0), f64::INFINITY);
    }

    #[test]
    fn test_hoop_thin_wall_limit() {
        // r/t large: hoop ≈ p·r/t.
        let hoop = thick_cylinder_hoop_stress(10.0, 1000.0, 1001.0);
        assert!((hoop / (10.0 * 1000.5) - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_shear_matches_polar_moment() {
        let (t, d) = (400_000.0, 70.0);
        let via_j = t * (d / 2.0) / circle_polar_moment(d);
        assert!((torsional_shear_stress(t, d) - via_j).abs() < 1e-9);
    }

    #[test]
    fn test_fillet_kt() {
        let kt = fillet_stress_concentration(2.5, 20.0);
        assert!((kt - 1.25).abs() < 1e-12);
    }

    #[test]
    fn test_areas() {
        assert!((circle_area(2.0) - PI).abs() < 1e-12);
        assert!((annulus_area(2.0, 1.0) - 3.0 * PI).abs() < 1e-12);
        assert!((circle_second_moment(2.0) - PI / 4.0).abs() < 1e-12);
    }
}
