//! Gibson–Ashby lattice scaling.
//!
//! A lattice infill of relative density `ρ_rel = ρ_eff / ρ_solid` scales the
//! parent material's properties by power laws. For bending-dominated cells:
//!
//! - density: `ρ_eff = ρ · ρ_rel`
//! - modulus: `E_eff = E · ρ_rel²`
//! - strength: `σ_eff = σ · ρ_rel^1.5` (yield, shear yield, fatigue limit)
//!
//! # References
//!
//! - Gibson & Ashby (1997), *Cellular Solids: Structure and Properties*, 2nd ed.
//! - Ashby (2006), "The properties of foams and lattices",
//!   *Phil. Trans. R. Soc. A* 364, 15–30

use super::MaterialProperties;
use serde::{Deserialize, Serialize};

/// Power-law exponents relating lattice relative density to effective
/// properties.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GibsonAshby {
    /// Exponent on relative density for effective density.
    pub density_exponent: f64,
    /// Exponent for Young's and shear modulus.
    pub modulus_exponent: f64,
    /// Exponent for yield strength, shear yield and fatigue limit.
    pub strength_exponent: f64,
}

impl Default for GibsonAshby {
    fn default() -> Self {
        Self::bending_dominated()
    }
}

impl GibsonAshby {
    /// Bending-dominated open cells (gyroid, BCC): `1`, `2`, `1.5`.
    pub fn bending_dominated() -> Self {
        Self {
            density_exponent: 1.0,
            modulus_exponent: 2.0,
            strength_exponent: 1.5,
        }
    }

    /// Stretch-dominated cells (octet truss): `1`, `1`, `1`.
    pub fn stretch_dominated() -> Self {
        Self {
            density_exponent: 1.0,
            modulus_exponent: 1.0,
            strength_exponent: 1.0,
        }
    }

    /// Wraps solid properties with an infill of the given relative density.
    pub fn infill(self, relative_density: f64) -> LatticeInfill {
        LatticeInfill {
            law: self,
            relative_density,
        }
    }
}

/// A lattice infill applied on top of a solid material.
///
/// This is a decorator: it never changes the base [`super::Material`], it
/// only maps resolved solid properties to effective ones.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatticeInfill {
    law: GibsonAshby,
    relative_density: f64,
}

impl LatticeInfill {
    /// Relative density of the infill.
    pub fn relative_density(&self) -> f64 {
        self.relative_density
    }

    /// Effective properties of the infilled material.
    pub fn apply(&self, solid: &MaterialProperties) -> MaterialProperties {
        let rho = self.relative_density;
        let density = rho.powf(self.law.density_exponent);
        let modulus = rho.powf(self.law.modulus_exponent);
        let strength = rho.powf(self.law.strength_exponent);

        MaterialProperties {
            density_kg_mm3: solid.density_kg_mm3 * density,
            yield_strength_mpa: solid.yield_strength_mpa * strength,
            youngs_modulus_mpa: solid.youngs_modulus_mpa * modulus,
            shear_modulus_mpa: solid.shear_modulus_mpa.map(|g| g * modulus),
            shear_yield_mpa: solid.shear_yield_mpa.map(|t| t * strength),
            fatigue_limit_mpa: solid.fatigue_limit_mpa.map(|s| s * strength),
        }
    }
}
