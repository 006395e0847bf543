//! Operating-mode load cases.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Applied loads for one operating mode.
///
/// Shared read-only by every candidate of a run. Loads a component does not
/// use may be left at zero; each physics model checks the ones it needs via
/// [`LoadCase::require`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadCase {
    pub name: String,
    /// Peak gas-load force along the rod, N.
    pub compressive_force_n: f64,
    /// Peak inertia force pulling the rod, N.
    pub tensile_force_n: f64,
    /// Peak crankshaft torque, N·m.
    pub torque_nm: f64,
    /// Peak cylinder pressure, MPa.
    pub peak_pressure_mpa: f64,
    /// Redline speed, rev/min.
    pub rpm: f64,
    /// Load-line misalignment at the rod, mm.
    pub eccentricity_mm: f64,
    /// Rotating inertia lumped at the crank nose, kg·m².
    pub rotating_inertia_kg_m2: f64,
}

impl Default for LoadCase {
    fn default() -> Self {
        Self::overdrive()
    }
}

impl LoadCase {
    /// 250 bar overdrive mode at 8.5 krpm.
    pub fn overdrive() -> Self {
        Self {
            name: "overdrive".into(),
            compressive_force_n: 180_000.0,
            tensile_force_n: 83_000.0,
            torque_nm: 2800.0,
            peak_pressure_mpa: 25.0,
            rpm: 8500.0,
            eccentricity_mm: 0.5,
            rotating_inertia_kg_m2: 0.1,
        }
    }

    /// 300 bar overdrive at 11 krpm for a 94.5 mm bore.
    ///
    /// Rod force follows from pressure times bore area; torque scales
    /// linearly from the 250 bar case.
    pub fn overdrive_30mpa() -> Self {
        let base = Self::overdrive();
        let pressure = 30.0;
        let bore_area = PI * (94.5f64 / 2.0).powi(2);
        Self {
            name: "overdrive-30mpa".into(),
            compressive_force_n: pressure * bore_area,
            torque_nm: base.torque_nm * pressure / base.peak_pressure_mpa,
            peak_pressure_mpa: pressure,
            rpm: 11_000.0,
            ..base
        }
    }

    /// Checks that every load is finite and non-negative.
    ///
    /// Zero is allowed here; a model that needs a load rejects zero through
    /// [`LoadCase::require`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        let loads = [
            ("compressive_force_n", self.compressive_force_n),
            ("tensile_force_n", self.tensile_force_n),
            ("torque_nm", self.torque_nm),
            ("peak_pressure_mpa", self.peak_pressure_mpa),
            ("rpm", self.rpm),
            ("eccentricity_mm", self.eccentricity_mm),
            ("rotating_inertia_kg_m2", self.rotating_inertia_kg_m2),
        ];
        for (field, value) in loads {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::InvalidParameter {
                    field,
                    message: format!(
                        "load case `{}` needs a finite non-negative value, got {value}",
                        self.name
                    ),
                });
            }
        }
        Ok(())
    }

    /// Returns `value` if it is a positive finite load.
    pub fn require(&self, load: &'static str, value: f64) -> Result<f64, ConfigError> {
        if value.is_finite() && value > 0.0 {
            Ok(value)
        } else {
            Err(ConfigError::MissingLoad {
                load_case: self.name.clone(),
                load,
            })
        }
    }
}
