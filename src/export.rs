//! Geometry export contract.
//!
//! The engine does not build CAD itself. A caller that can construct a solid
//! implements [`GeometryExporter`]; it receives the selected design as named
//! variables plus the physics outputs, and reports back what it built.
//! [`verify_volume`] compares the built solid with the analytical volume so
//! a mismatch between the model and the CAD script is caught early.

use crate::design::{ComponentKind, NamedValue};
use crate::error::ExportError;
use crate::physics::PhysicsOutputs;
use serde::Serialize;
use tracing::{info, warn};

/// A design handed to an exporter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeometryExport {
    pub component: ComponentKind,
    pub variables: Vec<NamedValue>,
    pub outputs: PhysicsOutputs,
}

impl GeometryExport {
    /// Value of a named variable.
    pub fn value(&self, name: &str) -> Result<f64, ExportError> {
        self.variables
            .iter()
            .find(|v| v.name == name)
            .map(|v| v.value)
            .ok_or_else(|| ExportError::MissingVariable(name.to_string()))
    }

    /// Analytical volume the exported solid should match.
    pub fn expected_volume_mm3(&self) -> f64 {
        self.outputs.volume_mm3
    }
}

/// What an exporter built.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExportReport {
    pub volume_mm3: f64,
    /// Axis-aligned extents `[x, y, z]`.
    pub bounding_box_mm: [f64; 3],
}

/// Builds geometry for a design, e.g. by driving a CAD kernel or writing a
/// STEP file.
pub trait GeometryExporter {
    fn export(&mut self, design: &GeometryExport) -> Result<ExportReport, ExportError>;
}

impl<F> GeometryExporter for F
where
    F: FnMut(&GeometryExport) -> Result<ExportReport, ExportError>,
{
    fn export(&mut self, design: &GeometryExport) -> Result<ExportReport, ExportError> {
        self(design)
    }
}

/// Agreement between the analytical and the exported volume.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VolumeCheck {
    pub expected_mm3: f64,
    pub exported_mm3: f64,
    /// `|exported − expected| / expected`; infinite when nothing was expected.
    pub relative_error: f64,
    pub within_tolerance: bool,
}

/// Compares an export report against the expected volume.
pub fn verify_volume(expected_mm3: f64, report: &ExportReport, rel_tol: f64) -> VolumeCheck {
    let exported_mm3 = report.volume_mm3;
    let relative_error = if expected_mm3 > 0.0 {
        (exported_mm3 - expected_mm3).abs() / expected_mm3
    } else if exported_mm3 == expected_mm3 {
        0.0
    } else {
        f64::INFINITY
    };
    VolumeCheck {
        expected_mm3,
        exported_mm3,
        relative_error,
        within_tolerance: relative_error <= rel_tol,
    }
}

/// Exports a design and checks its volume.
pub fn export_and_verify<E: GeometryExporter + ?Sized>(
    exporter: &mut E,
    design: &GeometryExport,
    rel_tol: f64,
) -> Result<(ExportReport, VolumeCheck), ExportError> {
    let report = exporter.export(design)?;
    let check = verify_volume(design.expected_volume_mm3(), &report, rel_tol);
    if check.within_tolerance {
        info!(
            component = %design.component,
            volume_mm3 = report.volume_mm3,
            "geometry exported"
        );
    } else {
        warn!(
            component = %design.component,
            expected_mm3 = check.expected_mm3,
            exported_mm3 = check.exported_mm3,
            relative_error = check.relative_error,
            "exported volume disagrees with the analytical model"
        );
    }
    Ok((report, check))
}
