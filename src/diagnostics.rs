//! Structured diagnostics returned by the orchestrator and the detectors.
//!
//! Nothing in the core depends on an ambient reporting sink: everything the
//! run produces — refinement traces, footprints, projections, encircled
//! energy — is a plain serializable value. Log lines emitted along the way
//! duplicate these values for convenience only.

use serde::{Deserialize, Serialize};

/// Loss estimate produced by the triangulation completeness check, one per
/// `add` call.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriangulationReport {
    /// Power lost to the polygonal approximation of the domain boundary.
    pub boundary_loss: f64,
    /// Residual loss from triangles that stayed invalid after refinement.
    pub invalid_loss: f64,
    /// Power carried by skipped (broken) triangles, present only when the
    /// skip mask marks at least one triangle.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_loss: Option<f64>,
}

/// Cartesian footprint of a rectangular detector. Intensity is stored
/// row-major with the x index outermost: `intensity[ix * ny + iy]`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Footprint {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub intensity: Vec<f64>,
}

/// 1-D intensity profile along one axis.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub positions: Vec<f64>,
    pub values: Vec<f64>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RectReport {
    pub footprint: Footprint,
    pub x_profile: Profile,
    pub y_profile: Profile,
    /// `sum(intensity) * dx * dy`.
    pub total_power: f64,
}

/// Azimuthal average over a hexapolar detector.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadialProfile {
    pub radii: Vec<f64>,
    pub mean_intensity: Vec<f64>,
    /// Cumulative power out to each ring; the last entry is the total
    /// detected power.
    pub encircled_energy: Vec<f64>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolarReport {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub intensity: Vec<f64>,
    pub radial: RadialProfile,
    pub total_power: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineReport {
    /// Arclength positions of the sample columns, measured from the start
    /// of the segment.
    pub positions: Vec<f64>,
    pub intensity: Vec<f64>,
    /// `sum(intensity) * dx`.
    pub total_power: f64,
}

/// Snapshot of one detector's accumulated state.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DetectorReport {
    /// Latest completeness-check result, absent before the first `add`.
    Check {
        #[serde(skip_serializing_if = "Option::is_none")]
        latest: Option<TriangulationReport>,
    },
    Rect(RectReport),
    Polar(PolarReport),
    Line(LineReport),
}

/// Refinement record for a single parameter set.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterTrace {
    pub parameter: Vec<f64>,
    /// Subdivisions spent repairing invalid triangles.
    pub invalid_subdivisions: usize,
    /// Newly created triangles per convergence round.
    pub new_triangles: Vec<usize>,
    /// False when the safety bound stopped the loop before a round came
    /// back empty.
    pub converged: bool,
    /// Triangle count of the converged mesh.
    pub triangles: usize,
    /// Triangles excluded from detector contributions by the final mask.
    pub skipped: usize,
}

/// Full record of one `total_transmission` run.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransmissionReport {
    pub parameters: Vec<ParameterTrace>,
}

impl TransmissionReport {
    /// True when every parameter's refinement loop terminated on its own.
    pub fn converged(&self) -> bool {
        self.parameters.iter().all(|p| p.converged)
    }
}
