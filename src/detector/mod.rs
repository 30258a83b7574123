//! Detector family: stateful accumulators consuming a triangulated, mapped
//! mesh.
//!
//! Each variant owns an immutable sampling grid created at construction and
//! an intensity buffer that is only ever added to. `add` calls are
//! commutative and associative per triangle, so the order in which
//! parameters or detectors are processed never changes the accumulated
//! values.

mod check;
mod line;
mod polar;
mod rect;

pub use check::CheckTriangulationDetector;
pub use line::{LineDetectorParams, LineImageDetector};
pub use polar::{PolarDetectorParams, PolarImageDetector};
pub use rect::{RectDetectorParams, RectImageDetector};

use crate::diagnostics::DetectorReport;
use crate::error::{Result, TransmissionError};
use crate::mesh::{density, MeshView};
use crate::types::Point2;

/// Accumulating observer of per-parameter transmission results.
pub trait Detector {
    /// Fold one refined mesh into the detector. Triangles flagged by `skip`
    /// and triangles with non-finite density contribute nothing; everything
    /// else is weighted by `weight`. Repeated calls sum, never reset.
    fn add(&mut self, mesh: &dyn MeshView, skip: &[bool], weight: f64) -> Result<()>;

    /// Structured snapshot of the accumulated state.
    fn report(&self) -> Result<DetectorReport>;
}

pub(crate) fn check_skip_mask(mesh: &dyn MeshView, skip: &[bool]) -> Result<()> {
    let expected = mesh.triangle_count();
    if skip.len() != expected {
        return Err(TransmissionError::SkipMaskMismatch {
            expected,
            got: skip.len(),
        });
    }
    Ok(())
}

/// Image-space triangles that actually contribute: not skipped, finite
/// density, finite vertices. Paired with their density.
pub(crate) fn active_triangles(
    mesh: &dyn MeshView,
    skip: &[bool],
    weight: f64,
) -> Result<Vec<([Point2; 3], f64)>> {
    check_skip_mask(mesh, skip)?;
    let density = density(mesh, weight);
    let mut active = Vec::with_capacity(mesh.triangle_count());
    for (s, simplex) in mesh.simplices().iter().enumerate() {
        if skip[s] || !density[s].is_finite() {
            continue;
        }
        let tri = mesh.image_triangle(simplex);
        if tri.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
            continue;
        }
        active.push((tri, density[s]));
    }
    Ok(active)
}
