//! Triangulation completeness check: validates the mesh instead of
//! accumulating intensity.

use log::info;

use super::{check_skip_mask, Detector};
use crate::diagnostics::{DetectorReport, TriangulationReport};
use crate::error::{Result, TransmissionError};
use crate::mesh::MeshView;

/// Reports, per `add` call, how much power the triangulation itself loses:
/// boundary approximation, unresolved invalid triangles and skipped broken
/// triangles. Carries no cumulative state; each call is an independent
/// diagnostic.
pub struct CheckTriangulationDetector {
    ref_domain_area: f64,
    latest: Option<TriangulationReport>,
}

impl CheckTriangulationDetector {
    /// Check against the area of the unit disc, the usual pupil domain.
    pub fn new() -> Self {
        Self::with_ref_area(std::f64::consts::PI)
    }

    /// Check against an arbitrary theoretical domain area.
    pub fn with_ref_area(ref_domain_area: f64) -> Self {
        Self {
            ref_domain_area,
            latest: None,
        }
    }

    /// Latest loss estimate, if `add` has run at least once.
    pub fn latest(&self) -> Option<&TriangulationReport> {
        self.latest.as_ref()
    }
}

impl Default for CheckTriangulationDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector for CheckTriangulationDetector {
    fn add(&mut self, mesh: &dyn MeshView, skip: &[bool], _weight: f64) -> Result<()> {
        check_skip_mask(mesh, skip)?;
        let areas = mesh.domain_areas(None);
        // active triangles must be counter-clockwise in domain space
        for (index, (&area, &skipped)) in areas.iter().zip(skip).enumerate() {
            if !skipped && area < 0.0 {
                return Err(TransmissionError::NegativeDomainArea { index, area });
            }
        }

        let initial = mesh.initial_domain_area();
        let boundary_loss = 1.0 - initial / self.ref_domain_area;
        let covered: f64 = areas.iter().map(|a| a.abs()).sum();
        let invalid_loss = 1.0 - covered / initial;
        let skip_loss = skip.iter().any(|&b| b).then(|| {
            areas
                .iter()
                .zip(skip)
                .filter_map(|(&a, &b)| b.then_some(a))
                .sum::<f64>()
                / initial
        });

        info!(
            "triangulation losses: {:.3}% boundary, {:.3}% invalid, {:.3}% skipped",
            boundary_loss * 100.0,
            invalid_loss * 100.0,
            skip_loss.unwrap_or(0.0) * 100.0,
        );
        self.latest = Some(TriangulationReport {
            boundary_loss,
            invalid_loss,
            skip_loss,
        });
        Ok(())
    }

    fn report(&self) -> Result<DetectorReport> {
        Ok(DetectorReport::Check {
            latest: self.latest.clone(),
        })
    }
}
