//! 1-D image detector along an arbitrary segment.
//!
//! Unlike the 2-D detectors this one does not point-sample: every triangle
//! is projected analytically onto the detector axis, so the accumulated
//! profile integrates to exactly the projected triangle area times density.

use log::debug;

use super::{active_triangles, Detector};
use crate::diagnostics::{DetectorReport, LineReport};
use crate::error::{Result, TransmissionError};
use crate::geometry::LineBasis;
use crate::mesh::MeshView;
use crate::types::Point2;

#[derive(Clone, Copy, Debug)]
pub struct LineDetectorParams {
    /// Number of sample columns along the segment.
    pub pixels: usize,
    pub start: Point2,
    pub end: Point2,
}

impl Default for LineDetectorParams {
    fn default() -> Self {
        Self {
            pixels: 50,
            start: Point2::new(0.0, 0.0),
            end: Point2::new(1.0, 0.0),
        }
    }
}

pub struct LineImageDetector {
    params: LineDetectorParams,
    basis: LineBasis,
    /// Arclength position of every column, `j * length / pixels`.
    positions: Vec<f64>,
    intensity: Vec<f64>,
}

impl LineImageDetector {
    pub fn new(params: LineDetectorParams) -> Result<Self> {
        let basis = LineBasis::from_segment(params.start, params.end)?;
        let step = basis.length() / params.pixels as f64;
        Ok(Self {
            positions: (0..params.pixels).map(|j| j as f64 * step).collect(),
            intensity: vec![0.0; params.pixels],
            basis,
            params,
        })
    }

    pub fn params(&self) -> &LineDetectorParams {
        &self.params
    }

    fn column_spacing(&self) -> f64 {
        self.basis.length() / self.params.pixels as f64
    }

    /// Sample the projected-width profile of one triangle given in local
    /// line coordinates, scaled by `density`, into `out`.
    ///
    /// Vertices are sorted by `x` into `A` (min), `B` (max) and `C`; the
    /// `A→B` baseline is flattened, leaving the apex at height `h`, and the
    /// piecewise-linear width is interpolated along `A–C` then `C–B`.
    fn project_triangle(
        positions: &[f64],
        local: &[(f64, f64); 3],
        density: f64,
        out: &mut [f64],
    ) -> Result<()> {
        let mut order = [0usize, 1, 2];
        order.sort_by(|&i, &j| local[i].0.total_cmp(&local[j].0));
        let (ax, ay) = local[order[0]];
        let (cx, cy) = local[order[1]];
        let (bx, by) = local[order[2]];
        if bx <= ax {
            // no x extent: the triangle projects onto a single column edge
            return Ok(());
        }
        let h = ((cy - ay) - (by - ay) * ((cx - ax) / (bx - ax))).abs();
        for (column, (&x, out)) in positions.iter().zip(out.iter_mut()).enumerate() {
            let height = if x >= ax && x < cx {
                (x - ax) * h / (cx - ax)
            } else if x >= cx && x <= bx {
                if bx > cx {
                    (x - bx) * h / (cx - bx)
                } else {
                    0.0
                }
            } else {
                0.0
            };
            if height < 0.0 {
                return Err(TransmissionError::NegativeProjectedHeight { column, height });
            }
            *out += density * height;
        }
        Ok(())
    }
}

impl Detector for LineImageDetector {
    fn add(&mut self, mesh: &dyn MeshView, skip: &[bool], weight: f64) -> Result<()> {
        let triangles = active_triangles(mesh, skip, weight)?;
        // accumulate into a scratch buffer so a failed invariant check
        // leaves the detector untouched
        let mut contribution = vec![0.0; self.positions.len()];
        for (tri, density) in &triangles {
            let local = [
                self.basis.to_local(&tri[0]),
                self.basis.to_local(&tri[1]),
                self.basis.to_local(&tri[2]),
            ];
            Self::project_triangle(&self.positions, &local, *density, &mut contribution)?;
        }
        for (v, c) in self.intensity.iter_mut().zip(&contribution) {
            *v += c;
        }
        Ok(())
    }

    fn report(&self) -> Result<DetectorReport> {
        let total_power = self.intensity.iter().sum::<f64>() * self.column_spacing();
        debug!("line detector: total power = {total_power:.5} W");
        Ok(DetectorReport::Line(LineReport {
            positions: self.positions.clone(),
            intensity: self.intensity.clone(),
            total_power,
        }))
    }
}
