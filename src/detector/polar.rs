//! 2-D image detector on a hexapolar ring grid.

use log::debug;
use rayon::prelude::*;

use super::{active_triangles, Detector};
use crate::diagnostics::{DetectorReport, PolarReport, RadialProfile};
use crate::error::{Result, TransmissionError};
use crate::geometry::{hexapolar_sampling, point_in_triangle, HexapolarSampling};
use crate::mesh::MeshView;

const RADIUS_TOL: f64 = 1e-9;

#[derive(Clone, Copy, Debug)]
pub struct PolarDetectorParams {
    /// Radial size of the detector in image space.
    pub rmax: f64,
    /// Number of concentric rings.
    pub nrings: usize,
}

impl Default for PolarDetectorParams {
    fn default() -> Self {
        Self {
            rmax: 1.0,
            nrings: 100,
        }
    }
}

/// Same point-sampling accumulation rule as the rectangular detector, but
/// over hexapolar sample points, which makes the azimuthal average and the
/// encircled energy cheap to compute.
pub struct PolarImageDetector {
    params: PolarDetectorParams,
    sampling: HexapolarSampling,
    intensity: Vec<f64>,
}

impl PolarImageDetector {
    pub fn new(params: PolarDetectorParams) -> Self {
        let sampling = hexapolar_sampling(params.nrings, params.rmax);
        Self {
            intensity: vec![0.0; sampling.points.len()],
            sampling,
            params,
        }
    }

    pub fn params(&self) -> &PolarDetectorParams {
        &self.params
    }

    /// Azimuthal average per ring and cumulative encircled energy.
    ///
    /// Ring weights are fractions of the total detector area, so the
    /// encircled energy at the outermost ring is the total detected power.
    pub fn radial_projection(&self) -> Result<RadialProfile> {
        let nrings = self.params.nrings;
        let mut radii = Vec::with_capacity(nrings);
        let mut mean_intensity = Vec::with_capacity(nrings);
        let mut encircled_energy = Vec::with_capacity(nrings);
        let disc_area = std::f64::consts::PI * self.params.rmax * self.params.rmax;
        let mut offset = 0;
        let mut cumulative = 0.0;
        for (ring, &n) in self.sampling.points_per_ring.iter().enumerate() {
            let points = &self.sampling.points[offset..offset + n];
            let r0 = points[0].coords.norm();
            // construction invariant of the sampling grid
            if points
                .iter()
                .any(|p| (p.coords.norm() - r0).abs() > RADIUS_TOL * r0.max(1.0))
            {
                return Err(TransmissionError::RingRadiusMismatch { ring });
            }
            let mean = self.intensity[offset..offset + n].iter().sum::<f64>() / n as f64;
            cumulative += mean * self.sampling.ring_weights[ring] * disc_area;
            radii.push(r0);
            mean_intensity.push(mean);
            encircled_energy.push(cumulative);
            offset += n;
        }
        Ok(RadialProfile {
            radii,
            mean_intensity,
            encircled_energy,
        })
    }
}

impl Detector for PolarImageDetector {
    fn add(&mut self, mesh: &dyn MeshView, skip: &[bool], weight: f64) -> Result<()> {
        let triangles = active_triangles(mesh, skip, weight)?;
        let points = &self.sampling.points;
        self.intensity
            .par_iter_mut()
            .enumerate()
            .for_each(|(idx, v)| {
                let mut acc = 0.0;
                for (tri, density) in &triangles {
                    if point_in_triangle(&points[idx], tri) {
                        acc += density;
                    }
                }
                *v += acc;
            });
        Ok(())
    }

    fn report(&self) -> Result<DetectorReport> {
        let radial = self.radial_projection()?;
        let total_power = radial.encircled_energy.last().copied().unwrap_or(0.0);
        debug!("polar detector: total power = {total_power:.5} W");
        Ok(DetectorReport::Polar(PolarReport {
            x: self.sampling.points.iter().map(|p| p.x).collect(),
            y: self.sampling.points.iter().map(|p| p.y).collect(),
            intensity: self.intensity.clone(),
            radial,
            total_power,
        }))
    }
}
