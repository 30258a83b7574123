//! 2-D image detector on a cartesian pixel grid.

use log::debug;
use rayon::prelude::*;

use super::{active_triangles, Detector};
use crate::diagnostics::{DetectorReport, Footprint, Profile, RectReport};
use crate::error::Result;
use crate::geometry::point_in_triangle;
use crate::mesh::MeshView;
use crate::types::Point2;

/// Optional pixel mask: pixels where the predicate returns `true` are zeroed
/// out of footprints and projections.
pub type PixelMask<'a> = &'a dyn Fn(f64, f64) -> bool;

#[derive(Clone, Copy, Debug)]
pub struct RectDetectorParams {
    /// Detector size in image space `(width, height)`.
    pub extent: (f64, f64),
    /// Pixel counts `(nx, ny)`.
    pub pixels: (usize, usize),
    /// Center position of the detector in image space.
    pub origin: (f64, f64),
}

impl Default for RectDetectorParams {
    fn default() -> Self {
        Self {
            extent: (1.0, 1.0),
            pixels: (100, 100),
            origin: (0.0, 0.0),
        }
    }
}

/// Accumulates per-triangle density on every pixel whose center lies inside
/// the image-space triangle.
///
/// This is deliberately a point-sampling rule, not exact area-weighted
/// rasterization: a pixel straddling a triangle edge receives either the
/// full density or nothing, depending on where its center falls.
///
/// Intensity is stored with `ij` indexing, x outermost:
/// `intensity[ix * ny + iy]`.
pub struct RectImageDetector {
    params: RectDetectorParams,
    xaxis: Vec<f64>,
    yaxis: Vec<f64>,
    intensity: Vec<f64>,
}

impl RectImageDetector {
    pub fn new(params: RectDetectorParams) -> Self {
        let (nx, ny) = params.pixels;
        // centers of the nx (ny) pixels between the nx+1 (ny+1) bin edges
        let centers = |n: usize, half: f64, c0: f64| -> Vec<f64> {
            let step = 2.0 * half / n as f64;
            (0..n).map(|i| c0 - half + (i as f64 + 0.5) * step).collect()
        };
        Self {
            xaxis: centers(nx, params.extent.0 / 2.0, params.origin.0),
            yaxis: centers(ny, params.extent.1 / 2.0, params.origin.1),
            intensity: vec![0.0; nx * ny],
            params,
        }
    }

    pub fn params(&self) -> &RectDetectorParams {
        &self.params
    }

    fn pixel_area(&self) -> (f64, f64) {
        let (nx, ny) = self.params.pixels;
        (
            self.params.extent.0 / nx as f64,
            self.params.extent.1 / ny as f64,
        )
    }

    /// Accumulated 2-D intensity with masked pixels zeroed.
    pub fn footprint(&self, mask: Option<PixelMask<'_>>) -> Footprint {
        let ny = self.params.pixels.1;
        let mut intensity = self.intensity.clone();
        if let Some(mask) = mask {
            for (idx, v) in intensity.iter_mut().enumerate() {
                if mask(self.xaxis[idx / ny], self.yaxis[idx % ny]) {
                    *v = 0.0;
                }
            }
        }
        Footprint {
            x: self.xaxis.clone(),
            y: self.yaxis.clone(),
            intensity,
        }
    }

    /// Projection on the x axis: integral of the footprint over y.
    pub fn x_projection(&self, mask: Option<PixelMask<'_>>) -> Profile {
        let footprint = self.footprint(mask);
        let ny = self.params.pixels.1;
        let dy = self.pixel_area().1;
        let values = footprint
            .intensity
            .chunks(ny)
            .map(|row| row.iter().sum::<f64>() * dy)
            .collect();
        Profile {
            positions: footprint.x,
            values,
        }
    }

    /// Projection on the y axis: integral of the footprint over x.
    pub fn y_projection(&self, mask: Option<PixelMask<'_>>) -> Profile {
        let footprint = self.footprint(mask);
        let (nx, ny) = self.params.pixels;
        let dx = self.pixel_area().0;
        let values = (0..ny)
            .map(|iy| {
                (0..nx)
                    .map(|ix| footprint.intensity[ix * ny + iy])
                    .sum::<f64>()
                    * dx
            })
            .collect();
        Profile {
            positions: footprint.y,
            values,
        }
    }
}

impl Detector for RectImageDetector {
    fn add(&mut self, mesh: &dyn MeshView, skip: &[bool], weight: f64) -> Result<()> {
        let triangles = active_triangles(mesh, skip, weight)?;
        let ny = self.params.pixels.1;
        let xaxis = &self.xaxis;
        let yaxis = &self.yaxis;
        self.intensity
            .par_iter_mut()
            .enumerate()
            .for_each(|(idx, v)| {
                let p = Point2::new(xaxis[idx / ny], yaxis[idx % ny]);
                let mut acc = 0.0;
                for (tri, density) in &triangles {
                    if point_in_triangle(&p, tri) {
                        acc += density;
                    }
                }
                *v += acc;
            });
        Ok(())
    }

    fn report(&self) -> Result<DetectorReport> {
        let footprint = self.footprint(None);
        let x_profile = self.x_projection(None);
        let y_profile = self.y_projection(None);
        let (dx, dy) = self.pixel_area();
        let total_power = footprint.intensity.iter().sum::<f64>() * dx * dy;
        // the same power must come out of either 1-D projection
        debug_assert!({
            let px = x_profile.values.iter().sum::<f64>() * dx;
            let py = y_profile.values.iter().sum::<f64>() * dy;
            let tol = 1e-9 * total_power.abs().max(1.0);
            (px - total_power).abs() <= tol && (py - total_power).abs() <= tol
        });
        debug!("rect detector: total power = {total_power:.5} W");
        Ok(DetectorReport::Rect(RectReport {
            footprint,
            x_profile,
            y_profile,
            total_power,
        }))
    }
}
