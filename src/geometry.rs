//! Geometric primitives used by the detectors: point-in-triangle containment,
//! hexapolar ring sampling and the orthonormal basis of a line detector.

use crate::error::{Result, TransmissionError};
use crate::types::{Point2, Vector2};

const EPS: f64 = 1e-12;

/// Containment test that is agnostic to vertex orientation: image-space
/// triangles may be clockwise when the mapping flips or scrambles rays.
/// Points exactly on an edge count as inside.
///
/// ```
/// use fluxmesh::geometry::point_in_triangle;
/// use fluxmesh::types::Point2;
///
/// let tri = [
///     Point2::new(0.0, 0.0),
///     Point2::new(1.0, 0.0),
///     Point2::new(0.0, 1.0),
/// ];
/// assert!(point_in_triangle(&Point2::new(0.2, 0.2), &tri));
/// assert!(!point_in_triangle(&Point2::new(0.8, 0.8), &tri));
/// ```
pub fn point_in_triangle(p: &Point2, tri: &[Point2; 3]) -> bool {
    let d0 = (tri[1] - tri[0]).perp(&(p - tri[0]));
    let d1 = (tri[2] - tri[1]).perp(&(p - tri[1]));
    let d2 = (tri[0] - tri[2]).perp(&(p - tri[2]));
    let has_neg = d0 < 0.0 || d1 < 0.0 || d2 < 0.0;
    let has_pos = d0 > 0.0 || d1 > 0.0 || d2 > 0.0;
    !(has_neg && has_pos)
}

/// Hexapolar sample grid: concentric rings of equally spaced points.
///
/// Ring `i` (0-based) sits at radius `(i + 0.5) * rmax / nrings`, carries
/// `6 * (i + 1)` points and the area fraction `(2i + 1) / nrings^2` of the
/// full disc, so the ring weights sum to one.
#[derive(Clone, Debug)]
pub struct HexapolarSampling {
    /// Sample coordinates, ring by ring from the innermost.
    pub points: Vec<Point2>,
    /// Number of points on each ring.
    pub points_per_ring: Vec<usize>,
    /// Fraction of the total detector area covered by each ring.
    pub ring_weights: Vec<f64>,
}

pub fn hexapolar_sampling(nrings: usize, rmax: f64) -> HexapolarSampling {
    let mut points = Vec::new();
    let mut points_per_ring = Vec::with_capacity(nrings);
    let mut ring_weights = Vec::with_capacity(nrings);
    let n2 = (nrings * nrings) as f64;
    for i in 0..nrings {
        let r = (i as f64 + 0.5) * rmax / nrings as f64;
        let n = 6 * (i + 1);
        for k in 0..n {
            let phi = 2.0 * std::f64::consts::PI * k as f64 / n as f64;
            points.push(Point2::new(r * phi.cos(), r * phi.sin()));
        }
        points_per_ring.push(n);
        ring_weights.push((2 * i + 1) as f64 / n2);
    }
    HexapolarSampling {
        points,
        points_per_ring,
        ring_weights,
    }
}

/// Orthonormal frame of a line detector: `ex` along the segment, `ey`
/// perpendicular to it.
#[derive(Clone, Copy, Debug)]
pub struct LineBasis {
    origin: Point2,
    ex: Vector2,
    ey: Vector2,
    length: f64,
}

impl LineBasis {
    pub fn from_segment(start: Point2, end: Point2) -> Result<Self> {
        let dir = end - start;
        let length = dir.norm();
        if length <= EPS {
            return Err(TransmissionError::DegenerateSegment);
        }
        let ex = dir / length;
        let ey = Vector2::new(-ex.y, ex.x);
        Ok(Self {
            origin: start,
            ex,
            ey,
            length,
        })
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    /// Coordinates of `p` in the line frame: first component along the
    /// segment, second perpendicular to it.
    pub fn to_local(&self, p: &Point2) -> (f64, f64) {
        let d = p - self.origin;
        (d.dot(&self.ex), d.dot(&self.ey))
    }
}
