//! Contract between the transmission core and an adaptive triangulation.
//!
//! The mesh itself lives outside this crate; the core only relies on the two
//! traits below. [`MeshView`] is the read-only surface the detectors consume,
//! [`AdaptiveMesh`] adds construction and the two refinement operations the
//! orchestrator drives. The mapping is passed into every operation that needs
//! it instead of being stored on the mesh, so implementations carry no
//! closure state.

use crate::types::{Mapping, Point2, Simplex};

/// Read-only view of a triangulated domain/image pair.
pub trait MeshView {
    /// Triangle vertex-index triples, in the mesh's current order.
    fn simplices(&self) -> &[Simplex];

    /// Mapped (image-space) vertex coordinates. Entries are non-finite where
    /// the ray trace failed.
    fn image(&self) -> &[Point2];

    /// Signed triangle areas in domain space, for all triangles or for the
    /// given triangle indices.
    fn domain_areas(&self, subset: Option<&[usize]>) -> Vec<f64>;

    /// Signed triangle areas in image space. May be negative under ray
    /// scrambling and non-finite for invalid triangles.
    fn image_areas(&self, subset: Option<&[usize]>) -> Vec<f64>;

    /// Domain area covered by the triangulation right after construction,
    /// before any refinement.
    fn initial_domain_area(&self) -> f64;

    fn triangle_count(&self) -> usize {
        self.simplices().len()
    }

    /// Image-space vertices of one triangle.
    fn image_triangle(&self, simplex: &Simplex) -> [Point2; 3] {
        let image = self.image();
        [image[simplex[0]], image[simplex[1]], image[simplex[2]]]
    }
}

/// Refinable triangulation driven by the orchestrator.
pub trait AdaptiveMesh: MeshView + Sized {
    /// Triangulate `domain_points` and map every vertex through `mapping`.
    fn build(domain_points: &[Point2], mapping: &Mapping) -> Self;

    /// Discontinuity mask: triangles whose image-space edges exceed
    /// `lthresh`. No area filter is applied here; this is also the final
    /// skip mask handed to the detectors.
    fn find_broken_triangles(&self, lthresh: f64) -> Vec<bool>;

    /// Subdivide triangles with non-finite image vertices, spending at most
    /// `budget` subdivisions. Must terminate even when some invalidity is
    /// irreducible (e.g. on the domain boundary). Returns the number of
    /// subdivisions performed.
    fn refine_invalid_triangles(&mut self, mapping: &Mapping, budget: usize) -> usize;

    /// Subdivide the triangles selected by [`subdivision_candidates`],
    /// spending at most `budget` subdivisions, and remap the new vertices.
    /// Returns the number of newly created triangles; zero means the
    /// refinement has converged.
    fn refine_broken_triangles(
        &mut self,
        mapping: &Mapping,
        criterion: &RefineCriterion,
        budget: usize,
    ) -> usize;
}

/// Refinement predicate: a triangle is subdivided when it is geometrically
/// broken at `lthresh` *and* its domain area exceeds `athresh`. The area
/// floor keeps genuine discontinuities of vanishing measure from being
/// refined forever.
#[derive(Clone, Copy, Debug)]
pub struct RefineCriterion {
    /// Image-space edge length above which a triangle counts as broken.
    pub lthresh: f64,
    /// Minimum domain area a broken triangle must have to be subdivided.
    pub athresh: f64,
}

impl RefineCriterion {
    pub fn new(lthresh: f64) -> Self {
        Self {
            lthresh,
            athresh: std::f64::consts::PI / 1000.0,
        }
    }

    pub fn with_athresh(lthresh: f64, athresh: f64) -> Self {
        Self { lthresh, athresh }
    }
}

/// Combine the discontinuity test with the minimum-area filter. Every mesh
/// implementation applies this same predicate inside
/// [`AdaptiveMesh::refine_broken_triangles`].
pub fn subdivision_candidates<M: AdaptiveMesh>(mesh: &M, criterion: &RefineCriterion) -> Vec<bool> {
    let mut broken = mesh.find_broken_triangles(criterion.lthresh);
    let candidates: Vec<usize> = broken
        .iter()
        .enumerate()
        .filter_map(|(i, &b)| b.then_some(i))
        .collect();
    let areas = mesh.domain_areas(Some(&candidates));
    for (&i, &area) in candidates.iter().zip(&areas) {
        broken[i] = area > criterion.athresh;
    }
    broken
}

/// Per-triangle flux density in image space:
/// `weight * |(domain_area / initial_domain_area) / image_area|`.
///
/// Entries are non-finite where the image area is zero or the triangle is
/// invalid; detectors treat those as zero contribution.
pub fn density(mesh: &dyn MeshView, weight: f64) -> Vec<f64> {
    let initial = mesh.initial_domain_area();
    mesh.domain_areas(None)
        .iter()
        .zip(&mesh.image_areas(None))
        .map(|(&da, &ia)| weight * ((da / initial) / ia).abs())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::signed_area;
    use approx::assert_relative_eq;

    /// Two right triangles tiling the unit square, with a stretch of the
    /// second triangle in image space.
    struct TwoTriangles {
        domain: Vec<Point2>,
        image: Vec<Point2>,
        simplices: Vec<Simplex>,
    }

    impl TwoTriangles {
        fn new(stretch: f64) -> Self {
            let domain = vec![
                Point2::new(0.0, 0.0),
                Point2::new(1.0, 0.0),
                Point2::new(1.0, 1.0),
                Point2::new(0.0, 1.0),
            ];
            let mut image = domain.clone();
            image[2].x *= stretch;
            Self {
                domain,
                image,
                simplices: vec![[0, 1, 3], [1, 2, 3]],
            }
        }

        fn areas(points: &[Point2], simplices: &[Simplex], subset: Option<&[usize]>) -> Vec<f64> {
            let tri = |s: &Simplex| signed_area(&points[s[0]], &points[s[1]], &points[s[2]]);
            match subset {
                Some(idx) => idx.iter().map(|&i| tri(&simplices[i])).collect(),
                None => simplices.iter().map(tri).collect(),
            }
        }
    }

    impl MeshView for TwoTriangles {
        fn simplices(&self) -> &[Simplex] {
            &self.simplices
        }
        fn image(&self) -> &[Point2] {
            &self.image
        }
        fn domain_areas(&self, subset: Option<&[usize]>) -> Vec<f64> {
            Self::areas(&self.domain, &self.simplices, subset)
        }
        fn image_areas(&self, subset: Option<&[usize]>) -> Vec<f64> {
            Self::areas(&self.image, &self.simplices, subset)
        }
        fn initial_domain_area(&self) -> f64 {
            1.0
        }
    }

    impl AdaptiveMesh for TwoTriangles {
        fn build(_: &[Point2], _: &Mapping) -> Self {
            Self::new(1.0)
        }
        fn find_broken_triangles(&self, lthresh: f64) -> Vec<bool> {
            self.simplices
                .iter()
                .map(|s| {
                    let t = self.image_triangle(s);
                    let longest = (t[1] - t[0])
                        .norm()
                        .max((t[2] - t[1]).norm())
                        .max((t[0] - t[2]).norm());
                    longest > lthresh
                })
                .collect()
        }
        fn refine_invalid_triangles(&mut self, _: &Mapping, _: usize) -> usize {
            0
        }
        fn refine_broken_triangles(&mut self, _: &Mapping, _: &RefineCriterion, _: usize) -> usize {
            0
        }
    }

    #[test]
    fn density_is_weight_over_magnification() {
        // second triangle's image area is 1.5, three times its domain area
        let mesh = TwoTriangles::new(3.0);
        let d = density(&mesh, 0.5);
        assert_relative_eq!(d[0], 0.5 * 0.5, epsilon = 1e-12);
        assert_relative_eq!(d[1], 0.5 * 0.5 / 1.5, epsilon = 1e-12);
    }

    #[test]
    fn density_is_nan_for_collapsed_triangles() {
        let mut mesh = TwoTriangles::new(1.0);
        // collapse the second triangle in image space
        mesh.image[2] = mesh.image[1];
        let d = density(&mesh, 1.0);
        assert!(d[0].is_finite());
        assert!(!d[1].is_finite());
    }

    #[test]
    fn candidates_require_both_breakage_and_area() {
        let mesh = TwoTriangles::new(3.0);
        // stretched triangle has image edges > 2, intact one stays ~sqrt(2)
        let loose = RefineCriterion::with_athresh(2.0, 0.1);
        assert_eq!(subdivision_candidates(&mesh, &loose), vec![false, true]);
        // same breakage, but the area floor above 0.5 excludes it
        let tight = RefineCriterion::with_athresh(2.0, 0.6);
        assert_eq!(subdivision_candidates(&mesh, &tight), vec![false, false]);
    }

    #[test]
    fn default_area_floor_matches_disc_fraction() {
        let c = RefineCriterion::new(0.1);
        assert_relative_eq!(c.athresh, std::f64::consts::PI / 1000.0);
    }
}
