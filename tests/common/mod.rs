//! Test double for the external adaptive-mesh collaborator: a fan
//! triangulation with genuine midpoint subdivision, but none of the
//! Delaunay machinery a production mesh would carry.

use fluxmesh::mesh::{subdivision_candidates, AdaptiveMesh, MeshView, RefineCriterion};
use fluxmesh::types::{Mapping, Point2, Simplex};

pub struct FanMesh {
    domain: Vec<Point2>,
    image: Vec<Point2>,
    simplices: Vec<Simplex>,
    initial_domain_area: f64,
}

impl FanMesh {
    fn signed_area(points: &[Point2], s: &Simplex) -> f64 {
        let (a, b, c) = (points[s[0]], points[s[1]], points[s[2]]);
        0.5 * (b - a).perp(&(c - a))
    }

    fn areas(&self, points: &[Point2], subset: Option<&[usize]>) -> Vec<f64> {
        match subset {
            Some(idx) => idx
                .iter()
                .map(|&i| Self::signed_area(points, &self.simplices[i]))
                .collect(),
            None => self
                .simplices
                .iter()
                .map(|s| Self::signed_area(points, s))
                .collect(),
        }
    }

    /// Replace triangle `t` by its four midpoint children; three new
    /// vertices are appended and mapped. Returns the three new triangles'
    /// count (the net growth).
    fn subdivide(&mut self, t: usize, mapping: &Mapping) -> usize {
        let [a, b, c] = self.simplices[t];
        let base = self.domain.len();
        let mids = [
            Point2::from((self.domain[a].coords + self.domain[b].coords) / 2.0),
            Point2::from((self.domain[b].coords + self.domain[c].coords) / 2.0),
            Point2::from((self.domain[c].coords + self.domain[a].coords) / 2.0),
        ];
        self.domain.extend_from_slice(&mids);
        self.image.extend(mapping(&mids));
        let (mab, mbc, mca) = (base, base + 1, base + 2);
        self.simplices[t] = [a, mab, mca];
        self.simplices.push([mab, b, mbc]);
        self.simplices.push([mca, mbc, c]);
        self.simplices.push([mab, mbc, mca]);
        3
    }

    fn invalid_triangles(&self) -> Vec<usize> {
        self.simplices
            .iter()
            .enumerate()
            .filter_map(|(i, s)| {
                s.iter()
                    .any(|&v| !self.image[v].x.is_finite() || !self.image[v].y.is_finite())
                    .then_some(i)
            })
            .collect()
    }
}

impl MeshView for FanMesh {
    fn simplices(&self) -> &[Simplex] {
        &self.simplices
    }

    fn image(&self) -> &[Point2] {
        &self.image
    }

    fn domain_areas(&self, subset: Option<&[usize]>) -> Vec<f64> {
        self.areas(&self.domain, subset)
    }

    fn image_areas(&self, subset: Option<&[usize]>) -> Vec<f64> {
        self.areas(&self.image, subset)
    }

    fn initial_domain_area(&self) -> f64 {
        self.initial_domain_area
    }
}

impl AdaptiveMesh for FanMesh {
    fn build(domain_points: &[Point2], mapping: &Mapping) -> Self {
        let domain = domain_points.to_vec();
        let simplices: Vec<Simplex> = (1..domain.len().saturating_sub(1))
            .map(|i| [0, i, i + 1])
            .collect();
        let image = mapping(&domain);
        let mut mesh = Self {
            domain,
            image,
            simplices,
            initial_domain_area: 0.0,
        };
        mesh.initial_domain_area = mesh.domain_areas(None).iter().sum();
        mesh
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

    fn refine_invalid_triangles(&mut self, mapping: &Mapping, budget: usize) -> usize {
        let mut spent = 0;
        while spent < budget {
            let invalid = self.invalid_triangles();
            if invalid.is_empty() {
                break;
            }
            for t in invalid {
                if spent >= budget {
                    break;
                }
                self.subdivide(t, mapping);
                spent += 1;
            }
        }
        spent
    }

    fn refine_broken_triangles(
        &mut self,
        mapping: &Mapping,
        criterion: &RefineCriterion,
        budget: usize,
    ) -> usize {
        let candidates: Vec<usize> = subdivision_candidates(self, criterion)
            .iter()
            .enumerate()
            .filter_map(|(i, &b)| b.then_some(i))
            .collect();
        let mut created = 0;
        for t in candidates.into_iter().take(budget) {
            created += self.subdivide(t, mapping);
        }
        created
    }
}

pub fn identity(points: &[Point2]) -> Vec<Point2> {
    points.to_vec()
}

pub fn all_invalid(points: &[Point2]) -> Vec<Point2> {
    vec![Point2::new(f64::NAN, f64::NAN); points.len()]
}
