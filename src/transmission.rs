//! Transmission orchestrator: per-parameter mesh refinement feeding a set of
//! detectors.
//!
//! For every parameter set the orchestrator builds a fresh mesh with the
//! ray-trace oracle bound to that parameter, repairs invalid triangles with
//! a bounded pass, iterates broken-triangle refinement to convergence, and
//! folds the converged mesh into every detector. Detectors are the only
//! state that survives the parameter loop.

use log::{info, warn};

use crate::detector::Detector;
use crate::diagnostics::{ParameterTrace, TransmissionReport};
use crate::error::{Result, TransmissionError};
use crate::mesh::{AdaptiveMesh, RefineCriterion};
use crate::types::Point2;

/// Subdivision budget of the invalid-triangle repair pass.
const INVALID_SUBDIVISION_BUDGET: usize = 100;
/// Subdivision budget of one broken-triangle refinement round.
const BROKEN_SUBDIVISION_BUDGET: usize = 100;
/// Safety bound on refinement rounds. The loop normally terminates on a
/// round creating no triangles; the bound keeps an ill-conditioned
/// criterion from spinning forever.
const MAX_REFINE_ROUNDS: usize = 100;

/// Drives the transmission calculation over a discrete parameter sweep.
///
/// `R` is the ray-trace oracle: one parameter tuple plus domain points in,
/// equally many image points out, with failed traces encoded as non-finite
/// coordinates.
pub struct Transmission<R>
where
    R: Fn(&[f64], &[Point2]) -> Vec<Point2>,
{
    parameters: Vec<Vec<f64>>,
    mesh_points: Vec<Point2>,
    raytrace: R,
    detectors: Vec<Box<dyn Detector>>,
    weights: Vec<f64>,
}

impl<R> Transmission<R>
where
    R: Fn(&[f64], &[Point2]) -> Vec<Point2>,
{
    /// Uniform weights: every parameter contributes `1 / nParams`.
    pub fn new(
        parameters: Vec<Vec<f64>>,
        mesh_points: Vec<Point2>,
        raytrace: R,
        detectors: Vec<Box<dyn Detector>>,
    ) -> Self {
        let n = parameters.len();
        let weights = vec![1.0 / n as f64; n];
        Self {
            parameters,
            mesh_points,
            raytrace,
            detectors,
            weights,
        }
    }

    /// Explicit per-parameter weights; one non-negative entry per parameter
    /// set.
    pub fn with_weights(
        parameters: Vec<Vec<f64>>,
        mesh_points: Vec<Point2>,
        raytrace: R,
        detectors: Vec<Box<dyn Detector>>,
        weights: Vec<f64>,
    ) -> Result<Self> {
        if weights.len() != parameters.len() {
            return Err(TransmissionError::WeightCountMismatch {
                parameters: parameters.len(),
                weights: weights.len(),
            });
        }
        Ok(Self {
            parameters,
            mesh_points,
            raytrace,
            detectors,
            weights,
        })
    }

    pub fn detectors(&self) -> &[Box<dyn Detector>] {
        &self.detectors
    }

    /// Incoherent sum over all ray-trace parameters.
    ///
    /// Each parameter is processed independently: a fresh mesh is built and
    /// refined, then every detector accumulates the converged mesh with the
    /// broken-triangle mask applied. Parameter order affects diagnostics
    /// only; the accumulated values are order-independent.
    pub fn total_transmission<M: AdaptiveMesh>(
        &mut self,
        criterion: RefineCriterion,
    ) -> Result<TransmissionReport> {
        let mut traces = Vec::with_capacity(self.parameters.len());
        for (ip, parameter) in self.parameters.iter().enumerate() {
            info!("transmission for parameter {parameter:?}");
            let mapping = |points: &[Point2]| (self.raytrace)(parameter, points);
            let mut mesh = M::build(&self.mesh_points, &mapping);

            // bounded repair of triangles the oracle failed on; leftover
            // invalidity stays excluded through non-finite densities
            let invalid_subdivisions =
                mesh.refine_invalid_triangles(&mapping, INVALID_SUBDIVISION_BUDGET);

            // refine until a round creates no triangles
            let mut new_triangles = Vec::new();
            let mut converged = false;
            for _ in 0..MAX_REFINE_ROUNDS {
                let created =
                    mesh.refine_broken_triangles(&mapping, &criterion, BROKEN_SUBDIVISION_BUDGET);
                if created == 0 {
                    converged = true;
                    break;
                }
                new_triangles.push(created);
            }
            if !converged {
                warn!(
                    "refinement for parameter {parameter:?} did not converge \
                     within {MAX_REFINE_ROUNDS} rounds"
                );
            }

            let skip = mesh.find_broken_triangles(criterion.lthresh);
            for detector in self.detectors.iter_mut() {
                detector.add(&mesh, &skip, self.weights[ip])?;
            }
            traces.push(ParameterTrace {
                parameter: parameter.clone(),
                invalid_subdivisions,
                new_triangles,
                converged,
                triangles: mesh.triangle_count(),
                skipped: skip.iter().filter(|&&b| b).count(),
            });
        }
        Ok(TransmissionReport { parameters: traces })
    }
}
