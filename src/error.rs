//! Error taxonomy of the transmission core.
//!
//! Geometric-invariant violations and configuration mismatches are fatal and
//! fail fast. Ray-trace failures are *not* errors: they surface as non-finite
//! image coordinates and are handled by the bounded refinement passes.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransmissionError {
    /// A triangle with negative signed domain area reached a detector;
    /// the mesh orientation invariant is broken.
    #[error("triangle {index} has negative domain area {area}")]
    NegativeDomainArea { index: usize, area: f64 },

    /// The analytic line projection produced a negative height, which
    /// indicates a vertex-ordering defect.
    #[error("negative projected height {height} at column {column}")]
    NegativeProjectedHeight { column: usize, height: f64 },

    /// Skip mask length does not match the mesh's current triangle count.
    #[error("skip mask covers {got} triangles but the mesh has {expected}")]
    SkipMaskMismatch { expected: usize, got: usize },

    /// One weight per parameter set is required.
    #[error("{weights} weights supplied for {parameters} parameter sets")]
    WeightCountMismatch { parameters: usize, weights: usize },

    /// Points of one hexapolar ring do not share a common radius.
    #[error("points of ring {ring} do not share a common radius")]
    RingRadiusMismatch { ring: usize },

    /// Line detector endpoints coincide; no projection axis exists.
    #[error("line detector endpoints coincide")]
    DegenerateSegment,
}

pub type Result<T> = std::result::Result<T, TransmissionError>;
