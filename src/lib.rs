#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod detector;
pub mod diagnostics;
pub mod error;
pub mod mesh;
pub mod transmission;
pub mod types;

// Leaf geometric primitives; public for mesh implementations and tools.
pub mod geometry;

// --- High-level re-exports -------------------------------------------------

// Main entry points: orchestrator + refinement criterion.
pub use crate::mesh::{AdaptiveMesh, MeshView, RefineCriterion};
pub use crate::transmission::Transmission;

// Detector family.
pub use crate::detector::{
    CheckTriangulationDetector, Detector, LineDetectorParams, LineImageDetector,
    PolarDetectorParams, PolarImageDetector, RectDetectorParams, RectImageDetector,
};

// Structured results returned by the run and the detectors.
pub use crate::diagnostics::{DetectorReport, TransmissionReport};
pub use crate::error::{Result, TransmissionError};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
pub mod prelude {
    pub use crate::detector::{
        CheckTriangulationDetector, Detector, LineDetectorParams, LineImageDetector,
        PolarDetectorParams, PolarImageDetector, RectDetectorParams, RectImageDetector,
    };
    pub use crate::mesh::{AdaptiveMesh, MeshView, RefineCriterion};
    pub use crate::transmission::Transmission;
    pub use crate::types::Point2;
}
