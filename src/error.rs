//! Errors raised by the ray tracer and the table builder

use std::fmt;
use std::error::Error;

use crate::geometry::ThreeVector;

/// Precondition violations detected while probing a vertex/PMT pair.
/// An unreachable PMT is a valid outcome and is not reported here.
pub enum ProbeError {
    /// The emission vertex lies outside the LS sphere.
    OutsideDetector(ThreeVector),
    /// A ray, given by its position and direction, has no forward
    /// intersection with the LS boundary.
    DegenerateRay(ThreeVector, ThreeVector),
    /// Batched vertices and PMTs have different lengths.
    ShapeMismatch(usize, usize),
    /// The dense sub-grid must have at least one ray per side.
    Refinement(usize),
}

impl fmt::Display for ProbeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ProbeError::OutsideDetector(r) => write!(f, "vertex {} lies outside the LS sphere", r),
            ProbeError::DegenerateRay(r, v) => write!(f, "ray at {} with direction {} does not reach the LS boundary", r, v),
            ProbeError::ShapeMismatch(a, b) => write!(f, "got {} vertices but {} PMTs", a, b),
            ProbeError::Refinement(n) => write!(f, "refinement must be positive, got {}", n),
        }
    }
}

impl fmt::Debug for ProbeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl Error for ProbeError {}

/// Why building a probe table failed
pub enum TableError {
    Probe(ProbeError),
    ThreadPool(String),
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TableError::Probe(e) => write!(f, "failed to evaluate grid node: {}", e),
            TableError::ThreadPool(s) => write!(f, "failed to start worker pool: {}", s),
        }
    }
}

impl fmt::Debug for TableError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl Error for TableError {}

impl From<ProbeError> for TableError {
    fn from(e: ProbeError) -> Self {
        TableError::Probe(e)
    }
}
