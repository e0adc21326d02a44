//! Optical photon transport in a spherical liquid-scintillator detector.
//!
//! Light emitted isotropically at a vertex inside the LS sphere is
//! traced as bundles of rays through the LS, refracted or reflected at
//! the LS/water boundary and collected by the PMTs on the outer shell.
//! The [`OpticalModel`] answers the questions an event simulation
//! needs: how likely a PMT is to see a photon from a given vertex, and
//! when that photon arrives. [`ProbeTable`] tabulates the answers over
//! the detector volume, using the rotational symmetry of the detector.

pub mod constants;
pub mod geometry;
pub mod detector;
pub mod error;
pub mod optics;
pub mod sampler;
pub mod pe;
pub mod table;
pub mod input;
pub mod output;

pub use detector::Detector;
pub use error::*;
pub use geometry::{ThreeVector, PmtAngles, ReflectionOrder};
pub use pe::*;
pub use sampler::{Prober, Probe, SamplerSettings};
pub use table::{ProbeTable, TableSpec, relative_position};
