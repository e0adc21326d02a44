//! Photoelectron response of a PMT to light emitted at a vertex:
//! hit probabilities, sampled arrival times and their moments.

use rand::prelude::*;

use crate::detector::Detector;
use crate::error::ProbeError;
use crate::geometry::*;
use crate::sampler::*;

/// Side of the dense grid of rays, for direct and once-reflected light.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Refinement {
    pub direct: usize,
    pub reflected: usize,
}

impl Refinement {
    pub fn new(direct: usize, reflected: usize) -> Self {
        Refinement {direct, reflected}
    }

    fn of(&self, order: ReflectionOrder) -> usize {
        match order {
            ReflectionOrder::Direct => self.direct,
            ReflectionOrder::OnceReflected => self.reflected,
        }
    }
}

/// Refinements used by the different queries, trading accuracy
/// against speed.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Accuracy {
    /// for `hit_probability` and `hit_probabilities`
    pub probability: Refinement,
    /// for `sample_arrival_time`
    pub sampling: Refinement,
    /// for `grid_sample`
    pub grid: Refinement,
}

impl Default for Accuracy {
    fn default() -> Self {
        Accuracy {
            probability: Refinement::new(300, 100),
            sampling: Refinement::new(30, 50),
            grid: Refinement::new(300, 150),
        }
    }
}

/// Probabilities and arrival-time moments for both reflection orders,
/// as stored in a probe table
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct GridSample {
    pub direct_probability: f64,
    pub reflected_probability: f64,
    pub direct_mean_time: f64,
    pub reflected_mean_time: f64,
    pub direct_std_time: f64,
    pub reflected_std_time: f64,
}

impl GridSample {
    fn from_probes(direct: &Probe, reflected: &Probe) -> Self {
        GridSample {
            direct_probability: direct.probability,
            reflected_probability: reflected.probability,
            direct_mean_time: direct.mean_time(),
            reflected_mean_time: reflected.mean_time(),
            direct_std_time: direct.std_time(),
            reflected_std_time: reflected.std_time(),
        }
    }

    /// Values in the order `p0 p1 t0 t1 s0 s1`
    pub fn to_array(&self) -> [f64; 6] {
        [
            self.direct_probability, self.reflected_probability,
            self.direct_mean_time, self.reflected_mean_time,
            self.direct_std_time, self.reflected_std_time,
        ]
    }

    /// Inverse of `to_array`
    pub fn from_array(v: [f64; 6]) -> Self {
        GridSample {
            direct_probability: v[0],
            reflected_probability: v[1],
            direct_mean_time: v[2],
            reflected_mean_time: v[3],
            direct_std_time: v[4],
            reflected_std_time: v[5],
        }
    }
}

/// Optical model of the detector, answering questions about the light
/// that a PMT receives from a point-like, isotropic source.
///
/// Every query is a pure function of its arguments (and, for
/// `sample_arrival_time`, the supplied rng), so a single model can be
/// shared between threads.
#[derive(Clone, Debug)]
pub struct OpticalModel {
    prober: Prober,
    accuracy: Accuracy,
}

impl OpticalModel {
    pub fn new(detector: Detector, settings: SamplerSettings, accuracy: Accuracy) -> Self {
        OpticalModel {
            prober: Prober::new(detector, settings),
            accuracy,
        }
    }

    pub fn detector(&self) -> &Detector {
        self.prober.detector()
    }

    pub fn accuracy(&self) -> &Accuracy {
        &self.accuracy
    }

    pub fn prober(&self) -> &Prober {
        &self.prober
    }

    fn probe_both(&self, vertex: ThreeVector, pmt: PmtAngles, refinement: Refinement) -> Result<(Probe, Probe), ProbeError> {
        let direct = self.prober.probe(vertex, pmt, ReflectionOrder::Direct, refinement.of(ReflectionOrder::Direct))?;
        let reflected = self.prober.probe(vertex, pmt, ReflectionOrder::OnceReflected, refinement.of(ReflectionOrder::OnceReflected))?;
        Ok((direct, reflected))
    }

    /// Probability that a photon emitted at `vertex` reaches the PMT at
    /// `pmt`, either directly or after one reflection at the LS boundary.
    pub fn hit_probability(&self, vertex: ThreeVector, pmt: PmtAngles) -> Result<f64, ProbeError> {
        let (direct, reflected) = self.probe_both(vertex, pmt, self.accuracy.probability)?;
        Ok(direct.probability + reflected.probability)
    }

    /// Fraction of the sphere subtended by the PMT, ignoring refraction:
    /// r_PMT² / (4 d²).
    pub fn naive_probability(&self, vertex: ThreeVector, pmt: PmtAngles) -> f64 {
        let detector = self.detector();
        let d = (detector.pmt_position(pmt) - vertex).norm();
        detector.pmt_radius.powi(2) / (4.0 * d * d)
    }

    /// Hit probabilities for pairs of vertices and PMTs.
    pub fn hit_probabilities(&self, vertices: &[ThreeVector], pmts: &[PmtAngles]) -> Result<Vec<f64>, ProbeError> {
        if vertices.len() != pmts.len() {
            return Err(ProbeError::ShapeMismatch(vertices.len(), pmts.len()));
        }

        vertices.iter()
            .zip(pmts.iter())
            .map(|(&vertex, &pmt)| self.hit_probability(vertex, pmt))
            .collect()
    }

    /// Draws the arrival time, in seconds, of a photon that is emitted at
    /// `vertex` and detected by the PMT at `pmt`.
    ///
    /// The reflection order is chosen in proportion to its probability,
    /// then an arrival time from the traced rays of that order is picked
    /// uniformly. Returns `None` if the PMT cannot be reached.
    pub fn sample_arrival_time<R: Rng>(&self, vertex: ThreeVector, pmt: PmtAngles, rng: &mut R) -> Result<Option<f64>, ProbeError> {
        let (direct, reflected) = self.probe_both(vertex, pmt, self.accuracy.sampling)?;
        let total = direct.probability + reflected.probability;

        if total <= 0.0 {
            return Ok(None);
        }

        let chosen = if rng.gen::<f64>() < direct.probability / total {
            &direct
        } else {
            &reflected
        };

        Ok(chosen.arrival_times.choose(rng).copied())
    }

    /// Probabilities, and the mean and standard deviation of the arrival
    /// times, for both reflection orders.
    pub fn grid_sample(&self, vertex: ThreeVector, pmt: PmtAngles) -> Result<GridSample, ProbeError> {
        let (direct, reflected) = self.probe_both(vertex, pmt, self.accuracy.grid)?;
        Ok(GridSample::from_probes(&direct, &reflected))
    }
}
