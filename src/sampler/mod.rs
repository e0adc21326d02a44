//! Adaptive sampling of the emission directions that reach a PMT.
//!
//! A coarse, isotropic trial bundle is used to locate the small cone
//! of directions, around the PMT, in which light emitted from the
//! vertex can arrive; that cone is then filled with a dense regular
//! grid of rays, which are traced to the PMT.

use std::f64::consts;
use rand::prelude::*;
use rand_xoshiro::Xoshiro256StarStar;

use crate::detector::Detector;
use crate::error::ProbeError;
use crate::geometry::*;
use crate::optics::*;

mod trial;
pub use trial::*;

/// Returns `n` evenly spaced values from `start` to `stop` inclusive.
pub(crate) fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => vec![],
        1 => vec![start],
        _ => {
            let step = (stop - start) / ((n - 1) as f64);
            (0..n)
                .map(|i| if i == n - 1 {stop} else {start + (i as f64) * step})
                .collect()
        }
    }
}

/// Parameters that control how the cone of interest is found
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SamplerSettings {
    /// Number of isotropic trial rays
    pub trials: usize,
    /// Seed for the generation of the trial rays
    pub seed: u64,
    /// Trial rays must miss the PMT by at least this much, in metres,
    /// to be used to delimit the cone
    pub margin: f64,
    /// Largest miss distance considered, in units of the PMT radius
    pub search_limit: f64,
    /// Number of miss distances tried between the smallest and largest
    pub search_steps: usize,
    /// The cone is accepted once more than this many trial rays
    /// fall within the miss distance, for direct light ...
    pub min_candidates_direct: usize,
    /// ... and for once-reflected light
    pub min_candidates_reflected: usize,
}

impl Default for SamplerSettings {
    fn default() -> Self {
        SamplerSettings {
            trials: 20_000,
            seed: 0,
            margin: 0.002,
            search_limit: 5.0,
            search_steps: 100,
            min_candidates_direct: 20,
            min_candidates_reflected: 16,
        }
    }
}

impl SamplerSettings {
    fn min_candidates(&self, order: ReflectionOrder) -> usize {
        match order {
            ReflectionOrder::Direct => self.min_candidates_direct,
            ReflectionOrder::OnceReflected => self.min_candidates_reflected,
        }
    }
}

/// The probability that a photon reaches a PMT, and a sample
/// of the times at which it arrives
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Probe {
    pub probability: f64,
    pub arrival_times: Vec<f64>,
}

impl Probe {
    /// The result for a PMT that cannot be reached
    pub fn unreachable() -> Self {
        Probe::default()
    }

    pub fn is_unreachable(&self) -> bool {
        self.arrival_times.is_empty()
    }

    /// Mean arrival time, or zero if there are no arrivals
    pub fn mean_time(&self) -> f64 {
        if self.arrival_times.is_empty() {
            return 0.0;
        }
        self.arrival_times.iter().sum::<f64>() / (self.arrival_times.len() as f64)
    }

    /// Population standard deviation of the arrival times,
    /// or zero if there are no arrivals
    pub fn std_time(&self) -> f64 {
        if self.arrival_times.is_empty() {
            return 0.0;
        }
        let mean = self.mean_time();
        let variance = self.arrival_times.iter()
            .map(|t| (t - mean).powi(2))
            .sum::<f64>() / (self.arrival_times.len() as f64);
        variance.sqrt()
    }
}

/// A rectangular patch of emission directions in (φ, θ)
#[derive(Copy, Clone, Debug, PartialEq)]
struct Cone {
    phi: [f64; 2],
    theta: [f64; 2],
}

impl Cone {
    /// Smallest patch that contains all the given angles
    fn bounding<I: Iterator<Item = (f64, f64)>>(angles: I) -> Self {
        angles.fold(
            Cone {
                phi: [f64::INFINITY, f64::NEG_INFINITY],
                theta: [f64::INFINITY, f64::NEG_INFINITY],
            },
            |cone, (phi, theta)| Cone {
                phi: [cone.phi[0].min(phi), cone.phi[1].max(phi)],
                theta: [cone.theta[0].min(theta), cone.theta[1].max(theta)],
            }
        )
    }

    /// Ω = (cos θ_start - cos θ_end) (φ_end - φ_start)
    fn solid_angle(&self) -> f64 {
        (self.theta[0].cos() - self.theta[1].cos()) * (self.phi[1] - self.phi[0])
    }

    /// `n` × `n` directions, evenly spaced in φ and cos θ, so that each
    /// represents the same solid angle.
    fn directions(&self, n: usize) -> Vec<ThreeVector> {
        let phis = linspace(self.phi[0], self.phi[1], n);
        let cos_thetas = linspace(self.theta[0].cos(), self.theta[1].cos(), n);
        let mut directions = Vec::with_capacity(n * n);
        for &phi in phis.iter() {
            for &cos_theta in cos_thetas.iter() {
                let theta = cos_theta.max(-1.0).min(1.0).acos();
                directions.push(ThreeVector::from_spherical(1.0, theta, phi));
            }
        }
        directions
    }
}

/// Traces light from an emission vertex to a PMT.
///
/// Holds the detector description and the trial directions, which are
/// generated once on construction and shared, read-only, by every probe.
/// A `Prober` can therefore be used from many threads at once.
#[derive(Clone, Debug)]
pub struct Prober {
    detector: Detector,
    settings: SamplerSettings,
    trials: TrialDirections,
}

impl Prober {
    pub fn new(detector: Detector, settings: SamplerSettings) -> Self {
        let mut rng = Xoshiro256StarStar::seed_from_u64(settings.seed);
        let trials = TrialDirections::generate(settings.trials, &mut rng);
        Prober {detector, settings, trials}
    }

    pub fn detector(&self) -> &Detector {
        &self.detector
    }

    pub fn settings(&self) -> &SamplerSettings {
        &self.settings
    }

    /// Finds the patch of trial directions whose rays, after `order`
    /// internal reflections, pass close to (but miss) the PMT at `target`.
    /// Returns `None` if too few trial rays do so.
    fn locate_cone(&self, vertex: ThreeVector, target: ThreeVector, order: ReflectionOrder) -> Result<Option<Cone>, ProbeError> {
        let escaped = transport(&self.detector, &self.trials.emit_from(vertex), order)?;

        let distances: Vec<Option<f64>> = escaped.iter()
            .map(|ray| if ray.is_extinguished() {None} else {Some(ray.closest_approach(target))})
            .collect();

        let d_min = self.detector.pmt_radius + self.settings.margin;
        let d_limit = self.settings.search_limit * self.detector.pmt_radius;
        let least = self.settings.min_candidates(order);
        let within = |d: &Option<f64>, d_max: f64| match d {
            Some(d) => *d > d_min && *d < d_max,
            None => false,
        };

        for d_max in linspace(d_min, d_limit, self.settings.search_steps) {
            let count = distances.iter().filter(|d| within(*d, d_max)).count();
            if count > least {
                let cone = Cone::bounding(
                    distances.iter()
                        .enumerate()
                        .filter(|(_, d)| within(*d, d_max))
                        .map(|(i, _)| self.trials.angles(i))
                );
                return Ok(Some(cone));
            }
        }

        Ok(None)
    }

    /// Estimates the probability that a photon, emitted isotropically at
    /// `vertex`, reaches the PMT at `pmt` after `order` internal
    /// reflections, together with a sample of arrival times.
    ///
    /// `refinement` sets the side of the dense grid of rays used for the
    /// estimate: the cost scales as its square. A PMT that cannot be
    /// reached gives zero probability and no arrival times.
    pub fn probe(&self, vertex: ThreeVector, pmt: PmtAngles, order: ReflectionOrder, refinement: usize) -> Result<Probe, ProbeError> {
        if !self.detector.contains(vertex) {
            return Err(ProbeError::OutsideDetector(vertex));
        }
        if refinement == 0 {
            return Err(ProbeError::Refinement(refinement));
        }

        let (vertex, pmt) = order.canonicalize(vertex, pmt);
        let target = self.detector.pmt_position(pmt);

        let cone = match self.locate_cone(vertex, target, order)? {
            Some(cone) => cone,
            None => return Ok(Probe::unreachable()),
        };

        let dense = RayBundle::from_directions(vertex, cone.directions(refinement));
        let escaped = transport(&self.detector, &dense, order)?;
        let detection = detect_at_pmt(&self.detector, &escaped, target);

        let ratio = detection.intensity / ((refinement * refinement) as f64);
        let probability = ratio * cone.solid_angle() / (4.0 * consts::PI);

        Ok(Probe {
            probability,
            arrival_times: detection.arrival_times,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn naive(detector: &Detector, vertex: ThreeVector, pmt: PmtAngles) -> f64 {
        let d = (detector.pmt_position(pmt) - vertex).norm();
        detector.pmt_radius.powi(2) / (4.0 * d * d)
    }

    #[test]
    fn spacing() {
        assert_eq!(linspace(0.0, 1.0, 5), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
        assert_eq!(linspace(2.0, 3.0, 1), vec![2.0]);
        assert!(linspace(2.0, 3.0, 0).is_empty());
    }

    #[test]
    fn cone_geometry() {
        let cone = Cone::bounding(vec![(1.0, 0.5), (1.2, 0.9), (0.8, 0.7)].into_iter());
        assert_eq!(cone.phi, [0.8, 1.2]);
        assert_eq!(cone.theta, [0.5, 0.9]);
        let omega = (0.5f64.cos() - 0.9f64.cos()) * 0.4;
        assert!((cone.solid_angle() - omega).abs() < 1.0e-15);

        let directions = cone.directions(3);
        assert_eq!(directions.len(), 9);
        let (_, theta, phi) = directions[0].to_spherical();
        assert!((theta - 0.5).abs() < 1.0e-12 && (phi - 0.8).abs() < 1.0e-12);
        let (_, theta, phi) = directions[8].to_spherical();
        assert!((theta - 0.9).abs() < 1.0e-12 && (phi - 1.2).abs() < 1.0e-12);

        // the whole sphere
        let sphere = Cone {phi: [0.0, 2.0 * consts::PI], theta: [0.0, consts::PI]};
        assert!((sphere.solid_angle() - 4.0 * consts::PI).abs() < 1.0e-12);
    }

    #[test]
    fn centred_vertex() {
        let prober = Prober::new(Detector::default(), SamplerSettings::default());
        let detector = prober.detector();
        let vertex = ThreeVector::new(0.0, 0.0, 0.0);
        let pmt = PmtAngles::new(0.0, 0.0);

        let probe = prober.probe(vertex, pmt, ReflectionOrder::Direct, 100).unwrap();
        let expected = naive(detector, vertex, pmt);
        println!("p = {:.6e}, naive = {:.6e}, {} arrivals, <t> = {:.6e} s, std = {:.3e} s",
            probe.probability, expected, probe.arrival_times.len(), probe.mean_time(), probe.std_time());

        assert!(probe.probability > 0.5 * expected && probe.probability < 2.0 * expected);
        assert!(probe.mean_time() > 9.2e-8 && probe.mean_time() < 9.6e-8);

        let earliest = (detector.n_ls * detector.ls_radius
            + detector.n_water * (detector.shell_radius - detector.pmt_radius - detector.ls_radius)) / detector.c;
        assert!(probe.arrival_times.iter().all(|&t| t >= earliest * (1.0 - 1.0e-9)));

        // light that crosses the detector once more
        let reflected = prober.probe(vertex, pmt, ReflectionOrder::OnceReflected, 100).unwrap();
        println!("p (reflected) = {:.6e}, <t> = {:.6e} s", reflected.probability, reflected.mean_time());
        assert!(reflected.probability > 0.0);
        assert!(reflected.probability < 0.01 * probe.probability);
        assert!(reflected.mean_time() > probe.mean_time());
    }

    #[test]
    fn deterministic() {
        let settings = SamplerSettings {seed: 42, ..Default::default()};
        let a = Prober::new(Detector::default(), settings);
        let b = Prober::new(Detector::default(), settings);
        let vertex = ThreeVector::new(2.0, -5.0, 8.0);
        let pmt = PmtAngles::new(1.3, 0.4);

        for &order in [ReflectionOrder::Direct, ReflectionOrder::OnceReflected].iter() {
            let pa = a.probe(vertex, pmt, order, 50).unwrap();
            let pb = b.probe(vertex, pmt, order, 50).unwrap();
            println!("{}: p = {:.6e}, {} arrivals", order, pa.probability, pa.arrival_times.len());
            assert_eq!(pa, pb);
        }
    }

    #[test]
    fn unreachable_when_candidates_scarce() {
        let settings = SamplerSettings {
            trials: 1_000,
            min_candidates_direct: 1_000,
            ..Default::default()
        };
        let prober = Prober::new(Detector::default(), settings);
        let probe = prober
            .probe(ThreeVector::new(1.0, 2.0, 3.0), PmtAngles::new(0.5, 0.5), ReflectionOrder::Direct, 50)
            .unwrap();
        assert_eq!(probe, Probe::unreachable());
        assert!(probe.is_unreachable());
        assert_eq!(probe.mean_time(), 0.0);
        assert_eq!(probe.std_time(), 0.0);
    }

    #[test]
    fn preconditions() {
        let prober = Prober::new(Detector::default(), SamplerSettings {trials: 100, ..Default::default()});
        let pmt = PmtAngles::new(0.0, 0.0);

        let outside = prober.probe(ThreeVector::new(0.0, 0.0, 18.0), pmt, ReflectionOrder::Direct, 10);
        assert!(matches!(outside, Err(ProbeError::OutsideDetector(_))));

        let coarse = prober.probe(ThreeVector::new(0.0, 0.0, 1.0), pmt, ReflectionOrder::Direct, 0);
        assert!(matches!(coarse, Err(ProbeError::Refinement(0))));
    }

    #[test]
    fn timing_statistics() {
        let probe = Probe {probability: 0.1, arrival_times: vec![1.0, 2.0, 3.0, 4.0]};
        assert_eq!(probe.mean_time(), 2.5);
        assert!((probe.std_time() - 1.25f64.sqrt()).abs() < 1.0e-15);
    }
}
