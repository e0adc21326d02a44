//! The fixed, isotropic bundle of trial directions

use std::f64::consts;
use rand::prelude::*;

use crate::geometry::ThreeVector;
use crate::optics::RayBundle;

/// Directions distributed uniformly over the unit sphere, generated once
/// and then only read. Used to find the narrow cone of emission
/// directions that can reach a given PMT.
#[derive(Clone, Debug)]
pub struct TrialDirections {
    phi: Vec<f64>,
    theta: Vec<f64>,
    direction: Vec<ThreeVector>,
}

impl TrialDirections {
    /// Pseudorandomly generates `num` directions, with azimuth uniform
    /// in [0, 2π) and cos(θ) uniform in [-1, 1].
    pub fn generate<R: Rng>(num: usize, rng: &mut R) -> Self {
        let mut phi = Vec::with_capacity(num);
        let mut theta = Vec::with_capacity(num);
        let mut direction = Vec::with_capacity(num);

        for _i in 0..num {
            let p = 2.0 * consts::PI * rng.gen::<f64>();
            let t = (2.0 * rng.gen::<f64>() - 1.0).acos();
            phi.push(p);
            theta.push(t);
            direction.push(ThreeVector::from_spherical(1.0, t, p));
        }

        TrialDirections {phi, theta, direction}
    }

    pub fn len(&self) -> usize {
        self.direction.len()
    }

    pub fn is_empty(&self) -> bool {
        self.direction.is_empty()
    }

    /// Azimuthal and polar angle of the `i`-th direction
    pub fn angles(&self, i: usize) -> (f64, f64) {
        (self.phi[i], self.theta[i])
    }

    /// Emits one unit-intensity ray along every trial direction from `origin`.
    pub fn emit_from(&self, origin: ThreeVector) -> RayBundle {
        RayBundle::from_directions(origin, self.direction.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use rand_xoshiro::Xoshiro256StarStar;
    use super::*;

    #[test]
    fn isotropy() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(0);
        let trials = TrialDirections::generate(100_000, &mut rng);
        assert_eq!(trials.len(), 100_000);

        // mean direction vanishes, each <v_i^2> = 1/3
        let mut mean = ThreeVector::new(0.0, 0.0, 0.0);
        let mut z_sqd = 0.0;
        for i in 0..trials.len() {
            let (phi, theta) = trials.angles(i);
            let v = ThreeVector::from_spherical(1.0, theta, phi);
            mean = mean + v;
            z_sqd += v[2] * v[2];
        }
        let mean = mean / (trials.len() as f64);
        let z_sqd = z_sqd / (trials.len() as f64);
        println!("<v> = {}, <v_z^2> = {:.4}", mean, z_sqd);
        assert!(mean.norm() < 0.01);
        assert!((z_sqd - 1.0 / 3.0).abs() < 0.01);
    }

    #[test]
    fn reproducible() {
        let a = TrialDirections::generate(100, &mut Xoshiro256StarStar::seed_from_u64(12));
        let b = TrialDirections::generate(100, &mut Xoshiro256StarStar::seed_from_u64(12));
        assert_eq!(a.phi, b.phi);
        assert_eq!(a.theta, b.theta);
    }
}
