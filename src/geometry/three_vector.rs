//! Defines a spatial 3-vector: (x, y, z)

use std::f64::consts;

/// A three-vector
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ThreeVector {
    x: f64,
    y: f64,
    z: f64,
}

impl ThreeVector {
    /// Creates a new three-vector with the specified components.
    pub fn new(x: f64, y: f64, z: f64) -> ThreeVector {
        ThreeVector {x, y, z}
    }

    /// Creates a three-vector from spherical coordinates, where
    /// `theta` is the polar angle measured from +z and `phi`
    /// the azimuthal angle measured from +x.
    pub fn from_spherical(r: f64, theta: f64, phi: f64) -> ThreeVector {
        let (sin_theta, cos_theta) = theta.sin_cos();
        let (sin_phi, cos_phi) = phi.sin_cos();
        ThreeVector {
            x: r * sin_theta * cos_phi,
            y: r * sin_theta * sin_phi,
            z: r * cos_theta,
        }
    }

    /// Returns the spherical coordinates `(r, theta, phi)` of `self`,
    /// with `theta` in [0, π] and `phi` in [0, 2π).
    /// On the polar axis `phi` is zero; at the origin, so is `theta`.
    pub fn to_spherical(self) -> (f64, f64, f64) {
        let r = self.norm();
        if r == 0.0 {
            return (0.0, 0.0, 0.0);
        }
        let theta = (self.z / r).max(-1.0).min(1.0).acos();
        let phi = self.y.atan2(self.x).rem_euclid(2.0 * consts::PI);
        (r, theta, phi)
    }

    /// Returns the squared magnitude of the three-vector.
    pub fn norm_sqr(self) -> f64 {
        self * self
    }

    /// Returns the magnitude of the three-vector.
    pub fn norm(self) -> f64 {
        self.norm_sqr().sqrt()
    }

    /// Returns a new three-vector which has the same direction,
    /// but unit magnitude.
    ///
    /// # Panics
    /// If `self` does not have positive definite norm.
    pub fn normalize(self) -> Self {
        let mag = self.norm();
        assert!(mag > 0.0);
        self / mag
    }

    /// Rotates `self` around the given `axis` by an angle `theta`,
    /// with positive angles corresponding to a right-handed rotation,
    /// and returns the result. The axis must be correctly normalized.
    pub fn rotate_around(self, axis: ThreeVector, theta: f64) -> Self {
        let (s, c) = theta.sin_cos();
        ThreeVector::new(
            (c + axis.x * axis.x * (1.0-c)) * self.x
                + (axis.x * axis.y * (1.0-c) - axis.z * s) * self.y
                + (axis.x * axis.z * (1.0-c) + axis.y * s) * self.z,
            (axis.y * axis.x * (1.0-c) + axis.z * s) * self.x
                + (c + axis.y * axis.y * (1.0-c)) * self.y
                + (axis.y * axis.z * (1.0-c) - axis.x * s) * self.z,
            (axis.z * axis.x * (1.0-c) - axis.y * s) * self.x
                + (axis.z * axis.y * (1.0-c) + axis.x * s) * self.y
                + (c + axis.z * axis.z * (1.0-c)) * self.z
        )
    }

    /// Rotates `self` around the y-axis by angle `theta` and returns
    /// the result.
    pub fn rotate_around_y(self, theta: f64) -> Self {
        self.rotate_around(ThreeVector::new(0.0, 1.0, 0.0), theta)
    }

    /// Rotates `self` around the z-axis by angle `theta` and returns
    /// the result.
    pub fn rotate_around_z(self, theta: f64) -> Self {
        self.rotate_around(ThreeVector::new(0.0, 0.0, 1.0), theta)
    }
}

impl std::ops::Index<i32> for ThreeVector {
    type Output = f64;
    fn index(&self, index: i32) -> &Self::Output {
        match index {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            _ => panic!("index out of bounds: a three vector has 3 components but the index is {}", index)
        }
    }
}

impl std::fmt::Display for ThreeVector {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "({:.6e}, {:.6e}, {:.6e})", self.x, self.y, self.z)
    }
}

impl std::ops::Add for ThreeVector {
    type Output = ThreeVector;
    fn add(self, other: ThreeVector) -> ThreeVector {
        ThreeVector {x: self.x + other.x, y: self.y + other.y, z: self.z + other.z}
    }
}

impl std::ops::Sub for ThreeVector {
    type Output = ThreeVector;
    fn sub(self, other: ThreeVector) -> ThreeVector {
        ThreeVector {x: self.x - other.x, y: self.y - other.y, z: self.z - other.z}
    }
}

/// Scalar product
impl std::ops::Mul for ThreeVector {
    type Output = f64;
    fn mul(self, other: ThreeVector) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }
}

impl std::ops::Mul<f64> for ThreeVector {
    type Output = ThreeVector;
    fn mul(self, other: f64) -> ThreeVector {
        ThreeVector {x: self.x * other, y: self.y * other, z: self.z * other}
    }
}

impl std::ops::Mul<ThreeVector> for f64 {
    type Output = ThreeVector;
    fn mul(self, other: ThreeVector) -> ThreeVector {
        ThreeVector {x: self * other.x, y: self * other.y, z: self * other.z}
    }
}

impl std::ops::Neg for ThreeVector {
    type Output = ThreeVector;
    fn neg(self) -> ThreeVector {
        -1.0 * self
    }
}

impl std::ops::Div<f64> for ThreeVector {
    type Output = ThreeVector;
    fn div(self, other: f64) -> ThreeVector {
        ThreeVector {x: self.x / other, y: self.y / other, z: self.z / other}
    }
}

#[cfg(test)]
mod tests {
    use rand::prelude::*;
    use rand_xoshiro::Xoshiro256StarStar;
    use super::*;

    #[test]
    fn rotation() {
        let v = ThreeVector::new(1.0, 0.0, 0.0); // along x
        let v = v.rotate_around_z(consts::FRAC_PI_2); // along y
        let v = v.rotate_around(ThreeVector::new(1.0, 0.0, 0.0), consts::FRAC_PI_2); // along z
        println!("v = {:?}", v);
        let target = ThreeVector::new(0.0, 0.0, 1.0);
        assert!((v - target).norm() < 1.0e-10);

        let w = target.rotate_around_y(consts::FRAC_PI_2); // along x
        println!("w = {:?}", w);
        assert!((w - ThreeVector::new(1.0, 0.0, 0.0)).norm() < 1.0e-10);
    }

    #[test]
    fn spherical_round_trip() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(7);
        for _i in 0..1000 {
            let p = ThreeVector::new(
                20.0 * (rng.gen::<f64>() - 0.5),
                20.0 * (rng.gen::<f64>() - 0.5),
                20.0 * (rng.gen::<f64>() - 0.5),
            );
            let (r, theta, phi) = p.to_spherical();
            assert!(theta >= 0.0 && theta <= consts::PI);
            assert!(phi >= 0.0 && phi < 2.0 * consts::PI);
            let q = ThreeVector::from_spherical(r, theta, phi);
            let error = (p - q).norm() / p.norm();
            if error > 1.0e-12 {
                println!("p = {}, q = {}, error = {:.3e}", p, q, error);
            }
            assert!(error < 1.0e-12);
        }
    }

    #[test]
    fn spherical_axes() {
        let north = ThreeVector::from_spherical(19.5, 0.0, 0.0);
        assert!((north - ThreeVector::new(0.0, 0.0, 19.5)).norm() < 1.0e-12);

        let west = ThreeVector::from_spherical(1.0, consts::FRAC_PI_2, consts::PI);
        assert!((west - ThreeVector::new(-1.0, 0.0, 0.0)).norm() < 1.0e-12);

        let (r, theta, phi) = ThreeVector::new(0.0, -2.0, 0.0).to_spherical();
        println!("r = {}, theta = {}, phi = {}", r, theta, phi);
        assert_eq!(r, 2.0);
        assert!((theta - consts::FRAC_PI_2).abs() < 1.0e-12);
        assert!((phi - 1.5 * consts::PI).abs() < 1.0e-12);

        assert_eq!(ThreeVector::new(0.0, 0.0, 0.0).to_spherical(), (0.0, 0.0, 0.0));
    }
}
