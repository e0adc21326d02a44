//! Orientation of a vertex/PMT pair relative to the detector centre

use std::f64::consts;
use std::fmt;

use super::ThreeVector;

/// Angular position of a PMT on the PMT shell, as seen
/// from the detector centre
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PmtAngles {
    /// Azimuthal angle, measured from +x
    pub phi: f64,
    /// Polar angle, measured from +z
    pub theta: f64,
}

impl PmtAngles {
    pub fn new(phi: f64, theta: f64) -> Self {
        PmtAngles {phi, theta}
    }

    /// Angles of the PMT whose centre lies in the direction of `r`
    pub fn towards(r: ThreeVector) -> Self {
        let (_, theta, phi) = r.to_spherical();
        PmtAngles {phi, theta}
    }

    /// Unit vector pointing from the detector centre to the PMT
    pub fn unit_vector(&self) -> ThreeVector {
        ThreeVector::from_spherical(1.0, self.theta, self.phi)
    }
}

impl fmt::Display for PmtAngles {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "(phi = {:.4} rad, theta = {:.4} rad)", self.phi, self.theta)
    }
}

/// Number of times a ray is reflected at the inner surface
/// of the LS sphere before it escapes into the water
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ReflectionOrder {
    Direct,
    OnceReflected,
}

impl fmt::Display for ReflectionOrder {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ReflectionOrder::Direct => write!(f, "direct"),
            ReflectionOrder::OnceReflected => write!(f, "once-reflected"),
        }
    }
}

impl ReflectionOrder {
    /// Number of internal reflections
    pub fn reflections(&self) -> usize {
        match self {
            ReflectionOrder::Direct => 0,
            ReflectionOrder::OnceReflected => 1,
        }
    }

    /// Where the PMT is placed before rays are traced.
    /// Both sit on the equator, well away from the coordinate poles,
    /// and away from the φ = 0 seam for direct light.
    pub fn canonical_angles(&self) -> PmtAngles {
        match self {
            ReflectionOrder::Direct => PmtAngles::new(consts::PI, consts::FRAC_PI_2),
            ReflectionOrder::OnceReflected => PmtAngles::new(0.0, consts::FRAC_PI_2),
        }
    }

    /// Rigidly rotates the pair (`vertex`, `pmt`) so that the PMT lands
    /// on `self.canonical_angles()`. Returns the rotated vertex and the
    /// canonical angles; the vertex is untouched if the PMT is already
    /// in place.
    pub fn canonicalize(&self, vertex: ThreeVector, pmt: PmtAngles) -> (ThreeVector, PmtAngles) {
        let target = self.canonical_angles();

        if pmt.phi == target.phi && pmt.theta == target.theta {
            return (vertex, target);
        }

        // Bring the PMT into the xz-plane at the target azimuth,
        // then tip it down to the equator.
        let rotated = vertex.rotate_around_z(target.phi - pmt.phi);
        let rotated = match self {
            ReflectionOrder::Direct => rotated.rotate_around_y(pmt.theta - consts::FRAC_PI_2),
            ReflectionOrder::OnceReflected => rotated.rotate_around_y(consts::FRAC_PI_2 - pmt.theta),
        };

        (rotated, target)
    }
}
