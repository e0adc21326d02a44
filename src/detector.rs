//! Fixed geometry and optical properties of the detector

use std::fmt;

use crate::constants::*;
use crate::geometry::*;

/// A sphere of liquid scintillator, immersed in water and
/// surrounded by a concentric shell of PMTs.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Detector {
    /// Radius of the LS sphere, Ri
    pub ls_radius: f64,
    /// Radius of the PMT shell, Ro
    pub shell_radius: f64,
    /// Radius of a single PMT photocathode
    pub pmt_radius: f64,
    pub n_water: f64,
    pub n_ls: f64,
    pub n_glass: f64,
    /// Speed of light in vacuum
    pub c: f64,
}

impl Default for Detector {
    fn default() -> Self {
        Detector {
            ls_radius: LS_RADIUS,
            shell_radius: PMT_SHELL_RADIUS,
            pmt_radius: PMT_RADIUS,
            n_water: WATER_REFRACTIVE_INDEX,
            n_ls: LS_REFRACTIVE_INDEX,
            n_glass: GLASS_REFRACTIVE_INDEX,
            c: SPEED_OF_LIGHT,
        }
    }
}

impl fmt::Display for Detector {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f,
            "Ri = {} m, Ro = {} m, r_PMT = {} m, n_LS = {}, n_water = {}, n_glass = {}",
            self.ls_radius, self.shell_radius, self.pmt_radius, self.n_ls, self.n_water, self.n_glass,
        )
    }
}

impl Detector {
    /// Smallest angle of incidence at which light in the LS
    /// is totally internally reflected at the LS/water boundary
    pub fn critical_angle(&self) -> f64 {
        (self.n_water / self.n_ls).asin()
    }

    /// Position of the centre of the PMT at `pmt`
    pub fn pmt_position(&self, pmt: PmtAngles) -> ThreeVector {
        ThreeVector::from_spherical(self.shell_radius, pmt.theta, pmt.phi)
    }

    /// Is `r` inside (or on the surface of) the LS sphere?
    /// A relative tolerance of 1e-12 absorbs rounding.
    pub fn contains(&self, r: ThreeVector) -> bool {
        r.norm() <= self.ls_radius * (1.0 + 1.0e-12)
    }

    /// Time taken to travel `length` in the LS
    pub fn time_in_ls(&self, length: f64) -> f64 {
        self.n_ls * length / self.c
    }

    /// Time taken to travel `length` in water
    pub fn time_in_water(&self, length: f64) -> f64 {
        self.n_water * length / self.c
    }
}
