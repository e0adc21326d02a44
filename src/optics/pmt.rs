//! Detection of rays travelling in water by a PMT

use crate::detector::Detector;
use crate::geometry::ThreeVector;
use super::{Ray, RayBundle, fresnel};

/// Light collected by a single PMT
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Detection {
    /// Sum over detected rays of intensity × transmission into the glass
    pub intensity: f64,
    /// Arrival times of the detected rays, in seconds
    pub arrival_times: Vec<f64>,
}

impl Detection {
    /// Did any ray reach the photocathode?
    pub fn is_empty(&self) -> bool {
        self.arrival_times.is_empty()
    }
}

/// Follows a ray that is known to intersect the PMT sphere at `centre`
/// to its first crossing of that sphere, returning the arrival time
/// and the fraction of the ray's intensity that enters the glass.
fn enter_pmt(detector: &Detector, ray: &Ray, centre: ThreeVector) -> (f64, f64) {
    let r_pmt = detector.pmt_radius;
    let v = ray.direction();
    let rel = ray.position() - centre;

    // |rel + t v|^2 = r_PMT^2, taking the nearer root
    let b = rel * v;
    let discriminant = (b * b - rel.norm_sqr() + r_pmt * r_pmt).max(0.0);
    let t = (-b - discriminant.sqrt()).max(0.0);
    let time = ray.time() + detector.time_in_water(t);

    let normal = (rel + t * v) / r_pmt;
    let cos_i = (-(v * normal)).max(0.0).min(1.0);
    let transmission = match fresnel::refracted_cosine(detector.n_water, detector.n_glass, cos_i) {
        Some(cos_t) => 1.0 - fresnel::reflectance(detector.n_water, detector.n_glass, cos_i, cos_t),
        None => 0.0,
    };

    (time, transmission)
}

/// Determines which rays in `bundle`, all of which must be travelling
/// in water, strike the PMT centred at `centre`, and returns the total
/// intensity transmitted into the PMT glass, together with the arrival
/// times of the rays that strike it.
///
/// A bundle that misses the PMT entirely yields zero intensity and no
/// arrival times.
pub fn detect_at_pmt(detector: &Detector, bundle: &RayBundle, centre: ThreeVector) -> Detection {
    let mut detection = Detection::default();

    for ray in bundle.iter().filter(|ray| !ray.is_extinguished()) {
        let (s, d) = ray.approach(centre);
        if s <= 0.0 || d >= detector.pmt_radius {
            continue;
        }

        let (time, transmission) = enter_pmt(detector, ray, centre);
        detection.intensity += ray.intensity() * transmission;
        detection.arrival_times.push(time);
    }

    detection
}
