//! Reflection and refraction at a boundary between two media

use crate::geometry::ThreeVector;

/// Reflectance of unpolarized light, i.e. the average of the s- and
/// p-polarized reflectances, for light crossing from a medium with
/// refractive index `n1` into one with `n2`.
/// `cos_i` and `cos_t` are the cosines of the angles of incidence and
/// refraction respectively.
///
/// Equivalent to
/// ```text
/// Rs = [sin(t - i) / sin(t + i)]^2,  Rp = [tan(t - i) / tan(t + i)]^2
/// ```
/// but finite at normal incidence.
pub fn reflectance(n1: f64, n2: f64, cos_i: f64, cos_t: f64) -> f64 {
    let rs = (n1 * cos_i - n2 * cos_t) / (n1 * cos_i + n2 * cos_t);
    let rp = (n2 * cos_i - n1 * cos_t) / (n2 * cos_i + n1 * cos_t);
    0.5 * (rs * rs + rp * rp)
}

/// Cosine of the angle of refraction given by Snell's law, or `None`
/// if the light is totally internally reflected.
pub fn refracted_cosine(n1: f64, n2: f64, cos_i: f64) -> Option<f64> {
    let sin_t_sqd = (n1 / n2).powi(2) * (1.0 - cos_i * cos_i);
    if sin_t_sqd >= 1.0 {
        None
    } else {
        Some((1.0 - sin_t_sqd).sqrt())
    }
}

/// Mirrors `direction` in the surface with unit `normal`.
pub fn reflect(direction: ThreeVector, normal: ThreeVector) -> ThreeVector {
    direction - 2.0 * (direction * normal) * normal
}

/// Direction of the refracted ray, where `eta = n1 / n2` and `normal`
/// is the unit normal pointing back into the first medium
/// (so that `direction * normal = -cos_i`).
pub fn refract(direction: ThreeVector, normal: ThreeVector, eta: f64, cos_i: f64, cos_t: f64) -> ThreeVector {
    (eta * direction + (eta * cos_i - cos_t) * normal).normalize()
}
