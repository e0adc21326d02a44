//! Propagation of rays from inside the LS sphere to its boundary

use crate::detector::Detector;
use crate::error::ProbeError;
use crate::geometry::ReflectionOrder;
use super::{Ray, RayBundle, fresnel};

/// Relative size of a negative discriminant that is put
/// down to rounding and treated as zero
const DISCRIMINANT_TOLERANCE: f64 = 1.0e-12;

/// The two bundles produced when a bundle reaches the LS boundary
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BoundaryCrossing {
    /// Rays refracted into the water
    pub transmitted: RayBundle,
    /// Rays reflected back into the LS
    pub reflected: RayBundle,
}

/// Splits a single ray at the point where it reaches the LS boundary,
/// returning the transmitted and reflected parts.
fn cross_boundary(detector: &Detector, ray: &Ray) -> Result<(Ray, Ray), ProbeError> {
    let ri = detector.ls_radius;
    let r = ray.position();
    let v = ray.direction();

    // |r + t v|^2 = Ri^2, with |v| = 1
    let cv = r * v;
    let discriminant = cv * cv - (r.norm_sqr() - ri * ri);
    let discriminant = if discriminant >= 0.0 {
        discriminant
    } else if discriminant > -DISCRIMINANT_TOLERANCE * ri * ri {
        0.0
    } else {
        return Err(ProbeError::DegenerateRay(r, v));
    };

    let t = (-cv + discriminant.sqrt()).max(0.0);
    let edge = r + t * v;
    let arrived = ray.advanced_to(edge, ray.time() + detector.time_in_ls(t));

    // pointing back into the LS
    let normal = -edge / ri;
    let cos_i = (-(v * normal)).min(1.0);
    let incidence = cos_i.acos();
    let reflected_direction = fresnel::reflect(v, normal);

    if incidence >= detector.critical_angle() {
        let transmitted = arrived.attenuated(0.0);
        let reflected = arrived.redirected(reflected_direction);
        return Ok((transmitted, reflected));
    }

    let eta = detector.n_ls / detector.n_water;
    let cos_t = (1.0 - eta * eta * (1.0 - cos_i * cos_i)).max(0.0).sqrt();
    let reflectance = fresnel::reflectance(detector.n_ls, detector.n_water, cos_i, cos_t);

    let transmitted = arrived
        .redirected(fresnel::refract(v, normal, eta, cos_i, cos_t))
        .attenuated(1.0 - reflectance);
    let reflected = arrived
        .redirected(reflected_direction)
        .attenuated(reflectance);

    Ok((transmitted, reflected))
}

/// Carries every ray in `bundle`, which must start inside the LS sphere,
/// to the LS boundary, where it is split into a part that is refracted
/// into the water and a part that is reflected back into the LS.
///
/// Totally internally reflected rays appear in the transmitted bundle
/// with zero intensity, so that the two output bundles stay aligned
/// with the input.
pub fn transport_to_boundary(detector: &Detector, bundle: &RayBundle) -> Result<BoundaryCrossing, ProbeError> {
    let mut transmitted = Vec::with_capacity(bundle.len());
    let mut reflected = Vec::with_capacity(bundle.len());

    for ray in bundle {
        let (t, r) = cross_boundary(detector, ray)?;
        transmitted.push(t);
        reflected.push(r);
    }

    Ok(BoundaryCrossing {
        transmitted: transmitted.into(),
        reflected: reflected.into(),
    })
}

/// Like [transport_to_boundary], but only for light that has been
/// reflected once at the boundary: the reflected part of the
/// first crossing is carried to the boundary again.
pub fn transport_with_one_reflection(detector: &Detector, bundle: &RayBundle) -> Result<BoundaryCrossing, ProbeError> {
    let first = transport_to_boundary(detector, bundle)?;
    transport_to_boundary(detector, &first.reflected)
}

/// Returns the light that escapes into the water after exactly
/// as many internal reflections as specified by `order`.
pub fn transport(detector: &Detector, bundle: &RayBundle, order: ReflectionOrder) -> Result<RayBundle, ProbeError> {
    let crossing = match order {
        ReflectionOrder::Direct => transport_to_boundary(detector, bundle)?,
        ReflectionOrder::OnceReflected => transport_with_one_reflection(detector, bundle)?,
    };
    Ok(crossing.transmitted)
}
