//! Rays and ray bundles

use std::iter::FromIterator;

use crate::geometry::ThreeVector;

/// A single optical ray, carrying a fraction of the weight
/// of the photon that was emitted at its origin.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Ray {
    position: ThreeVector,
    direction: ThreeVector,
    intensity: f64,
    time: f64,
}

impl Ray {
    /// Creates a ray of unit intensity at `position`, travelling
    /// along `direction`, at time zero.
    pub fn emit(position: ThreeVector, direction: ThreeVector) -> Self {
        Ray {
            position,
            direction: direction.normalize(),
            intensity: 1.0,
            time: 0.0,
        }
    }

    /// Moves the ray along its direction to `position`,
    /// arriving at `time`.
    pub(crate) fn advanced_to(self, position: ThreeVector, time: f64) -> Self {
        Ray {
            position,
            time,
            ..self
        }
    }

    /// Changes direction at the current position. `direction`
    /// must already be normalized.
    pub(crate) fn redirected(self, direction: ThreeVector) -> Self {
        Ray {
            direction,
            ..self
        }
    }

    /// Scales the intensity by `factor`, which must be in [0, 1].
    pub(crate) fn attenuated(self, factor: f64) -> Self {
        Ray {
            intensity: self.intensity * factor,
            ..self
        }
    }

    pub fn position(&self) -> ThreeVector {
        self.position
    }

    pub fn direction(&self) -> ThreeVector {
        self.direction
    }

    /// Fraction of the original photon weight carried by this ray
    pub fn intensity(&self) -> f64 {
        self.intensity
    }

    /// Time elapsed since emission, in seconds
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Has all of the ray's weight been lost, e.g. by
    /// total internal reflection?
    pub fn is_extinguished(&self) -> bool {
        self.intensity <= 0.0
    }

    /// Returns the distance of closest approach, over the ray's future,
    /// to `point`. The distance is negative if the ray is already
    /// moving away from `point`.
    pub fn closest_approach(&self, point: ThreeVector) -> f64 {
        let (s, distance) = self.approach(point);
        if s < 0.0 {
            -distance
        } else {
            distance
        }
    }

    /// Returns the path length to the point of closest approach to `point`
    /// (negative if that lies behind the ray) and the unsigned distance
    /// between the two.
    pub(crate) fn approach(&self, point: ThreeVector) -> (f64, f64) {
        let s = (point - self.position) * self.direction;
        let nearest = self.position + s * self.direction;
        (s, (nearest - point).norm())
    }
}

/// An ordered batch of independent rays. Every transport stage
/// returns new bundles whose `i`-th ray descends from the `i`-th
/// ray of the input.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RayBundle {
    rays: Vec<Ray>,
}

impl RayBundle {
    /// Emits one unit-intensity ray from `origin` along each
    /// of the given directions.
    pub fn from_directions<I>(origin: ThreeVector, directions: I) -> Self
    where I: IntoIterator<Item = ThreeVector> {
        directions.into_iter()
            .map(|v| Ray::emit(origin, v))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rays.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Ray> {
        self.rays.iter()
    }

    pub fn rays(&self) -> &[Ray] {
        &self.rays
    }

    /// Sum of the intensities of all rays
    pub fn total_intensity(&self) -> f64 {
        self.rays.iter().map(|ray| ray.intensity).sum()
    }
}

impl FromIterator<Ray> for RayBundle {
    fn from_iter<I: IntoIterator<Item = Ray>>(iter: I) -> Self {
        RayBundle {
            rays: iter.into_iter().collect(),
        }
    }
}

impl From<Vec<Ray>> for RayBundle {
    fn from(rays: Vec<Ray>) -> Self {
        RayBundle {rays}
    }
}

impl<'a> IntoIterator for &'a RayBundle {
    type Item = &'a Ray;
    type IntoIter = std::slice::Iter<'a, Ray>;
    fn into_iter(self) -> Self::IntoIter {
        self.rays.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_approach() {
        let target = ThreeVector::new(10.0, 0.0, 0.0);

        let approaching = Ray::emit(ThreeVector::new(0.0, 1.0, 0.0), ThreeVector::new(1.0, 0.0, 0.0));
        let d = approaching.closest_approach(target);
        println!("approaching: d = {}", d);
        assert!((d - 1.0).abs() < 1.0e-12);

        let receding = Ray::emit(ThreeVector::new(0.0, 1.0, 0.0), ThreeVector::new(-1.0, 0.0, 0.0));
        let d = receding.closest_approach(target);
        println!("receding: d = {}", d);
        assert!((d + 1.0).abs() < 1.0e-12);
    }

    #[test]
    fn emission() {
        let origin = ThreeVector::new(1.0, 2.0, 3.0);
        let bundle = RayBundle::from_directions(origin, vec![
            ThreeVector::new(2.0, 0.0, 0.0),
            ThreeVector::new(0.0, -3.0, 4.0),
        ]);
        assert_eq!(bundle.len(), 2);
        assert_eq!(bundle.total_intensity(), 2.0);
        for ray in &bundle {
            assert_eq!(ray.position(), origin);
            assert_eq!(ray.time(), 0.0);
            assert!((ray.direction().norm() - 1.0).abs() < 1.0e-15);
        }
    }
}
