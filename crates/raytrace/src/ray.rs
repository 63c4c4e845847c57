//! Rays and line-sphere intersection.

use exotrace_core::vector::{self, Vector3};

/// Roots this close below zero count as hits at the origin. Ray origins sit on
/// the top of the front-most sphere, where rounding can push the root negative.
const SURFACE_EPS: f64 = 1e-12;

/// Half-line starting at `origin` heading along the unit vector `u`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vector3,
    pub u: Vector3,
}

impl Ray {
    /// Ray from `origin` toward `target`; `None` when the two points coincide.
    pub fn towards(origin: Vector3, target: Vector3) -> Option<Self> {
        let u = vector::normalize(&vector::sub(&target, &origin))?;
        Some(Self { origin, u })
    }

    /// Point reached after travelling distance `t`.
    pub fn at(&self, t: f64) -> Vector3 {
        vector::add(&self.origin, &vector::scale(&self.u, t))
    }
}

/// Distance along `ray` to the first crossing of the sphere, if any.
///
/// When the origin is inside the sphere the exit point is returned. Spheres
/// entirely behind the origin are misses.
///
/// Solved from the point of closest approach: for a ray along an axis the miss
/// distance is exact, so whether a pixel hits does not depend on how far away
/// the ray starts.
pub fn intersect(ray: &Ray, center: &Vector3, radius: f64) -> Option<f64> {
    let a = vector::dot(&ray.u, &ray.u);
    if a == 0.0 {
        return None;
    }
    let origin_center = vector::sub(&ray.origin, center);
    let t_closest = -vector::dot(&ray.u, &origin_center) / a;
    let closest = vector::add(&origin_center, &vector::scale(&ray.u, t_closest));
    let miss2 = vector::dot(&closest, &closest);
    let radius2 = radius * radius;
    if miss2 > radius2 {
        return None;
    }
    let half_chord = ((radius2 - miss2) / a).sqrt();
    let t1 = t_closest - half_chord;
    let t2 = t_closest + half_chord;
    if t1 >= -SURFACE_EPS {
        Some(t1.max(0.0))
    } else if t2 >= -SURFACE_EPS {
        Some(t2.max(0.0))
    } else {
        None
    }
}
