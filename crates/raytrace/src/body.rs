//! Bodies a scene can hold.

use exotrace_core::vector::Vector3;
use exotrace_star::Star;

use crate::scene::TraceError;

/// Opaque sphere that blocks light and emits none.
#[derive(Debug, Clone, PartialEq)]
pub struct Planet {
    pub name: String,
    pub center: Vector3,
    pub radius: f64,
}

impl Planet {
    pub fn new(name: impl Into<String>, center: Vector3, radius: f64) -> Result<Self, TraceError> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(TraceError::InvalidRadius(radius));
        }
        Ok(Self {
            name: name.into(),
            center,
            radius,
        })
    }
}

#[derive(Debug, Clone)]
pub enum Body {
    Star(Star),
    Planet(Planet),
}

impl Body {
    pub fn name(&self) -> &str {
        match self {
            Body::Star(star) => star.name(),
            Body::Planet(planet) => &planet.name,
        }
    }

    pub fn center(&self) -> Vector3 {
        match self {
            Body::Star(star) => star.center(),
            Body::Planet(planet) => planet.center,
        }
    }

    pub fn set_center(&mut self, center: Vector3) {
        match self {
            Body::Star(star) => star.set_center(center),
            Body::Planet(planet) => planet.center = center,
        }
    }

    pub fn radius(&self) -> f64 {
        match self {
            Body::Star(star) => star.radius(),
            Body::Planet(planet) => planet.radius,
        }
    }

    /// Intensity leaving the surface element with outward `normal` at limb cosine `mu`.
    pub fn intensity(&self, normal: &Vector3, mu: f64) -> f64 {
        match self {
            Body::Star(star) => star.intensity(normal, mu),
            Body::Planet(_) => 0.0,
        }
    }

    pub fn as_star(&self) -> Option<&Star> {
        match self {
            Body::Star(star) => Some(star),
            Body::Planet(_) => None,
        }
    }

    pub fn as_star_mut(&mut self) -> Option<&mut Star> {
        match self {
            Body::Star(star) => Some(star),
            Body::Planet(_) => None,
        }
    }

    pub fn is_planet(&self) -> bool {
        matches!(self, Body::Planet(_))
    }
}

impl From<Star> for Body {
    fn from(star: Star) -> Self {
        Body::Star(star)
    }
}

impl From<Planet> for Body {
    fn from(planet: Planet) -> Self {
        Body::Planet(planet)
    }
}
