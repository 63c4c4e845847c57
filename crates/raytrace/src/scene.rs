//! Scenes: bodies, the pixel grid framing them, and the maps a trace produces.

use std::fmt;
use std::str::FromStr;

use exotrace_core::vector::{self, Vector3};
use exotrace_core::{Grid, linspace};
use thiserror::Error;

use crate::body::Body;
use crate::ray::{Ray, intersect};

pub const DEFAULT_RESOLUTION: usize = 100;

#[derive(Debug, Error, PartialEq)]
pub enum TraceError {
    #[error("resolution must be at least 2, got {0}")]
    InvalidResolution(usize),
    #[error("radius must be positive and finite, got {0}")]
    InvalidRadius(f64),
    #[error("no body at index {0}")]
    UnknownBody(usize),
    #[error("unknown scene array `{0}` (expected flux, mu, or t)")]
    UnknownArray(String),
}

/// Per-pixel products of a trace. Rows follow y, columns follow x.
#[derive(Debug, Clone)]
pub struct SceneMaps {
    /// Emitted intensity of the nearest body; NaN where no body was hit.
    pub flux: Grid<f64>,
    /// Limb-angle cosine at the hit point; NaN where no body was hit.
    pub mu: Grid<f64>,
    /// Distance from the ray origin to the hit; infinite on a miss.
    pub t: Grid<f64>,
    /// Index of the nearest body.
    pub body: Grid<Option<usize>>,
}

impl SceneMaps {
    fn new(resolution: usize) -> Self {
        Self {
            flux: Grid::filled(resolution, resolution, f64::NAN),
            mu: Grid::filled(resolution, resolution, f64::NAN),
            t: Grid::filled(resolution, resolution, f64::INFINITY),
            body: Grid::filled(resolution, resolution, None),
        }
    }

    fn reset(&mut self) {
        self.flux.fill(f64::NAN);
        self.mu.fill(f64::NAN);
        self.t.fill(f64::INFINITY);
        self.body.fill(None);
    }

    /// Number of pixels that hit a body.
    pub fn hits(&self) -> usize {
        self.body.values().filter(|b| b.is_some()).count()
    }
}

/// Scene maps that can be rendered as a heatmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneArray {
    Flux,
    Mu,
    T,
}

impl SceneArray {
    pub fn select<'a>(&self, maps: &'a SceneMaps) -> &'a Grid<f64> {
        match self {
            SceneArray::Flux => &maps.flux,
            SceneArray::Mu => &maps.mu,
            SceneArray::T => &maps.t,
        }
    }
}

impl FromStr for SceneArray {
    type Err = TraceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "flux" => Ok(SceneArray::Flux),
            "mu" => Ok(SceneArray::Mu),
            "t" => Ok(SceneArray::T),
            other => Err(TraceError::UnknownArray(other.to_string())),
        }
    }
}

impl fmt::Display for SceneArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SceneArray::Flux => "flux",
            SceneArray::Mu => "mu",
            SceneArray::T => "t",
        };
        f.write_str(name)
    }
}

/// Bodies viewed along -z by an orthographic camera framing all of them.
#[derive(Debug, Clone)]
pub struct Scene {
    bodies: Vec<Body>,
    resolution: usize,
    extent: (f64, f64),
    framing: Option<(f64, f64)>,
    x: Vec<f64>,
    y: Vec<f64>,
    z_max: f64,
    z_min: f64,
    maps: SceneMaps,
}

impl Default for Scene {
    fn default() -> Self {
        Self::build(DEFAULT_RESOLUTION)
    }
}

impl Scene {
    pub fn new(resolution: usize) -> Result<Self, TraceError> {
        if resolution < 2 {
            return Err(TraceError::InvalidResolution(resolution));
        }
        Ok(Self::build(resolution))
    }

    fn build(resolution: usize) -> Self {
        let mut scene = Self {
            bodies: Vec::new(),
            resolution,
            extent: (-1.0, 1.0),
            framing: None,
            x: Vec::new(),
            y: Vec::new(),
            z_max: f64::INFINITY,
            z_min: f64::NEG_INFINITY,
            maps: SceneMaps::new(resolution),
        };
        scene.update_extent();
        scene
    }

    pub fn add(&mut self, body: impl Into<Body>) {
        self.bodies.push(body.into());
        self.update_extent();
    }

    pub fn extend<I>(&mut self, bodies: I)
    where
        I: IntoIterator<Item = Body>,
    {
        self.bodies.extend(bodies);
        self.update_extent();
    }

    /// Take a body out of the scene. Later indices shift down by one.
    pub fn remove(&mut self, index: usize) -> Result<Body, TraceError> {
        if index >= self.bodies.len() {
            return Err(TraceError::UnknownBody(index));
        }
        let body = self.bodies.remove(index);
        self.update_extent();
        Ok(body)
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn body(&self, index: usize) -> Result<&Body, TraceError> {
        self.bodies.get(index).ok_or(TraceError::UnknownBody(index))
    }

    /// Mutable access to a body. The framing is refreshed on the next trace.
    pub fn body_mut(&mut self, index: usize) -> Result<&mut Body, TraceError> {
        self.bodies
            .get_mut(index)
            .ok_or(TraceError::UnknownBody(index))
    }

    /// Index of the first body with the given name (case-insensitive).
    pub fn find(&self, name: &str) -> Option<usize> {
        self.bodies
            .iter()
            .position(|b| b.name().eq_ignore_ascii_case(name))
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    /// `(low, high)` bounds shared by both sky axes.
    pub fn extent(&self) -> (f64, f64) {
        self.extent
    }

    /// Sky bounds pinned by [`Scene::set_framing`], if any.
    pub fn framing(&self) -> Option<(f64, f64)> {
        self.framing
    }

    /// Pin the sky bounds so the pixel grid stays put while bodies move.
    /// `None` goes back to framing every body.
    pub fn set_framing(&mut self, framing: Option<(f64, f64)>) {
        self.framing = framing;
        self.update_extent();
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn y(&self) -> &[f64] {
        &self.y
    }

    /// Height of the ray origins above the sky plane.
    pub fn z_max(&self) -> f64 {
        self.z_max
    }

    pub fn maps(&self) -> &SceneMaps {
        &self.maps
    }

    /// Side length of one pixel in scene units.
    pub fn pixel_size(&self) -> f64 {
        (self.extent.1 - self.extent.0) / (self.resolution - 1) as f64
    }

    /// Flux summed over the image, weighted by pixel area.
    pub fn total_flux(&self) -> f64 {
        let area = self.pixel_size().powi(2);
        self.maps
            .flux
            .values()
            .filter(|v| v.is_finite())
            .sum::<f64>()
            * area
    }

    /// Cast one ray per pixel and record the nearest hit.
    pub fn trace(&mut self) {
        self.update_extent();
        self.maps.reset();
        if self.bodies.is_empty() {
            return;
        }

        let Scene {
            bodies,
            x,
            y,
            z_max,
            z_min,
            maps,
            ..
        } = self;

        for (j, &py) in y.iter().enumerate() {
            for (i, &px) in x.iter().enumerate() {
                let origin = [px, py, *z_max];
                let Some(ray) = Ray::towards(origin, [px, py, *z_min]) else {
                    continue;
                };
                let mut t_min = f64::INFINITY;
                for (index, body) in bodies.iter().enumerate() {
                    let center = body.center();
                    let Some(t) = intersect(&ray, &center, body.radius()) else {
                        continue;
                    };
                    if t >= t_min {
                        continue;
                    }
                    t_min = t;
                    let hit = ray.at(t);
                    let outward = vector::sub(&hit, &center);
                    let mu = limb_cosine(&ray.u, &outward);
                    let normal = vector::normalize(&outward).unwrap_or([0.0, 0.0, 1.0]);
                    maps.body[(j, i)] = Some(index);
                    maps.t[(j, i)] = t;
                    maps.mu[(j, i)] = mu;
                    maps.flux[(j, i)] = body.intensity(&normal, mu);
                }
            }
        }

        tracing::debug!(
            bodies = bodies.len(),
            resolution = x.len(),
            hits = maps.hits(),
            "scene traced"
        );
    }

    fn update_extent(&mut self) {
        if self.bodies.is_empty() {
            self.extent = (-1.0, 1.0);
            self.z_max = f64::INFINITY;
            self.z_min = f64::NEG_INFINITY;
        } else {
            let (mut xmin, mut ymin, mut z_min) = (f64::INFINITY, f64::INFINITY, f64::INFINITY);
            let (mut xmax, mut ymax, mut z_max) =
                (f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY);
            for body in &self.bodies {
                let [cx, cy, cz] = body.center();
                let r = body.radius();
                xmin = xmin.min(cx - r);
                xmax = xmax.max(cx + r);
                ymin = ymin.min(cy - r);
                ymax = ymax.max(cy + r);
                z_min = z_min.min(cz - r);
                z_max = z_max.max(cz + r);
            }
            self.z_max = z_max;
            self.z_min = z_min;
            self.extent = (xmin.min(ymin), xmax.max(ymax));
        }
        if let Some(framing) = self.framing {
            self.extent = framing;
        }
        self.x = linspace(self.extent.0, self.extent.1, self.resolution);
        self.y = linspace(self.extent.0, self.extent.1, self.resolution);
    }
}

/// Cosine between the direction back toward the observer and the outward normal.
fn limb_cosine(u: &Vector3, outward: &Vector3) -> f64 {
    let back = vector::scale(u, -1.0);
    let n = vector::norm(outward);
    if n == 0.0 {
        return f64::NAN;
    }
    vector::dot(&back, outward) / n
}
