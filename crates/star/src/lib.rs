//! Stellar surface model: a sphere carrying circular spots and quadratic limb darkening.
//!
//! Frames: the observer frame has x to the right, y up, and z toward the observer.
//! The body frame has the spin pole on +z. At inclination 90° the pole sits at
//! the top of the disk; at inclination 0° it faces the observer. The meridian is
//! the body longitude at the disk centre.

use exotrace_core::rotation::rotate_basis;
use exotrace_core::sphere::haversine_deg;
use exotrace_core::units::{deg_to_rad, rad_to_deg};
use exotrace_core::vector::{self, Vector3};
use exotrace_core::{Grid, linspace};
use thiserror::Error;

pub const DEFAULT_RESOLUTION: usize = 100;
pub const DEFAULT_INCLINATION_DEG: f64 = 90.0;

/// Errors raised while building or reconfiguring a star.
#[derive(Debug, Error, PartialEq)]
pub enum StarError {
    #[error("radius must be positive and finite, got {0}")]
    InvalidRadius(f64),
    #[error("resolution must be at least 2, got {0}")]
    InvalidResolution(usize),
    #[error("spin axis must have a non-zero projection on the sky plane")]
    InvalidAxis,
    #[error("spot fields must be finite with a non-negative radius")]
    InvalidSpot,
}

/// Circular starspot on the body-frame sphere.
///
/// Only [`Spot::new`] builds one, so every spot a star holds has finite fields
/// and a non-negative radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spot {
    lat_deg: f64,
    lon_deg: f64,
    radius_deg: f64,
    contrast: f64,
}

impl Spot {
    pub fn new(lat_deg: f64, lon_deg: f64, radius_deg: f64, contrast: f64) -> Result<Self, StarError> {
        let finite = [lat_deg, lon_deg, radius_deg, contrast]
            .iter()
            .all(|v| v.is_finite());
        if !finite || radius_deg < 0.0 {
            return Err(StarError::InvalidSpot);
        }
        Ok(Self {
            lat_deg,
            lon_deg,
            radius_deg,
            contrast,
        })
    }

    pub fn lat_deg(&self) -> f64 {
        self.lat_deg
    }

    pub fn lon_deg(&self) -> f64 {
        self.lon_deg
    }

    /// Angular radius of the cap, degrees.
    pub fn radius_deg(&self) -> f64 {
        self.radius_deg
    }

    /// Intensity inside the spot relative to the photosphere.
    pub fn contrast(&self) -> f64 {
        self.contrast
    }

    /// True when the surface point lies within the spot's angular radius.
    pub fn covers(&self, lat_deg: f64, lon_deg: f64) -> bool {
        haversine_deg(lat_deg, lon_deg, self.lat_deg, self.lon_deg) <= self.radius_deg
    }
}

/// Quadratic limb-darkening law `I(mu) = I0 (1 - u1 (1 - mu) - u2 (1 - mu)^2)`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LimbDarkening {
    pub u1: f64,
    pub u2: f64,
}

impl LimbDarkening {
    pub fn quadratic(u1: f64, u2: f64) -> Self {
        Self { u1, u2 }
    }

    /// Darken an emitted intensity at limb-angle cosine `mu`.
    #[inline]
    pub fn apply(&self, intensity: f64, mu: f64) -> f64 {
        let d = 1.0 - mu;
        intensity * (1.0 - self.u1 * d - self.u2 * d * d)
    }
}

/// Geometry of one on-disk pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfacePixel {
    /// Surface point in the body frame, relative to the star centre.
    pub position: Vector3,
    /// Cosine of the angle between the surface normal and the line of sight.
    pub mu: f64,
    pub r: f64,
    /// Polar angle from the spin pole, radians.
    pub theta: f64,
    /// Azimuth `atan2(x, y)`, radians.
    pub phi: f64,
    pub lat_deg: f64,
    pub lon_deg: f64,
}

/// `(r, theta, phi, lat_deg, lon_deg)` of a body-frame point.
fn spherical(position: &Vector3) -> (f64, f64, f64, f64, f64) {
    let r = vector::norm(position);
    let theta = (position[2] / r).clamp(-1.0, 1.0).acos();
    let phi = position[0].atan2(position[1]);
    let lat = 90.0 - rad_to_deg(theta);
    let lon = rad_to_deg(phi);
    (r, theta, phi, lat, lon)
}

/// A star seen by an orthographic observer.
#[derive(Debug, Clone)]
pub struct Star {
    name: String,
    center: Vector3,
    radius: f64,
    axis: Vector3,
    inclination_deg: f64,
    meridian_deg: f64,
    resolution: usize,
    limb_darkening: LimbDarkening,
    spots: Vec<Spot>,
    x: Vec<f64>,
    y: Vec<f64>,
    pixels: Grid<Option<SurfacePixel>>,
    flux: Grid<f64>,
}

impl Star {
    /// Equator-on, unspotted, undarkened star with the default resolution.
    pub fn new(center: Vector3, radius: f64) -> Result<Self, StarError> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(StarError::InvalidRadius(radius));
        }
        let mut star = Self {
            name: "star".to_string(),
            center,
            radius,
            axis: [0.0, 1.0, 0.0],
            inclination_deg: DEFAULT_INCLINATION_DEG,
            meridian_deg: 0.0,
            resolution: DEFAULT_RESOLUTION,
            limb_darkening: LimbDarkening::default(),
            spots: Vec::new(),
            x: Vec::new(),
            y: Vec::new(),
            pixels: Grid::filled(0, 0, None),
            flux: Grid::filled(0, 0, f64::NAN),
        };
        star.rebuild_axes();
        star.refresh();
        Ok(star)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_resolution(mut self, resolution: usize) -> Result<Self, StarError> {
        if resolution < 2 {
            return Err(StarError::InvalidResolution(resolution));
        }
        self.resolution = resolution;
        self.rebuild_axes();
        self.refresh();
        Ok(self)
    }

    /// Set the sky-projected spin axis. Only its x/y components matter.
    pub fn with_axis(mut self, axis: Vector3) -> Result<Self, StarError> {
        let sky = vector::normalize(&[axis[0], axis[1], 0.0]).ok_or(StarError::InvalidAxis)?;
        self.axis = sky;
        self.refresh();
        Ok(self)
    }

    pub fn with_limb_darkening(mut self, limb_darkening: LimbDarkening) -> Self {
        self.limb_darkening = limb_darkening;
        self.refresh();
        self
    }

    pub fn with_orientation(mut self, inclination_deg: f64, meridian_deg: f64) -> Self {
        self.inclination_deg = inclination_deg;
        self.meridian_deg = wrap_longitude(meridian_deg);
        self.refresh();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn center(&self) -> Vector3 {
        self.center
    }

    /// Move the star; surface maps are centre-relative and stay valid.
    pub fn set_center(&mut self, center: Vector3) {
        self.center = center;
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn axis(&self) -> Vector3 {
        self.axis
    }

    pub fn inclination_deg(&self) -> f64 {
        self.inclination_deg
    }

    pub fn meridian_deg(&self) -> f64 {
        self.meridian_deg
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    pub fn limb_darkening(&self) -> LimbDarkening {
        self.limb_darkening
    }

    pub fn spots(&self) -> &[Spot] {
        &self.spots
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn y(&self) -> &[f64] {
        &self.y
    }

    pub fn pixels(&self) -> &Grid<Option<SurfacePixel>> {
        &self.pixels
    }

    /// Current flux map; NaN off the disk.
    pub fn flux(&self) -> &Grid<f64> {
        &self.flux
    }

    pub fn mu_map(&self) -> Grid<f64> {
        self.pixels.map(|p| p.map_or(f64::NAN, |p| p.mu))
    }

    pub fn lat_map(&self) -> Grid<f64> {
        self.pixels.map(|p| p.map_or(f64::NAN, |p| p.lat_deg))
    }

    pub fn lon_map(&self) -> Grid<f64> {
        self.pixels.map(|p| p.map_or(f64::NAN, |p| p.lon_deg))
    }

    /// Add spots, or replace the current set when `overwrite` is true.
    pub fn add<I>(&mut self, spots: I, overwrite: bool)
    where
        I: IntoIterator<Item = Spot>,
    {
        if overwrite {
            self.spots.clear();
        }
        self.spots.extend(spots);
        self.refresh();
    }

    /// Fill the flux map with emitted intensity: 1 on the photosphere, the spot
    /// contrast inside spots, NaN off the disk. No limb darkening.
    pub fn calc_flux(&mut self) {
        let flux = self
            .pixels
            .map(|p| p.map_or(f64::NAN, |p| self.emitted(p.lat_deg, p.lon_deg)));
        self.flux = flux;
    }

    /// Apply the limb-darkening law to the current flux map.
    pub fn limb_darken(&mut self) {
        let ld = self.limb_darkening;
        let mut darkened = self.flux.clone();
        for (j, i, pixel) in self.pixels.indexed() {
            darkened[(j, i)] = match pixel {
                Some(p) => ld.apply(self.flux[(j, i)], p.mu),
                None => f64::NAN,
            };
        }
        self.flux = darkened;
    }

    /// Spin the star about its pole by `angle_deg`.
    pub fn rotate(&mut self, angle_deg: f64) {
        self.meridian_deg = wrap_longitude(self.meridian_deg + angle_deg);
        self.refresh();
    }

    /// Spin until the disk centre sits at longitude `meridian_deg`.
    pub fn set_meridian(&mut self, meridian_deg: f64) {
        let angle = meridian_deg - self.meridian_deg;
        self.rotate(angle);
    }

    /// Tilt the spin pole toward (0°) or away from (90°) the line of sight.
    pub fn set_inclination(&mut self, inclination_deg: f64) {
        self.inclination_deg = inclination_deg;
        self.refresh();
    }

    /// Express an observer-frame vector in the body frame.
    pub fn to_body_frame(&self, v: &Vector3) -> Vector3 {
        let pa = self.axis[0].atan2(self.axis[1]);
        let sky = rotate_basis(v, 0.0, 0.0, pa);
        let swapped = [-sky[0], sky[2], sky[1]];
        rotate_basis(
            &swapped,
            deg_to_rad(90.0 - self.inclination_deg),
            0.0,
            deg_to_rad(-self.meridian_deg),
        )
    }

    /// Limb-darkened intensity of the surface element with observer-frame
    /// outward normal `normal`, seen at limb-angle cosine `mu`.
    pub fn intensity(&self, normal: &Vector3, mu: f64) -> f64 {
        let body = self.to_body_frame(normal);
        if vector::norm(&body) == 0.0 {
            return f64::NAN;
        }
        let (_, _, _, lat, lon) = spherical(&body);
        self.limb_darkening.apply(self.emitted(lat, lon), mu)
    }

    /// Mean flux over on-disk pixels, zero when no pixel lands on the disk.
    pub fn mean_flux(&self) -> f64 {
        let (sum, count) = self
            .flux
            .values()
            .filter(|v| v.is_finite())
            .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
        if count == 0 { 0.0 } else { sum / count as f64 }
    }

    fn emitted(&self, lat_deg: f64, lon_deg: f64) -> f64 {
        self.spots
            .iter()
            .rev()
            .find(|spot| spot.covers(lat_deg, lon_deg))
            .map_or(1.0, |spot| spot.contrast)
    }

    fn rebuild_axes(&mut self) {
        self.x = linspace(-self.radius, self.radius, self.resolution);
        self.y = linspace(-self.radius, self.radius, self.resolution);
    }

    fn refresh(&mut self) {
        let radius = self.radius;
        let mut pixels = Grid::filled(self.resolution, self.resolution, None);
        for (j, &y) in self.y.iter().enumerate() {
            for (i, &x) in self.x.iter().enumerate() {
                let rho2 = x * x + y * y;
                if rho2 > radius * radius {
                    continue;
                }
                let z = (radius * radius - rho2).sqrt();
                let normal = [x / radius, y / radius, z / radius];
                let position = vector::scale(&self.to_body_frame(&normal), radius);
                let (r, theta, phi, lat_deg, lon_deg) = spherical(&position);
                pixels[(j, i)] = Some(SurfacePixel {
                    position,
                    mu: z / radius,
                    r,
                    theta,
                    phi,
                    lat_deg,
                    lon_deg,
                });
            }
        }
        self.pixels = pixels;
        self.calc_flux();
        self.limb_darken();
        tracing::debug!(
            star = %self.name,
            inclination_deg = self.inclination_deg,
            meridian_deg = self.meridian_deg,
            spots = self.spots.len(),
            "surface maps refreshed"
        );
    }
}

/// Wrap a longitude into (-180, 180].
pub fn wrap_longitude(lon_deg: f64) -> f64 {
    let wrapped = lon_deg.rem_euclid(360.0);
    if wrapped > 180.0 { wrapped - 360.0 } else { wrapped }
}
