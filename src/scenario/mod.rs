//! Turn scene manifests into traceable scenes.

use exotrace_config::{BodyConfig, PlanetConfig, SceneConfig, StarConfig};
use exotrace_raytrace::{Body, Planet, Scene, TraceError};
use exotrace_star::{LimbDarkening, Spot, Star, StarError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("star `{name}`: {source}")]
    Star {
        name: String,
        #[source]
        source: StarError,
    },
    #[error("body `{name}`: {source}")]
    Body {
        name: String,
        #[source]
        source: TraceError,
    },
    #[error("scene `{0}` not found in manifest")]
    SceneNotFound(String),
    #[error("manifest holds no scenes")]
    EmptyManifest,
    #[error("star `{0}` not found in scene")]
    StarNotFound(String),
    #[error("planet `{0}` not found in scene")]
    PlanetNotFound(String),
    #[error("scene holds no stars")]
    NoStars,
}

/// Select a scene by name (case-insensitive), defaulting to the first one.
pub fn find_scene<'a>(
    scenes: &'a [SceneConfig],
    requested: Option<&str>,
) -> Result<&'a SceneConfig, ScenarioError> {
    match requested {
        Some(name) => scenes
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| ScenarioError::SceneNotFound(name.to_string())),
        None => scenes.first().ok_or(ScenarioError::EmptyManifest),
    }
}

/// Build the runtime scene described by a manifest entry.
pub fn build_scene(config: &SceneConfig) -> Result<Scene, ScenarioError> {
    let mut scene = Scene::new(config.resolution).map_err(|source| ScenarioError::Body {
        name: config.name.clone(),
        source,
    })?;
    for body in &config.bodies {
        scene.add(build_body(body)?);
    }
    Ok(scene)
}

/// Build a single body from its manifest entry.
pub fn build_body(config: &BodyConfig) -> Result<Body, ScenarioError> {
    match config {
        BodyConfig::Star(star) => Ok(Body::Star(build_star(star)?)),
        BodyConfig::Planet(planet) => Ok(Body::Planet(build_planet(planet)?)),
    }
}

pub fn build_star(config: &StarConfig) -> Result<Star, ScenarioError> {
    let wrap = |source| ScenarioError::Star {
        name: config.name.clone(),
        source,
    };
    let mut star = Star::new(config.center, config.radius)
        .map_err(wrap)?
        .with_name(config.name.clone());
    if let Some(resolution) = config.resolution {
        star = star.with_resolution(resolution).map_err(wrap)?;
    }
    if let Some(axis) = config.axis {
        star = star.with_axis(axis).map_err(wrap)?;
    }
    if let Some(ld) = config.limb_darkening {
        star = star.with_limb_darkening(LimbDarkening::quadratic(ld.u1, ld.u2));
    }
    star = star.with_orientation(
        config
            .inclination_deg
            .unwrap_or(exotrace_star::DEFAULT_INCLINATION_DEG),
        config.meridian_deg.unwrap_or(0.0),
    );
    let spots = config
        .spots
        .iter()
        .map(|s| Spot::new(s.lat_deg, s.lon_deg, s.radius_deg, s.contrast))
        .collect::<Result<Vec<_>, _>>()
        .map_err(wrap)?;
    if !spots.is_empty() {
        star.add(spots, true);
    }
    Ok(star)
}

pub fn build_planet(config: &PlanetConfig) -> Result<Planet, ScenarioError> {
    Planet::new(config.name.clone(), config.center, config.radius).map_err(|source| {
        ScenarioError::Body {
            name: config.name.clone(),
            source,
        }
    })
}

/// Index of the named star, or of the first star when no name is given.
pub fn find_star(scene: &Scene, requested: Option<&str>) -> Result<usize, ScenarioError> {
    match requested {
        Some(name) => scene
            .find(name)
            .filter(|&idx| scene.bodies()[idx].as_star().is_some())
            .ok_or_else(|| ScenarioError::StarNotFound(name.to_string())),
        None => scene
            .bodies()
            .iter()
            .position(|b| b.as_star().is_some())
            .ok_or(ScenarioError::NoStars),
    }
}

/// Index of the named planet.
pub fn find_planet(scene: &Scene, name: &str) -> Result<usize, ScenarioError> {
    scene
        .find(name)
        .filter(|&idx| scene.bodies()[idx].is_planet())
        .ok_or_else(|| ScenarioError::PlanetNotFound(name.to_string()))
}
