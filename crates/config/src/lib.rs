//! Scene manifests: which stars and planets to place, and how to render them.

use std::fs::File;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

fn default_resolution() -> usize {
    100
}

/// One renderable scene.
#[derive(Debug, Deserialize, Clone)]
pub struct SceneConfig {
    pub name: String,
    #[serde(default = "default_resolution")]
    pub resolution: usize,
    #[serde(default)]
    pub bodies: Vec<BodyConfig>,
}

/// Bodies placed in a scene, tagged by `type`.
#[derive(Debug, Deserialize, Clone)]
#[serde(tag = "type")]
pub enum BodyConfig {
    #[serde(rename = "star")]
    Star(StarConfig),
    #[serde(rename = "planet")]
    Planet(PlanetConfig),
}

impl BodyConfig {
    pub fn name(&self) -> &str {
        match self {
            BodyConfig::Star(star) => &star.name,
            BodyConfig::Planet(planet) => &planet.name,
        }
    }
}

/// Star surface description.
#[derive(Debug, Deserialize, Clone)]
pub struct StarConfig {
    pub name: String,
    pub center: [f64; 3],
    pub radius: f64,
    #[serde(default)]
    pub inclination_deg: Option<f64>,
    #[serde(default)]
    pub meridian_deg: Option<f64>,
    /// Sky-projected spin axis; defaults to +y.
    #[serde(default)]
    pub axis: Option<[f64; 3]>,
    /// Resolution of the star's own surface maps.
    #[serde(default)]
    pub resolution: Option<usize>,
    #[serde(default)]
    pub limb_darkening: Option<LimbDarkeningConfig>,
    #[serde(default)]
    pub spots: Vec<SpotConfig>,
}

/// Quadratic limb-darkening coefficients.
#[derive(Debug, Deserialize, Clone, Copy, Default)]
pub struct LimbDarkeningConfig {
    #[serde(default)]
    pub u1: f64,
    #[serde(default)]
    pub u2: f64,
}

/// Circular starspot.
#[derive(Debug, Deserialize, Clone, Copy)]
pub struct SpotConfig {
    pub lat_deg: f64,
    pub lon_deg: f64,
    pub radius_deg: f64,
    pub contrast: f64,
}

/// Opaque occulting body.
#[derive(Debug, Deserialize, Clone)]
pub struct PlanetConfig {
    pub name: String,
    pub center: [f64; 3],
    pub radius: f64,
}

/// Errors that can occur while loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read scene manifest: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Load scenes from a YAML list, a single TOML file, or a directory of TOML files.
pub fn load_scenes<P: AsRef<Path>>(path: P) -> Result<Vec<SceneConfig>, ConfigError> {
    load_records(path)
}

/// Parse scenes from an in-memory YAML document holding a list of scenes.
pub fn parse_scenes_yaml(contents: &str) -> Result<Vec<SceneConfig>, ConfigError> {
    Ok(serde_yaml::from_str(contents)?)
}

fn load_records<T, P>(path: P) -> Result<Vec<T>, ConfigError>
where
    T: for<'de> Deserialize<'de>,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if path.is_dir() {
        read_dir_records(path)
    } else if path.extension().map(|ext| ext == "toml").unwrap_or(false) {
        let contents = std::fs::read_to_string(path)?;
        let record: T = toml::from_str(&contents)?;
        Ok(vec![record])
    } else {
        let reader = File::open(path)?;
        Ok(serde_yaml::from_reader(reader)?)
    }
}

fn read_dir_records<T>(dir: &Path) -> Result<Vec<T>, ConfigError>
where
    T: for<'de> Deserialize<'de>,
{
    let mut records = Vec::new();
    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().map(|ext| ext == "toml").unwrap_or(false))
        .collect();
    entries.sort();
    for path in entries {
        let contents = std::fs::read_to_string(&path)?;
        let record: T = toml::from_str(&contents)?;
        records.push(record);
    }
    Ok(records)
}
