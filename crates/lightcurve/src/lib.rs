//! Disk-integrated light curves.
//!
//! Rotational curves spin a single star through one turn and record its mean
//! surface brightness. Transit curves slide a planet along a caller-supplied
//! path through a scene and record the traced flux against an unocculted baseline.

use exotrace_core::vector::Vector3;
use exotrace_raytrace::{Scene, TraceError};
use exotrace_star::Star;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum LightCurveError {
    #[error("at least one sample is required")]
    NoSamples,
    #[error("body `{0}` is not a planet")]
    NotAPlanet(String),
    #[error("scene emits no flux without the occulter")]
    ZeroBaseline,
    #[error(transparent)]
    Trace(#[from] TraceError),
}

/// One step of a rotational light curve.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct RotationSample {
    /// Rotation applied since the first sample, degrees.
    pub phase_deg: f64,
    pub meridian_deg: f64,
    pub flux: f64,
    /// Flux divided by the brightest sample.
    pub relative_flux: f64,
}

/// One step of a transit light curve.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct TransitSample {
    pub position: Vector3,
    pub flux: f64,
    /// Flux divided by the unocculted baseline.
    pub relative_flux: f64,
}

/// Sample `steps` evenly spaced rotations over one full turn.
///
/// The star is left at its starting meridian.
pub fn rotational(star: &mut Star, steps: usize) -> Result<Vec<RotationSample>, LightCurveError> {
    if steps == 0 {
        return Err(LightCurveError::NoSamples);
    }
    let start = star.meridian_deg();
    let step_deg = 360.0 / steps as f64;
    let mut samples = Vec::with_capacity(steps);
    for k in 0..steps {
        let phase_deg = step_deg * k as f64;
        star.set_meridian(start + phase_deg);
        samples.push(RotationSample {
            phase_deg,
            meridian_deg: star.meridian_deg(),
            flux: star.mean_flux(),
            relative_flux: 0.0,
        });
    }
    star.set_meridian(start);

    let peak = samples.iter().map(|s| s.flux).fold(f64::NEG_INFINITY, f64::max);
    for sample in &mut samples {
        sample.relative_flux = if peak > 0.0 { sample.flux / peak } else { 0.0 };
    }
    tracing::info!(star = star.name(), steps, peak, "rotational light curve sampled");
    Ok(samples)
}

/// Positions spaced evenly from `from` to `to`, both included.
pub fn straight_path(from: Vector3, to: Vector3, steps: usize) -> Vec<Vector3> {
    let xs = exotrace_core::linspace(from[0], to[0], steps);
    let ys = exotrace_core::linspace(from[1], to[1], steps);
    let zs = exotrace_core::linspace(from[2], to[2], steps);
    xs.into_iter()
        .zip(ys)
        .zip(zs)
        .map(|((x, y), z)| [x, y, z])
        .collect()
}

/// Move planet `planet` through `path`, tracing the scene at every position.
///
/// The pixel grid is pinned to the framing of the scene without the planet, so
/// the baseline and every sample integrate over the same pixels. The planet
/// returns to its original position afterwards, the previous framing is
/// restored, and the scene is re-traced there.
pub fn transit(
    scene: &mut Scene,
    planet: usize,
    path: &[Vector3],
) -> Result<Vec<TransitSample>, LightCurveError> {
    let body = scene.body(planet)?;
    if !body.is_planet() {
        return Err(LightCurveError::NotAPlanet(body.name().to_string()));
    }
    if path.is_empty() {
        return Err(LightCurveError::NoSamples);
    }
    let home = body.center();

    let mut unocculted = scene.clone();
    unocculted.remove(planet)?;
    unocculted.trace();
    let baseline = unocculted.total_flux();
    if baseline <= 0.0 {
        return Err(LightCurveError::ZeroBaseline);
    }

    let framing = scene.framing();
    scene.set_framing(Some(unocculted.extent()));

    let mut samples = Vec::with_capacity(path.len());
    for &position in path {
        scene.body_mut(planet)?.set_center(position);
        scene.trace();
        let flux = scene.total_flux();
        samples.push(TransitSample {
            position,
            flux,
            relative_flux: flux / baseline,
        });
    }

    scene.body_mut(planet)?.set_center(home);
    scene.set_framing(framing);
    scene.trace();
    tracing::info!(samples = samples.len(), baseline, "transit light curve sampled");
    Ok(samples)
}
