//! Orthographic ray tracer for scenes of stars and occulting planets.

pub mod body;
pub mod ray;
pub mod scene;

pub use body::{Body, Planet};
pub use ray::{Ray, intersect};
pub use scene::{Scene, SceneArray, SceneMaps, TraceError};
