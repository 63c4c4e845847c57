//! Ray-tracing of exoplanetary systems.
//!
//! The library re-exports the workspace crates so front-ends (CLI binaries,
//! notebooks through FFI, future GUIs) depend on a single crate.

pub mod scenario;

pub use exotrace_config as config;
pub use exotrace_core as core;
pub use exotrace_export as export;
pub use exotrace_lightcurve as lightcurve;
pub use exotrace_raytrace as raytrace;
pub use exotrace_star as star;

/// Returns the version of the library.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
