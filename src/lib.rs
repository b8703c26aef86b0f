//! Slope energy and cornering stability calculators.
//!
//! The physics lives in the member crates; this façade re-exports them and maps
//! configuration presets onto model inputs so front-ends (CLI, plotting) share one entry point.

pub mod scenario;

pub use traction_config as config;
pub use traction_core as primitives;
pub use traction_cornering as cornering;
pub use traction_export as export;
pub use traction_slope as slope;

/// Returns the version of the library.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
