//! Friction and lean requirements for a two-wheeler cornering at constant speed.

pub mod model;
pub mod sweep;

pub use model::{
    CorneringError, CorneringInput, CorneringResult, centripetal_accel, evaluate, required_mu,
    required_theta_deg,
};
pub use sweep::{
    CorneringSweepRow, DEFAULT_MU_GRID, MuGrid, RadiusRange, SafetyGrid, SafetyLabel,
    build_safety_grid, sweep_by_radius,
};
