//! Preset selection and conversion from catalog records into model inputs.

use thiserror::Error;
use tracing::warn;

use traction_config::{
    Named, RiderConfig, RouteConfig, SurfaceConfig, SweepGridConfig, VehicleConfig, find_by_name,
};
use traction_core::grid::stepped_range;
use traction_cornering::{CorneringInput, RadiusRange};
use traction_slope::{SegmentInput, VehicleParams};

/// Radius used for the single-case report when none is requested.
pub const DEFAULT_CASE_RADIUS_M: f64 = 15.0;

#[derive(Debug, Error, PartialEq)]
pub enum ScenarioError {
    #[error("{kind} '{name}' not found in catalog")]
    NotFound { kind: &'static str, name: String },
    #[error("{0} catalog is empty")]
    EmptyCatalog(&'static str),
}

/// Pick a record by name, or the first catalog entry when no name is given.
pub fn select<'a, T: Named>(
    records: &'a [T],
    kind: &'static str,
    requested: Option<&str>,
) -> Result<&'a T, ScenarioError> {
    if records.is_empty() {
        return Err(ScenarioError::EmptyCatalog(kind));
    }
    match requested {
        Some(name) => find_by_name(records, name).ok_or_else(|| ScenarioError::NotFound {
            kind,
            name: name.to_string(),
        }),
        None => Ok(&records[0]),
    }
}

/// Vehicle parameters for the sweep; a disabled regeneration toggle zeroes its efficiency.
pub fn vehicle_params(vehicle: &VehicleConfig) -> VehicleParams {
    if vehicle.drivetrain_efficiency > 1.0 {
        warn!(
            vehicle = %vehicle.name,
            efficiency = vehicle.drivetrain_efficiency,
            "drivetrain efficiency above 1"
        );
    }
    VehicleParams {
        mass_kg: vehicle.mass_kg,
        drivetrain_efficiency: vehicle.drivetrain_efficiency,
        rolling_resistance_coeff: vehicle.rolling_resistance_coeff,
        regen_efficiency: if vehicle.regen_enabled {
            vehicle.regen_efficiency
        } else {
            0.0
        },
    }
}

/// Segment input for driving `route` with `vehicle`.
pub fn segment_input(vehicle: &VehicleConfig, route: &RouteConfig) -> SegmentInput {
    vehicle_params(vehicle).segment(route.speed_kmh, route.grade_percent, route.length_km)
}

/// Cornering input for `rider` on `surface` at the given speed and radius.
pub fn cornering_input(
    rider: &RiderConfig,
    surface: &SurfaceConfig,
    speed_kmh: f64,
    radius_m: f64,
) -> CorneringInput {
    CorneringInput::from_kmh(
        rider.rider_mass_kg,
        rider.vehicle_mass_kg,
        speed_kmh,
        radius_m,
        surface.friction_coefficient,
    )
}

/// Speed and grade axes of the sweep as `(speeds_kmh, grades_percent)`.
pub fn sweep_axes(grid: &SweepGridConfig) -> (Vec<f64>, Vec<f64>) {
    let speeds = stepped_range(grid.speed_min_kmh, grid.speed_max_kmh, grid.speed_step_kmh);
    let grades = stepped_range(
        grid.grade_min_percent,
        grid.grade_max_percent,
        grid.grade_step_percent,
    );
    (speeds, grades)
}

/// Radius of the single-case report, kept inside the swept range.
pub fn case_radius(range: &RadiusRange, requested: Option<f64>) -> f64 {
    let lo = range.min_m.min(range.max_m);
    let hi = range.max_m.max(range.min_m);
    requested.unwrap_or(DEFAULT_CASE_RADIUS_M).clamp(lo, hi)
}
