//! Single-segment force, power, and energy evaluation.

use thiserror::Error;
use traction_core::constants::GRAVITY_M_S2;
use traction_core::units::{joules_to_kwh, km_to_m, kmh_to_ms, watts_to_kw};

/// Inputs describing one road segment driven at constant speed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentInput {
    pub mass_kg: f64,
    pub speed_kmh: f64,
    /// Signed grade in percent: positive uphill, negative downhill.
    pub grade_percent: f64,
    pub length_km: f64,
    /// Fraction of battery energy delivered to the wheels, in (0, 1].
    pub drivetrain_efficiency: f64,
    pub rolling_resistance_coeff: f64,
    /// Fraction of descent potential energy returned to the battery, in [0, 1].
    pub regen_efficiency: f64,
}

/// Vehicle properties that stay fixed across a speed/grade sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleParams {
    pub mass_kg: f64,
    pub drivetrain_efficiency: f64,
    pub rolling_resistance_coeff: f64,
    pub regen_efficiency: f64,
}

impl VehicleParams {
    /// Combine the vehicle with a speed, grade, and length into a segment input.
    pub fn segment(&self, speed_kmh: f64, grade_percent: f64, length_km: f64) -> SegmentInput {
        SegmentInput {
            mass_kg: self.mass_kg,
            speed_kmh,
            grade_percent,
            length_km,
            drivetrain_efficiency: self.drivetrain_efficiency,
            rolling_resistance_coeff: self.rolling_resistance_coeff,
            regen_efficiency: self.regen_efficiency,
        }
    }
}

impl SegmentInput {
    /// Vehicle part of the input, dropping the segment geometry.
    pub fn vehicle(&self) -> VehicleParams {
        VehicleParams {
            mass_kg: self.mass_kg,
            drivetrain_efficiency: self.drivetrain_efficiency,
            rolling_resistance_coeff: self.rolling_resistance_coeff,
            regen_efficiency: self.regen_efficiency,
        }
    }
}

/// Forces, power, and energy for one evaluated segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentResult {
    pub grade_force_n: f64,
    pub rolling_force_n: f64,
    pub total_force_n: f64,
    pub mechanical_power_kw: f64,
    pub battery_power_kw: f64,
    /// Net battery energy for the segment, never negative.
    pub segment_energy_kwh: f64,
    /// Energy recovered on a descent; zero on flat or uphill segments.
    pub regen_energy_kwh: f64,
}

#[derive(Debug, Error, PartialEq)]
pub enum SlopeError {
    #[error("vehicle mass must be positive")]
    NonPositiveMass,
    #[error("segment length must be positive")]
    NonPositiveLength,
    #[error("drivetrain efficiency must be positive")]
    NonPositiveEfficiency,
    #[error("speed must not be negative")]
    NegativeSpeed,
    #[error("battery capacity must be positive")]
    NonPositiveCapacity,
    #[error("{0} must be a finite number")]
    NonFinite(&'static str),
}

/// Convert a grade percentage into `(sin θ, cos θ)` without computing θ.
///
/// The grade is treated as `tan θ = grade_percent / 100`, so `cos θ` is always positive.
pub fn slope_components(grade_percent: f64) -> (f64, f64) {
    let tan_t = grade_percent / 100.0;
    // hypot avoids overflowing tan² for extreme grades
    let h = 1.0_f64.hypot(tan_t);
    (tan_t / h, 1.0 / h)
}

/// Inclination angle of a grade in degrees.
pub fn slope_angle_deg(grade_percent: f64) -> f64 {
    (grade_percent / 100.0).atan().to_degrees()
}

/// Evaluate forces, power draw, and battery energy for a single segment.
///
/// Descents recover `regen_efficiency · m · g · Δh` and the net energy is floored at zero.
pub fn evaluate_segment(input: &SegmentInput) -> Result<SegmentResult, SlopeError> {
    validate(input)?;

    let v = kmh_to_ms(input.speed_kmh);
    let length_m = km_to_m(input.length_km);
    let weight = input.mass_kg * GRAVITY_M_S2;
    let (sin_t, cos_t) = slope_components(input.grade_percent);

    let grade_force = weight * sin_t;
    let rolling_force = input.rolling_resistance_coeff * weight * cos_t;
    let total_force = grade_force + rolling_force;

    let mechanical_power = total_force * v;
    let battery_power = mechanical_power / input.drivetrain_efficiency;

    let raw_kwh = joules_to_kwh(total_force * length_m / input.drivetrain_efficiency);
    let regen_kwh = if input.grade_percent < 0.0 {
        // sin θ < 0 on a descent, so the drop is positive
        let height_drop = -length_m * sin_t;
        joules_to_kwh(input.regen_efficiency * weight * height_drop)
    } else {
        0.0
    };

    // Finite inputs can still overflow once multiplied together.
    ensure_finite(&[
        ("grade_force_n", grade_force),
        ("rolling_force_n", rolling_force),
        ("total_force_n", total_force),
        ("mechanical_power_kw", mechanical_power),
        ("battery_power_kw", battery_power),
        ("segment_energy_kwh", raw_kwh),
        ("regen_energy_kwh", regen_kwh),
        ("segment_energy_kwh", raw_kwh - regen_kwh),
    ])?;
    let energy_kwh = if input.grade_percent < 0.0 {
        (raw_kwh - regen_kwh).max(0.0)
    } else {
        raw_kwh
    };

    Ok(SegmentResult {
        grade_force_n: grade_force,
        rolling_force_n: rolling_force,
        total_force_n: total_force,
        mechanical_power_kw: watts_to_kw(mechanical_power),
        battery_power_kw: watts_to_kw(battery_power),
        segment_energy_kwh: energy_kwh,
        regen_energy_kwh: regen_kwh,
    })
}

pub(crate) fn ensure_finite(quantities: &[(&'static str, f64)]) -> Result<(), SlopeError> {
    match quantities.iter().find(|(_, value)| !value.is_finite()) {
        Some((name, _)) => Err(SlopeError::NonFinite(*name)),
        None => Ok(()),
    }
}

fn validate(input: &SegmentInput) -> Result<(), SlopeError> {
    let fields = [
        ("mass_kg", input.mass_kg),
        ("speed_kmh", input.speed_kmh),
        ("grade_percent", input.grade_percent),
        ("length_km", input.length_km),
        ("drivetrain_efficiency", input.drivetrain_efficiency),
        ("rolling_resistance_coeff", input.rolling_resistance_coeff),
        ("regen_efficiency", input.regen_efficiency),
    ];
    ensure_finite(&fields)?;
    if input.mass_kg <= 0.0 {
        return Err(SlopeError::NonPositiveMass);
    }
    if input.length_km <= 0.0 {
        return Err(SlopeError::NonPositiveLength);
    }
    if input.drivetrain_efficiency <= 0.0 {
        return Err(SlopeError::NonPositiveEfficiency);
    }
    if input.speed_kmh < 0.0 {
        return Err(SlopeError::NegativeSpeed);
    }
    Ok(())
}
