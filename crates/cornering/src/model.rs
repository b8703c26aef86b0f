//! Single-point cornering evaluation (uniform circular motion on a flat road).

use thiserror::Error;
use traction_core::constants::GRAVITY_M_S2;
use traction_core::units::kmh_to_ms;

/// Vehicle state while holding a constant-radius turn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorneringInput {
    /// Rider plus vehicle mass (kg).
    pub total_mass_kg: f64,
    pub speed_ms: f64,
    pub radius_m: f64,
    /// Tyre/road friction coefficient offered by the surface.
    pub available_friction: f64,
}

impl CorneringInput {
    /// Build an input from separate rider/vehicle masses and a speed in km/h.
    pub fn from_kmh(
        rider_mass_kg: f64,
        vehicle_mass_kg: f64,
        speed_kmh: f64,
        radius_m: f64,
        available_friction: f64,
    ) -> Self {
        Self {
            total_mass_kg: rider_mass_kg + vehicle_mass_kg,
            speed_ms: kmh_to_ms(speed_kmh),
            radius_m,
            available_friction,
        }
    }
}

/// Requirements and verdict for one speed/radius combination.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorneringResult {
    pub centripetal_accel_ms2: f64,
    pub centripetal_force_n: f64,
    pub required_mu: f64,
    pub required_theta_deg: f64,
    pub is_safe: bool,
    /// Normal force approximated as `m · g`; reporting only.
    pub normal_force_n: f64,
    /// `μ_available · N`; reporting only.
    pub max_friction_force_n: f64,
}

#[derive(Debug, Error, PartialEq)]
pub enum CorneringError {
    #[error("turn radius must be positive")]
    NonPositiveRadius,
    #[error("total mass must be positive")]
    NonPositiveMass,
    #[error("speed must not be negative")]
    NegativeSpeed,
    #[error("{0} must be a finite number")]
    NonFinite(&'static str),
}

/// Centripetal acceleration `v² / r` (m/s²).
pub fn centripetal_accel(speed_ms: f64, radius_m: f64) -> Result<f64, CorneringError> {
    check_motion(speed_ms, radius_m)?;
    finite("centripetal_accel", speed_ms * speed_ms / radius_m)
}

/// Minimum friction coefficient `v² / (r g)` that keeps the tyres from sliding.
pub fn required_mu(speed_ms: f64, radius_m: f64) -> Result<f64, CorneringError> {
    Ok(centripetal_accel(speed_ms, radius_m)? / GRAVITY_M_S2)
}

/// Lean angle `atan(v² / (r g))` in degrees.
pub fn required_theta_deg(speed_ms: f64, radius_m: f64) -> Result<f64, CorneringError> {
    Ok(required_mu(speed_ms, radius_m)?.atan().to_degrees())
}

/// Evaluate the turn and classify it against the available friction.
///
/// The verdict compares coefficients directly, which is equivalent to `F_c <= μ N`.
pub fn evaluate(input: &CorneringInput) -> Result<CorneringResult, CorneringError> {
    if !input.total_mass_kg.is_finite() {
        return Err(CorneringError::NonFinite("total_mass_kg"));
    }
    if !input.available_friction.is_finite() {
        return Err(CorneringError::NonFinite("available_friction"));
    }
    if input.total_mass_kg <= 0.0 {
        return Err(CorneringError::NonPositiveMass);
    }

    let a_c = centripetal_accel(input.speed_ms, input.radius_m)?;
    let mu_min = a_c / GRAVITY_M_S2;
    let normal = finite("normal_force_n", input.total_mass_kg * GRAVITY_M_S2)?;
    let centripetal_force = finite("centripetal_force_n", input.total_mass_kg * a_c)?;
    let max_friction = finite("max_friction_force_n", input.available_friction * normal)?;

    Ok(CorneringResult {
        centripetal_accel_ms2: a_c,
        centripetal_force_n: centripetal_force,
        required_mu: mu_min,
        required_theta_deg: mu_min.atan().to_degrees(),
        is_safe: input.available_friction >= mu_min,
        normal_force_n: normal,
        max_friction_force_n: max_friction,
    })
}

fn finite(name: &'static str, value: f64) -> Result<f64, CorneringError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CorneringError::NonFinite(name))
    }
}

fn check_motion(speed_ms: f64, radius_m: f64) -> Result<(), CorneringError> {
    if !speed_ms.is_finite() {
        return Err(CorneringError::NonFinite("speed_ms"));
    }
    if !radius_m.is_finite() {
        return Err(CorneringError::NonFinite("radius_m"));
    }
    if radius_m <= 0.0 {
        return Err(CorneringError::NonPositiveRadius);
    }
    if speed_ms < 0.0 {
        return Err(CorneringError::NegativeSpeed);
    }
    Ok(())
}
