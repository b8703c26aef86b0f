//! Battery range, consumption rating, and checkpoint profile along a segment.

use traction_core::constants::GRAVITY_M_S2;
use traction_core::units::{joules_to_kwh, km_to_m};

use crate::model::{SegmentInput, SlopeError, ensure_finite, evaluate_segment, slope_components};

/// Fractions of the segment at which the journey profile is sampled.
pub const CHECKPOINT_FRACTIONS: [f64; 5] = [0.0, 0.25, 0.5, 0.75, 1.0];

/// Consumption above this is rated [`ConsumptionRating::High`] (kWh/100 km).
pub const HIGH_CONSUMPTION_KWH_PER_100KM: f64 = 25.0;
/// Consumption below this is rated [`ConsumptionRating::Excellent`] (kWh/100 km).
pub const EXCELLENT_CONSUMPTION_KWH_PER_100KM: f64 = 10.0;

/// Distance a battery charge lasts at a given consumption.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RangeEstimate {
    Finite(f64),
    /// Consumption is zero (e.g. a descent fully covered by regeneration).
    Unlimited,
}

impl RangeEstimate {
    pub fn km(&self) -> Option<f64> {
        match self {
            RangeEstimate::Finite(km) => Some(*km),
            RangeEstimate::Unlimited => None,
        }
    }
}

/// Coarse label for a specific consumption figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsumptionRating {
    Excellent,
    Normal,
    High,
}

impl ConsumptionRating {
    pub fn classify(kwh_per_100km: f64) -> Self {
        if kwh_per_100km > HIGH_CONSUMPTION_KWH_PER_100KM {
            ConsumptionRating::High
        } else if kwh_per_100km < EXCELLENT_CONSUMPTION_KWH_PER_100KM {
            ConsumptionRating::Excellent
        } else {
            ConsumptionRating::Normal
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ConsumptionRating::Excellent => "excellent",
            ConsumptionRating::Normal => "normal",
            ConsumptionRating::High => "high",
        }
    }
}

/// Range for `battery_kwh` of usable energy at `consumption_kwh_per_km`.
pub fn estimate_range_km(battery_kwh: f64, consumption_kwh_per_km: f64) -> RangeEstimate {
    if consumption_kwh_per_km > 0.0 {
        RangeEstimate::Finite(battery_kwh.max(0.0) / consumption_kwh_per_km)
    } else {
        RangeEstimate::Unlimited
    }
}

/// State of the vehicle at one checkpoint of the segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JourneyCheckpoint {
    pub fraction: f64,
    pub distance_km: f64,
    pub energy_kwh: f64,
    pub height_m: f64,
}

/// Checkpoints plus the end-of-segment summary.
#[derive(Debug, Clone, PartialEq)]
pub struct JourneyProfile {
    pub checkpoints: Vec<JourneyCheckpoint>,
    pub total_energy_kwh: f64,
    pub elevation_gain_m: f64,
    pub battery_used_percent: f64,
    pub remaining_range: RangeEstimate,
    pub potential_energy_kwh: f64,
    /// Share of the consumed energy stored as potential energy; `None` when nothing was consumed.
    pub potential_share_percent: Option<f64>,
    pub consumption_kwh_per_100km: f64,
}

/// Sample energy and height along the segment and summarise the battery impact.
///
/// Checkpoint energies ignore regeneration, matching a vehicle that has not yet reached the
/// bottom of a descent.
pub fn journey_profile(
    input: &SegmentInput,
    battery_capacity_kwh: f64,
) -> Result<JourneyProfile, SlopeError> {
    if !battery_capacity_kwh.is_finite() {
        return Err(SlopeError::NonFinite("battery_capacity_kwh"));
    }
    if battery_capacity_kwh <= 0.0 {
        return Err(SlopeError::NonPositiveCapacity);
    }

    let no_regen = SegmentInput {
        regen_efficiency: 0.0,
        ..*input
    };
    let full = evaluate_segment(&no_regen)?;
    let (sin_t, _) = slope_components(input.grade_percent);
    let length_m = km_to_m(input.length_km);

    let checkpoints: Vec<JourneyCheckpoint> = CHECKPOINT_FRACTIONS
        .iter()
        .map(|&fraction| JourneyCheckpoint {
            fraction,
            distance_km: fraction * input.length_km,
            energy_kwh: fraction * full.segment_energy_kwh,
            height_m: fraction * length_m * sin_t,
        })
        .collect();

    let total_energy = full.segment_energy_kwh;
    let elevation = length_m * sin_t;
    let kwh_per_km = total_energy / input.length_km;
    let potential = joules_to_kwh(input.mass_kg * GRAVITY_M_S2 * elevation);
    let battery_used = total_energy / battery_capacity_kwh * 100.0;
    ensure_finite(&[
        ("potential_energy_kwh", potential),
        ("battery_used_percent", battery_used),
        ("consumption_kwh_per_100km", kwh_per_km * 100.0),
    ])?;

    Ok(JourneyProfile {
        checkpoints,
        total_energy_kwh: total_energy,
        elevation_gain_m: elevation,
        battery_used_percent: battery_used,
        remaining_range: estimate_range_km(battery_capacity_kwh - total_energy, kwh_per_km),
        potential_energy_kwh: potential,
        potential_share_percent: (total_energy > 0.0).then(|| potential / total_energy * 100.0),
        consumption_kwh_per_100km: kwh_per_km * 100.0,
    })
}
