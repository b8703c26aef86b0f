//! Speed × grade grid evaluation.

use std::cmp::Ordering;

use tracing::debug;

use crate::model::{SlopeError, VehicleParams, ensure_finite, evaluate_segment};

/// One grid point of a speed/grade sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepRow {
    pub speed_kmh: f64,
    pub grade_percent: f64,
    pub total_force_n: f64,
    pub battery_power_kw: f64,
    pub segment_energy_kwh: f64,
    pub consumption_kwh_per_100km: f64,
}

/// Evaluate the segment model for every speed (outer) and grade (inner).
///
/// Rows come back in row-major order over the lists as given. Empty lists produce an
/// empty result; an invalid grid point aborts the whole sweep.
pub fn sweep(
    vehicle: &VehicleParams,
    speeds_kmh: &[f64],
    grades_percent: &[f64],
    length_km: f64,
) -> Result<Vec<SweepRow>, SlopeError> {
    debug!(
        speeds = speeds_kmh.len(),
        grades = grades_percent.len(),
        length_km,
        "running slope sweep"
    );

    let mut rows = Vec::with_capacity(speeds_kmh.len() * grades_percent.len());
    for &speed in speeds_kmh {
        for &grade in grades_percent {
            let out = evaluate_segment(&vehicle.segment(speed, grade, length_km))?;
            let kwh_per_km = out.segment_energy_kwh / length_km;
            ensure_finite(&[("consumption_kwh_per_100km", kwh_per_km * 100.0)])?;
            rows.push(SweepRow {
                speed_kmh: speed,
                grade_percent: grade,
                total_force_n: out.total_force_n,
                battery_power_kw: out.battery_power_kw,
                segment_energy_kwh: out.segment_energy_kwh,
                consumption_kwh_per_100km: kwh_per_km * 100.0,
            });
        }
    }
    Ok(rows)
}

/// Rows recorded at `speed_kmh`, ordered by grade.
pub fn rows_for_speed(rows: &[SweepRow], speed_kmh: f64) -> Vec<SweepRow> {
    let mut out: Vec<SweepRow> = rows
        .iter()
        .filter(|row| row.speed_kmh == speed_kmh)
        .copied()
        .collect();
    out.sort_by(|a, b| {
        a.grade_percent
            .partial_cmp(&b.grade_percent)
            .unwrap_or(Ordering::Equal)
    });
    out
}

/// Rows recorded at `grade_percent`, ordered by speed.
pub fn rows_for_grade(rows: &[SweepRow], grade_percent: f64) -> Vec<SweepRow> {
    let mut out: Vec<SweepRow> = rows
        .iter()
        .filter(|row| row.grade_percent == grade_percent)
        .copied()
        .collect();
    out.sort_by(|a, b| {
        a.speed_kmh
            .partial_cmp(&b.speed_kmh)
            .unwrap_or(Ordering::Equal)
    });
    out
}
