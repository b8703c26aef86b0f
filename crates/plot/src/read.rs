//! CSV readers for the exported sweeps.

use std::path::Path;

use anyhow::anyhow;
use csv::{ReaderBuilder, StringRecord};
use traction_calculator::cornering::{CorneringSweepRow, SafetyLabel};
use traction_calculator::slope::SweepRow;

/// Radius sweep rows plus the available friction they were labelled against.
pub struct CorneringSeries {
    pub rows: Vec<CorneringSweepRow>,
    pub mu_available: Option<f64>,
}

/// Long-form safety map cell.
#[derive(Debug, Clone, Copy)]
pub struct SafetyCell {
    pub mu: f64,
    pub radius_m: f64,
    pub safe: bool,
}

fn column(headers: &StringRecord, name: &str) -> anyhow::Result<usize> {
    headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(name))
        .ok_or_else(|| anyhow!("CSV missing '{name}' column"))
}

fn number(record: &StringRecord, idx: usize) -> f64 {
    record
        .get(idx)
        .unwrap_or("")
        .trim()
        .parse()
        .unwrap_or(f64::NAN)
}

pub fn slope_rows(path: &Path) -> anyhow::Result<Vec<SweepRow>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let headers = rdr.headers()?.clone();
    let speed_idx = column(&headers, "speed_kmh")?;
    let grade_idx = column(&headers, "grade_percent")?;
    let force_idx = column(&headers, "total_force_n")?;
    let power_idx = column(&headers, "battery_power_kw")?;
    let energy_idx = column(&headers, "segment_energy_kwh")?;
    let consumption_idx = column(&headers, "consumption_kwh_per_100km")?;

    let mut rows = Vec::new();
    for rec in rdr.records() {
        let r = rec?;
        let row = SweepRow {
            speed_kmh: number(&r, speed_idx),
            grade_percent: number(&r, grade_idx),
            total_force_n: number(&r, force_idx),
            battery_power_kw: number(&r, power_idx),
            segment_energy_kwh: number(&r, energy_idx),
            consumption_kwh_per_100km: number(&r, consumption_idx),
        };
        if row.speed_kmh.is_finite()
            && row.grade_percent.is_finite()
            && row.consumption_kwh_per_100km.is_finite()
        {
            rows.push(row);
        }
    }
    Ok(rows)
}

pub fn cornering_rows(path: &Path) -> anyhow::Result<CorneringSeries> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let headers = rdr.headers()?.clone();
    let radius_idx = column(&headers, "radius_m")?;
    let mu_idx = column(&headers, "required_mu")?;
    let theta_idx = column(&headers, "required_theta_deg")?;
    let label_idx = column(&headers, "safe_label")?;
    // Optional: older exports carry no reference line.
    let available_idx = column(&headers, "mu_available").ok();

    let mut rows = Vec::new();
    let mut mu_available = None;
    for rec in rdr.records() {
        let r = rec?;
        let radius_m = number(&r, radius_idx);
        let required_mu = number(&r, mu_idx);
        let required_theta_deg = number(&r, theta_idx);
        if !(radius_m.is_finite() && required_mu.is_finite() && required_theta_deg.is_finite()) {
            continue;
        }
        let safe = r
            .get(label_idx)
            .unwrap_or("")
            .trim()
            .eq_ignore_ascii_case(SafetyLabel::Safe.as_str());
        if mu_available.is_none() {
            mu_available = available_idx
                .map(|idx| number(&r, idx))
                .filter(|mu| mu.is_finite());
        }
        rows.push(CorneringSweepRow {
            radius_m,
            required_mu,
            required_theta_deg,
            safe_label: SafetyLabel::from_safe(safe),
        });
    }
    rows.sort_by(|a, b| a.radius_m.total_cmp(&b.radius_m));
    Ok(CorneringSeries { rows, mu_available })
}

pub fn safety_cells(path: &Path) -> anyhow::Result<Vec<SafetyCell>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let headers = rdr.headers()?.clone();
    let mu_idx = column(&headers, "mu")?;
    let radius_idx = column(&headers, "radius_m")?;
    let safe_idx = column(&headers, "safe")?;

    let mut cells = Vec::new();
    for rec in rdr.records() {
        let r = rec?;
        let mu = number(&r, mu_idx);
        let radius_m = number(&r, radius_idx);
        let flag = r.get(safe_idx).unwrap_or("").trim();
        let safe = flag == "1" || flag.eq_ignore_ascii_case("true");
        if mu.is_finite() && radius_m.is_finite() {
            cells.push(SafetyCell { mu, radius_m, safe });
        }
    }
    Ok(cells)
}

/// Sorted distinct values.
pub fn axis(values: impl Iterator<Item = f64>) -> Vec<f64> {
    let mut out: Vec<f64> = values.collect();
    out.sort_by(f64::total_cmp);
    out.dedup();
    out
}
