//! Radius sweeps and the μ × r safety map.

use std::fmt;

use tracing::debug;
use traction_core::grid::linspace;

use crate::model::{CorneringError, required_mu};

/// Linearly spaced turn radii.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadiusRange {
    pub min_m: f64,
    pub max_m: f64,
    pub count: usize,
}

impl Default for RadiusRange {
    fn default() -> Self {
        Self {
            min_m: 5.0,
            max_m: 40.0,
            count: 80,
        }
    }
}

impl RadiusRange {
    pub fn samples(&self) -> Vec<f64> {
        linspace(self.min_m, self.max_m, self.count)
    }
}

/// Linearly spaced friction coefficients for the safety map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MuGrid {
    pub min: f64,
    pub max: f64,
    pub count: usize,
}

pub const DEFAULT_MU_GRID: MuGrid = MuGrid {
    min: 0.05,
    max: 1.00,
    count: 70,
};

impl Default for MuGrid {
    fn default() -> Self {
        DEFAULT_MU_GRID
    }
}

impl MuGrid {
    pub fn samples(&self) -> Vec<f64> {
        linspace(self.min, self.max, self.count)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SafetyLabel {
    Safe,
    Unsafe,
}

impl SafetyLabel {
    pub fn from_safe(is_safe: bool) -> Self {
        if is_safe {
            SafetyLabel::Safe
        } else {
            SafetyLabel::Unsafe
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SafetyLabel::Safe => "safe",
            SafetyLabel::Unsafe => "unsafe",
        }
    }
}

impl fmt::Display for SafetyLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Requirements at one radius of a sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorneringSweepRow {
    pub radius_m: f64,
    pub required_mu: f64,
    pub required_theta_deg: f64,
    pub safe_label: SafetyLabel,
}

/// Evaluate friction and lean requirements at each radius, in the order given.
pub fn sweep_by_radius(
    speed_ms: f64,
    radius_samples: &[f64],
    mu_available: f64,
) -> Result<Vec<CorneringSweepRow>, CorneringError> {
    if !mu_available.is_finite() {
        return Err(CorneringError::NonFinite("mu_available"));
    }
    debug!(radii = radius_samples.len(), speed_ms, mu_available, "running radius sweep");

    radius_samples
        .iter()
        .map(|&radius| {
            let mu_min = required_mu(speed_ms, radius)?;
            Ok(CorneringSweepRow {
                radius_m: radius,
                required_mu: mu_min,
                required_theta_deg: mu_min.atan().to_degrees(),
                safe_label: SafetyLabel::from_safe(mu_available >= mu_min),
            })
        })
        .collect()
}

/// Safe/unsafe classification over every (μ, r) pair; one row per μ sample.
#[derive(Debug, Clone, PartialEq)]
pub struct SafetyGrid {
    pub speed_ms: f64,
    pub mu_samples: Vec<f64>,
    pub radius_samples: Vec<f64>,
    pub cells: Vec<Vec<bool>>,
}

impl SafetyGrid {
    pub fn cell(&self, mu_idx: usize, radius_idx: usize) -> Option<bool> {
        self.cells.get(mu_idx)?.get(radius_idx).copied()
    }

    /// The grid as 1 (safe) / 0 (unsafe) values.
    pub fn as_binary(&self) -> Vec<Vec<u8>> {
        self.cells
            .iter()
            .map(|row| row.iter().map(|&safe| u8::from(safe)).collect())
            .collect()
    }

    /// Fraction of cells that are safe; zero for an empty grid.
    pub fn safe_fraction(&self) -> f64 {
        let total: usize = self.cells.iter().map(Vec::len).sum();
        if total == 0 {
            return 0.0;
        }
        let safe = self.cells.iter().flatten().filter(|&&safe| safe).count();
        safe as f64 / total as f64
    }
}

/// Classify every (μ, r) pair for a fixed speed, independent of any chosen surface.
pub fn build_safety_grid(
    speed_ms: f64,
    radius_samples: &[f64],
    mu_samples: &[f64],
) -> Result<SafetyGrid, CorneringError> {
    if mu_samples.iter().any(|mu| !mu.is_finite()) {
        return Err(CorneringError::NonFinite("mu_samples"));
    }
    debug!(
        radii = radius_samples.len(),
        mus = mu_samples.len(),
        speed_ms,
        "building safety grid"
    );

    let mu_required = radius_samples
        .iter()
        .map(|&radius| required_mu(speed_ms, radius))
        .collect::<Result<Vec<f64>, _>>()?;

    let cells = mu_samples
        .iter()
        .map(|&mu| mu_required.iter().map(|&needed| mu >= needed).collect())
        .collect();

    Ok(SafetyGrid {
        speed_ms,
        mu_samples: mu_samples.to_vec(),
        radius_samples: radius_samples.to_vec(),
        cells,
    })
}
