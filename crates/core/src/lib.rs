//! Core units, constants, and shared primitives for the Traction Calculator workspace.

/// Physical constants expressed in SI units (unless stated otherwise).
pub mod constants {
    /// Gravitational acceleration used by every model (m/s²).
    pub const GRAVITY_M_S2: f64 = 9.81;
    /// Joules per kilowatt-hour.
    pub const JOULES_PER_KWH: f64 = 3.6e6;
    /// Kilometres per hour in one metre per second.
    pub const KMH_PER_MS: f64 = 3.6;
    /// Metres per kilometre.
    pub const METRES_PER_KM: f64 = 1_000.0;
    /// Watts per kilowatt.
    pub const WATTS_PER_KW: f64 = 1_000.0;
}

/// Basic unit conversion helpers.
pub mod units {
    use super::constants::{JOULES_PER_KWH, KMH_PER_MS, METRES_PER_KM, WATTS_PER_KW};

    /// Convert kilometres per hour to metres per second.
    #[inline]
    pub fn kmh_to_ms(v: f64) -> f64 {
        v / KMH_PER_MS
    }

    /// Convert kilometres to metres.
    #[inline]
    pub fn km_to_m(v: f64) -> f64 {
        v * METRES_PER_KM
    }

    /// Convert joules to kilowatt-hours.
    #[inline]
    pub fn joules_to_kwh(e: f64) -> f64 {
        e / JOULES_PER_KWH
    }

    /// Convert watts to kilowatts.
    #[inline]
    pub fn watts_to_kw(p: f64) -> f64 {
        p / WATTS_PER_KW
    }
}

/// Sample grids shared by the sweep engines.
pub mod grid {
    /// `count` evenly spaced values from `start` to `end`, both ends included.
    ///
    /// A count of zero yields an empty vector and a count of one yields `[start]`.
    pub fn linspace(start: f64, end: f64, count: usize) -> Vec<f64> {
        match count {
            0 => Vec::new(),
            1 => vec![start],
            _ => {
                let step = (end - start) / (count - 1) as f64;
                (0..count)
                    .map(|i| {
                        if i == count - 1 {
                            end
                        } else {
                            start + step * i as f64
                        }
                    })
                    .collect()
            }
        }
    }

    /// Integer-stepped values from `start` up to and including `end`.
    ///
    /// Returns an empty vector when `step` is not positive or `end < start`.
    pub fn stepped_range(start: i64, end: i64, step: i64) -> Vec<f64> {
        if step <= 0 || end < start {
            return Vec::new();
        }
        (start..=end)
            .step_by(step as usize)
            .map(|v| v as f64)
            .collect()
    }

}
