//! Export helpers for CSV and JSON artifacts.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Create a writer for the target path, handling stdout (`-`) by convention.
pub fn writer_for_path(path: &Path) -> io::Result<Box<dyn Write>> {
    if path == Path::new("-") {
        return Ok(Box::new(BufWriter::new(io::stdout())));
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(path)?;
    Ok(Box::new(BufWriter::new(file)))
}

/// File name of the form `prefix_YYYYmmdd_HHMMSS.ext` using local time.
pub fn timestamped_file_name(prefix: &str, extension: &str) -> String {
    let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    format!("{prefix}_{stamp}.{extension}")
}

pub mod slope {
    use std::io::{self, Write};

    pub const HEADER: &str = "speed_kmh,grade_percent,total_force_n,battery_power_kw,segment_energy_kwh,consumption_kwh_per_100km";

    /// Write the speed/grade sweep CSV header.
    pub fn write_header(writer: &mut dyn Write) -> io::Result<()> {
        writeln!(writer, "{}", HEADER)
    }

    /// CSV row emitted for one speed/grade grid point.
    #[derive(Debug, Clone, Copy)]
    pub struct Record {
        pub speed_kmh: f64,
        pub grade_percent: f64,
        pub total_force_n: f64,
        pub battery_power_kw: f64,
        pub segment_energy_kwh: f64,
        pub consumption_kwh_per_100km: f64,
    }

    impl Record {
        /// Serialize the record to CSV, matching the header ordering.
        pub fn write_to(&self, writer: &mut dyn Write) -> io::Result<()> {
            writeln!(
                writer,
                "{},{},{:.3},{:.4},{:.6},{:.4}",
                self.speed_kmh,
                self.grade_percent,
                self.total_force_n,
                self.battery_power_kw,
                self.segment_energy_kwh,
                self.consumption_kwh_per_100km,
            )
        }
    }
}

pub mod cornering {
    use std::io::{self, Write};

    pub const HEADER: &str = "radius_m,required_mu,required_theta_deg,safe_label,mu_available";

    /// Write the radius sweep CSV header.
    pub fn write_header(writer: &mut dyn Write) -> io::Result<()> {
        writeln!(writer, "{}", HEADER)
    }

    /// CSV row emitted for one radius sample.
    #[derive(Debug, Clone)]
    pub struct Record<'a> {
        pub radius_m: f64,
        pub required_mu: f64,
        pub required_theta_deg: f64,
        pub safe_label: &'a str,
        pub mu_available: f64,
    }

    impl<'a> Record<'a> {
        pub fn write_to(&self, writer: &mut dyn Write) -> io::Result<()> {
            writeln!(
                writer,
                "{:.6},{:.6},{:.4},{},{:.3}",
                self.radius_m,
                self.required_mu,
                self.required_theta_deg,
                self.safe_label,
                self.mu_available,
            )
        }
    }
}

pub mod grid {
    use serde::Serialize;
    use serde_json::to_writer_pretty;
    use std::fs::{self, File};
    use std::io::{self, Write};
    use std::path::Path;

    pub const HEADER: &str = "mu,radius_m,safe";

    /// Safety map over friction coefficient (rows) and turn radius (columns).
    #[derive(Debug, Clone, Serialize)]
    pub struct SafetyMap<'a> {
        pub speed_kmh: f64,
        pub speed_ms: f64,
        pub mu_samples: &'a [f64],
        pub radius_samples: &'a [f64],
        /// `cells[mu_idx][radius_idx]`, 1 = safe, 0 = unsafe.
        pub cells: &'a [Vec<u8>],
    }

    /// Write the map in long form, one `(mu, radius, safe)` triple per line.
    pub fn write_csv(writer: &mut dyn Write, map: &SafetyMap<'_>) -> io::Result<()> {
        writeln!(writer, "{}", HEADER)?;
        for (mu, row) in map.mu_samples.iter().zip(map.cells) {
            for (radius, safe) in map.radius_samples.iter().zip(row) {
                writeln!(writer, "{:.6},{:.6},{}", mu, radius, safe)?;
            }
        }
        Ok(())
    }

    /// Write the map as a pretty-printed JSON sidecar.
    pub fn write_json(path: &Path, map: &SafetyMap<'_>) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        to_writer_pretty(File::create(path)?, map)?;
        Ok(())
    }
}

pub mod journey {
    use serde::Serialize;
    use serde_json::to_writer_pretty;
    use std::fs::{self, File};
    use std::io;
    use std::path::Path;

    /// One sampled point along the segment.
    #[derive(Debug, Clone, Serialize)]
    pub struct Checkpoint {
        pub fraction: f64,
        pub distance_km: f64,
        pub energy_kwh: f64,
        pub height_m: f64,
    }

    /// Journey report written next to the sweep CSV.
    #[derive(Debug, Clone, Serialize)]
    pub struct Summary<'a> {
        pub vehicle: &'a str,
        pub speed_kmh: f64,
        pub grade_percent: f64,
        pub length_km: f64,
        pub total_energy_kwh: f64,
        pub elevation_gain_m: f64,
        pub battery_used_percent: f64,
        /// `None` when the remaining range is unlimited.
        pub remaining_range_km: Option<f64>,
        pub potential_energy_kwh: f64,
        pub potential_share_percent: Option<f64>,
        pub consumption_kwh_per_100km: f64,
        pub checkpoints: Vec<Checkpoint>,
    }

    pub fn write_summary(path: &Path, summary: &Summary<'_>) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        to_writer_pretty(File::create(path)?, summary)?;
        Ok(())
    }
}
