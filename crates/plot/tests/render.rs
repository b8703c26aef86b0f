use assert_cmd::Command;
use predicates::prelude::*;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use traction_calculator::cornering::{
    DEFAULT_MU_GRID, RadiusRange, build_safety_grid, sweep_by_radius,
};
use traction_calculator::export::{cornering as export_cornering, grid as export_grid, slope as export_slope};
use traction_calculator::slope::{VehicleParams, sweep};

fn write_slope_csv(path: &Path) {
    let vehicle = VehicleParams {
        mass_kg: 1700.0,
        drivetrain_efficiency: 0.9,
        rolling_resistance_coeff: 0.01,
        regen_efficiency: 0.6,
    };
    let rows = sweep(&vehicle, &[50.0, 70.0], &[-4.0, 0.0, 4.0], 2.0).expect("sweep");
    let mut file = File::create(path).expect("csv create");
    export_slope::write_header(&mut file).unwrap();
    for row in rows {
        export_slope::Record {
            speed_kmh: row.speed_kmh,
            grade_percent: row.grade_percent,
            total_force_n: row.total_force_n,
            battery_power_kw: row.battery_power_kw,
            segment_energy_kwh: row.segment_energy_kwh,
            consumption_kwh_per_100km: row.consumption_kwh_per_100km,
        }
        .write_to(&mut file)
        .unwrap();
    }
}

fn render(input: &Path, output: &Path, extra: &[&str]) -> assert_cmd::assert::Assert {
    let mut cmd = Command::cargo_bin("traction_plot").expect("traction_plot bin");
    cmd.args([
        "--input",
        input.to_str().unwrap(),
        "--output",
        output.to_str().unwrap(),
        "--width",
        "400",
        "--height",
        "300",
    ]);
    cmd.args(extra);
    cmd.assert()
}

#[test]
fn consumption_vs_grade_renders_png() {
    let dir = tempfile::tempdir().expect("tempdir");
    let csv_path = dir.path().join("slope.csv");
    let png_path = dir.path().join("charts/consumption.png");
    write_slope_csv(&csv_path);

    render(&csv_path, &png_path, &["--kind", "consumption-vs-grade"]).success();

    let metadata = fs::metadata(png_path).expect("png metadata");
    assert!(metadata.len() > 0, "PNG output should not be empty");
}

#[test]
fn consumption_vs_speed_requires_a_swept_grade() {
    let dir = tempfile::tempdir().expect("tempdir");
    let csv_path = dir.path().join("slope.csv");
    let png_path = dir.path().join("speed.png");
    write_slope_csv(&csv_path);

    render(
        &csv_path,
        &png_path,
        &["--kind", "consumption-vs-speed", "--grade", "-4"],
    )
    .success();
    assert!(png_path.exists());

    render(
        &csv_path,
        &dir.path().join("missing.png"),
        &["--kind", "consumption-vs-speed", "--grade", "7"],
    )
    .failure()
    .stderr(predicate::str::contains("no sweep rows recorded at grade 7%"));
}

#[test]
fn friction_and_safety_charts_render() {
    let dir = tempfile::tempdir().expect("tempdir");
    let speed_ms = 25.0 / 3.6;
    let radii = RadiusRange::default().samples();

    let sweep_path = dir.path().join("cornering.csv");
    let rows = sweep_by_radius(speed_ms, &radii, 0.5).expect("radius sweep");
    let mut file = File::create(&sweep_path).expect("csv create");
    export_cornering::write_header(&mut file).unwrap();
    for row in &rows {
        export_cornering::Record {
            radius_m: row.radius_m,
            required_mu: row.required_mu,
            required_theta_deg: row.required_theta_deg,
            safe_label: row.safe_label.as_str(),
            mu_available: 0.5,
        }
        .write_to(&mut file)
        .unwrap();
    }
    drop(file);

    let grid_path = dir.path().join("grid.csv");
    let grid = build_safety_grid(speed_ms, &radii, &DEFAULT_MU_GRID.samples()).expect("grid");
    let cells = grid.as_binary();
    let map = export_grid::SafetyMap {
        speed_kmh: 25.0,
        speed_ms,
        mu_samples: &grid.mu_samples,
        radius_samples: &grid.radius_samples,
        cells: &cells,
    };
    let mut file = File::create(&grid_path).expect("csv create");
    export_grid::write_csv(&mut file, &map).unwrap();
    file.flush().unwrap();

    for (kind, input) in [
        ("friction-vs-radius", &sweep_path),
        ("lean-vs-radius", &sweep_path),
        ("safety-map", &grid_path),
    ] {
        let png_path = dir.path().join(format!("{kind}.png"));
        render(input, &png_path, &["--kind", kind]).success();
        let metadata = fs::metadata(&png_path).expect("png metadata");
        assert!(metadata.len() > 0, "{kind} PNG should not be empty");
    }
}

#[test]
fn missing_column_is_reported() {
    let dir = tempfile::tempdir().expect("tempdir");
    let csv_path = dir.path().join("bad.csv");
    let mut file = File::create(&csv_path).expect("csv create");
    writeln!(file, "speed_kmh,grade_percent").unwrap();
    writeln!(file, "50,0").unwrap();
    drop(file);

    render(&csv_path, &dir.path().join("bad.png"), &[])
        .failure()
        .stderr(predicate::str::contains("missing 'total_force_n' column"));
}
