use std::io::Write;
use std::path::PathBuf;

use anyhow::anyhow;
use clap::Parser;
use tracing::{info, warn};
use traction_calculator::config::{SurfaceConfig, load_riders, load_surfaces};
use traction_calculator::cornering::{
    MuGrid, RadiusRange, build_safety_grid, evaluate, sweep_by_radius,
};
use traction_calculator::primitives::units::kmh_to_ms;
use traction_calculator::export::{cornering as export_cornering, grid as export_grid, writer_for_path};
use traction_calculator::scenario;
use traction_cli::{init_tracing, resolve_output};

/// Friction and lean requirements of a scooter holding a constant-speed turn.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Cornering stability calculator (uniform circular motion)"
)]
struct Cli {
    /// Rider/vehicle mass presets
    #[arg(long, default_value = "configs/riders.yaml")]
    riders: PathBuf,

    /// Surface friction presets
    #[arg(long, default_value = "configs/surfaces.yaml")]
    surfaces: PathBuf,

    /// Rider preset name (defaults to the first entry)
    #[arg(long)]
    rider: Option<String>,

    /// Surface preset name, e.g. dry, wet, low-grip, ice (defaults to the first entry)
    #[arg(long)]
    surface: Option<String>,

    /// Custom friction coefficient (overrides the surface preset)
    #[arg(long)]
    mu: Option<f64>,

    /// Rider mass in kg (overrides the rider preset)
    #[arg(long)]
    rider_mass: Option<f64>,

    /// Scooter mass in kg (overrides the rider preset)
    #[arg(long)]
    vehicle_mass: Option<f64>,

    /// Constant speed in km/h
    #[arg(long, default_value_t = 25.0)]
    speed: f64,

    /// Smallest swept radius in metres
    #[arg(long, default_value_t = 5.0)]
    r_min: f64,

    /// Largest swept radius in metres
    #[arg(long, default_value_t = 40.0)]
    r_max: f64,

    /// Number of radius samples
    #[arg(long, default_value_t = 80)]
    radius_points: usize,

    /// Radius of the single-case report (clamped to the swept range, default 15 m)
    #[arg(long)]
    radius: Option<f64>,

    /// Number of friction samples in the safety map (0.05 .. 1.00)
    #[arg(long, default_value_t = 70)]
    mu_points: usize,

    /// Write the radius sweep as CSV ('-' for stdout, a directory for a timestamped name)
    #[arg(long)]
    sweep_output: Option<PathBuf>,

    /// Write the μ × r safety map as long-form CSV
    #[arg(long)]
    grid_output: Option<PathBuf>,

    /// Write the μ × r safety map as a JSON sidecar
    #[arg(long)]
    grid_json: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    if !(cli.r_min.is_finite() && cli.r_max.is_finite()) {
        return Err(anyhow!("radius range bounds must be finite"));
    }
    if cli.r_max < cli.r_min {
        return Err(anyhow!("radius range end must not be below its start"));
    }

    let riders = load_riders(&cli.riders)?;
    let surfaces = load_surfaces(&cli.surfaces)?;
    let mut rider = scenario::select(&riders, "rider", cli.rider.as_deref())?.clone();
    if let Some(mass) = cli.rider_mass {
        rider.rider_mass_kg = mass;
    }
    if let Some(mass) = cli.vehicle_mass {
        rider.vehicle_mass_kg = mass;
    }
    let mut surface: SurfaceConfig =
        scenario::select(&surfaces, "surface", cli.surface.as_deref())?.clone();
    if let Some(mu) = cli.mu {
        if mu > 1.2 {
            warn!(mu, "friction coefficient above typical tyre/road values");
        }
        surface = SurfaceConfig {
            name: "custom".to_string(),
            label: Some(format!("custom (μ={mu:.2})")),
            friction_coefficient: mu,
        };
    }

    let range = RadiusRange {
        min_m: cli.r_min,
        max_m: cli.r_max,
        count: cli.radius_points,
    };
    let case_radius = scenario::case_radius(&range, cli.radius);
    let input = scenario::cornering_input(&rider, &surface, cli.speed, case_radius);
    let result = evaluate(&input)?;
    let surface_label = surface.label.as_deref().unwrap_or(&surface.name);

    println!("=== Cornering Report ===");
    println!(
        "Rider          : {} (total {:.1} kg)",
        rider.name, input.total_mass_kg
    );
    println!(
        "Turn           : v = {:.2} m/s ({} km/h), r = {:.1} m",
        input.speed_ms, cli.speed, input.radius_m
    );
    println!(
        "Surface        : {} (μ = {:.2})",
        surface_label, surface.friction_coefficient
    );
    println!(
        "Centripetal    : a_c = {:.2} m/s², F_c = {:.1} N",
        result.centripetal_accel_ms2, result.centripetal_force_n
    );
    println!(
        "Friction       : N ≈ {:.1} N, F_f,max = {:.1} N",
        result.normal_force_n, result.max_friction_force_n
    );
    println!(
        "Requirement    : μ_min = {:.3}, lean θ = {:.1}°",
        result.required_mu, result.required_theta_deg
    );
    println!(
        "Verdict        : {}",
        if result.is_safe { "safe" } else { "risk of sliding" }
    );

    let speed_ms = kmh_to_ms(cli.speed);
    let radii = range.samples();

    if let Some(path) = &cli.sweep_output {
        let rows = sweep_by_radius(speed_ms, &radii, surface.friction_coefficient)?;
        let path = resolve_output(path, "cornering_sweep", "csv");
        let mut writer = writer_for_path(&path)?;
        export_cornering::write_header(writer.as_mut())?;
        for row in &rows {
            export_cornering::Record {
                radius_m: row.radius_m,
                required_mu: row.required_mu,
                required_theta_deg: row.required_theta_deg,
                safe_label: row.safe_label.as_str(),
                mu_available: surface.friction_coefficient,
            }
            .write_to(writer.as_mut())?;
        }
        writer.flush()?;
        info!(rows = rows.len(), path = %path.display(), "wrote radius sweep");
    }

    if cli.grid_output.is_some() || cli.grid_json.is_some() {
        let mu_grid = MuGrid {
            count: cli.mu_points,
            ..MuGrid::default()
        };
        let grid = build_safety_grid(speed_ms, &radii, &mu_grid.samples())?;
        let cells = grid.as_binary();
        let map = export_grid::SafetyMap {
            speed_kmh: cli.speed,
            speed_ms,
            mu_samples: &grid.mu_samples,
            radius_samples: &grid.radius_samples,
            cells: &cells,
        };
        if let Some(path) = &cli.grid_output {
            let path = resolve_output(path, "safety_map", "csv");
            let mut writer = writer_for_path(&path)?;
            export_grid::write_csv(writer.as_mut(), &map)?;
            writer.flush()?;
            info!(
                safe_fraction = grid.safe_fraction(),
                path = %path.display(),
                "wrote safety map"
            );
        }
        if let Some(path) = &cli.grid_json {
            let path = resolve_output(path, "safety_map", "json");
            export_grid::write_json(&path, &map)?;
            info!(path = %path.display(), "wrote safety map sidecar");
        }
    }

    Ok(())
}
