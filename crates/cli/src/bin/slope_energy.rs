use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use tracing::info;
use traction_calculator::config::{
    RouteConfig, SweepGridConfig, VehicleConfig, load_routes, load_sweep_grid, load_vehicles,
};
use traction_calculator::export::{journey as export_journey, slope as export_slope, writer_for_path};
use traction_calculator::scenario;
use traction_calculator::slope::{
    self, ConsumptionRating, RangeEstimate, estimate_range_km, evaluate_segment, journey_profile,
    slope_angle_deg,
};
use traction_cli::{init_tracing, resolve_output};

/// Energy use of an electric vehicle on a sloped road segment.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Slope energy calculator (quasi-static force balance)"
)]
struct Cli {
    /// Vehicle catalog (YAML file, TOML file, or directory of TOML files)
    #[arg(long, default_value = "configs/vehicles")]
    vehicles: PathBuf,

    /// Route preset catalog
    #[arg(long, default_value = "configs/routes.yaml")]
    routes: PathBuf,

    /// Sweep grid bounds (TOML); built-in defaults apply when the file is absent
    #[arg(long, default_value = "configs/sweep.toml")]
    sweep_config: PathBuf,

    /// Vehicle name from the catalog (defaults to the first entry)
    #[arg(long)]
    vehicle: Option<String>,

    /// Route preset name, e.g. urban, mountain, highway (defaults to the first entry)
    #[arg(long)]
    route: Option<String>,

    /// Total mass in kg (overrides the vehicle preset)
    #[arg(long)]
    mass: Option<f64>,

    /// Usable battery capacity in kWh (overrides the vehicle preset)
    #[arg(long)]
    battery: Option<f64>,

    /// Drivetrain efficiency η (overrides the vehicle preset)
    #[arg(long)]
    efficiency: Option<f64>,

    /// Rolling resistance coefficient Crr (overrides the vehicle preset)
    #[arg(long)]
    crr: Option<f64>,

    /// Regenerative efficiency on descents (overrides the vehicle preset)
    #[arg(long)]
    regen_efficiency: Option<f64>,

    /// Disable regeneration on descents
    #[arg(long, default_value_t = false)]
    no_regen: bool,

    /// Speed in km/h (overrides the route preset)
    #[arg(long)]
    speed: Option<f64>,

    /// Grade in percent, positive uphill (overrides the route preset)
    #[arg(long, allow_hyphen_values = true)]
    grade: Option<f64>,

    /// Segment length in km (overrides the route preset)
    #[arg(long)]
    length: Option<f64>,

    /// Write the speed × grade sweep as CSV ('-' for stdout, a directory for a timestamped name)
    #[arg(long)]
    sweep_output: Option<PathBuf>,

    /// Write the journey checkpoints and summary as JSON
    #[arg(long)]
    journey_output: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let vehicles = load_vehicles(&cli.vehicles)?;
    let routes = load_routes(&cli.routes)?;
    let vehicle = apply_vehicle_overrides(
        scenario::select(&vehicles, "vehicle", cli.vehicle.as_deref())?,
        &cli,
    );
    let route = apply_route_overrides(
        scenario::select(&routes, "route", cli.route.as_deref())?,
        &cli,
    );

    let input = scenario::segment_input(&vehicle, &route);
    let out = evaluate_segment(&input)?;
    let kwh_per_km = out.segment_energy_kwh / input.length_km;
    let kwh_per_100km = kwh_per_km * 100.0;
    let range = estimate_range_km(vehicle.battery_capacity_kwh, kwh_per_km);

    println!("=== Segment Report ===");
    println!("Vehicle        : {} ({:.0} kg)", vehicle.name, input.mass_kg);
    println!(
        "Segment        : {:.2} km at {} km/h, grade {}% ({:.2}°)",
        input.length_km,
        input.speed_kmh,
        input.grade_percent,
        slope_angle_deg(input.grade_percent)
    );
    println!(
        "Forces         : grade = {:.1} N, rolling = {:.1} N, total = {:.1} N",
        out.grade_force_n, out.rolling_force_n, out.total_force_n
    );
    println!(
        "Power          : mechanical = {:.2} kW, battery = {:.2} kW",
        out.mechanical_power_kw, out.battery_power_kw
    );
    println!(
        "Energy         : segment = {:.3} kWh, regenerated = {:.3} kWh",
        out.segment_energy_kwh, out.regen_energy_kwh
    );
    println!(
        "Consumption    : {:.2} kWh/100 km ({})",
        kwh_per_100km,
        ConsumptionRating::classify(kwh_per_100km).label()
    );
    println!("Range          : {}", format_range(range));

    if let Some(path) = &cli.sweep_output {
        let grid = if cli.sweep_config.exists() {
            load_sweep_grid(&cli.sweep_config)?
        } else {
            SweepGridConfig::default()
        };
        let (speeds, grades) = scenario::sweep_axes(&grid);
        let rows = slope::sweep(&input.vehicle(), &speeds, &grades, input.length_km)?;

        let path = resolve_output(path, "slope_sweep", "csv");
        let mut writer = writer_for_path(&path)?;
        export_slope::write_header(writer.as_mut())?;
        for row in &rows {
            export_slope::Record {
                speed_kmh: row.speed_kmh,
                grade_percent: row.grade_percent,
                total_force_n: row.total_force_n,
                battery_power_kw: row.battery_power_kw,
                segment_energy_kwh: row.segment_energy_kwh,
                consumption_kwh_per_100km: row.consumption_kwh_per_100km,
            }
            .write_to(writer.as_mut())?;
        }
        writer.flush()?;
        info!(rows = rows.len(), path = %path.display(), "wrote slope sweep");
    }

    if let Some(path) = &cli.journey_output {
        let profile = journey_profile(&input, vehicle.battery_capacity_kwh)?;
        let summary = export_journey::Summary {
            vehicle: &vehicle.name,
            speed_kmh: input.speed_kmh,
            grade_percent: input.grade_percent,
            length_km: input.length_km,
            total_energy_kwh: profile.total_energy_kwh,
            elevation_gain_m: profile.elevation_gain_m,
            battery_used_percent: profile.battery_used_percent,
            remaining_range_km: profile.remaining_range.km(),
            potential_energy_kwh: profile.potential_energy_kwh,
            potential_share_percent: profile.potential_share_percent,
            consumption_kwh_per_100km: profile.consumption_kwh_per_100km,
            checkpoints: profile
                .checkpoints
                .iter()
                .map(|c| export_journey::Checkpoint {
                    fraction: c.fraction,
                    distance_km: c.distance_km,
                    energy_kwh: c.energy_kwh,
                    height_m: c.height_m,
                })
                .collect(),
        };
        let path = resolve_output(path, "journey", "json");
        export_journey::write_summary(&path, &summary)?;
        info!(path = %path.display(), "wrote journey summary");
    }

    Ok(())
}

fn apply_vehicle_overrides(preset: &VehicleConfig, cli: &Cli) -> VehicleConfig {
    let mut vehicle = preset.clone();
    if let Some(mass) = cli.mass {
        vehicle.mass_kg = mass;
    }
    if let Some(battery) = cli.battery {
        vehicle.battery_capacity_kwh = battery;
    }
    if let Some(efficiency) = cli.efficiency {
        vehicle.drivetrain_efficiency = efficiency;
    }
    if let Some(crr) = cli.crr {
        vehicle.rolling_resistance_coeff = crr;
    }
    if let Some(regen) = cli.regen_efficiency {
        vehicle.regen_efficiency = regen;
    }
    if cli.no_regen {
        vehicle.regen_enabled = false;
    }
    vehicle
}

fn apply_route_overrides(preset: &RouteConfig, cli: &Cli) -> RouteConfig {
    let mut route = preset.clone();
    if let Some(speed) = cli.speed {
        route.speed_kmh = speed;
    }
    if let Some(grade) = cli.grade {
        route.grade_percent = grade;
    }
    if let Some(length) = cli.length {
        route.length_km = length;
    }
    route
}

fn format_range(range: RangeEstimate) -> String {
    match range {
        RangeEstimate::Finite(km) => format!("{km:.0} km"),
        RangeEstimate::Unlimited => "unlimited".to_string(),
    }
}
