use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tracing::info;
use traction_calculator::cornering::SafetyLabel;
use traction_calculator::slope::{rows_for_grade, rows_for_speed};
use traction_cli::init_tracing;

mod chart;
mod read;

use chart::{ChartLayout, Series};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Kind {
    /// Slope sweep: one consumption line per speed
    ConsumptionVsGrade,
    /// Slope sweep: consumption over speed at `--grade`
    ConsumptionVsSpeed,
    /// Radius sweep: required friction with the available-μ line
    FrictionVsRadius,
    /// Radius sweep: required lean angle
    LeanVsRadius,
    /// Long-form μ × r safety map
    SafetyMap,
}

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Render slope and cornering charts from exported CSV"
)]
struct Cli {
    #[arg(long)]
    input: PathBuf,
    #[arg(long, default_value = "artifacts/chart.png")]
    output: PathBuf,
    #[arg(long, value_enum, default_value_t = Kind::ConsumptionVsGrade)]
    kind: Kind,
    /// Grade (percent) plotted by `consumption-vs-speed`
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    grade: f64,
    #[arg(long, default_value_t = 1200)]
    width: u32,
    #[arg(long, default_value_t = 900)]
    height: u32,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let size = (cli.width, cli.height);

    match cli.kind {
        Kind::ConsumptionVsGrade => {
            let rows = read::slope_rows(&cli.input)?;
            let speeds = read::axis(rows.iter().map(|r| r.speed_kmh));
            if speeds.is_empty() {
                return Err(anyhow::anyhow!("no sweep rows in the provided CSV"));
            }
            let series: Vec<Series> = speeds
                .iter()
                .enumerate()
                .map(|(i, &speed)| Series {
                    label: format!("{speed} km/h"),
                    points: rows_for_speed(&rows, speed)
                        .iter()
                        .map(|r| (r.grade_percent, r.consumption_kwh_per_100km))
                        .collect(),
                    color: chart::jet_color(spread(i, speeds.len())),
                })
                .collect();
            let layout = ChartLayout {
                caption: "Consumption vs grade".to_string(),
                x_desc: "Grade (%)",
                y_desc: "Consumption (kWh/100 km)",
                reference: None,
            };
            chart::draw_lines(&cli.output, size, &layout, &series, &[])?;
        }
        Kind::ConsumptionVsSpeed => {
            let rows = read::slope_rows(&cli.input)?;
            let selected = rows_for_grade(&rows, cli.grade);
            if selected.is_empty() {
                return Err(anyhow::anyhow!(
                    "no sweep rows recorded at grade {}%",
                    cli.grade
                ));
            }
            let series = [Series {
                label: format!("grade {}%", cli.grade),
                points: selected
                    .iter()
                    .map(|r| (r.speed_kmh, r.consumption_kwh_per_100km))
                    .collect(),
                color: chart::jet_color(0.15),
            }];
            let layout = ChartLayout {
                caption: format!("Consumption vs speed (grade {}%)", cli.grade),
                x_desc: "Speed (km/h)",
                y_desc: "Consumption (kWh/100 km)",
                reference: None,
            };
            chart::draw_lines(&cli.output, size, &layout, &series, &[])?;
        }
        Kind::FrictionVsRadius => {
            let sweep = read::cornering_rows(&cli.input)?;
            if sweep.rows.is_empty() {
                return Err(anyhow::anyhow!("no radius rows in the provided CSV"));
            }
            let series = [Series {
                label: "required μ".to_string(),
                points: sweep
                    .rows
                    .iter()
                    .map(|r| (r.radius_m, r.required_mu))
                    .collect(),
                color: chart::jet_color(0.1),
            }];
            let unsafe_points: Vec<(f64, f64)> = sweep
                .rows
                .iter()
                .filter(|r| r.safe_label == SafetyLabel::Unsafe)
                .map(|r| (r.radius_m, r.required_mu))
                .collect();
            let layout = ChartLayout {
                caption: "Required friction vs turn radius".to_string(),
                x_desc: "Radius (m)",
                y_desc: "μ",
                reference: sweep
                    .mu_available
                    .map(|mu| (format!("available μ = {mu:.2}"), mu)),
            };
            chart::draw_lines(&cli.output, size, &layout, &series, &unsafe_points)?;
        }
        Kind::LeanVsRadius => {
            let sweep = read::cornering_rows(&cli.input)?;
            if sweep.rows.is_empty() {
                return Err(anyhow::anyhow!("no radius rows in the provided CSV"));
            }
            let series = [Series {
                label: "lean angle".to_string(),
                points: sweep
                    .rows
                    .iter()
                    .map(|r| (r.radius_m, r.required_theta_deg))
                    .collect(),
                color: chart::jet_color(0.85),
            }];
            let layout = ChartLayout {
                caption: "Lean angle vs turn radius".to_string(),
                x_desc: "Radius (m)",
                y_desc: "θ (deg)",
                reference: None,
            };
            chart::draw_lines(&cli.output, size, &layout, &series, &[])?;
        }
        Kind::SafetyMap => {
            let cells = read::safety_cells(&cli.input)?;
            if cells.is_empty() {
                return Err(anyhow::anyhow!("no safety cells in the provided CSV"));
            }
            chart::draw_safety_map(&cli.output, size, &cells)?;
        }
    }

    info!(kind = ?cli.kind, path = %cli.output.display(), "rendered chart");
    Ok(())
}

fn spread(idx: usize, count: usize) -> f64 {
    if count <= 1 {
        0.0
    } else {
        idx as f64 / (count - 1) as f64
    }
}
