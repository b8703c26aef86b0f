//! Configuration models and loaders for the Traction Calculator.

use std::fs::File;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Electric vehicle parameters parsed from the vehicle catalog.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct VehicleConfig {
    pub name: String,
    /// Vehicle plus passengers and cargo.
    pub mass_kg: f64,
    pub battery_capacity_kwh: f64,
    pub drivetrain_efficiency: f64,
    pub rolling_resistance_coeff: f64,
    pub regen_efficiency: f64,
    #[serde(default = "default_true")]
    pub regen_enabled: bool,
}

/// Road segment preset (speed, grade, and length).
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct RouteConfig {
    pub name: String,
    pub speed_kmh: f64,
    pub grade_percent: f64,
    #[serde(default = "default_length_km")]
    pub length_km: f64,
}

/// Road surface and its tyre friction coefficient.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct SurfaceConfig {
    pub name: String,
    #[serde(default)]
    pub label: Option<String>,
    pub friction_coefficient: f64,
}

/// Rider and two-wheeler masses used by the cornering model.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct RiderConfig {
    pub name: String,
    pub rider_mass_kg: f64,
    pub vehicle_mass_kg: f64,
}

impl RiderConfig {
    pub fn total_mass_kg(&self) -> f64 {
        self.rider_mass_kg + self.vehicle_mass_kg
    }
}

/// Bounds of the speed × grade sweep; both ranges are inclusive.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SweepGridConfig {
    pub grade_min_percent: i64,
    pub grade_max_percent: i64,
    pub grade_step_percent: i64,
    pub speed_min_kmh: i64,
    pub speed_max_kmh: i64,
    pub speed_step_kmh: i64,
}

impl Default for SweepGridConfig {
    fn default() -> Self {
        Self {
            grade_min_percent: -10,
            grade_max_percent: 12,
            grade_step_percent: 2,
            speed_min_kmh: 30,
            speed_max_kmh: 110,
            speed_step_kmh: 20,
        }
    }
}

/// Errors that can occur while loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid value in '{name}': {reason}")]
    Invalid { name: String, reason: String },
}

/// Load vehicle configurations from a YAML file, a TOML file, or a directory of TOML files.
pub fn load_vehicles<P: AsRef<Path>>(path: P) -> Result<Vec<VehicleConfig>, ConfigError> {
    let vehicles: Vec<VehicleConfig> = load_records(path)?;
    for vehicle in &vehicles {
        if vehicle.mass_kg <= 0.0 {
            return Err(invalid(&vehicle.name, "mass_kg must be positive"));
        }
        if vehicle.battery_capacity_kwh <= 0.0 {
            return Err(invalid(&vehicle.name, "battery_capacity_kwh must be positive"));
        }
        if !(vehicle.drivetrain_efficiency > 0.0 && vehicle.drivetrain_efficiency <= 1.0) {
            return Err(invalid(&vehicle.name, "drivetrain_efficiency must lie in (0, 1]"));
        }
        if !(0.0..=1.0).contains(&vehicle.regen_efficiency) {
            return Err(invalid(&vehicle.name, "regen_efficiency must lie in [0, 1]"));
        }
    }
    Ok(vehicles)
}

/// Load route presets.
pub fn load_routes<P: AsRef<Path>>(path: P) -> Result<Vec<RouteConfig>, ConfigError> {
    let routes: Vec<RouteConfig> = load_records(path)?;
    for route in &routes {
        if route.length_km <= 0.0 {
            return Err(invalid(&route.name, "length_km must be positive"));
        }
    }
    Ok(routes)
}

/// Load surface friction presets.
pub fn load_surfaces<P: AsRef<Path>>(path: P) -> Result<Vec<SurfaceConfig>, ConfigError> {
    let surfaces: Vec<SurfaceConfig> = load_records(path)?;
    for surface in &surfaces {
        if surface.friction_coefficient < 0.0 {
            return Err(invalid(&surface.name, "friction_coefficient must not be negative"));
        }
    }
    Ok(surfaces)
}

/// Load rider/vehicle mass presets.
pub fn load_riders<P: AsRef<Path>>(path: P) -> Result<Vec<RiderConfig>, ConfigError> {
    let riders: Vec<RiderConfig> = load_records(path)?;
    for rider in &riders {
        if rider.total_mass_kg() <= 0.0 {
            return Err(invalid(&rider.name, "rider plus vehicle mass must be positive"));
        }
    }
    Ok(riders)
}

/// Load the sweep grid from a TOML file; missing keys fall back to the defaults.
pub fn load_sweep_grid<P: AsRef<Path>>(path: P) -> Result<SweepGridConfig, ConfigError> {
    let contents = std::fs::read_to_string(path)?;
    let grid: SweepGridConfig = toml::from_str(&contents)?;
    if grid.grade_step_percent <= 0 || grid.speed_step_kmh <= 0 {
        return Err(invalid("sweep", "step sizes must be positive"));
    }
    Ok(grid)
}

/// Case-insensitive lookup by `name` for any named config record.
pub fn find_by_name<'a, T: Named>(records: &'a [T], name: &str) -> Option<&'a T> {
    records
        .iter()
        .find(|record| record.name().eq_ignore_ascii_case(name))
}

/// Records that carry a catalog name.
pub trait Named {
    fn name(&self) -> &str;
}

macro_rules! impl_named {
    ($($ty:ty),*) => {
        $(impl Named for $ty {
            fn name(&self) -> &str {
                &self.name
            }
        })*
    };
}

impl_named!(VehicleConfig, RouteConfig, SurfaceConfig, RiderConfig);

fn invalid(name: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        name: name.to_string(),
        reason: reason.to_string(),
    }
}

fn default_true() -> bool {
    true
}

fn default_length_km() -> f64 {
    2.0
}

fn load_records<T, P>(path: P) -> Result<Vec<T>, ConfigError>
where
    T: for<'de> Deserialize<'de>,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if path.is_dir() {
        read_dir_records(path)
    } else if path.extension().map(|ext| ext == "toml").unwrap_or(false) {
        let contents = std::fs::read_to_string(path)?;
        let record: T = toml::from_str(&contents)?;
        Ok(vec![record])
    } else {
        let reader = File::open(path)?;
        Ok(serde_yaml::from_reader(reader)?)
    }
}

fn read_dir_records<T>(dir: &Path) -> Result<Vec<T>, ConfigError>
where
    T: for<'de> Deserialize<'de>,
{
    let mut records = Vec::new();
    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().map(|ext| ext == "toml").unwrap_or(false))
        .collect();
    entries.sort();
    for path in entries {
        let contents = std::fs::read_to_string(&path)?;
        let record: T = toml::from_str(&contents)?;
        records.push(record);
    }
    Ok(records)
}
