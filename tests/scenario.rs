use traction_calculator::config::{
    RiderConfig, RouteConfig, SurfaceConfig, SweepGridConfig, VehicleConfig,
};
use traction_calculator::cornering::{RadiusRange, evaluate};
use traction_calculator::scenario::{
    DEFAULT_CASE_RADIUS_M, ScenarioError, case_radius, cornering_input, segment_input, select,
    sweep_axes, vehicle_params,
};
use traction_calculator::slope::evaluate_segment;

fn compact(regen_enabled: bool) -> VehicleConfig {
    VehicleConfig {
        name: "Compact EV".to_string(),
        mass_kg: 1700.0,
        battery_capacity_kwh: 60.0,
        drivetrain_efficiency: 0.90,
        rolling_resistance_coeff: 0.010,
        regen_efficiency: 0.60,
        regen_enabled,
    }
}

fn route(name: &str, speed_kmh: f64, grade_percent: f64) -> RouteConfig {
    RouteConfig {
        name: name.to_string(),
        speed_kmh,
        grade_percent,
        length_km: 2.0,
    }
}

#[test]
fn select_defaults_to_first_entry() {
    let routes = vec![route("urban", 50.0, 0.0), route("mountain", 60.0, 6.0)];

    assert_eq!(select(&routes, "route", None).unwrap().name, "urban");
    assert_eq!(select(&routes, "route", Some("Mountain")).unwrap().name, "mountain");
    assert_eq!(
        select(&routes, "route", Some("coast")),
        Err(ScenarioError::NotFound {
            kind: "route",
            name: "coast".to_string(),
        })
    );
    let empty: Vec<RouteConfig> = Vec::new();
    assert_eq!(
        select(&empty, "route", None),
        Err(ScenarioError::EmptyCatalog("route"))
    );
}

#[test]
fn disabled_regeneration_zeroes_its_efficiency() {
    assert_eq!(vehicle_params(&compact(true)).regen_efficiency, 0.60);
    assert_eq!(vehicle_params(&compact(false)).regen_efficiency, 0.0);

    let descent = route("descent", 60.0, -4.0);
    let with = evaluate_segment(&segment_input(&compact(true), &descent)).unwrap();
    let without = evaluate_segment(&segment_input(&compact(false), &descent)).unwrap();
    assert!(with.regen_energy_kwh > 0.0);
    assert_eq!(without.regen_energy_kwh, 0.0);
    assert!(with.segment_energy_kwh <= without.segment_energy_kwh);
}

#[test]
fn segment_input_combines_vehicle_and_route() {
    let input = segment_input(&compact(true), &route("default", 70.0, 6.0));
    assert_eq!(input.mass_kg, 1700.0);
    assert_eq!(input.speed_kmh, 70.0);
    assert_eq!(input.grade_percent, 6.0);
    assert_eq!(input.length_km, 2.0);
    assert_eq!(input.drivetrain_efficiency, 0.90);
}

#[test]
fn cornering_input_sums_masses() {
    let rider = RiderConfig {
        name: "reference".to_string(),
        rider_mass_kg: 70.0,
        vehicle_mass_kg: 18.0,
    };
    let dry = SurfaceConfig {
        name: "dry".to_string(),
        label: None,
        friction_coefficient: 0.80,
    };
    let input = cornering_input(&rider, &dry, 25.0, 15.0);
    assert_eq!(input.total_mass_kg, 88.0);
    assert!((input.speed_ms - 6.9444).abs() < 1e-3);
    assert!(evaluate(&input).unwrap().is_safe);
}

#[test]
fn sweep_axes_follow_grid_bounds() {
    let (speeds, grades) = sweep_axes(&SweepGridConfig::default());
    assert_eq!(speeds, vec![30.0, 50.0, 70.0, 90.0, 110.0]);
    assert_eq!(grades.len(), 12);
    assert_eq!(grades.first(), Some(&-10.0));
    assert_eq!(grades.last(), Some(&12.0));
}

#[test]
fn case_radius_stays_within_sweep() {
    let range = RadiusRange::default();
    assert_eq!(case_radius(&range, None), DEFAULT_CASE_RADIUS_M);
    assert_eq!(case_radius(&range, Some(2.0)), 5.0);
    assert_eq!(case_radius(&range, Some(60.0)), 40.0);

    let narrow = RadiusRange {
        min_m: 20.0,
        max_m: 30.0,
        count: 10,
    };
    assert_eq!(case_radius(&narrow, None), 20.0);
}
