use traction_calculator::slope::{
    SegmentInput, SlopeError, evaluate_segment, slope_angle_deg, slope_components,
};

fn base_input() -> SegmentInput {
    SegmentInput {
        mass_kg: 1700.0,
        speed_kmh: 70.0,
        grade_percent: 6.0,
        length_km: 2.0,
        drivetrain_efficiency: 0.90,
        rolling_resistance_coeff: 0.010,
        regen_efficiency: 0.60,
    }
}

#[test]
fn slope_components_satisfy_trig_identity() {
    for grade in [-1e200, -15.0, -8.0, -0.5, 0.0, 3.0, 6.0, 12.0, 40.0, 1e200, 1e300] {
        let (sin_t, cos_t) = slope_components(grade);
        assert!((sin_t * sin_t + cos_t * cos_t - 1.0).abs() < 1e-12, "grade {grade}");
        assert!(cos_t > 0.0);
        assert_eq!(sin_t.signum(), if grade < 0.0 { -1.0 } else { 1.0 });
    }
}

#[test]
fn slope_angle_matches_grade() {
    assert!((slope_angle_deg(6.0) - 3.4336).abs() < 1e-3);
    assert_eq!(slope_angle_deg(0.0), 0.0);
    assert!((slope_angle_deg(-6.0) + slope_angle_deg(6.0)).abs() < 1e-12);
}

#[test]
fn uphill_reference_segment() {
    let out = evaluate_segment(&base_input()).expect("valid segment");

    assert!((out.grade_force_n - 998.82).abs() < 0.5, "{}", out.grade_force_n);
    assert!((out.rolling_force_n - 166.47).abs() < 0.5, "{}", out.rolling_force_n);
    assert!((out.total_force_n - 1165.29).abs() < 0.5);
    assert!((out.segment_energy_kwh - 0.719).abs() < 1e-3);
    let consumption = out.segment_energy_kwh / 2.0 * 100.0;
    assert!((consumption - 35.9).abs() < 0.1, "{consumption}");

    assert!((out.mechanical_power_kw - 22.66).abs() < 0.01);
    assert!((out.battery_power_kw - out.mechanical_power_kw / 0.90).abs() < 1e-9);
    assert_eq!(out.regen_energy_kwh, 0.0);
}

#[test]
fn flat_road_only_has_rolling_resistance() {
    let input = SegmentInput {
        grade_percent: 0.0,
        ..base_input()
    };
    let out = evaluate_segment(&input).expect("valid segment");
    let weight = 1700.0 * 9.81;

    assert_eq!(out.grade_force_n, 0.0);
    assert!((out.rolling_force_n - 0.010 * weight).abs() < 1e-9);
    assert_eq!(out.total_force_n, out.rolling_force_n);
    assert_eq!(out.regen_energy_kwh, 0.0);
    let expected_kwh = out.rolling_force_n * 2000.0 / 0.90 / 3.6e6;
    assert!((out.segment_energy_kwh - expected_kwh).abs() < 1e-12);
}

#[test]
fn rolling_force_never_negative() {
    for grade in [-20.0, -6.0, 0.0, 6.0, 20.0] {
        let input = SegmentInput {
            grade_percent: grade,
            ..base_input()
        };
        let out = evaluate_segment(&input).expect("valid segment");
        assert!(out.rolling_force_n >= 0.0, "grade {grade}");
        assert!(out.segment_energy_kwh >= 0.0, "grade {grade}");
    }
}

#[test]
fn regen_only_recovers_on_descents() {
    for grade in [0.0, 2.0, 8.0] {
        let input = SegmentInput {
            grade_percent: grade,
            ..base_input()
        };
        assert_eq!(evaluate_segment(&input).unwrap().regen_energy_kwh, 0.0);
    }

    let input = SegmentInput {
        grade_percent: -1.0,
        ..base_input()
    };
    let out = evaluate_segment(&input).unwrap();
    assert!(out.regen_energy_kwh > 0.0);
}

#[test]
fn steep_descent_energy_floors_at_zero() {
    let input = SegmentInput {
        speed_kmh: 60.0,
        grade_percent: -8.0,
        length_km: 3.0,
        ..base_input()
    };
    let out = evaluate_segment(&input).expect("valid segment");

    assert!(out.total_force_n < 0.0);
    assert!(out.battery_power_kw < 0.0);
    assert!((out.regen_energy_kwh - 0.665).abs() < 1e-3);
    assert_eq!(out.segment_energy_kwh, 0.0);
}

#[test]
fn zero_speed_draws_no_power() {
    let input = SegmentInput {
        speed_kmh: 0.0,
        ..base_input()
    };
    let out = evaluate_segment(&input).expect("valid segment");
    assert_eq!(out.mechanical_power_kw, 0.0);
    assert_eq!(out.battery_power_kw, 0.0);
    assert!(out.segment_energy_kwh > 0.0);
}

#[test]
fn overflowing_products_are_rejected() {
    let heavy = SegmentInput {
        mass_kg: 1e308,
        grade_percent: 0.0,
        ..base_input()
    };
    assert!(matches!(
        evaluate_segment(&heavy),
        Err(SlopeError::NonFinite(_))
    ));

    let fast = SegmentInput {
        speed_kmh: 1e306,
        ..base_input()
    };
    assert_eq!(
        evaluate_segment(&fast),
        Err(SlopeError::NonFinite("mechanical_power_kw"))
    );

    let long = SegmentInput {
        length_km: 1e307,
        grade_percent: -3.0,
        ..base_input()
    };
    assert!(matches!(
        evaluate_segment(&long),
        Err(SlopeError::NonFinite(_))
    ));
}

#[test]
fn extreme_finite_grade_still_evaluates() {
    let wall = SegmentInput {
        grade_percent: 1e200,
        ..base_input()
    };
    let out = evaluate_segment(&wall).expect("finite result");
    // Effectively vertical: the full weight acts along the road.
    assert!((out.grade_force_n - 1700.0 * 9.81).abs() < 1e-6);
    assert!(out.rolling_force_n >= 0.0);
    assert!(out.segment_energy_kwh.is_finite());
}

#[test]
fn invalid_inputs_are_rejected() {
    let cases = [
        (
            SegmentInput {
                mass_kg: 0.0,
                ..base_input()
            },
            SlopeError::NonPositiveMass,
        ),
        (
            SegmentInput {
                length_km: -1.0,
                ..base_input()
            },
            SlopeError::NonPositiveLength,
        ),
        (
            SegmentInput {
                drivetrain_efficiency: 0.0,
                ..base_input()
            },
            SlopeError::NonPositiveEfficiency,
        ),
        (
            SegmentInput {
                speed_kmh: -5.0,
                ..base_input()
            },
            SlopeError::NegativeSpeed,
        ),
        (
            SegmentInput {
                grade_percent: f64::NAN,
                ..base_input()
            },
            SlopeError::NonFinite("grade_percent"),
        ),
        (
            SegmentInput {
                mass_kg: f64::INFINITY,
                ..base_input()
            },
            SlopeError::NonFinite("mass_kg"),
        ),
    ];
    for (input, expected) in cases {
        assert_eq!(evaluate_segment(&input), Err(expected));
    }
}
