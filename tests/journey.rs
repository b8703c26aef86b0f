use traction_calculator::slope::{
    ConsumptionRating, RangeEstimate, SegmentInput, SlopeError, estimate_range_km,
    evaluate_segment, journey_profile,
};

fn uphill() -> SegmentInput {
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
fn range_is_capacity_over_consumption() {
    assert_eq!(estimate_range_km(60.0, 0.2), RangeEstimate::Finite(300.0));
    assert_eq!(estimate_range_km(60.0, 0.0), RangeEstimate::Unlimited);
    assert_eq!(estimate_range_km(-5.0, 0.2), RangeEstimate::Finite(0.0));
    assert_eq!(RangeEstimate::Unlimited.km(), None);
    assert_eq!(RangeEstimate::Finite(12.5).km(), Some(12.5));
}

#[test]
fn consumption_rating_thresholds() {
    assert_eq!(ConsumptionRating::classify(35.9), ConsumptionRating::High);
    assert_eq!(ConsumptionRating::classify(25.0), ConsumptionRating::Normal);
    assert_eq!(ConsumptionRating::classify(10.0), ConsumptionRating::Normal);
    assert_eq!(ConsumptionRating::classify(9.99), ConsumptionRating::Excellent);
    assert_eq!(ConsumptionRating::classify(0.0).label(), "excellent");
    assert_eq!(ConsumptionRating::High.label(), "high");
}

#[test]
fn uphill_profile_accumulates_linearly() {
    let profile = journey_profile(&uphill(), 60.0).expect("profile");
    let total = evaluate_segment(&uphill()).unwrap().segment_energy_kwh;

    assert_eq!(profile.checkpoints.len(), 5);
    assert!((profile.total_energy_kwh - total).abs() < 1e-12);
    let last = profile.checkpoints[4];
    assert_eq!(last.fraction, 1.0);
    assert_eq!(last.distance_km, 2.0);
    assert!((last.energy_kwh - total).abs() < 1e-12);
    assert_eq!(profile.checkpoints[0].energy_kwh, 0.0);
    assert_eq!(profile.checkpoints[0].height_m, 0.0);
    for pair in profile.checkpoints.windows(2) {
        assert!(pair[1].height_m > pair[0].height_m);
    }

    // 2 km at 6 % climbs about 119.8 m.
    assert!((profile.elevation_gain_m - 119.78).abs() < 0.05);
    assert!((last.height_m - profile.elevation_gain_m).abs() < 1e-9);
    assert!((profile.battery_used_percent - total / 60.0 * 100.0).abs() < 1e-12);
    assert!((profile.consumption_kwh_per_100km - 35.97).abs() < 0.01);

    let expected_range = (60.0 - total) / (total / 2.0);
    let range = profile.remaining_range.km().expect("finite range");
    assert!((range - expected_range).abs() < 1e-9);

    let potential = 1700.0 * 9.81 * profile.elevation_gain_m / 3.6e6;
    assert!((profile.potential_energy_kwh - potential).abs() < 1e-12);
    let share = profile.potential_share_percent.expect("energy consumed");
    assert!(share > 0.0 && share < 100.0);
}

#[test]
fn descent_profile_ignores_regeneration() {
    let descent = SegmentInput {
        speed_kmh: 60.0,
        grade_percent: -8.0,
        length_km: 3.0,
        ..uphill()
    };
    let profile = journey_profile(&descent, 60.0).expect("profile");

    assert_eq!(profile.total_energy_kwh, 0.0);
    assert_eq!(profile.potential_share_percent, None);
    assert_eq!(profile.remaining_range, RangeEstimate::Unlimited);
    assert!(profile.elevation_gain_m < 0.0);
    assert!(profile.potential_energy_kwh < 0.0);
    assert!(profile.checkpoints.iter().all(|c| c.energy_kwh == 0.0));
}

#[test]
fn profile_rejects_bad_capacity() {
    assert_eq!(
        journey_profile(&uphill(), 0.0),
        Err(SlopeError::NonPositiveCapacity)
    );
    assert_eq!(
        journey_profile(&uphill(), f64::NAN),
        Err(SlopeError::NonFinite("battery_capacity_kwh"))
    );
    // Positive but so small that the used share overflows.
    assert_eq!(
        journey_profile(&uphill(), 1e-310),
        Err(SlopeError::NonFinite("battery_used_percent"))
    );
    let broken = SegmentInput {
        mass_kg: -1.0,
        ..uphill()
    };
    assert_eq!(journey_profile(&broken, 60.0), Err(SlopeError::NonPositiveMass));
}
