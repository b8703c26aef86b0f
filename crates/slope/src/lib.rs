//! Quasi-static energy model for an electric vehicle on a sloped road segment.

pub mod journey;
pub mod model;
pub mod sweep;

pub use journey::{
    ConsumptionRating, JourneyCheckpoint, JourneyProfile, RangeEstimate, estimate_range_km,
    journey_profile,
};
pub use model::{
    SegmentInput, SegmentResult, SlopeError, VehicleParams, evaluate_segment, slope_angle_deg,
    slope_components,
};
pub use sweep::{SweepRow, rows_for_grade, rows_for_speed, sweep};
