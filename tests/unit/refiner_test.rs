//! Unit tests for week-level duration refinement.

use chrono::Weekday;
use pedalplan::planner::refiner::{DurationRefiner, MAX_REFINE_ITERATIONS, REFINE_TOLERANCE_PCT};
use pedalplan::planner::types::{
    Effort, PlannedWorkout, ScalingSpec, Segment, TrainingDaySlot, Workout, WorkoutType,
};

fn endurance_ride(duration_min: f64) -> Workout {
    Workout::new(
        "Endurance Ride".to_string(),
        "Aerobic base".to_string(),
        WorkoutType::Endurance,
        vec![
            Segment::Warmup(Effort::new(10.0, 40, 60)),
            Segment::Endurance(Effort::new(duration_min - 20.0, 60, 70)),
            Segment::Cooldown(Effort::new(10.0, 60, 40)),
        ],
    )
    .with_tss(duration_min * 0.6)
    .with_scaling(ScalingSpec::Duration {
        min_value: 60.0,
        max_value: 240.0,
    })
}

fn sweet_spot_session() -> Workout {
    Workout::new(
        "Sweet Spot 2x20".to_string(),
        String::new(),
        WorkoutType::SweetSpot,
        vec![
            Segment::Warmup(Effort::new(15.0, 40, 70)),
            Segment::Interval {
                sets: 2,
                work: Effort::new(20.0, 88, 94),
                recovery: Effort::new(5.0, 50, 55),
            },
            Segment::Cooldown(Effort::new(10.0, 60, 40)),
        ],
    )
    .with_tss(72.0)
}

#[test]
fn test_iteration_constants_pinned() {
    assert_eq!(MAX_REFINE_ITERATIONS, 5);
    assert_eq!(REFINE_TOLERANCE_PCT, 0.05);
}

#[test]
fn test_residual_lands_on_flexible_slots_only() {
    let refiner = DurationRefiner::new();
    let workouts = vec![
        PlannedWorkout::new(sweet_spot_session(), Weekday::Wed),
        PlannedWorkout::new(endurance_ride(100.0), Weekday::Sat),
        PlannedWorkout::new(endurance_ride(100.0), Weekday::Sun),
    ];
    let slots = vec![
        TrainingDaySlot::new(Weekday::Wed, WorkoutType::SweetSpot),
        TrainingDaySlot::new(Weekday::Sat, WorkoutType::Endurance),
        TrainingDaySlot::new(Weekday::Sun, WorkoutType::Endurance),
    ];

    // 275 min on the books, 5.5 hours prescribed
    let refined = refiner.refine(&workouts, &slots, 5.5);

    let total: f64 = refined.iter().map(|p| p.workout.base_duration_min).sum();
    assert!((total - 330.0).abs() < REFINE_TOLERANCE_PCT * 330.0);
    assert!((refined[0].workout.base_duration_min - 75.0).abs() < 0.01);
    // both endurance rides took half the 55-minute residual
    assert!((refined[1].workout.base_duration_min - 127.5).abs() < 0.01);
    assert!((refined[2].workout.base_duration_min - 127.5).abs() < 0.01);
}

#[test]
fn test_inputs_are_never_mutated() {
    let refiner = DurationRefiner::new();
    let workouts = vec![
        PlannedWorkout::new(endurance_ride(100.0), Weekday::Sat),
        PlannedWorkout::new(endurance_ride(100.0), Weekday::Sun),
    ];
    let snapshot = workouts.clone();
    let slots = vec![
        TrainingDaySlot::new(Weekday::Sat, WorkoutType::Endurance),
        TrainingDaySlot::new(Weekday::Sun, WorkoutType::Endurance),
    ];

    let refined = refiner.refine(&workouts, &slots, 5.0);

    assert_eq!(workouts, snapshot);
    assert!(refined != workouts, "refinement should have produced copies");
}

#[test]
fn test_bounded_when_target_is_unreachable() {
    let refiner = DurationRefiner::new();
    let workouts = vec![PlannedWorkout::new(endurance_ride(120.0), Weekday::Sat)];
    let slots = vec![TrainingDaySlot::new(Weekday::Sat, WorkoutType::Endurance)];

    // 10 hours cannot fit one ride; refinement stops at the profile max.
    let refined = refiner.refine(&workouts, &slots, 10.0);

    assert!((refined[0].workout.base_duration_min - 240.0).abs() < 0.01);
}

#[test]
fn test_mixed_slots_are_adjustable() {
    let refiner = DurationRefiner::new();
    let mixed = Workout::new(
        "Tempo with Endurance Finish".to_string(),
        String::new(),
        WorkoutType::Mixed,
        vec![
            Segment::Warmup(Effort::new(10.0, 40, 60)),
            Segment::Tempo(Effort::new(30.0, 76, 85)),
            Segment::Endurance(Effort::new(60.0, 60, 70)),
            Segment::Cooldown(Effort::new(10.0, 60, 40)),
        ],
    )
    .with_tss(75.0)
    .with_scaling(ScalingSpec::Duration {
        min_value: 75.0,
        max_value: 180.0,
    });
    let workouts = vec![PlannedWorkout::new(mixed, Weekday::Sat)];
    let slots = vec![TrainingDaySlot::new(Weekday::Sat, WorkoutType::Mixed)];

    let refined = refiner.refine(&workouts, &slots, 2.5);

    assert!((refined[0].workout.base_duration_min - 150.0).abs() < 0.01);
}
