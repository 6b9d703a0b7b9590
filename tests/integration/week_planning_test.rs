//! End-to-end week planning tests.

use chrono::Weekday;
use pedalplan::planner::profiles::ProfileTable;
use pedalplan::planner::types::{DayCategory, Phase, TrainingDaySlot, WeekDescriptor, WorkoutType};
use pedalplan::planner::validator::ScenarioUsed;
use pedalplan::{
    ClosestDurationSelector, InMemoryCatalog, SegmentTssCalculator, TemplateCatalog, WeekPlanner,
};

fn descriptor(total_hours: f64, training_days: Vec<TrainingDaySlot>) -> WeekDescriptor {
    WeekDescriptor {
        week_number: 7,
        phase: Phase::Build,
        total_hours,
        target_tss: None,
        training_days,
    }
}

fn five_day_week() -> Vec<TrainingDaySlot> {
    vec![
        TrainingDaySlot::new(Weekday::Mon, WorkoutType::Rest),
        TrainingDaySlot::new(Weekday::Tue, WorkoutType::Tempo),
        TrainingDaySlot::new(Weekday::Wed, WorkoutType::Vo2max),
        TrainingDaySlot::new(Weekday::Thu, WorkoutType::Rest),
        TrainingDaySlot::new(Weekday::Fri, WorkoutType::Recovery),
        TrainingDaySlot::new(Weekday::Sat, WorkoutType::Endurance),
        TrainingDaySlot::new(Weekday::Sun, WorkoutType::Endurance),
    ]
}

#[test]
fn test_week_total_lands_within_five_percent() {
    let planner = WeekPlanner::new();
    let week = planner
        .plan_week(
            &descriptor(6.5, five_day_week()),
            &InMemoryCatalog::seeded(),
            &ClosestDurationSelector::new(),
            &SegmentTssCalculator::new(),
            250,
        )
        .expect("week should plan");

    assert_eq!(week.plan.workouts.len(), 5);
    assert!(
        (week.plan.total_hours() - 6.5).abs() <= 0.325,
        "planned {:.2}h against 6.5h",
        week.plan.total_hours()
    );
    assert_eq!(week.report.scenario_used, ScenarioUsed::FullWeek);
    assert!(!week.report.auto_fixed);
}

#[test]
fn test_every_workout_stays_inside_its_profile() {
    let planner = WeekPlanner::new();
    let profiles = ProfileTable::default();
    let week = planner
        .plan_week(
            &descriptor(6.5, five_day_week()),
            &InMemoryCatalog::seeded(),
            &ClosestDurationSelector::new(),
            &SegmentTssCalculator::new(),
            250,
        )
        .expect("week should plan");

    for planned in &week.plan.workouts {
        let profile = profiles.lookup(
            planned.workout.workout_type,
            DayCategory::of(planned.weekday),
        );
        assert!(
            planned.workout.base_duration_min >= profile.min
                && planned.workout.base_duration_min <= profile.max,
            "'{}' at {:.0} min violates its {:.0}-{:.0} profile",
            planned.workout.name,
            planned.workout.base_duration_min,
            profile.min,
            profile.max
        );
    }
}

#[test]
fn test_workout_durations_equal_their_segment_sums() {
    let planner = WeekPlanner::new();
    let week = planner
        .plan_week(
            &descriptor(6.5, five_day_week()),
            &InMemoryCatalog::seeded(),
            &ClosestDurationSelector::new(),
            &SegmentTssCalculator::new(),
            250,
        )
        .expect("week should plan");

    for planned in &week.plan.workouts {
        assert!(
            (planned.workout.base_duration_min - planned.workout.segment_total_min()).abs() < 0.01,
            "'{}' duration drifted from its segments",
            planned.workout.name
        );
    }
}

#[test]
fn test_catalog_templates_are_untouched_by_planning() {
    let catalog = InMemoryCatalog::seeded();
    let before: Vec<f64> = catalog
        .templates_for(WorkoutType::Endurance)
        .iter()
        .map(|w| w.base_duration_min)
        .collect();

    let planner = WeekPlanner::new();
    for target_hours in [5.0, 6.5, 9.0] {
        let _ = planner.plan_week(
            &descriptor(target_hours, five_day_week()),
            &catalog,
            &ClosestDurationSelector::new(),
            &SegmentTssCalculator::new(),
            250,
        );
    }

    let after: Vec<f64> = catalog
        .templates_for(WorkoutType::Endurance)
        .iter()
        .map(|w| w.base_duration_min)
        .collect();
    assert_eq!(before, after);
}

#[test]
fn test_planning_is_deterministic() {
    let planner = WeekPlanner::new();
    let catalog = InMemoryCatalog::seeded();
    let selector = ClosestDurationSelector::new();
    let tss = SegmentTssCalculator::new();

    let first = planner
        .plan_week(&descriptor(6.5, five_day_week()), &catalog, &selector, &tss, 250)
        .expect("week should plan");
    let second = planner
        .plan_week(&descriptor(6.5, five_day_week()), &catalog, &selector, &tss, 250)
        .expect("week should plan");

    let durations = |week: &pedalplan::PlannedWeek| -> Vec<f64> {
        week.plan
            .workouts
            .iter()
            .map(|p| p.workout.base_duration_min)
            .collect()
    };
    assert_eq!(durations(&first), durations(&second));
    assert_eq!(first.report, second.report);
}

#[test]
fn test_planned_week_serializes_for_downstream_consumers() {
    let planner = WeekPlanner::new();
    let week = planner
        .plan_week(
            &descriptor(6.5, five_day_week()),
            &InMemoryCatalog::seeded(),
            &ClosestDurationSelector::new(),
            &SegmentTssCalculator::new(),
            250,
        )
        .expect("week should plan");

    let json = serde_json::to_string(&week).expect("serialize");
    assert!(json.contains("\"scenario_used\":\"full_week\""));

    let round_tripped: pedalplan::PlannedWeek =
        serde_json::from_str(&json).expect("deserialize");
    assert_eq!(round_tripped, week);
}

#[test]
fn test_three_weekday_two_weekend_shape() {
    // The canonical 3+2 prescription shape from the upstream phase.
    let slots = vec![
        TrainingDaySlot::new(Weekday::Tue, WorkoutType::SweetSpot),
        TrainingDaySlot::new(Weekday::Wed, WorkoutType::Recovery),
        TrainingDaySlot::new(Weekday::Thu, WorkoutType::Threshold),
        TrainingDaySlot::new(Weekday::Sat, WorkoutType::Endurance),
        TrainingDaySlot::new(Weekday::Sun, WorkoutType::Mixed),
    ];

    let planner = WeekPlanner::new();
    let week = planner
        .plan_week(
            &descriptor(6.5, slots),
            &InMemoryCatalog::seeded(),
            &ClosestDurationSelector::new(),
            &SegmentTssCalculator::new(),
            250,
        )
        .expect("week should plan");

    assert!((week.plan.total_hours() - 6.5).abs() <= 0.325);
}
