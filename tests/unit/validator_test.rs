//! Unit tests for week validation scenarios.

use chrono::Weekday;
use pedalplan::metrics::SegmentTssCalculator;
use pedalplan::planner::types::{
    Effort, Phase, PlannedWorkout, Segment, TrainingDaySlot, WeekPlan, Workout, WorkoutType,
};
use pedalplan::planner::validator::{
    calculate_week_metrics, detect_optional_recovery, ScenarioUsed, WeekValidator,
};

fn session(workout_type: WorkoutType, name: &str, duration_min: f64) -> Workout {
    session_at(workout_type, name, duration_min, 65, 75)
}

fn session_at(
    workout_type: WorkoutType,
    name: &str,
    duration_min: f64,
    power_low: u8,
    power_high: u8,
) -> Workout {
    Workout::new(
        name.to_string(),
        String::new(),
        workout_type,
        vec![Segment::Steady(Effort::new(duration_min, power_low, power_high))],
    )
    .with_tss(duration_min * 0.5)
}

fn six_day_slots() -> Vec<TrainingDaySlot> {
    vec![
        TrainingDaySlot::new(Weekday::Mon, WorkoutType::Recovery),
        TrainingDaySlot::new(Weekday::Tue, WorkoutType::SweetSpot),
        TrainingDaySlot::new(Weekday::Wed, WorkoutType::Vo2max),
        TrainingDaySlot::new(Weekday::Thu, WorkoutType::Tempo),
        TrainingDaySlot::new(Weekday::Sat, WorkoutType::Threshold),
        TrainingDaySlot::new(Weekday::Sun, WorkoutType::Tempo),
    ]
}

fn plan_of(workouts: Vec<PlannedWorkout>, target_hours: f64) -> WeekPlan {
    WeekPlan {
        week_number: 3,
        phase: Phase::Build,
        target_hours,
        target_tss: None,
        workouts,
    }
}

#[test]
fn test_optional_recovery_needs_exactly_six_training_days() {
    let workouts = vec![PlannedWorkout::new(
        session(WorkoutType::Recovery, "Recovery Spin", 45.0),
        Weekday::Mon,
    )];

    for day_count in [3, 4, 5, 7] {
        let mut slots = six_day_slots();
        slots.truncate(day_count.min(6));
        if day_count == 7 {
            slots.push(TrainingDaySlot::new(Weekday::Fri, WorkoutType::Endurance));
        }
        assert_eq!(
            detect_optional_recovery(&workouts, &slots),
            None,
            "{day_count} training days must not yield an optional recovery"
        );
    }
}

#[test]
fn test_rest_slots_do_not_count_towards_six() {
    let mut slots = six_day_slots();
    slots.push(TrainingDaySlot::new(Weekday::Fri, WorkoutType::Rest));
    let workouts = vec![PlannedWorkout::new(
        session(WorkoutType::Recovery, "Recovery Spin", 45.0),
        Weekday::Mon,
    )];

    assert_eq!(
        detect_optional_recovery(&workouts, &slots),
        Some((0, Weekday::Mon))
    );
}

#[test]
fn test_scenario_b_marks_recovery_optional() {
    let validator = WeekValidator::new();
    let tss = SegmentTssCalculator::new();

    // 300 min of scheduled work plus a 70-minute recovery spin: with the
    // recovery the week is 23% over its 5 hours, without it, exact.
    let workouts = vec![
        PlannedWorkout::new(session(WorkoutType::Recovery, "Recovery Spin", 70.0), Weekday::Mon),
        PlannedWorkout::new(session(WorkoutType::SweetSpot, "SS 2x20", 75.0), Weekday::Tue),
        PlannedWorkout::new(session(WorkoutType::Vo2max, "VO2 5x4", 60.0), Weekday::Wed),
        PlannedWorkout::new(session(WorkoutType::Tempo, "Tempo", 45.0), Weekday::Thu),
        PlannedWorkout::new(session(WorkoutType::Threshold, "FTP 2x15", 60.0), Weekday::Sat),
        PlannedWorkout::new(session(WorkoutType::Tempo, "Tempo", 60.0), Weekday::Sun),
    ];
    let plan = plan_of(workouts, 5.0);

    let (accepted, report) = validator
        .validate(&plan, &six_day_slots(), 250, &tss)
        .expect("scenario B should pass");

    assert_eq!(report.scenario_used, ScenarioUsed::WithoutRecovery);
    assert!(!report.auto_fixed);
    assert!(accepted.workouts[0].optional);
    assert!(accepted.workouts[1..].iter().all(|p| !p.optional));
    assert!((report.actual_hours - 5.0).abs() < 0.01);

    // the optional flag is UI metadata; the plan still carries the workout
    assert_eq!(accepted.workouts.len(), 6);

    // label contract with downstream consumers
    assert_eq!(
        serde_json::to_string(&report.scenario_used).expect("serialize"),
        "\"without_recovery\""
    );
}

#[test]
fn test_failure_enumerates_every_scenario() {
    let tss = SegmentTssCalculator::new();

    // 7.5 hours of hard work against a 5-hour budget; the weekend holds
    // only high-intensity sessions, so auto-fix has nothing to shrink.
    let workouts = vec![
        PlannedWorkout::new(session(WorkoutType::Recovery, "Recovery Spin", 60.0), Weekday::Mon),
        PlannedWorkout::new(session(WorkoutType::SweetSpot, "SS 3x20", 90.0), Weekday::Tue),
        PlannedWorkout::new(session(WorkoutType::Vo2max, "VO2 6x4", 75.0), Weekday::Wed),
        PlannedWorkout::new(session(WorkoutType::Tempo, "Tempo", 75.0), Weekday::Thu),
        PlannedWorkout::new(
            session_at(WorkoutType::Threshold, "FTP 3x15", 75.0, 95, 100),
            Weekday::Sat,
        ),
        PlannedWorkout::new(
            session_at(WorkoutType::SweetSpot, "SS 2x25", 75.0, 88, 94),
            Weekday::Sun,
        ),
    ];
    let plan = plan_of(workouts, 5.0);

    let with_fix = WeekValidator::new()
        .validate(&plan, &six_day_slots(), 250, &tss)
        .expect_err("no scenario can pass");
    let without_fix = WeekValidator::with_auto_fix(false)
        .validate(&plan, &six_day_slots(), 250, &tss)
        .expect_err("no scenario can pass");

    // both scenarios appear with their numeric gaps
    assert_eq!(with_fix.scenarios.len(), 2);
    assert_eq!(with_fix.scenarios[0].name, "full_week");
    assert_eq!(with_fix.scenarios[1].name, "without_recovery");
    for diagnostics in &with_fix.scenarios {
        assert!(!diagnostics.errors.is_empty());
        assert!(diagnostics.hours_deviation_pct > 0.0);
    }

    let message = with_fix.to_string();
    assert!(message.contains("full_week"));
    assert!(message.contains("without_recovery"));
    assert!(message.contains("7.50h vs 5.00h"));

    // disabling auto-fix changes nothing about the diagnostics
    assert_eq!(with_fix.scenarios, without_fix.scenarios);
    assert!(without_fix.auto_fix_note.is_none());
    assert!(with_fix.auto_fix_note.is_some());
}

#[test]
fn test_recovery_phase_uses_tight_thresholds() {
    let validator = WeekValidator::new();
    let tss = SegmentTssCalculator::new();

    // 17.5% over: passes a build week (20% limit) but not a recovery
    // week (15% limit). No weekend endurance, so the failure is final.
    let workouts = vec![
        PlannedWorkout::new(session(WorkoutType::Tempo, "Tempo", 70.5), Weekday::Tue),
        PlannedWorkout::new(session(WorkoutType::Tempo, "Tempo", 70.5), Weekday::Thu),
    ];
    let slots = vec![
        TrainingDaySlot::new(Weekday::Tue, WorkoutType::Tempo),
        TrainingDaySlot::new(Weekday::Thu, WorkoutType::Tempo),
    ];

    let build_plan = plan_of(workouts.clone(), 2.0);
    assert!(validator.validate(&build_plan, &slots, 250, &tss).is_ok());

    let mut recovery_plan = plan_of(workouts, 2.0);
    recovery_plan.phase = Phase::Recovery;
    assert!(validator
        .validate(&recovery_plan, &slots, 250, &tss)
        .is_err());
}

#[test]
fn test_tss_deviation_is_validated_when_target_given() {
    let validator = WeekValidator::new();
    let tss = SegmentTssCalculator::new();

    let workouts = vec![PlannedWorkout::new(
        session(WorkoutType::Tempo, "Tempo", 120.0),
        Weekday::Tue,
    )];
    let slots = vec![TrainingDaySlot::new(Weekday::Tue, WorkoutType::Tempo)];

    // hours match exactly; the TSS target is wildly off
    let mut plan = plan_of(workouts, 2.0);
    plan.target_tss = Some(300.0);

    let failure = validator
        .validate(&plan, &slots, 250, &tss)
        .expect_err("TSS gap should fail the week");

    assert!(failure.scenarios[0]
        .errors
        .iter()
        .any(|e| e.contains("TSS")));
}

#[test]
fn test_metrics_exclusion_matches_sum_of_parts() {
    let tss = SegmentTssCalculator::new();
    let workouts = vec![
        PlannedWorkout::new(session(WorkoutType::Endurance, "Endurance", 120.0), Weekday::Sat),
        PlannedWorkout::new(session(WorkoutType::Tempo, "Tempo", 60.0), Weekday::Tue),
        PlannedWorkout::new(session(WorkoutType::Recovery, "Spin", 45.0), Weekday::Mon),
        PlannedWorkout::new(session(WorkoutType::Vo2max, "VO2", 60.0), Weekday::Wed),
    ];

    let full = calculate_week_metrics(&workouts, 250, &tss, None);
    for i in 0..workouts.len() {
        let without = calculate_week_metrics(&workouts, 250, &tss, Some(i));
        let alone = calculate_week_metrics(&workouts[i..=i], 250, &tss, None);
        assert!((without.total_hours + alone.total_hours - full.total_hours).abs() < 1e-9);
        assert!((without.actual_tss + alone.actual_tss - full.actual_tss).abs() < 1e-9);
    }
}
