//! Built-in workout templates.
//!
//! A compact seed set covering every trainable workout type, used by the
//! CLI and tests in place of the external template store. Endurance and
//! mixed rides carry duration scaling metadata; interval sessions carry
//! set scaling metadata.

use crate::planner::types::{Effort, ScalingSpec, Segment, Workout, WorkoutType};

/// Generate the built-in template set.
pub fn generate_seed_templates() -> Vec<Workout> {
    let mut templates = Vec::new();
    templates.extend(recovery_templates());
    templates.extend(endurance_templates());
    templates.extend(tempo_templates());
    templates.extend(sweet_spot_templates());
    templates.extend(threshold_templates());
    templates.extend(vo2max_templates());
    templates.extend(mixed_templates());
    templates
}

fn recovery_templates() -> Vec<Workout> {
    vec![
        Workout::new(
            "Recovery Spin".into(),
            "Easy spin with form focus".into(),
            WorkoutType::Recovery,
            vec![
                Segment::Warmup(Effort::new(5.0, 40, 50)),
                Segment::Steady(Effort::new(30.0, 45, 55)),
                Segment::Cooldown(Effort::new(5.0, 45, 40)),
            ],
        )
        .with_tss(18.0),
        Workout::new(
            "Flush Ride".into(),
            "Clear legs after a hard day".into(),
            WorkoutType::Recovery,
            vec![
                Segment::Warmup(Effort::new(5.0, 40, 50)),
                Segment::Steady(Effort::new(40.0, 48, 58)),
                Segment::Cooldown(Effort::new(5.0, 45, 40)),
            ],
        )
        .with_tss(24.0),
    ]
}

fn endurance_templates() -> Vec<Workout> {
    vec![
        Workout::new(
            "Endurance 90min Z2".into(),
            "Steady aerobic base riding".into(),
            WorkoutType::Endurance,
            vec![
                Segment::Warmup(Effort::new(10.0, 40, 60)),
                Segment::Endurance(Effort::new(70.0, 60, 70)),
                Segment::Cooldown(Effort::new(10.0, 60, 40)),
            ],
        )
        .with_tss(55.0)
        .with_scaling(ScalingSpec::Duration {
            min_value: 60.0,
            max_value: 150.0,
        }),
        Workout::new(
            "Endurance 150min Z2".into(),
            "Extended aerobic base riding".into(),
            WorkoutType::Endurance,
            vec![
                Segment::Warmup(Effort::new(10.0, 40, 60)),
                Segment::Endurance(Effort::new(130.0, 60, 70)),
                Segment::Cooldown(Effort::new(10.0, 60, 40)),
            ],
        )
        .with_tss(95.0)
        .with_scaling(ScalingSpec::Duration {
            min_value: 90.0,
            max_value: 240.0,
        }),
        Workout::new(
            "Long Ride".into(),
            "Weekend long ride at conversational pace".into(),
            WorkoutType::Endurance,
            vec![
                Segment::Warmup(Effort::new(10.0, 40, 60)),
                Segment::Endurance(Effort::new(160.0, 60, 72)),
                Segment::Cooldown(Effort::new(10.0, 60, 40)),
            ],
        )
        .with_tss(115.0)
        .with_scaling(ScalingSpec::Duration {
            min_value: 120.0,
            max_value: 300.0,
        }),
    ]
}

fn tempo_templates() -> Vec<Workout> {
    vec![Workout::new(
        "Tempo Blocks".into(),
        "Two tempo blocks with a short spin between".into(),
        WorkoutType::Tempo,
        vec![
            Segment::Warmup(Effort::new(10.0, 40, 60)),
            Segment::Tempo(Effort::new(20.0, 76, 85)),
            Segment::Recovery(Effort::new(5.0, 50, 55)),
            Segment::Tempo(Effort::new(30.0, 76, 85)),
            Segment::Cooldown(Effort::new(10.0, 60, 40)),
        ],
    )
    .with_tss(58.0)]
}

fn sweet_spot_templates() -> Vec<Workout> {
    vec![Workout::new(
        "Sweet Spot 2x20".into(),
        "Classic sweet spot intervals".into(),
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
    .with_scaling(ScalingSpec::Sets {
        min_value: 1,
        max_value: 3,
        tss_per_unit: 24.0,
        duration_per_unit_min: 25.0,
    })]
}

fn threshold_templates() -> Vec<Workout> {
    vec![Workout::new(
        "Threshold 2x15".into(),
        "Threshold blocks just under FTP".into(),
        WorkoutType::Threshold,
        vec![
            Segment::Warmup(Effort::new(15.0, 40, 70)),
            Segment::Interval {
                sets: 2,
                work: Effort::new(15.0, 95, 100),
                recovery: Effort::new(5.0, 50, 55),
            },
            Segment::Cooldown(Effort::new(10.0, 60, 40)),
        ],
    )
    .with_tss(68.0)
    .with_scaling(ScalingSpec::Sets {
        min_value: 1,
        max_value: 3,
        tss_per_unit: 22.0,
        duration_per_unit_min: 20.0,
    })]
}

fn vo2max_templates() -> Vec<Workout> {
    vec![Workout::new(
        "VO2 5x4".into(),
        "Classic VO2max intervals".into(),
        WorkoutType::Vo2max,
        vec![
            Segment::Warmup(Effort::new(15.0, 40, 70)),
            Segment::Interval {
                sets: 5,
                work: Effort::new(4.0, 106, 120),
                recovery: Effort::new(4.0, 50, 55),
            },
            Segment::Cooldown(Effort::new(10.0, 60, 40)),
        ],
    )
    .with_tss(70.0)
    .with_scaling(ScalingSpec::Sets {
        min_value: 3,
        max_value: 8,
        tss_per_unit: 9.0,
        duration_per_unit_min: 8.0,
    })]
}

fn mixed_templates() -> Vec<Workout> {
    vec![Workout::new(
        "Tempo with Endurance Finish".into(),
        "Tempo work followed by a steady aerobic tail".into(),
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
    })]
}
