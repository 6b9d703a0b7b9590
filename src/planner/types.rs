//! Planner data model: workout types, segments, scaling metadata, and
//! the week-level input/output structures.

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::validator::ValidationFailure;

/// Training intent of a day slot or workout template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkoutType {
    /// No riding scheduled
    Rest,
    /// Easy spinning, narrow duration bounds
    Recovery,
    /// Aerobic base riding
    Endurance,
    /// Zone 3 steady work
    Tempo,
    /// 88-94% FTP intervals
    SweetSpot,
    /// Threshold intervals
    Threshold,
    /// VO2max intervals
    Vo2max,
    /// Combination session (e.g. intervals plus endurance tail)
    Mixed,
}

impl WorkoutType {
    /// Get display name.
    pub fn display_name(&self) -> &'static str {
        match self {
            WorkoutType::Rest => "Rest",
            WorkoutType::Recovery => "Recovery",
            WorkoutType::Endurance => "Endurance",
            WorkoutType::Tempo => "Tempo",
            WorkoutType::SweetSpot => "Sweet Spot",
            WorkoutType::Threshold => "Threshold",
            WorkoutType::Vo2max => "VO2max",
            WorkoutType::Mixed => "Mixed",
        }
    }

    /// Whether this slot carries no workout at all.
    pub fn is_rest(&self) -> bool {
        matches!(self, WorkoutType::Rest)
    }
}

impl std::fmt::Display for WorkoutType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Weekday vs weekend, for duration profile lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayCategory {
    Weekday,
    Weekend,
}

impl DayCategory {
    /// Classify a calendar weekday. Saturday and Sunday are weekend days.
    pub fn of(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Sat | Weekday::Sun => DayCategory::Weekend,
            _ => DayCategory::Weekday,
        }
    }
}

impl std::fmt::Display for DayCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DayCategory::Weekday => write!(f, "Weekday"),
            DayCategory::Weekend => write!(f, "Weekend"),
        }
    }
}

/// Macro-cycle stage. Determines how strict week validation is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Foundation,
    Build,
    Peak,
    Recovery,
    Taper,
}

impl Phase {
    /// Get display name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Phase::Foundation => "Foundation",
            Phase::Build => "Build",
            Phase::Peak => "Peak",
            Phase::Recovery => "Recovery",
            Phase::Taper => "Taper",
        }
    }

    /// Recovery and taper weeks validate against tighter thresholds.
    pub fn is_low_load(&self) -> bool {
        matches!(self, Phase::Recovery | Phase::Taper)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// One training day as prescribed upstream. Read-only input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingDaySlot {
    /// Calendar day within the week
    pub weekday: Weekday,
    /// Prescribed workout type for the day
    pub workout_type: WorkoutType,
}

impl TrainingDaySlot {
    pub fn new(weekday: Weekday, workout_type: WorkoutType) -> Self {
        Self {
            weekday,
            workout_type,
        }
    }
}

/// Per-slot duration target produced by the distributor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DurationAllocation {
    /// Calendar day this allocation belongs to
    pub weekday: Weekday,
    /// Workout type of the slot
    pub workout_type: WorkoutType,
    /// Target duration in minutes
    pub target_duration_min: f64,
    /// Lower bound from the duration profile
    pub min_duration_min: f64,
    /// Upper bound from the duration profile
    pub max_duration_min: f64,
}

/// A contiguous effort with a single intensity band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Effort {
    /// Duration in minutes
    pub duration_min: f64,
    /// Lower power bound as percent of FTP
    pub power_low_pct: u8,
    /// Upper power bound as percent of FTP
    pub power_high_pct: u8,
}

impl Effort {
    pub fn new(duration_min: f64, power_low_pct: u8, power_high_pct: u8) -> Self {
        Self {
            duration_min,
            power_low_pct,
            power_high_pct,
        }
    }

    /// Midpoint of the power band as percent of FTP.
    pub fn mid_power_pct(&self) -> f64 {
        f64::from(self.power_low_pct) / 2.0 + f64::from(self.power_high_pct) / 2.0
    }
}

/// A single segment within a workout.
///
/// Flat segments carry one [`Effort`]; an `Interval` segment repeats a
/// work/recovery pair `sets` times and has no flat duration of its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Segment {
    /// Gradual power increase before the main work
    Warmup(Effort),
    /// Gradual power decrease after the main work
    Cooldown(Effort),
    /// Constant power block
    Steady(Effort),
    /// Aerobic base block
    Endurance(Effort),
    /// Zone 3 block
    Tempo(Effort),
    /// Easy spinning block between or after efforts
    Recovery(Effort),
    /// Repeating work/recovery pair
    Interval {
        sets: u32,
        work: Effort,
        recovery: Effort,
    },
}

impl Segment {
    /// Total duration of this segment in minutes.
    ///
    /// An interval contributes `sets × (work + recovery)`.
    pub fn duration_min(&self) -> f64 {
        match self {
            Segment::Warmup(e)
            | Segment::Cooldown(e)
            | Segment::Steady(e)
            | Segment::Endurance(e)
            | Segment::Tempo(e)
            | Segment::Recovery(e) => e.duration_min,
            Segment::Interval {
                sets,
                work,
                recovery,
            } => f64::from(*sets) * (work.duration_min + recovery.duration_min),
        }
    }

    /// The effort of a flat segment, `None` for intervals.
    pub fn effort(&self) -> Option<&Effort> {
        match self {
            Segment::Warmup(e)
            | Segment::Cooldown(e)
            | Segment::Steady(e)
            | Segment::Endurance(e)
            | Segment::Tempo(e)
            | Segment::Recovery(e) => Some(e),
            Segment::Interval { .. } => None,
        }
    }

    /// Whether this is a warmup or cooldown segment.
    pub fn is_warmup_or_cooldown(&self) -> bool {
        matches!(self, Segment::Warmup(_) | Segment::Cooldown(_))
    }

    /// Whether this is a steady or endurance segment.
    pub fn is_aerobic_block(&self) -> bool {
        matches!(self, Segment::Steady(_) | Segment::Endurance(_))
    }

    /// Whether proportional extension may stretch this segment.
    pub fn is_extendable(&self) -> bool {
        matches!(
            self,
            Segment::Steady(_) | Segment::Endurance(_) | Segment::Tempo(_)
        )
    }

    /// Copy of this segment with a new flat duration.
    ///
    /// Interval segments are returned unchanged; use [`Segment::with_sets`].
    pub fn with_duration(&self, duration_min: f64) -> Segment {
        match self {
            Segment::Warmup(e) => Segment::Warmup(Effort {
                duration_min,
                ..*e
            }),
            Segment::Cooldown(e) => Segment::Cooldown(Effort {
                duration_min,
                ..*e
            }),
            Segment::Steady(e) => Segment::Steady(Effort {
                duration_min,
                ..*e
            }),
            Segment::Endurance(e) => Segment::Endurance(Effort {
                duration_min,
                ..*e
            }),
            Segment::Tempo(e) => Segment::Tempo(Effort {
                duration_min,
                ..*e
            }),
            Segment::Recovery(e) => Segment::Recovery(Effort {
                duration_min,
                ..*e
            }),
            Segment::Interval { .. } => self.clone(),
        }
    }

    /// Copy of an interval segment with a new set count.
    ///
    /// Flat segments are returned unchanged.
    pub fn with_sets(&self, new_sets: u32) -> Segment {
        match self {
            Segment::Interval {
                work, recovery, ..
            } => Segment::Interval {
                sets: new_sets,
                work: *work,
                recovery: *recovery,
            },
            _ => self.clone(),
        }
    }

    /// Copy of this segment with every duration scaled by `ratio`.
    pub fn scaled(&self, ratio: f64) -> Segment {
        match self {
            Segment::Interval {
                sets,
                work,
                recovery,
            } => Segment::Interval {
                sets: *sets,
                work: Effort {
                    duration_min: work.duration_min * ratio,
                    ..*work
                },
                recovery: Effort {
                    duration_min: recovery.duration_min * ratio,
                    ..*recovery
                },
            },
            flat => {
                let duration = flat.duration_min() * ratio;
                flat.with_duration(duration)
            }
        }
    }
}

/// Declared scaling metadata on a workout template.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "adjustable_field", rename_all = "snake_case")]
pub enum ScalingSpec {
    /// Total duration may be stretched or compressed within bounds.
    Duration {
        /// Minimum total duration in minutes
        min_value: f64,
        /// Maximum total duration in minutes
        max_value: f64,
    },
    /// The interval set count may be adjusted within bounds.
    Sets {
        /// Minimum set count
        min_value: u32,
        /// Maximum set count
        max_value: u32,
        /// TSS contributed by one set
        tss_per_unit: f64,
        /// Minutes contributed by one set
        duration_per_unit_min: f64,
    },
}

/// A workout template, or a duration-adjusted copy of one.
///
/// Templates are shared read-only values owned by the catalog; every
/// adjustment in the engine clones first and returns a new value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workout {
    /// Unique identifier
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Description of the workout
    pub description: String,
    /// Workout type
    pub workout_type: WorkoutType,
    /// Total duration in minutes (always the sum of segment durations)
    pub base_duration_min: f64,
    /// Estimated Training Stress Score
    pub base_tss: f64,
    /// Ordered list of segments
    pub segments: Vec<Segment>,
    /// Optional declared scaling metadata
    pub scaling_spec: Option<ScalingSpec>,
}

impl Workout {
    /// Create a new workout. Total duration is computed from the segments.
    pub fn new(
        name: String,
        description: String,
        workout_type: WorkoutType,
        segments: Vec<Segment>,
    ) -> Self {
        let base_duration_min = segments.iter().map(Segment::duration_min).sum();

        Self {
            id: Uuid::new_v4(),
            name,
            description,
            workout_type,
            base_duration_min,
            base_tss: 0.0,
            segments,
            scaling_spec: None,
        }
    }

    /// Set the estimated TSS.
    pub fn with_tss(mut self, tss: f64) -> Self {
        self.base_tss = tss;
        self
    }

    /// Set the scaling metadata.
    pub fn with_scaling(mut self, spec: ScalingSpec) -> Self {
        self.scaling_spec = Some(spec);
        self
    }

    /// Sum of segment durations in minutes.
    pub fn segment_total_min(&self) -> f64 {
        self.segments.iter().map(Segment::duration_min).sum()
    }

    /// New workout value with replaced segments.
    ///
    /// Total duration is recomputed from the new segments and TSS is
    /// rescaled linearly with the duration ratio.
    pub fn with_segments(&self, segments: Vec<Segment>) -> Workout {
        let new_duration: f64 = segments.iter().map(Segment::duration_min).sum();
        let tss = if self.base_duration_min > 0.0 {
            self.base_tss * new_duration / self.base_duration_min
        } else {
            self.base_tss
        };

        Workout {
            id: self.id,
            name: self.name.clone(),
            description: self.description.clone(),
            workout_type: self.workout_type,
            base_duration_min: new_duration,
            base_tss: tss,
            segments,
            scaling_spec: self.scaling_spec,
        }
    }
}

/// A workout placed on a concrete day of the planned week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedWorkout {
    /// The duration-adjusted workout
    pub workout: Workout,
    /// Day of the week it is scheduled on
    pub weekday: Weekday,
    /// Marked when the week validates only without this workout
    pub optional: bool,
}

impl PlannedWorkout {
    pub fn new(workout: Workout, weekday: Weekday) -> Self {
        Self {
            workout,
            weekday,
            optional: false,
        }
    }
}

/// Week descriptor from the upstream planning phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekDescriptor {
    /// Week number within the plan
    pub week_number: u32,
    /// Macro-cycle phase
    pub phase: Phase,
    /// Prescribed total hours
    pub total_hours: f64,
    /// Prescribed total TSS, if the upstream phase produced one
    pub target_tss: Option<f64>,
    /// Training-day slots, rest days included
    pub training_days: Vec<TrainingDaySlot>,
}

/// A fully resolved week of workouts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekPlan {
    /// Week number within the plan
    pub week_number: u32,
    /// Macro-cycle phase
    pub phase: Phase,
    /// Prescribed total hours
    pub target_hours: f64,
    /// Prescribed total TSS
    pub target_tss: Option<f64>,
    /// Ordered workouts with resolved weekdays
    pub workouts: Vec<PlannedWorkout>,
}

impl WeekPlan {
    /// Sum of workout durations in hours.
    pub fn total_hours(&self) -> f64 {
        self.workouts
            .iter()
            .map(|p| p.workout.base_duration_min)
            .sum::<f64>()
            / 60.0
    }
}

/// Errors produced while planning a week.
#[derive(Debug, Error)]
pub enum PlanError {
    /// The descriptor carries no training days
    #[error("week has no training days")]
    EmptyWeek,

    /// The selector found no template for a slot
    #[error("no template available for {workout_type} on {weekday}")]
    NoTemplate {
        workout_type: WorkoutType,
        weekday: Weekday,
    },

    /// No validation scenario met tolerance
    #[error(transparent)]
    Validation(#[from] ValidationFailure),
}
