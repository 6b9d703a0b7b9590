//! Bounded, non-destructive week repair.
//!
//! When no validation scenario passes, the week is over budget and the
//! only sanctioned remedy is shrinking a weekend endurance ride: first by
//! dropping its warmup/cooldown, then by stepping its longest aerobic
//! segment down in fixed decrements. The input workouts are never
//! modified; a successful fix returns an adjusted copy of the week.

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::types::{PlannedWorkout, Segment, Workout};

/// Name/description fragments that mark an endurance ride.
pub const ENDURANCE_KEYWORDS: [&str; 6] =
    ["endurance", "aerobic", "base", "zone 2", "z2", "long ride"];

/// Segments below this percent of FTP count as endurance-intensity work.
pub const ENDURANCE_POWER_CEILING_PCT: u8 = 80;

/// Fraction of segments that must be endurance-intensity aerobic blocks.
pub const ENDURANCE_SEGMENT_RATIO: f64 = 0.5;

/// Fraction of total duration that must sit in such blocks.
pub const ENDURANCE_DURATION_RATIO: f64 = 0.7;

/// Minutes removed from the longest aerobic segment per iteration.
pub const REDUCTION_STEP_MIN: f64 = 15.0;

/// No aerobic segment is ever reduced below this duration.
pub const REDUCTION_FLOOR_MIN: f64 = 60.0;

/// Maximum segment-reduction iterations.
pub const MAX_REDUCTION_ITERATIONS: usize = 10;

/// Record of what a successful auto-fix changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixLog {
    /// Day of the reduced workout
    pub weekday: Weekday,
    /// Name of the reduced workout
    pub workout_name: String,
    /// Minutes of warmup/cooldown dropped in step one
    pub removed_warmup_cooldown_min: f64,
    /// Minutes removed from aerobic segments in step two
    pub reduced_min: f64,
    /// Human-readable log of each action taken
    pub steps: Vec<String>,
}

impl FixLog {
    /// One-line summary naming the day and the amount reduced.
    pub fn summary(&self) -> String {
        format!(
            "reduced '{}' on {} by {:.0} min ({:.0} min warmup/cooldown removed, {:.0} min from aerobic segments)",
            self.workout_name,
            self.weekday,
            self.removed_warmup_cooldown_min + self.reduced_min,
            self.removed_warmup_cooldown_min,
            self.reduced_min
        )
    }
}

/// A repaired week: adjusted copies of the workouts plus the fix log.
#[derive(Debug, Clone, PartialEq)]
pub struct AutoFix {
    pub workouts: Vec<PlannedWorkout>,
    pub log: FixLog,
}

/// Reasons the auto-fix declined to run or could not reach the target.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FixError {
    /// No weekly hour target was given
    #[error("auto-fix skipped: no weekly hour target")]
    NoTarget,

    /// The week already fits; this path only ever reduces
    #[error("auto-fix skipped: {total_hours:.2}h already within the {target_hours:.2}h budget")]
    AlreadyWithinBudget {
        total_hours: f64,
        target_hours: f64,
    },

    /// No weekend endurance workout to reduce
    #[error("auto-fix failed: no weekend endurance workout to reduce")]
    NoCandidate,

    /// The segment floor was reached before the week fit
    #[error("auto-fix failed: '{workout_name}' hit the {floor_min:.0}-minute segment floor with {remaining_min:.0} min still over budget")]
    FloorReached {
        workout_name: String,
        floor_min: f64,
        remaining_min: f64,
    },

    /// The iteration cap was reached before the week fit
    #[error("auto-fix failed: reduction iterations exhausted with {remaining_min:.0} min still over budget")]
    IterationsExhausted { remaining_min: f64 },
}

/// Heuristic endurance classification of a workout.
///
/// True when the name or description carries an endurance keyword, or
/// when at least half the segments are steady/endurance blocks under the
/// power ceiling, or when at least 70% of the total duration sits in
/// such blocks. Thresholds are approximate by nature and pinned as the
/// constants above.
pub fn is_endurance(workout: &Workout) -> bool {
    let haystack = format!(
        "{} {}",
        workout.name.to_lowercase(),
        workout.description.to_lowercase()
    );
    if ENDURANCE_KEYWORDS.iter().any(|kw| haystack.contains(kw)) {
        return true;
    }

    if workout.segments.is_empty() {
        return false;
    }

    let aerobic: Vec<&Segment> = workout
        .segments
        .iter()
        .filter(|s| is_endurance_block(s))
        .collect();

    let segment_ratio = aerobic.len() as f64 / workout.segments.len() as f64;
    if segment_ratio >= ENDURANCE_SEGMENT_RATIO {
        return true;
    }

    let total = workout.segment_total_min();
    if total <= 0.0 {
        return false;
    }
    let aerobic_min: f64 = aerobic.iter().map(|s| s.duration_min()).sum();
    aerobic_min / total >= ENDURANCE_DURATION_RATIO
}

/// A steady/endurance segment below the endurance power ceiling.
fn is_endurance_block(segment: &Segment) -> bool {
    segment.is_aerobic_block()
        && segment
            .effort()
            .map(|e| e.power_low_pct < ENDURANCE_POWER_CEILING_PCT)
            .unwrap_or(false)
}

/// Attempt to repair an over-budget week by reducing its longest weekend
/// endurance ride. Deterministic, monotonically decreasing, bounded.
pub fn attempt_auto_fix(
    workouts: &[PlannedWorkout],
    target_hours: Option<f64>,
) -> Result<AutoFix, FixError> {
    let Some(target_hours) = target_hours else {
        return Err(FixError::NoTarget);
    };
    let target_minutes = target_hours * 60.0;

    let total_minutes: f64 = workouts.iter().map(|p| p.workout.base_duration_min).sum();
    if total_minutes <= target_minutes {
        return Err(FixError::AlreadyWithinBudget {
            total_hours: total_minutes / 60.0,
            target_hours,
        });
    }

    let candidate = workouts
        .iter()
        .enumerate()
        .filter(|(_, p)| {
            matches!(p.weekday, Weekday::Sat | Weekday::Sun) && is_endurance(&p.workout)
        })
        .max_by(|(_, a), (_, b)| {
            a.workout
                .base_duration_min
                .partial_cmp(&b.workout.base_duration_min)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|(i, _)| i);

    let Some(index) = candidate else {
        tracing::warn!(
            "auto-fix found no weekend endurance workout in a week {:.0} min over budget",
            total_minutes - target_minutes
        );
        return Err(FixError::NoCandidate);
    };

    let planned = &workouts[index];
    let others_total = total_minutes - planned.workout.base_duration_min;
    let mut steps = Vec::new();

    // Step one: drop warmup and cooldown entirely.
    let removed_min: f64 = planned
        .workout
        .segments
        .iter()
        .filter(|s| s.is_warmup_or_cooldown())
        .map(Segment::duration_min)
        .sum();
    let kept: Vec<Segment> = planned
        .workout
        .segments
        .iter()
        .filter(|s| !s.is_warmup_or_cooldown())
        .cloned()
        .collect();
    let mut working = planned.workout.with_segments(kept);
    if removed_min > 0.0 {
        steps.push(format!(
            "removed {removed_min:.0} min of warmup/cooldown from '{}'",
            planned.workout.name
        ));
    }

    // Step two: 15-minute decrements on the longest aerobic segment.
    let mut reduced_min = 0.0;
    let mut iterations = 0;
    while others_total + working.base_duration_min > target_minutes {
        if iterations >= MAX_REDUCTION_ITERATIONS {
            let remaining = others_total + working.base_duration_min - target_minutes;
            tracing::warn!(
                "auto-fix exhausted {} reduction iterations, {:.0} min still over budget",
                MAX_REDUCTION_ITERATIONS,
                remaining
            );
            return Err(FixError::IterationsExhausted {
                remaining_min: remaining,
            });
        }
        iterations += 1;

        let longest = working
            .segments
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_aerobic_block())
            .max_by(|(_, a), (_, b)| {
                a.duration_min()
                    .partial_cmp(&b.duration_min())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|(i, s)| (i, s.duration_min()));

        let remaining = others_total + working.base_duration_min - target_minutes;
        let Some((segment_index, duration)) = longest else {
            tracing::warn!(
                "auto-fix has no aerobic segment left to reduce in '{}'",
                working.name
            );
            return Err(FixError::FloorReached {
                workout_name: working.name.clone(),
                floor_min: REDUCTION_FLOOR_MIN,
                remaining_min: remaining,
            });
        };

        let new_duration = duration - REDUCTION_STEP_MIN;
        if new_duration < REDUCTION_FLOOR_MIN {
            tracing::warn!(
                "auto-fix stopped at the {REDUCTION_FLOOR_MIN:.0}-minute floor on '{}', {:.0} min still over budget",
                working.name,
                remaining
            );
            return Err(FixError::FloorReached {
                workout_name: working.name.clone(),
                floor_min: REDUCTION_FLOOR_MIN,
                remaining_min: remaining,
            });
        }

        let mut segments = working.segments.clone();
        let shortened = segments[segment_index].with_duration(new_duration);
        segments[segment_index] = shortened;
        working = working.with_segments(segments);
        reduced_min += REDUCTION_STEP_MIN;
        steps.push(format!(
            "reduced aerobic segment to {new_duration:.0} min on {}",
            planned.weekday
        ));
    }

    let log = FixLog {
        weekday: planned.weekday,
        workout_name: planned.workout.name.clone(),
        removed_warmup_cooldown_min: removed_min,
        reduced_min,
        steps,
    };
    tracing::info!("auto-fix: {}", log.summary());

    let mut fixed = workouts.to_vec();
    fixed[index] = PlannedWorkout {
        workout: working,
        weekday: planned.weekday,
        optional: planned.optional,
    };

    Ok(AutoFix {
        workouts: fixed,
        log,
    })
}
