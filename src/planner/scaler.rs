//! Duration adjustment of a single workout.
//!
//! Uses the template's declared scaling metadata when present, otherwise
//! falls back to proportional extension of the aerobic segments. Always
//! returns a new workout value; templates are never modified.

use super::types::{ScalingSpec, Segment, Workout};

/// Relative deviation below which a workout is used as-is.
pub const DEFAULT_TOLERANCE_PCT: f64 = 0.10;

/// Segments shorter than this are not worth stretching.
pub const MIN_EXTENDABLE_SEGMENT_MIN: f64 = 20.0;

/// Floor for any proportionally extended segment, in minutes.
pub const EXTENSION_FLOOR_MIN: f64 = 10.0;

/// Hard ceiling for any proportionally extended segment, in minutes.
pub const EXTENSION_CAP_MIN: f64 = 180.0;

/// A segment may grow to at most this multiple of its original duration.
pub const EXTENSION_CAP_RATIO: f64 = 3.0;

/// Adjusts one selected workout towards a target duration.
pub struct WorkoutScaler;

impl WorkoutScaler {
    /// Adjust `workout` towards `target_duration_min` with the default
    /// tolerance.
    pub fn adjust(workout: &Workout, target_duration_min: f64) -> Workout {
        Self::adjust_with_tolerance(workout, target_duration_min, DEFAULT_TOLERANCE_PCT)
    }

    /// Adjust `workout` towards `target_duration_min`.
    ///
    /// Returns an unmodified copy when the workout is already within
    /// `tolerance_pct` of the target, or when nothing in it can be
    /// adjusted (best effort; refinement and validation tolerate this).
    pub fn adjust_with_tolerance(
        workout: &Workout,
        target_duration_min: f64,
        tolerance_pct: f64,
    ) -> Workout {
        if target_duration_min <= 0.0 || workout.base_duration_min <= 0.0 {
            return workout.clone();
        }

        let deviation =
            (workout.base_duration_min - target_duration_min).abs() / target_duration_min;
        if deviation <= tolerance_pct {
            return workout.clone();
        }

        match workout.scaling_spec {
            Some(ScalingSpec::Duration {
                min_value,
                max_value,
            }) => Self::scale_by_duration(workout, target_duration_min, min_value, max_value),
            Some(ScalingSpec::Sets {
                min_value,
                max_value,
                tss_per_unit,
                duration_per_unit_min,
            }) => Self::scale_by_sets(
                workout,
                target_duration_min,
                min_value,
                max_value,
                tss_per_unit,
                duration_per_unit_min,
            ),
            None => Self::extend_proportionally(workout, target_duration_min),
        }
    }

    /// Scale every segment by the ratio of clamped target to base duration.
    fn scale_by_duration(
        workout: &Workout,
        target_duration_min: f64,
        min_value: f64,
        max_value: f64,
    ) -> Workout {
        let clamped_target = target_duration_min.clamp(min_value, max_value);
        let ratio = clamped_target / workout.base_duration_min;

        let segments: Vec<Segment> = workout.segments.iter().map(|s| s.scaled(ratio)).collect();
        workout.with_segments(segments)
    }

    /// Add or remove interval sets to move towards the target duration.
    fn scale_by_sets(
        workout: &Workout,
        target_duration_min: f64,
        min_value: u32,
        max_value: u32,
        tss_per_unit: f64,
        duration_per_unit_min: f64,
    ) -> Workout {
        if duration_per_unit_min <= 0.0 {
            return workout.clone();
        }

        let interval_index = workout
            .segments
            .iter()
            .position(|s| matches!(s, Segment::Interval { .. }));
        let Some(index) = interval_index else {
            tracing::debug!(
                "workout '{}' declares set scaling but has no interval segment",
                workout.name
            );
            return workout.clone();
        };

        let current_sets = match workout.segments[index] {
            Segment::Interval { sets, .. } => sets,
            _ => return workout.clone(),
        };

        let units_needed =
            (target_duration_min - workout.base_duration_min) / duration_per_unit_min;
        let desired = i64::from(current_sets) + units_needed.round() as i64;
        let new_sets = desired.clamp(i64::from(min_value), i64::from(max_value)) as u32;

        if new_sets == current_sets {
            return workout.clone();
        }

        let set_delta = f64::from(new_sets) - f64::from(current_sets);

        let mut segments = workout.segments.clone();
        let resized = segments[index].with_sets(new_sets);
        segments[index] = resized;

        let mut adjusted = workout.clone();
        adjusted.segments = segments;
        adjusted.base_duration_min = adjusted.segment_total_min();
        adjusted.base_tss = workout.base_tss + set_delta * tss_per_unit;
        adjusted
    }

    /// Distribute the duration delta across steady/endurance/tempo
    /// segments, weighted by each segment's share of the extendable time.
    fn extend_proportionally(workout: &Workout, target_duration_min: f64) -> Workout {
        let extendable: Vec<usize> = workout
            .segments
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_extendable() && s.duration_min() >= MIN_EXTENDABLE_SEGMENT_MIN)
            .map(|(i, _)| i)
            .collect();

        if extendable.is_empty() {
            tracing::debug!(
                "workout '{}' has no extendable segments, returning unchanged",
                workout.name
            );
            return workout.clone();
        }

        let extendable_total: f64 = extendable
            .iter()
            .map(|&i| workout.segments[i].duration_min())
            .sum();
        let delta = target_duration_min - workout.base_duration_min;

        let mut segments = workout.segments.clone();
        for &i in &extendable {
            let original = segments[i].duration_min();
            let weight = original / extendable_total;
            let cap = (original * EXTENSION_CAP_RATIO).min(EXTENSION_CAP_MIN);
            let new_duration = (original + delta * weight).clamp(EXTENSION_FLOOR_MIN, cap);
            let stretched = segments[i].with_duration(new_duration);
            segments[i] = stretched;
        }

        workout.with_segments(segments)
    }
}
