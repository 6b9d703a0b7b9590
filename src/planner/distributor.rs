//! Weekly duration distribution.
//!
//! Predicts a realistic target duration per training-day slot from the
//! duration profiles, then iteratively scales the predictions so the
//! week's total matches the prescribed hours, within per-type bounds.

use std::collections::HashMap;

use chrono::Weekday;

use super::profiles::ProfileTable;
use super::types::{DayCategory, DurationAllocation, TrainingDaySlot, WorkoutType};

/// Maximum scaling iterations before settling for the best allocation.
pub const MAX_SCALING_ITERATIONS: usize = 10;

/// Convergence tolerance on the weekly total, in minutes.
pub const CONVERGENCE_TOLERANCE_MIN: f64 = 5.0;

/// Damping applied to the scaling factor on rigid slots.
pub const RIGID_DAMPING: f64 = 0.5;

/// Fraction of the redistribution share a recovery slot may absorb.
///
/// Recovery workouts are narrowly bounded, so they participate in
/// redistribution at reduced magnitude.
pub const RECOVERY_DELTA_FACTOR: f64 = 0.5;

/// Distributes a week's target hours across its training-day slots.
pub struct DurationDistributor {
    profiles: ProfileTable,
    rigid_damping: f64,
    recovery_delta_factor: f64,
}

impl DurationDistributor {
    /// Create a distributor with the default profile table and tuning.
    pub fn new() -> Self {
        Self::with_profiles(ProfileTable::default())
    }

    /// Create a distributor with a custom profile table.
    pub fn with_profiles(profiles: ProfileTable) -> Self {
        Self {
            profiles,
            rigid_damping: RIGID_DAMPING,
            recovery_delta_factor: RECOVERY_DELTA_FACTOR,
        }
    }

    /// Override the damping and recovery-share tuning constants.
    pub fn with_tuning(mut self, rigid_damping: f64, recovery_delta_factor: f64) -> Self {
        self.rigid_damping = rigid_damping;
        self.recovery_delta_factor = recovery_delta_factor;
        self
    }

    /// Whether a slot type scales at the full factor.
    ///
    /// Endurance and mixed rides absorb most of the weekly volume swing;
    /// interval-structured types keep close to their profile target.
    pub fn is_flexible(workout_type: WorkoutType) -> bool {
        matches!(workout_type, WorkoutType::Endurance | WorkoutType::Mixed)
    }

    /// Distribute `target_hours` across the non-rest slots.
    ///
    /// Returns the best allocation found even when the target cannot be
    /// reached within the profile bounds; downstream validation flags
    /// the shortfall.
    pub fn distribute(
        &self,
        slots: &[TrainingDaySlot],
        target_hours: f64,
    ) -> HashMap<Weekday, DurationAllocation> {
        let target_minutes = target_hours * 60.0;

        let mut allocations: Vec<DurationAllocation> = slots
            .iter()
            .filter(|slot| !slot.workout_type.is_rest())
            .map(|slot| {
                let profile = self
                    .profiles
                    .lookup(slot.workout_type, DayCategory::of(slot.weekday));
                DurationAllocation {
                    weekday: slot.weekday,
                    workout_type: slot.workout_type,
                    target_duration_min: profile.target,
                    min_duration_min: profile.min,
                    max_duration_min: profile.max,
                }
            })
            .collect();

        if allocations.is_empty() {
            return HashMap::new();
        }

        for _ in 0..MAX_SCALING_ITERATIONS {
            let current_total: f64 = allocations.iter().map(|a| a.target_duration_min).sum();
            if (target_minutes - current_total).abs() <= CONVERGENCE_TOLERANCE_MIN
                || current_total <= 0.0
            {
                break;
            }

            let scaling_factor = target_minutes / current_total;
            let mut constrained_delta = 0.0;

            for alloc in allocations.iter_mut() {
                let factor = if Self::is_flexible(alloc.workout_type) {
                    scaling_factor
                } else {
                    1.0 + (scaling_factor - 1.0) * self.rigid_damping
                };

                let desired = alloc.target_duration_min * factor;
                let clamped = desired.clamp(alloc.min_duration_min, alloc.max_duration_min);
                constrained_delta += desired - clamped;
                alloc.target_duration_min = clamped;
            }

            if constrained_delta.abs() < f64::EPSILON {
                continue;
            }

            // Redistribute the clamped-away minutes across flexible and
            // recovery slots, re-clamping each receiver.
            let receivers = allocations
                .iter()
                .filter(|a| {
                    Self::is_flexible(a.workout_type)
                        || a.workout_type == WorkoutType::Recovery
                })
                .count();
            if receivers == 0 {
                continue;
            }

            let share = constrained_delta / receivers as f64;
            for alloc in allocations.iter_mut() {
                let applied = if Self::is_flexible(alloc.workout_type) {
                    share
                } else if alloc.workout_type == WorkoutType::Recovery {
                    share * self.recovery_delta_factor
                } else {
                    continue;
                };

                alloc.target_duration_min = (alloc.target_duration_min + applied)
                    .clamp(alloc.min_duration_min, alloc.max_duration_min);
            }
        }

        let final_total: f64 = allocations.iter().map(|a| a.target_duration_min).sum();
        let gap = target_minutes - final_total;
        if gap.abs() > CONVERGENCE_TOLERANCE_MIN {
            tracing::warn!(
                "duration distribution did not converge: allocated {:.0} min vs {:.0} min target ({:+.0} min)",
                final_total,
                target_minutes,
                gap
            );
        }

        allocations
            .into_iter()
            .map(|alloc| (alloc.weekday, alloc))
            .collect()
    }
}

impl Default for DurationDistributor {
    fn default() -> Self {
        Self::new()
    }
}
