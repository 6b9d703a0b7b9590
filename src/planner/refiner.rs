//! Week-level duration refinement.
//!
//! After every slot is filled, the chosen workouts rarely sum exactly to
//! the prescribed hours. The refiner redistributes the residual across
//! the most adjustable workouts until the grand total converges.

use std::collections::HashMap;

use chrono::Weekday;

use super::distributor::DurationDistributor;
use super::profiles::ProfileTable;
use super::scaler::WorkoutScaler;
use super::types::{DayCategory, PlannedWorkout, TrainingDaySlot, WorkoutType};

/// Maximum refinement passes over the week.
pub const MAX_REFINE_ITERATIONS: usize = 5;

/// Convergence band as a fraction of the weekly target.
pub const REFINE_TOLERANCE_PCT: f64 = 0.05;

/// Nudges a filled week's workouts towards the weekly hour target.
pub struct DurationRefiner {
    profiles: ProfileTable,
}

impl DurationRefiner {
    /// Create a refiner with the default profile table.
    pub fn new() -> Self {
        Self::with_profiles(ProfileTable::default())
    }

    /// Create a refiner with a custom profile table.
    pub fn with_profiles(profiles: ProfileTable) -> Self {
        Self { profiles }
    }

    /// Refine the week with the default iteration cap.
    pub fn refine(
        &self,
        workouts: &[PlannedWorkout],
        slots: &[TrainingDaySlot],
        target_hours: f64,
    ) -> Vec<PlannedWorkout> {
        self.refine_with_iterations(workouts, slots, target_hours, MAX_REFINE_ITERATIONS)
    }

    /// Refine the week, redistributing the residual across endurance and
    /// mixed slots until the total is within tolerance of the target.
    ///
    /// Input workouts are never modified; the returned vector holds
    /// adjusted copies.
    pub fn refine_with_iterations(
        &self,
        workouts: &[PlannedWorkout],
        slots: &[TrainingDaySlot],
        target_hours: f64,
        max_iterations: usize,
    ) -> Vec<PlannedWorkout> {
        let target_minutes = target_hours * 60.0;
        let mut refined: Vec<PlannedWorkout> = workouts.to_vec();

        if target_minutes <= 0.0 || refined.is_empty() {
            return refined;
        }

        let slot_types: HashMap<Weekday, WorkoutType> = slots
            .iter()
            .map(|slot| (slot.weekday, slot.workout_type))
            .collect();

        for _ in 0..max_iterations {
            let total: f64 = refined
                .iter()
                .map(|p| p.workout.base_duration_min)
                .sum();
            let delta = target_minutes - total;
            if delta.abs() < REFINE_TOLERANCE_PCT * target_minutes {
                break;
            }

            let adjustable: Vec<usize> = refined
                .iter()
                .enumerate()
                .filter(|(_, p)| {
                    let slot_type = slot_types
                        .get(&p.weekday)
                        .copied()
                        .unwrap_or(p.workout.workout_type);
                    DurationDistributor::is_flexible(slot_type)
                })
                .map(|(i, _)| i)
                .collect();

            if adjustable.is_empty() {
                tracing::warn!(
                    "refinement shortfall: {:+.0} min residual with no endurance or mixed slot to absorb it",
                    delta
                );
                break;
            }

            let share = delta / adjustable.len() as f64;
            for &index in &adjustable {
                let weekday = refined[index].weekday;
                let optional = refined[index].optional;
                let profile = self.profiles.lookup(
                    refined[index].workout.workout_type,
                    DayCategory::of(weekday),
                );
                let proposed =
                    profile.clamp(refined[index].workout.base_duration_min + share);

                // Tolerance zero: refinement exists to make small nudges
                // the selection-time scaling pass skipped.
                let adjusted =
                    WorkoutScaler::adjust_with_tolerance(&refined[index].workout, proposed, 0.0);
                refined[index] = PlannedWorkout {
                    workout: adjusted,
                    weekday,
                    optional,
                };
            }
        }

        refined
    }
}

impl Default for DurationRefiner {
    fn default() -> Self {
        Self::new()
    }
}
