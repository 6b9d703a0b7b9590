//! Week planning pipeline.
//!
//! Wires the four engine components and the injected catalog, selector
//! and TSS seams into a single entry point: distribute durations, fill
//! each slot from the catalog, scale, refine, then validate.

use serde::{Deserialize, Serialize};

use crate::library::{TemplateCatalog, TemplateSelector};
use crate::metrics::TssCalculator;

use super::distributor::DurationDistributor;
use super::profiles::ProfileTable;
use super::refiner::DurationRefiner;
use super::scaler::WorkoutScaler;
use super::types::{PlanError, PlannedWorkout, WeekDescriptor, WeekPlan};
use super::validator::{ValidationReport, WeekValidator};

/// An accepted week and its validation report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedWeek {
    /// The accepted plan
    pub plan: WeekPlan,
    /// How the week validated
    pub report: ValidationReport,
}

/// Plans one week from an upstream descriptor.
pub struct WeekPlanner {
    distributor: DurationDistributor,
    refiner: DurationRefiner,
    validator: WeekValidator,
}

impl WeekPlanner {
    /// Create a planner with default profiles and auto-fix enabled.
    pub fn new() -> Self {
        Self::with_auto_fix(true)
    }

    /// Create a planner with auto-fix explicitly on or off.
    pub fn with_auto_fix(auto_fix: bool) -> Self {
        Self::with_profiles(ProfileTable::default(), auto_fix)
    }

    /// Create a planner with a custom profile table.
    pub fn with_profiles(profiles: ProfileTable, auto_fix: bool) -> Self {
        Self {
            distributor: DurationDistributor::with_profiles(profiles.clone()),
            refiner: DurationRefiner::with_profiles(profiles),
            validator: WeekValidator::with_auto_fix(auto_fix),
        }
    }

    /// Plan the week described by `descriptor`.
    ///
    /// Weeks are independent; nothing is shared across calls beyond the
    /// read-only catalog.
    pub fn plan_week(
        &self,
        descriptor: &WeekDescriptor,
        catalog: &dyn TemplateCatalog,
        selector: &dyn TemplateSelector,
        tss: &dyn TssCalculator,
        ftp: u16,
    ) -> Result<PlannedWeek, PlanError> {
        let slots = &descriptor.training_days;
        let training_days = slots
            .iter()
            .filter(|s| !s.workout_type.is_rest())
            .count();
        if training_days == 0 {
            return Err(PlanError::EmptyWeek);
        }

        tracing::info!(
            "planning week {} ({}, {:.1}h over {} training days)",
            descriptor.week_number,
            descriptor.phase,
            descriptor.total_hours,
            training_days
        );

        let allocations = self
            .distributor
            .distribute(slots, descriptor.total_hours);

        let mut workouts = Vec::with_capacity(training_days);
        for slot in slots.iter().filter(|s| !s.workout_type.is_rest()) {
            let Some(allocation) = allocations.get(&slot.weekday) else {
                continue;
            };

            let template = selector
                .select(catalog, slot, descriptor.phase, allocation)
                .ok_or(PlanError::NoTemplate {
                    workout_type: slot.workout_type,
                    weekday: slot.weekday,
                })?;

            let adjusted = WorkoutScaler::adjust(&template, allocation.target_duration_min);
            tracing::debug!(
                "{}: '{}' {:.0} min -> {:.0} min",
                slot.weekday,
                template.name,
                template.base_duration_min,
                adjusted.base_duration_min
            );
            workouts.push(PlannedWorkout::new(adjusted, slot.weekday));
        }

        let refined = self
            .refiner
            .refine(&workouts, slots, descriptor.total_hours);

        let plan = WeekPlan {
            week_number: descriptor.week_number,
            phase: descriptor.phase,
            target_hours: descriptor.total_hours,
            target_tss: descriptor.target_tss,
            workouts: refined,
        };

        let (accepted, report) = self.validator.validate(&plan, slots, ftp, tss)?;
        tracing::info!(
            "week {} accepted under the {} scenario ({:.2}h, {:.0} TSS)",
            accepted.week_number,
            report.scenario_used,
            report.actual_hours,
            report.actual_tss
        );

        Ok(PlannedWeek {
            plan: accepted,
            report,
        })
    }
}

impl Default for WeekPlanner {
    fn default() -> Self {
        Self::new()
    }
}
