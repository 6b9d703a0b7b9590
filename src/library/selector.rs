//! Template selection seam.

use crate::planner::types::{DurationAllocation, Phase, TrainingDaySlot, Workout};

use super::catalog::TemplateCatalog;

/// Picks one template to start a slot from.
///
/// The production scorer is stochastic and lives outside this engine;
/// implementations receive everything it scores on.
pub trait TemplateSelector {
    /// Select a template for `slot`, or `None` when the catalog has
    /// nothing usable.
    fn select(
        &self,
        catalog: &dyn TemplateCatalog,
        slot: &TrainingDaySlot,
        phase: Phase,
        allocation: &DurationAllocation,
    ) -> Option<Workout>;
}

/// Deterministic reference selector.
///
/// Picks the template of the slot's type whose base duration is closest
/// to the allocated target. Ties resolve to the first catalog entry, so
/// repeated runs produce identical weeks.
pub struct ClosestDurationSelector;

impl ClosestDurationSelector {
    pub fn new() -> Self {
        Self
    }
}

impl TemplateSelector for ClosestDurationSelector {
    fn select(
        &self,
        catalog: &dyn TemplateCatalog,
        slot: &TrainingDaySlot,
        _phase: Phase,
        allocation: &DurationAllocation,
    ) -> Option<Workout> {
        catalog
            .templates_for(slot.workout_type)
            .into_iter()
            .min_by(|a, b| {
                let da = (a.base_duration_min - allocation.target_duration_min).abs();
                let db = (b.base_duration_min - allocation.target_duration_min).abs();
                da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
            })
            .cloned()
    }
}

impl Default for ClosestDurationSelector {
    fn default() -> Self {
        Self::new()
    }
}
