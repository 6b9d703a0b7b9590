//! PedalPlan - Weekly Training Plan Engine
//!
//! Takes a week's abstract training prescription (target hours/TSS and
//! typed training-day slots), fills each slot from a workout template
//! catalog, and adjusts durations so the week's total matches the
//! prescribed budget within tolerance, repairing over-budget weeks with
//! a bounded, non-destructive reduction step.

pub mod config;
pub mod library;
pub mod metrics;
pub mod planner;

// Re-export commonly used types
pub use config::PlannerSettings;
pub use library::{ClosestDurationSelector, InMemoryCatalog, TemplateCatalog, TemplateSelector};
pub use metrics::{SegmentTssCalculator, TssCalculator};
pub use planner::engine::{PlannedWeek, WeekPlanner};
pub use planner::types::{WeekDescriptor, WeekPlan};
