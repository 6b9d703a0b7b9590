//! Duration profiles per workout type and day category.
//!
//! The profile table is static configuration: realistic minimum, target
//! and maximum durations for each workout type, with weekend days
//! allowing longer rides than weekdays.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::types::{DayCategory, WorkoutType};

/// Duration bounds in minutes for one `(workout type, day category)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DurationProfile {
    /// Minimum sensible duration
    pub min: f64,
    /// Typical duration
    pub target: f64,
    /// Maximum sensible duration
    pub max: f64,
}

impl DurationProfile {
    pub fn new(min: f64, target: f64, max: f64) -> Self {
        Self { min, target, max }
    }

    /// Clamp a duration into this profile's bounds.
    pub fn clamp(&self, duration_min: f64) -> f64 {
        duration_min.clamp(self.min, self.max)
    }
}

/// Lookup table of duration profiles, overridable per entry.
#[derive(Debug, Clone)]
pub struct ProfileTable {
    entries: HashMap<(WorkoutType, DayCategory), DurationProfile>,
}

impl ProfileTable {
    /// Look up the profile for a slot.
    ///
    /// Rest days have a zero profile; every trainable type has an entry.
    pub fn lookup(&self, workout_type: WorkoutType, category: DayCategory) -> DurationProfile {
        self.entries
            .get(&(workout_type, category))
            .copied()
            .unwrap_or(DurationProfile {
                min: 0.0,
                target: 0.0,
                max: 0.0,
            })
    }

    /// Override one entry, e.g. for athletes with non-standard schedules.
    pub fn set(
        &mut self,
        workout_type: WorkoutType,
        category: DayCategory,
        profile: DurationProfile,
    ) {
        self.entries.insert((workout_type, category), profile);
    }
}

impl Default for ProfileTable {
    fn default() -> Self {
        let mut entries = HashMap::new();

        for (workout_type, weekday, weekend) in default_profiles() {
            entries.insert((workout_type, DayCategory::Weekday), weekday);
            entries.insert((workout_type, DayCategory::Weekend), weekend);
        }

        Self { entries }
    }
}

/// Built-in `(type, weekday profile, weekend profile)` triples.
fn default_profiles() -> Vec<(WorkoutType, DurationProfile, DurationProfile)> {
    vec![
        (
            WorkoutType::Recovery,
            DurationProfile::new(30.0, 45.0, 60.0),
            DurationProfile::new(30.0, 50.0, 75.0),
        ),
        (
            WorkoutType::Endurance,
            DurationProfile::new(60.0, 90.0, 150.0),
            DurationProfile::new(90.0, 150.0, 240.0),
        ),
        (
            WorkoutType::Tempo,
            DurationProfile::new(45.0, 75.0, 105.0),
            DurationProfile::new(60.0, 90.0, 135.0),
        ),
        (
            WorkoutType::SweetSpot,
            DurationProfile::new(45.0, 75.0, 105.0),
            DurationProfile::new(60.0, 90.0, 120.0),
        ),
        (
            WorkoutType::Threshold,
            DurationProfile::new(45.0, 70.0, 95.0),
            DurationProfile::new(60.0, 80.0, 110.0),
        ),
        (
            WorkoutType::Vo2max,
            DurationProfile::new(45.0, 65.0, 90.0),
            DurationProfile::new(50.0, 75.0, 100.0),
        ),
        (
            WorkoutType::Mixed,
            DurationProfile::new(60.0, 90.0, 135.0),
            DurationProfile::new(75.0, 120.0, 180.0),
        ),
    ]
}
