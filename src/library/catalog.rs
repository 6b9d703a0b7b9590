//! Read-only template catalog seam.

use uuid::Uuid;

use crate::planner::types::{Workout, WorkoutType};

use super::templates::generate_seed_templates;

/// Read-only store of workout templates.
///
/// Templates handed out by a catalog are shared values; callers clone
/// before adjusting anything.
pub trait TemplateCatalog {
    /// All templates of the given workout type.
    fn templates_for(&self, workout_type: WorkoutType) -> Vec<&Workout>;

    /// Look up a template by id.
    fn get(&self, id: Uuid) -> Option<&Workout>;

    /// Number of templates in the catalog.
    fn len(&self) -> usize;

    /// Whether the catalog is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-memory template catalog.
pub struct InMemoryCatalog {
    templates: Vec<Workout>,
}

impl InMemoryCatalog {
    /// Create a catalog from a set of templates.
    pub fn new(templates: Vec<Workout>) -> Self {
        Self { templates }
    }

    /// Create a catalog seeded with the built-in templates.
    pub fn seeded() -> Self {
        Self::new(generate_seed_templates())
    }
}

impl TemplateCatalog for InMemoryCatalog {
    fn templates_for(&self, workout_type: WorkoutType) -> Vec<&Workout> {
        self.templates
            .iter()
            .filter(|w| w.workout_type == workout_type)
            .collect()
    }

    fn get(&self, id: Uuid) -> Option<&Workout> {
        self.templates.iter().find(|w| w.id == id)
    }

    fn len(&self) -> usize {
        self.templates.len()
    }
}
