//! Bulk selection mode for list screens.
//!
//! # Invariants
//! - Entering or leaving the mode always clears the working set.
//! - Selected ids are not validated against the collection; ids of deleted
//!   records stay in the set as harmless no-ops until the mode exits.

use crate::model::id::EntityId;
use std::collections::HashSet;

/// Selection mode flag plus the working id set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkSelection {
    active: bool,
    selected: HashSet<EntityId>,
}

impl BulkSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switches selection mode on with an empty set, optionally seeded.
    ///
    /// Seeding covers a long-press that starts selection on an item.
    pub fn enter(&mut self, seed: Option<EntityId>) {
        self.active = true;
        self.selected.clear();
        if let Some(id) = seed {
            self.selected.insert(id);
        }
    }

    /// Adds or removes `id`. Returns whether `id` is selected afterwards.
    pub fn toggle(&mut self, id: EntityId) -> bool {
        if self.selected.remove(&id) {
            false
        } else {
            self.selected.insert(id);
            true
        }
    }

    pub fn exit(&mut self) {
        self.active = false;
        self.selected.clear();
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn contains(&self, id: &EntityId) -> bool {
        self.selected.contains(id)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &EntityId> {
        self.selected.iter()
    }
}
