//! Multi-selection with modifier-aware click semantics.
//!
//! The selection is a set of entity ids. It never owns entities; callers must
//! call [`Selection::retain_existing`] (or [`Selection::remove`]) after
//! deleting from the store so no stale id survives.

#[cfg(test)]
#[path = "selection_test.rs"]
mod selection_test;

use std::collections::BTreeSet;

use crate::doc::{DocStore, EntityId};

/// What a click on an entity did to the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Plain click on an unselected entity: it is now the only selected entity.
    Replaced,
    /// Plain click on an already-selected entity: nothing changed.
    Unchanged,
    /// Additive click on an unselected entity: it joined the selection.
    Added,
    /// Additive click on a selected entity: it left the selection.
    Removed,
}

impl ClickOutcome {
    /// Whether the click may go on to start a drag.
    #[must_use]
    pub fn allows_drag(self) -> bool {
        !matches!(self, Self::Removed)
    }

    /// Whether the selection set changed.
    #[must_use]
    pub fn changed(self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}

/// The set of currently selected entity ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: BTreeSet<EntityId>,
}

impl Selection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply the click rule for entity `id`. `additive` is Ctrl/Cmd held.
    pub fn click(&mut self, id: &str, additive: bool) -> ClickOutcome {
        let selected = self.ids.contains(id);
        match (additive, selected) {
            (false, false) => {
                self.ids.clear();
                self.ids.insert(id.to_owned());
                ClickOutcome::Replaced
            }
            (false, true) => ClickOutcome::Unchanged,
            (true, false) => {
                self.ids.insert(id.to_owned());
                ClickOutcome::Added
            }
            (true, true) => {
                self.ids.remove(id);
                ClickOutcome::Removed
            }
        }
    }

    /// Deselect everything. Returns true if anything was selected.
    pub fn clear(&mut self) -> bool {
        let had_any = !self.ids.is_empty();
        self.ids.clear();
        had_any
    }

    /// Replace the selection wholesale.
    pub fn replace<I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = EntityId>,
    {
        self.ids = ids.into_iter().collect();
    }

    /// Remove one id. Returns true if it was selected.
    pub fn remove(&mut self, id: &str) -> bool {
        self.ids.remove(id)
    }

    /// Drop every id that no longer exists in `doc`. Returns true if any were dropped.
    pub fn retain_existing(&mut self, doc: &DocStore) -> bool {
        let before = self.ids.len();
        self.ids.retain(|id| doc.contains(id));
        self.ids.len() != before
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &EntityId> {
        self.ids.iter()
    }

    #[must_use]
    pub fn to_vec(&self) -> Vec<EntityId> {
        self.ids.iter().cloned().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
