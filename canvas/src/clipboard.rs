//! Copy/paste of cards and tracks.
//!
//! The clipboard is an owned holder inside the engine; it is not part of any
//! backup or history step. Pasting re-ids every stored entity, offsets it by
//! one grid unit, and then stores the pasted copies, so repeated pastes walk
//! diagonally away from the original instead of stacking on one spot.

#[cfg(test)]
#[path = "clipboard_test.rs"]
mod clipboard_test;

use crate::consts::GRID_SIZE;
use crate::doc::{Card, DocStore, EntityId, EntityKind, Track, new_entity_id};
use crate::selection::Selection;

/// A deep copy of one entity, tagged with its type.
#[derive(Debug, Clone, PartialEq)]
pub enum ClipboardItem {
    Card(Card),
    Track(Track),
}

impl ClipboardItem {
    #[must_use]
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Card(_) => EntityKind::Card,
            Self::Track(_) => EntityKind::Track,
        }
    }
}

/// Holder for the most recently copied (or pasted) entities.
#[derive(Debug, Clone, Default)]
pub struct Clipboard {
    items: Vec<ClipboardItem>,
}

impl Clipboard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot every selected card and track, replacing previous contents.
    ///
    /// Returns the number of items copied. An empty selection leaves the
    /// clipboard untouched and returns 0.
    pub fn copy(&mut self, selection: &Selection, doc: &DocStore) -> usize {
        let items: Vec<ClipboardItem> = selection
            .iter()
            .filter_map(|id| {
                doc.card(id)
                    .cloned()
                    .map(ClipboardItem::Card)
                    .or_else(|| doc.track(id).cloned().map(ClipboardItem::Track))
            })
            .collect();
        if items.is_empty() {
            return 0;
        }
        self.items = items;
        self.items.len()
    }

    /// Insert offset, re-id'd copies of the clipboard into `doc`.
    ///
    /// Returns the ids of the new entities in clipboard order. The clipboard
    /// then holds the pasted entities, so the next paste offsets from them.
    pub fn paste(&mut self, doc: &mut DocStore) -> Vec<EntityId> {
        let mut pasted = Vec::with_capacity(self.items.len());
        let mut ids = Vec::with_capacity(self.items.len());
        for item in &self.items {
            let id = new_entity_id(item.kind().id_prefix());
            ids.push(id.clone());
            let copy = match item {
                ClipboardItem::Card(card) => {
                    let card = Card { id, x: card.x + GRID_SIZE, y: card.y + GRID_SIZE, ..card.clone() };
                    doc.insert_card(card.clone());
                    ClipboardItem::Card(card)
                }
                ClipboardItem::Track(track) => {
                    let track = Track { id, x: track.x + GRID_SIZE, y: track.y + GRID_SIZE, ..track.clone() };
                    doc.insert_track(track.clone());
                    ClipboardItem::Track(track)
                }
            };
            pasted.push(copy);
        }
        self.items = pasted;
        ids
    }

    #[must_use]
    pub fn items(&self) -> &[ClipboardItem] {
        &self.items
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
