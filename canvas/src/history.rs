//! History capture and present-mode playback.
//!
//! A `HistoryStep` is an immutable whole-canvas snapshot. The recorder keeps
//! an ordered list of them plus the playback cursor. It never touches live
//! state itself: `restore`, `next` and `prev` hand back the step that the
//! caller must apply wholesale to the store and transform.

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;

use serde::{Deserialize, Serialize};

use crate::camera::Transform;
use crate::doc::{Card, DocStore, Track, now_ms};

/// A full snapshot of entities and viewport at one moment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryStep {
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    pub cards: Vec<Card>,
    pub tracks: Vec<Track>,
    pub transform: Transform,
}

/// Ordered history steps and the playback position.
#[derive(Debug, Clone, Default)]
pub struct History {
    steps: Vec<HistoryStep>,
    current: usize,
    presenting: bool,
}

impl History {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a snapshot of the live state. Earlier steps are never touched.
    pub fn capture(&mut self, doc: &DocStore, transform: Transform) -> &HistoryStep {
        let step = self.snapshot(doc, transform);
        self.steps.push(step);
        &self.steps[self.steps.len() - 1]
    }

    /// Replace the whole list with a single snapshot of the live state.
    pub fn reset(&mut self, doc: &DocStore, transform: Transform) -> &HistoryStep {
        let step = self.snapshot(doc, transform);
        self.steps = vec![step];
        self.current = 0;
        &self.steps[0]
    }

    /// Move the cursor to `index` and return that step, if it exists.
    pub fn restore(&mut self, index: usize) -> Option<&HistoryStep> {
        if index >= self.steps.len() {
            return None;
        }
        self.current = index;
        self.steps.get(index)
    }

    /// Advance one step. `None` when already at the last step.
    pub fn next(&mut self) -> Option<&HistoryStep> {
        if self.current + 1 >= self.steps.len() {
            return None;
        }
        self.restore(self.current + 1)
    }

    /// Go back one step. `None` when already at the first step.
    pub fn prev(&mut self) -> Option<&HistoryStep> {
        if self.current == 0 || self.steps.is_empty() {
            return None;
        }
        self.restore(self.current - 1)
    }

    /// Start present mode at the first step, if there is one.
    pub fn enter_present(&mut self) -> Option<&HistoryStep> {
        self.presenting = true;
        self.restore(0)
    }

    /// Leave present mode at the most recent step, if there is one.
    pub fn exit_present(&mut self) -> Option<&HistoryStep> {
        self.presenting = false;
        let last = self.steps.len().checked_sub(1)?;
        self.restore(last)
    }

    /// Replace the list wholesale (backup restore). The cursor is clamped.
    pub fn replace(&mut self, steps: Vec<HistoryStep>) {
        self.steps = steps;
        self.current = self.current.min(self.steps.len().saturating_sub(1));
    }

    #[must_use]
    pub fn steps(&self) -> &[HistoryStep] {
        &self.steps
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    #[must_use]
    pub fn is_presenting(&self) -> bool {
        self.presenting
    }

    /// Build a step whose timestamp is strictly after every existing one.
    fn snapshot(&self, doc: &DocStore, transform: Transform) -> HistoryStep {
        let floor = self.steps.last().map_or(i64::MIN, |s| s.timestamp.saturating_add(1));
        HistoryStep {
            timestamp: now_ms().max(floor),
            cards: doc.cards().to_vec(),
            tracks: doc.tracks().to_vec(),
            transform,
        }
    }
}
