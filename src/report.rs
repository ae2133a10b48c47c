//! Plain-text and JSON summaries of a loaded organization.

#[cfg(test)]
#[path = "report_test.rs"]
mod report_test;

use std::fmt;

use canvas::camera::Transform;
use canvas::doc::CardStatus;
use canvas::engine::EngineCore;
use canvas::view::CanvasView;
use serde::Serialize;

/// How many cards sit in each staffing state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub unassigned: usize,
    pub suggested: usize,
    pub assigned: usize,
}

/// Everything `inspect` reports about an organization.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub org_name: String,
    pub cards: usize,
    pub status: StatusCounts,
    pub tracks: usize,
    /// Tracks created by grouping cards.
    pub groups: usize,
    pub role_templates: usize,
    pub people_templates: usize,
    pub transform: Transform,
    pub history_steps: usize,
}

impl Summary {
    #[must_use]
    pub fn of(core: &EngineCore) -> Self {
        let mut status = StatusCounts::default();
        for card in core.doc.cards() {
            match card.status {
                CardStatus::Unassigned => status.unassigned += 1,
                CardStatus::Suggested => status.suggested += 1,
                CardStatus::Assigned => status.assigned += 1,
            }
        }
        let tracks = core.doc.tracks();
        Self {
            org_name: core.org.name.clone(),
            cards: core.doc.cards().len(),
            status,
            tracks: tracks.len(),
            groups: tracks.iter().filter(|t| t.contained_card_ids.is_some()).count(),
            role_templates: core.library.roles.len(),
            people_templates: core.library.people.len(),
            transform: core.transform,
            history_steps: core.history.len(),
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "organization: {}", self.org_name)?;
        writeln!(
            f,
            "cards:        {} ({} unassigned, {} suggested, {} assigned)",
            self.cards, self.status.unassigned, self.status.suggested, self.status.assigned
        )?;
        writeln!(f, "tracks:       {} ({} groups)", self.tracks, self.groups)?;
        writeln!(f, "library:      {} roles, {} people", self.role_templates, self.people_templates)?;
        writeln!(f, "view:         {}", TransformLabel(self.transform))?;
        write!(f, "history:      {} steps", self.history_steps)
    }
}

/// One line of present-mode playback.
#[derive(Debug, Clone, PartialEq)]
pub struct StepLine {
    /// 1-based position in the recording.
    pub position: usize,
    pub count: usize,
    pub cards: usize,
    pub tracks: usize,
    pub transform: Transform,
}

impl StepLine {
    #[must_use]
    pub fn of(view: &CanvasView) -> Self {
        Self {
            position: view.step_index + 1,
            count: view.step_count,
            cards: view.cards.len(),
            tracks: view.tracks.len(),
            transform: view.transform,
        }
    }
}

impl fmt::Display for StepLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "step {}/{}: {} cards, {} tracks, {}",
            self.position,
            self.count,
            self.cards,
            self.tracks,
            TransformLabel(self.transform)
        )
    }
}

/// `pan (x, y) at N%`.
struct TransformLabel(Transform);

impl fmt::Display for TransformLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Transform { x, y, scale } = self.0;
        write!(f, "pan ({x:.0}, {y:.0}) at {:.0}%", scale * 100.0)
    }
}
