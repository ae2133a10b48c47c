//! Read-only render projection.
//!
//! After every handled event the engine projects its session into a
//! [`CanvasView`] and hands it to the host's [`ViewSink`]. Nothing in the
//! view aliases engine state, so a renderer may keep it as long as it likes.

#[cfg(test)]
#[path = "view_test.rs"]
mod view_test;

use serde::Serialize;

use crate::camera::Transform;
use crate::doc::{Card, EntityId, EntityKind, Track};
use crate::hit::TrackEdge;
use crate::input::{Gesture, Tool};

/// Which parts of the canvas the active gesture is touching.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GestureFlags {
    /// Leader id and kind of an entity drag.
    pub dragging: Option<(EntityId, EntityKind)>,
    /// Track and edge under resize.
    pub resizing: Option<(EntityId, TrackEdge)>,
    /// Track being drawn.
    pub creating_track: Option<EntityId>,
    pub panning: bool,
    pub over_delete_zone: bool,
}

impl GestureFlags {
    #[must_use]
    pub fn of(gesture: &Gesture) -> Self {
        let mut flags = Self { over_delete_zone: gesture.over_delete_zone(), ..Self::default() };
        match gesture {
            Gesture::Idle | Gesture::DraggingExternalNew { .. } => {}
            Gesture::Panning { .. } => flags.panning = true,
            Gesture::DraggingEntities { leader, kind, .. } => flags.dragging = Some((leader.clone(), *kind)),
            Gesture::ResizingTrack { id, edge, .. } => flags.resizing = Some((id.clone(), *edge)),
            Gesture::CreatingTrack { id, .. } => flags.creating_track = Some(id.clone()),
        }
        flags
    }
}

/// Everything a renderer needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasView {
    pub cards: Vec<Card>,
    pub tracks: Vec<Track>,
    /// Template card being dragged in from the library, not yet on the canvas.
    pub ghost: Option<Card>,
    pub selection: Vec<EntityId>,
    pub gesture: GestureFlags,
    pub transform: Transform,
    pub tool: Tool,
    pub presenting: bool,
    pub step_index: usize,
    pub step_count: usize,
}

/// Receives a fresh projection whenever the engine asks for a render.
pub trait ViewSink {
    fn present(&mut self, view: &CanvasView);
}
