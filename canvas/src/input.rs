//! Pointer and keyboard event types, plus the gesture state machine.
//!
//! `Tool` and `Modifiers` describe what a pointer-down means.
//! `Gesture` is the single active interaction tracked between pointer-down
//! and pointer-up, carrying all context needed to compute incremental
//! updates, finalize on release, or roll back on cancel.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use std::collections::BTreeMap;

use serde::Serialize;

use crate::camera::Point;
use crate::doc::{Card, EntityId, EntityKind, Track};
use crate::hit::TrackEdge;

/// Which tool is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    /// Pointer / selection tool (default).
    #[default]
    Select,
    /// Every primary drag pans the viewport.
    Pan,
    /// Draw a new track.
    Track,
}

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Modifiers {
    /// Shift key is held.
    pub shift: bool,
    /// Ctrl key is held.
    pub ctrl: bool,
    /// Alt / Option key is held.
    pub alt: bool,
    /// Meta / Command key is held.
    pub meta: bool,
}

impl Modifiers {
    /// Ctrl or Cmd: additive selection, zoom-on-wheel, and shortcuts.
    #[must_use]
    pub fn command(self) -> bool {
        self.ctrl || self.meta
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

/// A keyboard key.
///
/// The inner string holds the key name as reported by the host (e.g. `"Delete"`, `"Escape"`, `"c"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

impl Key {
    /// Case-insensitive match against a single-character shortcut key.
    #[must_use]
    pub fn is_letter(&self, letter: char) -> bool {
        let mut chars = self.0.chars();
        matches!((chars.next(), chars.next()), (Some(c), None) if c.eq_ignore_ascii_case(&letter))
    }
}

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy)]
pub struct WheelDelta {
    /// Horizontal scroll amount in pixels.
    pub dx: f64,
    /// Vertical scroll amount in pixels (positive = down).
    pub dy: f64,
}

/// Geometry of a track, captured so a resize can be rolled back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackBounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl TrackBounds {
    #[must_use]
    pub fn of(track: &Track) -> Self {
        Self { x: track.x, y: track.y, width: track.width, height: track.height }
    }

    pub fn apply_to(self, track: &mut Track) {
        track.x = self.x;
        track.y = self.y;
        track.width = self.width;
        track.height = self.height;
    }
}

/// The active gesture.
///
/// Exactly one variant is live at a time; new gestures may only start from
/// `Idle`. Each active variant carries what its move, release and cancel
/// handlers need.
#[derive(Debug, Clone, Default)]
pub enum Gesture {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// The user is panning the viewport.
    Panning {
        /// Screen-space position of the previous pointer event, used to compute pan delta.
        last_screen: Point,
    },
    /// The user is moving one or more existing entities.
    DraggingEntities {
        /// The entity that was grabbed.
        leader: EntityId,
        /// Kind of the leader; decides what a delete-zone drop removes.
        kind: EntityKind,
        /// `pointer / scale - leader.position` at pointer-down.
        start_offset: Point,
        /// Position of every moving entity at pointer-down, keyed by id.
        initial_positions: BTreeMap<EntityId, Point>,
        /// Whether the pointer is currently over the delete zone.
        over_delete_zone: bool,
    },
    /// The user is dragging one edge of a track.
    ResizingTrack {
        id: EntityId,
        edge: TrackEdge,
        /// Geometry at pointer-down, restored on cancel.
        original: TrackBounds,
    },
    /// The user is drawing a new track from an anchor corner.
    CreatingTrack {
        /// Id of the provisional track already in the store.
        id: EntityId,
        /// Snapped world-space corner where the drag started.
        anchor: Point,
    },
    /// The user is dragging a template in from the library.
    DraggingExternalNew {
        /// The card that will be inserted on release. Not yet in the store.
        ghost: Card,
        /// `pointer / scale - ghost.position` at drag start.
        start_offset: Point,
        /// Whether the pointer is currently over the delete zone.
        over_delete_zone: bool,
    },
}

impl Gesture {
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Whether an entity or template drag is currently over the delete zone.
    #[must_use]
    pub fn over_delete_zone(&self) -> bool {
        match self {
            Self::DraggingEntities { over_delete_zone, .. } | Self::DraggingExternalNew { over_delete_zone, .. } => {
                *over_delete_zone
            }
            _ => false,
        }
    }

    /// Short name for log fields.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Panning { .. } => "panning",
            Self::DraggingEntities { .. } => "dragging_entities",
            Self::ResizingTrack { .. } => "resizing_track",
            Self::CreatingTrack { .. } => "creating_track",
            Self::DraggingExternalNew { .. } => "dragging_external_new",
        }
    }
}
