//! Hit-testing: pointer positions against entities, track edges, and the delete zone.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use serde::Serialize;

use crate::camera::{Point, Transform};
use crate::consts::HANDLE_RADIUS_PX;
use crate::doc::{DocStore, EntityId, EntityKind, Track};

/// Which edge of a track is being resized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackEdge {
    Top,
    Bottom,
    Left,
    Right,
}

/// What sits under the pointer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Hit {
    /// The body of a card.
    Card(EntityId),
    /// The body of a track.
    Track(EntityId),
    /// A resize handle on one edge of a track.
    TrackEdge(EntityId, TrackEdge),
}

impl Hit {
    /// Entity id and kind for body hits; `None` for resize handles.
    #[must_use]
    pub fn entity(&self) -> Option<(&str, EntityKind)> {
        match self {
            Self::Card(id) => Some((id, EntityKind::Card)),
            Self::Track(id) => Some((id, EntityKind::Track)),
            Self::TrackEdge(..) => None,
        }
    }
}

/// A screen-space rectangle supplied by the host (the toolbar / delete target).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenRect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl ScreenRect {
    #[must_use]
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self { left, top, right, bottom }
    }

    /// Whether `p` lies inside the rectangle, all four edges inclusive.
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.left && p.x <= self.right && p.y >= self.top && p.y <= self.bottom
    }
}

/// Whether `screen_pt` is over the delete zone. No zone means never.
#[must_use]
pub fn over_delete_zone(zone: Option<&ScreenRect>, screen_pt: Point) -> bool {
    zone.is_some_and(|rect| rect.contains(screen_pt))
}

/// Test which entity (if any) is under `screen_pt`.
///
/// Track resize edges win over everything, then cards, then track bodies.
/// Within each group the most recently inserted (topmost) entity wins.
#[must_use]
pub fn hit_test(screen_pt: Point, doc: &DocStore, transform: &Transform) -> Option<Hit> {
    let world = transform.to_world(screen_pt);
    let slop = transform.screen_dist_to_world(HANDLE_RADIUS_PX);

    for track in doc.tracks().iter().rev() {
        if let Some(edge) = edge_under(track, world, slop) {
            return Some(Hit::TrackEdge(track.id.clone(), edge));
        }
    }
    if let Some(card) = doc.cards().iter().rev().find(|c| c.contains(world)) {
        return Some(Hit::Card(card.id.clone()));
    }
    doc.tracks()
        .iter()
        .rev()
        .find(|t| t.contains(world))
        .map(|t| Hit::Track(t.id.clone()))
}

/// Which edge band of `track` contains `world`, if any.
///
/// Bands extend `slop` world units to either side of each edge and only span
/// the edge's own extent.
fn edge_under(track: &Track, world: Point, slop: f64) -> Option<TrackEdge> {
    let within_x = world.x >= track.x - slop && world.x <= track.x + track.width + slop;
    let within_y = world.y >= track.y - slop && world.y <= track.y + track.height + slop;
    let near = |value: f64, edge: f64| (value - edge).abs() <= slop;

    if within_x && near(world.y, track.y) {
        Some(TrackEdge::Top)
    } else if within_x && near(world.y, track.y + track.height) {
        Some(TrackEdge::Bottom)
    } else if within_y && near(world.x, track.x) {
        Some(TrackEdge::Left)
    } else if within_y && near(world.x, track.x + track.width) {
        Some(TrackEdge::Right)
    } else {
        None
    }
}
