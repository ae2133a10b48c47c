//! Document model: cards, tracks, templates, and the in-memory store.
//!
//! This module defines the data types that describe what is on the canvas
//! (`Card`, `Track`), the template catalogue a card is created from
//! (`RoleTemplate`, `PersonTemplate`, `Library`), the organization a canvas
//! belongs to, and the runtime store that owns all live entities
//! (`DocStore`).
//!
//! Data flows into this layer from backups (JSON deserialization), from
//! history playback, and from the input engine (mutations). The store keeps
//! insertion order, which is also the draw order: later entities are on top.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::camera::Point;
use crate::consts::{CARD_HEIGHT_LARGE, CARD_HEIGHT_SMALL, CARD_WIDTH_LARGE, CARD_WIDTH_SMALL};

/// Unique identifier for a card, track, or template.
pub type EntityId = String;

/// Milliseconds since the Unix epoch, or 0 if the clock is before it.
pub(crate) fn now_ms() -> i64 {
    let Ok(dur) = SystemTime::now().duration_since(UNIX_EPOCH) else {
        return 0;
    };
    i64::try_from(dur.as_millis()).unwrap_or(0)
}

/// Generate a fresh id of the form `<prefix>-<unix-millis>-<uuid>`.
///
/// The timestamp keeps ids roughly ordered by creation; the v4 uuid makes
/// collisions within the same millisecond practically impossible.
#[must_use]
pub fn new_entity_id(prefix: &str) -> EntityId {
    format!("{prefix}-{}-{}", now_ms(), Uuid::new_v4().simple())
}

/// The two kinds of entity that live on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Card,
    Track,
}

impl EntityKind {
    /// Prefix used when generating ids for this kind.
    #[must_use]
    pub fn id_prefix(self) -> &'static str {
        match self {
            Self::Card => "card",
            Self::Track => "track",
        }
    }
}

/// A typed reference to a live entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityRef {
    pub id: EntityId,
    pub kind: EntityKind,
}

/// Display size of a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardSize {
    Small,
    #[default]
    Large,
}

impl CardSize {
    /// The other size.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Small => Self::Large,
            Self::Large => Self::Small,
        }
    }

    /// Footprint `(width, height)` in world units.
    #[must_use]
    pub fn dimensions(self) -> (f64, f64) {
        match self {
            Self::Small => (CARD_WIDTH_SMALL, CARD_HEIGHT_SMALL),
            Self::Large => (CARD_WIDTH_LARGE, CARD_HEIGHT_LARGE),
        }
    }
}

/// Staffing status of a role card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardStatus {
    #[default]
    Unassigned,
    /// A person has been proposed but not yet approved.
    Suggested,
    Assigned,
}

/// A positioned role card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: EntityId,
    /// Role title copied from the template.
    #[serde(default)]
    pub role: String,
    /// Role description copied from the template.
    #[serde(default)]
    pub summary: String,
    /// Left edge in world coordinates.
    pub x: f64,
    /// Top edge in world coordinates.
    pub y: f64,
    #[serde(default)]
    pub size: CardSize,
    #[serde(default)]
    pub status: CardStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_person_id: Option<EntityId>,
}

impl Card {
    /// Build an unassigned, large card from a role template at `position`.
    #[must_use]
    pub fn from_template(template: &RoleTemplate, position: Point) -> Self {
        Self {
            id: new_entity_id(EntityKind::Card.id_prefix()),
            role: template.role.clone(),
            summary: template.summary.clone(),
            x: position.x,
            y: position.y,
            size: CardSize::Large,
            status: CardStatus::Unassigned,
            assigned_person_id: None,
        }
    }

    #[must_use]
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Footprint `(width, height)` in world units.
    #[must_use]
    pub fn dimensions(&self) -> (f64, f64) {
        self.size.dimensions()
    }

    /// Whether `world` lies inside the card's footprint (edges inclusive).
    #[must_use]
    pub fn contains(&self, world: Point) -> bool {
        let (w, h) = self.dimensions();
        world.x >= self.x && world.x <= self.x + w && world.y >= self.y && world.y <= self.y + h
    }
}

/// A resizable rectangular grouping frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub id: EntityId,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Cards this track was grouped from. Informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contained_card_ids: Option<Vec<EntityId>>,
}

impl Track {
    /// A zero-size, unnamed track anchored at `position`.
    #[must_use]
    pub fn empty_at(position: Point) -> Self {
        Self {
            id: new_entity_id(EntityKind::Track.id_prefix()),
            x: position.x,
            y: position.y,
            width: 0.0,
            height: 0.0,
            name: None,
            contained_card_ids: None,
        }
    }

    #[must_use]
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Whether `world` lies inside the track (edges inclusive).
    #[must_use]
    pub fn contains(&self, world: Point) -> bool {
        world.x >= self.x && world.x <= self.x + self.width && world.y >= self.y && world.y <= self.y + self.height
    }
}

/// A role in the template catalogue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleTemplate {
    pub id: EntityId,
    pub role: String,
    pub summary: String,
}

/// A person in the template catalogue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonTemplate {
    pub id: EntityId,
    pub name: String,
    pub image_url: String,
}

/// Role and person templates available for dragging onto the canvas.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Library {
    pub roles: Vec<RoleTemplate>,
    pub people: Vec<PersonTemplate>,
}

impl Library {
    /// The catalogue a brand-new organization starts with.
    #[must_use]
    pub fn starter() -> Self {
        let role = |id: &str, role: &str, summary: &str| RoleTemplate {
            id: id.to_owned(),
            role: role.to_owned(),
            summary: summary.to_owned(),
        };
        let person = |id: &str, name: &str, image_url: &str| PersonTemplate {
            id: id.to_owned(),
            name: name.to_owned(),
            image_url: image_url.to_owned(),
        };
        Self {
            roles: vec![
                role("r1", "Chief Executive", "Strategic vision and high-level decision making for the entire organization."),
                role("r2", "Engineering Lead", "Oversees technical implementation, roadmap, and core platform architecture."),
                role("r3", "Product Designer", "Ensures user-centricity through rigorous research and visual consistency."),
            ],
            people: vec![
                person("p1", "Alex Rivera", "https://images.unsplash.com/photo-1472099645785-5658abf4ff4e?auto=format&fit=crop&q=80&w=150&h=150"),
                person("p2", "Sarah Chen", "https://images.unsplash.com/photo-1438761681033-6461ffad8d80?auto=format&fit=crop&q=80&w=150&h=150"),
            ],
        }
    }

    /// Add a custom role to the front of the catalogue and return its id.
    pub fn add_role(&mut self, name: &str) -> EntityId {
        let id = new_entity_id("role");
        self.roles.insert(
            0,
            RoleTemplate { id: id.clone(), role: name.to_owned(), summary: "Custom role added to library.".to_owned() },
        );
        id
    }

    /// Add a person to the front of the catalogue and return their id.
    pub fn add_person(&mut self, name: &str) -> EntityId {
        let id = new_entity_id("person");
        let image_url = format!("https://i.pravatar.cc/150?u={id}");
        self.people.insert(0, PersonTemplate { id: id.clone(), name: name.to_owned(), image_url });
        id
    }

    /// Remove a role template. Returns false if it was not present.
    pub fn remove_role(&mut self, id: &str) -> bool {
        let before = self.roles.len();
        self.roles.retain(|r| r.id != id);
        self.roles.len() != before
    }

    /// Remove a person template. Returns false if it was not present.
    pub fn remove_person(&mut self, id: &str) -> bool {
        let before = self.people.len();
        self.people.retain(|p| p.id != id);
        self.people.len() != before
    }

    #[must_use]
    pub fn person(&self, id: &str) -> Option<&PersonTemplate> {
        self.people.iter().find(|p| p.id == id)
    }
}

/// The organization a canvas belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Organization {
    pub id: String,
    pub name: String,
}

impl Default for Organization {
    fn default() -> Self {
        Self { id: "o1".to_owned(), name: "Untitled Organization".to_owned() }
    }
}

/// In-memory store of cards and tracks, in draw order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocStore {
    cards: Vec<Card>,
    tracks: Vec<Track>,
}

impl DocStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Cards ---

    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    #[must_use]
    pub fn card(&self, id: &str) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == id)
    }

    pub fn card_mut(&mut self, id: &str) -> Option<&mut Card> {
        self.cards.iter_mut().find(|c| c.id == id)
    }

    /// Insert a card on top, replacing any existing card with the same id in place.
    pub fn insert_card(&mut self, card: Card) {
        match self.card_mut(&card.id) {
            Some(existing) => *existing = card,
            None => self.cards.push(card),
        }
    }

    /// Remove a card by id, returning it if it was present.
    ///
    /// The id is also pruned from every track's `contained_card_ids`.
    pub fn remove_card(&mut self, id: &str) -> Option<Card> {
        let index = self.cards.iter().position(|c| c.id == id)?;
        for track in &mut self.tracks {
            if let Some(ids) = track.contained_card_ids.as_mut() {
                ids.retain(|contained| contained != id);
            }
        }
        Some(self.cards.remove(index))
    }

    /// Replace every card wholesale.
    pub fn replace_cards(&mut self, cards: Vec<Card>) {
        self.cards = cards;
    }

    // --- Tracks ---

    #[must_use]
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    #[must_use]
    pub fn track(&self, id: &str) -> Option<&Track> {
        self.tracks.iter().find(|t| t.id == id)
    }

    pub fn track_mut(&mut self, id: &str) -> Option<&mut Track> {
        self.tracks.iter_mut().find(|t| t.id == id)
    }

    /// Insert a track on top, replacing any existing track with the same id in place.
    pub fn insert_track(&mut self, track: Track) {
        match self.track_mut(&track.id) {
            Some(existing) => *existing = track,
            None => self.tracks.push(track),
        }
    }

    /// Remove a track by id, returning it if it was present.
    pub fn remove_track(&mut self, id: &str) -> Option<Track> {
        let index = self.tracks.iter().position(|t| t.id == id)?;
        Some(self.tracks.remove(index))
    }

    /// Replace every track wholesale.
    pub fn replace_tracks(&mut self, tracks: Vec<Track>) {
        self.tracks = tracks;
    }

    // --- Either kind ---

    /// Which kind of entity `id` refers to, if it exists.
    #[must_use]
    pub fn kind_of(&self, id: &str) -> Option<EntityKind> {
        if self.card(id).is_some() {
            Some(EntityKind::Card)
        } else if self.track(id).is_some() {
            Some(EntityKind::Track)
        } else {
            None
        }
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.kind_of(id).is_some()
    }

    /// Top-left corner of a card or track.
    #[must_use]
    pub fn position_of(&self, id: &str) -> Option<Point> {
        self.card(id)
            .map(Card::position)
            .or_else(|| self.track(id).map(Track::position))
    }

    /// Move a card or track so its top-left corner is `pos`. Returns false if absent.
    pub fn set_position(&mut self, id: &str, pos: Point) -> bool {
        if let Some(card) = self.card_mut(id) {
            card.x = pos.x;
            card.y = pos.y;
            return true;
        }
        if let Some(track) = self.track_mut(id) {
            track.x = pos.x;
            track.y = pos.y;
            return true;
        }
        false
    }

    /// Remove a card or track by id, returning what was removed.
    pub fn remove(&mut self, id: &str) -> Option<EntityRef> {
        if self.remove_card(id).is_some() {
            return Some(EntityRef { id: id.to_owned(), kind: EntityKind::Card });
        }
        self.remove_track(id)
            .map(|_| EntityRef { id: id.to_owned(), kind: EntityKind::Track })
    }

    /// Total number of entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len() + self.tracks.len()
    }

    /// Returns `true` if the store contains no entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty() && self.tracks.is_empty()
    }
}
