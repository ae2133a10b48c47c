use std::collections::BTreeMap;
use std::mem;
use std::rc::Rc;

use tracing::{debug, info, warn};

use crate::backup::{BACKUP_VERSION, BackupDocument, BackupError, RestorePlan};
use crate::camera::{Point, Transform};
use crate::capture::{PointerCapture, PointerScope};
use crate::clipboard::{Clipboard, ClipboardItem};
use crate::consts::{
    BUTTON_ZOOM_STEP, GROUP_TRACK_NAME, TRACK_DRAW_FLOOR, TRACK_MIN_CREATE, TRACK_MIN_RESIZE, TRACK_PADDING,
    WHEEL_ZOOM_FACTOR,
};
use crate::doc::{
    Card, CardStatus, DocStore, EntityId, EntityKind, Library, Organization, RoleTemplate, Track, new_entity_id,
};
use crate::grid::snap_point;
use crate::hit::{self, Hit, ScreenRect, TrackEdge};
use crate::history::{History, HistoryStep};
use crate::input::{Button, Gesture, Key, Modifiers, Tool, TrackBounds, WheelDelta};
use crate::selection::Selection;
use crate::view::{CanvasView, GestureFlags, ViewSink};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Message shown when grouping is requested without any selected card.
pub const GROUP_NEEDS_CARDS: &str = "Please select cards to create a group.";

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    CardCreated(Card),
    CardUpdated(Card),
    TrackCreated(Track),
    TrackUpdated(Track),
    EntityDeleted { id: EntityId, kind: EntityKind },
    SelectionChanged(Vec<EntityId>),
    SetCursor(String),
    /// A user-facing message (the host decides how to show it).
    Notify(String),
    RenderNeeded,
}

/// Core engine state: the mutable editing session.
///
/// Every handler reads and writes this synchronously. Separated from
/// `Engine` so it can be tested without a view sink.
pub struct EngineCore {
    pub doc: DocStore,
    pub transform: Transform,
    pub selection: Selection,
    pub clipboard: Clipboard,
    pub history: History,
    pub library: Library,
    pub org: Organization,
    pub tool: Tool,
    pub gesture: Gesture,
    /// Screen-space bounds of the delete target, if the host shows one.
    pub delete_zone: Option<ScreenRect>,
    pub viewport_width: f64,
    pub viewport_height: f64,
    pointer_scope: Option<Rc<dyn PointerScope>>,
    capture: Option<PointerCapture>,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self {
            doc: DocStore::new(),
            transform: Transform::default(),
            selection: Selection::new(),
            clipboard: Clipboard::new(),
            history: History::new(),
            library: Library::starter(),
            org: Organization::default(),
            tool: Tool::default(),
            gesture: Gesture::Idle,
            delete_zone: None,
            viewport_width: 0.0,
            viewport_height: 0.0,
            pointer_scope: None,
            capture: None,
        }
    }
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Host wiring ---

    /// Set the active tool.
    pub fn set_tool(&mut self, tool: Tool) {
        self.tool = tool;
    }

    /// Update viewport dimensions in screen pixels.
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.viewport_width = width;
        self.viewport_height = height;
    }

    pub fn set_delete_zone(&mut self, zone: Option<ScreenRect>) {
        self.delete_zone = zone;
    }

    /// Register the scope acquired for the lifetime of every gesture.
    pub fn set_pointer_scope(&mut self, scope: Rc<dyn PointerScope>) {
        self.pointer_scope = Some(scope);
    }

    /// Whether a pointer capture guard is currently held.
    #[must_use]
    pub fn is_capturing(&self) -> bool {
        self.capture.is_some()
    }

    // --- Pointer input ---

    /// Pointer-down at `screen_pt`. Hit-tests the store when the select tool is active.
    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        let target = match self.tool {
            Tool::Select => hit::hit_test(screen_pt, &self.doc, &self.transform),
            Tool::Pan | Tool::Track => None,
        };
        self.pointer_down_on(target, screen_pt, button, modifiers)
    }

    /// Pointer-down with a target the host has already resolved (`None` is the background).
    pub fn pointer_down_on(
        &mut self,
        target: Option<Hit>,
        screen_pt: Point,
        button: Button,
        modifiers: Modifiers,
    ) -> Vec<Action> {
        if !self.gesture.is_idle() || button == Button::Secondary {
            return Vec::new();
        }
        if button == Button::Middle || self.tool == Tool::Pan {
            return self.start_pan(screen_pt);
        }
        if self.history.is_presenting() {
            return Vec::new();
        }
        if self.tool == Tool::Track {
            return self.start_track_creation(screen_pt);
        }
        let Some(hit) = target else {
            return self.clear_selection();
        };
        if let Hit::TrackEdge(id, edge) = &hit {
            return self.start_resize(id, *edge);
        }
        match hit.entity() {
            Some((id, kind)) => self.start_entity_drag(id, kind, screen_pt, modifiers),
            None => Vec::new(),
        }
    }

    pub fn on_pointer_move(&mut self, screen_pt: Point, _modifiers: Modifiers) -> Vec<Action> {
        let scale = self.transform.scale;
        match &mut self.gesture {
            Gesture::Idle => return Vec::new(),
            Gesture::Panning { last_screen } => {
                let delta = screen_pt - *last_screen;
                self.transform.pan_by(delta.x, delta.y);
                *last_screen = screen_pt;
            }
            Gesture::CreatingTrack { id, anchor } => {
                let corner = snap_point(self.transform.to_world(screen_pt));
                if let Some(track) = self.doc.track_mut(id) {
                    stretch_track(track, *anchor, corner);
                }
            }
            Gesture::ResizingTrack { id, edge, .. } => {
                let edge_pt = snap_point(self.transform.to_world(screen_pt));
                if let Some(track) = self.doc.track_mut(id) {
                    resize_edge(track, *edge, edge_pt);
                }
            }
            Gesture::DraggingEntities { leader, start_offset, initial_positions, over_delete_zone, .. } => {
                let target = snap_point(screen_pt / scale - *start_offset);
                if let Some(origin) = initial_positions.get(leader.as_str()) {
                    let delta = target - *origin;
                    for (id, start) in initial_positions.iter() {
                        self.doc.set_position(id, *start + delta);
                    }
                }
                *over_delete_zone = hit::over_delete_zone(self.delete_zone.as_ref(), screen_pt);
            }
            Gesture::DraggingExternalNew { ghost, start_offset, over_delete_zone } => {
                let target = snap_point(screen_pt / scale - *start_offset);
                ghost.x = target.x;
                ghost.y = target.y;
                *over_delete_zone = hit::over_delete_zone(self.delete_zone.as_ref(), screen_pt);
            }
        }
        vec![Action::RenderNeeded]
    }

    /// Finalize the active gesture and return to idle.
    pub fn on_pointer_up(&mut self, _screen_pt: Point, _button: Button, _modifiers: Modifiers) -> Vec<Action> {
        let mut actions = match self.end_gesture() {
            Gesture::Idle => return Vec::new(),
            Gesture::Panning { .. } => Vec::new(),
            Gesture::CreatingTrack { id, .. } => self.finish_track_creation(&id),
            Gesture::ResizingTrack { id, .. } => self.doc.track(&id).cloned().map(Action::TrackUpdated).into_iter().collect(),
            Gesture::DraggingEntities { leader, kind, initial_positions, over_delete_zone, .. } => {
                if over_delete_zone {
                    self.drop_on_delete_zone(&leader, kind, initial_positions)
                } else {
                    self.entity_updates(initial_positions.keys())
                }
            }
            Gesture::DraggingExternalNew { ghost, over_delete_zone, .. } => {
                if over_delete_zone {
                    debug!(role = %ghost.role, "template drag dropped on delete zone");
                    Vec::new()
                } else {
                    self.insert_selected_card(ghost)
                }
            }
        };
        actions.push(Action::SetCursor(tool_cursor(self.tool).to_owned()));
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Abort the active gesture, rolling back everything it changed.
    pub fn cancel_gesture(&mut self) -> Vec<Action> {
        match self.end_gesture() {
            Gesture::Idle => return Vec::new(),
            Gesture::Panning { .. } | Gesture::DraggingExternalNew { .. } => {}
            Gesture::DraggingEntities { initial_positions, .. } => {
                for (id, start) in &initial_positions {
                    self.doc.set_position(id, *start);
                }
            }
            Gesture::ResizingTrack { id, original, .. } => {
                if let Some(track) = self.doc.track_mut(&id) {
                    original.apply_to(track);
                }
            }
            Gesture::CreatingTrack { id, .. } => {
                self.doc.remove_track(&id);
            }
        }
        vec![Action::SetCursor(tool_cursor(self.tool).to_owned()), Action::RenderNeeded]
    }

    /// Wheel: Ctrl/Cmd zooms about the pointer, otherwise pans like a trackpad.
    pub fn on_wheel(&mut self, screen_pt: Point, delta: WheelDelta, modifiers: Modifiers) -> Vec<Action> {
        if !matches!(self.gesture, Gesture::Idle | Gesture::Panning { .. }) {
            return Vec::new();
        }
        if modifiers.command() {
            if !self.transform.zoom_about(-delta.dy * WHEEL_ZOOM_FACTOR, screen_pt) {
                return Vec::new();
            }
        } else {
            self.transform.pan_by(-delta.dx, -delta.dy);
        }
        vec![Action::RenderNeeded]
    }

    // --- Keyboard input ---

    pub fn on_key_down(&mut self, key: Key, modifiers: Modifiers) -> Vec<Action> {
        let name = key.0.as_str();
        if name == "Escape" {
            return if !self.gesture.is_idle() {
                self.cancel_gesture()
            } else if self.history.is_presenting() {
                self.exit_present()
            } else {
                self.clear_selection()
            };
        }
        if self.history.is_presenting() {
            return match name {
                "ArrowRight" | "PageDown" | " " => self.next_step(),
                "ArrowLeft" | "PageUp" => self.prev_step(),
                _ => Vec::new(),
            };
        }
        if !self.gesture.is_idle() {
            return Vec::new();
        }
        match name {
            "Delete" | "Backspace" => self.delete_selection(),
            _ if modifiers.command() && key.is_letter('c') => {
                self.copy();
                Vec::new()
            }
            _ if modifiers.command() && key.is_letter('v') => self.paste(),
            _ if modifiers.command() && key.is_letter('g') => self.group_selection(),
            _ => Vec::new(),
        }
    }

    // --- Viewport ---

    pub fn zoom_in(&mut self) -> Vec<Action> {
        self.zoom_about_center(BUTTON_ZOOM_STEP)
    }

    pub fn zoom_out(&mut self) -> Vec<Action> {
        self.zoom_about_center(-BUTTON_ZOOM_STEP)
    }

    /// Back to no pan and 100% zoom.
    pub fn reset_view(&mut self) -> Vec<Action> {
        self.transform = Transform::default();
        vec![Action::RenderNeeded]
    }

    fn zoom_about_center(&mut self, delta: f64) -> Vec<Action> {
        let center = Point::new(self.viewport_width / 2.0, self.viewport_height / 2.0);
        if self.transform.zoom_about(delta, center) { vec![Action::RenderNeeded] } else { Vec::new() }
    }

    // --- Templates ---

    /// Drop a role template at `screen_pt`: a new card on the grid, selected alone.
    pub fn drop_template(&mut self, template: &RoleTemplate, screen_pt: Point) -> Vec<Action> {
        if !self.is_editable() {
            return Vec::new();
        }
        let card = Card::from_template(template, snap_point(self.transform.to_world(screen_pt)));
        debug!(id = %card.id, template = %template.id, "template dropped");
        let mut actions = self.insert_selected_card(card);
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Start dragging a template in from the library.
    ///
    /// `item_origin` is the screen position of the library item's top-left
    /// corner, where the ghost card starts; `pointer` is where it was grabbed.
    pub fn start_template_drag(&mut self, template: &RoleTemplate, item_origin: Point, pointer: Point) -> Vec<Action> {
        if !self.is_editable() {
            return Vec::new();
        }
        let ghost = Card::from_template(template, self.transform.to_world(item_origin));
        let start_offset = pointer / self.transform.scale - ghost.position();
        self.begin(Gesture::DraggingExternalNew { ghost, start_offset, over_delete_zone: false });
        vec![Action::SetCursor("grabbing".to_owned()), Action::RenderNeeded]
    }

    // --- Editing ---

    /// Copy the selection. Returns how many entities were copied.
    pub fn copy(&mut self) -> usize {
        let copied = self.clipboard.copy(&self.selection, &self.doc);
        debug!(copied, "copied selection");
        copied
    }

    /// Paste the clipboard one grid unit down-right and select the copies.
    pub fn paste(&mut self) -> Vec<Action> {
        if !self.is_editable() || self.clipboard.is_empty() {
            return Vec::new();
        }
        let ids = self.clipboard.paste(&mut self.doc);
        let mut actions: Vec<Action> = self
            .clipboard
            .items()
            .iter()
            .map(|item| match item {
                ClipboardItem::Card(card) => Action::CardCreated(card.clone()),
                ClipboardItem::Track(track) => Action::TrackCreated(track.clone()),
            })
            .collect();
        debug!(count = ids.len(), "pasted clipboard");
        self.selection.replace(ids);
        actions.push(Action::SelectionChanged(self.selection.to_vec()));
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Delete every selected entity.
    pub fn delete_selection(&mut self) -> Vec<Action> {
        if !self.is_editable() || self.selection.is_empty() {
            return Vec::new();
        }
        let mut actions = self.remove_entities(&self.selection.to_vec());
        self.selection.clear();
        actions.push(Action::SelectionChanged(Vec::new()));
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Wrap the selected cards in a padded track named "Group".
    pub fn group_selection(&mut self) -> Vec<Action> {
        if !self.is_editable() {
            return Vec::new();
        }
        self.tool = Tool::Select;
        let cursor = Action::SetCursor(tool_cursor(self.tool).to_owned());
        let Some(track) = group_track(&self.doc, &self.selection) else {
            return vec![Action::Notify(GROUP_NEEDS_CARDS.to_owned()), cursor];
        };
        info!(id = %track.id, cards = track.contained_card_ids.as_ref().map_or(0, Vec::len), "grouped selection");
        self.selection.replace([track.id.clone()]);
        self.doc.insert_track(track.clone());
        vec![
            Action::TrackCreated(track),
            Action::SelectionChanged(self.selection.to_vec()),
            cursor,
            Action::RenderNeeded,
        ]
    }

    /// Remove a track, leaving its cards in place.
    pub fn ungroup_track(&mut self, id: &str) -> Vec<Action> {
        if !self.is_editable() || self.doc.remove_track(id).is_none() {
            return Vec::new();
        }
        let mut actions = vec![Action::EntityDeleted { id: id.to_owned(), kind: EntityKind::Track }];
        if self.selection.remove(id) {
            actions.push(Action::SelectionChanged(self.selection.to_vec()));
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Propose a person from the library for a card.
    pub fn assign_person(&mut self, card_id: &str, person_id: &str) -> Vec<Action> {
        if self.library.person(person_id).is_none() {
            return Vec::new();
        }
        self.update_card(card_id, |card| {
            card.assigned_person_id = Some(person_id.to_owned());
            card.status = CardStatus::Suggested;
            true
        })
    }

    /// Confirm a proposed assignment. No-op without an assigned person.
    pub fn approve_assignment(&mut self, card_id: &str) -> Vec<Action> {
        self.update_card(card_id, |card| {
            if card.assigned_person_id.is_none() {
                return false;
            }
            card.status = CardStatus::Assigned;
            true
        })
    }

    pub fn clear_assignment(&mut self, card_id: &str) -> Vec<Action> {
        self.update_card(card_id, |card| {
            card.assigned_person_id = None;
            card.status = CardStatus::Unassigned;
            true
        })
    }

    pub fn toggle_card_size(&mut self, card_id: &str) -> Vec<Action> {
        self.update_card(card_id, |card| {
            card.size = card.size.toggled();
            true
        })
    }

    pub fn rename_track(&mut self, track_id: &str, name: &str) -> Vec<Action> {
        if self.history.is_presenting() {
            return Vec::new();
        }
        let Some(track) = self.doc.track_mut(track_id) else {
            return Vec::new();
        };
        track.name = Some(name.to_owned());
        vec![Action::TrackUpdated(track.clone()), Action::RenderNeeded]
    }

    // --- Library & organization ---

    /// Add a custom role template. Blank names are ignored.
    pub fn add_role_template(&mut self, name: &str) -> Option<EntityId> {
        let name = name.trim();
        (!name.is_empty()).then(|| self.library.add_role(name))
    }

    /// Add a person template. Blank names are ignored.
    pub fn add_person_template(&mut self, name: &str) -> Option<EntityId> {
        let name = name.trim();
        (!name.is_empty()).then(|| self.library.add_person(name))
    }

    pub fn remove_role_template(&mut self, id: &str) -> bool {
        self.library.remove_role(id)
    }

    pub fn remove_person_template(&mut self, id: &str) -> bool {
        self.library.remove_person(id)
    }

    pub fn set_org_name(&mut self, name: &str) {
        name.clone_into(&mut self.org.name);
    }

    // --- History ---

    /// Record the current canvas as a new history step.
    pub fn capture_step(&mut self) -> Vec<Action> {
        if !self.is_editable() {
            return Vec::new();
        }
        let timestamp = self.history.capture(&self.doc, self.transform).timestamp;
        info!(steps = self.history.len(), timestamp, "captured history step");
        vec![Action::RenderNeeded]
    }

    /// Throw away every step and start over from the current canvas.
    pub fn reset_recording(&mut self) -> Vec<Action> {
        if !self.is_editable() {
            return Vec::new();
        }
        self.history.reset(&self.doc, self.transform);
        info!("history reset");
        vec![Action::RenderNeeded]
    }

    /// Replace the canvas with step `index`.
    pub fn restore_step(&mut self, index: usize) -> Vec<Action> {
        if !self.gesture.is_idle() {
            return Vec::new();
        }
        let Some(step) = self.history.restore(index).cloned() else {
            return Vec::new();
        };
        self.apply_step(step)
    }

    pub fn next_step(&mut self) -> Vec<Action> {
        if !self.gesture.is_idle() {
            return Vec::new();
        }
        let Some(step) = self.history.next().cloned() else {
            return Vec::new();
        };
        self.apply_step(step)
    }

    pub fn prev_step(&mut self) -> Vec<Action> {
        if !self.gesture.is_idle() {
            return Vec::new();
        }
        let Some(step) = self.history.prev().cloned() else {
            return Vec::new();
        };
        self.apply_step(step)
    }

    /// Start playback from the first step. Any gesture in progress is cancelled.
    pub fn enter_present(&mut self) -> Vec<Action> {
        if self.history.is_presenting() {
            return Vec::new();
        }
        let mut actions = self.cancel_gesture();
        let step = self.history.enter_present().cloned();
        info!(steps = self.history.len(), "entering present mode");
        match step {
            Some(step) => actions.extend(self.apply_step(step)),
            None => actions.push(Action::RenderNeeded),
        }
        actions
    }

    /// Leave playback on the most recent step.
    pub fn exit_present(&mut self) -> Vec<Action> {
        if !self.history.is_presenting() {
            return Vec::new();
        }
        let mut actions = self.cancel_gesture();
        let step = self.history.exit_present().cloned();
        info!(index = self.history.current_index(), "leaving present mode");
        match step {
            Some(step) => actions.extend(self.apply_step(step)),
            None => actions.push(Action::RenderNeeded),
        }
        actions
    }

    // --- Backup ---

    /// Snapshot everything a backup file holds.
    ///
    /// # Errors
    ///
    /// Returns [`BackupError::Timestamp`] if the current time cannot be formatted.
    pub fn backup(&self) -> Result<BackupDocument, BackupError> {
        Ok(BackupDocument {
            version: BACKUP_VERSION,
            timestamp: BackupDocument::now_timestamp()?,
            org_id: self.org.id.clone(),
            org_name: self.org.name.clone(),
            cards: self.doc.cards().to_vec(),
            tracks: self.doc.tracks().to_vec(),
            role_templates: self.library.roles.clone(),
            people_templates: self.library.people.clone(),
            transform: self.transform,
            history_steps: self.history.steps().to_vec(),
        })
    }

    /// [`Self::backup`] as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Propagates timestamp and serialization failures.
    pub fn backup_json(&self) -> Result<String, BackupError> {
        let doc = self.backup()?;
        info!(cards = doc.cards.len(), tracks = doc.tracks.len(), steps = doc.history_steps.len(), "backup written");
        doc.to_json()
    }

    /// Restore from backup text. Nothing changes unless the whole document is valid.
    ///
    /// # Errors
    ///
    /// [`BackupError::GestureActive`] while a gesture is in progress, or the
    /// parse/validation errors of [`RestorePlan::parse`].
    pub fn restore_backup(&mut self, text: &str) -> Result<Vec<Action>, BackupError> {
        if !self.gesture.is_idle() {
            warn!(gesture = self.gesture.name(), "restore rejected during gesture");
            return Err(BackupError::GestureActive(self.gesture.name()));
        }
        let plan = RestorePlan::parse(text).inspect_err(|e| warn!(error = %e, "restore rejected"))?;
        if let Some(version) = plan.unexpected_version() {
            warn!(version, expected = BACKUP_VERSION, "restoring backup with unexpected version");
        }

        if let Some(name) = plan.org_name {
            self.org.name = name;
        }
        info!(cards = plan.cards.len(), tracks = plan.tracks.len(), "restoring backup");
        self.doc.replace_cards(plan.cards);
        self.doc.replace_tracks(plan.tracks);
        if let Some(roles) = plan.role_templates {
            self.library.roles = roles;
        }
        if let Some(people) = plan.people_templates {
            self.library.people = people;
        }
        if let Some(transform) = plan.transform {
            self.transform = transform.clamped();
        }
        if let Some(steps) = plan.history_steps {
            self.history.replace(steps);
        }

        let mut actions = Vec::new();
        if self.selection.retain_existing(&self.doc) {
            actions.push(Action::SelectionChanged(self.selection.to_vec()));
        }
        actions.push(Action::RenderNeeded);
        Ok(actions)
    }

    // --- Queries ---

    /// Project the session for the renderer.
    #[must_use]
    pub fn view(&self) -> CanvasView {
        let ghost = match &self.gesture {
            Gesture::DraggingExternalNew { ghost, .. } => Some(ghost.clone()),
            _ => None,
        };
        CanvasView {
            cards: self.doc.cards().to_vec(),
            tracks: self.doc.tracks().to_vec(),
            ghost,
            selection: self.selection.to_vec(),
            gesture: GestureFlags::of(&self.gesture),
            transform: self.transform,
            tool: self.tool,
            presenting: self.history.is_presenting(),
            step_index: self.history.current_index(),
            step_count: self.history.len(),
        }
    }

    #[must_use]
    pub fn is_presenting(&self) -> bool {
        self.history.is_presenting()
    }

    #[must_use]
    pub fn card(&self, id: &str) -> Option<&Card> {
        self.doc.card(id)
    }

    #[must_use]
    pub fn track(&self, id: &str) -> Option<&Track> {
        self.doc.track(id)
    }

    // --- Internals ---

    /// Structural edits need an idle, non-presenting session.
    fn is_editable(&self) -> bool {
        self.gesture.is_idle() && !self.history.is_presenting()
    }

    fn begin(&mut self, gesture: Gesture) {
        debug!(gesture = gesture.name(), "gesture started");
        if let Some(scope) = &self.pointer_scope {
            self.capture = Some(PointerCapture::acquire(scope));
        }
        self.gesture = gesture;
    }

    fn end_gesture(&mut self) -> Gesture {
        self.capture = None;
        let gesture = mem::take(&mut self.gesture);
        if !gesture.is_idle() {
            debug!(gesture = gesture.name(), "gesture ended");
        }
        gesture
    }

    fn start_pan(&mut self, screen_pt: Point) -> Vec<Action> {
        self.begin(Gesture::Panning { last_screen: screen_pt });
        vec![Action::SetCursor("grabbing".to_owned())]
    }

    fn start_track_creation(&mut self, screen_pt: Point) -> Vec<Action> {
        let anchor = snap_point(self.transform.to_world(screen_pt));
        let track = Track::empty_at(anchor);
        let id = track.id.clone();
        self.doc.insert_track(track);
        self.begin(Gesture::CreatingTrack { id, anchor });
        vec![Action::RenderNeeded]
    }

    fn start_resize(&mut self, id: &str, edge: TrackEdge) -> Vec<Action> {
        let Some(track) = self.doc.track(id) else {
            return Vec::new();
        };
        let original = TrackBounds::of(track);
        self.begin(Gesture::ResizingTrack { id: id.to_owned(), edge, original });
        vec![Action::SetCursor(edge_cursor(edge).to_owned())]
    }

    fn start_entity_drag(&mut self, id: &str, kind: EntityKind, screen_pt: Point, modifiers: Modifiers) -> Vec<Action> {
        let Some(position) = self.doc.position_of(id) else {
            return Vec::new();
        };
        let outcome = self.selection.click(id, modifiers.command());
        let mut actions = Vec::new();
        if outcome.changed() {
            actions.push(Action::SelectionChanged(self.selection.to_vec()));
        }
        if !outcome.allows_drag() {
            actions.push(Action::RenderNeeded);
            return actions;
        }

        let start_offset = screen_pt / self.transform.scale - position;
        let initial_positions: BTreeMap<EntityId, Point> = self
            .selection
            .iter()
            .filter_map(|sid| self.doc.position_of(sid).map(|p| (sid.clone(), p)))
            .collect();
        self.begin(Gesture::DraggingEntities {
            leader: id.to_owned(),
            kind,
            start_offset,
            initial_positions,
            over_delete_zone: false,
        });
        actions.push(Action::SetCursor("grabbing".to_owned()));
        actions.push(Action::RenderNeeded);
        actions
    }

    fn finish_track_creation(&mut self, id: &str) -> Vec<Action> {
        let Some(track) = self.doc.track(id) else {
            return Vec::new();
        };
        if track.width < TRACK_MIN_CREATE || track.height < TRACK_MIN_CREATE {
            debug!(%id, width = track.width, height = track.height, "discarding undersized track");
            self.doc.remove_track(id);
            return Vec::new();
        }
        info!(%id, width = track.width, height = track.height, "track created");
        vec![Action::TrackCreated(track.clone())]
    }

    /// Delete-zone drop: a card leader takes every dragged entity with it, a track leader only itself.
    fn drop_on_delete_zone(
        &mut self,
        leader: &str,
        kind: EntityKind,
        initial_positions: BTreeMap<EntityId, Point>,
    ) -> Vec<Action> {
        let mut actions = match kind {
            EntityKind::Card => {
                let ids: Vec<EntityId> = initial_positions.into_keys().collect();
                let actions = self.remove_entities(&ids);
                self.selection.clear();
                actions
            }
            EntityKind::Track => {
                let actions = self.remove_entities(&[leader.to_owned()]);
                self.selection.remove(leader);
                actions
            }
        };
        self.selection.retain_existing(&self.doc);
        info!(deleted = actions.len(), leader, "dropped on delete zone");
        actions.push(Action::SelectionChanged(self.selection.to_vec()));
        actions
    }

    fn remove_entities(&mut self, ids: &[EntityId]) -> Vec<Action> {
        ids.iter()
            .filter_map(|id| self.doc.remove(id))
            .map(|removed| Action::EntityDeleted { id: removed.id, kind: removed.kind })
            .collect()
    }

    fn entity_updates<'a>(&self, ids: impl Iterator<Item = &'a EntityId>) -> Vec<Action> {
        ids.filter_map(|id| {
            self.doc
                .card(id)
                .cloned()
                .map(Action::CardUpdated)
                .or_else(|| self.doc.track(id).cloned().map(Action::TrackUpdated))
        })
        .collect()
    }

    fn insert_selected_card(&mut self, card: Card) -> Vec<Action> {
        let id = card.id.clone();
        self.doc.insert_card(card.clone());
        self.selection.replace([id]);
        vec![Action::CardCreated(card), Action::SelectionChanged(self.selection.to_vec())]
    }

    fn clear_selection(&mut self) -> Vec<Action> {
        if self.selection.clear() {
            vec![Action::SelectionChanged(Vec::new()), Action::RenderNeeded]
        } else {
            Vec::new()
        }
    }

    fn update_card<F>(&mut self, id: &str, edit: F) -> Vec<Action>
    where
        F: FnOnce(&mut Card) -> bool,
    {
        if self.history.is_presenting() {
            return Vec::new();
        }
        let Some(card) = self.doc.card_mut(id) else {
            return Vec::new();
        };
        if !edit(card) {
            return Vec::new();
        }
        vec![Action::CardUpdated(card.clone()), Action::RenderNeeded]
    }

    /// Overwrite the canvas with a history step.
    fn apply_step(&mut self, step: HistoryStep) -> Vec<Action> {
        self.doc.replace_cards(step.cards);
        self.doc.replace_tracks(step.tracks);
        self.transform = step.transform.clamped();
        debug!(index = self.history.current_index(), "history step applied");
        let mut actions = Vec::new();
        if self.selection.retain_existing(&self.doc) {
            actions.push(Action::SelectionChanged(self.selection.to_vec()));
        }
        actions.push(Action::RenderNeeded);
        actions
    }
}

/// Cursor shown while idle with `tool` active.
fn tool_cursor(tool: Tool) -> &'static str {
    match tool {
        Tool::Select => "default",
        Tool::Pan => "grab",
        Tool::Track => "crosshair",
    }
}

fn edge_cursor(edge: TrackEdge) -> &'static str {
    match edge {
        TrackEdge::Top | TrackEdge::Bottom => "ns-resize",
        TrackEdge::Left | TrackEdge::Right => "ew-resize",
    }
}

/// Span `track` between `anchor` and `corner`, floored so it stays visible.
fn stretch_track(track: &mut Track, anchor: Point, corner: Point) {
    track.x = anchor.x.min(corner.x);
    track.y = anchor.y.min(corner.y);
    track.width = (corner.x - anchor.x).abs().max(TRACK_DRAW_FLOOR);
    track.height = (corner.y - anchor.y).abs().max(TRACK_DRAW_FLOOR);
}

/// Move one edge of `track` to the snapped point `to`, keeping the opposite edge fixed.
///
/// Moves that would leave the dimension under [`TRACK_MIN_RESIZE`] are
/// ignored, except that an already undersized track is grown to the minimum.
fn resize_edge(track: &mut Track, edge: TrackEdge, to: Point) {
    match edge {
        TrackEdge::Right => track.width = (to.x - track.x).max(TRACK_MIN_RESIZE),
        TrackEdge::Bottom => track.height = (to.y - track.y).max(TRACK_MIN_RESIZE),
        TrackEdge::Left => {
            let (start, size) = shift_leading_edge(track.x, track.width, to.x);
            track.x = start;
            track.width = size;
        }
        TrackEdge::Top => {
            let (start, size) = shift_leading_edge(track.y, track.height, to.y);
            track.y = start;
            track.height = size;
        }
    }
}

/// New `(start, size)` when the leading edge of the span `start..start + size` moves to `to`.
///
/// A span already below the minimum only changes when the edge moves outward,
/// and then grows straight to the minimum with its far end fixed.
fn shift_leading_edge(start: f64, size: f64, to: f64) -> (f64, f64) {
    let end = start + size;
    let new_size = size + (start - to);
    if new_size >= TRACK_MIN_RESIZE {
        (to, new_size)
    } else if size < TRACK_MIN_RESIZE && to < start {
        (end - TRACK_MIN_RESIZE, TRACK_MIN_RESIZE)
    } else {
        (start, size)
    }
}

/// Bounding track around the selected cards, or `None` when no card is selected.
fn group_track(doc: &DocStore, selection: &Selection) -> Option<Track> {
    let cards: Vec<&Card> = doc.cards().iter().filter(|c| selection.contains(&c.id)).collect();
    if cards.is_empty() {
        return None;
    }
    let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
    let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
    for card in &cards {
        let (w, h) = card.dimensions();
        min_x = min_x.min(card.x);
        min_y = min_y.min(card.y);
        max_x = max_x.max(card.x + w);
        max_y = max_y.max(card.y + h);
    }
    Some(Track {
        id: new_entity_id(EntityKind::Track.id_prefix()),
        x: min_x - TRACK_PADDING,
        y: min_y - TRACK_PADDING,
        width: max_x - min_x + TRACK_PADDING * 2.0,
        height: max_y - min_y + TRACK_PADDING * 2.0,
        name: Some(GROUP_TRACK_NAME.to_owned()),
        contained_card_ids: Some(cards.iter().map(|c| c.id.clone()).collect()),
    })
}

/// The full canvas engine. Wraps `EngineCore` and pushes a fresh view to the
/// host's sink whenever a handler asks for a render.
pub struct Engine {
    sink: Box<dyn ViewSink>,
    pub core: EngineCore,
}

impl Engine {
    /// Create a new engine rendering into `sink`.
    #[must_use]
    pub fn new(sink: Box<dyn ViewSink>) -> Self {
        Self { sink, core: EngineCore::new() }
    }

    /// Run `op` against the core, rendering if it asks to.
    pub fn apply<F>(&mut self, op: F) -> Vec<Action>
    where
        F: FnOnce(&mut EngineCore) -> Vec<Action>,
    {
        let actions = op(&mut self.core);
        if actions.iter().any(|a| matches!(a, Action::RenderNeeded)) {
            self.render();
        }
        actions
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        self.apply(|core| core.on_pointer_down(screen_pt, button, modifiers))
    }

    pub fn on_pointer_move(&mut self, screen_pt: Point, modifiers: Modifiers) -> Vec<Action> {
        self.apply(|core| core.on_pointer_move(screen_pt, modifiers))
    }

    pub fn on_pointer_up(&mut self, screen_pt: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        self.apply(|core| core.on_pointer_up(screen_pt, button, modifiers))
    }

    pub fn on_wheel(&mut self, screen_pt: Point, delta: WheelDelta, modifiers: Modifiers) -> Vec<Action> {
        self.apply(|core| core.on_wheel(screen_pt, delta, modifiers))
    }

    pub fn on_key_down(&mut self, key: Key, modifiers: Modifiers) -> Vec<Action> {
        self.apply(|core| core.on_key_down(key, modifiers))
    }

    /// Restore a backup and render the result.
    ///
    /// # Errors
    ///
    /// See [`EngineCore::restore_backup`].
    pub fn restore_backup(&mut self, text: &str) -> Result<Vec<Action>, BackupError> {
        let actions = self.core.restore_backup(text)?;
        self.render();
        Ok(actions)
    }

    // --- Render ---

    /// Push the current view to the sink.
    pub fn render(&mut self) {
        self.sink.present(&self.core.view());
    }
}
