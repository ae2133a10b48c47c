#![allow(clippy::float_cmp)]

use super::*;
use crate::doc::{CardSize, CardStatus};

// =============================================================
// Helpers
// =============================================================

fn card_at(id: &str, x: f64, y: f64) -> Card {
    Card {
        id: id.to_owned(),
        role: "Designer".to_owned(),
        summary: "Makes things".to_owned(),
        x,
        y,
        size: CardSize::Small,
        status: CardStatus::Suggested,
        assigned_person_id: Some("p1".to_owned()),
    }
}

fn track_at(id: &str, x: f64, y: f64) -> Track {
    Track {
        id: id.to_owned(),
        x,
        y,
        width: 300.0,
        height: 200.0,
        name: Some("Platform".to_owned()),
        contained_card_ids: Some(vec!["c1".to_owned()]),
    }
}

fn select(ids: &[&str]) -> Selection {
    let mut s = Selection::new();
    s.replace(ids.iter().map(|id| (*id).to_owned()));
    s
}

// =============================================================
// copy
// =============================================================

#[test]
fn copy_snapshots_selected_entities_by_type() {
    let mut doc = DocStore::new();
    doc.insert_card(card_at("c1", 0.0, 0.0));
    doc.insert_track(track_at("t1", 0.0, 0.0));
    doc.insert_card(card_at("c2", 0.0, 0.0));

    let mut clip = Clipboard::new();
    assert_eq!(clip.copy(&select(&["c1", "t1"]), &doc), 2);
    let kinds: Vec<_> = clip.items().iter().map(ClipboardItem::kind).collect();
    assert_eq!(kinds, [EntityKind::Card, EntityKind::Track]);
}

#[test]
fn copy_is_a_deep_snapshot() {
    let mut doc = DocStore::new();
    doc.insert_card(card_at("c1", 0.0, 0.0));
    let mut clip = Clipboard::new();
    clip.copy(&select(&["c1"]), &doc);

    doc.set_position("c1", crate::camera::Point::new(500.0, 500.0));
    assert_eq!(clip.items()[0], ClipboardItem::Card(card_at("c1", 0.0, 0.0)));
}

#[test]
fn copy_replaces_previous_contents() {
    let mut doc = DocStore::new();
    doc.insert_card(card_at("c1", 0.0, 0.0));
    doc.insert_card(card_at("c2", 0.0, 0.0));
    let mut clip = Clipboard::new();
    clip.copy(&select(&["c1"]), &doc);
    clip.copy(&select(&["c2"]), &doc);
    assert_eq!(clip.items().len(), 1);
    assert!(matches!(&clip.items()[0], ClipboardItem::Card(c) if c.id == "c2"));
}

#[test]
fn copy_with_empty_selection_keeps_clipboard() {
    let mut doc = DocStore::new();
    doc.insert_card(card_at("c1", 0.0, 0.0));
    let mut clip = Clipboard::new();
    clip.copy(&select(&["c1"]), &doc);
    assert_eq!(clip.copy(&Selection::new(), &doc), 0);
    assert_eq!(clip.items().len(), 1);
}

// =============================================================
// paste
// =============================================================

#[test]
fn paste_creates_identical_copy_offset_by_grid() {
    let mut doc = DocStore::new();
    doc.insert_card(card_at("c1", 100.0, 40.0));
    let mut clip = Clipboard::new();
    clip.copy(&select(&["c1"]), &doc);

    let ids = clip.paste(&mut doc);
    assert_eq!(ids.len(), 1);
    assert_ne!(ids[0], "c1");
    let pasted = doc.card(&ids[0]).unwrap().clone();
    let expected = Card { id: ids[0].clone(), x: 120.0, y: 60.0, ..card_at("c1", 0.0, 0.0) };
    assert_eq!(pasted, expected);
}

#[test]
fn paste_preserves_track_fields() {
    let mut doc = DocStore::new();
    doc.insert_track(track_at("t1", 0.0, 0.0));
    let mut clip = Clipboard::new();
    clip.copy(&select(&["t1"]), &doc);
    let ids = clip.paste(&mut doc);
    let pasted = doc.track(&ids[0]).unwrap();
    assert_eq!(pasted.name.as_deref(), Some("Platform"));
    assert_eq!(pasted.width, 300.0);
    assert_eq!(pasted.contained_card_ids, Some(vec!["c1".to_owned()]));
    assert_eq!((pasted.x, pasted.y), (20.0, 20.0));
}

#[test]
fn repeated_paste_chains_offsets() {
    let mut doc = DocStore::new();
    doc.insert_card(card_at("c1", 0.0, 0.0));
    let mut clip = Clipboard::new();
    clip.copy(&select(&["c1"]), &doc);

    let first = clip.paste(&mut doc);
    let second = clip.paste(&mut doc);
    assert_ne!(first[0], second[0]);
    let a = doc.card(&first[0]).unwrap();
    let b = doc.card(&second[0]).unwrap();
    assert_eq!((a.x, a.y), (20.0, 20.0));
    assert_eq!((b.x, b.y), (40.0, 40.0));
    assert_eq!(doc.cards().len(), 3);
}

#[test]
fn pasted_ids_carry_kind_prefix() {
    let mut doc = DocStore::new();
    doc.insert_card(card_at("c1", 0.0, 0.0));
    doc.insert_track(track_at("t1", 0.0, 0.0));
    let mut clip = Clipboard::new();
    clip.copy(&select(&["c1", "t1"]), &doc);

    let ids = clip.paste(&mut doc);
    assert!(ids[0].starts_with("card-"), "{}", ids[0]);
    assert!(ids[1].starts_with("track-"), "{}", ids[1]);
    let kinds: Vec<_> = clip.items().iter().map(ClipboardItem::kind).collect();
    assert_eq!(kinds, [EntityKind::Card, EntityKind::Track]);
}

#[test]
fn paste_empty_clipboard_is_noop() {
    let mut doc = DocStore::new();
    let mut clip = Clipboard::new();
    assert!(clip.paste(&mut doc).is_empty());
    assert!(doc.is_empty());
}
