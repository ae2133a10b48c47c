use super::*;
use crate::doc::{Card, CardSize, CardStatus};

// =============================================================
// Helpers
// =============================================================

fn card_at(id: &str, x: f64, y: f64) -> Card {
    Card {
        id: id.to_owned(),
        role: String::new(),
        summary: String::new(),
        x,
        y,
        size: CardSize::Large,
        status: CardStatus::Unassigned,
        assigned_person_id: None,
    }
}

fn track_at(id: &str, x: f64, y: f64, w: f64, h: f64) -> Track {
    Track { id: id.to_owned(), x, y, width: w, height: h, name: None, contained_card_ids: None }
}

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

// =============================================================
// ScreenRect / delete zone
// =============================================================

#[test]
fn rect_contains_is_inclusive_on_every_edge() {
    let r = ScreenRect::new(10.0, 20.0, 110.0, 70.0);
    assert!(r.contains(pt(10.0, 20.0)));
    assert!(r.contains(pt(110.0, 70.0)));
    assert!(r.contains(pt(10.0, 70.0)));
    assert!(r.contains(pt(60.0, 45.0)));
}

#[test]
fn rect_excludes_outside_points() {
    let r = ScreenRect::new(10.0, 20.0, 110.0, 70.0);
    assert!(!r.contains(pt(9.99, 45.0)));
    assert!(!r.contains(pt(110.01, 45.0)));
    assert!(!r.contains(pt(60.0, 19.99)));
    assert!(!r.contains(pt(60.0, 70.01)));
}

#[test]
fn no_delete_zone_is_never_hit() {
    assert!(!over_delete_zone(None, pt(0.0, 0.0)));
    let r = ScreenRect::new(0.0, 0.0, 1.0, 1.0);
    assert!(over_delete_zone(Some(&r), pt(0.5, 0.5)));
}

// =============================================================
// hit_test
// =============================================================

#[test]
fn empty_doc_hits_nothing() {
    assert!(hit_test(pt(10.0, 10.0), &DocStore::new(), &Transform::default()).is_none());
}

#[test]
fn card_body_is_hit() {
    let mut doc = DocStore::new();
    doc.insert_card(card_at("c", 100.0, 100.0));
    let hit = hit_test(pt(150.0, 150.0), &doc, &Transform::default());
    assert_eq!(hit, Some(Hit::Card("c".into())));
}

#[test]
fn topmost_card_wins() {
    let mut doc = DocStore::new();
    doc.insert_card(card_at("below", 0.0, 0.0));
    doc.insert_card(card_at("above", 20.0, 20.0));
    let hit = hit_test(pt(50.0, 50.0), &doc, &Transform::default());
    assert_eq!(hit, Some(Hit::Card("above".into())));
}

#[test]
fn card_beats_track_body() {
    let mut doc = DocStore::new();
    doc.insert_track(track_at("t", 0.0, 0.0, 600.0, 600.0));
    doc.insert_card(card_at("c", 100.0, 100.0));
    let hit = hit_test(pt(150.0, 150.0), &doc, &Transform::default());
    assert_eq!(hit, Some(Hit::Card("c".into())));
}

#[test]
fn track_body_is_hit_away_from_edges() {
    let mut doc = DocStore::new();
    doc.insert_track(track_at("t", 0.0, 0.0, 400.0, 400.0));
    let hit = hit_test(pt(200.0, 200.0), &doc, &Transform::default());
    assert_eq!(hit, Some(Hit::Track("t".into())));
}

#[test]
fn track_edges_are_resize_handles() {
    let mut doc = DocStore::new();
    doc.insert_track(track_at("t", 100.0, 100.0, 200.0, 200.0));
    let tf = Transform::default();
    assert_eq!(hit_test(pt(200.0, 103.0), &doc, &tf), Some(Hit::TrackEdge("t".into(), TrackEdge::Top)));
    assert_eq!(hit_test(pt(200.0, 297.0), &doc, &tf), Some(Hit::TrackEdge("t".into(), TrackEdge::Bottom)));
    assert_eq!(hit_test(pt(95.0, 200.0), &doc, &tf), Some(Hit::TrackEdge("t".into(), TrackEdge::Left)));
    assert_eq!(hit_test(pt(306.0, 200.0), &doc, &tf), Some(Hit::TrackEdge("t".into(), TrackEdge::Right)));
}

#[test]
fn edge_slop_is_screen_space() {
    let mut doc = DocStore::new();
    doc.insert_track(track_at("t", 0.0, 0.0, 200.0, 200.0));
    // At scale 2 the 8px slop is 4 world units; world x = 205 is 10px from the right edge.
    let tf = Transform { x: 0.0, y: 0.0, scale: 2.0 };
    assert_eq!(hit_test(pt(410.0, 200.0), &doc, &tf), None);
    assert_eq!(
        hit_test(pt(406.0, 200.0), &doc, &tf),
        Some(Hit::TrackEdge("t".into(), TrackEdge::Right))
    );
}

#[test]
fn hit_entity_reports_kind() {
    assert_eq!(Hit::Card("c".into()).entity(), Some(("c", EntityKind::Card)));
    assert_eq!(Hit::Track("t".into()).entity(), Some(("t", EntityKind::Track)));
    assert_eq!(Hit::TrackEdge("t".into(), TrackEdge::Left).entity(), None);
}
