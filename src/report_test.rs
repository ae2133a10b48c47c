use canvas::camera::Point;
use canvas::doc::{Card, Library, RoleTemplate, Track};

use super::*;

// =============================================================
// Helpers
// =============================================================

fn card(status: CardStatus) -> Card {
    let template = RoleTemplate { id: "r1".into(), role: "Engineer".into(), summary: String::new() };
    Card { status, ..Card::from_template(&template, Point::new(0.0, 0.0)) }
}

fn sample_core() -> EngineCore {
    let mut core = EngineCore::new();
    core.set_org_name("Acme");
    for status in [CardStatus::Unassigned, CardStatus::Unassigned, CardStatus::Suggested, CardStatus::Assigned] {
        core.doc.insert_card(card(status));
    }
    core.doc.insert_track(Track::empty_at(Point::new(0.0, 0.0)));
    let mut group = Track::empty_at(Point::new(400.0, 0.0));
    group.contained_card_ids = Some(Vec::new());
    core.doc.insert_track(group);
    core.transform = Transform { x: 12.4, y: -7.6, scale: 1.25 };
    core
}

// =============================================================
// Summary
// =============================================================

#[test]
fn summary_counts_cards_by_status() {
    let summary = Summary::of(&sample_core());
    assert_eq!(summary.cards, 4);
    assert_eq!(summary.status, StatusCounts { unassigned: 2, suggested: 1, assigned: 1 });
    assert_eq!(summary.tracks, 2);
    assert_eq!(summary.groups, 1);
}

#[test]
fn summary_reports_library_and_history() {
    let mut core = sample_core();
    core.capture_step();
    let summary = Summary::of(&core);
    let starter = Library::starter();
    assert_eq!(summary.role_templates, starter.roles.len());
    assert_eq!(summary.people_templates, starter.people.len());
    assert_eq!(summary.history_steps, 1);
    assert_eq!(summary.org_name, "Acme");
}

#[test]
fn summary_display_is_line_per_fact() {
    let text = Summary::of(&sample_core()).to_string();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 6);
    assert_eq!(lines[0], "organization: Acme");
    assert!(lines[1].contains("4 (2 unassigned, 1 suggested, 1 assigned)"));
    assert!(lines[4].ends_with("pan (12, -8) at 125%"));
    assert!(lines[5].ends_with("0 steps"));
}

#[test]
fn summary_json_is_camel_case() {
    let value = serde_json::to_value(Summary::of(&sample_core())).unwrap();
    assert_eq!(value["orgName"], "Acme");
    assert_eq!(value["status"]["suggested"], 1);
    assert_eq!(value["historySteps"], 0);
    assert!(value.get("roleTemplates").is_some());
}

// =============================================================
// StepLine
// =============================================================

#[test]
fn step_line_is_one_based() {
    let mut core = sample_core();
    core.capture_step();
    core.capture_step();
    core.enter_present();
    let line = StepLine::of(&core.view());
    assert_eq!(line.position, 1);
    assert_eq!(line.count, 2);
    assert_eq!(line.to_string(), "step 1/2: 4 cards, 2 tracks, pan (12, -8) at 125%");
}
