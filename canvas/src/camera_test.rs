#![allow(clippy::float_cmp)]

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::*;

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn point_approx_eq(a: Point, b: Point) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
}

fn tf(x: f64, y: f64, scale: f64) -> Transform {
    Transform { x, y, scale }
}

// --- Point ---

#[test]
fn point_new() {
    let p = Point::new(3.0, 4.0);
    assert_eq!(p.x, 3.0);
    assert_eq!(p.y, 4.0);
}

#[test]
fn point_arithmetic() {
    let a = Point::new(10.0, 20.0);
    let b = Point::new(4.0, 5.0);
    assert_eq!(a + b, Point::new(14.0, 25.0));
    assert_eq!(a - b, Point::new(6.0, 15.0));
    assert_eq!(a / 2.0, Point::new(5.0, 10.0));
}

#[test]
fn point_serializes_as_xy_object() {
    let json = serde_json::to_value(Point::new(1.5, -2.0)).unwrap();
    assert_eq!(json, serde_json::json!({"x": 1.5, "y": -2.0}));
}

// --- Transform defaults ---

#[test]
fn transform_default_is_identity() {
    let t = Transform::default();
    assert_eq!(t.x, 0.0);
    assert_eq!(t.y, 0.0);
    assert_eq!(t.scale, 1.0);
}

// --- to_world ---

#[test]
fn to_world_identity() {
    let t = Transform::default();
    assert!(point_approx_eq(t.to_world(Point::new(50.0, 75.0)), Point::new(50.0, 75.0)));
}

#[test]
fn to_world_with_scale() {
    let t = tf(0.0, 0.0, 2.0);
    let world = t.to_world(Point::new(40.0, 80.0));
    assert!(approx_eq(world.x, 20.0));
    assert!(approx_eq(world.y, 40.0));
}

#[test]
fn to_world_with_pan() {
    let t = tf(100.0, 50.0, 1.0);
    assert!(point_approx_eq(t.to_world(Point::new(100.0, 50.0)), Point::new(0.0, 0.0)));
}

#[test]
fn to_world_with_pan_and_scale() {
    let t = tf(50.0, 30.0, 2.0);
    let world = t.to_world(Point::new(0.0, 0.0));
    assert!(approx_eq(world.x, -25.0));
    assert!(approx_eq(world.y, -15.0));
}

// --- to_screen ---

#[test]
fn to_screen_with_pan_and_scale() {
    let t = tf(20.0, 10.0, 3.0);
    let screen = t.to_screen(Point::new(5.0, 5.0));
    // 5*3 + 20 = 35, 5*3 + 10 = 25
    assert!(approx_eq(screen.x, 35.0));
    assert!(approx_eq(screen.y, 25.0));
}

#[test]
fn round_trip_fractional_scale() {
    let t = tf(13.7, -42.3, 0.75);
    let world = Point::new(333.3, -999.9);
    assert!(point_approx_eq(world, t.to_world(t.to_screen(world))));
}

// --- screen_dist_to_world ---

#[test]
fn screen_dist_to_world_ignores_pan() {
    let t = tf(999.0, -999.0, 2.0);
    assert!(approx_eq(t.screen_dist_to_world(8.0), 4.0));
}

// --- pan_by ---

#[test]
fn pan_by_is_not_divided_by_scale() {
    let mut t = tf(10.0, 10.0, 2.5);
    t.pan_by(5.0, -3.0);
    assert_eq!(t.x, 15.0);
    assert_eq!(t.y, 7.0);
    assert_eq!(t.scale, 2.5);
}

// --- zoom_about ---

#[test]
fn zoom_about_changes_scale_and_offset() {
    let mut t = Transform::default();
    assert!(t.zoom_about(1.0, Point::new(100.0, 100.0)));
    assert_eq!(t.scale, 2.0);
    // 100 - (100 - 0) * 2 = -100
    assert!(approx_eq(t.x, -100.0));
    assert!(approx_eq(t.y, -100.0));
}

#[test]
fn zoom_about_clamps_to_max() {
    let mut t = tf(0.0, 0.0, 2.9);
    assert!(t.zoom_about(5.0, Point::new(10.0, 10.0)));
    assert_eq!(t.scale, MAX_SCALE);
}

#[test]
fn zoom_about_clamps_to_min() {
    let mut t = tf(0.0, 0.0, 0.3);
    assert!(t.zoom_about(-5.0, Point::new(10.0, 10.0)));
    assert_eq!(t.scale, MIN_SCALE);
}

#[test]
fn zoom_about_at_bound_is_noop() {
    let mut t = tf(12.0, 34.0, MAX_SCALE);
    assert!(!t.zoom_about(0.5, Point::new(400.0, 300.0)));
    assert_eq!(t, tf(12.0, 34.0, MAX_SCALE));
}

#[test]
fn zoom_about_zero_delta_is_noop() {
    let mut t = tf(5.0, 6.0, 1.3);
    assert!(!t.zoom_about(0.0, Point::new(1.0, 1.0)));
    assert_eq!(t, tf(5.0, 6.0, 1.3));
}

#[test]
fn zoom_about_keeps_world_point_under_center_fixed() {
    let mut rng = StdRng::seed_from_u64(0x5EED);
    for _ in 0..500 {
        let mut t = tf(rng.random_range(-500.0..500.0), rng.random_range(-500.0..500.0), rng.random_range(0.2..=3.0));
        let center = Point::new(rng.random_range(-1000.0..1000.0), rng.random_range(-1000.0..1000.0));
        let delta = rng.random_range(-4.0..4.0);
        let before = t.to_world(center);
        t.zoom_about(delta, center);
        let after = t.to_world(center);
        assert!((before.x - after.x).abs() < 1e-6, "x drifted: {before:?} -> {after:?}");
        assert!((before.y - after.y).abs() < 1e-6, "y drifted: {before:?} -> {after:?}");
    }
}

#[test]
fn zoom_sequences_stay_in_bounds() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut t = Transform::default();
    for _ in 0..2_000 {
        let delta = rng.random_range(-1.5..1.5);
        t.zoom_about(delta, Point::new(rng.random_range(0.0..800.0), rng.random_range(0.0..600.0)));
        assert!((MIN_SCALE..=MAX_SCALE).contains(&t.scale), "scale escaped: {}", t.scale);
    }
}

// --- clamped ---

#[test]
fn clamped_pulls_scale_into_range() {
    assert_eq!(tf(1.0, 2.0, 10.0).clamped(), tf(1.0, 2.0, MAX_SCALE));
    assert_eq!(tf(1.0, 2.0, 0.01).clamped(), tf(1.0, 2.0, MIN_SCALE));
    assert_eq!(tf(1.0, 2.0, f64::NAN).clamped().scale, 1.0);
}
