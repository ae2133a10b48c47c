#![allow(clippy::float_cmp)]

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::*;

#[test]
fn snap_rounds_to_nearest_multiple() {
    assert_eq!(snap(0.0), 0.0);
    assert_eq!(snap(9.0), 0.0);
    assert_eq!(snap(11.0), 20.0);
    assert_eq!(snap(29.9), 20.0);
    assert_eq!(snap(30.0), 40.0);
    assert_eq!(snap(-11.0), -20.0);
}

#[test]
fn snap_rounds_halves_up() {
    assert_eq!(snap(10.0), 20.0);
    assert_eq!(snap(-10.0), 0.0);
    assert_eq!(snap(-30.0), -20.0);
    assert_eq!(snap(-50.0), -40.0);
}

#[test]
fn snap_never_yields_negative_zero() {
    for v in [-5.0, -9.99, -0.0, -10.0] {
        let snapped = snap(v);
        assert_eq!(snapped, 0.0);
        assert!(snapped.is_sign_positive(), "snap({v}) produced -0.0");
    }
    assert_eq!(serde_json::to_string(&snap(-5.0)).unwrap(), "0.0");
}

#[test]
fn snap_is_translation_invariant() {
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..5_000 {
        let v = f64::from(rng.random_range(-50_000_i32..50_000)) / 2.0;
        let k = f64::from(rng.random_range(-100_i32..100)) * GRID_SIZE;
        assert_eq!(snap(v + k), snap(v) + k, "snap cell shifted for {v} + {k}");
    }
}

#[test]
fn snap_keeps_grid_values() {
    for v in [-100.0, -20.0, 0.0, 20.0, 140.0, 2_000.0] {
        assert_eq!(snap(v), v);
    }
}

#[test]
fn snap_is_idempotent() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..5_000 {
        let v = rng.random_range(-1.0e6..1.0e6);
        let once = snap(v);
        assert_eq!(snap(once), once, "snap not idempotent for {v}");
    }
}

#[test]
fn snap_point_snaps_both_axes() {
    assert_eq!(snap_point(Point::new(31.0, -9.0)), Point::new(40.0, 0.0));
}
