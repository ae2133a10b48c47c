//! Grid snapping for positions, corners and edges.

#[cfg(test)]
#[path = "grid_test.rs"]
mod grid_test;

use crate::camera::Point;
use crate::consts::GRID_SIZE;

/// Round `v` to the nearest multiple of [`GRID_SIZE`]. Halves round up
/// toward positive infinity, so every grid cell has the same shape on both
/// sides of the origin.
#[must_use]
pub fn snap(v: f64) -> f64 {
    // `+ 0.0` folds -0.0 into 0.0 so it never reaches a backup.
    ((v / GRID_SIZE) + 0.5).floor() * GRID_SIZE + 0.0
}

/// Snap both coordinates of a point.
#[must_use]
pub fn snap_point(p: Point) -> Point {
    Point::new(snap(p.x), snap(p.y))
}
