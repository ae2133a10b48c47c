#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use std::ops::{Add, Div, Sub};

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_SCALE, MIN_SCALE};

/// A point in either screen or world space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, other: Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, other: Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }
}

impl Div<f64> for Point {
    type Output = Point;

    fn div(self, factor: f64) -> Point {
        Point::new(self.x / factor, self.y / factor)
    }
}

/// Viewport state for pan/zoom on the canvas.
///
/// `x` / `y` are the pan offset in screen pixels.
/// `scale` is the zoom factor (1.0 = no zoom), always within
/// [`MIN_SCALE`]..=[`MAX_SCALE`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub x: f64,
    pub y: f64,
    pub scale: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self { x: 0.0, y: 0.0, scale: 1.0 }
    }
}

impl Transform {
    /// Convert a screen-space point to world coordinates.
    #[must_use]
    pub fn to_world(&self, screen: Point) -> Point {
        Point {
            x: (screen.x - self.x) / self.scale,
            y: (screen.y - self.y) / self.scale,
        }
    }

    /// Convert a world-space point to screen coordinates.
    #[must_use]
    pub fn to_screen(&self, world: Point) -> Point {
        Point {
            x: world.x * self.scale + self.x,
            y: world.y * self.scale + self.y,
        }
    }

    /// Convert a screen-space distance (pixels) to world-space distance.
    #[must_use]
    pub fn screen_dist_to_world(&self, screen_dist: f64) -> f64 {
        screen_dist / self.scale
    }

    /// Change the scale by `delta`, keeping the world point under `center` fixed.
    ///
    /// The new scale is clamped to the allowed range. Returns `false` and leaves
    /// the transform untouched when the clamped scale equals the current one.
    #[allow(clippy::float_cmp)]
    pub fn zoom_about(&mut self, delta: f64, center: Point) -> bool {
        let new_scale = (self.scale + delta).clamp(MIN_SCALE, MAX_SCALE);
        if new_scale == self.scale {
            return false;
        }
        let ratio = new_scale / self.scale;
        self.x = center.x - (center.x - self.x) * ratio;
        self.y = center.y - (center.y - self.y) * ratio;
        self.scale = new_scale;
        true
    }

    /// Shift the pan offset by a screen-space amount.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
    }

    /// Return a copy with `scale` forced into the allowed range.
    ///
    /// Non-finite scales fall back to 1.0.
    #[must_use]
    pub fn clamped(self) -> Self {
        let scale = if self.scale.is_finite() { self.scale.clamp(MIN_SCALE, MAX_SCALE) } else { 1.0 };
        Self { scale, ..self }
    }
}
