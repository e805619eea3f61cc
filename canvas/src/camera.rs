#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

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

    /// Return this point shifted by `(dx, dy)`.
    #[must_use]
    pub fn translated(self, dx: f64, dy: f64) -> Self {
        Self { x: self.x + dx, y: self.y + dy }
    }

    /// Component-wise difference `self - other`.
    #[must_use]
    pub fn minus(self, other: Point) -> Self {
        Self { x: self.x - other.x, y: self.y - other.y }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Midpoint between `self` and `other`.
    #[must_use]
    pub fn midpoint(self, other: Point) -> Self {
        Self { x: (self.x + other.x) / 2.0, y: (self.y + other.y) / 2.0 }
    }
}

/// Clamp a zoom factor into the allowed range.
#[must_use]
pub fn clamp_scale(scale: f64) -> f64 {
    if scale.is_nan() {
        return 1.0;
    }
    scale.clamp(MIN_SCALE, MAX_SCALE)
}

/// Pan/zoom state for the canvas.
///
/// `offset` is in screen pixels.
/// `scale` is a zoom factor (1.0 = no zoom), always within `[MIN_SCALE, MAX_SCALE]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    pub scale: f64,
    pub offset: Point,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self { scale: 1.0, offset: Point::default() }
    }
}

impl ViewTransform {
    /// Build a transform, clamping `scale` into range.
    #[must_use]
    pub fn new(scale: f64, offset: Point) -> Self {
        Self { scale: clamp_scale(scale), offset }
    }

    /// Convert a screen-space point to world coordinates.
    #[must_use]
    pub fn to_world(&self, screen: Point) -> Point {
        Point {
            x: (screen.x - self.offset.x) / self.scale,
            y: (screen.y - self.offset.y) / self.scale,
        }
    }

    /// Convert a world-space point to screen coordinates.
    #[must_use]
    pub fn to_screen(&self, world: Point) -> Point {
        Point {
            x: world.x * self.scale + self.offset.x,
            y: world.y * self.scale + self.offset.y,
        }
    }

    /// Convert a screen-space distance (pixels) to world-space distance.
    #[must_use]
    pub fn screen_dist_to_world(&self, screen_dist: f64) -> f64 {
        screen_dist / self.scale
    }

    /// Shift the view by a screen-space delta. Not divided by scale.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.offset = self.offset.translated(dx, dy);
    }

    /// Zoom to `new_scale` keeping the world point under `anchor` fixed on screen.
    ///
    /// The scale is clamped before the offset is recomputed, so repeated calls
    /// past either limit leave the offset unchanged.
    pub fn zoom_to_point(&mut self, anchor: Point, new_scale: f64) {
        let next = clamp_scale(new_scale);
        let world = self.to_world(anchor);
        self.offset = Point {
            x: anchor.x - world.x * next,
            y: anchor.y - world.y * next,
        };
        self.scale = next;
    }
}
