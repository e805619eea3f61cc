//! Multi-touch tracking.
//!
//! One finger behaves like a mouse pointer. A second finger turns the gesture
//! into a pinch: every move reports the zoom ratio between finger distances and
//! the midpoint shift. Once a pinch has started, the remaining finger is ignored
//! until every finger is lifted.

#[cfg(test)]
#[path = "gesture_test.rs"]
mod gesture_test;

use crate::camera::Point;

/// What a touch event means for the session.
#[derive(Debug, Clone, PartialEq)]
pub enum TouchOutcome {
    /// Forward as pointer-down at this screen point.
    PointerDown(Point),
    /// Forward as pointer-move.
    PointerMove(Point),
    /// Forward as pointer-up.
    PointerUp(Point),
    /// A second finger landed: abandon the single-pointer gesture.
    PinchStarted,
    /// Pinch update in screen space.
    Pinch {
        /// Current midpoint between the two fingers; the zoom anchor.
        midpoint: Point,
        /// New finger distance over the previous one.
        ratio: f64,
        /// Midpoint movement since the previous update.
        pan: Point,
    },
    /// Nothing for the session to do.
    Ignored,
}

#[derive(Debug, Clone, Copy)]
struct Touch {
    id: u32,
    screen: Point,
}

/// Tracks active touches and the pinch derived from them.
#[derive(Debug, Clone, Default)]
pub struct GestureTracker {
    touches: Vec<Touch>,
    /// Set when two fingers were down; cleared when all are lifted.
    pinched: bool,
}

impl GestureTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of fingers currently down.
    #[must_use]
    pub fn touch_count(&self) -> usize {
        self.touches.len()
    }

    #[must_use]
    pub fn is_pinching(&self) -> bool {
        self.pinched && self.touches.len() >= 2
    }

    pub fn touch_start(&mut self, id: u32, screen: Point) -> TouchOutcome {
        if let Some(existing) = self.touches.iter_mut().find(|t| t.id == id) {
            existing.screen = screen;
            return TouchOutcome::Ignored;
        }
        self.touches.push(Touch { id, screen });
        match self.touches.len() {
            1 if !self.pinched => TouchOutcome::PointerDown(screen),
            2 => {
                self.pinched = true;
                TouchOutcome::PinchStarted
            }
            _ => TouchOutcome::Ignored,
        }
    }

    pub fn touch_move(&mut self, id: u32, screen: Point) -> TouchOutcome {
        let Some(idx) = self.touches.iter().position(|t| t.id == id) else {
            return TouchOutcome::Ignored;
        };
        if !self.pinched {
            self.touches[idx].screen = screen;
            return TouchOutcome::PointerMove(screen);
        }
        if idx >= 2 || self.touches.len() < 2 {
            self.touches[idx].screen = screen;
            return TouchOutcome::Ignored;
        }

        let (before_a, before_b) = (self.touches[0].screen, self.touches[1].screen);
        self.touches[idx].screen = screen;
        let (after_a, after_b) = (self.touches[0].screen, self.touches[1].screen);

        let before_dist = before_a.distance(before_b);
        let after_dist = after_a.distance(after_b);
        let ratio = if before_dist > 0.0 && after_dist > 0.0 { after_dist / before_dist } else { 1.0 };
        let before_mid = before_a.midpoint(before_b);
        let midpoint = after_a.midpoint(after_b);
        TouchOutcome::Pinch { midpoint, ratio, pan: midpoint.minus(before_mid) }
    }

    pub fn touch_end(&mut self, id: u32) -> TouchOutcome {
        let Some(idx) = self.touches.iter().position(|t| t.id == id) else {
            return TouchOutcome::Ignored;
        };
        let touch = self.touches.remove(idx);
        if self.touches.is_empty() {
            let was_pinched = self.pinched;
            self.pinched = false;
            if !was_pinched {
                return TouchOutcome::PointerUp(touch.screen);
            }
        }
        TouchOutcome::Ignored
    }

    /// Forget every touch, e.g. on `touchcancel`.
    pub fn reset(&mut self) {
        self.touches.clear();
        self.pinched = false;
    }
}
