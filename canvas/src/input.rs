//! Input model: tools, modifier keys, mouse buttons, and the gesture state machine.
//!
//! This module defines the types consumed by the editor session. `Tool` and
//! `Modifiers` capture the user's intent at the time of a pointer event.
//! `InputState` is the active gesture being tracked between pointer-down and
//! pointer-up, carrying all context needed to update the live object on each
//! move and to revert it on cancel. `Intent` is the normalized message every
//! raw event handler reduces to before reaching `EditorSession::dispatch`.
//!
//! The free functions at the bottom hold the geometry of drawing and resizing
//! so the reducer stays a plain state transition.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::camera::Point;
use crate::consts::MIN_SIZE;
use crate::doc::{CanvasObject, ObjectId, ObjectKind};
use crate::hit::ResizeHandle;

/// Which tool is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    /// Pointer / selection tool (default).
    #[default]
    Select,
    /// Draw a rectangle.
    Rectangle,
    /// Draw an ellipse inscribed in the dragged box.
    Circle,
    /// Create a text box.
    Text,
    /// Draw a straight line segment.
    Line,
    /// Draw a two-point arrow.
    Arrow,
    /// Create a sticky note.
    Sticky,
    /// Freehand polyline.
    Pen,
}

impl Tool {
    /// Kind of object this tool creates, `None` for select.
    #[must_use]
    pub fn object_kind(self) -> Option<ObjectKind> {
        match self {
            Self::Select => None,
            Self::Rectangle => Some(ObjectKind::Rectangle),
            Self::Circle => Some(ObjectKind::Circle),
            Self::Text => Some(ObjectKind::Text),
            Self::Line | Self::Pen => Some(ObjectKind::Line),
            Self::Arrow => Some(ObjectKind::Arrow),
            Self::Sticky => Some(ObjectKind::Sticky),
        }
    }

    /// Whether pointer-down with this tool starts a preview drag.
    #[must_use]
    pub fn draws_preview(self) -> bool {
        !matches!(self, Self::Select | Self::Pen)
    }

    /// Whether the tool falls back to select after one object is created.
    /// The pen stays active so several strokes can be drawn in a row.
    #[must_use]
    pub fn is_one_shot(self) -> bool {
        self.draws_preview()
    }

    /// Whether shift constrains the preview to a 1:1 box.
    #[must_use]
    pub fn squares_with_shift(self) -> bool {
        matches!(self, Self::Rectangle | Self::Circle)
    }
}

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// Shift key is held.
    pub shift: bool,
    /// Ctrl key is held.
    pub ctrl: bool,
    /// Alt / Option key is held.
    pub alt: bool,
    /// Meta / Command key is held.
    pub meta: bool,
}

impl Modifiers {
    /// Platform command modifier: Ctrl or Cmd.
    #[must_use]
    pub fn command(self) -> bool {
        self.ctrl || self.meta
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

/// A keyboard key.
///
/// The inner string holds the key name as reported by the browser (e.g. `"Delete"`, `"Escape"`, `"z"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

impl Key {
    /// Case-insensitive comparison against a key name.
    #[must_use]
    pub fn is(&self, name: &str) -> bool {
        self.0.eq_ignore_ascii_case(name)
    }
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        Self(name.to_owned())
    }
}

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy)]
pub struct WheelDelta {
    /// Horizontal scroll amount in pixels.
    pub dx: f64,
    /// Vertical scroll amount in pixels (positive = down).
    pub dy: f64,
}

/// Internal state for the input state machine.
///
/// Each active variant carries gesture context needed to compute the live
/// geometry on move and to restore the object on cancel.
#[derive(Debug, Clone, Default)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// The user is panning the canvas by dragging empty space.
    Panning {
        /// Screen-space position of the previous pointer event, used to compute pan delta.
        last_screen: Point,
    },
    /// The user is moving an existing object across the canvas.
    Dragging {
        /// Id of the object being dragged.
        id: ObjectId,
        /// Pointer position minus object position at grab time.
        grab_offset: Point,
        /// The object as it was at pointer-down, restored on cancel.
        origin: Box<CanvasObject>,
    },
    /// The user is resizing an object by dragging one of its corner handles.
    Resizing {
        /// Id of the object being resized.
        id: ObjectId,
        /// Which corner handle is being dragged.
        handle: ResizeHandle,
        /// World-space pointer position at the start of the resize.
        anchor: Point,
        /// The object as it was at pointer-down, restored on cancel.
        origin: Box<CanvasObject>,
    },
    /// The user is dragging out the box or segment of a new object.
    DrawingPreview {
        /// Tool that started the drag.
        tool: Tool,
        /// World-space point where the drag started.
        anchor: Point,
        /// World-space point of the latest move.
        current: Point,
        /// Whether shift was held on the latest event.
        shift: bool,
    },
    /// The user is drawing a freehand polyline.
    DrawingFreehand {
        /// World-space points collected so far.
        points: Vec<Point>,
    },
}

impl InputState {
    /// Whether a gesture is in progress.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Idle)
    }
}

/// Normalized input message consumed by `EditorSession::dispatch`.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    /// Pointer pressed at a screen point.
    Begin { screen: Point, button: Button, modifiers: Modifiers },
    /// Pointer moved to a screen point.
    Move { screen: Point, modifiers: Modifiers },
    /// Pointer released at a screen point.
    Commit { screen: Point },
    /// Abandon the active gesture without recording anything.
    Cancel,
    /// Shift the view by a screen-space delta.
    PanBy { dx: f64, dy: f64 },
    /// Zoom to `scale` keeping `anchor` (screen space) fixed.
    ZoomAt { anchor: Point, scale: f64 },
}

/// Axis-aligned box in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub position: Point,
    pub width: f64,
    pub height: f64,
}

/// Box spanned by a preview drag from `anchor` to `current`.
///
/// With `square`, both sides take the smaller of the two extents and keep the
/// drag direction.
#[must_use]
pub fn draw_bounds(anchor: Point, current: Point, square: bool) -> Bounds {
    let mut dx = current.x - anchor.x;
    let mut dy = current.y - anchor.y;
    if square {
        let side = dx.abs().min(dy.abs());
        dx = side.copysign(dx);
        dy = side.copysign(dy);
    }
    Bounds {
        position: Point::new(anchor.x.min(anchor.x + dx), anchor.y.min(anchor.y + dy)),
        width: dx.abs(),
        height: dy.abs(),
    }
}

/// New box for `origin` after dragging `handle` by `(dx, dy)` world units.
///
/// The corner opposite the handle stays fixed. With `keep_aspect`, the axis
/// with the larger pull drives a uniform scale; otherwise each axis moves on
/// its own. Both sides end up at least `MIN_SIZE`.
#[must_use]
pub fn resize_bounds(origin: Bounds, handle: ResizeHandle, dx: f64, dy: f64, keep_aspect: bool) -> Bounds {
    let grow_x = dx * handle.sign_x();
    let grow_y = dy * handle.sign_y();

    let (width, height) = if keep_aspect && origin.width > 0.0 && origin.height > 0.0 {
        let factor = if grow_x.abs() >= grow_y.abs() {
            (origin.width + grow_x) / origin.width
        } else {
            (origin.height + grow_y) / origin.height
        };
        let min_factor = (MIN_SIZE / origin.width).max(MIN_SIZE / origin.height);
        let factor = factor.max(min_factor);
        (origin.width * factor, origin.height * factor)
    } else {
        ((origin.width + grow_x).max(MIN_SIZE), (origin.height + grow_y).max(MIN_SIZE))
    };

    let x = if handle.sign_x() < 0.0 { origin.position.x + origin.width - width } else { origin.position.x };
    let y = if handle.sign_y() < 0.0 { origin.position.y + origin.height - height } else { origin.position.y };
    Bounds { position: Point::new(x, y), width, height }
}
