//! Hit-testing: which object, or which resize handle, lies under a world point.
//!
//! Box-shaped objects are tested against their axis-aligned bounding box;
//! rotation is ignored. Lines and arrows are tested by distance to each of
//! their segments.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::camera::{Point, ViewTransform};
use crate::consts::{HANDLE_PADDING, HANDLE_SIZE_PX, LINE_HIT_THRESHOLD};
use crate::doc::{CanvasObject, DocStore, ObjectId};

/// Corner handle used to resize a box-shaped object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeHandle {
    Nw,
    Ne,
    Se,
    Sw,
}

impl ResizeHandle {
    pub const ALL: [ResizeHandle; 4] = [Self::Nw, Self::Ne, Self::Se, Self::Sw];

    /// Horizontal direction the handle grows the box: -1 (west) or +1 (east).
    #[must_use]
    pub fn sign_x(self) -> f64 {
        match self {
            Self::Nw | Self::Sw => -1.0,
            Self::Ne | Self::Se => 1.0,
        }
    }

    /// Vertical direction the handle grows the box: -1 (north) or +1 (south).
    #[must_use]
    pub fn sign_y(self) -> f64 {
        match self {
            Self::Nw | Self::Ne => -1.0,
            Self::Sw | Self::Se => 1.0,
        }
    }

    /// CSS cursor name for hovering this handle.
    #[must_use]
    pub fn cursor(self) -> &'static str {
        match self {
            Self::Nw | Self::Se => "nwse-resize",
            Self::Ne | Self::Sw => "nesw-resize",
        }
    }
}

/// Result of a hit test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Hit {
    /// The body of an object.
    Object(ObjectId),
    /// A resize handle of the given object.
    Handle(ObjectId, ResizeHandle),
}

/// Whether `point` lies within the object's shape.
#[must_use]
pub fn object_contains(obj: &CanvasObject, point: Point) -> bool {
    match obj.points() {
        Some(points) => points
            .windows(2)
            .any(|seg| near_segment(point, seg[0], seg[1], LINE_HIT_THRESHOLD)),
        None => {
            let max = obj.max_corner();
            obj.position.x <= point.x && point.x <= max.x && obj.position.y <= point.y && point.y <= max.y
        }
    }
}

/// Topmost object under `point`, searching from the end of the draw order.
#[must_use]
pub fn hit_test<'a>(point: Point, objects: &'a [CanvasObject]) -> Option<&'a CanvasObject> {
    objects.iter().rev().find(|obj| object_contains(obj, point))
}

/// Whether `p` lies within `threshold` of the segment `a`–`b`.
///
/// Uses the implicit line `a·x + b·y + c = 0` through the segment, and also
/// requires `p` to fall inside the segment's bounding box grown by `threshold`
/// so the infinite line does not match past the endpoints.
#[must_use]
pub fn near_segment(p: Point, start: Point, end: Point, threshold: f64) -> bool {
    let min_x = start.x.min(end.x) - threshold;
    let max_x = start.x.max(end.x) + threshold;
    let min_y = start.y.min(end.y) - threshold;
    let max_y = start.y.max(end.y) + threshold;
    if p.x < min_x || p.x > max_x || p.y < min_y || p.y > max_y {
        return false;
    }

    let a = end.y - start.y;
    let b = -(end.x - start.x);
    let c = end.x * start.y - start.x * end.y;
    let norm = a.hypot(b);
    if norm == 0.0 {
        return p.distance(start) <= threshold;
    }
    (a * p.x + b * p.y + c).abs() / norm <= threshold
}

/// Handle centers for an object: corners of its bounding box padded outward.
///
/// Lines and arrows have no resize handles.
#[must_use]
pub fn handle_positions(obj: &CanvasObject) -> Option<[(ResizeHandle, Point); 4]> {
    if obj.kind().is_stroke() {
        return None;
    }
    let min = obj.position.translated(-HANDLE_PADDING, -HANDLE_PADDING);
    let max = obj.max_corner().translated(HANDLE_PADDING, HANDLE_PADDING);
    Some([
        (ResizeHandle::Nw, min),
        (ResizeHandle::Ne, Point::new(max.x, min.y)),
        (ResizeHandle::Se, max),
        (ResizeHandle::Sw, Point::new(min.x, max.y)),
    ])
}

/// Which handle of `obj` (if any) is under `point`. Hit radius shrinks as zoom grows.
#[must_use]
pub fn hit_handle(obj: &CanvasObject, point: Point, view: &ViewTransform) -> Option<ResizeHandle> {
    let radius = view.screen_dist_to_world(HANDLE_SIZE_PX);
    handle_positions(obj)?
        .into_iter()
        .find(|(_, center)| (point.x - center.x).abs() <= radius && (point.y - center.y).abs() <= radius)
        .map(|(handle, _)| handle)
}

/// Full hit test: handles of the single selected object first, then bodies topmost-first.
#[must_use]
pub fn hit_at(point: Point, doc: &DocStore, view: &ViewTransform, selected: Option<&ObjectId>) -> Option<Hit> {
    if let Some(obj) = selected.and_then(|id| doc.get(id)) {
        if let Some(handle) = hit_handle(obj, point, view) {
            return Some(Hit::Handle(obj.id.clone(), handle));
        }
    }
    hit_test(point, doc.objects()).map(|obj| Hit::Object(obj.id.clone()))
}
