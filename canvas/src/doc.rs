//! Document model: canvas objects, their per-type payloads, and the in-memory store.
//!
//! This module defines the data that describes what is on the canvas
//! (`CanvasObject`, `ObjectBody`, `ObjectKind`), a sparse-update type for
//! incremental edits (`ObjectPatch`), and the ordered store that owns all live
//! objects (`DocStore`). Insertion order is draw order: later objects sit on top.
//!
//! Every mutation on `DocStore` reports whether it changed anything. Rejected
//! mutations (unknown id, locked geometry, field not applicable to the type)
//! leave the store untouched and return `false`; they are expected and never
//! surface as errors.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::fmt;

use rand::Rng;
use rand::distr::Alphanumeric;
use serde::{Deserialize, Serialize};

use crate::camera::Point;
use crate::consts::{
    DEFAULT_FILL, DEFAULT_FONT_SIZE, DEFAULT_LINE_WIDTH, DEFAULT_STICKY_FILL, DEFAULT_STROKE, MIN_SIZE,
};

/// Length of generated object ids.
pub const OBJECT_ID_LEN: usize = 9;

// =============================================================
// Ids
// =============================================================

/// Unique identifier for a canvas object: nine ASCII alphanumerics.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(String);

impl ObjectId {
    /// Generate a fresh random id.
    #[must_use]
    pub fn generate() -> Self {
        let id: String = rand::rng()
            .sample_iter(&Alphanumeric)
            .take(OBJECT_ID_LEN)
            .map(char::from)
            .collect();
        Self(id)
    }

    /// Whether `raw` has the shape of an object id.
    #[must_use]
    pub fn is_valid(raw: &str) -> bool {
        raw.len() == OBJECT_ID_LEN && raw.bytes().all(|b| b.is_ascii_alphanumeric())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ObjectId {
    fn from(raw: &str) -> Self {
        Self(raw.to_owned())
    }
}

impl From<String> for ObjectId {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

// =============================================================
// Kinds and payloads
// =============================================================

/// The type tag of a canvas object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    Rectangle,
    Circle,
    Text,
    Image,
    Line,
    Arrow,
    Embed,
    Sticky,
}

impl ObjectKind {
    /// Every kind, in wire order.
    pub const ALL: [ObjectKind; 8] = [
        Self::Rectangle,
        Self::Circle,
        Self::Text,
        Self::Image,
        Self::Line,
        Self::Arrow,
        Self::Embed,
        Self::Sticky,
    ];

    /// Wire name of this kind.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rectangle => "rectangle",
            Self::Circle => "circle",
            Self::Text => "text",
            Self::Image => "image",
            Self::Line => "line",
            Self::Arrow => "arrow",
            Self::Embed => "embed",
            Self::Sticky => "sticky",
        }
    }

    /// Parse a wire name.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == raw)
    }

    /// Whether the geometry is a polyline rather than a box.
    #[must_use]
    pub fn is_stroke(self) -> bool {
        matches!(self, Self::Line | Self::Arrow)
    }

    /// Whether resizing always preserves the aspect ratio.
    #[must_use]
    pub fn keeps_aspect(self) -> bool {
        matches!(self, Self::Image | Self::Embed)
    }

    /// Whether the object carries editable text.
    #[must_use]
    pub fn has_text(self) -> bool {
        matches!(self, Self::Text | Self::Sticky)
    }
}

/// CSS font weight restricted to 100..=900 in steps of 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct FontWeight(u16);

impl FontWeight {
    pub const THIN: Self = Self(100);
    pub const NORMAL: Self = Self(400);
    pub const BOLD: Self = Self(700);
    pub const BLACK: Self = Self(900);

    #[must_use]
    pub fn value(self) -> u16 {
        self.0
    }

    /// The next heavier weight, wrapping 900 back to 100.
    #[must_use]
    pub fn next(self) -> Self {
        if self.0 >= 900 { Self::THIN } else { Self(self.0 + 100) }
    }
}

impl Default for FontWeight {
    fn default() -> Self {
        Self::NORMAL
    }
}

impl TryFrom<u16> for FontWeight {
    type Error = String;

    fn try_from(raw: u16) -> Result<Self, Self::Error> {
        if (100..=900).contains(&raw) && raw % 100 == 0 {
            Ok(Self(raw))
        } else {
            Err(format!("font weight must be 100..=900 in steps of 100, got {raw}"))
        }
    }
}

impl From<FontWeight> for u16 {
    fn from(weight: FontWeight) -> Self {
        weight.0
    }
}

fn default_font_size() -> f64 {
    DEFAULT_FONT_SIZE
}

fn default_line_width() -> f64 {
    DEFAULT_LINE_WIDTH
}

/// Payload shared by `text` and `sticky` objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextBody {
    #[serde(default)]
    pub text: String,
    #[serde(default = "default_font_size")]
    pub font_size: f64,
    #[serde(default)]
    pub italic: bool,
    #[serde(default)]
    pub weight: FontWeight,
}

impl TextBody {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into(), font_size: DEFAULT_FONT_SIZE, italic: false, weight: FontWeight::default() }
    }
}

/// Payload shared by `line` and `arrow` objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrokeBody {
    pub points: Vec<Point>,
    #[serde(default = "default_line_width")]
    pub line_width: f64,
}

/// Payload of an `image` object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageBody {
    /// Encoded image, usually a `data:` URL.
    pub image_data: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_url: Option<String>,
    /// Clip to an inscribed circle.
    #[serde(default)]
    pub circle: bool,
    /// Hidden behind a reveal-on-click overlay.
    #[serde(default)]
    pub spoiler: bool,
}

/// Payload of an `embed` object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbedBody {
    pub embed_url: String,
}

/// Variant-specific part of a canvas object, tagged by `type` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ObjectBody {
    Rectangle,
    Circle,
    Text(TextBody),
    Image(ImageBody),
    Line(StrokeBody),
    Arrow(StrokeBody),
    Embed(EmbedBody),
    Sticky(TextBody),
}

impl ObjectBody {
    #[must_use]
    pub fn kind(&self) -> ObjectKind {
        match self {
            Self::Rectangle => ObjectKind::Rectangle,
            Self::Circle => ObjectKind::Circle,
            Self::Text(_) => ObjectKind::Text,
            Self::Image(_) => ObjectKind::Image,
            Self::Line(_) => ObjectKind::Line,
            Self::Arrow(_) => ObjectKind::Arrow,
            Self::Embed(_) => ObjectKind::Embed,
            Self::Sticky(_) => ObjectKind::Sticky,
        }
    }
}

// =============================================================
// Canvas object
// =============================================================

/// A canvas object: a shared envelope plus a type-specific body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasObject {
    pub id: ObjectId,
    /// Top-left of the bounding box in world coordinates.
    pub position: Point,
    pub width: f64,
    pub height: f64,
    /// Background for shapes and stickies, stroke color for lines, arrows and text.
    pub fill: String,
    /// Clockwise rotation in degrees, kept within `[0, 360)`.
    #[serde(default)]
    pub rotation: f64,
    /// Locked objects ignore move and resize.
    #[serde(default)]
    pub locked: bool,
    #[serde(flatten)]
    pub body: ObjectBody,
}

impl CanvasObject {
    fn boxed(position: Point, width: f64, height: f64, fill: &str, body: ObjectBody) -> Self {
        Self {
            id: ObjectId::generate(),
            position,
            width: width.max(MIN_SIZE),
            height: height.max(MIN_SIZE),
            fill: fill.to_owned(),
            rotation: 0.0,
            locked: false,
            body,
        }
    }

    #[must_use]
    pub fn rectangle(position: Point, width: f64, height: f64) -> Self {
        Self::boxed(position, width, height, DEFAULT_FILL, ObjectBody::Rectangle)
    }

    #[must_use]
    pub fn circle(position: Point, width: f64, height: f64) -> Self {
        Self::boxed(position, width, height, DEFAULT_FILL, ObjectBody::Circle)
    }

    #[must_use]
    pub fn text(position: Point, width: f64, height: f64, text: impl Into<String>) -> Self {
        Self::boxed(position, width, height, DEFAULT_STROKE, ObjectBody::Text(TextBody::new(text)))
    }

    #[must_use]
    pub fn sticky(position: Point, width: f64, height: f64, text: impl Into<String>) -> Self {
        Self::boxed(position, width, height, DEFAULT_STICKY_FILL, ObjectBody::Sticky(TextBody::new(text)))
    }

    #[must_use]
    pub fn image(position: Point, width: f64, height: f64, image_data: String, original_url: Option<String>) -> Self {
        let body = ObjectBody::Image(ImageBody { image_data, original_url, circle: false, spoiler: false });
        Self::boxed(position, width, height, "transparent", body)
    }

    #[must_use]
    pub fn embed(position: Point, width: f64, height: f64, embed_url: String) -> Self {
        Self::boxed(position, width, height, "transparent", ObjectBody::Embed(EmbedBody { embed_url }))
    }

    /// A polyline through `points`. The bounding box is derived from the points.
    #[must_use]
    pub fn line(points: Vec<Point>) -> Self {
        let body = ObjectBody::Line(StrokeBody { points, line_width: DEFAULT_LINE_WIDTH });
        Self::stroked(body)
    }

    /// A two-point arrow from `from` to `to`.
    #[must_use]
    pub fn arrow(from: Point, to: Point) -> Self {
        let body = ObjectBody::Arrow(StrokeBody { points: vec![from, to], line_width: DEFAULT_LINE_WIDTH });
        Self::stroked(body)
    }

    fn stroked(body: ObjectBody) -> Self {
        let mut obj = Self {
            id: ObjectId::generate(),
            position: Point::default(),
            width: 0.0,
            height: 0.0,
            fill: DEFAULT_STROKE.to_owned(),
            rotation: 0.0,
            locked: false,
            body,
        };
        obj.recompute_stroke_bounds();
        obj
    }

    /// Replace the id. Used by tests and when re-keying remote records.
    #[must_use]
    pub fn with_id(mut self, id: ObjectId) -> Self {
        self.id = id;
        self
    }

    #[must_use]
    pub fn with_fill(mut self, fill: impl Into<String>) -> Self {
        self.fill = fill.into();
        self
    }

    #[must_use]
    pub fn with_locked(mut self, locked: bool) -> Self {
        self.locked = locked;
        self
    }

    #[must_use]
    pub fn kind(&self) -> ObjectKind {
        self.body.kind()
    }

    /// Polyline points for lines and arrows.
    #[must_use]
    pub fn points(&self) -> Option<&[Point]> {
        match &self.body {
            ObjectBody::Line(stroke) | ObjectBody::Arrow(stroke) => Some(&stroke.points),
            _ => None,
        }
    }

    #[must_use]
    pub fn text_body(&self) -> Option<&TextBody> {
        match &self.body {
            ObjectBody::Text(body) | ObjectBody::Sticky(body) => Some(body),
            _ => None,
        }
    }

    fn text_body_mut(&mut self) -> Option<&mut TextBody> {
        match &mut self.body {
            ObjectBody::Text(body) | ObjectBody::Sticky(body) => Some(body),
            _ => None,
        }
    }

    fn stroke_body_mut(&mut self) -> Option<&mut StrokeBody> {
        match &mut self.body {
            ObjectBody::Line(stroke) | ObjectBody::Arrow(stroke) => Some(stroke),
            _ => None,
        }
    }

    /// Bottom-right corner of the bounding box.
    #[must_use]
    pub fn max_corner(&self) -> Point {
        self.position.translated(self.width, self.height)
    }

    /// Shift the object (and every polyline point) by `(dx, dy)`.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.position = self.position.translated(dx, dy);
        if let Some(stroke) = self.stroke_body_mut() {
            for p in &mut stroke.points {
                *p = p.translated(dx, dy);
            }
        }
    }

    /// Move the bounding-box origin to `position`, carrying polyline points along.
    pub fn move_to(&mut self, position: Point) {
        let delta = position.minus(self.position);
        self.translate(delta.x, delta.y);
    }

    /// Recompute a line/arrow bounding box from the min/max of its points.
    pub fn recompute_stroke_bounds(&mut self) {
        let Some(points) = self.points() else {
            return;
        };
        let Some(first) = points.first().copied() else {
            return;
        };
        let (mut min, mut max) = (first, first);
        for p in points {
            min = Point::new(min.x.min(p.x), min.y.min(p.y));
            max = Point::new(max.x.max(p.x), max.y.max(p.y));
        }
        self.position = min;
        self.width = max.x - min.x;
        self.height = max.y - min.y;
    }

    /// Raise a box-shaped object to the minimum size. Strokes keep their point-derived bounds.
    pub fn enforce_min_size(&mut self) {
        if self.kind().is_stroke() {
            return;
        }
        self.width = self.width.max(MIN_SIZE);
        self.height = self.height.max(MIN_SIZE);
    }

    /// Total polyline length for strokes, diagonal of the box otherwise.
    #[must_use]
    pub fn extent(&self) -> f64 {
        match self.points() {
            Some(points) => points.windows(2).map(|w| w[0].distance(w[1])).sum(),
            None => self.width.hypot(self.height),
        }
    }

    /// Apply a patch. Returns whether anything changed.
    ///
    /// Geometry fields are ignored as a whole when the object is locked, and
    /// payload fields that do not apply to this object's type are skipped.
    fn apply_patch(&mut self, patch: &ObjectPatch) -> bool {
        if self.locked && patch.touches_geometry() {
            return false;
        }
        let before = self.clone();
        let is_stroke = self.kind().is_stroke();

        if let Some(position) = patch.position {
            self.move_to(position);
        }
        if !is_stroke {
            if let Some(w) = patch.width {
                self.width = w.max(MIN_SIZE);
            }
            if let Some(h) = patch.height {
                self.height = h.max(MIN_SIZE);
            }
        }
        if let Some(fill) = &patch.fill {
            self.fill.clone_from(fill);
        }
        if let Some(rotation) = patch.rotation {
            self.rotation = normalize_rotation(rotation);
        }
        if let Some(locked) = patch.locked {
            self.locked = locked;
        }
        if let Some(body) = self.text_body_mut() {
            if let Some(text) = &patch.text {
                body.text.clone_from(text);
            }
            if let Some(size) = patch.font_size {
                body.font_size = size;
            }
            if let Some(italic) = patch.italic {
                body.italic = italic;
            }
            if let Some(weight) = patch.weight {
                body.weight = weight;
            }
        }
        let exact_two = self.kind() == ObjectKind::Arrow;
        if let Some(stroke) = self.stroke_body_mut() {
            if let Some(points) = &patch.points {
                let accepted = if exact_two { points.len() == 2 } else { points.len() >= 2 };
                if accepted {
                    stroke.points.clone_from(points);
                }
            }
            if let Some(width) = patch.line_width {
                stroke.line_width = width;
            }
        }
        if is_stroke {
            self.recompute_stroke_bounds();
        }
        match &mut self.body {
            ObjectBody::Image(image) => {
                if let Some(circle) = patch.circle {
                    image.circle = circle;
                }
                if let Some(spoiler) = patch.spoiler {
                    image.spoiler = spoiler;
                }
            }
            ObjectBody::Embed(embed) => {
                if let Some(url) = &patch.embed_url {
                    embed.embed_url.clone_from(url);
                }
            }
            _ => {}
        }

        *self != before
    }
}

/// Wrap degrees into `[0, 360)`.
#[must_use]
pub fn normalize_rotation(degrees: f64) -> f64 {
    if !degrees.is_finite() {
        return 0.0;
    }
    let wrapped = degrees.rem_euclid(360.0);
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

// =============================================================
// Patch
// =============================================================

/// Sparse update for a canvas object. Only present fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Point>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locked: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<FontWeight>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points: Option<Vec<Point>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub circle: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spoiler: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embed_url: Option<String>,
}

impl ObjectPatch {
    /// Whether the patch moves or resizes the object.
    #[must_use]
    pub fn touches_geometry(&self) -> bool {
        self.position.is_some() || self.width.is_some() || self.height.is_some() || self.points.is_some()
    }
}

// =============================================================
// Store
// =============================================================

/// Direction for a one-step z-order change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZDirection {
    /// One step toward the top (later in draw order).
    Forward,
    /// One step toward the bottom (earlier in draw order).
    Backward,
}

/// Ordered in-memory store of canvas objects. Index is z-order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocStore {
    objects: Vec<CanvasObject>,
}

impl DocStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self { objects: Vec::new() }
    }

    /// All objects in draw order, bottom first.
    #[must_use]
    pub fn objects(&self) -> &[CanvasObject] {
        &self.objects
    }

    /// Clone of the object list for a history snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Vec<CanvasObject> {
        self.objects.clone()
    }

    /// Replace all objects with a snapshot. Later duplicates of an id are dropped
    /// and undersized boxes are raised to the minimum size.
    pub fn load_snapshot(&mut self, objects: Vec<CanvasObject>) {
        self.objects.clear();
        for mut obj in objects {
            obj.enforce_min_size();
            self.insert(obj);
        }
    }

    #[must_use]
    pub fn get(&self, id: &ObjectId) -> Option<&CanvasObject> {
        self.objects.iter().find(|o| &o.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: &ObjectId) -> Option<&mut CanvasObject> {
        self.objects.iter_mut().find(|o| &o.id == id)
    }

    /// Replace a stored object wholesale (same id). Returns false if absent.
    pub(crate) fn replace(&mut self, obj: CanvasObject) -> bool {
        match self.get_mut(&obj.id) {
            Some(slot) => {
                *slot = obj;
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn index_of(&self, id: &ObjectId) -> Option<usize> {
        self.objects.iter().position(|o| &o.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: &ObjectId) -> bool {
        self.index_of(id).is_some()
    }

    /// Whether any object has its origin exactly at `position`.
    #[must_use]
    pub fn position_taken(&self, position: Point) -> bool {
        self.objects.iter().any(|o| o.position == position)
    }

    /// Append an object on top. Rejected when the id is already present.
    pub fn insert(&mut self, obj: CanvasObject) -> bool {
        if self.contains(&obj.id) {
            tracing::debug!(id = %obj.id, "insert rejected: duplicate id");
            return false;
        }
        self.objects.push(obj);
        true
    }

    /// Merge a patch into the matching object.
    pub fn update(&mut self, id: &ObjectId, patch: &ObjectPatch) -> bool {
        let Some(obj) = self.get_mut(id) else {
            return false;
        };
        obj.apply_patch(patch)
    }

    /// Remove an object by id, returning it if it was present.
    pub fn remove(&mut self, id: &ObjectId) -> Option<CanvasObject> {
        let idx = self.index_of(id)?;
        Some(self.objects.remove(idx))
    }

    /// Remove every listed object. Returns the removed objects.
    pub fn remove_many(&mut self, ids: &[ObjectId]) -> Vec<CanvasObject> {
        let mut removed = Vec::new();
        self.objects.retain(|o| {
            if ids.contains(&o.id) {
                removed.push(o.clone());
                false
            } else {
                true
            }
        });
        removed
    }

    /// Remove everything. Returns false if already empty.
    pub fn clear(&mut self) -> bool {
        let had = !self.objects.is_empty();
        self.objects.clear();
        had
    }

    /// Clone an object under a fresh id, translated by `offset`, and append it.
    pub fn duplicate(&mut self, id: &ObjectId, offset: Point) -> Option<ObjectId> {
        let mut copy = self.get(id)?.clone();
        copy.id = ObjectId::generate();
        while self.contains(&copy.id) {
            copy.id = ObjectId::generate();
        }
        copy.translate(offset.x, offset.y);
        let new_id = copy.id.clone();
        self.objects.push(copy);
        Some(new_id)
    }

    /// Swap an object with its neighbor in the given direction.
    pub fn reorder(&mut self, id: &ObjectId, direction: ZDirection) -> bool {
        let Some(idx) = self.index_of(id) else {
            return false;
        };
        let target = match direction {
            ZDirection::Forward if idx + 1 < self.objects.len() => idx + 1,
            ZDirection::Backward if idx > 0 => idx - 1,
            _ => return false,
        };
        self.objects.swap(idx, target);
        true
    }

    pub fn toggle_locked(&mut self, id: &ObjectId) -> bool {
        let Some(obj) = self.get_mut(id) else {
            return false;
        };
        obj.locked = !obj.locked;
        true
    }

    pub fn toggle_italic(&mut self, id: &ObjectId) -> bool {
        let Some(body) = self.get_mut(id).and_then(CanvasObject::text_body_mut) else {
            return false;
        };
        body.italic = !body.italic;
        true
    }

    /// Step the font weight 100 → 200 → … → 900 → 100.
    pub fn cycle_weight(&mut self, id: &ObjectId) -> bool {
        let Some(body) = self.get_mut(id).and_then(CanvasObject::text_body_mut) else {
            return false;
        };
        body.weight = body.weight.next();
        true
    }

    /// Advance the fill to the next palette entry. Unknown fills restart at the first entry.
    pub fn cycle_fill(&mut self, id: &ObjectId, palette: &[&str]) -> bool {
        if palette.is_empty() {
            return false;
        }
        let Some(obj) = self.get_mut(id) else {
            return false;
        };
        let next = palette
            .iter()
            .position(|c| c.eq_ignore_ascii_case(&obj.fill))
            .map_or(0, |i| (i + 1) % palette.len());
        let changed = obj.fill != palette[next];
        obj.fill = palette[next].to_owned();
        changed
    }

    /// Advance a line/arrow stroke width through `widths`.
    pub fn cycle_line_width(&mut self, id: &ObjectId, widths: &[f64]) -> bool {
        if widths.is_empty() {
            return false;
        }
        let Some(stroke) = self.get_mut(id).and_then(CanvasObject::stroke_body_mut) else {
            return false;
        };
        let next = widths
            .iter()
            .position(|w| (w - stroke.line_width).abs() < f64::EPSILON)
            .map_or(0, |i| (i + 1) % widths.len());
        let changed = (stroke.line_width - widths[next]).abs() >= f64::EPSILON;
        stroke.line_width = widths[next];
        changed
    }

    /// Set absolute rotation in degrees (normalized).
    pub fn set_rotation(&mut self, id: &ObjectId, degrees: f64) -> bool {
        let Some(obj) = self.get_mut(id) else {
            return false;
        };
        let next = normalize_rotation(degrees);
        if (obj.rotation - next).abs() < f64::EPSILON {
            return false;
        }
        obj.rotation = next;
        true
    }

    /// Number of objects currently in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Returns `true` if the store contains no objects.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}
