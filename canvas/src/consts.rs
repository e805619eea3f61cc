//! Shared numeric constants for the canvas crate.

// ── Camera ──────────────────────────────────────────────────────

/// Smallest allowed zoom factor.
pub const MIN_SCALE: f64 = 0.7;

/// Largest allowed zoom factor.
pub const MAX_SCALE: f64 = 2.0;

/// Multiplicative zoom step applied per ctrl+wheel notch.
pub const WHEEL_ZOOM_STEP: f64 = 1.1;

// ── Geometry ────────────────────────────────────────────────────

/// Minimum width/height of a box-shaped object, in world units.
pub const MIN_SIZE: f64 = 20.0;

/// Maximum distance from a line segment that still counts as a hit, in world units.
pub const LINE_HIT_THRESHOLD: f64 = 5.0;

/// Screen-space size of a resize handle in pixels. Divided by scale for world hit radius.
pub const HANDLE_SIZE_PX: f64 = 10.0;

/// Padding between an object's bounding box and its resize handles, in world units.
pub const HANDLE_PADDING: f64 = 4.0;

// ── Object defaults ─────────────────────────────────────────────

/// World-unit offset applied to each duplicated object.
pub const DUPLICATE_OFFSET: f64 = 40.0;

/// Stroke widths cycled by `cycle_line_width`.
pub const LINE_WIDTHS: [f64; 5] = [2.0, 4.0, 6.0, 8.0, 10.0];

/// Default stroke width for new lines and arrows.
pub const DEFAULT_LINE_WIDTH: f64 = 2.0;

/// Default font size for new text and sticky objects.
pub const DEFAULT_FONT_SIZE: f64 = 24.0;

/// Default fill for shapes and sticky notes.
pub const DEFAULT_FILL: &str = "#D94B4B";

/// Default stroke color for lines, arrows and text.
pub const DEFAULT_STROKE: &str = "#1F1A17";

/// Default sticky note background.
pub const DEFAULT_STICKY_FILL: &str = "#FFEB3B";

/// Colors cycled by `cycle_fill`.
pub const FILL_PALETTE: [&str; 8] =
    ["#D94B4B", "#F28C28", "#FFEB3B", "#4CAF50", "#2196F3", "#9C27B0", "#1F1A17", "#FFFFFF"];

/// Degrees added by one rotate step.
pub const ROTATE_STEP_DEGREES: f64 = 45.0;

/// Size of a text object created from pasted plain text.
pub const PASTED_TEXT_SIZE: (f64, f64) = (240.0, 60.0);

/// Size of an embed created from a pasted video URL (16:9).
pub const EMBED_SIZE: (f64, f64) = (480.0, 270.0);

// ── Ingestion ───────────────────────────────────────────────────

/// Largest side of an ingested image after downscaling, in world units.
pub const MAX_IMAGE_DIMENSION: u32 = 500;

// ── Timing ──────────────────────────────────────────────────────

/// Duration of the eased zoom-to-point animation.
pub const ZOOM_ANIMATION_MS: u64 = 200;

/// Duration of the eased rotate animation.
pub const ROTATE_ANIMATION_MS: u64 = 250;

/// How long a transient notice stays visible.
pub const NOTICE_TTL_MS: u64 = 3000;
