//! Turning outside content into canvas objects.
//!
//! Covers clipboard pastes (image bytes, video URLs, plain text), dropped
//! image files, and records produced by the generation backend. Everything here
//! is pure: it builds `CanvasObject`s and leaves inserting them, and recording
//! history, to the session.

#[cfg(test)]
#[path = "ingest_test.rs"]
mod ingest_test;

use std::io::Cursor;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};
use serde_json::Value;

use crate::camera::Point;
use crate::consts::{EMBED_SIZE, MAX_IMAGE_DIMENSION, PASTED_TEXT_SIZE};
use crate::doc::{CanvasObject, ObjectId, normalize_rotation};
use crate::schema::{self, SchemaViolation};

/// Errors from ingesting external content.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("nothing to paste")]
    Empty,
    #[error("image could not be decoded: {0}")]
    Decode(#[source] image::ImageError),
    #[error("image could not be encoded: {0}")]
    Encode(#[source] image::ImageError),
    #[error("record {index} failed validation with {} violation(s)", .violations.len())]
    Invalid { index: usize, violations: Vec<SchemaViolation> },
    #[error("record {index} is not a canvas object: {source}")]
    Record {
        index: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// What the host read from the clipboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClipboardContent {
    /// Raw bytes of an image file (PNG, JPEG, GIF, WebP).
    Image(Vec<u8>),
    Text(String),
}

// =============================================================
// Video links
// =============================================================

/// Extract the video id from a YouTube watch, short-link, or shorts URL.
#[must_use]
pub fn youtube_video_id(text: &str) -> Option<String> {
    let trimmed = text.trim();
    let rest = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"))
        .unwrap_or(trimmed);
    let rest = rest.strip_prefix("www.").or_else(|| rest.strip_prefix("m.")).unwrap_or(rest);

    let candidate = if let Some(path) = rest.strip_prefix("youtu.be/") {
        path
    } else if let Some(path) = rest.strip_prefix("youtube.com/shorts/") {
        path
    } else if let Some(query) = rest.strip_prefix("youtube.com/watch?") {
        query.split('&').find_map(|pair| pair.strip_prefix("v="))?
    } else {
        return None;
    };

    let id: String = candidate
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect();
    if id.is_empty() { None } else { Some(id) }
}

/// Embeddable player URL for a video id.
#[must_use]
pub fn youtube_embed_url(video_id: &str) -> String {
    format!("https://www.youtube.com/embed/{video_id}")
}

// =============================================================
// Paste
// =============================================================

/// Object for pasted text: an embed for video links, a text box otherwise.
/// Placed with its top-left corner at `at`.
pub fn object_from_text(text: &str, at: Point) -> Result<CanvasObject, IngestError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(IngestError::Empty);
    }
    if let Some(video_id) = youtube_video_id(trimmed) {
        let (w, h) = EMBED_SIZE;
        return Ok(CanvasObject::embed(at, w, h, youtube_embed_url(&video_id)));
    }
    let (w, h) = PASTED_TEXT_SIZE;
    Ok(CanvasObject::text(at, w, h, trimmed))
}

/// Object for any clipboard payload pasted at `at`.
pub fn object_from_clipboard(content: &ClipboardContent, at: Point) -> Result<CanvasObject, IngestError> {
    match content {
        ClipboardContent::Image(bytes) => ingest_image(bytes, at, None),
        ClipboardContent::Text(text) => object_from_text(text, at),
    }
}

// =============================================================
// Images
// =============================================================

/// Decode an image, shrink it so its larger side is at most
/// `MAX_IMAGE_DIMENSION`, and wrap it as a PNG data URL centered on `center`.
pub fn ingest_image(bytes: &[u8], center: Point, original_url: Option<String>) -> Result<CanvasObject, IngestError> {
    if bytes.is_empty() {
        return Err(IngestError::Empty);
    }
    let decoded = image::load_from_memory(bytes).map_err(IngestError::Decode)?;
    let scaled = if decoded.width().max(decoded.height()) > MAX_IMAGE_DIMENSION {
        decoded.resize(MAX_IMAGE_DIMENSION, MAX_IMAGE_DIMENSION, FilterType::Triangle)
    } else {
        decoded
    };
    let rgba = DynamicImage::ImageRgba8(scaled.to_rgba8());

    let mut png = Cursor::new(Vec::new());
    rgba.write_to(&mut png, ImageFormat::Png).map_err(IngestError::Encode)?;
    let data_url = format!("data:image/png;base64,{}", STANDARD.encode(png.into_inner()));

    let width = f64::from(rgba.width());
    let height = f64::from(rgba.height());
    tracing::debug!(width, height, "image ingested");
    let top_left = center.translated(-width / 2.0, -height / 2.0);
    Ok(CanvasObject::image(top_left, width, height, data_url, original_url))
}

// =============================================================
// Remote records
// =============================================================

/// Build an object from a generated record under a fresh id.
///
/// Whatever id the record carried is replaced so generated objects never
/// collide with existing ones. The record must pass the wire schema, and boxes
/// smaller than the minimum size are enlarged.
pub fn rekey_record(index: usize, record: &Value) -> Result<CanvasObject, IngestError> {
    let mut record = record.clone();
    if let Value::Object(map) = &mut record {
        map.insert("id".to_owned(), Value::String(ObjectId::generate().to_string()));
    }
    let clean = schema::sanitize_object(index, &record).map_err(|violations| IngestError::Invalid { index, violations })?;
    let mut obj: CanvasObject =
        serde_json::from_value(clean).map_err(|source| IngestError::Record { index, source })?;
    obj.rotation = normalize_rotation(obj.rotation);
    obj.recompute_stroke_bounds();
    obj.enforce_min_size();
    Ok(obj)
}
