//! Validation and sanitizing of canvas objects arriving as raw JSON.
//!
//! Used by the backend before storing a shared canvas and before handing
//! generated records to the client. Each object is checked field by field and
//! every problem is reported, not just the first. Fields outside the envelope
//! and the object's own payload are dropped from the sanitized output.

#[cfg(test)]
#[path = "schema_test.rs"]
mod schema_test;

use std::collections::HashSet;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::doc::{CanvasObject, ObjectId, ObjectKind};

/// One problem with one field of one object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("object {index}: {field}: {message}")]
pub struct SchemaViolation {
    /// Position of the object in the submitted array.
    pub index: usize,
    /// Field name, or `""` when the object itself is malformed.
    pub field: String,
    pub message: String,
}

impl SchemaViolation {
    fn new(index: usize, field: &str, message: impl Into<String>) -> Self {
        Self { index, field: field.to_owned(), message: message.into() }
    }
}

const ENVELOPE_FIELDS: [&str; 8] = ["id", "type", "position", "width", "height", "fill", "rotation", "locked"];

/// Whether a field is required or optional in a payload.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Need {
    Required,
    Optional,
}

#[derive(Clone, Copy)]
enum FieldType {
    String,
    Number,
    Bool,
    Weight,
    Points { exactly_two: bool },
}

fn payload_fields(kind: ObjectKind) -> &'static [(&'static str, FieldType, Need)] {
    use FieldType as T;
    use Need::{Optional, Required};
    match kind {
        ObjectKind::Rectangle | ObjectKind::Circle => &[],
        ObjectKind::Text | ObjectKind::Sticky => &[
            ("text", T::String, Optional),
            ("fontSize", T::Number, Optional),
            ("italic", T::Bool, Optional),
            ("weight", T::Weight, Optional),
        ],
        ObjectKind::Line => &[("points", T::Points { exactly_two: false }, Required), ("lineWidth", T::Number, Optional)],
        ObjectKind::Arrow => &[("points", T::Points { exactly_two: true }, Required), ("lineWidth", T::Number, Optional)],
        ObjectKind::Image => &[
            ("imageData", T::String, Required),
            ("originalUrl", T::String, Optional),
            ("circle", T::Bool, Optional),
            ("spoiler", T::Bool, Optional),
        ],
        ObjectKind::Embed => &[("embedUrl", T::String, Required)],
    }
}

fn is_finite_number(value: &Value) -> bool {
    value.as_f64().is_some_and(f64::is_finite)
}

fn is_point(value: &Value) -> bool {
    value.get("x").is_some_and(is_finite_number) && value.get("y").is_some_and(is_finite_number)
}

/// Clean point: only `x` and `y` survive.
fn sanitize_point(value: &Value) -> Value {
    let mut out = Map::new();
    for key in ["x", "y"] {
        if let Some(v) = value.get(key) {
            out.insert(key.to_owned(), v.clone());
        }
    }
    Value::Object(out)
}

fn check_field(index: usize, name: &str, ty: FieldType, value: &Value) -> Result<Value, SchemaViolation> {
    let ok = match ty {
        FieldType::String => value.is_string(),
        FieldType::Number => is_finite_number(value),
        FieldType::Bool => value.is_boolean(),
        FieldType::Weight => {
            let weight = value.as_u64().unwrap_or(0);
            if (100..=900).contains(&weight) && weight % 100 == 0 {
                true
            } else {
                return Err(SchemaViolation::new(index, name, "must be one of 100, 200, …, 900"));
            }
        }
        FieldType::Points { exactly_two } => {
            let Some(points) = value.as_array() else {
                return Err(SchemaViolation::new(index, name, "must be an array of points"));
            };
            if !points.iter().all(is_point) {
                return Err(SchemaViolation::new(index, name, "every point needs numeric x and y"));
            }
            if exactly_two && points.len() != 2 {
                return Err(SchemaViolation::new(index, name, "arrow needs exactly 2 points"));
            }
            if points.len() < 2 {
                return Err(SchemaViolation::new(index, name, "needs at least 2 points"));
            }
            return Ok(Value::Array(points.iter().map(sanitize_point).collect()));
        }
    };
    if ok {
        Ok(value.clone())
    } else {
        let expected = match ty {
            FieldType::String => "must be a string",
            FieldType::Number => "must be a finite number",
            FieldType::Bool => "must be a boolean",
            FieldType::Weight | FieldType::Points { .. } => "has the wrong type",
        };
        Err(SchemaViolation::new(index, name, expected))
    }
}

/// Validate one object and return it with unknown fields stripped.
pub fn sanitize_object(index: usize, value: &Value) -> Result<Value, Vec<SchemaViolation>> {
    let Some(map) = value.as_object() else {
        return Err(vec![SchemaViolation::new(index, "", "must be an object")]);
    };
    let mut errors = Vec::new();
    let mut out = Map::new();

    match map.get("id").and_then(Value::as_str) {
        Some(id) if ObjectId::is_valid(id) => {
            out.insert("id".to_owned(), Value::String(id.to_owned()));
        }
        _ => errors.push(SchemaViolation::new(index, "id", "must be 9 alphanumeric characters")),
    }

    let kind = map.get("type").and_then(Value::as_str).and_then(ObjectKind::parse);
    match kind {
        Some(kind) => {
            out.insert("type".to_owned(), Value::String(kind.as_str().to_owned()));
        }
        None => {
            let allowed: Vec<&str> = ObjectKind::ALL.iter().map(|k| k.as_str()).collect();
            errors.push(SchemaViolation::new(index, "type", format!("must be one of {}", allowed.join(", "))));
        }
    }

    match map.get("position") {
        Some(position) if is_point(position) => {
            out.insert("position".to_owned(), sanitize_point(position));
        }
        _ => errors.push(SchemaViolation::new(index, "position", "must have numeric x and y")),
    }

    for field in ["width", "height"] {
        match map.get(field) {
            Some(v) if is_finite_number(v) && v.as_f64().is_some_and(|n| n >= 0.0) => {
                out.insert(field.to_owned(), v.clone());
            }
            _ => errors.push(SchemaViolation::new(index, field, "must be a non-negative number")),
        }
    }

    match map.get("fill") {
        Some(Value::String(fill)) => {
            out.insert("fill".to_owned(), Value::String(fill.clone()));
        }
        _ => errors.push(SchemaViolation::new(index, "fill", "must be a string")),
    }

    let optional_envelope = [("rotation", FieldType::Number), ("locked", FieldType::Bool)];
    let payload = kind.map_or(&[][..], payload_fields);
    for (name, ty, need) in optional_envelope
        .iter()
        .map(|(name, ty)| (*name, *ty, Need::Optional))
        .chain(payload.iter().copied())
    {
        match map.get(name) {
            None | Some(Value::Null) if need == Need::Optional => {}
            None | Some(Value::Null) => errors.push(SchemaViolation::new(index, name, "is required")),
            Some(value) => match check_field(index, name, ty, value) {
                Ok(clean) => {
                    out.insert(name.to_owned(), clean);
                }
                Err(violation) => errors.push(violation),
            },
        }
    }

    if errors.is_empty() { Ok(Value::Object(out)) } else { Err(errors) }
}

/// Validate an array of objects, reporting every violation.
///
/// Ids must also be unique within the array.
pub fn sanitize_objects(value: &Value) -> Result<Vec<Value>, Vec<SchemaViolation>> {
    let Some(items) = value.as_array() else {
        return Err(vec![SchemaViolation::new(0, "", "content must be an array of objects")]);
    };
    let mut errors = Vec::new();
    let mut clean = Vec::with_capacity(items.len());
    let mut seen = HashSet::new();

    for (index, item) in items.iter().enumerate() {
        match sanitize_object(index, item) {
            Ok(obj) => {
                if let Some(id) = obj.get("id").and_then(Value::as_str) {
                    if !seen.insert(id.to_owned()) {
                        errors.push(SchemaViolation::new(index, "id", "duplicate id"));
                        continue;
                    }
                }
                clean.push(obj);
            }
            Err(mut violations) => errors.append(&mut violations),
        }
    }

    if errors.is_empty() { Ok(clean) } else { Err(errors) }
}

/// Validate and deserialize into typed objects.
pub fn parse_objects(value: &Value) -> Result<Vec<CanvasObject>, Vec<SchemaViolation>> {
    let clean = sanitize_objects(value)?;
    clean
        .into_iter()
        .enumerate()
        .map(|(index, obj)| {
            serde_json::from_value(obj).map_err(|e| vec![SchemaViolation::new(index, "", e.to_string())])
        })
        .collect()
}

/// Names of every field kept for `kind`, envelope first.
#[must_use]
pub fn allowed_fields(kind: ObjectKind) -> Vec<&'static str> {
    ENVELOPE_FIELDS.iter().copied().chain(payload_fields(kind).iter().map(|(name, _, _)| *name)).collect()
}
