#![allow(clippy::float_cmp)]

use super::*;
use crate::doc::ObjectId;

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn rect(id: &str, x: f64, y: f64, w: f64, h: f64) -> CanvasObject {
    CanvasObject::rectangle(pt(x, y), w, h).with_id(ObjectId::from(id))
}

// =============================================================
// Bounding boxes
// =============================================================

#[test]
fn box_contains_interior_and_edges() {
    let r = rect("aaaaaaaa1", 10.0, 10.0, 100.0, 50.0);
    assert!(object_contains(&r, pt(50.0, 30.0)));
    assert!(object_contains(&r, pt(10.0, 10.0)));
    assert!(object_contains(&r, pt(110.0, 60.0)));
    assert!(!object_contains(&r, pt(110.1, 30.0)));
    assert!(!object_contains(&r, pt(50.0, 9.9)));
}

#[test]
fn rotation_is_ignored_for_boxes() {
    let mut r = rect("aaaaaaaa1", 0.0, 0.0, 100.0, 20.0);
    r.rotation = 90.0;
    assert!(object_contains(&r, pt(90.0, 10.0)));
}

#[test]
fn topmost_wins_on_overlap() {
    let objects = vec![rect("bottom001", 0.0, 0.0, 100.0, 100.0), rect("top000001", 50.0, 50.0, 100.0, 100.0)];
    let hit = hit_test(pt(75.0, 75.0), &objects).unwrap();
    assert_eq!(hit.id.as_str(), "top000001");
    let hit = hit_test(pt(25.0, 25.0), &objects).unwrap();
    assert_eq!(hit.id.as_str(), "bottom001");
}

#[test]
fn empty_space_misses() {
    let objects = vec![rect("aaaaaaaa1", 0.0, 0.0, 20.0, 20.0)];
    assert!(hit_test(pt(500.0, 500.0), &objects).is_none());
    assert!(hit_test(pt(0.0, 0.0), &[]).is_none());
}

#[test]
fn locked_objects_are_hittable() {
    let objects = vec![rect("aaaaaaaa1", 0.0, 0.0, 50.0, 50.0).with_locked(true)];
    assert!(hit_test(pt(10.0, 10.0), &objects).is_some());
}

// =============================================================
// Segments
// =============================================================

#[test]
fn near_segment_within_threshold() {
    assert!(near_segment(pt(50.0, 4.0), pt(0.0, 0.0), pt(100.0, 0.0), 5.0));
    assert!(near_segment(pt(50.0, -5.0), pt(0.0, 0.0), pt(100.0, 0.0), 5.0));
    assert!(!near_segment(pt(50.0, 6.0), pt(0.0, 0.0), pt(100.0, 0.0), 5.0));
}

#[test]
fn near_segment_clips_past_endpoints() {
    // On the infinite line but beyond the grown bbox.
    assert!(!near_segment(pt(120.0, 0.0), pt(0.0, 0.0), pt(100.0, 0.0), 5.0));
    assert!(near_segment(pt(104.0, 0.0), pt(0.0, 0.0), pt(100.0, 0.0), 5.0));
}

#[test]
fn near_segment_diagonal() {
    // Distance from (0,10) to y=x is 10/sqrt(2) ≈ 7.07.
    assert!(!near_segment(pt(0.0, 10.0), pt(0.0, 0.0), pt(100.0, 100.0), 5.0));
    assert!(near_segment(pt(50.0, 53.0), pt(0.0, 0.0), pt(100.0, 100.0), 5.0));
}

#[test]
fn near_segment_degenerate_uses_point_distance() {
    assert!(near_segment(pt(3.0, 4.0), pt(0.0, 0.0), pt(0.0, 0.0), 5.0));
    assert!(!near_segment(pt(4.0, 4.0), pt(0.0, 0.0), pt(0.0, 0.0), 5.0));
}

#[test]
fn polyline_hits_any_segment() {
    let line = CanvasObject::line(vec![pt(0.0, 0.0), pt(100.0, 0.0), pt(100.0, 100.0)]);
    assert!(object_contains(&line, pt(98.0, 50.0)));
    assert!(!object_contains(&line, pt(50.0, 50.0)));
}

#[test]
fn arrow_hit_is_scale_independent() {
    let objects = vec![CanvasObject::arrow(pt(0.0, 0.0), pt(100.0, 0.0))];
    assert!(hit_test(pt(50.0, 5.0), &objects).is_some());
    assert!(hit_test(pt(50.0, 5.5), &objects).is_none());
}

// =============================================================
// Handles
// =============================================================

#[test]
fn handles_sit_on_padded_corners() {
    let r = rect("aaaaaaaa1", 0.0, 0.0, 100.0, 50.0);
    let handles = handle_positions(&r).unwrap();
    assert_eq!(handles[0], (ResizeHandle::Nw, pt(-HANDLE_PADDING, -HANDLE_PADDING)));
    assert_eq!(handles[2], (ResizeHandle::Se, pt(100.0 + HANDLE_PADDING, 50.0 + HANDLE_PADDING)));
}

#[test]
fn strokes_have_no_handles() {
    let line = CanvasObject::line(vec![pt(0.0, 0.0), pt(100.0, 0.0)]);
    assert!(handle_positions(&line).is_none());
    assert!(hit_handle(&line, pt(0.0, 0.0), &ViewTransform::default()).is_none());
}

#[test]
fn handle_radius_shrinks_with_zoom() {
    let r = rect("aaaaaaaa1", 0.0, 0.0, 100.0, 50.0);
    let se = pt(104.0, 54.0);
    let probe = se.translated(8.0, 0.0);
    assert_eq!(hit_handle(&r, probe, &ViewTransform::default()), Some(ResizeHandle::Se));
    let zoomed = ViewTransform::new(2.0, Point::default());
    assert_eq!(hit_handle(&r, probe, &zoomed), None);
}

#[test]
fn hit_at_prefers_selected_handle() {
    let mut doc = DocStore::new();
    doc.insert(rect("aaaaaaaa1", 0.0, 0.0, 100.0, 50.0));
    doc.insert(rect("aaaaaaaa2", 90.0, 40.0, 100.0, 100.0));
    let id = ObjectId::from("aaaaaaaa1");
    let view = ViewTransform::default();
    let hit = hit_at(pt(104.0, 54.0), &doc, &view, Some(&id));
    assert_eq!(hit, Some(Hit::Handle(id, ResizeHandle::Se)));
    let hit = hit_at(pt(104.0, 54.0), &doc, &view, None);
    assert_eq!(hit, Some(Hit::Object(ObjectId::from("aaaaaaaa2"))));
}

#[test]
fn handle_signs() {
    assert_eq!(ResizeHandle::Nw.sign_x(), -1.0);
    assert_eq!(ResizeHandle::Nw.sign_y(), -1.0);
    assert_eq!(ResizeHandle::Se.sign_x(), 1.0);
    assert_eq!(ResizeHandle::Sw.sign_y(), 1.0);
    assert_eq!(ResizeHandle::Ne.cursor(), "nesw-resize");
}
