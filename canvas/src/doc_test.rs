#![allow(clippy::clone_on_copy, clippy::float_cmp)]

use serde_json::json;

use super::*;

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn rect_at(id: &str, x: f64, y: f64) -> CanvasObject {
    CanvasObject::rectangle(pt(x, y), 100.0, 80.0).with_id(ObjectId::from(id))
}

fn store_with(objects: Vec<CanvasObject>) -> DocStore {
    let mut store = DocStore::new();
    store.load_snapshot(objects);
    store
}

fn ids(store: &DocStore) -> Vec<&str> {
    store.objects().iter().map(|o| o.id.as_str()).collect()
}

// =============================================================
// ObjectId
// =============================================================

#[test]
fn generated_ids_are_nine_alphanumerics() {
    for _ in 0..50 {
        let id = ObjectId::generate();
        assert!(ObjectId::is_valid(id.as_str()), "{id}");
    }
}

#[test]
fn id_validation_rejects_bad_shapes() {
    assert!(ObjectId::is_valid("abcDEF123"));
    assert!(!ObjectId::is_valid("abcDEF12"));
    assert!(!ObjectId::is_valid("abcDEF1234"));
    assert!(!ObjectId::is_valid("abc-EF123"));
    assert!(!ObjectId::is_valid(""));
}

// =============================================================
// ObjectKind / FontWeight
// =============================================================

#[test]
fn kind_parse_matches_as_str() {
    for kind in ObjectKind::ALL {
        assert_eq!(ObjectKind::parse(kind.as_str()), Some(kind));
    }
    assert_eq!(ObjectKind::parse("hexagon"), None);
}

#[test]
fn kind_serde_uses_lowercase_names() {
    assert_eq!(serde_json::to_string(&ObjectKind::Sticky).unwrap(), "\"sticky\"");
    let back: ObjectKind = serde_json::from_str("\"arrow\"").unwrap();
    assert_eq!(back, ObjectKind::Arrow);
}

#[test]
fn kind_predicates() {
    assert!(ObjectKind::Line.is_stroke());
    assert!(!ObjectKind::Rectangle.is_stroke());
    assert!(ObjectKind::Image.keeps_aspect());
    assert!(ObjectKind::Embed.keeps_aspect());
    assert!(!ObjectKind::Sticky.keeps_aspect());
    assert!(ObjectKind::Sticky.has_text());
}

#[test]
fn font_weight_cycles_through_nine_steps() {
    let mut w = FontWeight::THIN;
    let mut seen = vec![w.value()];
    for _ in 0..9 {
        w = w.next();
        seen.push(w.value());
    }
    assert_eq!(seen, vec![100, 200, 300, 400, 500, 600, 700, 800, 900, 100]);
}

#[test]
fn font_weight_rejects_off_grid_values() {
    assert!(FontWeight::try_from(450).is_err());
    assert!(FontWeight::try_from(0).is_err());
    assert!(FontWeight::try_from(1000).is_err());
    assert_eq!(FontWeight::try_from(700).unwrap(), FontWeight::BOLD);
    assert!(serde_json::from_value::<FontWeight>(json!(550)).is_err());
}

// =============================================================
// Wire format
// =============================================================

#[test]
fn text_object_serializes_flat_with_type_tag() {
    let obj = CanvasObject::text(pt(1.0, 2.0), 120.0, 40.0, "hi").with_id(ObjectId::from("abcdefghi"));
    let value = serde_json::to_value(&obj).unwrap();
    assert_eq!(value["type"], "text");
    assert_eq!(value["id"], "abcdefghi");
    assert_eq!(value["position"], json!({ "x": 1.0, "y": 2.0 }));
    assert_eq!(value["text"], "hi");
    assert_eq!(value["fontSize"], 24.0);
    assert_eq!(value["weight"], 400);
    assert_eq!(value["italic"], false);
}

#[test]
fn rectangle_deserializes_with_defaults() {
    let value = json!({
        "id": "rect00001",
        "type": "rectangle",
        "position": { "x": 5, "y": 6 },
        "width": 30,
        "height": 40,
        "fill": "#fff"
    });
    let obj: CanvasObject = serde_json::from_value(value).unwrap();
    assert_eq!(obj.kind(), ObjectKind::Rectangle);
    assert_eq!(obj.position, pt(5.0, 6.0));
    assert_eq!(obj.rotation, 0.0);
    assert!(!obj.locked);
}

#[test]
fn arrow_deserializes_points_and_line_width() {
    let value = json!({
        "id": "arrow0001",
        "type": "arrow",
        "position": { "x": 0, "y": 0 },
        "width": 10,
        "height": 10,
        "fill": "#000",
        "points": [{ "x": 0, "y": 0 }, { "x": 10, "y": 10 }],
        "lineWidth": 6
    });
    let obj: CanvasObject = serde_json::from_value(value).unwrap();
    assert_eq!(obj.points().unwrap().len(), 2);
    match &obj.body {
        ObjectBody::Arrow(stroke) => assert_eq!(stroke.line_width, 6.0),
        other => panic!("expected arrow, got {other:?}"),
    }
}

#[test]
fn unknown_type_fails_to_deserialize() {
    let value = json!({
        "id": "x00000001",
        "type": "hexagon",
        "position": { "x": 0, "y": 0 },
        "width": 10,
        "height": 10,
        "fill": "#000"
    });
    assert!(serde_json::from_value::<CanvasObject>(value).is_err());
}

#[test]
fn image_object_round_trips_through_json() {
    let obj = CanvasObject::image(pt(0.0, 0.0), 50.0, 25.0, "data:image/png;base64,AA==".into(), None);
    let text = serde_json::to_string(&obj).unwrap();
    assert!(!text.contains("originalUrl"));
    let back: CanvasObject = serde_json::from_str(&text).unwrap();
    assert_eq!(back, obj);
}

// =============================================================
// Constructors and geometry
// =============================================================

#[test]
fn box_constructors_respect_min_size() {
    let obj = CanvasObject::rectangle(pt(0.0, 0.0), 5.0, 1.0);
    assert_eq!(obj.width, MIN_SIZE);
    assert_eq!(obj.height, MIN_SIZE);
}

#[test]
fn line_bounds_come_from_points() {
    let obj = CanvasObject::line(vec![pt(10.0, 50.0), pt(40.0, 20.0), pt(25.0, 70.0)]);
    assert_eq!(obj.position, pt(10.0, 20.0));
    assert_eq!(obj.width, 30.0);
    assert_eq!(obj.height, 50.0);
}

#[test]
fn move_to_carries_stroke_points() {
    let mut obj = CanvasObject::arrow(pt(10.0, 10.0), pt(30.0, 50.0));
    obj.move_to(pt(0.0, 0.0));
    assert_eq!(obj.points().unwrap(), &[pt(0.0, 0.0), pt(20.0, 40.0)]);
    assert_eq!(obj.position, pt(0.0, 0.0));
}

#[test]
fn normalize_rotation_wraps() {
    assert_eq!(normalize_rotation(370.0), 10.0);
    assert_eq!(normalize_rotation(-90.0), 270.0);
    assert_eq!(normalize_rotation(360.0), 0.0);
    assert_eq!(normalize_rotation(f64::INFINITY), 0.0);
}

// =============================================================
// DocStore: insert / remove
// =============================================================

#[test]
fn insert_appends_on_top() {
    let store = store_with(vec![rect_at("aaaaaaaa1", 0.0, 0.0), rect_at("aaaaaaaa2", 5.0, 5.0)]);
    assert_eq!(ids(&store), vec!["aaaaaaaa1", "aaaaaaaa2"]);
}

#[test]
fn insert_rejects_duplicate_id() {
    let mut store = store_with(vec![rect_at("aaaaaaaa1", 0.0, 0.0)]);
    assert!(!store.insert(rect_at("aaaaaaaa1", 50.0, 50.0)));
    assert_eq!(store.len(), 1);
    assert_eq!(store.get(&ObjectId::from("aaaaaaaa1")).unwrap().position, pt(0.0, 0.0));
}

#[test]
fn remove_many_keeps_order_of_survivors() {
    let mut store = store_with(vec![
        rect_at("aaaaaaaa1", 0.0, 0.0),
        rect_at("aaaaaaaa2", 0.0, 0.0),
        rect_at("aaaaaaaa3", 0.0, 0.0),
    ]);
    let removed = store.remove_many(&[ObjectId::from("aaaaaaaa2")]);
    assert_eq!(removed.len(), 1);
    assert_eq!(ids(&store), vec!["aaaaaaaa1", "aaaaaaaa3"]);
}

#[test]
fn clear_reports_change_only_when_not_empty() {
    let mut store = store_with(vec![rect_at("aaaaaaaa1", 0.0, 0.0)]);
    assert!(store.clear());
    assert!(!store.clear());
    assert!(store.is_empty());
}

// =============================================================
// DocStore: update
// =============================================================

#[test]
fn update_merges_patch() {
    let mut store = store_with(vec![rect_at("aaaaaaaa1", 0.0, 0.0)]);
    let id = ObjectId::from("aaaaaaaa1");
    let patch = ObjectPatch { position: Some(pt(7.0, 8.0)), fill: Some("#00f".into()), ..Default::default() };
    assert!(store.update(&id, &patch));
    let obj = store.get(&id).unwrap();
    assert_eq!(obj.position, pt(7.0, 8.0));
    assert_eq!(obj.fill, "#00f");
    assert_eq!(obj.width, 100.0);
}

#[test]
fn update_missing_id_is_noop() {
    let mut store = store_with(vec![rect_at("aaaaaaaa1", 0.0, 0.0)]);
    let before = store.clone();
    let patch = ObjectPatch { fill: Some("#000".into()), ..Default::default() };
    assert!(!store.update(&ObjectId::from("zzzzzzzzz"), &patch));
    assert_eq!(store, before);
}

#[test]
fn update_clamps_box_size() {
    let mut store = store_with(vec![rect_at("aaaaaaaa1", 0.0, 0.0)]);
    let id = ObjectId::from("aaaaaaaa1");
    let patch = ObjectPatch { width: Some(3.0), height: Some(-10.0), ..Default::default() };
    assert!(store.update(&id, &patch));
    let obj = store.get(&id).unwrap();
    assert_eq!(obj.width, MIN_SIZE);
    assert_eq!(obj.height, MIN_SIZE);
}

#[test]
fn locked_object_rejects_geometry_but_accepts_style() {
    let mut store = store_with(vec![rect_at("aaaaaaaa1", 0.0, 0.0).with_locked(true)]);
    let id = ObjectId::from("aaaaaaaa1");
    let before = store.get(&id).unwrap().clone();

    let moved = ObjectPatch { position: Some(pt(50.0, 50.0)), ..Default::default() };
    assert!(!store.update(&id, &moved));
    let resized = ObjectPatch { width: Some(300.0), height: Some(300.0), ..Default::default() };
    assert!(!store.update(&id, &resized));
    assert_eq!(store.get(&id).unwrap(), &before);

    let restyled = ObjectPatch { fill: Some("#123456".into()), ..Default::default() };
    assert!(store.update(&id, &restyled));
    assert_eq!(store.get(&id).unwrap().fill, "#123456");
}

#[test]
fn locked_patch_mixing_geometry_and_style_is_rejected_whole() {
    let mut store = store_with(vec![rect_at("aaaaaaaa1", 0.0, 0.0).with_locked(true)]);
    let id = ObjectId::from("aaaaaaaa1");
    let patch = ObjectPatch { position: Some(pt(1.0, 1.0)), fill: Some("#000".into()), ..Default::default() };
    assert!(!store.update(&id, &patch));
    assert_eq!(store.get(&id).unwrap().fill, DEFAULT_FILL);
}

#[test]
fn update_ignores_fields_for_other_types() {
    let mut store = store_with(vec![rect_at("aaaaaaaa1", 0.0, 0.0)]);
    let id = ObjectId::from("aaaaaaaa1");
    let patch = ObjectPatch { text: Some("nope".into()), line_width: Some(9.0), ..Default::default() };
    assert!(!store.update(&id, &patch));
}

#[test]
fn update_arrow_requires_exactly_two_points() {
    let arrow = CanvasObject::arrow(pt(0.0, 0.0), pt(10.0, 10.0)).with_id(ObjectId::from("arrow0001"));
    let mut store = store_with(vec![arrow]);
    let id = ObjectId::from("arrow0001");
    let three = ObjectPatch { points: Some(vec![pt(0.0, 0.0), pt(5.0, 5.0), pt(9.0, 0.0)]), ..Default::default() };
    assert!(!store.update(&id, &three));
    let two = ObjectPatch { points: Some(vec![pt(0.0, 0.0), pt(40.0, 30.0)]), ..Default::default() };
    assert!(store.update(&id, &two));
    let obj = store.get(&id).unwrap();
    assert_eq!(obj.width, 40.0);
    assert_eq!(obj.height, 30.0);
}

#[test]
fn update_rotation_is_normalized() {
    let mut store = store_with(vec![rect_at("aaaaaaaa1", 0.0, 0.0)]);
    let id = ObjectId::from("aaaaaaaa1");
    let patch = ObjectPatch { rotation: Some(-45.0), ..Default::default() };
    assert!(store.update(&id, &patch));
    assert_eq!(store.get(&id).unwrap().rotation, 315.0);
}

// =============================================================
// DocStore: duplicate / reorder
// =============================================================

#[test]
fn duplicate_offsets_and_rekeys() {
    let mut store = store_with(vec![rect_at("aaaaaaaa1", 10.0, 20.0)]);
    let new_id = store.duplicate(&ObjectId::from("aaaaaaaa1"), pt(40.0, 40.0)).unwrap();
    assert_ne!(new_id.as_str(), "aaaaaaaa1");
    assert!(ObjectId::is_valid(new_id.as_str()));
    assert_eq!(store.get(&new_id).unwrap().position, pt(50.0, 60.0));
    assert_eq!(store.len(), 2);
}

#[test]
fn duplicate_translates_line_points() {
    let line = CanvasObject::line(vec![pt(0.0, 0.0), pt(10.0, 5.0)]).with_id(ObjectId::from("line00001"));
    let mut store = store_with(vec![line]);
    let new_id = store.duplicate(&ObjectId::from("line00001"), pt(40.0, 40.0)).unwrap();
    assert_eq!(store.get(&new_id).unwrap().points().unwrap(), &[pt(40.0, 40.0), pt(50.0, 45.0)]);
}

#[test]
fn duplicate_missing_is_none() {
    let mut store = DocStore::new();
    assert!(store.duplicate(&ObjectId::from("zzzzzzzzz"), pt(40.0, 40.0)).is_none());
}

#[test]
fn reorder_swaps_with_neighbor() {
    let mut store = store_with(vec![
        rect_at("aaaaaaaa1", 0.0, 0.0),
        rect_at("aaaaaaaa2", 0.0, 0.0),
        rect_at("aaaaaaaa3", 0.0, 0.0),
    ]);
    assert!(store.reorder(&ObjectId::from("aaaaaaaa1"), ZDirection::Forward));
    assert_eq!(ids(&store), vec!["aaaaaaaa2", "aaaaaaaa1", "aaaaaaaa3"]);
    assert!(store.reorder(&ObjectId::from("aaaaaaaa3"), ZDirection::Backward));
    assert_eq!(ids(&store), vec!["aaaaaaaa2", "aaaaaaaa3", "aaaaaaaa1"]);
}

#[test]
fn reorder_is_noop_at_boundaries() {
    let mut store = store_with(vec![rect_at("aaaaaaaa1", 0.0, 0.0), rect_at("aaaaaaaa2", 0.0, 0.0)]);
    assert!(!store.reorder(&ObjectId::from("aaaaaaaa2"), ZDirection::Forward));
    assert!(!store.reorder(&ObjectId::from("aaaaaaaa1"), ZDirection::Backward));
    assert_eq!(ids(&store), vec!["aaaaaaaa1", "aaaaaaaa2"]);
}

// =============================================================
// DocStore: toggles and cycles
// =============================================================

#[test]
fn toggle_locked_flips() {
    let mut store = store_with(vec![rect_at("aaaaaaaa1", 0.0, 0.0)]);
    let id = ObjectId::from("aaaaaaaa1");
    assert!(store.toggle_locked(&id));
    assert!(store.get(&id).unwrap().locked);
    assert!(store.toggle_locked(&id));
    assert!(!store.get(&id).unwrap().locked);
}

#[test]
fn toggle_italic_only_for_text_types() {
    let text = CanvasObject::text(pt(0.0, 0.0), 100.0, 40.0, "t").with_id(ObjectId::from("text00001"));
    let mut store = store_with(vec![text, rect_at("aaaaaaaa1", 0.0, 0.0)]);
    assert!(store.toggle_italic(&ObjectId::from("text00001")));
    assert!(store.get(&ObjectId::from("text00001")).unwrap().text_body().unwrap().italic);
    assert!(!store.toggle_italic(&ObjectId::from("aaaaaaaa1")));
}

#[test]
fn cycle_weight_wraps_from_900() {
    let mut text = CanvasObject::sticky(pt(0.0, 0.0), 100.0, 100.0, "s").with_id(ObjectId::from("stick0001"));
    if let ObjectBody::Sticky(body) = &mut text.body {
        body.weight = FontWeight::BLACK;
    }
    let mut store = store_with(vec![text]);
    let id = ObjectId::from("stick0001");
    assert!(store.cycle_weight(&id));
    assert_eq!(store.get(&id).unwrap().text_body().unwrap().weight, FontWeight::THIN);
}

#[test]
fn cycle_fill_walks_palette_and_wraps() {
    let palette = ["#111111", "#222222", "#333333"];
    let mut store = store_with(vec![rect_at("aaaaaaaa1", 0.0, 0.0)]);
    let id = ObjectId::from("aaaaaaaa1");
    store.cycle_fill(&id, &palette);
    assert_eq!(store.get(&id).unwrap().fill, "#111111");
    store.cycle_fill(&id, &palette);
    store.cycle_fill(&id, &palette);
    assert_eq!(store.get(&id).unwrap().fill, "#333333");
    store.cycle_fill(&id, &palette);
    assert_eq!(store.get(&id).unwrap().fill, "#111111");
    assert!(!store.cycle_fill(&id, &[]));
}

#[test]
fn cycle_line_width_only_for_strokes() {
    let line = CanvasObject::line(vec![pt(0.0, 0.0), pt(50.0, 0.0)]).with_id(ObjectId::from("line00001"));
    let mut store = store_with(vec![line, rect_at("aaaaaaaa1", 0.0, 0.0)]);
    let id = ObjectId::from("line00001");
    let widths = crate::consts::LINE_WIDTHS;
    assert!(store.cycle_line_width(&id, &widths));
    match &store.get(&id).unwrap().body {
        ObjectBody::Line(stroke) => assert_eq!(stroke.line_width, 4.0),
        other => panic!("expected line, got {other:?}"),
    }
    for _ in 0..4 {
        store.cycle_line_width(&id, &widths);
    }
    match &store.get(&id).unwrap().body {
        ObjectBody::Line(stroke) => assert_eq!(stroke.line_width, 2.0),
        other => panic!("expected line, got {other:?}"),
    }
    assert!(!store.cycle_line_width(&ObjectId::from("aaaaaaaa1"), &widths));
}

#[test]
fn set_rotation_reports_change() {
    let mut store = store_with(vec![rect_at("aaaaaaaa1", 0.0, 0.0)]);
    let id = ObjectId::from("aaaaaaaa1");
    assert!(store.set_rotation(&id, 720.0 + 30.0));
    assert_eq!(store.get(&id).unwrap().rotation, 30.0);
    assert!(!store.set_rotation(&id, 30.0));
}

#[test]
fn position_taken_is_exact() {
    let store = store_with(vec![rect_at("aaaaaaaa1", 40.0, 40.0)]);
    assert!(store.position_taken(pt(40.0, 40.0)));
    assert!(!store.position_taken(pt(40.0, 40.5)));
}

// =============================================================
// DocStore: snapshots
// =============================================================

#[test]
fn load_snapshot_raises_undersized_boxes() {
    let mut tiny = rect_at("aaaaaaaa1", 0.0, 0.0);
    tiny.width = 5.0;
    tiny.height = -3.0;
    let flat = CanvasObject::line(vec![pt(0.0, 10.0), pt(80.0, 10.0)]).with_id(ObjectId::from("aaaaaaaa2"));

    let store = store_with(vec![tiny, flat]);
    let rect = store.get(&ObjectId::from("aaaaaaaa1")).unwrap();
    assert_eq!((rect.width, rect.height), (MIN_SIZE, MIN_SIZE));
    let line = store.get(&ObjectId::from("aaaaaaaa2")).unwrap();
    assert_eq!((line.width, line.height), (80.0, 0.0));
}
