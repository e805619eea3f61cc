//! End-to-end editing sessions driven through the public API only.

#![allow(clippy::float_cmp)]

use canvas::camera::Point;
use canvas::doc::{ObjectBody, ObjectKind};
use canvas::engine::EditorSession;
use canvas::ingest::ClipboardContent;
use canvas::input::{Button, Key, Modifiers, Tool};
use canvas::schema;

fn drag(s: &mut EditorSession, from: (f64, f64), to: (f64, f64)) {
    s.on_pointer_down(Point::new(from.0, from.1), Button::Primary, Modifiers::default());
    s.on_pointer_move(Point::new(to.0, to.1), Modifiers::default());
    s.on_pointer_up(Point::new(to.0, to.1), Button::Primary, Modifiers::default());
}

fn ctrl() -> Modifiers {
    Modifiers { ctrl: true, ..Default::default() }
}

#[test]
fn draw_paste_share_and_reload() {
    let mut session = EditorSession::new();
    session.set_tool(Tool::Rectangle);
    drag(&mut session, (10.0, 10.0), (110.0, 60.0));
    assert_eq!(session.tool(), Tool::Select);

    session.paste(&ClipboardContent::Text("https://youtu.be/abc123".into()), Point::new(300.0, 300.0));
    assert_eq!(session.objects().len(), 2);

    let rect = &session.objects()[0];
    assert_eq!(rect.kind(), ObjectKind::Rectangle);
    assert_eq!((rect.position.x, rect.position.y, rect.width, rect.height), (10.0, 10.0, 100.0, 50.0));
    let ObjectBody::Embed(embed) = &session.objects()[1].body else {
        panic!("expected an embed");
    };
    assert!(embed.embed_url.contains("abc123"));

    // What the share endpoint would store and hand back.
    let wire = serde_json::to_value(session.objects()).unwrap();
    let reloaded = schema::parse_objects(&wire).unwrap();
    let mut other = EditorSession::new();
    other.load_snapshot(reloaded);
    assert_eq!(other.objects(), session.objects());
    assert!(!other.history().can_undo());
}

#[test]
fn undo_walks_back_to_an_empty_canvas() {
    let mut session = EditorSession::new();
    session.set_tool(Tool::Rectangle);
    drag(&mut session, (0.0, 0.0), (50.0, 50.0));
    session.set_tool(Tool::Circle);
    drag(&mut session, (100.0, 100.0), (160.0, 140.0));
    assert_eq!(session.objects().len(), 2);

    session.on_key_down(&Key::from("z"), ctrl());
    assert_eq!(session.objects().len(), 1);
    session.on_key_down(&Key::from("z"), ctrl());
    assert!(session.objects().is_empty());
    session.on_key_down(&Key::from("z"), ctrl());
    assert!(session.objects().is_empty());

    session.on_key_down(&Key::from("y"), ctrl());
    session.on_key_down(&Key::from("y"), ctrl());
    assert_eq!(session.objects().len(), 2);
    assert_eq!(session.objects()[1].kind(), ObjectKind::Circle);
}

#[test]
fn generated_records_land_as_separate_entries() {
    let records = serde_json::json!([
        {"id": "aaaaaaaa1", "type": "rectangle", "position": {"x": 0, "y": 0}, "width": 40, "height": 40, "fill": "#f00"},
        {"id": "aaaaaaaa2", "type": "circle", "position": {"x": 60, "y": 0}, "width": 40, "height": 40, "fill": "#0f0"}
    ]);
    let mut session = EditorSession::new();
    session.insert_generated(records.as_array().unwrap());
    assert_eq!(session.objects().len(), 2);
    assert!(session.objects().iter().all(|o| o.id.as_str() != "aaaaaaaa1" && o.id.as_str() != "aaaaaaaa2"));

    session.on_key_down(&Key::from("z"), ctrl());
    assert_eq!(session.objects().len(), 1);
}
