//! Editor session: owns the document, view, selection and history, and
//! reduces input into document mutations.
//!
//! DESIGN
//! ======
//! Every raw event handler (`on_pointer_down`, `on_wheel`, `on_touch_move`, …)
//! translates its event into an `Intent` and hands it to `dispatch`, the one
//! reducer over `InputState`. Drags and resizes edit the live object on every
//! move and keep a copy of the original in the state, so cancel restores it and
//! commit compares against it to decide whether a history entry is due.
//!
//! The mutation API (`add_object`, `update_object`, …) changes the document and
//! hands back the `HistoryEntry` describing the new state, or `None` when
//! nothing changed. Callers push it with `record`. Keyboard shortcuts and
//! pointer commits do that themselves.
//!
//! The session never renders. It returns `Action`s telling the host what
//! changed; the host reads `objects()`, `selection()`, `view()` and `preview()`
//! to draw.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use std::mem;

use serde_json::Value;

use crate::animation::{Animation, Animator};
use crate::camera::{Point, ViewTransform, clamp_scale};
use crate::consts::{DUPLICATE_OFFSET, MIN_SIZE, NOTICE_TTL_MS, WHEEL_ZOOM_STEP};
use crate::doc::{CanvasObject, DocStore, ObjectId, ObjectPatch, ZDirection};
use crate::gesture::{GestureTracker, TouchOutcome};
use crate::hit::{Hit, hit_at};
use crate::history::{History, HistoryEntry, HistoryKind};
use crate::ingest::{self, ClipboardContent};
use crate::input::{Bounds, Button, InputState, Intent, Key, Modifiers, Tool, WheelDelta, draw_bounds, resize_bounds};

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    ObjectCreated(CanvasObject),
    ObjectUpdated(ObjectId),
    ObjectsDeleted(Vec<ObjectId>),
    SelectionChanged,
    /// The host should open its inline editor over this object.
    EditTextRequested(ObjectId),
    Notice(Notice),
    SetCursor(String),
    RenderNeeded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// Transient message shown to the user until `expires_at_ms`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    pub expires_at_ms: u64,
}

/// Inline text edit in progress.
#[derive(Debug, Clone)]
struct TextEdit {
    id: ObjectId,
    origin: CanvasObject,
}

/// One user's editing session over one canvas.
#[derive(Debug, Default)]
pub struct EditorSession {
    doc: DocStore,
    view: ViewTransform,
    tool: Tool,
    input: InputState,
    selection: Vec<ObjectId>,
    history: History,
    editing: Option<TextEdit>,
    preview: Option<CanvasObject>,
    notices: Vec<Notice>,
    animator: Animator,
    gestures: GestureTracker,
    now_ms: u64,
}

impl EditorSession {
    /// Empty canvas, identity view, select tool, history holding only `init`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Queries ---

    #[must_use]
    pub fn doc(&self) -> &DocStore {
        &self.doc
    }

    /// All objects in draw order, bottom first.
    #[must_use]
    pub fn objects(&self) -> &[CanvasObject] {
        self.doc.objects()
    }

    #[must_use]
    pub fn object(&self, id: &ObjectId) -> Option<&CanvasObject> {
        self.doc.get(id)
    }

    #[must_use]
    pub fn selection(&self) -> &[ObjectId] {
        &self.selection
    }

    /// The selected object when exactly one is selected.
    #[must_use]
    pub fn single_selected(&self) -> Option<&ObjectId> {
        match self.selection.as_slice() {
            [only] => Some(only),
            _ => None,
        }
    }

    #[must_use]
    pub fn view(&self) -> ViewTransform {
        self.view
    }

    #[must_use]
    pub fn tool(&self) -> Tool {
        self.tool
    }

    #[must_use]
    pub fn input(&self) -> &InputState {
        &self.input
    }

    /// Uncommitted object being drawn, if any.
    #[must_use]
    pub fn preview(&self) -> Option<&CanvasObject> {
        self.preview.as_ref()
    }

    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Object whose text is being edited inline.
    #[must_use]
    pub fn editing_text(&self) -> Option<&ObjectId> {
        self.editing.as_ref().map(|edit| &edit.id)
    }

    #[must_use]
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    // --- Setup ---

    /// Replace the canvas with a loaded snapshot. History restarts from it.
    pub fn load_snapshot(&mut self, objects: Vec<CanvasObject>) -> Vec<Action> {
        self.input = InputState::Idle;
        self.preview = None;
        self.editing = None;
        self.selection.clear();
        self.animator.cancel_all();
        self.doc.load_snapshot(objects);
        self.history.reset(self.doc.snapshot());
        tracing::debug!(count = self.doc.len(), "snapshot loaded");
        vec![Action::SelectionChanged, Action::RenderNeeded]
    }

    /// Switch tools. Abandons any gesture in progress.
    pub fn set_tool(&mut self, tool: Tool) -> Vec<Action> {
        let mut actions = self.dispatch(Intent::Cancel);
        self.tool = tool;
        let cursor = if tool == Tool::Select { "default" } else { "crosshair" };
        actions.push(Action::SetCursor(cursor.to_owned()));
        actions
    }

    // --- Selection ---

    /// Make `id` the only selected object.
    pub fn select(&mut self, id: &ObjectId) -> bool {
        if !self.doc.contains(id) {
            return false;
        }
        if self.selection.len() == 1 && &self.selection[0] == id {
            return false;
        }
        self.selection = vec![id.clone()];
        true
    }

    /// Add or remove `id` from the selection.
    pub fn toggle_selection(&mut self, id: &ObjectId) -> bool {
        if let Some(idx) = self.selection.iter().position(|s| s == id) {
            self.selection.remove(idx);
            return true;
        }
        if !self.doc.contains(id) {
            return false;
        }
        self.selection.push(id.clone());
        true
    }

    pub fn clear_selection(&mut self) -> bool {
        let had = !self.selection.is_empty();
        self.selection.clear();
        had
    }

    // --- History ---

    fn entry(&self, kind: HistoryKind, selected: Option<ObjectId>) -> HistoryEntry {
        HistoryEntry::new(kind, self.doc.snapshot(), selected)
    }

    /// Push an entry produced by the mutation API.
    pub fn record(&mut self, entry: HistoryEntry) {
        self.history.push(entry);
    }

    fn record_opt(&mut self, entry: Option<HistoryEntry>) -> bool {
        match entry {
            Some(entry) => {
                self.record(entry);
                true
            }
            None => false,
        }
    }

    /// Step the history cursor back and resync from it.
    pub fn undo(&mut self) -> Vec<Action> {
        let mut actions = self.settle_for_history();
        if !self.history.step_back() {
            return actions;
        }
        self.restore_from_history();
        actions.extend([Action::SelectionChanged, Action::RenderNeeded]);
        actions
    }

    /// Step the history cursor forward and resync from it.
    pub fn redo(&mut self) -> Vec<Action> {
        let mut actions = self.settle_for_history();
        if !self.history.step_forward() {
            return actions;
        }
        self.restore_from_history();
        actions.extend([Action::SelectionChanged, Action::RenderNeeded]);
        actions
    }

    /// Abandon gestures, animations and the text editor before moving the cursor.
    fn settle_for_history(&mut self) -> Vec<Action> {
        self.animator.cancel_all();
        let mut actions = self.dispatch(Intent::Cancel);
        actions.extend(self.end_text_edit());
        actions
    }

    fn restore_from_history(&mut self) {
        let current = self.history.current();
        let selected = current.selected_object_id.clone();
        self.doc.load_snapshot(current.objects.clone());
        self.selection = selected.into_iter().filter(|id| self.doc.contains(id)).collect();
        self.preview = None;
        tracing::debug!(cursor = self.history.cursor(), "history restored");
    }

    // --- Mutation API ---

    /// Insert an object on top and select it.
    pub fn add_object(&mut self, obj: CanvasObject) -> Option<HistoryEntry> {
        let id = obj.id.clone();
        if !self.doc.insert(obj) {
            return None;
        }
        self.selection = vec![id.clone()];
        Some(self.entry(HistoryKind::Create, Some(id)))
    }

    pub fn update_object(&mut self, id: &ObjectId, patch: &ObjectPatch) -> Option<HistoryEntry> {
        if !self.doc.update(id, patch) {
            tracing::debug!(%id, "update rejected or no-op");
            return None;
        }
        Some(self.entry(HistoryKind::Update, Some(id.clone())))
    }

    pub fn delete_object(&mut self, id: &ObjectId) -> Option<HistoryEntry> {
        self.delete_objects(std::slice::from_ref(id))
    }

    /// Remove objects and drop them from the selection.
    pub fn delete_objects(&mut self, ids: &[ObjectId]) -> Option<HistoryEntry> {
        let removed = self.doc.remove_many(ids);
        if removed.is_empty() {
            return None;
        }
        self.selection.retain(|id| !ids.contains(id));
        if self.editing.as_ref().is_some_and(|edit| ids.contains(&edit.id)) {
            self.editing = None;
        }
        Some(self.entry(HistoryKind::Delete, None))
    }

    /// Copy an object under a fresh id, offset by `DUPLICATE_OFFSET`, and select the copy.
    pub fn duplicate_object(&mut self, id: &ObjectId) -> Option<HistoryEntry> {
        let new_id = self.doc.duplicate(id, Point::new(DUPLICATE_OFFSET, DUPLICATE_OFFSET))?;
        self.selection = vec![new_id.clone()];
        Some(self.entry(HistoryKind::Copy, Some(new_id)))
    }

    pub fn reorder(&mut self, id: &ObjectId, direction: ZDirection) -> Option<HistoryEntry> {
        self.doc.reorder(id, direction).then(|| self.entry(HistoryKind::Update, Some(id.clone())))
    }

    pub fn toggle_locked(&mut self, id: &ObjectId) -> Option<HistoryEntry> {
        self.doc.toggle_locked(id).then(|| self.entry(HistoryKind::Update, Some(id.clone())))
    }

    pub fn toggle_italic(&mut self, id: &ObjectId) -> Option<HistoryEntry> {
        self.doc.toggle_italic(id).then(|| self.entry(HistoryKind::Update, Some(id.clone())))
    }

    pub fn cycle_weight(&mut self, id: &ObjectId) -> Option<HistoryEntry> {
        self.doc.cycle_weight(id).then(|| self.entry(HistoryKind::Update, Some(id.clone())))
    }

    pub fn cycle_fill(&mut self, id: &ObjectId, palette: &[&str]) -> Option<HistoryEntry> {
        self.doc.cycle_fill(id, palette).then(|| self.entry(HistoryKind::Update, Some(id.clone())))
    }

    pub fn cycle_line_width(&mut self, id: &ObjectId, widths: &[f64]) -> Option<HistoryEntry> {
        self.doc.cycle_line_width(id, widths).then(|| self.entry(HistoryKind::Update, Some(id.clone())))
    }

    /// Rotate by a relative number of degrees, immediately.
    pub fn rotate_by(&mut self, id: &ObjectId, degrees: f64) -> Option<HistoryEntry> {
        let current = self.doc.get(id)?.rotation;
        self.doc.set_rotation(id, current + degrees).then(|| self.entry(HistoryKind::Update, Some(id.clone())))
    }

    /// Remove every object.
    pub fn clear(&mut self) -> Option<HistoryEntry> {
        if !self.doc.clear() {
            return None;
        }
        self.selection.clear();
        self.editing = None;
        Some(self.entry(HistoryKind::Delete, None))
    }

    // --- Selection-level commands ---

    /// Delete everything selected. No-op when the selection is empty or text is being edited.
    pub fn delete_selection(&mut self) -> Vec<Action> {
        if self.selection.is_empty() || self.editing.is_some() {
            return Vec::new();
        }
        let ids = self.selection.clone();
        let entry = self.delete_objects(&ids);
        if !self.record_opt(entry) {
            return Vec::new();
        }
        tracing::debug!(count = ids.len(), "selection deleted");
        vec![Action::ObjectsDeleted(ids), Action::SelectionChanged, Action::RenderNeeded]
    }

    /// Duplicate the selection and select the copies.
    ///
    /// A single copy keeps stepping by `DUPLICATE_OFFSET` while another object
    /// sits at exactly the same position.
    pub fn duplicate_selection(&mut self) -> Vec<Action> {
        if self.selection.is_empty() {
            return Vec::new();
        }
        let offset = Point::new(DUPLICATE_OFFSET, DUPLICATE_OFFSET);
        let sources = self.selection.clone();
        let mut copies = Vec::with_capacity(sources.len());
        for id in &sources {
            if let Some(new_id) = self.doc.duplicate(id, offset) {
                copies.push(new_id);
            }
        }
        if let [only] = copies.as_slice() {
            while let Some(copy) = self.doc.get(only) {
                let position = copy.position;
                let collides = self.doc.objects().iter().any(|o| &o.id != only && o.position == position);
                if !collides {
                    break;
                }
                if let Some(copy) = self.doc.get_mut(only) {
                    copy.translate(offset.x, offset.y);
                }
            }
        }
        if copies.is_empty() {
            return Vec::new();
        }
        self.selection.clone_from(&copies);
        let entry = self.entry(HistoryKind::Copy, copies.first().cloned());
        self.record(entry);

        let mut actions: Vec<Action> = copies
            .iter()
            .filter_map(|id| self.doc.get(id).cloned())
            .map(Action::ObjectCreated)
            .collect();
        actions.extend([Action::SelectionChanged, Action::RenderNeeded]);
        actions
    }

    /// Start an eased rotation of the single selected object.
    pub fn rotate_selection_animated(&mut self, degrees: f64) -> bool {
        let Some(obj) = self.single_selected().and_then(|id| self.doc.get(id)) else {
            return false;
        };
        let animation = Animation::Rotate { id: obj.id.clone(), from: obj.rotation, to: obj.rotation + degrees };
        self.animator.start(animation, self.now_ms)
    }

    /// Start an eased zoom to `scale` around a screen-space anchor.
    pub fn zoom_animated(&mut self, anchor: Point, scale: f64) -> bool {
        let target = clamp_scale(scale);
        let animation = Animation::Zoom { anchor, from: self.view.scale, to: target };
        self.animator.start(animation, self.now_ms)
    }

    // --- Text editing ---

    /// Open the inline editor on a text or sticky object.
    pub fn begin_text_edit(&mut self, id: &ObjectId) -> Vec<Action> {
        let Some(obj) = self.doc.get(id) else {
            return Vec::new();
        };
        if !obj.kind().has_text() {
            return Vec::new();
        }
        let origin = obj.clone();
        let mut actions = self.dispatch(Intent::Cancel);
        actions.extend(self.end_text_edit());
        self.editing = Some(TextEdit { id: id.clone(), origin });
        self.selection = vec![id.clone()];
        actions.extend([Action::EditTextRequested(id.clone()), Action::SelectionChanged]);
        actions
    }

    /// Replace the text of the object being edited. Not recorded until the edit ends.
    pub fn set_text(&mut self, text: &str) -> Vec<Action> {
        let Some(id) = self.editing.as_ref().map(|edit| edit.id.clone()) else {
            return Vec::new();
        };
        let patch = ObjectPatch { text: Some(text.to_owned()), ..ObjectPatch::default() };
        if !self.doc.update(&id, &patch) {
            return Vec::new();
        }
        vec![Action::ObjectUpdated(id), Action::RenderNeeded]
    }

    /// Close the inline editor, recording an `update` if the text changed.
    pub fn end_text_edit(&mut self) -> Vec<Action> {
        let Some(edit) = self.editing.take() else {
            return Vec::new();
        };
        match self.doc.get(&edit.id) {
            Some(obj) if *obj != edit.origin => {
                let entry = self.entry(HistoryKind::Update, Some(edit.id.clone()));
                self.record(entry);
                vec![Action::ObjectUpdated(edit.id), Action::RenderNeeded]
            }
            _ => Vec::new(),
        }
    }

    // --- Notices ---

    /// Queue a transient notice that expires `NOTICE_TTL_MS` after the last tick.
    pub fn notify(&mut self, level: NoticeLevel, message: impl Into<String>) -> Action {
        let notice = Notice { level, message: message.into(), expires_at_ms: self.now_ms + NOTICE_TTL_MS };
        match level {
            NoticeLevel::Error => tracing::warn!(message = %notice.message, "notice"),
            NoticeLevel::Info => tracing::debug!(message = %notice.message, "notice"),
        }
        self.notices.push(notice.clone());
        Action::Notice(notice)
    }

    /// Report a failed external operation: abandon any gesture and show an error notice.
    pub fn fail(&mut self, message: impl Into<String>) -> Vec<Action> {
        let mut actions = self.dispatch(Intent::Cancel);
        actions.push(self.notify(NoticeLevel::Error, message));
        actions
    }

    // --- Clock ---

    /// Advance animations and expire notices. `now_ms` must be monotonic.
    pub fn tick(&mut self, now_ms: u64) -> Vec<Action> {
        self.now_ms = self.now_ms.max(now_ms);
        let mut actions = Vec::new();

        for frame in self.animator.tick(self.now_ms) {
            match frame.animation {
                Animation::Zoom { anchor, .. } => {
                    self.view.zoom_to_point(anchor, frame.value);
                    actions.push(Action::RenderNeeded);
                }
                Animation::Rotate { id, from, .. } => {
                    if !self.doc.set_rotation(&id, frame.value) && !frame.finished {
                        continue;
                    }
                    actions.push(Action::ObjectUpdated(id.clone()));
                    actions.push(Action::RenderNeeded);
                    let moved = self.doc.get(&id).is_some_and(|o| (o.rotation - from).abs() > f64::EPSILON);
                    if frame.finished && moved {
                        let entry = self.entry(HistoryKind::Update, Some(id));
                        self.record(entry);
                    }
                }
            }
        }

        let before = self.notices.len();
        let now = self.now_ms;
        self.notices.retain(|n| n.expires_at_ms > now);
        if self.notices.len() != before {
            actions.push(Action::RenderNeeded);
        }
        actions.dedup();
        actions
    }

    // --- Clipboard and drops ---

    /// Paste clipboard content at a screen point.
    pub fn paste(&mut self, content: &ClipboardContent, screen: Point) -> Vec<Action> {
        let at = self.view.to_world(screen);
        match ingest::object_from_clipboard(content, at) {
            Ok(obj) => self.insert_recorded(obj),
            Err(e) => self.fail(format!("paste failed: {e}")),
        }
    }

    /// Create an image from dropped file bytes, centered on the drop point.
    pub fn drop_image(&mut self, bytes: &[u8], screen: Point) -> Vec<Action> {
        let center = self.view.to_world(screen);
        match ingest::ingest_image(bytes, center, None) {
            Ok(obj) => self.insert_recorded(obj),
            Err(e) => self.fail(format!("image could not be added: {e}")),
        }
    }

    /// Insert generated records, each under a fresh id and as its own `create` entry.
    pub fn insert_generated(&mut self, records: &[Value]) -> Vec<Action> {
        let mut actions = Vec::new();
        for (index, record) in records.iter().enumerate() {
            match ingest::rekey_record(index, record) {
                Ok(obj) => actions.extend(self.insert_recorded(obj)),
                Err(e) => actions.push(self.notify(NoticeLevel::Error, e.to_string())),
            }
        }
        actions
    }

    fn insert_recorded(&mut self, obj: CanvasObject) -> Vec<Action> {
        let created = obj.clone();
        let entry = self.add_object(obj);
        if !self.record_opt(entry) {
            return Vec::new();
        }
        vec![Action::ObjectCreated(created), Action::SelectionChanged, Action::RenderNeeded]
    }

    // --- Raw input ---

    pub fn on_pointer_down(&mut self, screen: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        self.dispatch(Intent::Begin { screen, button, modifiers })
    }

    pub fn on_pointer_move(&mut self, screen: Point, modifiers: Modifiers) -> Vec<Action> {
        self.dispatch(Intent::Move { screen, modifiers })
    }

    pub fn on_pointer_up(&mut self, screen: Point, _button: Button, _modifiers: Modifiers) -> Vec<Action> {
        self.dispatch(Intent::Commit { screen })
    }

    pub fn on_pointer_leave(&mut self) -> Vec<Action> {
        self.dispatch(Intent::Cancel)
    }

    pub fn on_blur(&mut self) -> Vec<Action> {
        self.dispatch(Intent::Cancel)
    }

    /// Ctrl/Cmd + wheel zooms around the pointer; a plain wheel pans.
    pub fn on_wheel(&mut self, screen: Point, delta: WheelDelta, modifiers: Modifiers) -> Vec<Action> {
        if modifiers.command() {
            if delta.dy == 0.0 {
                return Vec::new();
            }
            let factor = if delta.dy < 0.0 { WHEEL_ZOOM_STEP } else { 1.0 / WHEEL_ZOOM_STEP };
            return self.dispatch(Intent::ZoomAt { anchor: screen, scale: self.view.scale * factor });
        }
        self.dispatch(Intent::PanBy { dx: -delta.dx, dy: -delta.dy })
    }

    pub fn on_key_down(&mut self, key: &Key, modifiers: Modifiers) -> Vec<Action> {
        if key.is("Escape") {
            if self.editing.is_some() {
                return self.end_text_edit();
            }
            if self.input.is_active() {
                return self.dispatch(Intent::Cancel);
            }
            return if self.clear_selection() { vec![Action::SelectionChanged, Action::RenderNeeded] } else { Vec::new() };
        }
        // The inline editor owns every other key.
        if self.editing.is_some() {
            return Vec::new();
        }

        if modifiers.command() {
            if (key.is("z") && modifiers.shift) || key.is("y") {
                return self.redo();
            }
            if key.is("z") {
                return self.undo();
            }
            if key.is("c") || key.is("d") {
                if self.input.is_active() {
                    return Vec::new();
                }
                return self.duplicate_selection();
            }
            return Vec::new();
        }

        if key.is("Delete") || key.is("Backspace") {
            if self.input.is_active() {
                return Vec::new();
            }
            return self.delete_selection();
        }
        Vec::new()
    }

    pub fn on_touch_start(&mut self, touch_id: u32, screen: Point) -> Vec<Action> {
        match self.gestures.touch_start(touch_id, screen) {
            TouchOutcome::PointerDown(p) => {
                self.dispatch(Intent::Begin { screen: p, button: Button::Primary, modifiers: Modifiers::default() })
            }
            TouchOutcome::PinchStarted => self.dispatch(Intent::Cancel),
            _ => Vec::new(),
        }
    }

    pub fn on_touch_move(&mut self, touch_id: u32, screen: Point) -> Vec<Action> {
        match self.gestures.touch_move(touch_id, screen) {
            TouchOutcome::PointerMove(p) => self.dispatch(Intent::Move { screen: p, modifiers: Modifiers::default() }),
            TouchOutcome::Pinch { midpoint, ratio, pan } => {
                let mut actions =
                    self.dispatch(Intent::ZoomAt { anchor: midpoint, scale: self.view.scale * ratio });
                actions.extend(self.dispatch(Intent::PanBy { dx: pan.x, dy: pan.y }));
                actions.dedup();
                actions
            }
            _ => Vec::new(),
        }
    }

    pub fn on_touch_end(&mut self, touch_id: u32) -> Vec<Action> {
        match self.gestures.touch_end(touch_id) {
            TouchOutcome::PointerUp(p) => self.dispatch(Intent::Commit { screen: p }),
            _ => Vec::new(),
        }
    }

    pub fn on_touch_cancel(&mut self) -> Vec<Action> {
        self.gestures.reset();
        self.dispatch(Intent::Cancel)
    }

    // --- Reducer ---

    /// Apply one intent to the input state machine.
    pub fn dispatch(&mut self, intent: Intent) -> Vec<Action> {
        match intent {
            Intent::Begin { screen, button, modifiers } => self.begin(screen, button, modifiers),
            Intent::Move { screen, modifiers } => self.move_to(screen, modifiers),
            Intent::Commit { screen } => self.commit(screen),
            Intent::Cancel => self.cancel(),
            Intent::PanBy { dx, dy } => {
                if dx == 0.0 && dy == 0.0 {
                    return Vec::new();
                }
                self.view.pan_by(dx, dy);
                vec![Action::RenderNeeded]
            }
            Intent::ZoomAt { anchor, scale } => {
                let before = self.view;
                self.view.zoom_to_point(anchor, scale);
                if self.view == before { Vec::new() } else { vec![Action::RenderNeeded] }
            }
        }
    }

    fn begin(&mut self, screen: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        let mut actions = Vec::new();
        if self.input.is_active() {
            actions.extend(self.cancel());
        }
        if self.editing.is_some() {
            actions.extend(self.end_text_edit());
        }
        match button {
            Button::Primary => {}
            Button::Middle => {
                self.input = InputState::Panning { last_screen: screen };
                return actions;
            }
            Button::Secondary => return actions,
        }

        let world = self.view.to_world(screen);
        match self.tool {
            Tool::Select => actions.extend(self.begin_select(screen, world, modifiers)),
            Tool::Pen => {
                if self.clear_selection() {
                    actions.push(Action::SelectionChanged);
                }
                self.input = InputState::DrawingFreehand { points: vec![world] };
            }
            tool => {
                if self.clear_selection() {
                    actions.push(Action::SelectionChanged);
                }
                self.input = InputState::DrawingPreview { tool, anchor: world, current: world, shift: modifiers.shift };
                self.preview = build_preview(tool, world, world, modifiers.shift);
                actions.push(Action::RenderNeeded);
            }
        }
        actions
    }

    fn begin_select(&mut self, screen: Point, world: Point, modifiers: Modifiers) -> Vec<Action> {
        let hit = hit_at(world, &self.doc, &self.view, self.single_selected());
        match hit {
            Some(Hit::Handle(id, handle)) => {
                let Some(origin) = self.doc.get(&id).cloned() else {
                    return Vec::new();
                };
                self.input = InputState::Resizing { id, handle, anchor: world, origin: Box::new(origin) };
                vec![Action::SetCursor(handle.cursor().to_owned())]
            }
            Some(Hit::Object(id)) if modifiers.shift => {
                self.toggle_selection(&id);
                vec![Action::SelectionChanged, Action::RenderNeeded]
            }
            Some(Hit::Object(id)) => {
                let Some(origin) = self.doc.get(&id).cloned() else {
                    return Vec::new();
                };
                let mut actions = Vec::new();
                if !self.selection.contains(&id) {
                    self.selection = vec![id.clone()];
                    actions.push(Action::SelectionChanged);
                }
                let grab_offset = world.minus(origin.position);
                self.input = InputState::Dragging { id, grab_offset, origin: Box::new(origin) };
                actions.extend([Action::SetCursor("move".to_owned()), Action::RenderNeeded]);
                actions
            }
            None => {
                let mut actions = Vec::new();
                if self.clear_selection() {
                    actions.extend([Action::SelectionChanged, Action::RenderNeeded]);
                }
                self.input = InputState::Panning { last_screen: screen };
                actions.push(Action::SetCursor("grabbing".to_owned()));
                actions
            }
        }
    }

    fn move_to(&mut self, screen: Point, modifiers: Modifiers) -> Vec<Action> {
        let world = self.view.to_world(screen);
        if !self.input.is_active() {
            return self.hover_cursor(world);
        }
        match &mut self.input {
            InputState::Idle => Vec::new(),
            InputState::Panning { last_screen } => {
                let delta = screen.minus(*last_screen);
                *last_screen = screen;
                self.view.pan_by(delta.x, delta.y);
                vec![Action::RenderNeeded]
            }
            InputState::Dragging { id, grab_offset, origin } => {
                if origin.locked {
                    return Vec::new();
                }
                let target = world.minus(*grab_offset);
                let id = id.clone();
                let Some(obj) = self.doc.get_mut(&id) else {
                    return Vec::new();
                };
                obj.move_to(target);
                vec![Action::ObjectUpdated(id), Action::RenderNeeded]
            }
            InputState::Resizing { id, handle, anchor, origin } => {
                if origin.locked {
                    return Vec::new();
                }
                let start = Bounds { position: origin.position, width: origin.width, height: origin.height };
                let keep_aspect = modifiers.shift || origin.kind().keeps_aspect();
                let delta = world.minus(*anchor);
                let next = resize_bounds(start, *handle, delta.x, delta.y, keep_aspect);
                let id = id.clone();
                let Some(obj) = self.doc.get_mut(&id) else {
                    return Vec::new();
                };
                obj.position = next.position;
                obj.width = next.width;
                obj.height = next.height;
                vec![Action::ObjectUpdated(id), Action::RenderNeeded]
            }
            InputState::DrawingPreview { tool, anchor, current, shift } => {
                *current = world;
                *shift = modifiers.shift;
                self.preview = build_preview(*tool, *anchor, world, modifiers.shift);
                vec![Action::RenderNeeded]
            }
            InputState::DrawingFreehand { points } => {
                if points.last() != Some(&world) {
                    points.push(world);
                }
                self.preview = (points.len() >= 2).then(|| CanvasObject::line(points.clone()));
                vec![Action::RenderNeeded]
            }
        }
    }

    fn hover_cursor(&self, world: Point) -> Vec<Action> {
        if self.tool != Tool::Select {
            return vec![Action::SetCursor("crosshair".to_owned())];
        }
        let cursor = match hit_at(world, &self.doc, &self.view, self.single_selected()) {
            Some(Hit::Handle(_, handle)) => handle.cursor(),
            Some(Hit::Object(_)) => "move",
            None => "default",
        };
        vec![Action::SetCursor(cursor.to_owned())]
    }

    fn commit(&mut self, screen: Point) -> Vec<Action> {
        let state = mem::take(&mut self.input);
        self.preview = None;
        match state {
            InputState::Idle => Vec::new(),
            InputState::Panning { .. } => vec![Action::SetCursor("default".to_owned())],
            InputState::Dragging { id, origin, .. } => self.commit_edit(id, &origin, HistoryKind::Move),
            InputState::Resizing { id, origin, .. } => self.commit_edit(id, &origin, HistoryKind::Resize),
            InputState::DrawingPreview { tool, anchor, shift, .. } => {
                let current = self.view.to_world(screen);
                let Some(obj) = build_preview(tool, anchor, current, shift) else {
                    return vec![Action::RenderNeeded];
                };
                if !meets_minimum(&obj) {
                    tracing::debug!(kind = obj.kind().as_str(), "draw discarded: below minimum size");
                    return vec![Action::RenderNeeded];
                }
                let id = obj.id.clone();
                let mut actions = self.insert_recorded(obj);
                if tool.is_one_shot() {
                    self.tool = Tool::Select;
                    actions.push(Action::SetCursor("default".to_owned()));
                }
                if matches!(tool, Tool::Text | Tool::Sticky) {
                    actions.extend(self.begin_text_edit(&id));
                }
                actions
            }
            InputState::DrawingFreehand { mut points } => {
                let last = self.view.to_world(screen);
                if points.last() != Some(&last) {
                    points.push(last);
                }
                if points.len() < 2 {
                    return vec![Action::RenderNeeded];
                }
                let line = CanvasObject::line(points);
                if !meets_minimum(&line) {
                    tracing::debug!("stroke discarded: below minimum length");
                    return vec![Action::RenderNeeded];
                }
                self.insert_recorded(line)
            }
        }
    }

    fn commit_edit(&mut self, id: ObjectId, origin: &CanvasObject, kind: HistoryKind) -> Vec<Action> {
        let changed = self.doc.get(&id).is_some_and(|obj| obj != origin);
        if !changed {
            return vec![Action::SetCursor("default".to_owned())];
        }
        tracing::debug!(%id, ?kind, "gesture committed");
        let entry = self.entry(kind, Some(id.clone()));
        self.record(entry);
        vec![Action::ObjectUpdated(id), Action::SetCursor("default".to_owned()), Action::RenderNeeded]
    }

    fn cancel(&mut self) -> Vec<Action> {
        let state = mem::take(&mut self.input);
        let had_preview = self.preview.take().is_some();
        match state {
            InputState::Dragging { id, origin, .. } | InputState::Resizing { id, origin, .. } => {
                let changed = self.doc.get(&id).is_some_and(|obj| *obj != *origin);
                if changed && self.doc.replace(*origin) {
                    tracing::debug!(%id, "gesture reverted");
                    return vec![Action::ObjectUpdated(id), Action::RenderNeeded];
                }
                Vec::new()
            }
            InputState::DrawingPreview { .. } | InputState::DrawingFreehand { .. } if had_preview => {
                vec![Action::RenderNeeded]
            }
            _ => Vec::new(),
        }
    }
}

/// The uncommitted object a preview drag from `anchor` to `current` would create.
fn build_preview(tool: Tool, anchor: Point, current: Point, shift: bool) -> Option<CanvasObject> {
    let b = draw_bounds(anchor, current, shift && tool.squares_with_shift());
    let mut obj = match tool {
        Tool::Select | Tool::Pen => return None,
        Tool::Line => return Some(CanvasObject::line(vec![anchor, current])),
        Tool::Arrow => return Some(CanvasObject::arrow(anchor, current)),
        Tool::Rectangle => CanvasObject::rectangle(b.position, b.width, b.height),
        Tool::Circle => CanvasObject::circle(b.position, b.width, b.height),
        Tool::Text => CanvasObject::text(b.position, b.width, b.height, ""),
        Tool::Sticky => CanvasObject::sticky(b.position, b.width, b.height, ""),
    };
    // Constructors clamp to the minimum; a preview shows the true drag size.
    obj.width = b.width;
    obj.height = b.height;
    Some(obj)
}

/// Box kinds need both sides at least `MIN_SIZE`; strokes need that much length.
fn meets_minimum(obj: &CanvasObject) -> bool {
    if obj.kind().is_stroke() {
        obj.extent() >= MIN_SIZE
    } else {
        obj.width >= MIN_SIZE && obj.height >= MIN_SIZE
    }
}
