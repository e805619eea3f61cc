//! Snapshot history with a cursor.
//!
//! Every entry is a full copy of the object list plus the selection at that
//! moment. Pushing after stepping back drops everything past the cursor, so
//! the history is always a single linear timeline.

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;

use serde::{Deserialize, Serialize};

use crate::doc::{CanvasObject, ObjectId};

/// What kind of mutation produced a history entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryKind {
    Init,
    Create,
    Update,
    Delete,
    Move,
    Resize,
    Copy,
}

/// One snapshot in the history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub kind: HistoryKind,
    pub objects: Vec<CanvasObject>,
    pub selected_object_id: Option<ObjectId>,
}

impl HistoryEntry {
    #[must_use]
    pub fn new(kind: HistoryKind, objects: Vec<CanvasObject>, selected_object_id: Option<ObjectId>) -> Self {
        Self { kind, objects, selected_object_id }
    }
}

/// Linear undo/redo timeline.
///
/// The cursor is always a valid index: construction inserts the `init` entry.
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<HistoryEntry>,
    cursor: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl History {
    /// Start a history with an empty `init` entry.
    #[must_use]
    pub fn new() -> Self {
        Self::with_initial(Vec::new())
    }

    /// Start a history whose `init` entry holds `objects`.
    #[must_use]
    pub fn with_initial(objects: Vec<CanvasObject>) -> Self {
        Self { entries: vec![HistoryEntry::new(HistoryKind::Init, objects, None)], cursor: 0 }
    }

    /// Discard everything and restart from a single `init` entry.
    pub fn reset(&mut self, objects: Vec<CanvasObject>) {
        *self = Self::with_initial(objects);
    }

    /// Truncate past the cursor, append, and advance.
    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(entry);
        self.cursor = self.entries.len() - 1;
        tracing::debug!(cursor = self.cursor, kind = ?self.entries[self.cursor].kind, "history push");
    }

    /// The entry at the cursor.
    #[must_use]
    pub fn current(&self) -> &HistoryEntry {
        &self.entries[self.cursor]
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false: the `init` entry is never removed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    /// Move the cursor one entry back. Returns false at the `init` entry.
    pub fn step_back(&mut self) -> bool {
        if !self.can_undo() {
            return false;
        }
        self.cursor -= 1;
        true
    }

    /// Move the cursor one entry forward. Returns false at the newest entry.
    pub fn step_forward(&mut self) -> bool {
        if !self.can_redo() {
            return false;
        }
        self.cursor += 1;
        true
    }
}
