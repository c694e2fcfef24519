use std::sync::Arc;

use serde_json::{json, Value};

use crate::store::Document;

/// A saved note.
#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    pub id: String,
    pub text: Arc<str>,
}

impl Note {
    pub fn from_document(doc: &Document) -> Option<Self> {
        Some(Self {
            id: doc.id.clone(),
            text: Arc::from(doc.field_str("text")?),
        })
    }

    pub fn payload(text: &str) -> Value {
        json!({ "text": text })
    }
}

/// Per-user notes collection path.
pub fn notes_collection(user_id: &str) -> String {
    format!("users/{user_id}/notes")
}

/// Notepad widget state.
///
/// Mutations follow the optimistic-after-write pattern: the UI spawns
/// the store call and, on success, feeds the result back through
/// [`apply_saved`](Notepad::apply_saved) / [`apply_deleted`](Notepad::apply_deleted)
/// to update the local list — no refetch. Deleted note texts are kept
/// in `history` so the most recent deletion can be undone (re-added as
/// a fresh note).
#[derive(Debug, Default)]
pub struct Notepad {
    pub notes: Vec<Note>,
    pub draft: String,
    /// Index of the note being edited, if the draft is an edit rather
    /// than a new note.
    pub editing: Option<usize>,
    pub history: Vec<Arc<str>>,
    pub selected: usize,
    pub error: Option<String>,
}

impl Notepad {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_notes(&mut self, docs: &[Document]) {
        self.notes = docs.iter().filter_map(Note::from_document).collect();
        self.clamp_selected();
    }

    pub fn selected_note(&self) -> Option<&Note> {
        self.notes.get(self.selected)
    }

    /// Load the selected note into the draft for editing.
    pub fn begin_edit(&mut self) {
        if let Some(note) = self.notes.get(self.selected) {
            self.draft = note.text.to_string();
            self.editing = Some(self.selected);
        }
    }

    pub fn cancel_edit(&mut self) {
        self.draft.clear();
        self.editing = None;
    }

    /// Id of the note the current draft should update, or `None` when
    /// the draft is a new note.
    pub fn editing_id(&self) -> Option<&str> {
        self.editing
            .and_then(|i| self.notes.get(i))
            .map(|n| n.id.as_str())
    }

    /// Apply a confirmed write: replace the edited note or append the
    /// new one, and reset the draft.
    pub fn apply_saved(&mut self, note: Note) {
        match self.notes.iter_mut().find(|n| n.id == note.id) {
            Some(existing) => *existing = note,
            None => self.notes.push(note),
        }
        self.draft.clear();
        self.editing = None;
    }

    /// Apply a confirmed deletion: drop the note and remember its text
    /// for undo.
    pub fn apply_deleted(&mut self, id: &str) {
        if let Some(pos) = self.notes.iter().position(|n| n.id == id) {
            let removed = self.notes.remove(pos);
            self.history.push(removed.text);
            if self.editing == Some(pos) {
                self.cancel_edit();
            }
        }
        self.clamp_selected();
    }

    /// Take the most recently deleted text for re-adding. The caller
    /// writes it to the store; the confirmed note comes back through
    /// [`apply_saved`](Self::apply_saved).
    pub fn undo_candidate(&mut self) -> Option<Arc<str>> {
        self.history.pop()
    }

    pub fn nav_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn nav_down(&mut self) {
        if !self.notes.is_empty() {
            self.selected = (self.selected + 1).min(self.notes.len() - 1);
        }
    }

    fn clamp_selected(&mut self) {
        if self.notes.is_empty() {
            self.selected = 0;
        } else {
            self.selected = self.selected.min(self.notes.len() - 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(id: &str, text: &str) -> Note {
        Note {
            id: id.to_string(),
            text: Arc::from(text),
        }
    }

    #[test]
    fn test_notes_collection_path() {
        assert_eq!(notes_collection("u1"), "users/u1/notes");
    }

    #[test]
    fn test_set_notes_decodes_text_field() {
        let mut pad = Notepad::new();
        pad.set_notes(&[
            Document::new("n1", json!({ "text": "first" })),
            Document::new("n2", json!({ "no_text": true })),
        ]);
        assert_eq!(pad.notes.len(), 1);
        assert_eq!(&*pad.notes[0].text, "first");
    }

    #[test]
    fn test_apply_saved_appends_new_note() {
        let mut pad = Notepad::new();
        pad.draft = "hello".to_string();
        pad.apply_saved(note("n1", "hello"));

        assert_eq!(pad.notes.len(), 1);
        assert!(pad.draft.is_empty());
        assert!(pad.editing.is_none());
    }

    #[test]
    fn test_edit_replaces_in_place() {
        let mut pad = Notepad::new();
        pad.apply_saved(note("n1", "old"));
        pad.apply_saved(note("n2", "other"));

        pad.selected = 0;
        pad.begin_edit();
        assert_eq!(pad.draft, "old");
        assert_eq!(pad.editing_id(), Some("n1"));

        pad.apply_saved(note("n1", "new"));
        assert_eq!(pad.notes.len(), 2);
        assert_eq!(&*pad.notes[0].text, "new");
        assert!(pad.editing.is_none());
    }

    #[test]
    fn test_delete_pushes_history_and_undo() {
        let mut pad = Notepad::new();
        pad.apply_saved(note("n1", "keep me"));
        pad.apply_deleted("n1");

        assert!(pad.notes.is_empty());
        assert_eq!(pad.history.len(), 1);

        let text = pad.undo_candidate().unwrap();
        assert_eq!(&*text, "keep me");
        assert!(pad.history.is_empty());

        // The re-added note comes back with a fresh id
        pad.apply_saved(note("n7", "keep me"));
        assert_eq!(pad.notes.len(), 1);
    }

    #[test]
    fn test_delete_unknown_id_is_noop() {
        let mut pad = Notepad::new();
        pad.apply_saved(note("n1", "a"));
        pad.apply_deleted("ghost");
        assert_eq!(pad.notes.len(), 1);
        assert!(pad.history.is_empty());
    }

    #[test]
    fn test_selection_clamped_after_delete() {
        let mut pad = Notepad::new();
        pad.apply_saved(note("n1", "a"));
        pad.apply_saved(note("n2", "b"));
        pad.selected = 1;
        pad.apply_deleted("n2");
        assert_eq!(pad.selected, 0);
    }
}
