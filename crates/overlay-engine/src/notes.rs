//! Note store interface
//!
//! Notes live outside the engine. The engine only defines how they are keyed:
//! by document id plus the `type-start` annotation identifier, which stays the
//! key even when highlights use a different identifier scheme.

use shared_types::{Annotation, Note, NoteKey};
use std::collections::HashMap;

use crate::error::NoteError;
use crate::identity::annotation_identifier;

/// Key for the note attached to `annotation`, if it is addressable
pub fn note_key(document_id: &str, annotation: &Annotation) -> Option<NoteKey> {
    annotation_identifier(annotation).map(|id| NoteKey::new(document_id, &id))
}

pub trait NoteStore {
    fn get(&self, key: &NoteKey) -> Result<Option<Note>, NoteError>;

    /// Create the note, or update its text if it exists
    fn save(&mut self, key: &NoteKey, text: &str) -> Result<Note, NoteError>;

    /// Returns whether a note was removed
    fn delete(&mut self, key: &NoteKey) -> Result<bool, NoteError>;
}

#[derive(Debug, Default, Clone)]
pub struct MemoryNoteStore {
    notes: HashMap<NoteKey, Note>,
}

impl MemoryNoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
}

impl NoteStore for MemoryNoteStore {
    fn get(&self, key: &NoteKey) -> Result<Option<Note>, NoteError> {
        Ok(self.notes.get(key).cloned())
    }

    fn save(&mut self, key: &NoteKey, text: &str) -> Result<Note, NoteError> {
        let note = match self.notes.get_mut(key) {
            Some(existing) => {
                existing.update_text(text);
                existing.clone()
            }
            None => {
                let note = Note::new(text);
                self.notes.insert(key.clone(), note.clone());
                note
            }
        };
        Ok(note)
    }

    fn delete(&mut self, key: &NoteKey) -> Result<bool, NoteError> {
        Ok(self.notes.remove(key).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::TextPosition;

    #[test]
    fn test_note_key_uses_legacy_identifier() {
        let annotation = Annotation::detected(
            "governing_law",
            "laws of Delaware",
            Some(TextPosition::new(30, 52)),
            90.0,
            "r",
        );
        let key = note_key("doc-1", &annotation).unwrap();
        assert_eq!(key, NoteKey::new("doc-1", "governing-law-30"));
    }

    #[test]
    fn test_save_then_update() {
        let mut store = MemoryNoteStore::new();
        let key = NoteKey::new("doc-1", "indemnity-4");

        let created = store.save(&key, "Check cap").unwrap();
        let updated = store.save(&key, "Check cap and carve-outs").unwrap();

        assert_eq!(created.id, updated.id);
        assert_eq!(store.len(), 1);
        assert_eq!(
            store.get(&key).unwrap().map(|n| n.text),
            Some("Check cap and carve-outs".to_string())
        );
    }

    #[test]
    fn test_delete() {
        let mut store = MemoryNoteStore::new();
        let key = NoteKey::new("doc-1", "indemnity-4");
        store.save(&key, "x").unwrap();

        assert!(store.delete(&key).unwrap());
        assert!(!store.delete(&key).unwrap());
        assert!(store.get(&key).unwrap().is_none());
    }
}
