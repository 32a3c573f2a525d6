//! Reviewer notes persisted in browser localStorage

use overlay_engine::{NoteError, NoteStore};
use shared_types::{Note, NoteKey};
use wasm_bindgen::JsValue;

fn backend_error(value: JsValue) -> NoteError {
    NoteError::Backend(
        value
            .as_string()
            .unwrap_or_else(|| format!("{:?}", value)),
    )
}

/// Notes stored as JSON under `clause-note:<document_id>:<annotation_id>`
pub struct LocalNoteStore {
    storage: web_sys::Storage,
}

impl LocalNoteStore {
    pub fn open() -> Result<Self, NoteError> {
        let window = web_sys::window().ok_or_else(|| NoteError::Backend("No window".to_string()))?;
        let storage = window
            .local_storage()
            .map_err(backend_error)?
            .ok_or_else(|| NoteError::Backend("No localStorage".to_string()))?;
        Ok(Self { storage })
    }
}

impl NoteStore for LocalNoteStore {
    fn get(&self, key: &NoteKey) -> Result<Option<Note>, NoteError> {
        let stored = self
            .storage
            .get_item(&key.storage_key())
            .map_err(backend_error)?;
        Ok(stored.map(|json| Note::from_json(&json)).transpose()?)
    }

    fn save(&mut self, key: &NoteKey, text: &str) -> Result<Note, NoteError> {
        let note = match self.get(key)? {
            Some(mut existing) => {
                existing.update_text(text);
                existing
            }
            None => Note::new(text),
        };
        self.storage
            .set_item(&key.storage_key(), &note.to_json()?)
            .map_err(backend_error)?;
        Ok(note)
    }

    fn delete(&mut self, key: &NoteKey) -> Result<bool, NoteError> {
        let storage_key = key.storage_key();
        let existed = self
            .storage
            .get_item(&storage_key)
            .map_err(backend_error)?
            .is_some();
        if existed {
            self.storage
                .remove_item(&storage_key)
                .map_err(backend_error)?;
        }
        Ok(existed)
    }
}

// Browser-only: needs a real localStorage
#[cfg(test)]
#[cfg(target_arch = "wasm32")]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_notes_persist_in_local_storage() {
        let key = NoteKey::new("lease-wasm", "payment-7");
        let mut store = LocalNoteStore::open().unwrap();
        store.delete(&key).unwrap();

        let created = store.save(&key, "Confirm amount").unwrap();
        let updated = store.save(&key, "Confirm amount & due date").unwrap();
        assert_eq!(created.id, updated.id);

        let reopened = LocalNoteStore::open().unwrap();
        let stored = reopened.get(&key).unwrap().unwrap();
        assert_eq!(stored.text, "Confirm amount & due date");

        assert!(store.delete(&key).unwrap());
        assert!(!store.delete(&key).unwrap());
    }

    #[wasm_bindgen_test]
    fn test_missing_note_is_none() {
        let store = LocalNoteStore::open().unwrap();
        let key = NoteKey::new("lease-wasm", "never-saved-0");
        assert!(store.get(&key).unwrap().is_none());
    }
}
