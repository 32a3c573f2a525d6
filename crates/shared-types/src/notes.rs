//! Reviewer notes attached to annotations

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Storage key for a note: one note per annotation per document
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NoteKey {
    pub document_id: String,
    pub annotation_id: String,
}

impl NoteKey {
    pub fn new(document_id: &str, annotation_id: &str) -> Self {
        Self {
            document_id: document_id.to_string(),
            annotation_id: annotation_id.to_string(),
        }
    }

    /// Flat string form used by key-value backends
    pub fn storage_key(&self) -> String {
        format!("clause-note:{}:{}", self.document_id, self.annotation_id)
    }
}

/// A free-text note about one annotation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    pub text: String,
    pub created_at: String,
    pub updated_at: String,
}

impl Note {
    /// Create a new note stamped with the current time
    pub fn new(text: &str) -> Self {
        let now = Utc::now().to_rfc3339();
        Self {
            id: Uuid::new_v4().to_string(),
            text: text.to_string(),
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Replace the text, keeping identity and creation time
    pub fn update_text(&mut self, text: &str) {
        self.text = text.to_string();
        self.updated_at = Utc::now().to_rfc3339();
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
