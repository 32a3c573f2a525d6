use overlay_engine::{
    ActiveFilter, NoteError, NoteStore, OverlayConfig, OverlayEngine, ReviewSession,
    SelectionEvent,
};
use shared_types::{Annotation, ClauseCatalog, Note, NoteKey, StructuredDocument};
use std::collections::BTreeMap;
use wasm_bindgen::prelude::*;

use crate::note_storage::LocalNoteStore;
use crate::parse_json;

/// Clause review state behind the document view: filter toggles, paging,
/// reviewer selections and notes
#[wasm_bindgen]
pub struct ReviewPanel {
    engine: OverlayEngine,
    session: ReviewSession,
    notes: Box<dyn NoteStore>,
    selected: Option<(String, String)>,
}

impl ReviewPanel {
    /// Every catalog type starts enabled
    pub fn new(
        document: StructuredDocument,
        catalog: ClauseCatalog,
        config: OverlayConfig,
        notes: Box<dyn NoteStore>,
    ) -> Self {
        let filter = ActiveFilter::all_from(&catalog);
        Self {
            engine: OverlayEngine::with_config(catalog, config),
            session: ReviewSession::new(document, filter),
            notes,
            selected: None,
        }
    }

    pub fn from_json(
        document_json: &str,
        catalog_json: &str,
        notes: Box<dyn NoteStore>,
    ) -> Result<Self, String> {
        let document: StructuredDocument = parse_json("document", document_json)?;
        let catalog: ClauseCatalog = parse_json("catalog", catalog_json)?;
        Ok(Self::new(document, catalog, OverlayConfig::default(), notes))
    }

    pub fn render(&mut self) -> String {
        self.session.render_or_raw(&self.engine)
    }

    pub fn page_count(&self) -> usize {
        self.session.page_count().unwrap_or(0)
    }

    pub fn set_page(&mut self, page: usize) {
        self.session.set_page(page);
    }

    pub fn toggle_type(&mut self, clause_type: &str) -> bool {
        self.session.toggle_type(clause_type)
    }

    pub fn active_types(&self) -> Vec<String> {
        self.session
            .filter()
            .types()
            .map(|t| t.to_string())
            .collect()
    }

    /// Annotation count per clause type, detected and user-authored together
    pub fn counts(&self) -> BTreeMap<String, usize> {
        let annotations = self.session.annotations();
        annotations
            .clause_types()
            .into_iter()
            .map(|t| {
                let count = annotations.count_of(&t);
                (t.to_string(), count)
            })
            .collect()
    }

    /// Record a reviewer selection; returns the new highlight's identifier
    pub fn add_user_annotation(
        &mut self,
        selection: &SelectionEvent,
        clause_type: &str,
        comment: &str,
    ) -> Result<String, String> {
        let annotation = self
            .session
            .add_user_annotation(selection, clause_type, comment)
            .map_err(|e| e.to_string())?;
        self.engine
            .identifier(annotation)
            .ok_or_else(|| "User annotation has no position".to_string())
    }

    /// Select the annotation behind a clicked highlight
    pub fn select(&mut self, clicked_type: &str, clicked_identifier: &str) -> Option<&Annotation> {
        let found = self
            .session
            .resolve_click(&self.engine, clicked_type, clicked_identifier)
            .is_some();
        self.selected =
            found.then(|| (clicked_type.to_string(), clicked_identifier.to_string()));
        self.selected()
    }

    pub fn selected(&self) -> Option<&Annotation> {
        let (clicked_type, clicked_identifier) = self.selected.as_ref()?;
        self.session
            .resolve_click(&self.engine, clicked_type, clicked_identifier)
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    fn note_key(&self, annotation_id: &str) -> NoteKey {
        NoteKey::new(&self.session.document().id, annotation_id)
    }

    pub fn note(&self, annotation_id: &str) -> Result<Option<Note>, NoteError> {
        self.notes.get(&self.note_key(annotation_id))
    }

    pub fn save_note(&mut self, annotation_id: &str, text: &str) -> Result<Note, NoteError> {
        let key = self.note_key(annotation_id);
        self.notes.save(&key, text)
    }

    pub fn delete_note(&mut self, annotation_id: &str) -> Result<bool, NoteError> {
        let key = self.note_key(annotation_id);
        self.notes.delete(&key)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.session.annotations().iter().collect::<Vec<_>>())
            .unwrap_or_default()
    }
}

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

// WASM bindings
#[wasm_bindgen]
impl ReviewPanel {
    /// Panel over a structured document, with notes kept in localStorage
    #[wasm_bindgen(constructor)]
    pub fn new_wasm(document_json: &str, catalog_json: &str) -> Result<ReviewPanel, JsValue> {
        console_error_panic_hook::set_once();
        let notes = LocalNoteStore::open().map_err(js_error)?;
        Self::from_json(document_json, catalog_json, Box::new(notes)).map_err(js_error)
    }

    #[wasm_bindgen(js_name = render)]
    pub fn render_wasm(&mut self) -> String {
        self.render()
    }

    #[wasm_bindgen(js_name = getPageCount)]
    pub fn get_page_count(&self) -> u32 {
        self.page_count() as u32
    }

    #[wasm_bindgen(js_name = setPage)]
    pub fn set_page_wasm(&mut self, page: u32) {
        self.set_page(page as usize);
    }

    #[wasm_bindgen(js_name = toggleType)]
    pub fn toggle_type_wasm(&mut self, clause_type: &str) -> bool {
        self.toggle_type(clause_type)
    }

    #[wasm_bindgen(js_name = getActiveTypesJson)]
    pub fn get_active_types_json(&self) -> String {
        serde_json::to_string(&self.active_types()).unwrap_or_default()
    }

    #[wasm_bindgen(js_name = getCountsJson)]
    pub fn get_counts_json(&self) -> String {
        serde_json::to_string(&self.counts()).unwrap_or_default()
    }

    #[wasm_bindgen(js_name = getAnnotationsJson)]
    pub fn get_annotations_json(&self) -> String {
        self.to_json()
    }

    #[wasm_bindgen(js_name = addUserAnnotation)]
    pub fn add_user_annotation_wasm(
        &mut self,
        text: &str,
        start: u32,
        end: u32,
        clause_type: &str,
        comment: &str,
    ) -> Result<String, JsValue> {
        let selection = SelectionEvent::new(text, start as usize, end as usize);
        self.add_user_annotation(&selection, clause_type, comment)
            .map_err(|e| JsValue::from_str(&e))
    }

    #[wasm_bindgen(js_name = selectHighlight)]
    pub fn select_highlight(
        &mut self,
        clicked_type: &str,
        clicked_identifier: &str,
    ) -> Option<String> {
        self.select(clicked_type, clicked_identifier)
            .and_then(|annotation| serde_json::to_string(annotation).ok())
    }

    #[wasm_bindgen(js_name = getSelectedJson)]
    pub fn get_selected_json(&self) -> Option<String> {
        self.selected()
            .and_then(|annotation| serde_json::to_string(annotation).ok())
    }

    #[wasm_bindgen(js_name = clearSelection)]
    pub fn clear_selection_wasm(&mut self) {
        self.clear_selection();
    }

    #[wasm_bindgen(js_name = getNoteJson)]
    pub fn get_note_json(&self, annotation_id: &str) -> Result<Option<String>, JsValue> {
        self.note(annotation_id)
            .map_err(js_error)?
            .map(|note| note.to_json())
            .transpose()
            .map_err(js_error)
    }

    #[wasm_bindgen(js_name = saveNote)]
    pub fn save_note_wasm(&mut self, annotation_id: &str, text: &str) -> Result<String, JsValue> {
        let note = self.save_note(annotation_id, text).map_err(js_error)?;
        note.to_json().map_err(js_error)
    }

    #[wasm_bindgen(js_name = deleteNote)]
    pub fn delete_note_wasm(&mut self, annotation_id: &str) -> Result<bool, JsValue> {
        self.delete_note(annotation_id).map_err(js_error)
    }
}
