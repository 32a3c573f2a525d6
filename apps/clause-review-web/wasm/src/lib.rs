use overlay_engine::{ActiveFilter, AnnotationSet, OverlayConfig, OverlayEngine};
use serde::de::DeserializeOwned;
use shared_types::{Annotation, ClauseCatalog};
use wasm_bindgen::prelude::*;

// Export modules
pub mod note_storage;
pub mod review_panel;

pub use note_storage::LocalNoteStore;
pub use review_panel::ReviewPanel;

pub(crate) fn parse_json<T: DeserializeOwned>(what: &str, json: &str) -> Result<T, String> {
    serde_json::from_str(json).map_err(|e| format!("Failed to parse {}: {}", what, e))
}

fn config_from_json(config_json: Option<&str>) -> Result<OverlayConfig, String> {
    match config_json {
        Some(json) if !json.trim().is_empty() => parse_json("config", json),
        _ => Ok(OverlayConfig::default()),
    }
}

fn engine_from_json(
    catalog_json: &str,
    config_json: Option<&str>,
) -> Result<OverlayEngine, String> {
    let catalog: ClauseCatalog = parse_json("catalog", catalog_json)?;
    Ok(OverlayEngine::with_config(catalog, config_from_json(config_json)?))
}

/// User-authored entries go after the detected ones whatever their position in the array
fn annotation_set_from_json(annotations_json: &str) -> Result<AnnotationSet, String> {
    let annotations: Vec<Annotation> = parse_json("annotations", annotations_json)?;
    let (user, detected): (Vec<_>, Vec<_>) =
        annotations.into_iter().partition(|annotation| annotation.is_user());
    Ok(AnnotationSet::new(detected, user))
}

/// Render highlighted markup from JSON inputs.
///
/// `annotations_json` is one array of annotations; user-authored entries are
/// rendered after the detected ones whatever their position in the array.
pub fn render_overlay_json(
    content: &str,
    annotations_json: &str,
    catalog_json: &str,
    active_types_json: &str,
    config_json: Option<&str>,
    page: Option<usize>,
) -> Result<String, String> {
    let engine = engine_from_json(catalog_json, config_json)?;
    let annotations = annotation_set_from_json(annotations_json)?;
    let filter: ActiveFilter = parse_json("active types", active_types_json)?;

    engine
        .render_overlay(content, &annotations, &filter, page)
        .map_err(|e| format!("Failed to render overlay: {}", e))
}

/// Annotation JSON for a clicked highlight.
///
/// Lookup uses the same ordering and identifier scheme as
/// [`render_overlay_json`] given the same `config_json`.
pub fn resolve_click_json(
    clicked_type: &str,
    clicked_identifier: &str,
    annotations_json: &str,
    config_json: Option<&str>,
) -> Result<Option<String>, String> {
    let engine = OverlayEngine::with_config(ClauseCatalog::new(), config_from_json(config_json)?);
    let annotations = annotation_set_from_json(annotations_json)?;
    engine
        .resolve_click(clicked_type, clicked_identifier, &annotations)
        .map(serde_json::to_string)
        .transpose()
        .map_err(|e| format!("Failed to serialize annotation: {}", e))
}

pub fn annotation_identifier_json(
    annotation_json: &str,
    config_json: Option<&str>,
) -> Result<Option<String>, String> {
    let annotation: Annotation = parse_json("annotation", annotation_json)?;
    let config = config_from_json(config_json)?;
    Ok(overlay_engine::identifier_for(config.identifier_scheme, &annotation))
}

fn default_page_class() -> String {
    OverlayConfig::default().page_class
}

// WASM bindings

#[wasm_bindgen(js_name = renderOverlay)]
pub fn render_overlay_wasm(
    content: &str,
    annotations_json: &str,
    catalog_json: &str,
    active_types_json: &str,
    page: Option<u32>,
) -> Result<String, JsValue> {
    console_error_panic_hook::set_once();
    render_overlay_json(
        content,
        annotations_json,
        catalog_json,
        active_types_json,
        None,
        page.map(|p| p as usize),
    )
    .map_err(|e| JsValue::from_str(&e))
}

/// Same as `renderOverlay` with an explicit overlay configuration object
#[wasm_bindgen(js_name = renderOverlayWithConfig)]
pub fn render_overlay_with_config_wasm(
    content: &str,
    annotations_json: &str,
    catalog_json: &str,
    active_types_json: &str,
    config_json: &str,
    page: Option<u32>,
) -> Result<String, JsValue> {
    console_error_panic_hook::set_once();
    render_overlay_json(
        content,
        annotations_json,
        catalog_json,
        active_types_json,
        Some(config_json),
        page.map(|p| p as usize),
    )
    .map_err(|e| JsValue::from_str(&e))
}

#[wasm_bindgen(js_name = resolveClick)]
pub fn resolve_click_wasm(
    clicked_type: &str,
    clicked_identifier: &str,
    annotations_json: &str,
) -> Result<Option<String>, JsValue> {
    resolve_click_json(clicked_type, clicked_identifier, annotations_json, None)
        .map_err(|e| JsValue::from_str(&e))
}

/// Click lookup for markup rendered by `renderOverlayWithConfig`
#[wasm_bindgen(js_name = resolveClickWithConfig)]
pub fn resolve_click_with_config_wasm(
    clicked_type: &str,
    clicked_identifier: &str,
    annotations_json: &str,
    config_json: &str,
) -> Result<Option<String>, JsValue> {
    resolve_click_json(
        clicked_type,
        clicked_identifier,
        annotations_json,
        Some(config_json),
    )
    .map_err(|e| JsValue::from_str(&e))
}

#[wasm_bindgen(js_name = annotationIdentifier)]
pub fn annotation_identifier_wasm(annotation_json: &str) -> Result<Option<String>, JsValue> {
    annotation_identifier_json(annotation_json, None).map_err(|e| JsValue::from_str(&e))
}

#[wasm_bindgen(js_name = annotationIdentifierWithConfig)]
pub fn annotation_identifier_with_config_wasm(
    annotation_json: &str,
    config_json: &str,
) -> Result<Option<String>, JsValue> {
    annotation_identifier_json(annotation_json, Some(config_json))
        .map_err(|e| JsValue::from_str(&e))
}

#[wasm_bindgen(js_name = toUnderscored)]
pub fn to_underscored_wasm(tag: &str) -> String {
    overlay_engine::to_underscored(tag)
}

#[wasm_bindgen(js_name = toHyphenated)]
pub fn to_hyphenated_wasm(tag: &str) -> String {
    overlay_engine::to_hyphenated(tag)
}

#[wasm_bindgen(js_name = countPages)]
pub fn count_pages_wasm(markup: &str) -> Result<u32, JsValue> {
    overlay_engine::count_pages(markup, &default_page_class())
        .map(|count| count as u32)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Hide every page container except the 1-based `page`
#[wasm_bindgen(js_name = showPage)]
pub fn show_page_wasm(markup: &str, page: u32) -> Result<String, JsValue> {
    overlay_engine::show_page(markup, page as usize, &default_page_class())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const CONTENT: &str =
        r#"<div class="page"><p data-start="0" data-end="29">Tenant shall indemnify owner.</p></div>"#;
    const CATALOG: &str = r##"{"indemnity": {"name": "Indemnity", "color": "#ef4444"}}"##;
    const ANNOTATIONS: &str = r#"[
        {"type": "indemnity", "selected_text": "indemnify", "position": {"start": 13, "end": 22},
         "source": "detected", "confidence": 91.0, "reason": "hold harmless"},
        {"type": "indemnity", "selected_text": "owner", "position": {"start": 23, "end": 28},
         "source": "user", "comment": "Which owner?"}
    ]"#;

    #[test]
    fn test_render_overlay_json() {
        let markup =
            render_overlay_json(CONTENT, ANNOTATIONS, CATALOG, r#"["indemnity"]"#, None, Some(1))
                .unwrap();

        assert!(markup.contains(r#"data-annotation-id="indemnity-13""#));
        assert!(markup.contains(r#"data-annotation-id="indemnity-23""#));
        assert!(markup.contains("user-annotation"));
        assert!(!markup.contains("hidden"));
    }

    #[test]
    fn test_render_overlay_json_respects_filter() {
        let markup = render_overlay_json(CONTENT, ANNOTATIONS, CATALOG, "[]", None, None).unwrap();
        assert_eq!(markup, CONTENT);
    }

    #[test]
    fn test_render_overlay_json_with_config() {
        let markup = render_overlay_json(
            CONTENT,
            ANNOTATIONS,
            CATALOG,
            r#"["indemnity"]"#,
            Some(r#"{"highlight_class": "hl", "tooltips": false}"#),
            None,
        )
        .unwrap();

        assert!(markup.contains(r#"class="hl""#));
        assert!(!markup.contains("title="));
    }

    #[test]
    fn test_render_overlay_json_reports_bad_input() {
        let err = render_overlay_json(CONTENT, "not json", CATALOG, "[]", None, None).unwrap_err();
        assert!(err.starts_with("Failed to parse annotations"));
    }

    #[test]
    fn test_resolve_click_json() {
        let found = resolve_click_json("indemnity", "indemnity-23", ANNOTATIONS, None)
            .unwrap()
            .unwrap();
        let annotation: Annotation = serde_json::from_str(&found).unwrap();
        assert!(annotation.is_user());

        assert_eq!(
            resolve_click_json("indemnity", "indemnity-99", ANNOTATIONS, None).unwrap(),
            None
        );
    }

    #[test]
    fn test_configured_scheme_clicks_through() {
        let config = r#"{"identifier_scheme": "type_start_and_end"}"#;
        let markup = render_overlay_json(
            CONTENT,
            ANNOTATIONS,
            CATALOG,
            r#"["indemnity"]"#,
            Some(config),
            None,
        )
        .unwrap();
        assert!(markup.contains(r#"data-annotation-id="indemnity-13-22""#));

        let found = resolve_click_json("indemnity", "indemnity-13-22", ANNOTATIONS, Some(config))
            .unwrap()
            .unwrap();
        let annotation: Annotation = serde_json::from_str(&found).unwrap();
        assert_eq!(annotation.selected_text, "indemnify");
        assert_eq!(
            resolve_click_json("indemnity", "indemnity-13", ANNOTATIONS, Some(config)).unwrap(),
            None
        );

        let annotation_json = serde_json::to_string(&annotation).unwrap();
        assert_eq!(
            annotation_identifier_json(&annotation_json, Some(config)).unwrap(),
            Some("indemnity-13-22".to_string())
        );
    }

    #[test]
    fn test_escaped_content_renders() {
        let content = r#"<div class="page"><p data-start="0" data-end="29">Smith &amp; Sons shall indemnify.</p></div>"#;
        let annotations = r#"[{"type": "indemnity", "selected_text": "indemnify",
            "position": {"start": 19, "end": 28}, "source": "detected",
            "confidence": 90.0, "reason": "r"}]"#;
        let markup =
            render_overlay_json(content, annotations, CATALOG, r#"["indemnity"]"#, None, Some(1))
                .unwrap();

        assert!(markup.starts_with(
            r#"<div class="page"><p data-start="0" data-end="29">Smith &amp; Sons shall <span"#
        ));
        assert!(markup.contains(r#"data-annotation-id="indemnity-19""#));
        assert!(markup.contains(">indemnify</span>.</p>"));
        assert_eq!(overlay_engine::count_pages(&markup, "page").unwrap(), 1);
    }

    #[test]
    fn test_annotation_identifier_json() {
        let id = annotation_identifier_json(
            r#"{"type": "force_majeure", "position": {"start": 7, "end": 12},
                "source": "detected", "confidence": 60.0, "reason": "r"}"#,
            None,
        )
        .unwrap();
        assert_eq!(id, Some("force-majeure-7".to_string()));
    }

    #[test]
    fn test_tag_conversions() {
        assert_eq!(to_underscored_wasm("force-majeure"), "force_majeure");
        assert_eq!(to_hyphenated_wasm("force_majeure"), "force-majeure");
    }
}
