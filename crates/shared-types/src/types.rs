use std::collections::BTreeMap;
use std::fmt;

/// Confidence reported for user-authored annotations
pub const USER_CONFIDENCE: f64 = 100.0;

/// Reason label reported for user-authored annotations
pub const USER_REASON: &str = "User annotation";

/// Content type of documents whose markup carries offset metadata
pub const STRUCTURED_CONTENT: &str = "structured";

/// Convert a clause type tag to its underscored encoding (`force-majeure` -> `force_majeure`)
pub fn to_underscored(tag: &str) -> String {
    tag.replace('-', "_")
}

/// Convert a clause type tag to its hyphenated encoding (`force_majeure` -> `force-majeure`)
pub fn to_hyphenated(tag: &str) -> String {
    tag.replace('_', "-")
}

/// Clause category tag, always held in hyphenated form.
///
/// The catalog and the analysis provider disagree on separators, so every
/// constructor canonicalizes; comparing two `ClauseType`s never depends on
/// which encoding they arrived in.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(from = "String", into = "String")]
pub struct ClauseType(String);

impl ClauseType {
    pub fn new(tag: &str) -> Self {
        Self(to_hyphenated(tag.trim()))
    }

    /// Hyphenated (canonical) encoding
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Underscored encoding
    pub fn underscored(&self) -> String {
        to_underscored(&self.0)
    }
}

impl From<String> for ClauseType {
    fn from(tag: String) -> Self {
        Self::new(&tag)
    }
}

impl From<&str> for ClauseType {
    fn from(tag: &str) -> Self {
        Self::new(tag)
    }
}

impl From<ClauseType> for String {
    fn from(clause_type: ClauseType) -> Self {
        clause_type.0
    }
}

impl fmt::Display for ClauseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Absolute character range `[start, end)` in the document text
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TextPosition {
    #[serde(alias = "start_offset")]
    pub start: usize,
    #[serde(alias = "end_offset")]
    pub end: usize,
}

impl TextPosition {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// True when the range covers no characters (including inverted ranges)
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }
}

/// Where an annotation came from
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum AnnotationSource {
    /// Produced by the upstream clause classifier
    Detected { confidence: f64, reason: String },
    /// Created by a reviewer from a text selection
    User { comment: String },
}

/// A character-range claim over the document
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Annotation {
    #[serde(rename = "type")]
    pub clause_type: ClauseType,
    #[serde(default)]
    pub selected_text: String,
    #[serde(default)]
    pub position: Option<TextPosition>,
    #[serde(flatten)]
    pub source: AnnotationSource,
}

impl Annotation {
    pub fn detected(
        clause_type: impl Into<ClauseType>,
        selected_text: &str,
        position: Option<TextPosition>,
        confidence: f64,
        reason: &str,
    ) -> Self {
        Self {
            clause_type: clause_type.into(),
            selected_text: selected_text.to_string(),
            position,
            source: AnnotationSource::Detected {
                confidence,
                reason: reason.to_string(),
            },
        }
    }

    pub fn user(
        clause_type: impl Into<ClauseType>,
        selected_text: &str,
        position: TextPosition,
        comment: &str,
    ) -> Self {
        Self {
            clause_type: clause_type.into(),
            selected_text: selected_text.to_string(),
            position: Some(position),
            source: AnnotationSource::User {
                comment: comment.to_string(),
            },
        }
    }

    pub fn is_user(&self) -> bool {
        matches!(self.source, AnnotationSource::User { .. })
    }

    pub fn confidence(&self) -> f64 {
        match &self.source {
            AnnotationSource::Detected { confidence, .. } => *confidence,
            AnnotationSource::User { .. } => USER_CONFIDENCE,
        }
    }

    pub fn reason(&self) -> &str {
        match &self.source {
            AnnotationSource::Detected { reason, .. } => reason,
            AnnotationSource::User { .. } => USER_REASON,
        }
    }

    pub fn comment(&self) -> Option<&str> {
        match &self.source {
            AnnotationSource::User { comment } => Some(comment),
            AnnotationSource::Detected { .. } => None,
        }
    }
}

/// Clause detection as returned by the analysis provider
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ClauseDetection {
    #[serde(rename = "type")]
    pub clause_type: ClauseType,
    #[serde(default)]
    pub selected_text: String,
    #[serde(default)]
    pub position: Option<TextPosition>,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub reason: String,
}

impl From<ClauseDetection> for Annotation {
    fn from(detection: ClauseDetection) -> Self {
        Self {
            clause_type: detection.clause_type,
            selected_text: detection.selected_text,
            position: detection.position,
            source: AnnotationSource::Detected {
                confidence: detection.confidence,
                reason: detection.reason,
            },
        }
    }
}

/// Analysis result: converted markup plus the detected clauses
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct StructuredDocument {
    #[serde(default)]
    pub id: String,
    pub content: String,
    pub content_type: String,
    #[serde(default)]
    pub clauses: Vec<ClauseDetection>,
}

impl StructuredDocument {
    /// Only structured content carries offset metadata that can be overlaid
    pub fn is_structured(&self) -> bool {
        self.content_type == STRUCTURED_CONTENT
    }

    pub fn detected_annotations(&self) -> Vec<Annotation> {
        self.clauses.iter().cloned().map(Annotation::from).collect()
    }
}

/// Display metadata for one clause type
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ClauseInfo {
    pub name: String,
    pub color: String,
}

/// Static mapping from clause type to display name and highlight color
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct ClauseCatalog {
    entries: BTreeMap<ClauseType, ClauseInfo>,
}

impl ClauseCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, clause_type: impl Into<ClauseType>, name: &str, color: &str) {
        self.entries.insert(
            clause_type.into(),
            ClauseInfo {
                name: name.to_string(),
                color: color.to_string(),
            },
        );
    }

    pub fn with(mut self, clause_type: impl Into<ClauseType>, name: &str, color: &str) -> Self {
        self.insert(clause_type, name, color);
        self
    }

    pub fn get(&self, clause_type: &ClauseType) -> Option<&ClauseInfo> {
        self.entries.get(clause_type)
    }

    pub fn types(&self) -> impl Iterator<Item = &ClauseType> {
        self.entries.keys()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Display name, falling back to the tag itself for uncatalogued types
    pub fn display_name(&self, clause_type: &ClauseType) -> String {
        self.get(clause_type)
            .map(|info| info.name.clone())
            .unwrap_or_else(|| clause_type.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encodings_convert_both_ways() {
        assert_eq!(to_underscored("force-majeure"), "force_majeure");
        assert_eq!(to_hyphenated("force_majeure"), "force-majeure");
        assert_eq!(to_hyphenated(&to_underscored("governing-law")), "governing-law");
    }

    #[test]
    fn test_clause_type_canonicalizes() {
        assert_eq!(ClauseType::new("force_majeure"), ClauseType::new("force-majeure"));
        assert_eq!(ClauseType::new(" indemnity ").as_str(), "indemnity");
        assert_eq!(ClauseType::new("non-compete").underscored(), "non_compete");
    }

    #[test]
    fn test_detection_deserializes_underscored_type() {
        let json = r#"{
            "type": "governing_law",
            "selected_text": "laws of Delaware",
            "position": {"start": 30, "end": 52},
            "confidence": 91.5,
            "reason": "Choice of law clause"
        }"#;
        let detection: ClauseDetection = serde_json::from_str(json).unwrap();
        assert_eq!(detection.clause_type.as_str(), "governing-law");

        let annotation = Annotation::from(detection);
        assert_eq!(annotation.position, Some(TextPosition::new(30, 52)));
        assert_eq!(annotation.confidence(), 91.5);
        assert!(!annotation.is_user());
    }

    #[test]
    fn test_detection_without_position() {
        let json =
            r#"{"type": "indemnity", "selected_text": "x", "confidence": 50, "reason": "r"}"#;
        let detection: ClauseDetection = serde_json::from_str(json).unwrap();
        assert!(detection.position.is_none());
    }

    #[test]
    fn test_position_accepts_offset_aliases() {
        let position: TextPosition =
            serde_json::from_str(r#"{"start_offset": 4, "end_offset": 9}"#).unwrap();
        assert_eq!(position, TextPosition::new(4, 9));
        assert_eq!(position.len(), 5);
        assert!(TextPosition::new(9, 4).is_empty());
    }

    #[test]
    fn test_user_annotation_sentinels() {
        let note =
            Annotation::user("termination", "thirty days", TextPosition::new(3, 14), "check");
        assert!(note.is_user());
        assert_eq!(note.confidence(), USER_CONFIDENCE);
        assert_eq!(note.reason(), USER_REASON);
        assert_eq!(note.comment(), Some("check"));
    }

    #[test]
    fn test_annotation_json_carries_source_tag() {
        let note =
            Annotation::user("termination", "thirty days", TextPosition::new(3, 14), "check");
        let json = serde_json::to_string(&note).unwrap();
        assert!(json.contains(r#""source":"user""#));
        assert!(json.contains(r#""type":"termination""#));

        let back: Annotation = serde_json::from_str(&json).unwrap();
        assert_eq!(back, note);
    }

    #[test]
    fn test_catalog_keys_canonicalize() {
        let json = r##"{"force_majeure": {"name": "Force Majeure", "color": "#10b981"}}"##;
        let catalog: ClauseCatalog = serde_json::from_str(json).unwrap();
        let info = catalog.get(&ClauseType::new("force-majeure")).unwrap();
        assert_eq!(info.name, "Force Majeure");
        assert_eq!(catalog.display_name(&ClauseType::new("unknown")), "unknown");
    }

    #[test]
    fn test_document_structured_flag() {
        let json = r#"{"content": "<p/>", "content_type": "structured", "clauses": []}"#;
        let document: StructuredDocument = serde_json::from_str(json).unwrap();
        assert!(document.is_structured());
        assert!(document.detected_annotations().is_empty());
    }
}
