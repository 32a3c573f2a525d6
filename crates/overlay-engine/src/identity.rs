//! Annotation identifiers embedded in highlight spans and used as note keys

use serde::{Deserialize, Serialize};
use shared_types::Annotation;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentifierScheme {
    /// `type-start`; collides when two annotations of one type share a start
    #[default]
    TypeAndStart,
    /// `type-start-end`
    TypeStartAndEnd,
}

/// Identifier under the default `type-start` scheme.
///
/// Returns `None` for annotations without a position, which can never be
/// rendered and therefore never clicked.
pub fn annotation_identifier(annotation: &Annotation) -> Option<String> {
    identifier_for(IdentifierScheme::TypeAndStart, annotation)
}

pub fn identifier_for(scheme: IdentifierScheme, annotation: &Annotation) -> Option<String> {
    let position = annotation.position?;
    let id = match scheme {
        IdentifierScheme::TypeAndStart => {
            format!("{}-{}", annotation.clause_type, position.start)
        }
        IdentifierScheme::TypeStartAndEnd => format!(
            "{}-{}-{}",
            annotation.clause_type, position.start, position.end
        ),
    };
    Some(id)
}
