//! Click Resolver: map a clicked highlight back to its annotation

use shared_types::{Annotation, ClauseType};

use crate::identity::{identifier_for, IdentifierScheme};
use crate::markup::Element;
use crate::splicer::{ATTR_ANNOTATION_ID, ATTR_CLAUSE_TYPE};

/// The attribute pair a rendered highlight span carries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickTarget {
    pub clause_type: String,
    pub identifier: String,
}

impl ClickTarget {
    pub fn new(clause_type: &str, identifier: &str) -> Self {
        Self {
            clause_type: clause_type.to_string(),
            identifier: identifier.to_string(),
        }
    }

    /// Read the target off a highlight span; `None` for any other element
    pub fn from_element(element: &Element) -> Option<Self> {
        Some(Self::new(
            element.attr(ATTR_CLAUSE_TYPE)?,
            element.attr(ATTR_ANNOTATION_ID)?,
        ))
    }
}

/// Find the annotation a click refers to under the default identifier scheme.
///
/// The first annotation, in the given order, whose type and derived
/// identifier both match wins; identifiers that collide therefore always
/// resolve to the earlier annotation.
pub fn resolve_click<'a>(
    clicked_type: &str,
    clicked_identifier: &str,
    annotations: impl IntoIterator<Item = &'a Annotation>,
) -> Option<&'a Annotation> {
    resolve_click_with(
        IdentifierScheme::default(),
        clicked_type,
        clicked_identifier,
        annotations,
    )
}

pub fn resolve_click_with<'a>(
    scheme: IdentifierScheme,
    clicked_type: &str,
    clicked_identifier: &str,
    annotations: impl IntoIterator<Item = &'a Annotation>,
) -> Option<&'a Annotation> {
    let clicked_type = ClauseType::new(clicked_type);
    let found = annotations.into_iter().find(|annotation| {
        annotation.clause_type == clicked_type
            && identifier_for(scheme, annotation).as_deref() == Some(clicked_identifier)
    });
    if found.is_none() {
        tracing::debug!(
            "No annotation matches clicked highlight {} ({})",
            clicked_identifier,
            clicked_type
        );
    }
    found
}
