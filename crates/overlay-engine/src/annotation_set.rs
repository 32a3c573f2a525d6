use serde::{Deserialize, Serialize};
use shared_types::{Annotation, ClauseType, StructuredDocument};
use std::collections::BTreeSet;

/// Detected and user-authored annotations for one document.
///
/// Iteration order is detected first, then user-authored, each in arrival
/// order; the overlay's stable sort and click lookup both rely on it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnnotationSet {
    #[serde(default)]
    pub detected: Vec<Annotation>,
    #[serde(default)]
    pub user: Vec<Annotation>,
}

impl AnnotationSet {
    pub fn new(detected: Vec<Annotation>, user: Vec<Annotation>) -> Self {
        Self { detected, user }
    }

    pub fn from_document(document: &StructuredDocument) -> Self {
        Self::new(document.detected_annotations(), Vec::new())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Annotation> {
        self.detected.iter().chain(self.user.iter())
    }

    pub fn push_user(&mut self, annotation: Annotation) -> &Annotation {
        self.user.push(annotation);
        &self.user[self.user.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.detected.len() + self.user.len()
    }

    pub fn is_empty(&self) -> bool {
        self.detected.is_empty() && self.user.is_empty()
    }

    /// Distinct clause types present in the set
    pub fn clause_types(&self) -> BTreeSet<ClauseType> {
        self.iter().map(|a| a.clause_type.clone()).collect()
    }

    pub fn count_of(&self, clause_type: &ClauseType) -> usize {
        self.iter().filter(|a| &a.clause_type == clause_type).count()
    }
}

impl<'a> IntoIterator for &'a AnnotationSet {
    type Item = &'a Annotation;
    type IntoIter =
        std::iter::Chain<std::slice::Iter<'a, Annotation>, std::slice::Iter<'a, Annotation>>;

    fn into_iter(self) -> Self::IntoIter {
        self.detected.iter().chain(self.user.iter())
    }
}
