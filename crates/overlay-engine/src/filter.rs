use serde::{Deserialize, Serialize};
use shared_types::{Annotation, ClauseCatalog, ClauseType};
use std::collections::BTreeSet;

/// Clause types whose highlights are currently shown
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActiveFilter {
    types: BTreeSet<ClauseType>,
}

impl ActiveFilter {
    /// Filter that shows nothing
    pub fn none() -> Self {
        Self::default()
    }

    /// Every catalogued type enabled
    pub fn all_from(catalog: &ClauseCatalog) -> Self {
        catalog.types().cloned().collect()
    }

    pub fn allows(&self, clause_type: &ClauseType) -> bool {
        self.types.contains(clause_type)
    }

    pub fn enable(&mut self, clause_type: impl Into<ClauseType>) {
        self.types.insert(clause_type.into());
    }

    pub fn disable(&mut self, clause_type: impl Into<ClauseType>) {
        self.types.remove(&clause_type.into());
    }

    /// Flip a type; returns whether it is enabled afterwards
    pub fn toggle(&mut self, clause_type: impl Into<ClauseType>) -> bool {
        let clause_type = clause_type.into();
        if self.types.remove(&clause_type) {
            false
        } else {
            self.types.insert(clause_type);
            true
        }
    }

    pub fn types(&self) -> impl Iterator<Item = &ClauseType> {
        self.types.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Annotations whose type passes the filter, in input order
    pub fn apply<'a>(
        &self,
        annotations: impl IntoIterator<Item = &'a Annotation>,
    ) -> Vec<&'a Annotation> {
        annotations
            .into_iter()
            .filter(|annotation| self.allows(&annotation.clause_type))
            .collect()
    }
}

impl<T: Into<ClauseType>> FromIterator<T> for ActiveFilter {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            types: iter.into_iter().map(Into::into).collect(),
        }
    }
}
