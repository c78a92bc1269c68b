//! Declarative canonical-field → candidate-column mapping.

use std::collections::HashSet;
use std::sync::Arc;

use crate::error::{ModelError, Result};

/// Ordered mapping from canonical field name to candidate source columns.
///
/// Field order is the declared order and doubles as the output column order.
/// Candidates are tried in declared order; the first one present in a row
/// supplies the value. The mapping is immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMapping {
    fields: Arc<[String]>,
    candidates: Vec<Vec<String>>,
}

impl FieldMapping {
    /// Builds a mapping, rejecting blank or duplicate fields and empty candidate lists.
    pub fn new<I, F, C, S>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (F, C)>,
        F: Into<String>,
        C: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut fields = Vec::new();
        let mut candidates = Vec::new();
        let mut seen = HashSet::new();

        for (field, field_candidates) in entries {
            let field = field.into().trim().to_string();
            if field.is_empty() {
                return Err(ModelError::BlankField);
            }
            if !seen.insert(field.to_ascii_lowercase()) {
                return Err(ModelError::DuplicateField { field });
            }
            let list: Vec<String> = field_candidates
                .into_iter()
                .map(|candidate| candidate.into().trim().to_string())
                .collect();
            if list.is_empty() {
                return Err(ModelError::NoCandidates { field });
            }
            if list.iter().any(String::is_empty) {
                return Err(ModelError::BlankCandidate { field });
            }
            fields.push(field);
            candidates.push(list);
        }

        if fields.is_empty() {
            return Err(ModelError::EmptyMapping);
        }

        Ok(Self {
            fields: fields.into(),
            candidates,
        })
    }

    /// Canonical field names in declared order.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub(crate) fn shared_fields(&self) -> Arc<[String]> {
        Arc::clone(&self.fields)
    }

    /// Candidate columns for a canonical field, in priority order.
    pub fn candidates(&self, field: &str) -> Option<&[String]> {
        self.position(field)
            .map(|index| self.candidates[index].as_slice())
    }

    /// Index of a canonical field in declared order.
    pub fn position(&self, field: &str) -> Option<usize> {
        self.fields.iter().position(|name| name == field)
    }

    pub fn contains_field(&self, field: &str) -> bool {
        self.position(field).is_some()
    }

    /// Iterates `(field, candidates)` pairs in declared order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.fields
            .iter()
            .zip(&self.candidates)
            .map(|(field, candidates)| (field.as_str(), candidates.as_slice()))
    }

    /// Every candidate column across all fields.
    pub fn all_candidates(&self) -> impl Iterator<Item = &str> {
        self.candidates.iter().flatten().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_declared_order() {
        let mapping = FieldMapping::new([
            ("food", vec!["food", "Food"]),
            ("energy_kcal", vec!["Calories"]),
        ])
        .unwrap();
        assert_eq!(mapping.fields(), ["food", "energy_kcal"]);
        assert_eq!(mapping.candidates("food").unwrap(), ["food", "Food"]);
        assert!(mapping.candidates("protein_g").is_none());
    }

    #[test]
    fn rejects_duplicate_fields_case_insensitively() {
        let result = FieldMapping::new([("food", vec!["a"]), ("Food", vec!["b"])]);
        assert_eq!(
            result,
            Err(ModelError::DuplicateField {
                field: "Food".to_string()
            })
        );
    }

    #[test]
    fn rejects_empty_candidates() {
        let result = FieldMapping::new([("food", Vec::<String>::new())]);
        assert!(matches!(result, Err(ModelError::NoCandidates { .. })));

        let result = FieldMapping::new([("food", vec!["  "])]);
        assert!(matches!(result, Err(ModelError::BlankCandidate { .. })));
    }

    #[test]
    fn rejects_empty_mapping() {
        let entries: Vec<(String, Vec<String>)> = Vec::new();
        assert_eq!(FieldMapping::new(entries), Err(ModelError::EmptyMapping));
    }
}
