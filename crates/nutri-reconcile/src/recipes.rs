//! Recipe deduplication by `(title, ingredients)` identity.

use std::collections::HashSet;

use nutri_model::{CanonicalRecord, CellValue, CompositeKey, FieldMapping, RawRecord};

use crate::resolve::project;

/// Recipes in first-seen order with duplicate composite keys removed.
///
/// Duplicates are dropped whole; recipe content is never merged across rows.
#[derive(Debug, Clone)]
pub struct RecipeSet {
    title_field: String,
    ingredients_field: String,
    seen: HashSet<CompositeKey>,
    records: Vec<CanonicalRecord>,
    duplicates: usize,
    unidentified: usize,
}

impl RecipeSet {
    pub fn new(title_field: impl Into<String>, ingredients_field: impl Into<String>) -> Self {
        Self {
            title_field: title_field.into(),
            ingredients_field: ingredients_field.into(),
            seen: HashSet::new(),
            records: Vec::new(),
            duplicates: 0,
            unidentified: 0,
        }
    }

    /// Inserts a recipe; returns false when it was dropped.
    pub fn insert(&mut self, record: CanonicalRecord) -> bool {
        let title = record.get(&self.title_field).unwrap_or(&CellValue::Null);
        let ingredients = record
            .get(&self.ingredients_field)
            .unwrap_or(&CellValue::Null);
        let Some(key) = CompositeKey::new(title, ingredients) else {
            self.unidentified += 1;
            return false;
        };
        if !self.seen.insert(key) {
            self.duplicates += 1;
            return false;
        }
        self.records.push(record);
        true
    }

    pub fn records(&self) -> &[CanonicalRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<CanonicalRecord> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Rows dropped because their composite key was already present.
    pub fn duplicates(&self) -> usize {
        self.duplicates
    }

    /// Rows dropped because neither title nor ingredients were present.
    pub fn unidentified(&self) -> usize {
        self.unidentified
    }
}

/// Projects raw rows onto the recipe mapping and adds them to `set` in order.
pub fn dedupe_recipes_into<'a, I>(set: &mut RecipeSet, raw_records: I, mapping: &FieldMapping)
where
    I: IntoIterator<Item = &'a RawRecord>,
{
    for raw in raw_records {
        set.insert(project(raw, mapping));
    }
}

/// Builds a deduplicated recipe set from raw rows.
pub fn dedupe_recipes<'a, I>(
    raw_records: I,
    mapping: &FieldMapping,
    title_field: &str,
    ingredients_field: &str,
) -> RecipeSet
where
    I: IntoIterator<Item = &'a RawRecord>,
{
    let mut set = RecipeSet::new(title_field, ingredients_field);
    dedupe_recipes_into(&mut set, raw_records, mapping);
    set
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping() -> FieldMapping {
        FieldMapping::new([
            ("title", vec!["title", "Recipe_name"]),
            ("ingredients", vec!["ingredients"]),
            ("steps", vec!["steps"]),
        ])
        .unwrap()
    }

    #[test]
    fn identical_rows_collapse_to_one() {
        let rows = vec![
            RawRecord::from_pairs([("title", "Soup"), ("ingredients", "water, salt")]),
            RawRecord::from_pairs([("title", "Soup"), ("ingredients", "water, salt")]),
        ];
        let set = dedupe_recipes(&rows, &mapping(), "title", "ingredients");
        assert_eq!(set.len(), 1);
        assert_eq!(set.duplicates(), 1);
    }

    #[test]
    fn first_row_is_kept_without_merging() {
        let rows = vec![
            RawRecord::from_pairs([("title", "Soup"), ("ingredients", "water")]),
            RawRecord::from_pairs([
                ("Recipe_name", " soup "),
                ("ingredients", "Water"),
                ("steps", "boil"),
            ]),
        ];
        let set = dedupe_recipes(&rows, &mapping(), "title", "ingredients");
        assert_eq!(set.len(), 1);
        assert_eq!(set.records()[0].get("steps"), Some(&CellValue::Null));
        assert_eq!(set.records()[0].get("title"), Some(&CellValue::text("Soup")));
    }

    #[test]
    fn same_title_different_ingredients_are_distinct() {
        let rows = vec![
            RawRecord::from_pairs([("title", "Soup"), ("ingredients", "water")]),
            RawRecord::from_pairs([("title", "Soup"), ("ingredients", "stock")]),
        ];
        let set = dedupe_recipes(&rows, &mapping(), "title", "ingredients");
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn rows_without_title_or_ingredients_are_dropped() {
        let rows = vec![RawRecord::from_pairs([("steps", "stir")])];
        let set = dedupe_recipes(&rows, &mapping(), "title", "ingredients");
        assert!(set.is_empty());
        assert_eq!(set.unidentified(), 1);
    }
}
