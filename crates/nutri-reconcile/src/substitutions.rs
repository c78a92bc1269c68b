//! Ingredient substitution aggregation.

use std::collections::{BTreeMap, BTreeSet};

use nutri_model::{FieldMapping, RawRecord, normalize_key};
use nutri_standards::SubstituteRules;

/// Field of the substitution mapping that names the ingredient.
pub const FOOD_FIELD: &str = "food";

/// Ingredient → substitutes, accumulated across any number of tables.
#[derive(Debug, Clone, Default)]
pub struct Substitutions {
    entries: BTreeMap<String, BTreeSet<String>>,
}

impl Substitutions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds every row's substitutes under its normalized ingredient name.
    ///
    /// The name comes from the first food column holding a usable key; an
    /// empty cell falls through to the next candidate. Rows without an
    /// ingredient name or without substitute values are skipped.
    pub fn add_records<'a, I>(&mut self, raw_records: I, mapping: &FieldMapping, rules: &SubstituteRules)
    where
        I: IntoIterator<Item = &'a RawRecord>,
    {
        let food_candidates = mapping.candidates(FOOD_FIELD).unwrap_or(&[]);
        for raw in raw_records {
            let Some(food) = food_candidates
                .iter()
                .filter_map(|candidate| raw.get(candidate))
                .find_map(normalize_key)
            else {
                continue;
            };
            let mut found = Vec::new();
            for (column, value) in raw.iter() {
                if value.is_missing() || !rules.matches_column(column) {
                    continue;
                }
                let text = value.to_text();
                found.extend(rules.split(&text).into_iter().map(str::to_string));
            }
            if found.is_empty() {
                continue;
            }
            self.entries.entry(food).or_default().extend(found);
        }
    }

    pub fn get(&self, food: &str) -> Option<&BTreeSet<String>> {
        self.entries.get(food)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sorted, de-duplicated substitute lists keyed by ingredient.
    pub fn into_map(self) -> BTreeMap<String, Vec<String>> {
        self.entries
            .into_iter()
            .filter(|(_, subs)| !subs.is_empty())
            .map(|(food, subs)| (food, subs.into_iter().collect()))
            .collect()
    }
}

/// Aggregates substitutes from a single batch of rows.
pub fn aggregate_substitutions<'a, I>(
    raw_records: I,
    mapping: &FieldMapping,
    rules: &SubstituteRules,
) -> BTreeMap<String, Vec<String>>
where
    I: IntoIterator<Item = &'a RawRecord>,
{
    let mut substitutions = Substitutions::new();
    substitutions.add_records(raw_records, mapping, rules);
    substitutions.into_map()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping() -> FieldMapping {
        FieldMapping::new([("food", vec!["Ingredient", "Food", "Main Ingredient"])]).unwrap()
    }

    fn rules() -> SubstituteRules {
        SubstituteRules {
            prefixes: vec!["substitute".to_string(), "similar".to_string()],
            contains: vec!["substitution".to_string()],
            separators: vec!["|".to_string(), ",".to_string()],
        }
    }

    #[test]
    fn collects_sorted_unique_substitutes() {
        let rows = vec![
            RawRecord::from_pairs([("Food", " Butter "), ("Similar Food", "Margarine")]),
            RawRecord::from_pairs([
                ("Ingredient", "butter"),
                ("Substitute 1", "Ghee | Margarine"),
                ("Best substitution", "Coconut oil, "),
            ]),
        ];
        let map = aggregate_substitutions(&rows, &mapping(), &rules());
        assert_eq!(
            map.get("butter").unwrap(),
            &vec![
                "Coconut oil".to_string(),
                "Ghee".to_string(),
                "Margarine".to_string()
            ]
        );
    }

    #[test]
    fn rows_without_food_or_substitutes_are_skipped() {
        let rows = vec![
            RawRecord::from_pairs([("Food", ""), ("Similar Food", "Tofu")]),
            RawRecord::from_pairs([("Food", "Egg"), ("Similar Food", "  ")]),
        ];
        let map = aggregate_substitutions(&rows, &mapping(), &rules());
        assert!(map.is_empty());
    }

    #[test]
    fn empty_food_column_falls_through_to_next_candidate() {
        let rows = vec![RawRecord::from_pairs([
            ("Ingredient", ""),
            ("Food", "N/A"),
            ("Main Ingredient", "Milk"),
            ("Substitute", "Oat milk"),
        ])];
        let map = aggregate_substitutions(&rows, &mapping(), &rules());
        assert_eq!(map.get("milk").unwrap(), &vec!["Oat milk".to_string()]);
    }
}
