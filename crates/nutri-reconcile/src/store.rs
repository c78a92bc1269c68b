//! Identity-keyed canonical record store with first-informative-value merging.

use std::collections::HashMap;

use nutri_model::{CanonicalRecord, CellValue, FieldMapping, RawRecord, normalize_key};
use tracing::{debug, info};

use crate::resolve::project;

/// Counters collected while reconciling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileStats {
    /// Raw rows seen.
    pub input: usize,
    /// Rows dropped because no identity key could be derived.
    pub dropped_unresolvable: usize,
    /// Rows that created a new entity.
    pub inserted: usize,
    /// Rows merged into an existing entity.
    pub merged: usize,
}

/// Merged canonical records keyed by normalized identity.
///
/// Entities are kept in the order their key was first seen. For every key
/// each field holds either nothing or the first non-missing value seen for
/// that key; later values never overwrite it.
#[derive(Debug, Clone, Default)]
pub struct CanonicalStore {
    index: HashMap<String, usize>,
    entries: Vec<(String, CanonicalRecord)>,
    stats: ReconcileStats,
}

impl CanonicalStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&CanonicalRecord> {
        self.index.get(key).map(|&slot| &self.entries[slot].1)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Iterates `(identity key, record)` in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CanonicalRecord)> {
        self.entries
            .iter()
            .map(|(key, record)| (key.as_str(), record))
    }

    pub fn records(&self) -> impl Iterator<Item = &CanonicalRecord> {
        self.entries.iter().map(|(_, record)| record)
    }

    pub fn into_records(self) -> Vec<CanonicalRecord> {
        self.entries.into_iter().map(|(_, record)| record).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> ReconcileStats {
        self.stats
    }
}

/// Derives the identity key of a canonical record.
///
/// The key field is trimmed and lowercased. Missing cells, blank text, and
/// the textual missing-value placeholder yield `None`.
pub fn identity_key(record: &CanonicalRecord, key_field: &str) -> Option<String> {
    record.get(key_field).and_then(normalize_key)
}

/// Merges a record into the store under `key`.
///
/// A new key inserts the record as-is. An existing key only has its missing
/// fields filled from `record`; values already present are never replaced.
pub fn merge_into(store: &mut CanonicalStore, key: String, record: CanonicalRecord) {
    match store.index.get(&key) {
        Some(&slot) => {
            fill_missing(&mut store.entries[slot].1, &record);
            store.stats.merged += 1;
        }
        None => {
            store.index.insert(key.clone(), store.entries.len());
            store.entries.push((key, record));
            store.stats.inserted += 1;
        }
    }
}

/// Fills every missing field of `target` from `incoming`.
///
/// Fields are matched by name when the two records come from different
/// mappings; fields unknown to `target` are ignored.
pub fn fill_missing(target: &mut CanonicalRecord, incoming: &CanonicalRecord) {
    if target.same_fields(incoming) {
        for (slot, value) in target.values_mut().iter_mut().zip(incoming.values()) {
            if slot.is_missing() && !value.is_missing() {
                *slot = value.clone();
            }
        }
        return;
    }
    for (field, value) in incoming.iter() {
        if value.is_missing() {
            continue;
        }
        if let Some(slot) = target.get_mut(field)
            && slot.is_missing()
        {
            *slot = value.clone();
        }
    }
}

/// Reconciles rows into a fresh store.
///
/// Rows are processed strictly in input order, which decides which value
/// wins for every field.
pub fn reconcile_all<'a, I>(raw_records: I, mapping: &FieldMapping, key_field: &str) -> CanonicalStore
where
    I: IntoIterator<Item = &'a RawRecord>,
{
    let mut store = CanonicalStore::new();
    reconcile_into(&mut store, raw_records, mapping, key_field);
    info!(
        input = store.stats.input,
        entities = store.len(),
        dropped = store.stats.dropped_unresolvable,
        "reconciliation complete"
    );
    store
}

/// Reconciles rows into an existing store, so several sources can be
/// combined in a fixed order.
pub fn reconcile_into<'a, I>(
    store: &mut CanonicalStore,
    raw_records: I,
    mapping: &FieldMapping,
    key_field: &str,
) where
    I: IntoIterator<Item = &'a RawRecord>,
{
    for raw in raw_records {
        store.stats.input += 1;
        let mut record = project(raw, mapping);
        let Some(key) = identity_key(&record, key_field) else {
            store.stats.dropped_unresolvable += 1;
            debug!(key_field, "dropping record without identity");
            continue;
        };
        record.set(key_field, CellValue::Text(key.clone()));
        merge_into(store, key, record);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping() -> FieldMapping {
        FieldMapping::new([
            ("food", vec!["food", "Food"]),
            ("energy_kcal", vec!["Calories", "energy_kcal"]),
            ("protein_g", vec!["protein_g", "Protein (g)"]),
        ])
        .unwrap()
    }

    fn record(values: [Option<&str>; 3]) -> CanonicalRecord {
        CanonicalRecord::from_values(
            &mapping(),
            values
                .iter()
                .map(|v| v.map_or(CellValue::Null, CellValue::text))
                .collect(),
        )
    }

    #[test]
    fn end_to_end_merge() {
        let rows = vec![
            RawRecord::from_pairs([("Food", "Apple"), ("Calories", "52")]),
            RawRecord::from_pairs([("food", "apple"), ("Protein (g)", "0.3")]),
        ];
        let store = reconcile_all(&rows, &mapping(), "food");

        assert_eq!(store.len(), 1);
        let apple = store.get("apple").unwrap();
        assert_eq!(apple.get("food"), Some(&CellValue::text("apple")));
        assert_eq!(apple.get("energy_kcal"), Some(&CellValue::text("52")));
        assert_eq!(apple.get("protein_g"), Some(&CellValue::text("0.3")));
        assert_eq!(
            store.stats(),
            ReconcileStats {
                input: 2,
                dropped_unresolvable: 0,
                inserted: 1,
                merged: 1,
            }
        );
    }

    #[test]
    fn merge_is_first_informative_write_wins() {
        let a = record([Some("x"), Some("5"), None]);
        let b = record([Some("x"), Some("7"), Some("1")]);

        let mut forward = CanonicalStore::new();
        merge_into(&mut forward, "x".into(), a.clone());
        merge_into(&mut forward, "x".into(), b.clone());
        assert_eq!(
            forward.get("x").unwrap().get("energy_kcal"),
            Some(&CellValue::text("5"))
        );
        assert_eq!(
            forward.get("x").unwrap().get("protein_g"),
            Some(&CellValue::text("1"))
        );

        let mut reverse = CanonicalStore::new();
        merge_into(&mut reverse, "x".into(), b);
        merge_into(&mut reverse, "x".into(), a);
        assert_eq!(
            reverse.get("x").unwrap().get("energy_kcal"),
            Some(&CellValue::text("7"))
        );
    }

    #[test]
    fn records_without_identity_are_dropped() {
        let rows = vec![
            RawRecord::from_pairs([("Food", "  "), ("Calories", "10")]),
            RawRecord::from_pairs([("Food", "nan"), ("Calories", "11")]),
            RawRecord::from_pairs([("Calories", "12")]),
            RawRecord::from_pairs([("Food", "Pear"), ("Calories", "57")]),
        ];
        let store = reconcile_all(&rows, &mapping(), "food");
        assert_eq!(store.len(), 1);
        assert!(store.contains_key("pear"));
        assert_eq!(store.stats().dropped_unresolvable, 3);
    }

    #[test]
    fn keeps_first_seen_order() {
        let rows = vec![
            RawRecord::from_pairs([("food", "Banana")]),
            RawRecord::from_pairs([("food", "apple")]),
            RawRecord::from_pairs([("food", "BANANA")]),
        ];
        let store = reconcile_all(&rows, &mapping(), "food");
        let keys: Vec<&str> = store.iter().map(|(key, _)| key).collect();
        assert_eq!(keys, vec!["banana", "apple"]);
    }

    #[test]
    fn fill_missing_matches_by_name_across_mappings() {
        let narrow = FieldMapping::new([("protein_g", vec!["p"]), ("food", vec!["f"])]).unwrap();
        let incoming = CanonicalRecord::from_values(
            &narrow,
            vec![CellValue::text("2"), CellValue::text("kiwi")],
        );
        let mut target = record([Some("kiwi"), None, None]);
        fill_missing(&mut target, &incoming);
        assert_eq!(target.get("protein_g"), Some(&CellValue::text("2")));
        assert_eq!(target.get("food"), Some(&CellValue::text("kiwi")));
    }
}
