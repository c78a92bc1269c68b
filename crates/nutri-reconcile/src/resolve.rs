//! Column resolution and canonical projection.

use nutri_model::{CanonicalRecord, CellValue, FieldMapping, RawRecord};

/// Resolves one canonical field from a raw row.
///
/// Candidates are tried in declared order and the first one present in the
/// row decides the result (exact column name first, then case-insensitive).
/// Returns `None` when no candidate is present or the chosen cell is empty.
/// Absent columns are routine for heterogeneous sources and are not errors.
pub fn resolve_field(raw: &RawRecord, candidates: &[String]) -> Option<CellValue> {
    let value = candidates
        .iter()
        .find_map(|candidate| raw.get(candidate))?;
    value.non_missing().cloned()
}

/// Projects a raw row onto every canonical field of the mapping.
pub fn project(raw: &RawRecord, mapping: &FieldMapping) -> CanonicalRecord {
    let values = mapping
        .iter()
        .map(|(_, candidates)| resolve_field(raw, candidates).unwrap_or_default())
        .collect();
    CanonicalRecord::from_values(mapping, values)
}
