//! JSON writers.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use serde::Serialize;
use serde::ser::{SerializeMap, SerializeSeq, Serializer};

use nutri_model::{CanonicalRecord, FieldMapping, RawRecord};

use crate::common::create_output;
use crate::error::{OutputError, Result};

/// A record viewed through a mapping so keys follow its declared order.
struct MappedRecord<'a> {
    mapping: &'a FieldMapping,
    record: &'a CanonicalRecord,
}

impl Serialize for MappedRecord<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.mapping.len()))?;
        for field in self.mapping.fields() {
            map.serialize_entry(field, &self.record.get(field).cloned().unwrap_or_default())?;
        }
        map.end()
    }
}

struct MappedRecords<'a> {
    mapping: &'a FieldMapping,
    records: Vec<&'a CanonicalRecord>,
}

impl Serialize for MappedRecords<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.records.len()))?;
        for record in &self.records {
            seq.serialize_element(&MappedRecord {
                mapping: self.mapping,
                record,
            })?;
        }
        seq.end()
    }
}

/// Writes canonical records as a pretty JSON array of objects.
///
/// Missing values are `null`, numbers are JSON numbers, everything else is
/// a string.
pub fn write_canonical_json<'a, I>(path: &Path, mapping: &FieldMapping, records: I) -> Result<usize>
where
    I: IntoIterator<Item = &'a CanonicalRecord>,
{
    let records = MappedRecords {
        mapping,
        records: records.into_iter().collect(),
    };
    write_json(path, &records)?;
    Ok(records.records.len())
}

/// Writes the food → substitutes map as a pretty JSON object.
pub fn write_substitutions_json(path: &Path, substitutions: &BTreeMap<String, Vec<String>>) -> Result<()> {
    write_json(path, substitutions)
}

/// Writes coerced diet rows as a pretty JSON array, columns in source order.
pub fn write_diet_json(path: &Path, rows: &[RawRecord]) -> Result<()> {
    write_json(path, rows)
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let mut writer = create_output(path)?;
    serde_json::to_writer_pretty(&mut writer, value).map_err(|source| OutputError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    writer
        .write_all(b"\n")
        .and_then(|()| writer.flush())
        .map_err(|source| OutputError::Write {
            path: path.to_path_buf(),
            source,
        })?;
    tracing::debug!(path = %path.display(), "wrote JSON");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nutri_model::CellValue;
    use tempfile::tempdir;

    #[test]
    fn canonical_json_uses_mapping_order() {
        let mapping = FieldMapping::new([("food", vec!["Food"]), ("protein_g", vec!["p"])]).unwrap();
        let record = CanonicalRecord::from_values(
            &mapping,
            vec![CellValue::text("apple"), CellValue::Null],
        );
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("out.json");

        let count = write_canonical_json(&path, &mapping, [&record]).unwrap();
        assert_eq!(count, 1);

        let text = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value, serde_json::json!([{ "food": "apple", "protein_g": null }]));
        assert!(text.find("\"food\"").unwrap() < text.find("\"protein_g\"").unwrap());
    }

    #[test]
    fn diet_json_keeps_non_ascii() {
        let rows = vec![RawRecord::from_pairs([
            ("Recipe_name", CellValue::text("Piña colada")),
            ("Protein(g)", CellValue::Number(1.5)),
        ])];
        let dir = tempdir().unwrap();
        let path = dir.path().join("diet.json");
        write_diet_json(&path, &rows).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("Piña colada"));
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value[0]["Protein(g)"], serde_json::json!(1.5));
    }

    #[test]
    fn substitutions_json_is_an_object() {
        let mut map = BTreeMap::new();
        map.insert("butter".to_string(), vec!["ghee".to_string(), "margarine".to_string()]);
        let dir = tempdir().unwrap();
        let path = dir.path().join("subs.json");
        write_substitutions_json(&path, &map).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value, serde_json::json!({ "butter": ["ghee", "margarine"] }));
    }
}
