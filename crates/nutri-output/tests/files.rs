//! File-level tests for the writers.

use nutri_model::{CanonicalRecord, CellValue, FieldMapping};
use nutri_output::{OutputError, write_canonical_csv};
use tempfile::tempdir;

fn recipes() -> (FieldMapping, Vec<CanonicalRecord>) {
    let mapping = FieldMapping::new([
        ("title", vec!["title"]),
        ("ingredients", vec!["ingredients"]),
        ("steps", vec!["steps"]),
    ])
    .unwrap();
    let records = vec![CanonicalRecord::from_values(
        &mapping,
        vec![
            CellValue::text("Crème brûlée"),
            CellValue::text("cream, sugar\neggs"),
            CellValue::Null,
        ],
    )];
    (mapping, records)
}

#[test]
fn csv_round_trips_quoted_cells() {
    let (mapping, records) = recipes();
    let dir = tempdir().unwrap();
    let path = dir.path().join("out").join("recipes_unified.csv");

    let rows = write_canonical_csv(&path, &mapping, &records).unwrap();
    assert_eq!(rows, 1);

    let mut reader = csv::Reader::from_path(&path).unwrap();
    let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
    assert_eq!(headers, ["title", "ingredients", "steps"]);
    let row = reader.records().next().unwrap().unwrap();
    assert_eq!(&row[0], "Crème brûlée");
    assert_eq!(&row[1], "cream, sugar\neggs");
    assert_eq!(&row[2], "");
}

#[test]
fn unwritable_parent_is_reported() {
    let (mapping, records) = recipes();
    let dir = tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "not a directory").unwrap();

    let err = write_canonical_csv(&blocker.join("out.csv"), &mapping, &records).unwrap_err();
    assert!(matches!(err, OutputError::CreateDir { .. }));
}
