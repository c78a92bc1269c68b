//! Raw source rows and canonical projected rows.

use std::sync::Arc;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::lookup::ColumnIndex;
use crate::mapping::FieldMapping;
use crate::value::CellValue;

/// Column names of one source table, shared by all of its rows.
#[derive(Debug, Clone)]
pub struct Header {
    names: Vec<String>,
    index: ColumnIndex,
}

impl Header {
    /// Builds a header, trimming whitespace and stray BOMs from every name.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names: Vec<String> = names
            .into_iter()
            .map(|name| normalize_column_name(name.as_ref()))
            .collect();
        let index = ColumnIndex::new(&names);
        Self { names, index }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.position(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Trims surrounding whitespace and BOM characters from a column name.
pub fn normalize_column_name(raw: &str) -> String {
    raw.trim_matches(|ch: char| ch.is_whitespace() || ch == '\u{feff}')
        .to_string()
}

/// One input row: source column name → raw value.
#[derive(Debug, Clone)]
pub struct RawRecord {
    header: Arc<Header>,
    values: Vec<CellValue>,
}

impl RawRecord {
    /// Creates a row over a shared header. Missing trailing cells read as `Null`.
    pub fn new(header: Arc<Header>, mut values: Vec<CellValue>) -> Self {
        values.resize(header.len(), CellValue::Null);
        Self { header, values }
    }

    /// Convenience constructor for a standalone row.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<CellValue>,
    {
        let (names, values): (Vec<String>, Vec<CellValue>) = pairs
            .into_iter()
            .map(|(key, value)| (key.as_ref().to_string(), value.into()))
            .unzip();
        Self::new(Arc::new(Header::new(names)), values)
    }

    /// Looks up a column, exact name first, then case-insensitively.
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.header
            .position(column)
            .and_then(|index| self.values.get(index))
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    /// The header handle, for building sibling rows over the same columns.
    pub fn shared_header(&self) -> Arc<Header> {
        Arc::clone(&self.header)
    }

    /// Iterates `(column, value)` pairs in source order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.header
            .names()
            .iter()
            .map(String::as_str)
            .zip(&self.values)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Serialize for RawRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (column, value) in self.iter() {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

/// A row expressed in canonical field names, in mapping order.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalRecord {
    fields: Arc<[String]>,
    values: Vec<CellValue>,
}

impl CanonicalRecord {
    /// Creates an all-null record for a mapping.
    pub fn empty(mapping: &FieldMapping) -> Self {
        let fields = mapping.shared_fields();
        let values = vec![CellValue::Null; fields.len()];
        Self { fields, values }
    }

    /// Creates a record from values listed in the mapping's field order.
    pub fn from_values(mapping: &FieldMapping, mut values: Vec<CellValue>) -> Self {
        let fields = mapping.shared_fields();
        values.resize(fields.len(), CellValue::Null);
        Self { fields, values }
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn values(&self) -> &[CellValue] {
        &self.values
    }

    pub fn get(&self, field: &str) -> Option<&CellValue> {
        self.position(field).map(|index| &self.values[index])
    }

    /// Replaces a field's value. Returns false when the field is unknown.
    pub fn set(&mut self, field: &str, value: CellValue) -> bool {
        match self.position(field) {
            Some(index) => {
                self.values[index] = value;
                true
            }
            None => false,
        }
    }

    pub fn get_mut(&mut self, field: &str) -> Option<&mut CellValue> {
        let index = self.position(field)?;
        self.values.get_mut(index)
    }

    /// Iterates `(field, value)` pairs in mapping order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.fields.iter().map(String::as_str).zip(&self.values)
    }

    pub fn values_mut(&mut self) -> &mut [CellValue] {
        &mut self.values
    }

    /// True when both records were built from the same field list.
    pub fn same_fields(&self, other: &CanonicalRecord) -> bool {
        Arc::ptr_eq(&self.fields, &other.fields) || self.fields == other.fields
    }

    fn position(&self, field: &str) -> Option<usize> {
        self.fields.iter().position(|name| name == field)
    }
}

impl Serialize for CanonicalRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (field, value) in self.iter() {
            map.serialize_entry(field, value)?;
        }
        map.end()
    }
}
