//! Canonical records as CSV.

use std::io;
use std::path::Path;

use nutri_model::{CanonicalRecord, CellValue, FieldMapping};

use crate::common::create_output;
use crate::error::{OutputError, Result};

/// Writes canonical records to a CSV file.
///
/// Columns follow the mapping's declared field order. Missing values become
/// empty cells and numbers are written without trailing zeros.
pub fn write_canonical_csv<'a, I>(path: &Path, mapping: &FieldMapping, records: I) -> Result<usize>
where
    I: IntoIterator<Item = &'a CanonicalRecord>,
{
    let file = create_output(path)?;
    let rows = render_canonical_csv(file, mapping, records).map_err(|source| {
        OutputError::Csv {
            path: path.to_path_buf(),
            source,
        }
    })?;
    tracing::debug!(path = %path.display(), rows, "wrote CSV");
    Ok(rows)
}

/// Renders canonical records as CSV into any writer, returning the row count.
pub fn render_canonical_csv<'a, W, I>(
    writer: W,
    mapping: &FieldMapping,
    records: I,
) -> csv::Result<usize>
where
    W: io::Write,
    I: IntoIterator<Item = &'a CanonicalRecord>,
{
    let mut writer = csv::WriterBuilder::new().from_writer(writer);
    writer.write_record(mapping.fields())?;

    let mut rows = 0;
    let mut row: Vec<String> = Vec::with_capacity(mapping.len());
    for record in records {
        row.clear();
        row.extend(
            mapping
                .fields()
                .iter()
                .map(|field| record.get(field).map(CellValue::to_text).unwrap_or_default()),
        );
        writer.write_record(&row)?;
        rows += 1;
    }
    writer.flush()?;
    Ok(rows)
}
