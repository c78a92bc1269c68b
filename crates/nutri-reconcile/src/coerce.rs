//! Numeric coercion of diet rows.

use nutri_model::{CellValue, ColumnIndex, RawRecord};

/// Converts numeric-looking cells to numbers, leaving text columns as text.
///
/// Text columns keep their source text verbatim (`"007"` stays `"007"`),
/// and numeric cells built elsewhere are rendered back to text. Missing
/// cells become empty strings. Non-text cells
/// that parse as floats become numbers; anything else is kept as text.
pub fn coerce_row(raw: &RawRecord, text_columns: &ColumnIndex) -> RawRecord {
    let values = raw
        .iter()
        .map(|(column, value)| coerce_value(value, text_columns.contains(column)))
        .collect();
    RawRecord::new(raw.shared_header(), values)
}

/// Coerces every row of a diet table.
pub fn coerce_diet_rows<'a, I>(raw_records: I, text_columns: &[String]) -> Vec<RawRecord>
where
    I: IntoIterator<Item = &'a RawRecord>,
{
    let text_columns = ColumnIndex::new(text_columns);
    raw_records
        .into_iter()
        .map(|raw| coerce_row(raw, &text_columns))
        .collect()
}

fn coerce_value(value: &CellValue, is_text_column: bool) -> CellValue {
    if value.is_missing() {
        return CellValue::text("");
    }
    if is_text_column {
        return CellValue::Text(value.to_text());
    }
    match value {
        CellValue::Text(text) => match text.trim().parse::<f64>() {
            Ok(number) if number.is_finite() => CellValue::Number(number),
            _ => value.clone(),
        },
        other => other.clone(),
    }
}
