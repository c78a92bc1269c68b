//! Cell values as they arrive from heterogeneous source tables.

use std::fmt;

use polars::prelude::AnyValue;
use serde::{Serialize, Serializer};

/// A single untyped cell from a source row.
///
/// Sources disagree about types, so a cell is either text, a number, or
/// missing. NaN floats are folded into [`CellValue::Null`] at construction
/// so that missing-value detection never depends on string comparison.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Null,
    Text(String),
    Number(f64),
}

impl CellValue {
    /// Creates a text cell.
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Creates a numeric cell, mapping NaN to `Null`.
    pub fn number(value: f64) -> Self {
        if value.is_nan() {
            Self::Null
        } else {
            Self::Number(value)
        }
    }

    /// Returns true for `Null` and whitespace-only text.
    pub fn is_missing(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Text(text) => text.trim().is_empty(),
            Self::Number(value) => value.is_nan(),
        }
    }

    /// Returns `None` when the cell is missing, otherwise the cell itself.
    pub fn non_missing(&self) -> Option<&CellValue> {
        if self.is_missing() { None } else { Some(self) }
    }

    /// Renders the cell as text; missing cells become an empty string.
    pub fn to_text(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::Text(text) => text.clone(),
            Self::Number(value) => format_numeric(*value),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        Self::number(value)
    }
}

impl From<Option<String>> for CellValue {
    fn from(value: Option<String>) -> Self {
        value.map_or(Self::Null, Self::Text)
    }
}

impl From<AnyValue<'_>> for CellValue {
    fn from(value: AnyValue<'_>) -> Self {
        match value {
            AnyValue::Null => Self::Null,
            AnyValue::Int8(v) => Self::Number(f64::from(v)),
            AnyValue::Int16(v) => Self::Number(f64::from(v)),
            AnyValue::Int32(v) => Self::Number(f64::from(v)),
            AnyValue::Int64(v) => {
                exact_integer(v).map_or_else(|| Self::Text(v.to_string()), Self::Number)
            }
            AnyValue::UInt8(v) => Self::Number(f64::from(v)),
            AnyValue::UInt16(v) => Self::Number(f64::from(v)),
            AnyValue::UInt32(v) => Self::Number(f64::from(v)),
            AnyValue::UInt64(v) => i64::try_from(v)
                .ok()
                .and_then(exact_integer)
                .map_or_else(|| Self::Text(v.to_string()), Self::Number),
            AnyValue::Float32(v) => Self::number(f64::from(v)),
            AnyValue::Float64(v) => Self::number(v),
            AnyValue::String(s) => Self::Text(s.to_string()),
            AnyValue::StringOwned(s) => Self::Text(s.to_string()),
            AnyValue::Boolean(b) => Self::Text(b.to_string()),
            other => Self::Text(other.to_string()),
        }
    }
}

/// Largest integer magnitude an `f64` holds exactly (2^53).
const MAX_EXACT_INTEGER: u64 = 1 << 53;

/// Integers beyond the exact `f64` range stay text so distinct values
/// never collapse onto the same number.
fn exact_integer(value: i64) -> Option<f64> {
    (value.unsigned_abs() <= MAX_EXACT_INTEGER).then_some(value as f64)
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_none(),
            Self::Text(text) => serializer.serialize_str(text),
            Self::Number(value) => {
                // Whole numbers print without a trailing ".0".
                if value.fract() == 0.0 && value.abs() < 9.0e15 {
                    serializer.serialize_i64(*value as i64)
                } else {
                    serializer.serialize_f64(*value)
                }
            }
        }
    }
}

/// Formats a floating-point number as a string without trailing zeros.
///
/// # Examples
///
/// ```
/// use nutri_model::format_numeric;
///
/// assert_eq!(format_numeric(52.0), "52");
/// assert_eq!(format_numeric(10.0), "10");
/// assert_eq!(format_numeric(0.30), "0.3");
/// ```
pub fn format_numeric(v: f64) -> String {
    let s = format!("{v}");
    if !s.contains('.') {
        return s;
    }
    let trimmed = s.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() || trimmed == "-" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nan_becomes_null() {
        assert_eq!(CellValue::number(f64::NAN), CellValue::Null);
        assert_eq!(CellValue::from(AnyValue::Float64(f64::NAN)), CellValue::Null);
    }

    #[test]
    fn whitespace_text_is_missing() {
        assert!(CellValue::text("   ").is_missing());
        assert!(CellValue::Null.is_missing());
        assert!(!CellValue::text("0").is_missing());
        assert!(!CellValue::number(0.0).is_missing());
    }

    #[test]
    fn any_value_conversion() {
        assert_eq!(CellValue::from(AnyValue::Int64(52)), CellValue::Number(52.0));
        assert_eq!(CellValue::from(AnyValue::String("apple")), CellValue::text("apple"));
        assert_eq!(CellValue::from(AnyValue::Null), CellValue::Null);
    }

    #[test]
    fn large_integers_stay_exact() {
        assert_eq!(
            CellValue::from(AnyValue::Int64(9_007_199_254_740_993)),
            CellValue::text("9007199254740993")
        );
        assert_eq!(
            CellValue::from(AnyValue::UInt64(u64::MAX)),
            CellValue::text(u64::MAX.to_string())
        );
        assert_eq!(
            CellValue::from(AnyValue::Int64(-9_007_199_254_740_992)),
            CellValue::Number(-9_007_199_254_740_992.0)
        );
    }

    #[test]
    fn numeric_formatting() {
        assert_eq!(format_numeric(52.0), "52");
        assert_eq!(format_numeric(100.0), "100");
        assert_eq!(format_numeric(0.3), "0.3");
        assert_eq!(format_numeric(-1.50), "-1.5");
        assert_eq!(format_numeric(0.0), "0");
    }

    #[test]
    fn serializes_whole_numbers_without_fraction() {
        let json = serde_json::to_string(&vec![
            CellValue::Number(52.0),
            CellValue::Number(0.3),
            CellValue::Null,
            CellValue::text("x"),
        ])
        .unwrap();
        assert_eq!(json, r#"[52,0.3,null,"x"]"#);
    }
}
