//! Identity keys used to detect the same entity across sources.

use crate::value::CellValue;

/// Lowercased spellings that tabular tooling writes for a missing value.
///
/// Cells are checked for missingness by type first; these guard against
/// sources that were already flattened to text upstream, and against the
/// null markers spreadsheet exports commonly contain (`N/A`, `NULL`, ...).
pub const MISSING_TOKENS: &[&str] = &[
    "nan", "-nan", "na", "n/a", "#n/a", "#n/a n/a", "#na", "<na>", "null", "none",
];

/// Returns true when `text` (already trimmed) spells a missing value.
pub fn is_missing_token(text: &str) -> bool {
    MISSING_TOKENS
        .iter()
        .any(|token| text.eq_ignore_ascii_case(token))
}

/// Normalizes a cell into an identity key: trimmed and lowercased.
///
/// Returns `None` for missing cells, blank text, and [`MISSING_TOKENS`].
pub fn normalize_key(value: &CellValue) -> Option<String> {
    if value.is_missing() {
        return None;
    }
    let key = value.to_text().trim().to_lowercase();
    if key.is_empty() || is_missing_token(&key) {
        None
    } else {
        Some(key)
    }
}

/// Ordered `(title, ingredients)` identity used for recipe deduplication.
///
/// Each part is trimmed, lowercased, and has internal whitespace runs
/// collapsed, so rows differing only in incidental spacing compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CompositeKey {
    pub title: String,
    pub ingredients: String,
}

impl CompositeKey {
    /// Builds a key; `None` when both parts are missing.
    pub fn new(title: &CellValue, ingredients: &CellValue) -> Option<Self> {
        let title = normalize_part(title);
        let ingredients = normalize_part(ingredients);
        if title.is_empty() && ingredients.is_empty() {
            return None;
        }
        Some(Self { title, ingredients })
    }
}

fn normalize_part(value: &CellValue) -> String {
    if value.is_missing() {
        return String::new();
    }
    let text = value.to_text().to_lowercase();
    let mut parts = text.split_whitespace();
    let mut normalized = String::new();
    if let Some(first) = parts.next() {
        normalized.push_str(first);
        for part in parts {
            normalized.push(' ');
            normalized.push_str(part);
        }
    }
    if is_missing_token(&normalized) {
        normalized.clear();
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_is_trimmed_and_lowercased() {
        assert_eq!(
            normalize_key(&CellValue::text("  Apple ")),
            Some("apple".to_string())
        );
    }

    #[test]
    fn placeholder_and_blank_are_not_keys() {
        assert_eq!(normalize_key(&CellValue::text("NaN")), None);
        assert_eq!(normalize_key(&CellValue::text("   ")), None);
        assert_eq!(normalize_key(&CellValue::Null), None);
        assert_eq!(normalize_key(&CellValue::number(f64::NAN)), None);
    }

    #[test]
    fn null_markers_are_not_keys() {
        for marker in ["N/A", "n/a", "NA", "NULL", "null", "#N/A", "None", "<NA>"] {
            assert_eq!(normalize_key(&CellValue::text(marker)), None, "{marker}");
        }
        assert_eq!(normalize_key(&CellValue::text("naan")), Some("naan".to_string()));
        assert_eq!(
            CompositeKey::new(&CellValue::text(" NULL "), &CellValue::text("n/a")),
            None
        );
    }

    #[test]
    fn numeric_looking_text_keys_stay_distinct() {
        assert_eq!(normalize_key(&CellValue::text("00123")), Some("00123".to_string()));
        assert_ne!(
            normalize_key(&CellValue::text("9007199254740993")),
            normalize_key(&CellValue::text("9007199254740992"))
        );
    }

    #[test]
    fn numeric_keys_are_formatted() {
        assert_eq!(
            normalize_key(&CellValue::Number(1001.0)),
            Some("1001".to_string())
        );
    }

    #[test]
    fn composite_key_collapses_whitespace() {
        let a = CompositeKey::new(
            &CellValue::text("Tomato  Soup"),
            &CellValue::text("tomato, salt"),
        );
        let b = CompositeKey::new(
            &CellValue::text(" tomato soup "),
            &CellValue::text("Tomato,  salt"),
        );
        assert_eq!(a, b);
        assert!(a.is_some());
    }

    #[test]
    fn composite_key_requires_some_content() {
        assert_eq!(CompositeKey::new(&CellValue::Null, &CellValue::text(" ")), None);
        assert!(CompositeKey::new(&CellValue::Null, &CellValue::text("rice")).is_some());
    }
}
