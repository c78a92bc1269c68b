use std::collections::HashMap;

/// Column-name index with exact lookup first and ASCII-case-insensitive fallback.
///
/// When two names collide case-insensitively, the first one declared wins the
/// fallback slot; exact lookups still reach both.
#[derive(Debug, Clone, Default)]
pub struct ColumnIndex {
    exact: HashMap<String, usize>,
    folded: HashMap<String, usize>,
}

impl ColumnIndex {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut index = Self::default();
        for (position, name) in names.into_iter().enumerate() {
            index.insert(name.as_ref(), position);
        }
        index
    }

    fn insert(&mut self, name: &str, position: usize) {
        self.exact.entry(name.to_string()).or_insert(position);
        self.folded.entry(fold(name)).or_insert(position);
    }

    /// Position of `name`, trying an exact match before a case-insensitive one.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.exact
            .get(name)
            .or_else(|| self.folded.get(&fold(name)))
            .copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }
}

fn fold(name: &str) -> String {
    name.to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match_beats_folded_match() {
        let index = ColumnIndex::new(["food", "Food"]);
        assert_eq!(index.position("Food"), Some(1));
        assert_eq!(index.position("food"), Some(0));
        assert_eq!(index.position("FOOD"), Some(0));
    }

    #[test]
    fn missing_name() {
        let index = ColumnIndex::new(["Calories"]);
        assert!(index.contains("calories"));
        assert!(!index.contains("Protein (g)"));
    }

    #[test]
    fn folding_is_ascii_only() {
        let index = ColumnIndex::new(["Énergie", "Calories"]);
        assert_eq!(index.position("éNERGIE"), None);
        assert_eq!(index.position("ÉNERGIE"), Some(0));
        assert_eq!(index.position("CALORIES"), Some(1));
    }
}
