//! Source classification by column names.

use nutri_model::{FieldMapping, Header};

/// What kinds of data a source table appears to contain. A table may be both.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SourceKind {
    pub ingredients: bool,
    pub recipes: bool,
}

impl SourceKind {
    pub fn is_unclassified(self) -> bool {
        !self.ingredients && !self.recipes
    }
}

/// Classifies a header.
///
/// A table holds ingredient data when any of its columns is a candidate in
/// the ingredient mapping, and recipe data when any column name contains one
/// of the recipe keywords (both checks case-insensitive).
pub fn classify_header(
    header: &Header,
    ingredient_mapping: &FieldMapping,
    recipe_keywords: &[String],
) -> SourceKind {
    let ingredients = ingredient_mapping
        .all_candidates()
        .any(|candidate| header.contains(candidate));

    let keywords: Vec<String> = recipe_keywords.iter().map(|k| k.to_lowercase()).collect();
    let recipes = header.names().iter().any(|name| {
        let lower = name.to_lowercase();
        keywords.iter().any(|keyword| lower.contains(keyword.as_str()))
    });

    SourceKind {
        ingredients,
        recipes,
    }
}
