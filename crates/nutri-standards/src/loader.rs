#![deny(unsafe_code)]

use std::path::Path;

use crate::error::{Result, StandardsError};
use crate::profile::{Profile, ProfileKind};

const INGREDIENTS_PROFILE: &str = include_str!("../profiles/ingredients.toml");
const RECIPES_PROFILE: &str = include_str!("../profiles/recipes.toml");
const SUBSTITUTIONS_PROFILE: &str = include_str!("../profiles/substitutions.toml");
const DIETS_PROFILE: &str = include_str!("../profiles/diets.toml");

/// Returns the profile shipped with the binary for a dataset family.
pub fn builtin_profile(kind: ProfileKind) -> Result<Profile> {
    let text = match kind {
        ProfileKind::Ingredients => INGREDIENTS_PROFILE,
        ProfileKind::Recipes => RECIPES_PROFILE,
        ProfileKind::Substitutions => SUBSTITUTIONS_PROFILE,
        ProfileKind::Diets => DIETS_PROFILE,
    };
    Profile::from_toml_str(text)
}

/// Loads and validates a user-supplied profile file.
pub fn load_profile(path: &Path) -> Result<Profile> {
    let text = std::fs::read_to_string(path).map_err(|e| StandardsError::io(path, e))?;
    Profile::from_toml_str(&text).map_err(|source| StandardsError::ParseFile {
        path: path.to_path_buf(),
        source: Box::new(source),
    })
}

/// Loads `path` when given, otherwise the built-in profile; the kind must match.
pub fn resolve_profile(kind: ProfileKind, path: Option<&Path>) -> Result<Profile> {
    let profile = match path {
        Some(path) => load_profile(path)?,
        None => builtin_profile(kind)?,
    };
    if profile.kind() != kind {
        return Err(StandardsError::WrongKind {
            profile: profile.name().to_string(),
            expected: kind.to_string(),
            actual: profile.kind().to_string(),
        });
    }
    Ok(profile)
}
