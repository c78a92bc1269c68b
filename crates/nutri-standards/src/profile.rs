#![deny(unsafe_code)]

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use nutri_model::FieldMapping;

use crate::error::StandardsError;

/// Which dataset family a profile describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileKind {
    Ingredients,
    Recipes,
    Substitutions,
    Diets,
}

impl ProfileKind {
    pub const ALL: [ProfileKind; 4] = [
        ProfileKind::Ingredients,
        ProfileKind::Recipes,
        ProfileKind::Substitutions,
        ProfileKind::Diets,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ingredients => "ingredients",
            Self::Recipes => "recipes",
            Self::Substitutions => "substitutions",
            Self::Diets => "diets",
        }
    }
}

impl fmt::Display for ProfileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A mapping profile as written in TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub profile: ProfileHeader,
    #[serde(default)]
    pub identity: Option<IdentitySection>,
    #[serde(default)]
    pub classify: Option<ClassifySection>,
    #[serde(default)]
    pub fields: Vec<FieldEntry>,
    #[serde(default)]
    pub substitutes: Option<SubstituteRules>,
    #[serde(default)]
    pub coerce: Option<CoerceSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileHeader {
    pub name: String,
    pub kind: ProfileKind,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdentitySection {
    #[serde(default)]
    pub key_field: Option<String>,
    #[serde(default)]
    pub composite: Option<[String; 2]>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassifySection {
    #[serde(default)]
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldEntry {
    pub name: String,
    pub candidates: Vec<String>,
}

/// How substitute columns are recognised and split.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubstituteRules {
    #[serde(default)]
    pub prefixes: Vec<String>,
    #[serde(default)]
    pub contains: Vec<String>,
    #[serde(default = "default_separators")]
    pub separators: Vec<String>,
}

fn default_separators() -> Vec<String> {
    vec!["|".to_string(), ",".to_string()]
}

impl SubstituteRules {
    /// True when a column holds substitute values.
    pub fn matches_column(&self, column: &str) -> bool {
        let lower = column.to_lowercase();
        self.prefixes
            .iter()
            .any(|prefix| lower.starts_with(&prefix.to_lowercase()))
            || self
                .contains
                .iter()
                .any(|needle| lower.contains(&needle.to_lowercase()))
    }

    /// Splits a cell into trimmed, non-empty substitute names.
    pub fn split<'a>(&self, value: &'a str) -> Vec<&'a str> {
        let mut parts = vec![value];
        for separator in &self.separators {
            parts = parts
                .into_iter()
                .flat_map(|part| part.split(separator.as_str()))
                .collect();
        }
        parts
            .into_iter()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CoerceSection {
    #[serde(default)]
    pub text_columns: Vec<String>,
}

/// How rows of a profile are identified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    /// One normalized field; duplicates are merged field by field.
    Single(String),
    /// Ordered pair of fields; duplicates are dropped.
    Composite(String, String),
}

impl Profile {
    /// Parses a profile from TOML text and validates it.
    pub fn from_toml_str(text: &str) -> Result<Self, StandardsError> {
        let profile: Profile =
            toml::from_str(text).map_err(|source| StandardsError::Parse { source })?;
        profile.validate()?;
        Ok(profile)
    }

    pub fn name(&self) -> &str {
        &self.profile.name
    }

    pub fn kind(&self) -> ProfileKind {
        self.profile.kind
    }

    /// Checks that the sections required by the profile kind are present and consistent.
    pub fn validate(&self) -> Result<(), StandardsError> {
        let kind = self.kind();
        let needs_fields = !matches!(kind, ProfileKind::Diets);
        if needs_fields && self.fields.is_empty() {
            return Err(self.invalid("no [[fields]] declared"));
        }
        if needs_fields {
            self.field_mapping()?;
        }

        let mut declared = HashSet::new();
        for field in &self.fields {
            declared.insert(field.name.trim());
        }

        match kind {
            ProfileKind::Ingredients | ProfileKind::Recipes => {
                let identity = self.identity()?;
                let required: Vec<&str> = match &identity {
                    Identity::Single(field) => vec![field.as_str()],
                    Identity::Composite(first, second) => vec![first.as_str(), second.as_str()],
                };
                for field in required {
                    if !declared.contains(field) {
                        return Err(StandardsError::UnknownKeyField {
                            profile: self.name().to_string(),
                            field: field.to_string(),
                        });
                    }
                }
            }
            ProfileKind::Substitutions => {
                if !declared.contains("food") {
                    return Err(StandardsError::UnknownKeyField {
                        profile: self.name().to_string(),
                        field: "food".to_string(),
                    });
                }
                let rules = self.substitute_rules()?;
                if rules.prefixes.is_empty() && rules.contains.is_empty() {
                    return Err(self.invalid("[substitutes] needs prefixes or contains"));
                }
            }
            ProfileKind::Diets => {
                if self.coerce.is_none() {
                    return Err(self.invalid("missing [coerce] section"));
                }
            }
        }
        Ok(())
    }

    /// The canonical field mapping declared by `[[fields]]`.
    pub fn field_mapping(&self) -> Result<FieldMapping, StandardsError> {
        FieldMapping::new(
            self.fields
                .iter()
                .map(|field| (field.name.clone(), field.candidates.clone())),
        )
        .map_err(|source| StandardsError::Mapping {
            profile: self.name().to_string(),
            source,
        })
    }

    /// Identity declared by `[identity]`; exactly one form must be given.
    pub fn identity(&self) -> Result<Identity, StandardsError> {
        let section = self
            .identity
            .as_ref()
            .ok_or_else(|| self.invalid("missing [identity] section"))?;
        match (&section.key_field, &section.composite) {
            (Some(field), None) => Ok(Identity::Single(field.trim().to_string())),
            (None, Some([first, second])) => Ok(Identity::Composite(
                first.trim().to_string(),
                second.trim().to_string(),
            )),
            (Some(_), Some(_)) => Err(self.invalid("declare key_field or composite, not both")),
            (None, None) => Err(self.invalid("[identity] needs key_field or composite")),
        }
    }

    pub fn keywords(&self) -> &[String] {
        self.classify
            .as_ref()
            .map(|section| section.keywords.as_slice())
            .unwrap_or(&[])
    }

    pub fn substitute_rules(&self) -> Result<&SubstituteRules, StandardsError> {
        self.substitutes
            .as_ref()
            .ok_or_else(|| self.invalid("missing [substitutes] section"))
    }

    pub fn text_columns(&self) -> &[String] {
        self.coerce
            .as_ref()
            .map(|section| section.text_columns.as_slice())
            .unwrap_or(&[])
    }

    fn invalid(&self, message: &str) -> StandardsError {
        StandardsError::InvalidProfile {
            profile: self.name().to_string(),
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> SubstituteRules {
        SubstituteRules {
            prefixes: vec!["substitute".to_string(), "similar".to_string()],
            contains: vec!["substitution".to_string()],
            separators: default_separators(),
        }
    }

    #[test]
    fn substitute_columns_match_case_insensitively() {
        let rules = rules();
        assert!(rules.matches_column("Similar Food"));
        assert!(rules.matches_column("Substitute 2"));
        assert!(rules.matches_column("Best Substitution"));
        assert!(!rules.matches_column("Food"));
    }

    #[test]
    fn split_handles_both_separators() {
        let rules = rules();
        assert_eq!(
            rules.split("butter | margarine, ghee ,,"),
            vec!["butter", "margarine", "ghee"]
        );
    }

    #[test]
    fn identity_requires_exactly_one_form() {
        let text = r#"
            [profile]
            name = "x"
            kind = "ingredients"

            [identity]
            key_field = "food"
            composite = ["a", "b"]

            [[fields]]
            name = "food"
            candidates = ["food"]
        "#;
        let err = Profile::from_toml_str(text).unwrap_err();
        assert!(matches!(err, StandardsError::InvalidProfile { .. }));
    }
}
