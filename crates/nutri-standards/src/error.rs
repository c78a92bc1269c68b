#![deny(unsafe_code)]

use std::path::PathBuf;

use nutri_model::ModelError;

#[derive(Debug, thiserror::Error)]
pub enum StandardsError {
    #[error("failed to read profile {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse profile TOML: {source}")]
    Parse {
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to parse profile {path}: {source}")]
    ParseFile {
        path: PathBuf,
        #[source]
        source: Box<StandardsError>,
    },

    #[error("invalid profile '{profile}': {message}")]
    InvalidProfile { profile: String, message: String },

    #[error("profile '{profile}' has an invalid field mapping: {source}")]
    Mapping {
        profile: String,
        #[source]
        source: ModelError,
    },

    #[error("profile '{profile}' identifies rows by '{field}', which is not a declared field")]
    UnknownKeyField { profile: String, field: String },

    #[error("profile '{profile}' is a {actual} profile, expected {expected}")]
    WrongKind {
        profile: String,
        expected: String,
        actual: String,
    },
}

impl StandardsError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, StandardsError>;
