use thiserror::Error;

/// Errors raised while building model types from configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("field mapping declares no fields")]
    EmptyMapping,

    #[error("canonical field '{field}' is declared more than once")]
    DuplicateField { field: String },

    #[error("canonical field '{field}' has no candidate columns")]
    NoCandidates { field: String },

    #[error("canonical field '{field}' has a blank candidate column")]
    BlankCandidate { field: String },

    #[error("canonical field name must not be blank")]
    BlankField,
}

pub type Result<T> = std::result::Result<T, ModelError>;
