//! Source ingestion for nutrition and recipe datasets.
//!
//! This crate discovers CSV files, decodes them with an encoding fallback,
//! parses them into [`RawRecord`](nutri_model::RawRecord)s, and classifies
//! each table as ingredient data, recipe data, or both.
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use nutri_ingest::{list_csv_files, read_sources};
//!
//! let files = list_csv_files(Path::new("data/CSV"))?;
//! let (tables, skipped) = read_sources(&files);
//! ```

mod classify;
mod discovery;
mod error;
mod reader;

// === Error Types ===
pub use error::{IngestError, Result};

// === File Discovery ===
pub use discovery::{is_csv, list_csv_files};

// === CSV Reading ===
pub use reader::{
    SkippedSource, SourceEncoding, SourceTable, decode, read_source, read_sources,
};

// === Classification ===
pub use classify::{SourceKind, classify_header};
