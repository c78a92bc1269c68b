//! Data model for nutrition dataset reconciliation.
//!
//! Source tables arrive with inconsistent column names and loosely typed
//! cells. This crate defines the shared vocabulary the other crates use:
//!
//! - [`CellValue`]: a text, numeric, or missing cell
//! - [`RawRecord`]: one source row keyed by source column name
//! - [`FieldMapping`]: canonical field → ordered candidate columns
//! - [`CanonicalRecord`]: one row keyed by canonical field name
//! - [`normalize_key`] / [`CompositeKey`]: entity identity

pub mod error;
pub mod key;
pub mod lookup;
pub mod mapping;
pub mod record;
pub mod value;

pub use error::{ModelError, Result};
pub use key::{CompositeKey, MISSING_TOKENS, is_missing_token, normalize_key};
pub use lookup::ColumnIndex;
pub use mapping::FieldMapping;
pub use record::{CanonicalRecord, Header, RawRecord, normalize_column_name};
pub use value::{CellValue, format_numeric};
