//! Writers for unified datasets.
//!
//! - **CSV**: canonical ingredient and recipe tables, columns in declared order
//! - **JSON**: the same tables as arrays of objects, plus substitution maps
//!   and coerced diet rows

mod common;
pub mod error;
mod json;
mod table;

pub use error::{OutputError, Result};
pub use json::{write_canonical_json, write_diet_json, write_substitutions_json};
pub use table::{render_canonical_csv, write_canonical_csv};
