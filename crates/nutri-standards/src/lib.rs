//! Mapping profiles for heterogeneous nutrition datasets.
//!
//! A profile is a TOML document naming the canonical fields of one dataset
//! family and, for each field, the source columns that may supply it. The
//! four built-in profiles are embedded in the binary; users can point the
//! CLI at their own files instead.

#![deny(unsafe_code)]

pub mod error;
pub mod loader;
pub mod profile;

pub use crate::error::{Result, StandardsError};
pub use crate::loader::{builtin_profile, load_profile, resolve_profile};
pub use crate::profile::{
    Identity, Profile, ProfileHeader, ProfileKind, SubstituteRules,
};
