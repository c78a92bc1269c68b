//! Schema reconciliation and merging for heterogeneous nutrition tables.
//!
//! Rows from differently shaped sources are projected onto a declarative
//! [`FieldMapping`](nutri_model::FieldMapping), keyed by a normalized identity,
//! and merged so that the first informative value for each field wins:
//!
//! ```text
//! raw rows → resolve_field / project → identity_key → merge_into → CanonicalStore
//! ```
//!
//! Merging is order-sensitive. Callers that project rows concurrently must
//! still feed [`merge_into`] in input order.
//!
//! Recipes use a composite `(title, ingredients)` identity and duplicates are
//! dropped rather than merged ([`RecipeSet`]). Substitution tables and diet
//! tables have their own small transforms ([`Substitutions`],
//! [`coerce_diet_rows`]).

mod coerce;
mod recipes;
mod resolve;
mod store;
mod substitutions;

pub use coerce::{coerce_diet_rows, coerce_row};
pub use recipes::{RecipeSet, dedupe_recipes, dedupe_recipes_into};
pub use resolve::{project, resolve_field};
pub use store::{
    CanonicalStore, ReconcileStats, fill_missing, identity_key, merge_into, reconcile_all,
    reconcile_into,
};
pub use substitutions::{FOOD_FIELD, Substitutions, aggregate_substitutions};
