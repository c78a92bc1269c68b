//! CLI library components for the nutrition dataset unifier.

pub mod logging;
pub mod pipeline;
