//! Filter implementations for the candidate pipeline.
//!
//! This module contains the concrete filters that can be composed into a
//! FilterPipeline.

pub mod category;
pub mod search;

// Re-export for convenience
pub use category::CategoryFilter;
pub use search::SearchFilter;
