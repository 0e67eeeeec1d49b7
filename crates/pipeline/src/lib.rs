//! View-state derivation for a job's candidate roster.
//!
//! This crate provides:
//! - Filter trait and implementations for candidate filtering
//! - FilterPipeline for composing filters
//! - CandidateFilterEngine for the sorted display list
//! - CompletionAdvisor for the "processing complete" prompt
//!
//! ## Architecture
//! Everything here is a pure function of the roster and the viewer's
//! criteria. Callers rerun it whenever either changes:
//! 1. Category and search filters narrow the roster
//! 2. The engine sorts the survivors by overall score
//! 3. The advisor looks at the whole roster, not the filtered view
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{CandidateFilterEngine, Category, CompletionAdvisor, FilterCriteria};
//!
//! let engine = CandidateFilterEngine::new();
//! let visible = engine.filter(&roster.candidates, &FilterCriteria::category(Category::Starred), None);
//! let show_cta = CompletionAdvisor::should_show_completion_cta(&roster.candidates);
//! ```

pub mod advisor;
pub mod filter_pipeline;
pub mod filters;
pub mod traits;
pub mod view;

// Re-export main types
pub use advisor::{CompletionAdvisor, RosterSummary};
pub use filter_pipeline::FilterPipeline;
pub use traits::{Category, Filter, FilterCriteria, ParseCategoryError};
pub use view::CandidateFilterEngine;
