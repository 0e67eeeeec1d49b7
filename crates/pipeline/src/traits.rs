//! Core traits for the filtering pipeline.
//!
//! This module defines the Filter trait that allows composable,
//! extensible filters to be applied to a roster's candidates, together with
//! the viewer-owned criteria every filter reads.

use std::fmt;
use std::str::FromStr;

use roster::Candidate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which slice of the roster the viewer is looking at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    All,
    Starred,
    Processed,
    Unprocessed,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::All => "all",
            Category::Starred => "starred",
            Category::Processed => "processed",
            Category::Unprocessed => "unprocessed",
        }
    }

    /// Whether a candidate belongs to this category.
    pub fn matches(&self, candidate: &Candidate) -> bool {
        match self {
            Category::All => true,
            Category::Starred => candidate.is_starred,
            Category::Processed => candidate.is_processed(),
            Category::Unprocessed => !candidate.is_processed(),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a category name is not one of `all`, `starred`,
/// `processed` or `unprocessed`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown category: {0} (expected all, starred, processed or unprocessed)")]
pub struct ParseCategoryError(pub String);

impl FromStr for Category {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(Category::All),
            "starred" => Ok(Category::Starred),
            "processed" => Ok(Category::Processed),
            "unprocessed" => Ok(Category::Unprocessed),
            _ => Err(ParseCategoryError(s.to_string())),
        }
    }
}

/// Transient view criteria owned by the viewer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub search_query: String,
    pub category: Category,
}

impl FilterCriteria {
    pub fn new(search_query: impl Into<String>, category: Category) -> Self {
        Self {
            search_query: search_query.into(),
            category,
        }
    }

    pub fn category(category: Category) -> Self {
        Self::new("", category)
    }

    pub fn search(search_query: impl Into<String>) -> Self {
        Self::new(search_query, Category::All)
    }
}

/// Core trait for filtering candidates.
///
/// All filters must implement this trait to be used in the FilterPipeline.
///
/// ## Design Note
/// - `Send + Sync` allows filters to be shared with async tasks
/// - Filters take ownership of the Vec<Candidate> and return a filtered Vec
/// - Filters are pure: the same input always yields the same output, so the
///   pipeline can be rerun on every roster or criteria change
pub trait Filter: Send + Sync {
    /// Returns the name of this filter (for logging/debugging)
    fn name(&self) -> &str;

    /// Apply this filter to a set of candidates, keeping their relative order.
    fn apply(&self, candidates: Vec<Candidate>, criteria: &FilterCriteria) -> Vec<Candidate>;
}
