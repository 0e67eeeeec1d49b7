//! Filter that narrows the roster to the viewer's selected category.

use crate::traits::{Filter, FilterCriteria};
use roster::Candidate;

/// Keeps candidates matching `criteria.category`.
///
/// `all` passes everything, `starred` keeps starred candidates,
/// `processed`/`unprocessed` split on whether scores exist.
pub struct CategoryFilter;

impl Filter for CategoryFilter {
    fn name(&self) -> &str {
        "CategoryFilter"
    }

    fn apply(&self, candidates: Vec<Candidate>, criteria: &FilterCriteria) -> Vec<Candidate> {
        candidates
            .into_iter()
            .filter(|candidate| criteria.category.matches(candidate))
            .collect()
    }
}
