//! Free-text search over a candidate's name and assessment notes.

use crate::traits::{Filter, FilterCriteria};
use roster::Candidate;

/// Case-insensitive substring search over name, strengths and weaknesses.
///
/// An empty query keeps every candidate.
pub struct SearchFilter;

impl SearchFilter {
    fn matches(candidate: &Candidate, needle: &str) -> bool {
        candidate.name.to_lowercase().contains(needle)
            || candidate
                .strengths
                .iter()
                .chain(candidate.weaknesses.iter())
                .any(|note| note.to_lowercase().contains(needle))
    }
}

impl Filter for SearchFilter {
    fn name(&self) -> &str {
        "SearchFilter"
    }

    fn apply(&self, candidates: Vec<Candidate>, criteria: &FilterCriteria) -> Vec<Candidate> {
        if criteria.search_query.is_empty() {
            return candidates;
        }

        let needle = criteria.search_query.to_lowercase();
        candidates
            .into_iter()
            .filter(|candidate| Self::matches(candidate, &needle))
            .collect()
    }
}
