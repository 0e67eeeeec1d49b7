//! Roster-derived prompts and counts.

use roster::Candidate;
use serde::{Deserialize, Serialize};

/// Decides whether the "processing complete" call-to-action should show.
///
/// Stateless: the answer is always derived from the roster it is handed.
pub struct CompletionAdvisor;

impl CompletionAdvisor {
    /// True iff the roster is in a mixed state: at least one candidate
    /// processed and at least one still unprocessed.
    pub fn should_show_completion_cta(candidates: &[Candidate]) -> bool {
        let any_processed = candidates.iter().any(|c| c.is_processed());
        let any_unprocessed = candidates.iter().any(|c| !c.is_processed());
        any_processed && any_unprocessed
    }
}

/// Counts shown next to the candidate list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterSummary {
    pub total: usize,
    pub processed: usize,
    pub unprocessed: usize,
    pub starred: usize,
}

impl RosterSummary {
    pub fn of(candidates: &[Candidate]) -> Self {
        let processed = candidates.iter().filter(|c| c.is_processed()).count();
        Self {
            total: candidates.len(),
            processed,
            unprocessed: candidates.len() - processed,
            starred: candidates.iter().filter(|c| c.is_starred).count(),
        }
    }
}
