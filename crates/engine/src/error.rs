//! Error types for the processing engine.
//!
//! Guard rejections are not errors and live in [`crate::processor::Rejection`].

use roster::RosterError;
use scoring_client::ScoringClientError;
use thiserror::Error;

/// The scoring collaborator failed for one candidate.
///
/// Recovered where it happens: reported through the notification sink and
/// counted in the batch, never propagated further.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{reason}")]
pub struct ScoringFailure {
    pub reason: String,
}

impl ScoringFailure {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl From<ScoringClientError> for ScoringFailure {
    fn from(err: ScoringClientError) -> Self {
        Self::new(err.to_string())
    }
}

impl From<RosterError> for ScoringFailure {
    fn from(err: RosterError) -> Self {
        Self::new(format!("Could not record assessment: {err}"))
    }
}

/// Errors from engine operations that touch the roster store or the
/// scoring service connection.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    Roster(#[from] RosterError),

    #[error(transparent)]
    ScoringClient(#[from] ScoringClientError),
}

pub type Result<T> = std::result::Result<T, EngineError>;
