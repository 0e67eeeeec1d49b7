//! Error types for the roster crate.

use thiserror::Error;

/// Errors raised by roster operations and roster stores
#[derive(Error, Debug)]
pub enum RosterError {
    /// No roster is stored for the job
    #[error("Job not found: {job_id}")]
    JobNotFound { job_id: String },

    /// The job's roster has no candidate with this id
    #[error("Candidate not found: {candidate_id}")]
    CandidateNotFound { candidate_id: String },

    /// An assessment must carry at least one requirement score
    #[error("Assessment for candidate {candidate_id} has no scores")]
    EmptyAssessment { candidate_id: String },

    /// I/O error while reading or writing a roster file
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Roster file is not valid JSON for a roster
    #[error("Invalid roster file {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, RosterError>;
