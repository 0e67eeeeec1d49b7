//! # Roster Crate
//!
//! This crate holds the candidate roster of a job posting and the stores it
//! lives in.
//!
//! ## Main Components
//!
//! - **types**: Domain types (Job, Requirement, Candidate, Assessment, Roster)
//! - **store**: The `RosterStore` trait plus in-memory and JSON-file stores
//! - **error**: Error types for roster operations
//!
//! ## Example Usage
//!
//! ```ignore
//! use roster::{JsonRosterStore, RosterStore};
//!
//! let store = JsonRosterStore::open("roster.json").await?;
//! let roster = store.roster(&store.job_id().await).await?;
//!
//! println!("{} of {} candidates processed", roster.processed_count(), roster.candidates.len());
//! ```

pub mod error;
pub mod store;
pub mod types;

// Re-export commonly used types for convenience
pub use error::{Result, RosterError};
pub use store::{InMemoryRosterStore, JsonRosterStore, RosterStore};
pub use types::{
    // Type aliases
    CandidateId,
    JobId,
    // Core types
    Assessment,
    Candidate,
    Job,
    Requirement,
    RequirementScore,
    Roster,
};
