//! Roster storage.
//!
//! The hosted database owns rosters; the rest of the system only sees it
//! through [`RosterStore`]. Readers always get a fresh copy of the roster so
//! they observe mutations made elsewhere in the meantime.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::{Result, RosterError};
use crate::types::{Assessment, JobId, Roster};

/// Source and sink for job rosters.
#[async_trait]
pub trait RosterStore: Send + Sync {
    /// Current roster for a job.
    async fn roster(&self, job_id: &str) -> Result<Roster>;

    /// Store the scoring result for one candidate.
    async fn record_assessment(
        &self,
        job_id: &str,
        candidate_id: &str,
        assessment: Assessment,
    ) -> Result<()>;

    /// Star or unstar a candidate.
    async fn set_starred(&self, job_id: &str, candidate_id: &str, starred: bool) -> Result<()>;
}

// =============================================================================
// In-memory store
// =============================================================================

/// Rosters kept in process memory, keyed by job id.
#[derive(Debug, Default)]
pub struct InMemoryRosterStore {
    rosters: RwLock<HashMap<JobId, Roster>>,
}

impl InMemoryRosterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding a single roster.
    pub fn with_roster(roster: Roster) -> Self {
        let mut rosters = HashMap::new();
        rosters.insert(roster.job.id.clone(), roster);
        Self {
            rosters: RwLock::new(rosters),
        }
    }

    /// Insert or replace the roster for its job.
    pub async fn insert(&self, roster: Roster) {
        self.rosters
            .write()
            .await
            .insert(roster.job.id.clone(), roster);
    }

    async fn update<F>(&self, job_id: &str, f: F) -> Result<()>
    where
        F: FnOnce(&mut Roster) -> Result<()> + Send,
    {
        let mut rosters = self.rosters.write().await;
        let roster = rosters
            .get_mut(job_id)
            .ok_or_else(|| RosterError::JobNotFound {
                job_id: job_id.to_string(),
            })?;
        f(roster)
    }
}

#[async_trait]
impl RosterStore for InMemoryRosterStore {
    async fn roster(&self, job_id: &str) -> Result<Roster> {
        self.rosters
            .read()
            .await
            .get(job_id)
            .cloned()
            .ok_or_else(|| RosterError::JobNotFound {
                job_id: job_id.to_string(),
            })
    }

    async fn record_assessment(
        &self,
        job_id: &str,
        candidate_id: &str,
        assessment: Assessment,
    ) -> Result<()> {
        self.update(job_id, |roster| {
            roster.apply_assessment(candidate_id, assessment)
        })
        .await?;
        debug!("Recorded assessment for candidate {} of job {}", candidate_id, job_id);
        Ok(())
    }

    async fn set_starred(&self, job_id: &str, candidate_id: &str, starred: bool) -> Result<()> {
        self.update(job_id, |roster| roster.set_starred(candidate_id, starred))
            .await
    }
}

// =============================================================================
// JSON file store
// =============================================================================

/// A single roster persisted as a JSON file.
///
/// The file is rewritten after every mutation.
#[derive(Debug)]
pub struct JsonRosterStore {
    path: PathBuf,
    roster: RwLock<Roster>,
}

impl JsonRosterStore {
    /// Load a roster file from disk.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let raw = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| RosterError::Io {
                path: path.display().to_string(),
                source,
            })?;
        let roster: Roster = serde_json::from_str(&raw).map_err(|source| RosterError::Json {
            path: path.display().to_string(),
            source,
        })?;

        debug!(
            "Loaded roster for job {} with {} candidates from {}",
            roster.job.id,
            roster.candidates.len(),
            path.display()
        );

        Ok(Self {
            path,
            roster: RwLock::new(roster),
        })
    }

    /// Id of the job this file holds.
    pub async fn job_id(&self) -> JobId {
        self.roster.read().await.job.id.clone()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn update<F>(&self, job_id: &str, f: F) -> Result<()>
    where
        F: FnOnce(&mut Roster) -> Result<()> + Send,
    {
        let mut roster = self.roster.write().await;
        if roster.job.id != job_id {
            return Err(RosterError::JobNotFound {
                job_id: job_id.to_string(),
            });
        }
        // Work on a copy: memory only changes once the file has been written
        let mut updated = roster.clone();
        f(&mut updated)?;

        // Still holding the write lock, so concurrent updates land in order.
        let json = serde_json::to_string_pretty(&updated).map_err(|source| RosterError::Json {
            path: self.path.display().to_string(),
            source,
        })?;
        tokio::fs::write(&self.path, json)
            .await
            .map_err(|source| RosterError::Io {
                path: self.path.display().to_string(),
                source,
            })?;

        *roster = updated;
        Ok(())
    }
}

#[async_trait]
impl RosterStore for JsonRosterStore {
    async fn roster(&self, job_id: &str) -> Result<Roster> {
        let roster = self.roster.read().await;
        if roster.job.id != job_id {
            return Err(RosterError::JobNotFound {
                job_id: job_id.to_string(),
            });
        }
        Ok(roster.clone())
    }

    async fn record_assessment(
        &self,
        job_id: &str,
        candidate_id: &str,
        assessment: Assessment,
    ) -> Result<()> {
        self.update(job_id, |roster| {
            roster.apply_assessment(candidate_id, assessment)
        })
        .await
    }

    async fn set_starred(&self, job_id: &str, candidate_id: &str, starred: bool) -> Result<()> {
        self.update(job_id, |roster| roster.set_starred(candidate_id, starred))
            .await
    }
}
