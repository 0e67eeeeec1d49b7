//! # Screening Orchestrator
//!
//! Facade over the processing engine for one screening session:
//! 1. Wire the roster store, scorer and notification sink into a shared context
//! 2. Route single-candidate requests to the [`CandidateProcessor`]
//! 3. Route "process all" requests to the [`BatchProcessor`] with a fresh
//!    unprocessed set read from the store
//! 4. Push roster changes to subscribers and derive filtered views
//!
//! Dropping the orchestrator, or calling [`ScreeningOrchestrator::shutdown`],
//! cancels a running batch and silences every listener.

use std::sync::Arc;

use pipeline::{CandidateFilterEngine, FilterCriteria};
use roster::{Candidate, RosterStore};
use tokio::sync::{broadcast, watch};
use tracing::info;

use crate::batch::{BatchOutcome, BatchProcessor};
use crate::config::EngineConfig;
use crate::context::{EngineContext, RosterRefresh};
use crate::error::Result;
use crate::events::EngineEvent;
use crate::notify::NotificationSink;
use crate::processor::{CandidateProcessor, ProcessOutcome, Rejection};
use crate::scorer::Scorer;
use crate::state::ProcessingSnapshot;

pub struct ScreeningOrchestrator {
    context: Arc<EngineContext>,
    processor: Arc<CandidateProcessor>,
    batch: BatchProcessor,
    filter_engine: CandidateFilterEngine,
}

impl ScreeningOrchestrator {
    pub fn new(
        store: Arc<dyn RosterStore>,
        scorer: Arc<dyn Scorer>,
        notifier: Arc<dyn NotificationSink>,
        config: EngineConfig,
    ) -> Self {
        let context = Arc::new(EngineContext::new(store, scorer, notifier, config));
        let processor = Arc::new(CandidateProcessor::new(context.clone()));
        let batch = BatchProcessor::new(processor.clone());

        Self {
            context,
            processor,
            batch,
            filter_engine: CandidateFilterEngine::new(),
        }
    }

    pub fn context(&self) -> &Arc<EngineContext> {
        &self.context
    }

    /// Score one candidate. See [`CandidateProcessor::process_one`].
    pub async fn process_one(&self, job_id: Option<&str>, candidate_id: &str) -> ProcessOutcome {
        self.processor.process_one(job_id, candidate_id).await
    }

    /// Score every candidate of the job that has no scores yet.
    ///
    /// The unprocessed set is read from the store at call time, so running
    /// this again after a batch only targets what is still missing.
    pub async fn process_all(&self, job_id: &str) -> Result<BatchOutcome> {
        if self.batch.is_active() {
            return Ok(BatchOutcome::Rejected(Rejection::BatchActive));
        }

        let roster = self.context.store().roster(job_id).await?;
        let unprocessed = roster.unprocessed_ids();
        info!(
            "Job {} has {} unprocessed of {} candidates",
            job_id,
            unprocessed.len(),
            roster.candidates.len()
        );

        Ok(self.batch.process_all(Some(job_id), unprocessed).await)
    }

    /// Score an explicit set of candidates as one batch.
    pub async fn process_candidates(
        &self,
        job_id: Option<&str>,
        candidate_ids: Vec<String>,
    ) -> BatchOutcome {
        self.batch.process_all(job_id, candidate_ids).await
    }

    /// Stop the running batch after its in-flight candidates.
    pub fn cancel_batch(&self) -> bool {
        self.batch.cancel()
    }

    /// Re-read the roster and push the derived state to subscribers.
    pub async fn refresh(&self, job_id: &str) -> Result<RosterRefresh> {
        self.context.refresh(job_id).await
    }

    /// Star or unstar a candidate, then refresh.
    pub async fn set_starred(
        &self,
        job_id: &str,
        candidate_id: &str,
        starred: bool,
    ) -> Result<RosterRefresh> {
        self.context
            .store()
            .set_starred(job_id, candidate_id, starred)
            .await?;
        info!(
            "Candidate {} {}",
            candidate_id,
            if starred { "starred" } else { "unstarred" }
        );
        self.refresh(job_id).await
    }

    /// Display list for the job's current roster.
    pub async fn filtered_view(
        &self,
        job_id: &str,
        criteria: &FilterCriteria,
        focused_candidate_id: Option<&str>,
    ) -> Result<Vec<Candidate>> {
        let roster = self.context.store().roster(job_id).await?;
        Ok(self
            .filter_engine
            .filter(&roster.candidates, criteria, focused_candidate_id))
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.context.events().subscribe()
    }

    pub fn watch_state(&self) -> watch::Receiver<ProcessingSnapshot> {
        self.context.state().subscribe()
    }

    pub fn snapshot(&self) -> ProcessingSnapshot {
        self.context.state().snapshot()
    }

    /// Cancel any running batch and stop talking to listeners.
    pub fn shutdown(&self) {
        if self.context.is_closed() {
            return;
        }
        info!("Shutting down screening orchestrator");
        self.context.close();
    }
}

impl Drop for ScreeningOrchestrator {
    fn drop(&mut self) {
        self.context.close();
    }
}
