//! Batch processing: "process all unprocessed candidates".
//!
//! ## Ordering
//! With the default concurrency of 1, candidates are scored strictly in the
//! order supplied, each finishing before the next starts. A higher
//! concurrency runs a bounded worker pool instead; progress still only ever
//! moves forward.
//!
//! ## Failure semantics
//! A failed candidate is counted and reported, never retried, and never
//! stops the batch. Every targeted candidate is attempted exactly once
//! unless the batch is cancelled, in which case the in-flight candidate
//! finishes and no new ones are started.

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::Mutex;
use roster::CandidateId;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::context::EngineContext;
use crate::events::EngineEvent;
use crate::notify::Notification;
use crate::processor::{CandidateProcessor, ProcessOutcome, Rejection};
use crate::state::{BatchRun, BatchSummary, ProcessingState};

/// How a batch request ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOutcome {
    Finished(BatchSummary),
    Rejected(Rejection),
}

impl BatchOutcome {
    pub fn summary(&self) -> Option<&BatchSummary> {
        match self {
            BatchOutcome::Finished(summary) => Some(summary),
            BatchOutcome::Rejected(_) => None,
        }
    }
}

/// Drives a candidate processor across a set of candidates.
pub struct BatchProcessor {
    processor: Arc<CandidateProcessor>,
    concurrency: usize,
    current: Mutex<Option<CancellationToken>>,
}

impl BatchProcessor {
    pub fn new(processor: Arc<CandidateProcessor>) -> Self {
        let concurrency = processor.context().config().concurrency.max(1);
        Self {
            processor,
            concurrency,
            current: Mutex::new(None),
        }
    }

    pub fn is_active(&self) -> bool {
        self.processor.context().state().is_batch_active()
    }

    /// Ask the running batch to stop after its in-flight candidates.
    ///
    /// Returns false when no batch is running.
    pub fn cancel(&self) -> bool {
        match self.current.lock().as_ref() {
            Some(token) => {
                info!("Cancelling running batch");
                token.cancel();
                true
            }
            None => false,
        }
    }

    /// Score every candidate in `candidate_ids`.
    ///
    /// No-op when the job is missing, the set is empty, or a batch is
    /// already running. Duplicate ids are attempted once.
    pub async fn process_all(
        &self,
        job_id: Option<&str>,
        candidate_ids: Vec<CandidateId>,
    ) -> BatchOutcome {
        let context = self.processor.context();

        let Some(job_id) = job_id else {
            return BatchOutcome::Rejected(Rejection::MissingJobId);
        };
        if context.is_closed() {
            return BatchOutcome::Rejected(Rejection::ShutDown);
        }
        let candidate_ids = dedup_in_order(candidate_ids);
        if candidate_ids.is_empty() {
            return BatchOutcome::Rejected(Rejection::NothingToProcess);
        }
        if !context.state().try_begin_batch(candidate_ids.len()) {
            info!("Batch for job {} rejected: another batch is running", job_id);
            return BatchOutcome::Rejected(Rejection::BatchActive);
        }

        let token = context.teardown_token().child_token();
        *self.current.lock() = Some(token.clone());
        let active = ActiveBatch {
            state: context.state(),
            current: &self.current,
        };

        info!(
            "Starting batch of {} candidates for job {} (concurrency {})",
            candidate_ids.len(),
            job_id,
            self.concurrency
        );
        context.publish(EngineEvent::BatchStarted {
            job_id: job_id.to_string(),
            total: candidate_ids.len(),
        });

        let cancelled = if self.concurrency <= 1 {
            self.run_sequential(job_id, candidate_ids, &token).await
        } else {
            self.run_pooled(job_id, candidate_ids, &token).await
        };

        let run = context.state().finish_batch();
        drop(active);
        let summary = BatchSummary::from_run(&run, cancelled);
        log_batch_complete(job_id, &summary);

        context.notify(Notification::info(format!(
            "Processed {} of {} candidates ({} failed)",
            summary.succeeded(),
            summary.total,
            summary.failed
        )));
        if let Err(e) = context.refresh(job_id).await {
            error!("Could not refresh roster for job {}: {}", job_id, e);
        }
        context.publish(EngineEvent::BatchFinished {
            job_id: job_id.to_string(),
            summary,
        });

        BatchOutcome::Finished(summary)
    }

    /// One candidate at a time, in order. Returns whether it was cancelled.
    async fn run_sequential(
        &self,
        job_id: &str,
        candidate_ids: Vec<CandidateId>,
        token: &CancellationToken,
    ) -> bool {
        let context = self.processor.context();

        for candidate_id in candidate_ids {
            if token.is_cancelled() {
                info!("Batch for job {} cancelled", job_id);
                return true;
            }
            context
                .state()
                .set_currently_processing(Some(candidate_id.clone()));

            let outcome = self.processor.score(job_id, &candidate_id).await;
            record_progress(context, job_id, &outcome);
        }
        false
    }

    /// Bounded worker pool. Returns whether it was cancelled.
    ///
    /// At most `concurrency` scoring tasks run at once. Results are
    /// recorded here as tasks finish, so progress is counted by a single
    /// writer and never goes backwards.
    async fn run_pooled(
        &self,
        job_id: &str,
        candidate_ids: Vec<CandidateId>,
        token: &CancellationToken,
    ) -> bool {
        let context = self.processor.context();
        let mut queue = candidate_ids.into_iter();
        let mut tasks = JoinSet::new();
        let mut cancelled = false;

        loop {
            while !cancelled && tasks.len() < self.concurrency {
                if token.is_cancelled() {
                    info!("Batch for job {} cancelled", job_id);
                    cancelled = true;
                    break;
                }
                let Some(candidate_id) = queue.next() else {
                    break;
                };
                context
                    .state()
                    .set_currently_processing(Some(candidate_id.clone()));

                let processor = self.processor.clone();
                let job_id = job_id.to_string();
                tasks.spawn(async move { processor.score(&job_id, &candidate_id).await });
            }

            let joined = tokio::select! {
                biased;
                joined = tasks.join_next() => joined,
                _ = token.cancelled(), if !cancelled => continue,
            };

            // In-flight candidates always run to completion
            match joined {
                Some(Ok(outcome)) => record_progress(context, job_id, &outcome),
                Some(Err(e)) => {
                    error!("Scoring task for job {} failed: {}", job_id, e);
                    let run = context.state().record_failure();
                    publish_progress(context, job_id, run);
                }
                None => break,
            }
        }
        cancelled
    }
}

/// Count one attempted candidate and tell subscribers.
fn record_progress(context: &EngineContext, job_id: &str, outcome: &ProcessOutcome) {
    let state = context.state();
    let run = match outcome {
        ProcessOutcome::Processed => state.record_success(),
        ProcessOutcome::Failed(_) => state.record_failure(),
        ProcessOutcome::Rejected(_) => state.record_skipped(),
    };
    publish_progress(context, job_id, run);
}

fn publish_progress(context: &EngineContext, job_id: &str, run: BatchRun) {
    info!(
        "[job {}] {}/{} candidates attempted ({}%), {} failed",
        job_id,
        run.completed,
        run.total,
        run.progress_percent(),
        run.failed
    );
    context.publish(EngineEvent::BatchProgress {
        job_id: job_id.to_string(),
        progress_percent: run.progress_percent(),
        run,
    });
}

fn dedup_in_order(candidate_ids: Vec<CandidateId>) -> Vec<CandidateId> {
    let mut seen = HashSet::new();
    candidate_ids
        .into_iter()
        .filter(|id| seen.insert(id.clone()))
        .collect()
}

/// Keeps the batch marked active only while `process_all` is alive, even
/// if its future is dropped halfway.
struct ActiveBatch<'a> {
    state: &'a ProcessingState,
    current: &'a Mutex<Option<CancellationToken>>,
}

impl Drop for ActiveBatch<'_> {
    fn drop(&mut self) {
        self.state.finish_batch();
        self.current.lock().take();
    }
}

fn log_batch_complete(job_id: &str, summary: &BatchSummary) {
    info!(
        "Batch for job {} complete: {} succeeded, {} failed, {} skipped of {}{}",
        job_id,
        summary.succeeded(),
        summary.failed,
        summary.skipped,
        summary.total,
        if summary.cancelled { " (cancelled)" } else { "" }
    );
}
