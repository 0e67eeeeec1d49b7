//! Processing of a single candidate.
//!
//! Two guards protect a scoring call:
//! - the processor's own busy flag, so one triggering action cannot submit
//!   twice while its first call is outstanding
//! - the per-candidate in-flight marker in [`ProcessingState`], which lets
//!   different candidates score concurrently but never the same one twice
//!
//! Both are scoped and released on every exit path.
//!
//! [`ProcessingState`]: crate::state::ProcessingState

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::context::EngineContext;
use crate::error::ScoringFailure;
use crate::notify::Notification;
use crate::state::InFlight;

/// Why a request was turned into a no-op.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    #[error("no job selected")]
    MissingJobId,

    #[error("processor is already handling a candidate")]
    ProcessorBusy,

    #[error("candidate already has a scoring call in flight")]
    AlreadyInFlight,

    #[error("a batch is already running")]
    BatchActive,

    #[error("no candidates to process")]
    NothingToProcess,

    #[error("engine has been shut down")]
    ShutDown,
}

/// How a single processing request ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessOutcome {
    Processed,
    Failed(ScoringFailure),
    Rejected(Rejection),
}

impl ProcessOutcome {
    pub fn is_processed(&self) -> bool {
        matches!(self, ProcessOutcome::Processed)
    }
}

/// Orchestrates the scoring call for one candidate.
pub struct CandidateProcessor {
    context: Arc<EngineContext>,
    busy: AtomicBool,
}

impl CandidateProcessor {
    pub fn new(context: Arc<EngineContext>) -> Self {
        Self {
            context,
            busy: AtomicBool::new(false),
        }
    }

    pub fn context(&self) -> &Arc<EngineContext> {
        &self.context
    }

    /// Whether a `process_one` call is currently outstanding.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Process one candidate on behalf of a user action.
    ///
    /// No-op (with the reason returned) when the job is missing, the engine
    /// is shut down, a batch is running, or this processor is still busy
    /// with an earlier request.
    pub async fn process_one(&self, job_id: Option<&str>, candidate_id: &str) -> ProcessOutcome {
        let Some(job_id) = job_id else {
            debug!("Ignoring request for candidate {}: no job selected", candidate_id);
            return ProcessOutcome::Rejected(Rejection::MissingJobId);
        };
        if self.context.is_closed() {
            return ProcessOutcome::Rejected(Rejection::ShutDown);
        }
        if self.context.state().is_batch_active() {
            debug!("Ignoring request for candidate {}: batch running", candidate_id);
            return ProcessOutcome::Rejected(Rejection::BatchActive);
        }
        let Some(_busy) = BusyGuard::acquire(&self.busy) else {
            debug!("Ignoring request for candidate {}: processor busy", candidate_id);
            return ProcessOutcome::Rejected(Rejection::ProcessorBusy);
        };

        self.score(job_id, candidate_id).await
    }

    /// Issue the scoring call under the candidate's in-flight marker.
    ///
    /// ## Algorithm
    /// 1. Mark the candidate in flight (or bail out if it already is)
    /// 2. Await the scoring collaborator
    /// 3. Clear the marker
    /// 4. Success: notify, then re-read the roster and push the derived
    ///    state; failure: notify only, no retry
    pub(crate) async fn score(&self, job_id: &str, candidate_id: &str) -> ProcessOutcome {
        let state = self.context.state();
        let Some(in_flight) = InFlight::acquire(state, candidate_id) else {
            debug!("Candidate {} is already being scored", candidate_id);
            return ProcessOutcome::Rejected(Rejection::AlreadyInFlight);
        };

        debug!("Scoring candidate {} for job {}", candidate_id, job_id);
        let result = self.context.scorer().score(job_id, candidate_id).await;
        drop(in_flight);

        match result {
            Ok(()) => {
                info!("Candidate {} processed", candidate_id);
                self.context.notify(Notification::success(candidate_id));

                // Fresh read: other candidates may have changed meanwhile
                if let Err(e) = self.context.refresh(job_id).await {
                    warn!("Could not refresh roster for job {}: {}", job_id, e);
                }
                ProcessOutcome::Processed
            }
            Err(failure) => {
                warn!("Failed to process candidate {}: {}", candidate_id, failure);
                self.context
                    .notify(Notification::failure(candidate_id, &failure));
                ProcessOutcome::Failed(failure)
            }
        }
    }
}

/// Scoped hold on the processor's busy flag.
struct BusyGuard<'a>(&'a AtomicBool);

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_busy_guard_is_exclusive_and_scoped() {
        let flag = AtomicBool::new(false);

        let guard = BusyGuard::acquire(&flag);
        assert!(guard.is_some());
        assert!(BusyGuard::acquire(&flag).is_none());

        drop(guard);
        assert!(BusyGuard::acquire(&flag).is_some());
    }
}
