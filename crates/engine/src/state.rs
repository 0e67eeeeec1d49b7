//! Processing state shared by the single and batch processors.
//!
//! [`ProcessingState`] stores the set of candidates with an outstanding
//! scoring call and the progress of the current batch. It does no
//! orchestration of its own. Every change is published on a
//! `tokio::sync::watch` channel so readers see it without polling.

use std::collections::BTreeSet;

use roster::CandidateId;
use tokio::sync::watch;

/// Progress of one batch run.
///
/// `completed` counts every attempted candidate, failures and skips
/// included; `failed` and `skipped` break that number down.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchRun {
    pub total: usize,
    pub completed: usize,
    pub failed: usize,
    /// Targeted candidates that already had a scoring call in flight elsewhere
    pub skipped: usize,
    pub currently_processing: Option<CandidateId>,
    pub is_active: bool,
}

impl BatchRun {
    /// `round(completed / total * 100)`, 0 for an empty run.
    pub fn progress_percent(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        ((self.completed as f64 / self.total as f64) * 100.0).round() as u8
    }

    pub fn succeeded(&self) -> usize {
        self.completed.saturating_sub(self.failed + self.skipped)
    }
}

/// Final tally of a batch, kept after the run itself is reset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub completed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub cancelled: bool,
}

impl BatchSummary {
    pub fn from_run(run: &BatchRun, cancelled: bool) -> Self {
        Self {
            total: run.total,
            completed: run.completed,
            failed: run.failed,
            skipped: run.skipped,
            cancelled,
        }
    }

    pub fn succeeded(&self) -> usize {
        self.completed.saturating_sub(self.failed + self.skipped)
    }
}

/// Point-in-time copy of the processing state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessingSnapshot {
    pub in_flight: BTreeSet<CandidateId>,
    pub batch: BatchRun,
}

impl ProcessingSnapshot {
    pub fn is_processing(&self, candidate_id: &str) -> bool {
        self.in_flight.contains(candidate_id)
    }
}

/// Storage for the in-flight set and the current [`BatchRun`].
#[derive(Debug)]
pub struct ProcessingState {
    tx: watch::Sender<ProcessingSnapshot>,
}

impl ProcessingState {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(ProcessingSnapshot::default());
        Self { tx }
    }

    /// Receiver that is woken on every state change.
    pub fn subscribe(&self) -> watch::Receiver<ProcessingSnapshot> {
        self.tx.subscribe()
    }

    pub fn snapshot(&self) -> ProcessingSnapshot {
        self.tx.borrow().clone()
    }

    pub fn batch(&self) -> BatchRun {
        self.tx.borrow().batch.clone()
    }

    pub fn is_processing(&self, candidate_id: &str) -> bool {
        self.tx.borrow().is_processing(candidate_id)
    }

    pub fn is_batch_active(&self) -> bool {
        self.tx.borrow().batch.is_active
    }

    // ---------------------------------------------------------------------
    // In-flight set
    // ---------------------------------------------------------------------

    /// Mark a candidate as in flight. Returns false (and changes nothing)
    /// when it already was.
    pub fn add(&self, candidate_id: &str) -> bool {
        self.tx
            .send_if_modified(|s| s.in_flight.insert(candidate_id.to_string()))
    }

    /// Clear a candidate's in-flight marker. Returns false when it was absent.
    pub fn remove(&self, candidate_id: &str) -> bool {
        self.tx.send_if_modified(|s| s.in_flight.remove(candidate_id))
    }

    // ---------------------------------------------------------------------
    // Batch run
    // ---------------------------------------------------------------------

    /// Start a fresh run unless one is already active.
    pub fn try_begin_batch(&self, total: usize) -> bool {
        self.tx.send_if_modified(|s| {
            if s.batch.is_active {
                return false;
            }
            s.batch = BatchRun {
                total,
                is_active: true,
                ..Default::default()
            };
            true
        })
    }

    pub fn set_currently_processing(&self, candidate_id: Option<CandidateId>) {
        self.tx
            .send_modify(|s| s.batch.currently_processing = candidate_id);
    }

    pub fn record_success(&self) -> BatchRun {
        self.update_batch(|run| run.completed += 1)
    }

    pub fn record_failure(&self) -> BatchRun {
        self.update_batch(|run| {
            run.completed += 1;
            run.failed += 1;
        })
    }

    pub fn record_skipped(&self) -> BatchRun {
        self.update_batch(|run| {
            run.completed += 1;
            run.skipped += 1;
        })
    }

    /// Deactivate the run and clear the current candidate, keeping counters
    /// readable until the next run starts.
    pub fn finish_batch(&self) -> BatchRun {
        self.tx.send_if_modified(|s| {
            if !s.batch.is_active {
                return false;
            }
            s.batch.is_active = false;
            s.batch.currently_processing = None;
            true
        });
        self.batch()
    }

    /// Forget the last run entirely.
    pub fn reset_batch(&self) {
        self.tx.send_modify(|s| s.batch = BatchRun::default());
    }

    fn update_batch(&self, f: impl FnOnce(&mut BatchRun)) -> BatchRun {
        let mut updated = BatchRun::default();
        self.tx.send_modify(|s| {
            f(&mut s.batch);
            updated = s.batch.clone();
        });
        updated
    }
}

impl Default for ProcessingState {
    fn default() -> Self {
        Self::new()
    }
}

/// Scoped in-flight marker: the candidate leaves the set when this drops,
/// whichever way the scoring call ended.
pub(crate) struct InFlight<'a> {
    state: &'a ProcessingState,
    candidate_id: &'a str,
}

impl<'a> InFlight<'a> {
    pub(crate) fn acquire(state: &'a ProcessingState, candidate_id: &'a str) -> Option<Self> {
        state.add(candidate_id).then_some(Self {
            state,
            candidate_id,
        })
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.state.remove(self.candidate_id);
    }
}
