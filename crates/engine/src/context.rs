//! Collaborators and shared state every processor works against.

use std::sync::Arc;

use pipeline::{CompletionAdvisor, RosterSummary};
use roster::RosterStore;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::config::EngineConfig;
use crate::error::Result;
use crate::events::{EngineEvent, EventBus};
use crate::notify::{Notification, NotificationSink};
use crate::scorer::Scorer;
use crate::state::ProcessingState;

/// Result of re-reading a roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RosterRefresh {
    pub summary: RosterSummary,
    pub show_completion_cta: bool,
}

/// What the processors share: collaborators, processing state, the event
/// bus and the teardown signal.
///
/// Once torn down, no notification or event leaves the engine.
pub struct EngineContext {
    store: Arc<dyn RosterStore>,
    scorer: Arc<dyn Scorer>,
    notifier: Arc<dyn NotificationSink>,
    events: EventBus,
    state: ProcessingState,
    config: EngineConfig,
    teardown: CancellationToken,
}

impl EngineContext {
    pub fn new(
        store: Arc<dyn RosterStore>,
        scorer: Arc<dyn Scorer>,
        notifier: Arc<dyn NotificationSink>,
        config: EngineConfig,
    ) -> Self {
        Self {
            store,
            scorer,
            notifier,
            events: EventBus::new(config.event_capacity),
            state: ProcessingState::new(),
            config,
            teardown: CancellationToken::new(),
        }
    }

    pub fn state(&self) -> &ProcessingState {
        &self.state
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<dyn RosterStore> {
        &self.store
    }

    pub(crate) fn scorer(&self) -> &Arc<dyn Scorer> {
        &self.scorer
    }

    /// Token cancelled on teardown; batch tokens are its children.
    pub(crate) fn teardown_token(&self) -> &CancellationToken {
        &self.teardown
    }

    pub fn is_closed(&self) -> bool {
        self.teardown.is_cancelled()
    }

    /// Stop talking to listeners and cancel any running batch.
    pub fn close(&self) {
        self.teardown.cancel();
    }

    pub(crate) fn notify(&self, notification: Notification) {
        if self.is_closed() {
            debug!("Dropping notification after teardown: {}", notification.message);
            return;
        }
        self.notifier.notify(notification);
    }

    pub(crate) fn publish(&self, event: EngineEvent) {
        if self.is_closed() {
            return;
        }
        self.events.publish(event);
    }

    /// Re-read the roster, recompute the derived view state and push it to
    /// subscribers.
    pub async fn refresh(&self, job_id: &str) -> Result<RosterRefresh> {
        let roster = self.store.roster(job_id).await?;
        let refresh = RosterRefresh {
            summary: RosterSummary::of(&roster.candidates),
            show_completion_cta: CompletionAdvisor::should_show_completion_cta(&roster.candidates),
        };

        self.publish(EngineEvent::RosterRefreshed {
            job_id: job_id.to_string(),
            summary: refresh.summary,
            show_completion_cta: refresh.show_completion_cta,
        });
        Ok(refresh)
    }
}
