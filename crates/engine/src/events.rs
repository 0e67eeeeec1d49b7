//! In-process engine events backed by a `tokio::sync::broadcast` channel.
//!
//! UI layers subscribe here instead of polling the store: every roster
//! mutation the engine observes is followed by a [`EngineEvent::RosterRefreshed`]
//! carrying the recomputed summary and call-to-action flag.

use pipeline::RosterSummary;
use roster::JobId;
use tokio::sync::broadcast;

use crate::state::{BatchRun, BatchSummary};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    BatchStarted {
        job_id: JobId,
        total: usize,
    },
    /// Emitted after every attempted candidate of a batch.
    BatchProgress {
        job_id: JobId,
        run: BatchRun,
        progress_percent: u8,
    },
    BatchFinished {
        job_id: JobId,
        summary: BatchSummary,
    },
    /// The roster was re-read after a change.
    RosterRefreshed {
        job_id: JobId,
        summary: RosterSummary,
        show_completion_cta: bool,
    },
}

/// Fan-out bus for [`EngineEvent`]s.
///
/// When the buffer is full, the oldest un-consumed events are dropped and
/// slow receivers observe `RecvError::Lagged`.
#[derive(Debug)]
pub struct EventBus {
    sender: broadcast::Sender<EngineEvent>,
}

impl EventBus {
    /// A capacity of 0 is raised to 1.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    pub fn publish(&self, event: EngineEvent) {
        // Ignore the SendError: it only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_publish_reaches_every_subscriber() {
        let bus = EventBus::default();
        let mut first = bus.subscribe();
        let mut second = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);

        bus.publish(EngineEvent::BatchStarted {
            job_id: "job-1".to_string(),
            total: 2,
        });

        for rx in [&mut first, &mut second] {
            match rx.recv().await.unwrap() {
                EngineEvent::BatchStarted { job_id, total } => {
                    assert_eq!(job_id, "job-1");
                    assert_eq!(total, 2);
                }
                other => panic!("unexpected event: {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn test_zero_capacity_still_delivers() {
        let bus = EventBus::new(0);
        let mut rx = bus.subscribe();

        bus.publish(EngineEvent::BatchStarted {
            job_id: "job-1".to_string(),
            total: 1,
        });

        assert!(matches!(
            rx.recv().await.unwrap(),
            EngineEvent::BatchStarted { total: 1, .. }
        ));
    }

    #[test]
    fn test_publish_without_subscribers() {
        let bus = EventBus::new(4);
        bus.publish(EngineEvent::BatchStarted {
            job_id: "job-1".to_string(),
            total: 1,
        });
    }
}
