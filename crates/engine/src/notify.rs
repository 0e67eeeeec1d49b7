//! Human-readable notifications about processing results.
//!
//! Delivery is fire-and-forget: sinks never report back and a dropped
//! receiver is not an error.

use roster::CandidateId;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::error::ScoringFailure;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Failure,
    Info,
}

/// A transient message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
    pub candidate_id: Option<CandidateId>,
    /// Underlying cause, for failures
    pub detail: Option<String>,
}

impl Notification {
    pub fn success(candidate_id: &str) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: "Candidate processed successfully".to_string(),
            candidate_id: Some(candidate_id.to_string()),
            detail: None,
        }
    }

    pub fn failure(candidate_id: &str, failure: &ScoringFailure) -> Self {
        Self {
            level: NotificationLevel::Failure,
            message: "Failed to process candidate".to_string(),
            candidate_id: Some(candidate_id.to_string()),
            detail: Some(failure.reason.clone()),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Info,
            message: message.into(),
            candidate_id: None,
            detail: None,
        }
    }
}

/// Receives notifications.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Writes notifications to the tracing log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl NotificationSink for TracingNotifier {
    fn notify(&self, notification: Notification) {
        let candidate = notification.candidate_id.as_deref().unwrap_or("-");
        match notification.level {
            NotificationLevel::Failure => warn!(
                "{} (candidate {}): {}",
                notification.message,
                candidate,
                notification.detail.as_deref().unwrap_or("unknown error")
            ),
            _ => info!("{} (candidate {})", notification.message, candidate),
        }
    }
}

/// Forwards notifications to an unbounded channel, for UIs that render them.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    sender: mpsc::UnboundedSender<Notification>,
}

impl ChannelNotifier {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl NotificationSink for ChannelNotifier {
    fn notify(&self, notification: Notification) {
        // Ignore the SendError: the receiving side has gone away
        let _ = self.sender.send(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_notifier_forwards() {
        let (notifier, mut rx) = ChannelNotifier::new();

        notifier.notify(Notification::success("a"));
        notifier.notify(Notification::failure("b", &ScoringFailure::new("timeout")));

        let first = rx.try_recv().unwrap();
        assert_eq!(first.level, NotificationLevel::Success);
        assert_eq!(first.message, "Candidate processed successfully");

        let second = rx.try_recv().unwrap();
        assert_eq!(second.level, NotificationLevel::Failure);
        assert_eq!(second.message, "Failed to process candidate");
        assert_eq!(second.detail.as_deref(), Some("timeout"));
    }

    #[test]
    fn test_channel_notifier_survives_dropped_receiver() {
        let (notifier, rx) = ChannelNotifier::new();
        drop(rx);

        notifier.notify(Notification::info("still fine"));
    }
}
