//! Notification sink backends.
//!
//! This module provides the [`NotificationSink`] trait and default
//! implementations.

use parking_lot::Mutex;

use coinwork_core::Notification;

use crate::error::NotifyError;

/// Trait for notification delivery backends.
///
/// Implement this trait to create custom destinations (e.g. a notifications
/// collection, e-mail, a push gateway).
pub trait NotificationSink: Send + Sync {
    /// Delivers one notification.
    fn deliver(&self, notification: &Notification) -> Result<(), NotifyError>;
}

/// Sink that records notifications through the `tracing` infrastructure.
#[derive(Debug, Clone, Default)]
pub struct TracingSink;

impl TracingSink {
    /// Creates a new tracing-backed sink.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl NotificationSink for TracingSink {
    fn deliver(&self, notification: &Notification) -> Result<(), NotifyError> {
        tracing::info!(
            target: "coinwork_notify",
            notification_id = %notification.id,
            recipient = %notification.recipient_email,
            route = %notification.action_route,
            "{}",
            notification.message
        );
        Ok(())
    }
}

/// A no-op sink for disabled scenarios.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl NoopSink {
    /// Creates a new no-op sink.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl NotificationSink for NoopSink {
    fn deliver(&self, _notification: &Notification) -> Result<(), NotifyError> {
        Ok(())
    }
}

/// A sink that keeps every delivered notification in memory.
///
/// Intended for tests that assert on what was emitted.
#[derive(Debug, Default)]
pub struct MemorySink {
    delivered: Mutex<Vec<Notification>>,
}

impl MemorySink {
    /// Creates an empty in-memory sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything delivered so far, oldest first.
    #[must_use]
    pub fn delivered(&self) -> Vec<Notification> {
        self.delivered.lock().clone()
    }

    /// Notifications delivered to the given recipient.
    #[must_use]
    pub fn delivered_to(&self, recipient_email: &str) -> Vec<Notification> {
        self.delivered
            .lock()
            .iter()
            .filter(|n| n.recipient_email == recipient_email)
            .cloned()
            .collect()
    }
}

impl NotificationSink for MemorySink {
    fn deliver(&self, notification: &Notification) -> Result<(), NotifyError> {
        self.delivered.lock().push(notification.clone());
        Ok(())
    }
}

/// A boxed sink for dynamic dispatch.
pub type BoxedSink = Box<dyn NotificationSink>;

impl NotificationSink for BoxedSink {
    fn deliver(&self, notification: &Notification) -> Result<(), NotifyError> {
        (**self).deliver(notification)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn sample() -> Notification {
        Notification::new("w@x.com", "You have earned 5 coins", "/dashboard")
    }

    #[test]
    fn tracing_sink_delivers() {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            let sink = TracingSink::new();
            assert!(sink.deliver(&sample()).is_ok());
        });
    }

    #[test]
    fn noop_sink_delivers() {
        let sink = NoopSink::new();
        assert!(sink.deliver(&sample()).is_ok());
    }

    #[test]
    fn memory_sink_captures_in_order() {
        let sink = MemorySink::new();
        let first = sample();
        let second = Notification::new("b@x.com", "New submission", "/review");
        sink.deliver(&first).unwrap();
        sink.deliver(&second).unwrap();

        let delivered = sink.delivered();
        assert_eq!(delivered.len(), 2);
        assert_eq!(delivered[0].id, first.id);

        assert_eq!(sink.delivered_to("b@x.com").len(), 1);
        assert!(sink.delivered_to("ghost@x.com").is_empty());
    }

    #[test]
    fn boxed_sink_dispatches() {
        let boxed: BoxedSink = Box::new(NoopSink::new());
        assert!(boxed.deliver(&sample()).is_ok());
    }

    #[test]
    fn sink_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TracingSink>();
        assert_send_sync::<NoopSink>();
        assert_send_sync::<MemorySink>();
    }

    #[test]
    fn sink_in_arc() {
        let sink: Arc<dyn NotificationSink> = Arc::new(MemorySink::new());
        sink.deliver(&sample()).unwrap();
    }
}
