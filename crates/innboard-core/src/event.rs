//! Event bus for innboard using tokio::broadcast
//!
//! Stores and page controllers publish here when their state changes; the
//! render loop subscribes and redraws. Events never carry entity data, only
//! the fact that something changed (readers pull fresh state themselves).

use tokio::sync::broadcast;

/// Events emitted by stores and page controllers
#[derive(Debug, Clone)]
pub enum DataEvent {
    /// Session became authenticated or unauthenticated
    AuthChanged,
    /// Property list or selection changed
    PropertiesUpdated,
    /// Rooms page state changed
    RoomsUpdated,
    /// Room-types page state changed
    RoomTypesUpdated,
    /// Reservations page state changed
    ReservationsUpdated,
    /// Local task list changed
    TasksUpdated,
    /// An authenticated request was rejected; the stored token is no longer
    /// valid and the session should drop back to the login screen
    SessionExpired,
    /// A user-visible notice (toast) was produced by an operation
    Notice(Notice),
}

/// Severity of a user-visible notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Warning,
    Error,
}

/// A short status message for the UI toast layer
#[derive(Debug, Clone)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Event bus for broadcasting data events
///
/// Uses tokio::broadcast for multi-consumer support; the TUI subscribes for
/// redraw triggers and CLI commands can ignore it entirely.
pub struct EventBus {
    sender: broadcast::Sender<DataEvent>,
}

impl EventBus {
    /// Create a new event bus with specified channel capacity
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Create with default capacity (256 events)
    pub fn default_capacity() -> Self {
        Self::new(256)
    }

    /// Publish an event to all subscribers
    pub fn publish(&self, event: DataEvent) {
        // Ignore send errors (no subscribers)
        let _ = self.sender.send(event);
    }

    /// Publish a notice for the toast layer
    pub fn notify(&self, notice: Notice) {
        self.publish(DataEvent::Notice(notice));
    }

    /// Publish [`DataEvent::SessionExpired`] when the error is an auth
    /// rejection. Called from every controller error path so a revoked
    /// token lands on the login screen instead of a page banner.
    pub fn report_auth(&self, err: &crate::error::CoreError) {
        if err.is_auth() {
            self.publish(DataEvent::SessionExpired);
        }
    }

    /// Subscribe to receive events
    pub fn subscribe(&self) -> broadcast::Receiver<DataEvent> {
        self.sender.subscribe()
    }

    /// Get current number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::default_capacity()
    }
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_event_bus_publish_subscribe() {
        let bus = EventBus::default_capacity();
        let mut rx = bus.subscribe();

        bus.publish(DataEvent::AuthChanged);
        bus.publish(DataEvent::PropertiesUpdated);

        let event1 = rx.recv().await.unwrap();
        assert!(matches!(event1, DataEvent::AuthChanged));

        let event2 = rx.recv().await.unwrap();
        assert!(matches!(event2, DataEvent::PropertiesUpdated));
    }

    #[tokio::test]
    async fn test_event_bus_multiple_subscribers() {
        let bus = EventBus::default_capacity();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        assert_eq!(bus.subscriber_count(), 2);

        bus.publish(DataEvent::ReservationsUpdated);

        let e1 = rx1.recv().await.unwrap();
        let e2 = rx2.recv().await.unwrap();

        assert!(matches!(e1, DataEvent::ReservationsUpdated));
        assert!(matches!(e2, DataEvent::ReservationsUpdated));
    }

    #[tokio::test]
    async fn test_notice_carries_message() {
        let bus = EventBus::default_capacity();
        let mut rx = bus.subscribe();

        bus.notify(Notice::success("Room created successfully"));

        match rx.recv().await.unwrap() {
            DataEvent::Notice(notice) => {
                assert_eq!(notice.level, NoticeLevel::Success);
                assert_eq!(notice.message, "Room created successfully");
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_event_bus_no_subscribers_ok() {
        let bus = EventBus::default_capacity();
        // Should not panic even with no subscribers
        bus.publish(DataEvent::AuthChanged);
    }

    #[tokio::test]
    async fn test_report_auth_only_fires_for_auth_errors() {
        let bus = EventBus::default_capacity();
        let mut rx = bus.subscribe();

        bus.report_auth(&crate::error::CoreError::Api {
            message: "Room number already exists".to_string(),
        });
        bus.report_auth(&crate::error::CoreError::Unauthorized);

        // Only the Unauthorized error produced an event
        match rx.recv().await.unwrap() {
            DataEvent::SessionExpired => {}
            other => panic!("unexpected event: {:?}", other),
        }
        assert!(rx.try_recv().is_err());
    }
}
