use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::time::Instant;
use tracing::info;

use crate::models::notification::{Notification, NotificationKind};

/// Holds the single visible notification. Showing a new one replaces the
/// previous one; each disappears once its TTL has elapsed.
pub struct NotificationCenter {
    ttl: Duration,
    current: Mutex<Option<Notification>>,
    next_id: AtomicU64,
}

impl NotificationCenter {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            current: Mutex::new(None),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn show(&self, message: impl Into<String>, kind: NotificationKind) -> Notification {
        let notification = Notification {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            message: message.into(),
            kind,
            shown_at: Instant::now(),
            ttl: self.ttl,
        };

        info!(
            notification_id = notification.id,
            kind = %notification.kind,
            message = %notification.message,
            "Showing notification"
        );

        *self.lock() = Some(notification.clone());
        notification
    }

    pub fn error(&self, message: impl Into<String>) -> Notification {
        self.show(message, NotificationKind::Error)
    }

    pub fn success(&self, message: impl Into<String>) -> Notification {
        self.show(message, NotificationKind::Success)
    }

    /// The notification currently on screen, if it has not expired.
    pub fn current(&self) -> Option<Notification> {
        let mut current = self.lock();
        let visible = current
            .as_ref()
            .is_some_and(|n| n.is_visible_at(Instant::now()));

        if !visible {
            *current = None;
        }
        current.clone()
    }

    pub fn dismiss(&self) {
        *self.lock() = None;
    }

    fn lock(&self) -> MutexGuard<'_, Option<Notification>> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
