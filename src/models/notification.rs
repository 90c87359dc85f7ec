use std::time::Duration;

use strum::{AsRefStr, Display};
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum NotificationKind {
    Info,
    Success,
    Error,
}

/// A transient message shown to the user.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: u64,
    pub message: String,
    pub kind: NotificationKind,
    pub shown_at: Instant,
    pub ttl: Duration,
}

impl Notification {
    pub fn expires_at(&self) -> Instant {
        self.shown_at + self.ttl
    }

    pub fn is_visible_at(&self, now: Instant) -> bool {
        now < self.expires_at()
    }
}
