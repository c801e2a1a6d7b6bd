//! Non-blocking user-facing notifications.
//!
//! The host UI subscribes and renders these however it likes. Emitting
//! never blocks and never fails the emitting flow, even with nobody
//! listening.

use serde::Serialize;
use tokio::sync::broadcast;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub id: Uuid,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
}

pub struct Notifier {
    tx: broadcast::Sender<Notification>,
}

impl Notifier {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(16);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.tx.subscribe()
    }

    pub fn notify(&self, kind: NotificationKind, title: &str, message: &str) {
        let notification = Notification {
            id: Uuid::new_v4(),
            title: title.to_string(),
            message: message.to_string(),
            kind,
        };
        // A send with no subscribers is fine; the notification just fades.
        let _ = self.tx.send(notification);
    }

    pub fn success(&self, title: &str, message: &str) {
        self.notify(NotificationKind::Success, title, message);
    }

    pub fn error(&self, title: &str, message: &str) {
        self.notify(NotificationKind::Error, title, message);
    }

    pub fn warning(&self, title: &str, message: &str) {
        self.notify(NotificationKind::Warning, title, message);
    }

    pub fn info(&self, title: &str, message: &str) {
        self.notify(NotificationKind::Info, title, message);
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}
