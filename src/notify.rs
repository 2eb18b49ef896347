//! User-visible notifications.
//!
//! Backend failures are never fatal: the store catches them and forwards a
//! description here for the UI to surface as a non-blocking toast. The
//! default sink logs through `tracing`; tests use [`CollectingNotifier`] to
//! assert on what was surfaced.

use std::sync::Mutex;

/// Severity of a surfaced notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Error,
}

/// A single non-blocking, user-visible message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub severity: Severity,
    pub message: String,
}

impl Notification {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            message: message.into(),
        }
    }
}

/// Sink for user-visible notifications.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Default sink: forwards notifications to the `tracing` log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.severity {
            Severity::Error => tracing::warn!(message = %notification.message, "notification"),
            Severity::Info => tracing::info!(message = %notification.message, "notification"),
        }
    }
}

/// Test sink that records every notification.
#[derive(Debug, Default)]
pub struct CollectingNotifier {
    collected: Mutex<Vec<Notification>>,
}

impl CollectingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drain(&self) -> Vec<Notification> {
        std::mem::take(&mut self.collected.lock().expect("notifier poisoned"))
    }

    pub fn is_empty(&self) -> bool {
        self.collected.lock().expect("notifier poisoned").is_empty()
    }
}

impl Notifier for CollectingNotifier {
    fn notify(&self, notification: Notification) {
        self.collected
            .lock()
            .expect("notifier poisoned")
            .push(notification);
    }
}
