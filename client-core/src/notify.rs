//! Notification seam between the managers and whatever surface hosts
//! them (terminal, webview bridge, test harness).
//!
//! Constructed once at application start and injected everywhere; there
//! is no global dialog singleton and no runtime capability probing.

use async_trait::async_trait;
use std::sync::Mutex;

#[async_trait]
pub trait Notifier: Send + Sync {
    fn show_success(&self, message: &str);
    fn show_error(&self, message: &str);
    /// Ask the user to confirm a destructive action.
    async fn show_confirm(&self, message: &str) -> bool;
    /// Global loading indicator: called on the 0 -> 1 transition of the
    /// in-flight request counter.
    fn loading_started(&self);
    /// Called on the 1 -> 0 transition, including error paths.
    fn loading_finished(&self);
}

/// Notifier that routes everything through `tracing` and confirms every
/// prompt. Suitable for headless operation.
pub struct TracingNotifier;

#[async_trait]
impl Notifier for TracingNotifier {
    fn show_success(&self, message: &str) {
        tracing::info!(message, "notification: success");
    }

    fn show_error(&self, message: &str) {
        tracing::error!(message, "notification: error");
    }

    async fn show_confirm(&self, message: &str) -> bool {
        tracing::info!(message, "notification: confirm (auto-accepted)");
        true
    }

    fn loading_started(&self) {
        tracing::debug!("loading indicator shown");
    }

    fn loading_finished(&self) {
        tracing::debug!("loading indicator hidden");
    }
}

/// Recorded notification events, for assertions in tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifyEvent {
    Success(String),
    Error(String),
    Confirm(String),
    LoadingStarted,
    LoadingFinished,
}

/// Notifier that records every call. `confirm_answer` controls what
/// confirmation prompts return.
pub struct RecordingNotifier {
    pub events: Mutex<Vec<NotifyEvent>>,
    pub confirm_answer: bool,
}

impl RecordingNotifier {
    pub fn new(confirm_answer: bool) -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            confirm_answer,
        }
    }

    pub fn events(&self) -> Vec<NotifyEvent> {
        self.events.lock().unwrap().clone()
    }

    fn record(&self, event: NotifyEvent) {
        self.events.lock().unwrap().push(event);
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    fn show_success(&self, message: &str) {
        self.record(NotifyEvent::Success(message.to_string()));
    }

    fn show_error(&self, message: &str) {
        self.record(NotifyEvent::Error(message.to_string()));
    }

    async fn show_confirm(&self, message: &str) -> bool {
        self.record(NotifyEvent::Confirm(message.to_string()));
        self.confirm_answer
    }

    fn loading_started(&self) {
        self.record(NotifyEvent::LoadingStarted);
    }

    fn loading_finished(&self) {
        self.record(NotifyEvent::LoadingFinished);
    }
}
