//! Transient user notifications.

use tracing::{info, warn};

/// Sink for the short success and error messages a screen shows.
pub trait Notifier {
    fn success(&mut self, message: &str);
    fn error(&mut self, message: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
}

/// Keeps every notification in order, for a host to drain and render.
#[derive(Debug, Default)]
pub struct Toasts {
    shown: Vec<Toast>,
}

impl Toasts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shown(&self) -> &[Toast] {
        &self.shown
    }

    pub fn last(&self) -> Option<&Toast> {
        self.shown.last()
    }

    pub fn drain(&mut self) -> Vec<Toast> {
        std::mem::take(&mut self.shown)
    }

    fn push(&mut self, kind: ToastKind, message: &str) {
        self.shown.push(Toast {
            kind,
            message: message.to_string(),
        });
    }
}

impl Notifier for Toasts {
    fn success(&mut self, message: &str) {
        self.push(ToastKind::Success, message);
    }

    fn error(&mut self, message: &str) {
        self.push(ToastKind::Error, message);
    }
}

/// Headless notifier that only logs.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn success(&mut self, message: &str) {
        info!(kind = "success", "{message}");
    }

    fn error(&mut self, message: &str) {
        warn!(kind = "error", "{message}");
    }
}
