//! Test doubles for the collaborator traits

use crate::notify::{Notifier, Severity, Toast};
use std::sync::Mutex;

/// Notifier that records every toast it receives
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    toasts: Mutex<Vec<Toast>>,
}

impl RecordingNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn toasts(&self) -> Vec<Toast> {
        self.toasts
            .lock()
            .map(|toasts| toasts.clone())
            .unwrap_or_default()
    }

    /// Descriptions of error toasts, in order
    #[must_use]
    pub fn error_descriptions(&self) -> Vec<String> {
        self.toasts()
            .into_iter()
            .filter(|toast| toast.severity == Severity::Error)
            .filter_map(|toast| toast.description)
            .collect()
    }

    /// Titles of success toasts, in order
    #[must_use]
    pub fn success_titles(&self) -> Vec<String> {
        self.toasts()
            .into_iter()
            .filter(|toast| toast.severity == Severity::Success)
            .map(|toast| toast.title)
            .collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.toasts().is_empty()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, toast: Toast) {
        if let Ok(mut toasts) = self.toasts.lock() {
            toasts.push(toast);
        }
    }
}
