//! Ambient notification channel
//!
//! Transient user-facing messages ("toasts"). The presentation layer decides
//! how to render them; the library only decides what to say.

use serde::{Deserialize, Serialize};

const SUCCESS_ICON: &str = "i-ph-check-circle-bold";
const ERROR_ICON: &str = "i-ph-x-circle-bold";

/// Notification severity
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
}

impl Severity {
    /// Icon identifier shown next to the notification
    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Success => SUCCESS_ICON,
            Self::Error => ERROR_ICON,
        }
    }
}

/// A single notification
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toast {
    pub title: String,
    pub description: Option<String>,
    pub severity: Severity,
    pub icon: String,
}

impl Toast {
    fn new(severity: Severity, title: impl Into<String>, description: Option<String>) -> Self {
        Self {
            title: title.into(),
            description,
            severity,
            icon: severity.icon().to_string(),
        }
    }

    #[must_use]
    pub fn success(title: impl Into<String>) -> Self {
        Self::new(Severity::Success, title, None)
    }

    #[must_use]
    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(Severity::Error, title, Some(description.into()))
    }
}

/// Receives notifications for display
pub trait Notifier: Send + Sync {
    fn notify(&self, toast: Toast);
}
