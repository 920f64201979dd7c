//! Terminal renditions of the UI collaborators

use async_trait::async_trait;
use batteries_core::{FormError, FormErrorSink, FormErrors, Notifier, Severity, Toast};
use batteries_session::Navigator;
use tracing::info;

/// Prints notifications to stderr
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, toast: Toast) {
        let marker = match toast.severity {
            Severity::Success => "✔",
            Severity::Error => "✘",
        };
        match toast.description {
            Some(description) => eprintln!("{marker} {}: {description}", toast.title),
            None => eprintln!("{marker} {}", toast.title),
        }
    }
}

/// Collects validation errors for the command being run and prints them afterwards
#[derive(Debug, Default)]
pub struct ConsoleForm {
    errors: FormErrors,
}

impl ConsoleForm {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Print and clear the collected errors. Returns how many were printed.
    pub fn flush(&self) -> usize {
        let errors = self.errors.take();
        for error in &errors {
            if error.is_nonfield() {
                eprintln!("  {}", error.message);
            } else {
                eprintln!("  {}: {}", error.name, error.message);
            }
        }
        errors.len()
    }
}

impl FormErrorSink for ConsoleForm {
    fn set_errors(&self, errors: Vec<FormError>) {
        self.errors.set_errors(errors);
    }
}

/// A terminal has no routes; the destination is only logged
#[derive(Debug, Default)]
pub struct LoggingNavigator;

#[async_trait]
impl Navigator for LoggingNavigator {
    async fn navigate(&self, path: &str) -> anyhow::Result<()> {
        info!(path, "Navigate");
        Ok(())
    }
}
