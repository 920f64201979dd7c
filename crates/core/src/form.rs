//! Form-validation sink

use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// Reserved field name for errors that belong to the form as a whole
pub const NONFIELD: &str = "nonfield";

/// A message registered against a named field
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormError {
    pub name: String,
    pub message: String,
}

impl FormError {
    #[must_use]
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn nonfield(message: impl Into<String>) -> Self {
        Self::new(NONFIELD, message)
    }

    #[must_use]
    pub fn is_nonfield(&self) -> bool {
        self.name == NONFIELD
    }
}

/// Receives field-scoped validation errors for a form
pub trait FormErrorSink: Send + Sync {
    /// Append `errors` to the form's error slots
    fn set_errors(&self, errors: Vec<FormError>);
}

/// In-memory form error collection
#[derive(Debug, Default)]
pub struct FormErrors {
    errors: Mutex<Vec<FormError>>,
}

impl FormErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every registered error, in arrival order
    #[must_use]
    pub fn all(&self) -> Vec<FormError> {
        self.errors
            .lock()
            .map(|errors| errors.clone())
            .unwrap_or_default()
    }

    /// Messages registered for `name`
    #[must_use]
    pub fn messages_for(&self, name: &str) -> Vec<String> {
        self.all()
            .into_iter()
            .filter(|error| error.name == name)
            .map(|error| error.message)
            .collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.all().is_empty()
    }

    /// Drop every registered error and return them
    #[must_use]
    pub fn take(&self) -> Vec<FormError> {
        self.errors
            .lock()
            .map(|mut errors| std::mem::take(&mut *errors))
            .unwrap_or_default()
    }
}

impl FormErrorSink for FormErrors {
    fn set_errors(&self, errors: Vec<FormError>) {
        if let Ok(mut current) = self.errors.lock() {
            current.extend(errors);
        }
    }
}
