//! Failure reporting pipeline
//!
//! Delivery order is general messages, then non-field messages, then field
//! messages. Each group keeps the payload's own order.

use super::error::TransportFailure;
use batteries_core::{ErrorPayload, FormError, FormErrorSink, Notifier, Toast};
use reqwest::StatusCode;
use std::sync::Arc;
use tracing::{debug, warn};

const ERROR_TITLE: &str = "Error";

/// Routes failures to the notification channel and the bound form
#[derive(Clone)]
pub struct ErrorReporter {
    notifier: Arc<dyn Notifier>,
    form: Option<Arc<dyn FormErrorSink>>,
}

impl ErrorReporter {
    pub fn new(notifier: Arc<dyn Notifier>, form: Option<Arc<dyn FormErrorSink>>) -> Self {
        Self { notifier, form }
    }

    /// Report a request that never completed its network exchange
    pub fn report_transport(&self, kind: TransportFailure) {
        match kind.user_message() {
            Some(message) => self.notifier.notify(Toast::error(ERROR_TITLE, message)),
            None => debug!(?kind, "Transport failure without user message"),
        }
    }

    /// Fan an application error payload out to its channels
    pub fn report_payload(&self, status: StatusCode, payload: &ErrorPayload) {
        for message in &payload.general {
            self.notifier.notify(Toast::error(ERROR_TITLE, message));
        }

        let nonfield = payload.nonfield.iter().map(FormError::nonfield);
        let field = payload
            .field
            .iter()
            .map(|(name, message)| FormError::new(name, message));
        self.deliver_form_errors(nonfield.chain(field));

        if matches!(status.as_u16(), 401 | 403) {
            // No-op hook: the session layer owns credential teardown
            debug!(%status, "Credential rejected by server");
        }
    }

    fn deliver_form_errors(&self, errors: impl Iterator<Item = FormError>) {
        match &self.form {
            Some(form) => {
                // Forms register one entry per call
                for error in errors {
                    form.set_errors(vec![error]);
                }
            }
            None => {
                let dropped = errors.count();
                if dropped > 0 {
                    warn!(dropped, "Form errors received but no form is bound to this client");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use batteries_core::testing::RecordingNotifier;
    use batteries_core::{FieldErrors, FormErrors, NONFIELD};

    fn payload() -> ErrorPayload {
        ErrorPayload {
            general: vec!["a".into(), "b".into()],
            nonfield: vec!["Incorrect email or password.".into()],
            field: [("email", "invalid"), ("first_name", "too short")]
                .into_iter()
                .collect::<FieldErrors>(),
        }
    }

    #[test]
    fn general_messages_become_error_toasts_in_order() {
        let notifier = Arc::new(RecordingNotifier::new());
        let reporter = ErrorReporter::new(notifier.clone(), None);

        reporter.report_payload(StatusCode::BAD_REQUEST, &ErrorPayload::general(["a", "b"]));

        assert_eq!(notifier.error_descriptions(), vec!["a", "b"]);
        assert!(notifier.toasts().iter().all(|toast| toast.title == "Error"));
    }

    #[test]
    fn form_receives_nonfield_then_field_errors() {
        let notifier = Arc::new(RecordingNotifier::new());
        let form = Arc::new(FormErrors::new());
        let reporter = ErrorReporter::new(notifier.clone(), Some(form.clone()));

        reporter.report_payload(StatusCode::UNPROCESSABLE_ENTITY, &payload());

        assert_eq!(
            form.all(),
            vec![
                FormError::new(NONFIELD, "Incorrect email or password."),
                FormError::new("email", "invalid"),
                FormError::new("first_name", "too short"),
            ]
        );
        assert_eq!(notifier.error_descriptions(), vec!["a", "b"]);
    }

    #[test]
    fn form_errors_without_form_are_dropped() {
        let notifier = Arc::new(RecordingNotifier::new());
        let reporter = ErrorReporter::new(notifier.clone(), None);

        reporter.report_payload(StatusCode::BAD_REQUEST, &payload());

        assert_eq!(notifier.error_descriptions(), vec!["a", "b"]);
    }

    #[test]
    fn empty_payload_is_silent() {
        let notifier = Arc::new(RecordingNotifier::new());
        let form = Arc::new(FormErrors::new());
        let reporter = ErrorReporter::new(notifier.clone(), Some(form.clone()));

        reporter.report_payload(StatusCode::NOT_FOUND, &ErrorPayload::default());
        reporter.report_payload(StatusCode::FORBIDDEN, &ErrorPayload::default());

        assert!(notifier.is_empty());
        assert!(form.is_empty());
    }

    #[test]
    fn invalid_request_is_not_announced() {
        let notifier = Arc::new(RecordingNotifier::new());
        let reporter = ErrorReporter::new(notifier.clone(), None);

        reporter.report_transport(TransportFailure::InvalidRequest);
        assert!(notifier.is_empty());

        reporter.report_transport(TransportFailure::Unavailable);
        assert_eq!(
            notifier.error_descriptions(),
            vec![TransportFailure::Unavailable.user_message().unwrap()]
        );
    }
}
