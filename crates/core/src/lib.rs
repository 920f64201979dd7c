//! Batteries core types and utilities

pub mod credentials;
pub mod error;
pub mod form;
pub mod notify;
pub mod payload;
pub mod storage;
pub mod types;

#[cfg(any(test, feature = "tests"))]
pub mod testing;

pub use credentials::{CredentialStore, TOKEN_STORAGE_KEY};
pub use error::{CoreError, CoreResult};
pub use form::{FormError, FormErrorSink, FormErrors, NONFIELD};
pub use notify::{Notifier, Severity, Toast};
pub use payload::{ErrorEnvelope, ErrorPayload, FieldErrors};
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};
pub use types::{AccessToken, MessageResponse, UserPublic};
