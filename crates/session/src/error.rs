use batteries_core::CoreError;
use batteries_http::ClientError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("API request failed: {0}")]
    Client(#[from] ClientError),

    #[error("Credential storage failed: {0}")]
    Storage(#[from] CoreError),

    #[error("Navigation to {path} failed: {message}")]
    Navigation { path: String, message: String },
}

impl SessionError {
    pub(crate) fn navigation(path: &str, err: &anyhow::Error) -> Self {
        Self::Navigation {
            path: path.to_string(),
            message: format!("{err:#}"),
        }
    }

    /// Underlying client error, if the failure came from the API
    #[must_use]
    pub const fn client_error(&self) -> Option<&ClientError> {
        match self {
            Self::Client(err) => Some(err),
            _ => None,
        }
    }
}
