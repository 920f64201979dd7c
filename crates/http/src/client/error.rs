//! Client error types

use batteries_core::ErrorPayload;
use thiserror::Error;

/// Why a request never completed its network exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportFailure {
    /// The server could not be reached
    Unavailable,
    /// The request was aborted or exceeded its timeout
    TimedOut,
    /// The request could not be built (e.g. an invalid header value)
    InvalidRequest,
}

impl TransportFailure {
    /// Classify a reqwest error raised before a response arrived
    #[must_use]
    pub fn classify(error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::TimedOut
        } else if error.is_builder() {
            Self::InvalidRequest
        } else {
            Self::Unavailable
        }
    }

    /// User-facing explanation, if this failure is shown to the user
    #[must_use]
    pub const fn user_message(self) -> Option<&'static str> {
        match self {
            Self::Unavailable => Some(
                "The server is unavailable. Please try again later or contact support if the issue persists.",
            ),
            Self::TimedOut => Some(
                "The request has timed out, indicating the server may be unavailable. Please try again later or contact support if the issue persists.",
            ),
            Self::InvalidRequest => None,
        }
    }
}

/// Client error types
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never completed the network exchange
    #[error("Request failed ({kind:?}): {source}")]
    Transport {
        kind: TransportFailure,
        #[source]
        source: reqwest::Error,
    },

    /// Server answered with a non-success status
    #[error("Server error {status}")]
    Status {
        status: reqwest::StatusCode,
        payload: ErrorPayload,
    },

    /// Successful response whose body did not match the expected shape
    #[error("Failed to decode response: {0}")]
    Decode(#[source] reqwest::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Configuration(String),
}

impl ClientError {
    /// HTTP status of an application failure
    #[must_use]
    pub const fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Structured payload of an application failure
    #[must_use]
    pub const fn payload(&self) -> Option<&ErrorPayload> {
        match self {
            Self::Status { payload, .. } => Some(payload),
            _ => None,
        }
    }

    /// Whether the server rejected the credential (401 or 403)
    #[must_use]
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self.status().map(|status| status.as_u16()),
            Some(401 | 403)
        )
    }

    /// Transport failure class, if the exchange never completed
    #[must_use]
    pub const fn transport_failure(&self) -> Option<TransportFailure> {
        match self {
            Self::Transport { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

impl From<config::ConfigError> for ClientError {
    fn from(err: config::ConfigError) -> Self {
        Self::Configuration(err.to_string())
    }
}

impl From<url::ParseError> for ClientError {
    fn from(err: url::ParseError) -> Self {
        Self::Configuration(format!("invalid back host url: {err}"))
    }
}
