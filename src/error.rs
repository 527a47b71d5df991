//! Error types for the summary pipeline.

use std::fmt;
use thiserror::Error;

/// Failure of a single AI provider call.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// No usable credential configured for the provider
    #[error("missing credentials for provider: {0}")]
    MissingCredentials(String),

    /// Upstream answered with a non-2xx status
    #[error("provider returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// Connection could not be established or was reset
    #[error("network error: {0}")]
    Network(String),

    /// The bounded request timeout elapsed
    #[error("provider request timed out")]
    Timeout,

    /// Response body was not the expected chat-completions shape
    #[error("failed to parse provider response: {0}")]
    Parse(String),

    #[error("provider returned no content")]
    EmptyResponse,

    #[error("{0}")]
    Other(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProviderError::Timeout
        } else if err.is_decode() {
            ProviderError::Parse(err.to_string())
        } else if let Some(status) = err.status() {
            ProviderError::Http {
                status: status.as_u16(),
                body: err.to_string(),
            }
        } else {
            ProviderError::Network(err.to_string())
        }
    }
}

/// Routing label attached to a [`ProviderError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    QuotaExceeded,
    Unavailable,
    ParseFailure,
    Unknown,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ErrorKind::QuotaExceeded => "quota_exceeded",
            ErrorKind::Unavailable => "unavailable",
            ErrorKind::ParseFailure => "parse_failure",
            ErrorKind::Unknown => "unknown",
        };
        f.write_str(label)
    }
}

/// Rejection of an inbound request. The only error surfaced to callers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),
}
