use std::time::Duration;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when using the Audisto API client
#[derive(Debug, Error)]
pub enum AudistoError {
    /// A caller-supplied argument was rejected before any request was sent
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Configuration error (e.g., missing credentials)
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Transport error (timeout, connection failure, TLS, ...)
    #[error("HTTP error: {0}")]
    Reqwest(#[from] reqwest::Error),

    /// Non-success HTTP status returned by Audisto
    #[error("API error: status {}: {}", .0.status_code, .0.message)]
    Api(ApiErrorObject),

    /// Every retry permitted by the backoff policy was consumed
    #[error("Retries exhausted after {attempts} attempts: {last}")]
    RetriesExhausted {
        /// Number of requests sent, including the first one
        attempts: usize,
        /// The failure observed on the final attempt
        last: Box<AudistoError>,
    },

    /// Response body could not be decoded into the expected type
    #[error("Serialization error: {0}")]
    Serde(String),

    /// Response body decoded but had an unexpected structure
    #[error("Unexpected response format: {0}")]
    Format(String),
}

/// Error payload for a non-success response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorObject {
    /// HTTP status code
    #[serde(default)]
    pub status_code: u16,
    /// Human-readable error message
    #[serde(default)]
    pub message: String,
    /// Error type string, when the server supplies one
    #[serde(default)]
    pub error: Option<String>,
    /// Delay requested by the server's `Retry-After` header
    #[serde(skip)]
    pub retry_after: Option<Duration>,
}

impl AudistoError {
    /// Determines if this error is retryable
    ///
    /// Retryable errors are the statuses in [`crate::retry::is_retryable_status`]
    /// plus transport timeouts and connection failures.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Api(obj) => crate::retry::is_retryable_status(obj.status_code),
            Self::Reqwest(e) => e.is_timeout() || e.is_connect(),
            Self::InvalidArgument(_)
            | Self::Config(_)
            | Self::RetriesExhausted { .. }
            | Self::Serde(_)
            | Self::Format(_) => false,
        }
    }

    /// HTTP status carried by this error, looking through `RetriesExhausted`
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api(obj) => Some(obj.status_code),
            Self::RetriesExhausted { last, .. } => last.status(),
            Self::Reqwest(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Server-requested delay before the next attempt, if any
    #[must_use]
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::Api(obj) => obj.retry_after,
            _ => None,
        }
    }

    /// Attaches a server-requested retry delay to an API error
    #[must_use]
    pub fn with_retry_after(mut self, delay: Option<Duration>) -> Self {
        if let Self::Api(obj) = &mut self {
            obj.retry_after = delay;
        }
        self
    }

    /// Returns true if the server answered 404
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Api(obj) if obj.status_code == 404)
    }

    /// Returns true if the request timed out
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Reqwest(e) if e.is_timeout())
    }

    /// Returns true if the connection to the server could not be established
    #[must_use]
    pub fn is_connect(&self) -> bool {
        matches!(self, Self::Reqwest(e) if e.is_connect())
    }
}

/// Maps a serde deserialization error to an `AudistoError` with context
#[must_use]
pub fn map_deser(e: &serde_json::Error, body: &[u8]) -> AudistoError {
    let snippet = String::from_utf8_lossy(&body[..body.len().min(400)]).to_string();
    AudistoError::Serde(format!("{e}: {snippet}"))
}

/// Deserializes an API error from the response body
///
/// Attempts to parse the error as JSON, falling back to plain text on failure.
#[must_use]
pub fn deserialize_api_error(status: StatusCode, body: &[u8]) -> AudistoError {
    let status_code = status.as_u16();

    if let Ok(mut obj) = serde_json::from_slice::<ApiErrorObject>(body) {
        obj.status_code = status_code;
        if obj.message.is_empty() {
            obj.message = status.canonical_reason().unwrap_or_default().to_string();
        }
        return AudistoError::Api(obj);
    }

    // Server may return plain text or HTML on 5xx; cap body to avoid log/memory bloat
    AudistoError::Api(ApiErrorObject {
        status_code,
        message: String::from_utf8_lossy(&body[..body.len().min(400)]).into_owned(),
        error: Some(format!("http_{status_code}")),
        retry_after: None,
    })
}
