//! Conversion of client failures into stable, agent-readable messages.

use audisto_async::AudistoError;
use audisto_async::types::CrawlId;

/// Failure categories surfaced to the agent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Rejected locally before any request
    InvalidArgument,
    /// Credentials missing, or rejected by the server (401)
    Credentials,
    /// The request did not complete within the timeout
    Timeout,
    /// The server kept answering 429
    RateLimited,
    /// The server answered 404
    NotFound,
    /// Any other non-success status
    HttpStatus(u16),
    /// The server could not be reached
    Connection,
    /// Anything else, e.g. an undecodable body
    Unexpected,
}

impl FailureKind {
    /// Classifies a client error
    #[must_use]
    pub fn of(err: &AudistoError) -> Self {
        match err {
            AudistoError::InvalidArgument(_) => Self::InvalidArgument,
            AudistoError::Config(_) => Self::Credentials,
            AudistoError::Reqwest(e) if e.is_timeout() => Self::Timeout,
            AudistoError::Reqwest(_) => Self::Connection,
            AudistoError::Api(obj) => Self::from_status(obj.status_code),
            AudistoError::RetriesExhausted { last, .. } => Self::of(last),
            AudistoError::Serde(_) | AudistoError::Format(_) => Self::Unexpected,
        }
    }

    const fn from_status(status: u16) -> Self {
        match status {
            401 => Self::Credentials,
            404 => Self::NotFound,
            429 => Self::RateLimited,
            other => Self::HttpStatus(other),
        }
    }
}

/// Renders `err` as a single-line message starting with `Error:`
///
/// `crawl_id` names the crawl in not-found messages when the failed call
/// targeted one.
#[must_use]
pub fn describe(err: &AudistoError, crawl_id: Option<CrawlId>) -> String {
    match FailureKind::of(err) {
        FailureKind::InvalidArgument => format!("Error: {err}"),
        FailureKind::Credentials => "Error: Missing or invalid credentials".to_string(),
        FailureKind::Timeout => {
            "Error: Request timeout. Audisto API is not responding.".to_string()
        }
        FailureKind::RateLimited => "Error: Audisto API rate limit reached (status 429). \
             Only one request per API key may run at a time; try again shortly."
            .to_string(),
        FailureKind::NotFound => match crawl_id {
            Some(id) => format!("Error: Crawl ID {id} not found."),
            None => "Error: Audisto API returned status 404".to_string(),
        },
        FailureKind::HttpStatus(status) => format!("Error: Audisto API returned status {status}"),
        FailureKind::Connection => "Error: Failed to connect to Audisto API".to_string(),
        FailureKind::Unexpected => "Error: An unexpected error occurred".to_string(),
    }
}

/// Logs `err` at a level matching its kind
pub fn log_failure(err: &AudistoError, operation: &str) {
    match FailureKind::of(err) {
        FailureKind::NotFound | FailureKind::InvalidArgument => {
            tracing::warn!("{operation}: {err}");
        }
        FailureKind::Unexpected => tracing::error!("Unexpected error in {operation}: {err}"),
        _ => tracing::error!("{operation} failed: {err}"),
    }
}
