//! Read-only Audisto tools for AI agents.
//!
//! Every tool returns text. Failures are rendered as an `Error: ...` line via
//! [`errors::describe`] instead of being propagated to the caller.

pub mod errors;
pub mod format;

use audisto_async::config::Config;
use audisto_async::types::{ChunkedRequest, CrawlId};
use audisto_async::{AudistoConfig, AudistoError, Client};
use futures::StreamExt;

/// Usage text returned by [`AudistoTools::get_help`]
pub const HELP_TEXT: &str = "\
Available Audisto Commands:

1. get_crawl_status()
   - Lists the 5 most recent Audisto crawls
   - Shows: Crawl ID, domain, status (finished or in progress)
   - Example: \"Show me my recent crawls\"
   - Example: \"What crawls do I have?\"

2. get_crawl_summary(crawl_id)
   - Retrieves details for a specific crawl
   - Shows: pages crawled, max depth, start time, domain
   - Parameter: crawl_id (numeric ID from get_crawl_status)
   - Example: \"Get me the summary for crawl 12345\"
   - Example: \"How many pages were crawled in crawl 67890?\"

Example Usage Flow:
  1. Ask: \"Show me my recent Audisto crawls\"
  2. System responds with crawl list and IDs
  3. Ask: \"Get the summary for crawl [ID]\"
  4. System responds with detailed crawl info

Tips:
- Use get_crawl_status() first to find crawl IDs
- Then use get_crawl_summary() with a specific crawl ID
- All data comes from the Audisto API (read-only)";

/// Tool surface over a shared Audisto client
#[derive(Clone, Debug)]
pub struct AudistoTools {
    client: Client<AudistoConfig>,
}

impl AudistoTools {
    /// Creates the tools with a client configured from the environment
    #[must_use]
    pub fn new() -> Self {
        Self::with_client(Client::new())
    }

    /// Creates the tools around an existing client
    #[must_use]
    pub const fn with_client(client: Client<AudistoConfig>) -> Self {
        Self { client }
    }

    /// Checks that credentials are configured before serving any tool
    ///
    /// # Errors
    ///
    /// Returns [`AudistoError::Config`] if the API key or password is missing.
    pub fn validate_startup_credentials(&self) -> Result<(), AudistoError> {
        match self.client.config().validate_auth() {
            Ok(()) => {
                tracing::info!("Credentials validated successfully at startup");
                Ok(())
            }
            Err(e) => {
                tracing::error!("Startup validation failed: {e}");
                Err(e)
            }
        }
    }

    /// Usage text for the available tools
    #[must_use]
    pub const fn get_help(&self) -> &'static str {
        HELP_TEXT
    }

    /// Lists the most recent crawls with their status
    pub async fn get_crawl_status(&self) -> String {
        match self.client.status().crawls().await {
            Ok(status) => {
                tracing::info!("Successfully retrieved crawls from Audisto API");
                format::crawl_status(&status)
            }
            Err(e) => {
                errors::log_failure(&e, "get_crawl_status");
                errors::describe(&e, None)
            }
        }
    }

    /// Summarizes one crawl
    ///
    /// `crawl_id` is validated locally; a negative id never reaches the API.
    pub async fn get_crawl_summary(&self, crawl_id: i64) -> String {
        let id = match CrawlId::new(crawl_id) {
            Ok(id) => id,
            Err(e) => {
                errors::log_failure(&e, "get_crawl_summary");
                return errors::describe(&e, None);
            }
        };

        match self.client.crawls().get(id).await {
            Ok(summary) => {
                tracing::info!("Successfully retrieved summary for crawl {id}");
                format::crawl_summary(id, &summary)
            }
            Err(e) => {
                errors::log_failure(&e, &format!("get_crawl_summary({id})"));
                errors::describe(&e, Some(id))
            }
        }
    }

    /// Renders up to `limit` items of a chunked listing as JSON lines
    ///
    /// Items already collected are kept when a later chunk fails; the error
    /// line is appended after them.
    pub async fn dump_chunked(&self, request: ChunkedRequest, limit: Option<usize>) -> String {
        let path = request.path().to_string();
        let stream = match self.client.chunked(request) {
            Ok(stream) => stream,
            Err(e) => {
                errors::log_failure(&e, "dump_chunked");
                return errors::describe(&e, None);
            }
        };

        let mut lines = Vec::new();
        let mut stream = stream.take(limit.unwrap_or(usize::MAX));
        while let Some(item) = stream.next().await {
            match item {
                Ok(value) => lines.push(value.to_string()),
                Err(e) => {
                    errors::log_failure(&e, &format!("dump_chunked({path})"));
                    lines.push(errors::describe(&e, None));
                    break;
                }
            }
        }

        if lines.is_empty() {
            return "No items found.".to_string();
        }
        lines.join("\n")
    }
}

impl Default for AudistoTools {
    fn default() -> Self {
        Self::new()
    }
}
