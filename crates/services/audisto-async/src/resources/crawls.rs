use crate::{
    client::Client,
    config::Config,
    error::AudistoError,
    types::{CrawlId, CrawlSummary},
};

/// API resource for the `/crawls` endpoints
pub struct Crawls<'c, C: Config> {
    client: &'c Client<C>,
}

impl<'c, C: Config> Crawls<'c, C> {
    /// Creates a new Crawls resource
    #[must_use]
    pub const fn new(client: &'c Client<C>) -> Self {
        Self { client }
    }

    /// Retrieves the summary of one crawl
    ///
    /// Unlike [`crate::resources::Status::crawls`], a body that does not match
    /// [`CrawlSummary`] is an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the API returns an error status
    /// (404 for an unknown id), or the body does not decode.
    pub async fn get(&self, crawl_id: CrawlId) -> Result<CrawlSummary, AudistoError> {
        tracing::debug!("Fetching crawl summary for ID {crawl_id}");
        let summary = self.client.get(&format!("/crawls/{crawl_id}")).await?;
        tracing::info!("Successfully fetched crawl summary for ID {crawl_id}");
        Ok(summary)
    }
}

// Add accessor to client
impl<C: Config> crate::Client<C> {
    /// Returns the Crawls API resource
    #[must_use]
    pub const fn crawls(&self) -> Crawls<'_, C> {
        Crawls::new(self)
    }
}
