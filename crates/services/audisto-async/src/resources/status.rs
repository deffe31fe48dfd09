use crate::{client::Client, config::Config, error::AudistoError, types::CrawlStatus};

/// API resource for the `/status` endpoints
pub struct Status<'c, C: Config> {
    client: &'c Client<C>,
}

impl<'c, C: Config> Status<'c, C> {
    /// Creates a new Status resource
    #[must_use]
    pub const fn new(client: &'c Client<C>) -> Self {
        Self { client }
    }

    /// Lists recent crawls
    ///
    /// A body that does not validate as a crawl listing is returned as
    /// [`CrawlStatus::Raw`] instead of failing.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the API returns an error status,
    /// or the body is not JSON.
    pub async fn crawls(&self) -> Result<CrawlStatus, AudistoError> {
        let body: serde_json::Value = self.client.get("/status/crawls").await?;
        tracing::info!("Successfully fetched crawl status");
        Ok(CrawlStatus::from_value(body))
    }
}

// Add accessor to client
impl<C: Config> crate::Client<C> {
    /// Returns the Status API resource
    #[must_use]
    pub const fn status(&self) -> Status<'_, C> {
        Status::new(self)
    }
}
