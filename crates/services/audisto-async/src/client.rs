use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use backon::{ExponentialBuilder, Retryable};
use serde::{Serialize, de::DeserializeOwned};
use tokio::sync::Mutex;

use crate::{config::Config, error::AudistoError, retry};

/// Audisto API client
///
/// The client is generic over a [`Config`] implementation that provides authentication
/// and API configuration.
///
/// Audisto accepts one in-flight request per credential pair, so every outbound
/// request holds an egress lock for the duration of the exchange. Clones share
/// the lock; independently constructed clients do not.
#[derive(Debug, Clone)]
pub struct Client<C: Config> {
    http: reqwest::Client,
    config: C,
    backoff: ExponentialBuilder,
    egress: Arc<Mutex<()>>,
}

impl Client<crate::config::AudistoConfig> {
    /// Creates a new client with default configuration
    ///
    /// Uses environment variables for authentication:
    /// - `AUDISTO_API_KEY` and `AUDISTO_PASSWORD` for Basic authentication
    /// - `AUDISTO_API_VERSION` for the API version
    /// - `AUDISTO_BASE_URL` for custom API base URL
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(crate::config::AudistoConfig::new())
    }
}

impl<C: Config + Default> Default for Client<C> {
    fn default() -> Self {
        Self::with_config(C::default())
    }
}

impl<C: Config> Client<C> {
    /// Creates a new client with the given configuration.
    ///
    /// # Panics
    ///
    /// Panics if the reqwest client cannot be built.
    #[must_use]
    pub fn with_config(config: C) -> Self {
        Self {
            http: reqwest::Client::builder()
                .connect_timeout(config.connect_timeout())
                .timeout(config.timeout())
                .build()
                .expect("reqwest client"),
            backoff: retry::backoff_builder(config.max_retries(), config.backoff_factor()),
            config,
            egress: Arc::new(Mutex::new(())),
        }
    }

    /// Replaces the HTTP client with a custom one
    ///
    /// The configured timeout only applies to the client built by [`Client::with_config`].
    #[must_use]
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    /// Replaces the backoff configuration for retry logic
    #[must_use]
    pub const fn with_backoff(mut self, backoff: ExponentialBuilder) -> Self {
        self.backoff = backoff;
        self
    }

    /// Returns a reference to the client's configuration
    #[must_use]
    pub const fn config(&self) -> &C {
        &self.config
    }

    pub(crate) async fn get<O: DeserializeOwned>(&self, path: &str) -> Result<O, AudistoError> {
        self.get_with_query(path, &[] as &[(&str, &str)]).await
    }

    pub(crate) async fn get_with_query<Q, O>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<O, AudistoError>
    where
        Q: Serialize + Sync + ?Sized,
        O: DeserializeOwned,
    {
        let url = self.config.url(path);
        tracing::debug!("GET {url}");
        let mk = || async {
            let mut req = self.http.get(&url).query(query);
            if let Some(creds) = self.config.credentials() {
                req = req.basic_auth(creds.api_key(), Some(creds.password()));
            }
            Ok(req.build()?)
        };
        self.execute(mk).await
    }

    async fn execute<O, M, Fut>(&self, mk: M) -> Result<O, AudistoError>
    where
        O: DeserializeOwned,
        M: Fn() -> Fut + Send + Sync,
        Fut: core::future::Future<Output = Result<reqwest::Request, AudistoError>> + Send,
    {
        // Validate auth before any request
        self.config.validate_auth()?;

        let bytes = self.execute_raw(mk).await?;
        let resp: O =
            serde_json::from_slice(&bytes).map_err(|e| crate::error::map_deser(&e, &bytes))?;
        Ok(resp)
    }

    async fn execute_raw<M, Fut>(&self, mk: M) -> Result<bytes::Bytes, AudistoError>
    where
        M: Fn() -> Fut + Send + Sync,
        Fut: core::future::Future<Output = Result<reqwest::Request, AudistoError>> + Send,
    {
        let http_client = self.http.clone();
        let attempts = AtomicUsize::new(0);

        let result = (|| async {
            let request = mk().await?;
            attempts.fetch_add(1, Ordering::Relaxed);

            // One exchange at a time; released before any backoff sleep
            let (status, retry_after, bytes) = {
                let _permit = self.egress.lock().await;
                let response = http_client
                    .execute(request)
                    .await
                    .map_err(AudistoError::Reqwest)?;
                let status = response.status();
                let retry_after = retry::parse_retry_after(response.headers());
                let bytes = response.bytes().await.map_err(AudistoError::Reqwest)?;
                (status, retry_after, bytes)
            };

            if status.is_success() {
                return Ok(bytes);
            }

            Err(crate::error::deserialize_api_error(status, &bytes).with_retry_after(retry_after))
        })
        .retry(self.backoff)
        .when(AudistoError::is_retryable)
        .adjust(|err, dur| retry::next_delay(dur, err.retry_after()))
        .notify(|err, dur| {
            tracing::warn!("Audisto request failed ({err}); retrying in {dur:?}");
        })
        .await;

        match result {
            Err(err @ AudistoError::Api(_)) if err.is_retryable() => {
                Err(AudistoError::RetriesExhausted {
                    attempts: attempts.load(Ordering::Relaxed),
                    last: Box::new(err),
                })
            }
            other => other,
        }
    }
}
