use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use crate::error::AudistoError;

/// Default Audisto API base URL
pub const AUDISTO_DEFAULT_BASE: &str = "https://api.audisto.com";
/// Default Audisto API version segment
pub const AUDISTO_DEFAULT_VERSION: &str = "2.0";
/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);
/// Default number of retries after the initial request
pub const DEFAULT_MAX_RETRIES: usize = 3;
/// Default backoff factor in seconds
pub const DEFAULT_BACKOFF_FACTOR: f64 = 0.5;

/// Environment variable holding the API key (Basic auth username)
pub const ENV_API_KEY: &str = "AUDISTO_API_KEY";
/// Environment variable holding the password (Basic auth password)
pub const ENV_PASSWORD: &str = "AUDISTO_PASSWORD";
/// Environment variable overriding the API version
pub const ENV_API_VERSION: &str = "AUDISTO_API_VERSION";
/// Environment variable overriding the API base URL
pub const ENV_BASE_URL: &str = "AUDISTO_BASE_URL";

/// API key and password pair sent as HTTP Basic credentials
///
/// Both halves are always present and non-blank; a half-configured pair is
/// represented as no credentials at all.
#[derive(Clone, Debug)]
pub struct Credentials {
    api_key: SecretString,
    password: SecretString,
}

impl Credentials {
    /// Builds a credential pair, returning `None` when either half is blank
    #[must_use]
    pub fn new(api_key: &str, password: &str) -> Option<Self> {
        let api_key = api_key.trim();
        let password = password.trim();
        if api_key.is_empty() || password.is_empty() {
            return None;
        }
        Some(Self {
            api_key: SecretString::from(api_key.to_string()),
            password: SecretString::from(password.to_string()),
        })
    }

    /// Basic auth username
    #[must_use]
    pub fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }

    /// Basic auth password
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.expose_secret()
    }
}

fn env_nonempty(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Configuration for the Audisto client
///
/// Debug output automatically redacts the credentials via [`SecretString`].
#[derive(Clone, Debug)]
pub struct AudistoConfig {
    api_base: String,
    api_version: String,
    api_key: Option<SecretString>,
    password: Option<SecretString>,
    timeout: Duration,
    max_retries: usize,
    backoff_factor: f64,
}

impl Default for AudistoConfig {
    fn default() -> Self {
        Self {
            api_base: env_nonempty(ENV_BASE_URL).unwrap_or_else(|| AUDISTO_DEFAULT_BASE.into()),
            api_version: env_nonempty(ENV_API_VERSION)
                .unwrap_or_else(|| AUDISTO_DEFAULT_VERSION.into()),
            api_key: env_nonempty(ENV_API_KEY).map(SecretString::from),
            password: env_nonempty(ENV_PASSWORD).map(SecretString::from),
            timeout: DEFAULT_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
            backoff_factor: DEFAULT_BACKOFF_FACTOR,
        }
    }
}

impl AudistoConfig {
    /// Creates a new configuration with default settings
    ///
    /// Attempts to read from environment variables:
    /// - `AUDISTO_API_KEY` and `AUDISTO_PASSWORD` for Basic authentication
    /// - `AUDISTO_API_VERSION` for the API version (defaults to `2.0`)
    /// - `AUDISTO_BASE_URL` for a custom API base URL (defaults to `https://api.audisto.com`)
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API base URL
    #[must_use]
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into();
        self
    }

    /// Sets the API version path segment
    #[must_use]
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    /// Sets the API key
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(SecretString::from(key.into()));
        self
    }

    /// Sets the password
    #[must_use]
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(SecretString::from(password.into()));
        self
    }

    /// Sets the per-request timeout
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets how many times a failed request is retried
    #[must_use]
    pub const fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Sets the backoff factor (first retry delay, in seconds)
    #[must_use]
    pub const fn with_backoff_factor(mut self, factor: f64) -> Self {
        self.backoff_factor = factor;
        self
    }

    /// Returns the configured API base URL
    #[must_use]
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Returns the configured API version
    #[must_use]
    pub fn api_version(&self) -> &str {
        &self.api_version
    }
}

/// Configuration trait for the Audisto client
///
/// Implement this trait to provide custom authentication and API configuration.
pub trait Config: Send + Sync {
    /// Constructs the full URL for an API endpoint path
    fn url(&self, path: &str) -> String;

    /// Returns the Basic auth credentials, if both halves are configured
    fn credentials(&self) -> Option<Credentials>;

    /// Validates that authentication credentials are present.
    ///
    /// # Errors
    ///
    /// Returns an error if authentication is not properly configured.
    fn validate_auth(&self) -> Result<(), AudistoError> {
        match self.credentials() {
            Some(_) => Ok(()),
            None => Err(AudistoError::Config(
                "Missing Audisto credentials: set AUDISTO_API_KEY and AUDISTO_PASSWORD environment variables".into(),
            )),
        }
    }

    /// Per-request timeout
    fn timeout(&self) -> Duration {
        DEFAULT_TIMEOUT
    }

    /// Limit for establishing the connection; shares the request timeout
    fn connect_timeout(&self) -> Duration {
        self.timeout()
    }

    /// Number of retries after the initial request
    fn max_retries(&self) -> usize {
        DEFAULT_MAX_RETRIES
    }

    /// First retry delay in seconds; doubles on each following retry
    fn backoff_factor(&self) -> f64 {
        DEFAULT_BACKOFF_FACTOR
    }
}

impl Config for AudistoConfig {
    fn url(&self, path: &str) -> String {
        let base = self.api_base.trim_end_matches('/');
        let version = self.api_version.trim_matches('/');
        let path = path.trim_start_matches('/');
        format!("{base}/{version}/{path}")
    }

    fn credentials(&self) -> Option<Credentials> {
        match (&self.api_key, &self.password) {
            (Some(key), Some(password)) => {
                Credentials::new(key.expose_secret(), password.expose_secret())
            }
            _ => None,
        }
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    fn max_retries(&self) -> usize {
        self.max_retries
    }

    fn backoff_factor(&self) -> f64 {
        self.backoff_factor
    }
}
