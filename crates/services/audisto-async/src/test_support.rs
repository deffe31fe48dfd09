//! Helpers shared by unit and integration tests.

use std::time::Duration;

use crate::config::{ENV_API_KEY, ENV_PASSWORD};
use crate::AudistoConfig;

/// API key used by [`test_config`]
pub const TEST_API_KEY: &str = "test-api-key";
/// Password used by [`test_config`]
pub const TEST_PASSWORD: &str = "test-password";

/// Configuration pointed at a mock server, with test credentials and a
/// millisecond-scale backoff so retry tests stay fast.
#[must_use]
pub fn test_config(base: impl Into<String>) -> AudistoConfig {
    AudistoConfig::new()
        .with_api_base(base)
        .with_api_version("2.0")
        .with_api_key(TEST_API_KEY)
        .with_password(TEST_PASSWORD)
        .with_timeout(Duration::from_secs(5))
        .with_max_retries(3)
        .with_backoff_factor(0.005)
}

/// RAII guard over a set of environment variables.
///
/// Each variable is restored to its previous value (or removed if it was unset)
/// when the guard is dropped. Use together with `#[serial(env)]`.
pub struct EnvGuard {
    saved: Vec<(&'static str, Option<String>)>,
}

impl EnvGuard {
    /// Set an environment variable for the lifetime of the guard.
    #[must_use]
    pub fn set(key: &'static str, val: &str) -> Self {
        Self::apply(&[(key, Some(val))])
    }

    /// Remove an environment variable for the lifetime of the guard.
    #[must_use]
    pub fn remove(key: &'static str) -> Self {
        Self::apply(&[(key, None)])
    }

    /// Set or clear both Audisto credential variables at once.
    #[must_use]
    pub fn credentials(api_key: Option<&str>, password: Option<&str>) -> Self {
        Self::apply(&[(ENV_API_KEY, api_key), (ENV_PASSWORD, password)])
    }

    fn apply(vars: &[(&'static str, Option<&str>)]) -> Self {
        let saved = vars
            .iter()
            .map(|(key, val)| {
                let prev = std::env::var(key).ok();
                // SAFETY: tests touching the environment run under `#[serial(env)]`.
                match val {
                    Some(v) => unsafe { std::env::set_var(key, v) },
                    None => unsafe { std::env::remove_var(key) },
                }
                (*key, prev)
            })
            .collect();
        Self { saved }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, prev) in self.saved.iter().rev() {
            // SAFETY: see `EnvGuard::apply`.
            match prev {
                Some(v) => unsafe { std::env::set_var(key, v) },
                None => unsafe { std::env::remove_var(key) },
            }
        }
    }
}
