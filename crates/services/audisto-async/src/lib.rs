#![warn(missing_docs)]

//! Async, read-only Audisto API v2 client with retries, single-request
//! serialization and chunked listing streams.

/// HTTP client implementation
pub mod client;
/// Configuration types for the client
pub mod config;
/// Error types
pub mod error;
/// API resource implementations
pub mod resources;
/// Retry logic utilities
pub mod retry;
/// Test support utilities (for use in tests)
#[doc(hidden)]
pub mod test_support;
/// Request and response types
pub mod types;

pub use crate::client::Client;
pub use crate::config::{AudistoConfig, Credentials};
pub use crate::error::{ApiErrorObject, AudistoError};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::resources::ChunkStream;
    pub use crate::types::*;
    pub use crate::{AudistoConfig, AudistoError, Client};
}
