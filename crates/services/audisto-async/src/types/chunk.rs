use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AudistoError;
use crate::types::CrawlId;

/// Default number of items requested per chunk
pub const DEFAULT_CHUNK_SIZE: u32 = 100;
/// Largest chunk the API serves in a single request
pub const MAX_CHUNK_SIZE: u32 = 10_000;

/// Pagination block attached to every chunked response
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMeta {
    /// Number of items across all chunks
    #[serde(default)]
    pub total: Option<u64>,
    /// Zero-based index of this chunk
    #[serde(default)]
    pub page: Option<u64>,
    /// Chunk size the server applied
    #[serde(default)]
    pub size: Option<u64>,
}

impl ChunkMeta {
    /// Decides which chunk to request after `requested` produced `item_count` items
    ///
    /// Returns `None` once iteration is complete. The page index echoed by the
    /// server wins over the one we asked for.
    #[must_use]
    pub fn next_page(&self, requested: u64, item_count: usize) -> Option<u64> {
        if item_count == 0 {
            return None;
        }
        let total = self.total?;
        let page = self.page.unwrap_or(requested);
        if let Some(size) = self.size {
            if page.saturating_add(1).saturating_mul(size) >= total {
                return None;
            }
        }
        Some(page.saturating_add(1))
    }
}

/// One decoded chunk: its items and the pagination block
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct ChunkPage {
    pub(crate) items: Vec<Value>,
    pub(crate) meta: ChunkMeta,
}

impl ChunkPage {
    /// Splits a chunked response body into items and metadata
    pub(crate) fn from_value(value: Value) -> Result<Self, AudistoError> {
        let Value::Object(mut body) = value else {
            return Err(AudistoError::Format(
                "chunked response is not a JSON object".into(),
            ));
        };

        let items = match body.remove("items") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items,
            Some(other) => {
                return Err(AudistoError::Format(format!(
                    "chunked response `items` is not an array: {other}"
                )));
            }
        };

        let meta = match body.remove("chunk") {
            None | Some(Value::Null) => ChunkMeta::default(),
            Some(chunk) => serde_json::from_value(chunk).map_err(|e| {
                AudistoError::Format(format!("chunked response has invalid `chunk` block: {e}"))
            })?,
        };

        Ok(Self { items, meta })
    }
}

/// Request for a chunked listing endpoint
///
/// ```
/// use audisto_async::types::ChunkedRequest;
///
/// let req = ChunkedRequest::new("/crawls/1/pages/")
///     .with_chunk_size(500)
///     .with_param("filter", "status:200");
/// assert_eq!(req.chunk_size(), 500);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkedRequest {
    path: String,
    chunk_size: u32,
    params: Vec<(String, String)>,
}

impl ChunkedRequest {
    /// Creates a request for `path` (relative to the versioned base URL)
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            params: Vec::new(),
        }
    }

    /// Lists the pages of a crawl (`/crawls/{id}/pages/`)
    #[must_use]
    pub fn crawl_pages(crawl_id: CrawlId) -> Self {
        Self::new(format!("/crawls/{crawl_id}/pages/"))
    }

    /// Sets the number of items per chunk
    #[must_use]
    pub const fn with_chunk_size(mut self, chunk_size: u32) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Adds a query parameter sent with every chunk request
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.params.push((key.into(), value.to_string()));
        self
    }

    /// Endpoint path
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Items per chunk
    #[must_use]
    pub const fn chunk_size(&self) -> u32 {
        self.chunk_size
    }

    /// Checks the chunk size against the API limits
    ///
    /// # Errors
    ///
    /// Returns [`AudistoError::InvalidArgument`] unless `1 <= chunk_size <= 10_000`.
    pub fn validate(&self) -> Result<(), AudistoError> {
        if (1..=MAX_CHUNK_SIZE).contains(&self.chunk_size) {
            Ok(())
        } else {
            Err(AudistoError::InvalidArgument(format!(
                "chunksize must be between 1 and 10,000 (got {})",
                self.chunk_size
            )))
        }
    }

    /// Query string for chunk `page`: caller parameters, then `chunk` and `chunksize`
    pub(crate) fn query(&self, page: u64) -> Vec<(String, String)> {
        let mut query: Vec<(String, String)> = self
            .params
            .iter()
            .filter(|(k, _)| k != "chunk" && k != "chunksize")
            .cloned()
            .collect();
        query.push(("chunk".into(), page.to_string()));
        query.push(("chunksize".into(), self.chunk_size.to_string()));
        query
    }
}
