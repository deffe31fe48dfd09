//! Request and response types for the Audisto API

/// Chunked (paginated) listing types
pub mod chunk;
/// Crawl summary types
pub mod crawls;
/// Crawl status types
pub mod status;

pub use chunk::{ChunkMeta, ChunkedRequest};
pub use crawls::{CrawlId, CrawlSummary};
pub use status::{CrawlStatus, CrawlStatusItem, CrawlStatusResponse, CrawlStatusRow};
