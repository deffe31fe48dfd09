//! API resource implementations for the Audisto client

/// Generic chunked listing iteration
pub mod chunked;
/// Single-crawl resource
pub mod crawls;
/// Crawl status resource
pub mod status;

pub use chunked::ChunkStream;
pub use crawls::Crawls;
pub use status::Status;
