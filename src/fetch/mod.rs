//! Downloading and caching raw source documents.
//!
//! The `Fetcher` trait is the network seam: `HttpFetcher` talks HTTP(S)
//! through `ureq`, `MemoryFetcher` serves fixed bodies offline. `Cache`
//! maps each URI to a stable local path and only calls the fetcher when that path is
//! missing or an overwrite is requested.

mod cache;
mod http;
mod memory;

pub use cache::{cache_location, Cache, CacheLocation};
pub(crate) use cache::write_atomic;
pub use http::HttpFetcher;
pub use memory::MemoryFetcher;

use crate::error::Result;

/// Retrieves the raw bytes behind a URI.
///
/// Implementations must be shareable across threads; the build pipeline
/// fans fetches out over scoped threads.
pub trait Fetcher: Send + Sync {
    fn fetch(&self, uri: &str) -> Result<Vec<u8>>;
}
