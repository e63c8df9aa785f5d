//! Pluggable response cache for tile fetches.
//!
//! The [`TileCache`] trait provides a key-value interface over whole HTTP
//! responses, keyed by the exact URL string. The fetch path consults the
//! cache before the admission gate and the network, and writes back any
//! cacheable response it downloads. The core never evicts or invalidates;
//! lifecycle is the backing store's concern.
//!
//! # Design Principles
//!
//! - **String keys**: the tile URL, human-readable in logs
//! - **Whole responses**: status and content type travel with the body, so
//!   cacheability can be decided once and replayed
//! - **Injected collaborator**: the core takes `Arc<dyn TileCache>` and
//!   assumes nothing about the backing store or its capacity
//! - **Dyn-compatible**: methods return `Pin<Box<dyn Future>>` so stores
//!   can be used as trait objects

mod memory;

pub use memory::MemoryCache;

use std::future::Future;
use std::pin::Pin;

use bytes::Bytes;
use thiserror::Error;

/// Boxed future type for dyn-compatible async methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Errors that can occur in a cache backend.
///
/// The in-memory store never fails, but the trait leaves room for disk or
/// network backed implementations.
#[derive(Debug, Error)]
pub enum CacheError {
    /// I/O error in the backing store.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Backend-specific failure.
    #[error("cache backend error: {0}")]
    Backend(String),
}

/// One cached HTTP response.
///
/// Carries enough of the original response to replay the fetch result and
/// to re-evaluate cacheability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedResponse {
    /// HTTP status code of the original response.
    pub status: u16,
    /// Value of the `Content-Type` header, empty if absent.
    pub content_type: String,
    /// Raw response body.
    pub body: Bytes,
}

impl CachedResponse {
    /// Whether this response is eligible for storage.
    ///
    /// Only successful image responses are cached: status exactly 200 and
    /// a content type starting with `image/`.
    pub fn is_cacheable(&self) -> bool {
        self.status == 200 && self.content_type.starts_with("image/")
    }
}

/// Key-value store of tile responses keyed by URL.
///
/// Implementations must be `Send + Sync` for use across async tasks. The
/// interface is intentionally minimal: the core only ever gets and puts;
/// eviction, TTLs and persistence belong to the implementation.
pub trait TileCache: Send + Sync {
    /// Look up a response by URL.
    ///
    /// Returns `Ok(None)` on a miss.
    fn get(&self, key: &str) -> BoxFuture<'_, Result<Option<CachedResponse>, CacheError>>;

    /// Store a response under the given URL, replacing any previous entry.
    fn put(&self, key: &str, response: CachedResponse) -> BoxFuture<'_, Result<(), CacheError>>;
}
