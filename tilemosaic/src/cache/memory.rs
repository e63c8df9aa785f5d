//! In-memory response cache backed by moka.
//!
//! Wraps `moka::future::Cache` for an async-safe, lock-free store with
//! optional size-based LRU eviction. The unbounded constructor reproduces
//! the behaviour of a browser-style cache that is never evicted by the
//! application; the bounded one weighs entries by body size.

use moka::future::Cache as MokaCache;

use crate::cache::{BoxFuture, CacheError, CachedResponse, TileCache};

/// In-memory tile response cache.
///
/// Safe to share across tasks; moka's internals are lock-free on the read
/// path. Entries are weighed by their body length when a size bound is
/// configured.
pub struct MemoryCache {
    cache: MokaCache<String, CachedResponse>,
}

impl MemoryCache {
    /// Creates a cache with no size bound.
    ///
    /// Nothing is ever evicted; growth is limited only by what gets
    /// fetched.
    pub fn unbounded() -> Self {
        Self {
            cache: MokaCache::builder().build(),
        }
    }

    /// Creates a cache bounded to roughly `max_size_bytes` of body data,
    /// with LRU eviction beyond that.
    pub fn bounded(max_size_bytes: u64) -> Self {
        let cache = MokaCache::builder()
            .weigher(|_key: &String, value: &CachedResponse| -> u32 {
                value.body.len().min(u32::MAX as usize) as u32
            })
            .max_capacity(max_size_bytes)
            .build();

        Self { cache }
    }

    /// Current number of entries.
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    /// Current weighted size in bytes.
    pub fn size_bytes(&self) -> u64 {
        self.cache.weighted_size()
    }

    /// Runs moka's pending maintenance tasks.
    ///
    /// Eviction bookkeeping is eventually consistent; tests and tools
    /// that inspect sizes call this first.
    pub async fn maintain(&self) {
        self.cache.run_pending_tasks().await;
    }
}

impl TileCache for MemoryCache {
    fn get(&self, key: &str) -> BoxFuture<'_, Result<Option<CachedResponse>, CacheError>> {
        let key = key.to_string();
        Box::pin(async move { Ok(self.cache.get(&key).await) })
    }

    fn put(&self, key: &str, response: CachedResponse) -> BoxFuture<'_, Result<(), CacheError>> {
        let key = key.to_string();
        Box::pin(async move {
            self.cache.insert(key, response).await;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn png_response(body: &'static [u8]) -> CachedResponse {
        CachedResponse {
            status: 200,
            content_type: "image/png".to_string(),
            body: Bytes::from_static(body),
        }
    }

    #[tokio::test]
    async fn test_put_then_get_returns_entry() {
        let cache = MemoryCache::unbounded();

        cache
            .put("https://tiles/0/0/0.png", png_response(&[1, 2, 3]))
            .await
            .unwrap();

        let hit = cache.get("https://tiles/0/0/0.png").await.unwrap();
        assert_eq!(hit, Some(png_response(&[1, 2, 3])));
    }

    #[tokio::test]
    async fn test_get_missing_key_is_none() {
        let cache = MemoryCache::unbounded();
        let miss = cache.get("https://tiles/9/9/9.png").await.unwrap();
        assert!(miss.is_none());
    }

    #[tokio::test]
    async fn test_put_replaces_existing_entry() {
        let cache = MemoryCache::unbounded();

        cache.put("key", png_response(&[1])).await.unwrap();
        cache.put("key", png_response(&[2, 2])).await.unwrap();

        let hit = cache.get("key").await.unwrap().unwrap();
        assert_eq!(hit.body.as_ref(), &[2, 2]);
    }

    #[tokio::test]
    async fn test_bounded_cache_evicts_when_over_limit() {
        let cache = MemoryCache::bounded(2500);

        cache.put("a", png_response(&[0; 1000])).await.unwrap();
        cache.put("b", png_response(&[0; 1000])).await.unwrap();
        cache.put("c", png_response(&[0; 1000])).await.unwrap();

        // Eviction is asynchronous; give moka a moment and force its
        // maintenance to run.
        cache.maintain().await;
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        cache.maintain().await;

        assert!(
            cache.size_bytes() <= 2500,
            "expected eviction below the limit, got {} bytes",
            cache.size_bytes()
        );
    }

    #[tokio::test]
    async fn test_usable_as_trait_object() {
        use std::sync::Arc;

        let cache: Arc<dyn TileCache> = Arc::new(MemoryCache::unbounded());
        cache.put("key", png_response(&[7])).await.unwrap();
        assert!(cache.get("key").await.unwrap().is_some());
    }
}
