//! Cache-aware tile fetching.
//!
//! [`TileFetcher`] resolves a tile URL to decoded pixels:
//!
//! 1. Cache hit: return the cached body without touching the gate.
//! 2. Cache miss: acquire a gate permit (suspending until admitted),
//!    perform the network request, and write cacheable responses back to
//!    the store. The permit is an RAII token, released on every exit path.
//! 3. Decode the bytes into an RGBA image, after the permit is gone.
//!
//! Two tasks missing the same URL concurrently will both download it; the
//! later cache write wins. The race is harmless for idempotent tile
//! content and left unserialized.

mod error;

pub use error::FetchError;

use std::sync::Arc;

use bytes::Bytes;
use image::RgbaImage;

use crate::cache::{CachedResponse, TileCache};
use crate::gate::FetchGate;
use crate::provider::AsyncHttpClient;

/// Fetches tile bytes through the cache and the admission gate.
///
/// Cheap to share: hold it in an `Arc` and clone that into per-tile tasks.
pub struct TileFetcher<C> {
    client: C,
    cache: Arc<dyn TileCache>,
    gate: Arc<FetchGate>,
}

impl<C: AsyncHttpClient> TileFetcher<C> {
    /// Creates a fetcher over the given transport, cache and gate.
    pub fn new(client: C, cache: Arc<dyn TileCache>, gate: Arc<FetchGate>) -> Self {
        Self {
            client,
            cache,
            gate,
        }
    }

    /// The admission gate shared by this fetcher.
    pub fn gate(&self) -> &Arc<FetchGate> {
        &self.gate
    }

    /// The underlying HTTP transport.
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Resolves a URL to raw response bytes, consulting the cache first.
    pub async fn fetch_bytes(&self, url: &str) -> Result<Bytes, FetchError> {
        if let Some(hit) = self.cache.get(url).await? {
            tracing::trace!(url, "Cache hit");
            return Ok(hit.body);
        }

        let _permit = self.gate.acquire().await;
        tracing::trace!(url, in_flight = self.gate.in_flight(), "Downloading");

        let response: CachedResponse = self.client.get(url).await?.into();

        if response.is_cacheable() {
            self.cache.put(url, response.clone()).await?;
        } else {
            tracing::debug!(
                url,
                status = response.status,
                content_type = %response.content_type,
                "Response not cacheable"
            );
        }

        Ok(response.body)
    }

    /// Resolves a URL to a decoded RGBA image.
    ///
    /// Anything the `image` crate cannot parse - including HTML error
    /// pages handed back with a non-200 status - surfaces as
    /// [`FetchError::Decode`].
    pub async fn fetch_image(&self, url: &str) -> Result<RgbaImage, FetchError> {
        let body = self.fetch_bytes(url).await?;

        let image = image::load_from_memory(&body)
            .map_err(|e| FetchError::Decode(e.to_string()))?
            .to_rgba8();

        Ok(image)
    }
}
