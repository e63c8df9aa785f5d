//! Fetch error types.

use thiserror::Error;

use crate::cache::CacheError;
use crate::provider::HttpError;

/// Errors that can occur while fetching a single tile.
///
/// Failures are never retried here; they propagate unchanged to the
/// mosaic builder, which treats any tile failure as fatal to the build.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The network exchange could not complete.
    #[error("network failure: {0}")]
    Network(#[from] HttpError),

    /// The response bytes could not be decoded as an image.
    #[error("decode failure: {0}")]
    Decode(String),

    /// The cache backend failed.
    #[error("cache failure: {0}")]
    Cache(#[from] CacheError),
}
