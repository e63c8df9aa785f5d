//! Tile server access: HTTP transport and URL templates.
//!
//! The transport is abstracted behind [`AsyncHttpClient`] so the fetch
//! path can be exercised against mock servers in tests. [`UrlTemplate`]
//! turns a [`crate::coord::TileCoord`] into the concrete resource
//! identifier used both as network address and cache key.

mod http;
mod template;

pub use http::{AsyncHttpClient, HttpError, ReqwestClient, TileResponse};
pub use template::UrlTemplate;

#[cfg(test)]
pub use http::tests::MockHttpClient;
