//! HTTP client abstraction for testability.
//!
//! The fetch path never talks to `reqwest` directly; it goes through
//! [`AsyncHttpClient`], which lets tests inject mock transports. Note that
//! a non-2xx status is *not* a transport error: the response is returned
//! as-is and it is the decoder downstream that rejects an HTML error page.

use bytes::Bytes;
use thiserror::Error;

use crate::cache::{BoxFuture, CachedResponse};

/// Errors raised by the HTTP transport.
///
/// Only failures to complete the exchange end up here; servers answering
/// with an error status still produce a [`TileResponse`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HttpError {
    /// The client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(String),

    /// The request could not complete (DNS, connect, TLS, ...).
    #[error("request failed: {0}")]
    Request(String),

    /// The response body could not be read.
    #[error("failed to read response body: {0}")]
    Body(String),
}

/// One HTTP response from a tile server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileResponse {
    /// HTTP status code.
    pub status: u16,
    /// Value of the `Content-Type` header, empty if absent.
    pub content_type: String,
    /// Response body.
    pub body: Bytes,
}

impl From<TileResponse> for CachedResponse {
    fn from(response: TileResponse) -> Self {
        CachedResponse {
            status: response.status,
            content_type: response.content_type,
            body: response.body,
        }
    }
}

/// Trait for asynchronous HTTP GET operations.
///
/// Dyn-compatible via boxed futures; the fetcher is generic over the
/// client so mocks plug in without dynamic dispatch.
pub trait AsyncHttpClient: Send + Sync {
    /// Performs an HTTP GET request for the given URL.
    fn get<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<TileResponse, HttpError>>;
}

/// Real HTTP client implementation using reqwest.
///
/// Built without a request timeout: the streaming core has no timeout
/// semantics of its own. Embedders that want one can use
/// [`ReqwestClient::with_timeout`].
pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    /// Creates a client with default configuration and no timeout.
    pub fn new() -> Result<Self, HttpError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| HttpError::ClientBuild(e.to_string()))?;

        Ok(Self { client })
    }

    /// Creates a client with a per-request timeout.
    pub fn with_timeout(timeout_secs: u64) -> Result<Self, HttpError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| HttpError::ClientBuild(e.to_string()))?;

        Ok(Self { client })
    }
}

impl AsyncHttpClient for ReqwestClient {
    fn get<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<TileResponse, HttpError>> {
        Box::pin(async move {
            let response = self
                .client
                .get(url)
                .send()
                .await
                .map_err(|e| HttpError::Request(e.to_string()))?;

            let status = response.status().as_u16();
            let content_type = response
                .headers()
                .get(reqwest::header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string();

            let body = response
                .bytes()
                .await
                .map_err(|e| HttpError::Body(e.to_string()))?;

            Ok(TileResponse {
                status,
                content_type,
                body,
            })
        })
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;

    /// Mock HTTP client returning a fixed response for every URL.
    pub struct MockHttpClient {
        pub response: Result<TileResponse, HttpError>,
    }

    impl AsyncHttpClient for MockHttpClient {
        fn get<'a>(&'a self, _url: &'a str) -> BoxFuture<'a, Result<TileResponse, HttpError>> {
            let response = self.response.clone();
            Box::pin(async move { response })
        }
    }

    #[tokio::test]
    async fn test_mock_client_success() {
        let mock = MockHttpClient {
            response: Ok(TileResponse {
                status: 200,
                content_type: "image/png".to_string(),
                body: Bytes::from_static(&[1, 2, 3]),
            }),
        };

        let response = mock.get("http://example.com").await.unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.body.as_ref(), &[1, 2, 3]);
    }

    #[tokio::test]
    async fn test_mock_client_error() {
        let mock = MockHttpClient {
            response: Err(HttpError::Request("connection refused".to_string())),
        };

        assert!(mock.get("http://example.com").await.is_err());
    }

    #[test]
    fn test_conversion_to_cache_entry_preserves_fields() {
        let response = TileResponse {
            status: 200,
            content_type: "image/png".to_string(),
            body: Bytes::from_static(&[0x89, 0x50]),
        };
        let entry: CachedResponse = response.into();
        assert_eq!(entry.status, 200);
        assert_eq!(entry.content_type, "image/png");
        assert_eq!(entry.body.as_ref(), &[0x89, 0x50]);
    }
}
