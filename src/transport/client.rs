//! reqwest-backed [`Transport`] implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, ClientBuilder};
use tracing::{debug, instrument};
use url::Url;

use super::constants::{CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS};
use super::{FetchError, FetchedText, Transport};
use crate::user_agent;

/// HTTP transport for fetching pages and their resources.
///
/// Created once per page load and shared (via `Arc<dyn Transport>`) with all
/// resource download tasks, so they reuse one connection pool.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Creates a transport with default timeouts.
    ///
    /// Default configuration:
    /// - Connect timeout: 30 seconds
    /// - Request timeout: 5 minutes
    /// - Gzip decompression: enabled
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Client`] if the HTTP client cannot be built.
    pub fn new() -> Result<Self, FetchError> {
        Self::with_timeouts(CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS)
    }

    /// Creates a transport with explicit timeout values (in seconds).
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Client`] if the HTTP client cannot be built.
    #[instrument(level = "debug")]
    pub fn with_timeouts(
        connect_timeout_secs: u64,
        read_timeout_secs: u64,
    ) -> Result<Self, FetchError> {
        let client = ClientBuilder::new()
            .connect_timeout(Duration::from_secs(connect_timeout_secs))
            .timeout(Duration::from_secs(read_timeout_secs))
            .user_agent(user_agent::default_user_agent())
            .gzip(true)
            .build()
            .map_err(|source| FetchError::Client { source })?;
        Ok(Self { client })
    }

    async fn send(&self, url: &Url) -> Result<reqwest::Response, FetchError> {
        if !matches!(url.scheme(), "http" | "https") {
            return Err(FetchError::invalid_url(url.as_str()));
        }

        let response = self.client.get(url.clone()).send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::timeout(url.as_str())
            } else {
                FetchError::network(url.as_str(), e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            debug!(url = %url, status = status.as_u16(), "non-success response");
            return Err(FetchError::http_status(url.as_str(), status.as_u16()));
        }

        Ok(response)
    }
}

fn body_error(url: &Url, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::timeout(url.as_str())
    } else {
        FetchError::body(url.as_str(), error)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(skip(self), fields(url = %url))]
    async fn fetch_text(&self, url: &Url) -> Result<FetchedText, FetchError> {
        let response = self.send(url).await?;
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(std::string::ToString::to_string);
        let body = response.text().await.map_err(|e| body_error(url, e))?;
        debug!(bytes = body.len(), content_type = ?content_type, "fetched text");
        Ok(FetchedText { body, content_type })
    }

    #[instrument(skip(self), fields(url = %url))]
    async fn fetch_bytes(&self, url: &Url) -> Result<Vec<u8>, FetchError> {
        let response = self.send(url).await?;
        let bytes = response.bytes().await.map_err(|e| body_error(url, e))?;
        debug!(bytes = bytes.len(), "fetched bytes");
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fetch_rejects_non_http_scheme() {
        let transport = HttpTransport::new().unwrap();
        let url = Url::parse("ftp://codica.la/file.txt").unwrap();
        let result = transport.fetch_bytes(&url).await;
        assert!(
            matches!(result, Err(FetchError::InvalidUrl { .. })),
            "expected InvalidUrl, got {result:?}"
        );
    }

    #[test]
    fn test_with_timeouts_builds_client() {
        assert!(HttpTransport::with_timeouts(5, 10).is_ok());
    }
}
