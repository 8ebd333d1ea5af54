//! HTTP fetch capability used by the page loader.
//!
//! The loader never talks to reqwest directly; it goes through the
//! [`Transport`] trait so the whole pipeline can run against an in-memory
//! stub in tests. [`HttpTransport`] is the production implementation.
//!
//! # Example
//!
//! ```no_run
//! use page_loader::transport::{HttpTransport, Transport};
//! use url::Url;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let transport = HttpTransport::new()?;
//! let page = transport.fetch_text(&Url::parse("https://example.com/")?).await?;
//! println!("{} bytes of {:?}", page.body.len(), page.content_type);
//! # Ok(())
//! # }
//! ```

mod client;
mod constants;
mod error;

use async_trait::async_trait;
use url::Url;

pub use client::HttpTransport;
pub use constants::{CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS};
pub use error::FetchError;

/// A decoded text response (the page itself).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedText {
    /// Response body decoded to text using the response charset.
    pub body: String,
    /// The `Content-Type` header, if the server sent one.
    pub content_type: Option<String>,
}

/// Fetch capability consumed by the loader.
///
/// Any non-2xx status must be reported as [`FetchError::HttpStatus`].
/// This trait uses `async_trait` so it can be held as `Arc<dyn Transport>`
/// and shared with spawned download tasks.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetches `url` and decodes the body as text.
    async fn fetch_text(&self, url: &Url) -> Result<FetchedText, FetchError>;

    /// Fetches `url` as raw bytes, without any text decoding.
    async fn fetch_bytes(&self, url: &Url) -> Result<Vec<u8>, FetchError>;
}
