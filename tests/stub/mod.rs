//! In-memory transport for integration tests that need fixed hostnames.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use page_loader::{FetchError, FetchedText, Transport};
use url::Url;

/// Canned answer for one URL.
#[derive(Debug, Clone)]
pub enum Reply {
    /// 200 with this body.
    Body(Vec<u8>),
    /// Non-2xx status.
    Status(u16),
    /// 200 with this body after a delay.
    Slow(Duration, Vec<u8>),
}

/// Serves canned replies and records every URL it was asked for.
#[derive(Debug, Default)]
pub struct StubTransport {
    replies: HashMap<String, Reply>,
    requested: Mutex<Vec<String>>,
}

impl StubTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serves `html` as the page at `url`.
    pub fn page(mut self, url: &str, html: &str) -> Self {
        self.replies
            .insert(url.to_string(), Reply::Body(html.as_bytes().to_vec()));
        self
    }

    /// Serves `bytes` at `url`.
    pub fn asset(mut self, url: &str, bytes: &[u8]) -> Self {
        self.replies.insert(url.to_string(), Reply::Body(bytes.to_vec()));
        self
    }

    /// Answers `url` with `status`.
    pub fn status(mut self, url: &str, status: u16) -> Self {
        self.replies.insert(url.to_string(), Reply::Status(status));
        self
    }

    /// Serves `bytes` at `url` after `delay`.
    pub fn slow(mut self, url: &str, delay: Duration, bytes: &[u8]) -> Self {
        self.replies
            .insert(url.to_string(), Reply::Slow(delay, bytes.to_vec()));
        self
    }

    /// URLs requested so far, in request order.
    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }

    async fn reply(&self, url: &Url) -> Result<Vec<u8>, FetchError> {
        self.requested.lock().unwrap().push(url.to_string());
        match self.replies.get(url.as_str()) {
            Some(Reply::Body(bytes)) => Ok(bytes.clone()),
            Some(Reply::Slow(delay, bytes)) => {
                tokio::time::sleep(*delay).await;
                Ok(bytes.clone())
            }
            Some(Reply::Status(status)) => Err(FetchError::http_status(url.as_str(), *status)),
            None => Err(FetchError::http_status(url.as_str(), 404)),
        }
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn fetch_text(&self, url: &Url) -> Result<FetchedText, FetchError> {
        let bytes = self.reply(url).await?;
        Ok(FetchedText {
            body: String::from_utf8_lossy(&bytes).into_owned(),
            content_type: Some("text/html; charset=utf-8".to_string()),
        })
    }

    async fn fetch_bytes(&self, url: &Url) -> Result<Vec<u8>, FetchError> {
        self.reply(url).await
    }
}

/// Sorted file names directly inside `dir`.
pub fn list_dir(dir: &std::path::Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
