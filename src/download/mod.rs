//! File naming and concurrent downloading of page resources.
//!
//! # Features
//!
//! - Deterministic, filesystem-safe names derived from URLs
//! - Concurrent fetches with a configurable in-flight limit
//! - Per-resource failure isolation (one broken link never aborts the rest)
//! - Byte-order mark stripping for text resources
//! - Write-then-rename so no truncated file is left under its final name
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use page_loader::download::{DownloadEngine, DownloadTask, resource_file_name};
//! use page_loader::{HttpTransport, NoopObserver};
//! use url::Url;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let url = Url::parse("https://example.com/assets/app.css")?;
//! let file_name = resource_file_name(&url);
//! let task = DownloadTask {
//!     file_path: std::path::Path::new("./example-com_files").join(&file_name),
//!     file_name,
//!     url,
//! };
//! let engine = DownloadEngine::new(4)?;
//! let outcomes = engine
//!     .fetch_all(vec![task], Arc::new(HttpTransport::new()?), Arc::new(NoopObserver))
//!     .await;
//! println!("ok: {}", outcomes[0].is_success());
//! # Ok(())
//! # }
//! ```

mod engine;
mod error;
mod filename;
mod writer;

pub use engine::{DEFAULT_CONCURRENCY, DownloadEngine, DownloadOutcome, DownloadTask, EngineError};
pub use error::ResourceError;
pub use filename::{normalize, page_file_name, resource_dir_name, resource_file_name};

pub(crate) use writer::write_file;
