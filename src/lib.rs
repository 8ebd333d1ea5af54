//! Page Loader Library
//!
//! This library saves a single web page for offline use: it fetches the
//! page, downloads the images, stylesheets and scripts hosted on the page's
//! own origin into a sibling `_files` directory, and rewrites the markup so
//! those references point at the local copies.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`transport`] - HTTP fetch capability (trait + reqwest implementation)
//! - [`page`] - Reference classification, planning, and page assembly
//! - [`download`] - File naming and the concurrent resource fetch engine
//! - [`observer`] - Progress/event sink injected into a page load

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod download;
pub mod observer;
pub mod page;
pub mod transport;
mod user_agent;

// Re-export commonly used types
pub use download::{
    DEFAULT_CONCURRENCY, DownloadEngine, DownloadOutcome, DownloadTask, EngineError,
    ResourceError, page_file_name, resource_dir_name, resource_file_name,
};
pub use observer::{LoadObserver, NoopObserver};
pub use page::{
    Classification, Document, ErrorCategory, FailurePolicy, LoadError, LoadedPage, LoaderOptions,
    PageLoader, PageRequest, ResolvedReference, classify, load_page, plan,
};
pub use transport::{FetchError, FetchedText, HttpTransport, Transport};
