//! Event sink for page loads.
//!
//! The loader reports its progress through a [`LoadObserver`] passed in by
//! the caller. Structured logs still go through `tracing`; the observer is
//! for interactive surfaces such as the CLI's progress display. Every method
//! has an empty default, so [`NoopObserver`] is the whole no-op sink.

use url::Url;

use crate::download::{DownloadTask, ResourceError};

/// Receives page-load events. Called from concurrently running download
/// tasks, so implementations must be thread-safe.
pub trait LoadObserver: Send + Sync {
    /// The page markup was fetched.
    fn page_fetched(&self, _url: &Url, _bytes: usize) {}

    /// Planning finished; `tasks` are about to be downloaded.
    fn resources_planned(&self, _tasks: &[DownloadTask]) {}

    /// A resource download started.
    fn resource_started(&self, _task: &DownloadTask) {}

    /// A resource download finished, with the number of bytes written or the error.
    fn resource_finished(&self, _task: &DownloadTask, _result: &Result<u64, ResourceError>) {}
}

/// Observer that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl LoadObserver for NoopObserver {}
