//! Concurrent resource downloads with per-resource failure isolation.
//!
//! The engine takes the [`DownloadTask`]s produced by the planner, runs one
//! fetch-and-write per task on the Tokio runtime, and returns one
//! [`DownloadOutcome`] per task in task order.
//!
//! # Concurrency Model
//!
//! - Each task runs in its own Tokio task inside a `JoinSet`
//! - A semaphore permit bounds how many fetches are in flight
//! - Tasks may complete in any order; outcomes are re-ordered by task index
//! - Dropping the `fetch_all` future aborts every in-flight task
//!
//! A failing task never cancels its siblings. Whether failures are fatal for
//! the page is decided by the caller after all outcomes are in.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::error::ResourceError;
use super::filename::is_text_resource;
use super::writer;
use crate::observer::LoadObserver;
use crate::transport::Transport;

/// Minimum allowed concurrency value.
const MIN_CONCURRENCY: usize = 1;

/// Maximum allowed concurrency value.
const MAX_CONCURRENCY: usize = 100;

/// Default concurrency if not specified.
pub const DEFAULT_CONCURRENCY: usize = 10;

/// UTF-8 byte-order mark.
const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// Error type for download engine construction.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Invalid concurrency value provided.
    #[error(
        "invalid concurrency value {value}: must be between {MIN_CONCURRENCY} and {MAX_CONCURRENCY}"
    )]
    InvalidConcurrency {
        /// The invalid value that was provided.
        value: usize,
    },
}

/// One local resource to fetch and where to put it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTask {
    /// Absolute URL of the resource.
    pub url: Url,
    /// File name inside the resource directory.
    pub file_name: String,
    /// Full destination path (`<output>/<page>_files/<file_name>`).
    pub file_path: PathBuf,
}

/// Result of running one [`DownloadTask`].
#[derive(Debug)]
pub struct DownloadOutcome {
    /// The task that was run.
    pub task: DownloadTask,
    /// Bytes written on success.
    pub result: Result<u64, ResourceError>,
}

impl DownloadOutcome {
    /// Returns true when the resource was written to disk.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    /// Returns the error when the resource failed.
    #[must_use]
    pub fn error(&self) -> Option<&ResourceError> {
        self.result.as_ref().err()
    }
}

/// Runs resource downloads concurrently.
#[derive(Debug, Clone)]
pub struct DownloadEngine {
    /// Configured concurrency limit.
    concurrency: usize,
}

impl Default for DownloadEngine {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

impl DownloadEngine {
    /// Creates an engine that runs at most `concurrency` fetches at once.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConcurrency`] if the value is outside
    /// the valid range (1-100).
    ///
    /// # Example
    ///
    /// ```
    /// use page_loader::download::DownloadEngine;
    ///
    /// let engine = DownloadEngine::new(4).unwrap();
    /// assert_eq!(engine.concurrency(), 4);
    /// ```
    pub fn new(concurrency: usize) -> Result<Self, EngineError> {
        if !(MIN_CONCURRENCY..=MAX_CONCURRENCY).contains(&concurrency) {
            return Err(EngineError::InvalidConcurrency { value: concurrency });
        }
        debug!(concurrency, "creating download engine");
        Ok(Self { concurrency })
    }

    /// Returns the configured concurrency limit.
    #[must_use]
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Downloads every task and returns one outcome per task, in task order.
    ///
    /// Creating the destination directory is the caller's job.
    ///
    /// Note: individual download failures do NOT make this method fail; they
    /// are returned as failed outcomes.
    #[instrument(skip_all, fields(tasks = tasks.len(), concurrency = self.concurrency))]
    pub async fn fetch_all(
        &self,
        tasks: Vec<DownloadTask>,
        transport: Arc<dyn Transport>,
        observer: Arc<dyn LoadObserver>,
    ) -> Vec<DownloadOutcome> {
        if tasks.is_empty() {
            return Vec::new();
        }

        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut set = JoinSet::new();
        let mut indices = HashMap::with_capacity(tasks.len());

        for (index, task) in tasks.iter().enumerate() {
            let task = task.clone();
            let transport = Arc::clone(&transport);
            let observer = Arc::clone(&observer);
            let semaphore = Arc::clone(&semaphore);

            let handle = set.spawn(async move {
                // Permit is dropped when this block exits (RAII)
                let _permit = semaphore.acquire_owned().await.ok();

                observer.resource_started(&task);
                let result = download_resource(transport.as_ref(), &task).await;
                observer.resource_finished(&task, &result);
                (index, result)
            });
            indices.insert(handle.id(), index);
        }

        let mut results: Vec<Option<Result<u64, ResourceError>>> =
            std::iter::repeat_with(|| None).take(tasks.len()).collect();

        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((index, result)) => results[index] = Some(result),
                Err(join_error) => {
                    warn!(error = %join_error, "download task did not complete");
                    if let Some(&index) = indices.get(&join_error.id()) {
                        results[index] =
                            Some(Err(ResourceError::interrupted(tasks[index].url.as_str())));
                    }
                }
            }
        }

        let outcomes: Vec<DownloadOutcome> = tasks
            .into_iter()
            .zip(results)
            .map(|(task, result)| {
                let result =
                    result.unwrap_or_else(|| Err(ResourceError::interrupted(task.url.as_str())));
                DownloadOutcome { task, result }
            })
            .collect();

        let failed = outcomes.iter().filter(|o| !o.is_success()).count();
        info!(
            completed = outcomes.len() - failed,
            failed,
            "resource downloads finished"
        );
        outcomes
    }
}

async fn download_resource(
    transport: &dyn Transport,
    task: &DownloadTask,
) -> Result<u64, ResourceError> {
    debug!(url = %task.url, path = %task.file_path.display(), "starting resource download");

    let bytes = transport.fetch_bytes(&task.url).await?;
    let bytes = if is_text_resource(&task.file_name) {
        strip_bom(bytes)
    } else {
        bytes
    };
    let written = u64::try_from(bytes.len()).unwrap_or(u64::MAX);

    writer::write_file(&task.file_path, bytes)
        .await
        .map_err(|e| ResourceError::write(task.file_path.clone(), e))?;

    debug!(url = %task.url, bytes = written, "resource saved");
    Ok(written)
}

fn strip_bom(mut bytes: Vec<u8>) -> Vec<u8> {
    if bytes.starts_with(&UTF8_BOM) {
        bytes.drain(..UTF8_BOM.len());
    }
    bytes
}
