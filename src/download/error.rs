//! Error types for individual resource downloads.
//!
//! A [`ResourceError`] never fails a page load on its own; it is recorded in
//! the resource's [`DownloadOutcome`](super::DownloadOutcome) and reported
//! alongside the saved page.

use std::path::PathBuf;

use thiserror::Error;

use crate::transport::FetchError;

/// Errors that can occur while downloading one resource.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// The resource could not be fetched.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The fetched bytes could not be written to disk.
    #[error("IO error writing to {path}: {source}")]
    Write {
        /// Destination file.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The download task ended without producing a result (panicked or was aborted).
    #[error("download of {url} was interrupted")]
    Interrupted {
        /// The resource URL.
        url: String,
    },
}

impl ResourceError {
    /// Creates a write error.
    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }

    /// Creates an interrupted-task error.
    pub fn interrupted(url: impl Into<String>) -> Self {
        Self::Interrupted { url: url.into() }
    }

    /// Returns the HTTP status when the resource server answered with a non-2xx status.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Fetch(fetch) => fetch.status(),
            _ => None,
        }
    }
}
