//! Fatal page-load errors.
//!
//! Anything here aborts the whole load. Per-resource failures are not
//! errors at this level; they travel as outcomes on
//! [`LoadedPage`](super::LoadedPage).

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::download::EngineError;
use crate::transport::FetchError;

/// Broad failure category, so callers can tell connectivity problems from
/// permission/path problems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorCategory {
    /// The page URL or loader options were rejected.
    Input,
    /// The page could not be fetched (network, DNS, HTTP status, timeout).
    Network,
    /// A directory or file could not be created or written.
    Filesystem,
    /// The page markup could not be processed.
    Markup,
    /// Resource downloads failed under the strict policy.
    Resources,
}

impl ErrorCategory {
    /// Returns a short user-facing label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Input => "Input",
            Self::Network => "Network",
            Self::Filesystem => "Filesystem",
            Self::Markup => "Markup",
            Self::Resources => "Resources",
        }
    }
}

/// Errors that abort a page load.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The page URL is not an absolute http(s) URL.
    #[error("invalid page URL: {url}")]
    InvalidUrl {
        /// The rejected input.
        url: String,
    },

    /// Loader options were rejected.
    #[error(transparent)]
    Options(#[from] EngineError),

    /// The page itself could not be fetched.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// A directory or the page file could not be created or written.
    #[error("filesystem error at {path}: {source}")]
    Filesystem {
        /// The path that failed.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The page markup could not be processed.
    #[error("failed to process markup of {url}: {message}")]
    Markup {
        /// The page URL.
        url: String,
        /// What the markup engine reported.
        message: String,
    },

    /// Resource downloads failed and the strict policy was in effect.
    #[error("{failed} of {total} resources failed to download")]
    ResourcesFailed {
        /// Number of failed resources.
        failed: usize,
        /// Number of planned resources.
        total: usize,
    },

    /// The whole load exceeded its deadline.
    #[error("loading {url} timed out after {after:?}")]
    TimedOut {
        /// The page URL.
        url: String,
        /// The configured deadline.
        after: Duration,
    },
}

impl LoadError {
    /// Creates a filesystem error.
    pub fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Filesystem {
            path: path.into(),
            source,
        }
    }

    /// Returns the failure category.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidUrl { .. } | Self::Options(_) => ErrorCategory::Input,
            Self::Fetch(_) | Self::TimedOut { .. } => ErrorCategory::Network,
            Self::Filesystem { .. } => ErrorCategory::Filesystem,
            Self::Markup { .. } => ErrorCategory::Markup,
            Self::ResourcesFailed { .. } => ErrorCategory::Resources,
        }
    }

    /// Returns the HTTP status when the page fetch got a non-2xx response.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Fetch(fetch) => fetch.status(),
            _ => None,
        }
    }
}
