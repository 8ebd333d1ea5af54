//! Page loading pipeline.
//!
//! A page load runs in four steps:
//!
//! 1. Fetch the page markup through a [`Transport`](crate::Transport)
//! 2. [`plan`]: classify every `img[src]`, `link[href]` and `script[src]`
//!    reference, rewrite local ones to `<page>_files/<name>` and collect one
//!    [`DownloadTask`](crate::DownloadTask) per rewritten reference
//! 3. Download the tasks concurrently, one outcome per task
//! 4. Write the rewritten markup to `<page>.html`
//!
//! [`PageLoader`] drives the steps; [`load_page`] is the one-call HTTP entry
//! point.

mod classify;
mod error;
mod html;
mod loader;
mod plan;

pub use classify::{Classification, ResolvedReference, classify};
pub use error::{ErrorCategory, LoadError};
pub use html::{Document, ElementKind, MarkupError, ResourceReference};
pub use loader::{FailurePolicy, LoadedPage, LoaderOptions, PageLoader, PageRequest, load_page};
pub use plan::plan;
