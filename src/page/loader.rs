//! Page assembly: fetch, plan, download, write.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, instrument, warn};
use url::Url;

use super::error::LoadError;
use super::html::Document;
use super::plan::plan;
use crate::download::{
    self, DEFAULT_CONCURRENCY, DownloadEngine, DownloadOutcome, page_file_name, resource_dir_name,
};
use crate::observer::{LoadObserver, NoopObserver};
use crate::transport::{HttpTransport, Transport};

/// What to load and where to put it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Absolute http(s) URL of the page.
    pub source_url: Url,
    /// Directory receiving the page file and its resource directory.
    pub output_dir: PathBuf,
}

impl PageRequest {
    /// Builds a request from a URL string.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::InvalidUrl`] unless `url` is an absolute
    /// `http` or `https` URL.
    pub fn new(url: &str, output_dir: impl Into<PathBuf>) -> Result<Self, LoadError> {
        let invalid = || LoadError::InvalidUrl {
            url: url.to_string(),
        };
        let source_url = Url::parse(url.trim()).map_err(|_| invalid())?;
        if !matches!(source_url.scheme(), "http" | "https") || source_url.host_str().is_none() {
            return Err(invalid());
        }
        Ok(Self {
            source_url,
            output_dir: output_dir.into(),
        })
    }
}

/// What to do with the page when some resources failed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Write the page anyway and report failures on [`LoadedPage`].
    #[default]
    Tolerate,
    /// Fail the load with [`LoadError::ResourcesFailed`]; the page file is
    /// not written.
    Strict,
}

/// Tuning for a [`PageLoader`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderOptions {
    /// Maximum resource fetches in flight (1-100).
    pub concurrency: usize,
    /// Policy for failed resources.
    pub failure_policy: FailurePolicy,
    /// Deadline for the whole load, page fetch included.
    pub timeout: Option<Duration>,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            failure_policy: FailurePolicy::Tolerate,
            timeout: None,
        }
    }
}

/// A page written to disk, with one outcome per planned resource.
#[derive(Debug)]
pub struct LoadedPage {
    /// Absolute path of the written page file.
    pub path: PathBuf,
    /// Resource outcomes in document order.
    pub outcomes: Vec<DownloadOutcome>,
}

impl LoadedPage {
    /// Number of resources written.
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    /// Number of resources that failed.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    /// The failed outcomes, in document order.
    pub fn failures(&self) -> impl Iterator<Item = &DownloadOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }
}

/// Loads pages through a [`Transport`].
pub struct PageLoader {
    transport: Arc<dyn Transport>,
    observer: Arc<dyn LoadObserver>,
    engine: DownloadEngine,
    options: LoaderOptions,
}

impl std::fmt::Debug for PageLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageLoader")
            .field("engine", &self.engine)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl PageLoader {
    /// Creates a loader with default options.
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            observer: Arc::new(NoopObserver),
            engine: DownloadEngine::default(),
            options: LoaderOptions::default(),
        }
    }

    /// Creates a loader with explicit options.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Options`] if the concurrency is out of range.
    pub fn with_options(
        transport: Arc<dyn Transport>,
        options: LoaderOptions,
    ) -> Result<Self, LoadError> {
        let engine = DownloadEngine::new(options.concurrency)?;
        Ok(Self {
            transport,
            observer: Arc::new(NoopObserver),
            engine,
            options,
        })
    }

    /// Replaces the event sink.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn LoadObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Returns the loader options.
    #[must_use]
    pub fn options(&self) -> &LoaderOptions {
        &self.options
    }

    /// Loads one page: fetches it, downloads its local resources, rewrites
    /// their references, and writes `<output>/<page>.html`.
    ///
    /// Nothing is written when the page fetch fails. The resource directory
    /// is created even when the page has no local resources.
    ///
    /// # Errors
    ///
    /// Returns a [`LoadError`] for a failed page fetch, a filesystem failure,
    /// unprocessable markup, an expired deadline, or failed resources under
    /// [`FailurePolicy::Strict`]. Failed resources under the default policy
    /// are reported on the returned [`LoadedPage`] instead.
    #[instrument(skip_all, fields(url = %request.source_url))]
    pub async fn load(&self, request: &PageRequest) -> Result<LoadedPage, LoadError> {
        let Some(after) = self.options.timeout else {
            return self.run(request).await;
        };

        // Dropping the inner future aborts the download tasks it owns.
        match tokio::time::timeout(after, self.run(request)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(after = ?after, "page load deadline expired");
                Err(LoadError::TimedOut {
                    url: request.source_url.to_string(),
                    after,
                })
            }
        }
    }

    async fn run(&self, request: &PageRequest) -> Result<LoadedPage, LoadError> {
        let page_url = &request.source_url;
        let output_dir = request.output_dir.as_path();

        let fetched = self.transport.fetch_text(page_url).await?;
        debug!(
            bytes = fetched.body.len(),
            content_type = fetched.content_type.as_deref().unwrap_or("unknown"),
            "page fetched"
        );
        self.observer.page_fetched(page_url, fetched.body.len());

        let mut document = Document::parse(fetched.body);
        let tasks = plan(&mut document, page_url, output_dir).map_err(|e| LoadError::Markup {
            url: page_url.to_string(),
            message: e.to_string(),
        })?;

        create_resource_dir(&output_dir.join(resource_dir_name(page_url))).await?;

        self.observer.resources_planned(&tasks);
        let total = tasks.len();
        let outcomes = self
            .engine
            .fetch_all(tasks, Arc::clone(&self.transport), Arc::clone(&self.observer))
            .await;

        let failed = outcomes.iter().filter(|o| !o.is_success()).count();
        if failed > 0 {
            if self.options.failure_policy == FailurePolicy::Strict {
                return Err(LoadError::ResourcesFailed { failed, total });
            }
            warn!(failed, total, "some resources could not be downloaded");
        }

        let page_path = output_dir.join(page_file_name(page_url));
        download::write_file(&page_path, document.into_markup().into_bytes())
            .await
            .map_err(|e| LoadError::filesystem(&page_path, e))?;

        let path = std::path::absolute(&page_path).map_err(|e| LoadError::filesystem(&page_path, e))?;
        info!(path = %path.display(), resources = total, failed, "page saved");
        Ok(LoadedPage { path, outcomes })
    }
}

async fn create_resource_dir(path: &Path) -> Result<(), LoadError> {
    match tokio::fs::create_dir(path).await {
        Ok(()) => {
            debug!(path = %path.display(), "created resource directory");
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
            match tokio::fs::metadata(path).await {
                Ok(meta) if meta.is_dir() => Ok(()),
                _ => Err(LoadError::filesystem(path, e)),
            }
        }
        Err(e) => Err(LoadError::filesystem(path, e)),
    }
}

/// Loads `url` into `output_dir` over HTTP with default options.
///
/// # Errors
///
/// See [`PageLoader::load`]; also fails with [`LoadError::InvalidUrl`] for a
/// URL that is not absolute http(s).
///
/// # Example
///
/// ```no_run
/// # async fn example() -> Result<(), page_loader::LoadError> {
/// let page = page_loader::load_page("https://codica.la/cursos", "/tmp").await?;
/// println!("{}", page.path.display());
/// # Ok(())
/// # }
/// ```
pub async fn load_page(url: &str, output_dir: impl AsRef<Path>) -> Result<LoadedPage, LoadError> {
    let request = PageRequest::new(url, output_dir.as_ref())?;
    let transport = HttpTransport::new()?;
    PageLoader::new(Arc::new(transport)).load(&request).await
}
