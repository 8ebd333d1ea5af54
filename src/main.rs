//! CLI entry point for page-loader.

use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use page_loader::transport::{CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS};
use page_loader::{
    DEFAULT_CONCURRENCY, FailurePolicy, HttpTransport, LoadObserver, LoadedPage, LoaderOptions,
    PageLoader, PageRequest,
};
use tracing::{debug, info};

mod app_config;
mod cli;
mod progress;

use app_config::FileConfig;
use cli::Args;
use progress::ProgressObserver;

/// Effective settings after merging CLI flags over the config file.
#[derive(Debug, Clone, PartialEq, Eq)]
struct RunSettings {
    output_dir: PathBuf,
    options: LoaderOptions,
    connect_timeout_secs: u64,
    read_timeout_secs: u64,
    log_level: &'static str,
}

impl RunSettings {
    fn resolve(args: &Args, file: &FileConfig) -> Self {
        // Priority: quiet flag > verbose flag > config verbosity > default (warn)
        let log_level = if args.quiet {
            "error"
        } else {
            match args.verbose {
                0 => file.verbosity.map_or("warn", |v| v.log_level()),
                1 => "debug",
                _ => "trace",
            }
        };

        let strict = args.strict || file.strict.unwrap_or(false);
        let options = LoaderOptions {
            concurrency: args
                .concurrency
                .or(file.concurrency)
                .map_or(DEFAULT_CONCURRENCY, usize::from),
            failure_policy: if strict {
                FailurePolicy::Strict
            } else {
                FailurePolicy::Tolerate
            },
            timeout: args.timeout.or(file.timeout_secs).map(Duration::from_secs),
        };

        Self {
            output_dir: args
                .output
                .clone()
                .or_else(|| file.output_dir.clone())
                .unwrap_or_else(|| PathBuf::from(".")),
            options,
            connect_timeout_secs: file.connect_timeout_secs.unwrap_or(CONNECT_TIMEOUT_SECS),
            read_timeout_secs: file.read_timeout_secs.unwrap_or(READ_TIMEOUT_SECS),
            log_level,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    match run(args).await {
        Ok(page) => {
            println!("{}", page.path.display());
            for failure in page.failures() {
                if let Some(error) = failure.error() {
                    eprintln!("Failed to download {}: {error}", failure.task.url);
                }
            }
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprintln!("Error: {error:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<LoadedPage> {
    let file_config = app_config::load_default_file_config()?;
    let settings = RunSettings::resolve(&args, &file_config);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(settings.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    debug!(?args, ?settings, "settings resolved");

    let request = PageRequest::new(&args.url, &settings.output_dir)?;
    let transport =
        HttpTransport::with_timeouts(settings.connect_timeout_secs, settings.read_timeout_secs)?;
    let loader = PageLoader::with_options(Arc::new(transport), settings.options.clone())?;

    let show_progress = !args.quiet && !args.no_progress && io::stderr().is_terminal();
    let result = if show_progress {
        let observer = Arc::new(ProgressObserver::stderr());
        let sink: Arc<dyn LoadObserver> = observer.clone();
        let result = loader.with_observer(sink).load(&request).await;
        observer.finish();
        result
    } else {
        loader.load(&request).await
    };
    let page = result.with_context(|| format!("failed to load {}", request.source_url))?;

    info!(
        succeeded = page.succeeded(),
        failed = page.failed(),
        "page load complete"
    );
    Ok(page)
}
