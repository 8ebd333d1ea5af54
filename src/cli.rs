//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

/// Save a web page for offline use.
///
/// Downloads the page plus the images, stylesheets and scripts served from
/// its own origin, and rewrites the page so it opens from disk.
#[derive(Parser, Debug)]
#[command(name = "page-loader")]
#[command(author, version, about)]
pub struct Args {
    /// Page URL (http or https)
    pub url: String,

    /// Output directory [default: current directory]
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Maximum concurrent resource downloads (1-100) [default: 10]
    #[arg(short = 'c', long, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub concurrency: Option<u8>,

    /// Deadline for the whole page load in seconds (1-3600)
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..=3600))]
    pub timeout: Option<u64>,

    /// Fail when any resource cannot be downloaded
    #[arg(long)]
    pub strict: bool,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// Do not show per-resource progress
    #[arg(long)]
    pub no_progress: bool,
}
