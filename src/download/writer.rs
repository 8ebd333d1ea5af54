//! Whole-file writes that never leave a truncated file under the final name.
//!
//! Bytes go to a hidden sibling `.part` file first and are renamed into
//! place. The write runs on the blocking pool as one unit, so abandoning the
//! awaiting future lets it finish rather than cutting it off half way.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::debug;

/// Distinguishes concurrent writes that target the same final path.
static PART_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// Writes `bytes` to `path` via a temporary sibling and a rename.
///
/// # Errors
///
/// Returns the IO error from creating, writing, syncing, or renaming the file.
/// The temporary file is removed on failure.
pub(crate) async fn write_file(path: &Path, bytes: Vec<u8>) -> std::io::Result<()> {
    let path = path.to_path_buf();
    tokio::task::spawn_blocking(move || write_file_blocking(&path, &bytes))
        .await
        .map_err(std::io::Error::other)?
}

fn write_file_blocking(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let part = part_path(path);
    let result = write_and_rename(&part, path, bytes);
    if result.is_err() {
        debug!(path = %part.display(), "cleaning up partial file after error");
        let _ = std::fs::remove_file(&part);
    }
    result
}

fn write_and_rename(part: &Path, path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = std::fs::File::create(part)?;
    file.write_all(bytes)?;
    file.sync_all()?;
    drop(file);
    std::fs::rename(part, path)
}

fn part_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let n = PART_COUNTER.fetch_add(1, Ordering::Relaxed);
    path.with_file_name(format!(".{name}.{}.{n}.part", std::process::id()))
}
