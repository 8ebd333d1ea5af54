//! Per-resource progress display for interactive runs.

use std::sync::Mutex;
use std::time::Duration;

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use page_loader::{DownloadTask, LoadObserver, ResourceError};
use url::Url;

/// Renders one spinner line per in-flight resource.
pub(crate) struct ProgressObserver {
    multi: MultiProgress,
    active: Mutex<Vec<(DownloadTask, ProgressBar)>>,
}

impl ProgressObserver {
    /// Draws to stderr.
    pub(crate) fn stderr() -> Self {
        Self::with_draw_target(ProgressDrawTarget::stderr())
    }

    fn with_draw_target(target: ProgressDrawTarget) -> Self {
        Self {
            multi: MultiProgress::with_draw_target(target),
            active: Mutex::new(Vec::new()),
        }
    }

    /// Removes any spinner still on screen.
    pub(crate) fn finish(&self) {
        if let Ok(mut active) = self.active.lock() {
            for (_, bar) in active.drain(..) {
                bar.finish_and_clear();
            }
        }
        let _ = self.multi.clear();
    }

    #[cfg(test)]
    fn in_flight(&self) -> usize {
        self.active.lock().map(|active| active.len()).unwrap_or(0)
    }
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

impl LoadObserver for ProgressObserver {
    fn page_fetched(&self, url: &Url, bytes: usize) {
        let _ = self.multi.println(format!("Fetched {url} ({bytes} bytes)"));
    }

    fn resource_started(&self, task: &DownloadTask) {
        let bar = self.multi.add(ProgressBar::new_spinner());
        bar.set_style(spinner_style());
        bar.set_message(task.url.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));
        if let Ok(mut active) = self.active.lock() {
            active.push((task.clone(), bar));
        }
    }

    fn resource_finished(&self, task: &DownloadTask, result: &Result<u64, ResourceError>) {
        let bar = self.active.lock().ok().and_then(|mut active| {
            let index = active.iter().position(|(t, _)| t == task)?;
            Some(active.remove(index).1)
        });
        if let Some(bar) = bar {
            bar.finish_and_clear();
            self.multi.remove(&bar);
        }

        let line = match result {
            Ok(_) => format!("  \u{2714} {}", task.url),
            Err(e) => format!("  \u{2716} {} ({e})", task.url),
        };
        let _ = self.multi.println(line);
    }
}
