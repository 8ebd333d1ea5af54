//! Resource planning: rewrite local references and collect download tasks.

use std::path::Path;

use tracing::{debug, instrument, warn};
use url::Url;

use super::classify::{Classification, classify};
use super::html::{Document, MarkupError};
use crate::download::{DownloadTask, resource_dir_name, resource_file_name};

/// Rewrites every local reference in `document` and returns one
/// [`DownloadTask`] per rewritten reference, in document order.
///
/// A local reference becomes `<page>_files/<resource file name>`, always
/// joined with `/` because the path lives inside HTML. Self references,
/// external references, and values that cannot be resolved are left exactly
/// as they were. Task paths are rooted at `output_dir`.
///
/// # Errors
///
/// Returns [`MarkupError`] if the markup cannot be processed; no tasks are
/// produced and the document is unchanged in that case.
#[instrument(skip_all, fields(page = %page_url))]
pub fn plan(
    document: &mut Document,
    page_url: &Url,
    output_dir: &Path,
) -> Result<Vec<DownloadTask>, MarkupError> {
    let dir_name = resource_dir_name(page_url);
    let resource_dir = output_dir.join(&dir_name);
    let mut tasks = Vec::new();

    document.rewrite_references(|reference| {
        let resolved = match classify(&reference.raw_value, page_url) {
            Ok(resolved) => resolved,
            Err(error) => {
                warn!(
                    ordinal = reference.ordinal,
                    reference = %reference.raw_value,
                    element = reference.kind.tag_name(),
                    error = %error,
                    "skipping unresolvable reference"
                );
                return None;
            }
        };

        match resolved.classification {
            Classification::Local => {
                let file_name = resource_file_name(&resolved.absolute_url);
                let local_link = format!("{dir_name}/{file_name}");
                debug!(
                    ordinal = reference.ordinal,
                    url = %resolved.absolute_url,
                    link = %local_link,
                    "planned local resource"
                );
                tasks.push(DownloadTask {
                    file_path: resource_dir.join(&file_name),
                    url: resolved.absolute_url,
                    file_name,
                });
                Some(local_link)
            }
            Classification::SelfReference => {
                debug!(
                    ordinal = reference.ordinal,
                    reference = %reference.raw_value,
                    "ignoring reference to the page itself"
                );
                None
            }
            Classification::External => {
                debug!(
                    ordinal = reference.ordinal,
                    url = %resolved.absolute_url,
                    "leaving external reference untouched"
                );
                None
            }
        }
    })?;

    debug!(tasks = tasks.len(), "resource plan ready");
    Ok(tasks)
}
