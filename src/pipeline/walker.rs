//! Directory traversal feeding the path queue.

use std::fs;
use std::path::{Path, PathBuf};

use mediascore_common::paths::is_video_file;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};
use walkdir::WalkDir;

use super::PipelineError;

/// Walk `root` and send every video file path into `tx`.
///
/// Blocking; run it on a blocking thread. Symlinks are not followed and
/// per-entry errors are skipped. Only an unreadable root is an error.
/// Returns the number of paths queued.
pub fn walk(
    root: &Path,
    tx: mpsc::Sender<PathBuf>,
    cancel: &CancellationToken,
) -> Result<usize, PipelineError> {
    let root = fs::canonicalize(root).map_err(|source| PipelineError::Traversal {
        root: root.to_path_buf(),
        source,
    })?;
    fs::read_dir(&root).map_err(|source| PipelineError::Traversal {
        root: root.clone(),
        source,
    })?;

    let mut queued = 0;
    for entry in WalkDir::new(&root).follow_links(false) {
        if cancel.is_cancelled() {
            break;
        }

        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                debug!(error = %e, "Skipping unreadable entry");
                continue;
            }
        };

        if !entry.file_type().is_file() || !is_video_file(entry.path()) {
            continue;
        }

        trace!(path = %entry.path().display(), "Queueing file");
        if tx.blocking_send(entry.into_path()).is_err() {
            // All workers are gone.
            break;
        }
        queued += 1;
    }

    Ok(queued)
}
