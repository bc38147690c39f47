//! The worker pool: parse each queued file name and resolve its ratings.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use mediascore_common::paths::base_name;
use mediascore_common::MediaIdentity;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::providers::FetchContext;
use crate::resolver::{RatingResolver, Resolution, ResolveError};

/// Path queue shared by all workers.
pub type PathQueue = Arc<Mutex<mpsc::Receiver<PathBuf>>>;

/// Fixed-size set of resolver tasks.
pub struct WorkerPool {
    resolver: RatingResolver,
    size: usize,
}

impl WorkerPool {
    pub fn new(resolver: RatingResolver, size: usize) -> Self {
        Self {
            resolver,
            size: size.max(1),
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Start the workers. Each one exits when the path queue is closed and
    /// drained, when the result queue closes, or on cancellation.
    pub fn spawn(
        &self,
        paths: PathQueue,
        results: mpsc::Sender<Resolution>,
        cancel: CancellationToken,
    ) -> JoinSet<()> {
        let mut set = JoinSet::new();
        for id in 0..self.size {
            set.spawn(run_worker(
                id,
                self.resolver.clone(),
                paths.clone(),
                results.clone(),
                cancel.clone(),
            ));
        }
        set
    }
}

async fn run_worker(
    id: usize,
    resolver: RatingResolver,
    paths: PathQueue,
    results: mpsc::Sender<Resolution>,
    cancel: CancellationToken,
) {
    let ctx = FetchContext::new(cancel.clone());

    loop {
        let next = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            path = async { paths.lock().await.recv().await } => path,
        };
        let Some(path) = next else {
            break;
        };

        let resolution = match process_file(&resolver, &path, &ctx).await {
            Ok(Some(resolution)) => resolution,
            Ok(None) => continue,
            Err(()) => break,
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            sent = results.send(resolution) => {
                if sent.is_err() {
                    break;
                }
            }
        }
    }

    debug!(worker = id, "Worker stopped");
}

/// Resolve one file. `Ok(None)` drops the file; `Err(())` means cancelled.
async fn process_file(
    resolver: &RatingResolver,
    path: &Path,
    ctx: &FetchContext,
) -> Result<Option<Resolution>, ()> {
    let Some(name) = base_name(path) else {
        return Ok(None);
    };
    let identity = identify(&name);

    match resolver.resolve(&name, &identity, ctx).await {
        Ok(resolution) => Ok(Some(resolution)),
        Err(ResolveError::Cancelled) => Err(()),
        Err(e) => {
            warn!(file = %name, error = %e, "Could not resolve ratings; skipping");
            Ok(None)
        }
    }
}

/// Derive an identity from a file name, falling back to whatever the parser
/// recovered when it fails.
pub fn identify(name: &str) -> MediaIdentity {
    let parsed = match mediascore_parser::parse(name) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!(file = %name, error = %e, "Not able to parse file name; using partial fields");
            e.into_partial()
        }
    };

    MediaIdentity::new(
        parsed.title.trim_matches('.'),
        parsed.year,
        parsed.season,
        parsed.episode,
    )
}
