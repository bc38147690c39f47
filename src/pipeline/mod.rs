//! The resolution pipeline.
//!
//! Directories are walked one after another. For each, a walker on a
//! blocking thread fills a bounded path queue that a [`WorkerPool`] drains;
//! every worker sends its results into one bounded output queue consumed by
//! a single aggregator task for the whole run.

pub mod aggregator;
pub mod walker;
pub mod workers;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::PipelineConfig;
use crate::resolver::{RatingResolver, Resolution};

pub use aggregator::RatingReport;
pub use workers::WorkerPool;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("cannot read directory {}: {source}", root.display())]
    Traversal {
        root: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("run cancelled")]
    Cancelled,

    #[error("pipeline task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

pub struct Pipeline {
    workers: WorkerPool,
    resolver: RatingResolver,
    queue_size: usize,
    cancel: CancellationToken,
}

impl Pipeline {
    pub fn new(
        resolver: RatingResolver,
        config: &PipelineConfig,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            workers: WorkerPool::new(resolver.clone(), config.effective_workers()),
            resolver,
            queue_size: config.queue_size.max(1),
            cancel,
        }
    }

    /// Resolve every video file beneath `roots` and collect the results.
    pub async fn run(&self, roots: &[PathBuf]) -> Result<RatingReport, PipelineError> {
        let (results_tx, results_rx) = mpsc::channel(self.queue_size);
        let aggregator = tokio::spawn(aggregator::aggregate(
            self.resolver.cache().clone(),
            results_rx,
            self.cancel.clone(),
        ));

        for root in roots {
            if let Err(e) = self.scan(root, results_tx.clone()).await {
                aggregator.abort();
                return Err(e);
            }
        }
        drop(results_tx);

        let report = aggregator.await?;
        match report {
            Some(report) if !self.cancel.is_cancelled() => Ok(report),
            _ => Err(PipelineError::Cancelled),
        }
    }

    async fn scan(
        &self,
        root: &Path,
        results: mpsc::Sender<Resolution>,
    ) -> Result<(), PipelineError> {
        let (path_tx, path_rx) = mpsc::channel(self.queue_size);
        let path_rx = Arc::new(Mutex::new(path_rx));
        let mut workers = self.workers.spawn(path_rx, results, self.cancel.clone());

        let walk_root = root.to_path_buf();
        let cancel = self.cancel.clone();
        let walked =
            tokio::task::spawn_blocking(move || walker::walk(&walk_root, path_tx, &cancel)).await;

        while let Some(joined) = workers.join_next().await {
            if let Err(e) = joined {
                warn!(error = %e, "Worker task failed");
            }
        }

        let queued = walked??;
        info!(
            root = %root.display(),
            files = queued,
            workers = self.workers.size(),
            "Scanned directory"
        );
        Ok(())
    }
}
