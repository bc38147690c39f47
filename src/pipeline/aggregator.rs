//! Single consumer of resolved records: builds the tables and persists
//! fresh results.

use std::sync::Arc;

use mediascore_common::{Error as CacheError, RatingRecord};
use mediascore_db::store::RatingCache;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::resolver::Resolution;

/// Records collected during a run, in arrival order per table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RatingReport {
    pub movies: Vec<RatingRecord>,
    pub tv: Vec<RatingRecord>,
    /// How many fresh records were written to the cache.
    pub persisted: usize,
    /// How many records came straight from the cache.
    pub cache_hits: usize,
}

impl RatingReport {
    pub fn is_empty(&self) -> bool {
        self.movies.is_empty() && self.tv.is_empty()
    }

    pub fn len(&self) -> usize {
        self.movies.len() + self.tv.len()
    }
}

/// Drain `rx` until it closes. Returns `None` if cancelled first.
pub async fn aggregate(
    cache: Arc<RatingCache>,
    mut rx: mpsc::Receiver<Resolution>,
    cancel: CancellationToken,
) -> Option<RatingReport> {
    let mut report = RatingReport::default();

    loop {
        let next = tokio::select! {
            biased;
            _ = cancel.cancelled() => return None,
            next = rx.recv() => next,
        };
        let Some(Resolution { record, cached }) = next else {
            break;
        };

        if cached {
            report.cache_hits += 1;
        } else {
            persist(&cache, &record, &mut report);
        }

        if record.is_tv {
            report.tv.push(record);
        } else {
            report.movies.push(record);
        }
    }

    debug!(
        movies = report.movies.len(),
        tv = report.tv.len(),
        persisted = report.persisted,
        cache_hits = report.cache_hits,
        "Aggregation finished"
    );
    Some(report)
}

fn persist(cache: &RatingCache, record: &RatingRecord, report: &mut RatingReport) {
    match cache.store(record.category()).put(record) {
        Ok(()) => report.persisted += 1,
        // Already reported when the store was opened.
        Err(CacheError::CacheUnavailable(_)) => {}
        Err(e) => warn!(title = %record.title, error = %e, "Failed to cache rating"),
    }
}
