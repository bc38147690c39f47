//! Shared fixtures for integration tests.
//!
//! Provides [`StubProvider`], a canned in-process [`RatingProvider`] keyed by
//! parsed title, and helpers for building media folders on disk.

#![allow(dead_code)]

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use mediascore::config::PipelineConfig;
use mediascore::providers::{
    FetchContext, PartialRating, ProviderError, RatingProvider, RatingQuery,
};
use mediascore::resolver::ProviderSet;
use tempfile::TempDir;

/// Provider returning canned answers by parsed title and counting calls.
pub struct StubProvider {
    name: &'static str,
    replies: HashMap<String, PartialRating>,
    calls: AtomicUsize,
}

impl StubProvider {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            replies: HashMap::new(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Answer queries for `title` with `reply`; anything else is not found.
    pub fn with(mut self, title: &str, reply: PartialRating) -> Self {
        self.replies.insert(title.to_string(), reply);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RatingProvider for StubProvider {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn fetch(
        &self,
        query: &RatingQuery,
        _: &FetchContext,
    ) -> Result<PartialRating, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.replies
            .get(&query.identity.title)
            .cloned()
            .ok_or_else(|| ProviderError::not_found(query.identity.title.clone()))
    }
}

/// A primary-provider answer.
pub fn primary(title: &str, year: &str, imdb: &str, rotten_tomatoes: &str) -> PartialRating {
    PartialRating {
        title: Some(title.into()),
        year: Some(year.into()),
        imdb: Some(imdb.into()),
        rotten_tomatoes: Some(rotten_tomatoes.into()),
        ..Default::default()
    }
}

pub fn audience(score: &str) -> PartialRating {
    PartialRating {
        rotten_tomatoes: Some(score.into()),
        ..Default::default()
    }
}

pub fn critic(score: &str) -> PartialRating {
    PartialRating {
        metacritic: Some(score.into()),
        ..Default::default()
    }
}

/// The three stubs wired up the way the standard providers are, plus
/// handles for inspecting call counts.
pub struct Stubs {
    pub primary: Arc<StubProvider>,
    pub audience: Arc<StubProvider>,
    pub critic: Arc<StubProvider>,
}

impl Stubs {
    /// Answers for "The Matrix" (movie) and "Show Name" S02E05.
    pub fn library() -> Self {
        Self {
            primary: Arc::new(
                StubProvider::new("primary")
                    .with("The Matrix", primary("The Matrix", "1999", "8.7", "N/A"))
                    .with("Show Name", primary("Episode Five", "2019", "7.9", "92")),
            ),
            audience: Arc::new(
                StubProvider::new("audience")
                    .with("The Matrix", audience("85"))
                    .with("Show Name", audience("1")),
            ),
            critic: Arc::new(
                StubProvider::new("critic")
                    .with("The Matrix", critic("73"))
                    .with("Show Name", critic("N/A")),
            ),
        }
    }

    pub fn provider_set(&self) -> ProviderSet {
        ProviderSet {
            primary: self.primary.clone(),
            audience: self.audience.clone(),
            critic: self.critic.clone(),
        }
    }

    pub fn total_calls(&self) -> usize {
        self.primary.calls() + self.audience.calls() + self.critic.calls()
    }
}

pub fn pipeline_config(workers: usize) -> PipelineConfig {
    PipelineConfig {
        workers,
        queue_size: 4,
        request_timeout_secs: 6,
    }
}

/// Create empty files at the given relative paths.
pub fn media_dir(files: &[&str]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for file in files {
        touch(&dir.path().join(file));
    }
    dir
}

pub fn touch(path: &Path) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, b"").unwrap();
}
