use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use mediascore_db::pool::DEFAULT_POOL_SIZE;

use crate::providers::{imdb, metacritic, omdb, rotten_tomatoes};

/// Name of the per-user cache directory.
pub const CACHE_DIR_NAME: &str = "MediaScore";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    /// OMDb API key. Usually supplied through `OMDB_API_KEY`.
    #[serde(default)]
    pub omdb_api_key: Option<String>,

    /// Parent directory for the rating cache (default: the user cache dir)
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,

    /// Verbose logging
    #[serde(default)]
    pub debug: bool,

    #[serde(default)]
    pub pipeline: PipelineConfig,

    #[serde(default)]
    pub providers: ProviderEndpoints,
}

impl Config {
    /// Directory holding the store files, or `None` when no cache
    /// location can be determined.
    pub fn cache_root(&self) -> Option<PathBuf> {
        self.cache_dir
            .clone()
            .or_else(dirs::cache_dir)
            .map(|dir| dir.join(CACHE_DIR_NAME))
    }

    /// The API key, if one is configured and non-blank.
    pub fn api_key(&self) -> Option<&str> {
        self.omdb_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PipelineConfig {
    /// Concurrent resolvers (0 = one per CPU)
    #[serde(default)]
    pub workers: usize,

    /// Capacity of the path and result queues
    #[serde(default = "default_queue_size")]
    pub queue_size: usize,

    /// Per-request timeout for provider calls, in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_queue_size() -> usize {
    128
}

fn default_request_timeout() -> u64 {
    6
}

impl PipelineConfig {
    /// Worker count with `0` resolved to the available parallelism.
    pub fn effective_workers(&self) -> usize {
        if self.workers == 0 {
            num_cpus::get().max(1)
        } else {
            self.workers
        }
    }

    /// Connections each cache store needs so that every worker and the
    /// aggregator can hold one at once.
    pub fn cache_connections(&self) -> u32 {
        let wanted = u32::try_from(self.effective_workers() + 1).unwrap_or(u32::MAX);
        wanted.max(DEFAULT_POOL_SIZE)
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            workers: 0,
            queue_size: default_queue_size(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

/// Base URLs of the external services.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProviderEndpoints {
    #[serde(default = "default_omdb_url")]
    pub omdb: String,

    #[serde(default = "default_imdb_url")]
    pub imdb_suggest: String,

    #[serde(default = "default_rotten_tomatoes_url")]
    pub rotten_tomatoes: String,

    #[serde(default = "default_metacritic_url")]
    pub metacritic: String,
}

fn default_omdb_url() -> String {
    omdb::DEFAULT_BASE_URL.to_string()
}
fn default_imdb_url() -> String {
    imdb::DEFAULT_BASE_URL.to_string()
}
fn default_rotten_tomatoes_url() -> String {
    rotten_tomatoes::DEFAULT_BASE_URL.to_string()
}
fn default_metacritic_url() -> String {
    metacritic::DEFAULT_BASE_URL.to_string()
}

impl Default for ProviderEndpoints {
    fn default() -> Self {
        Self {
            omdb: default_omdb_url(),
            imdb_suggest: default_imdb_url(),
            rotten_tomatoes: default_rotten_tomatoes_url(),
            metacritic: default_metacritic_url(),
        }
    }
}
