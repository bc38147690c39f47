//! Rating providers: the external data sources queried for scores.
//!
//! Every provider implements [`RatingProvider`], a single `fetch` call from a
//! [`RatingQuery`] to a [`PartialRating`] holding whatever fields that source
//! knows about. The resolver merges the partial results.
//!
//! # Module layout
//!
//! - [`http`] -- Shared HTTP client with timeout, cancellation and HTML helpers.
//! - [`omdb`] -- Primary metadata and IMDB/RT figures (P1).
//! - [`imdb`] -- Companion IMDB identifier lookup used by the OMDb retry.
//! - [`rotten_tomatoes`] -- Audience score scraper (P2).
//! - [`metacritic`] -- Critic score scraper (P3).

pub mod http;
pub mod imdb;
pub mod metacritic;
pub mod omdb;
pub mod rotten_tomatoes;

use async_trait::async_trait;
use mediascore_common::MediaIdentity;
use tokio_util::sync::CancellationToken;

pub use http::HttpFetcher;
pub use imdb::ImdbLookup;
pub use metacritic::MetacriticProvider;
pub use omdb::OmdbProvider;
pub use rotten_tomatoes::RottenTomatoesProvider;

/// Errors raised by provider clients.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// Transport failure, including timeouts.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with something other than 200 OK.
    #[error("HTTP error {status} for URL: {url}")]
    Status { status: u16, url: String },

    /// The provider has no entry for the query.
    #[error("not found: {0}")]
    NotFound(String),

    /// The response could not be understood.
    #[error("unexpected response: {0}")]
    Parse(String),

    /// The caller's cancellation token fired while the call was in flight.
    #[error("request cancelled")]
    Cancelled,

    /// The provider is not usable as configured.
    #[error("provider misconfigured: {0}")]
    Config(String),
}

impl ProviderError {
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn parse<S: Into<String>>(msg: S) -> Self {
        Self::Parse(msg.into())
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Per-call context shared by every provider request of one resolution.
#[derive(Debug, Clone, Default)]
pub struct FetchContext {
    cancel: CancellationToken,
}

impl FetchContext {
    pub fn new(cancel: CancellationToken) -> Self {
        Self { cancel }
    }

    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

/// What a provider is asked about.
#[derive(Debug, Clone)]
pub struct RatingQuery {
    /// Identity parsed from the file name.
    pub identity: MediaIdentity,
    /// Canonical title reported by the primary provider, when known.
    pub canonical_title: Option<String>,
    /// Canonical year reported by the primary provider, when known.
    pub canonical_year: Option<String>,
    /// Page URL suggested by the primary provider for the audience score.
    pub audience_url: Option<String>,
}

impl RatingQuery {
    pub fn new(identity: MediaIdentity) -> Self {
        Self {
            identity,
            canonical_title: None,
            canonical_year: None,
            audience_url: None,
        }
    }

    /// Canonical title if known, else the parsed one.
    pub fn best_title(&self) -> &str {
        self.canonical_title
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or(&self.identity.title)
    }

    /// Parsed year, or the canonical year when the file name had none.
    pub fn best_year(&self) -> u32 {
        if self.identity.year > 0 {
            return self.identity.year;
        }
        self.canonical_year
            .as_deref()
            .and_then(|y| y.get(..4))
            .and_then(|y| y.parse().ok())
            .unwrap_or(0)
    }
}

/// Fields a provider managed to resolve; `None` means "not supplied".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialRating {
    /// Canonical title (the episode title for TV lookups).
    pub title: Option<String>,
    pub year: Option<String>,
    pub imdb: Option<String>,
    pub rotten_tomatoes: Option<String>,
    /// Page URL for the Rotten Tomatoes entry, if the provider knows it.
    pub rotten_tomatoes_url: Option<String>,
    pub metacritic: Option<String>,
}

/// A single external rating source.
///
/// Implementations must return promptly with [`ProviderError::Cancelled`]
/// once the context's token is cancelled.
#[async_trait]
pub trait RatingProvider: Send + Sync {
    /// Short, lowercase identifier for this provider (e.g. `"omdb"`).
    fn name(&self) -> &'static str;

    /// Fetch whatever rating fields this source knows for `query`.
    async fn fetch(
        &self,
        query: &RatingQuery,
        ctx: &FetchContext,
    ) -> Result<PartialRating, ProviderError>;
}

/// Build a site slug from a title: spaces become underscores, colons vanish.
///
/// # Examples
///
/// ```
/// use mediascore::providers::slugify;
///
/// assert_eq!(slugify("Star Wars: A New Hope"), "Star_Wars_A_New_Hope");
/// ```
pub fn slugify(title: &str) -> String {
    title.replace(' ', "_").replace(':', "")
}
