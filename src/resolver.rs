//! Cache-aside rating resolution for a single file.
//!
//! [`RatingResolver::resolve`] walks a fixed sequence and stops at the first
//! success:
//!
//! 1. look up both stores (TV first) by the file-name hash;
//! 2. query the primary provider;
//! 3. look up the category store by the primary key;
//! 4. gap-fill the audience score (only when missing) and the critic score;
//! 5. assemble a fresh record.
//!
//! Only a total failure of step 2 fails the resolution. Gap-fill failures
//! degrade the affected field to `"N/A"`.

use std::sync::Arc;
use std::time::Duration;

use mediascore_common::{
    normalize_score, zero_as_empty, ContentKey, EpisodeInfo, Error as CacheError, MediaCategory,
    MediaIdentity, RatingRecord, Ratings, NOT_AVAILABLE,
};
use mediascore_db::store::{CacheStore, RatingCache};
use tracing::{debug, trace};

use crate::config::Config;
use crate::providers::{
    FetchContext, HttpFetcher, ImdbLookup, MetacriticProvider, OmdbProvider, PartialRating,
    ProviderError, RatingProvider, RatingQuery, RottenTomatoesProvider,
};

/// Why no record could be produced for a file.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("no ratings for {identity}: {source}")]
    Unresolved {
        identity: MediaIdentity,
        #[source]
        source: ProviderError,
    },

    #[error("resolution cancelled")]
    Cancelled,
}

/// A resolved record and whether it came from the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub record: RatingRecord,
    pub cached: bool,
}

impl Resolution {
    fn hit(record: RatingRecord) -> Self {
        Self { record, cached: true }
    }

    fn fresh(record: RatingRecord) -> Self {
        Self { record, cached: false }
    }
}

/// The three providers, by role.
#[derive(Clone)]
pub struct ProviderSet {
    /// Canonical metadata plus IMDB and audience figures.
    pub primary: Arc<dyn RatingProvider>,
    /// Audience score gap-fill.
    pub audience: Arc<dyn RatingProvider>,
    /// Critic score.
    pub critic: Arc<dyn RatingProvider>,
}

impl ProviderSet {
    /// The OMDb, Rotten Tomatoes and Metacritic clients, sharing one HTTP client.
    pub fn from_config(config: &Config) -> Result<Self, ProviderError> {
        let api_key = config
            .api_key()
            .ok_or_else(|| ProviderError::Config("missing OMDb API key".to_string()))?;
        let http = HttpFetcher::new(Duration::from_secs(config.pipeline.request_timeout_secs))?;
        let endpoints = &config.providers;
        let ids = ImdbLookup::new(http.clone(), &endpoints.imdb_suggest);

        Ok(Self {
            primary: Arc::new(OmdbProvider::new(http.clone(), api_key, &endpoints.omdb, ids)),
            audience: Arc::new(RottenTomatoesProvider::new(
                http.clone(),
                &endpoints.rotten_tomatoes,
            )),
            critic: Arc::new(MetacriticProvider::new(http, &endpoints.metacritic)),
        })
    }
}

/// Resolves file names to rating records using the cache and providers.
#[derive(Clone)]
pub struct RatingResolver {
    cache: Arc<RatingCache>,
    providers: ProviderSet,
}

impl RatingResolver {
    pub fn new(cache: Arc<RatingCache>, providers: ProviderSet) -> Self {
        Self { cache, providers }
    }

    pub fn cache(&self) -> &Arc<RatingCache> {
        &self.cache
    }

    /// Resolve one file. `identity` is what the filename parser produced.
    pub async fn resolve(
        &self,
        base_name: &str,
        identity: &MediaIdentity,
        ctx: &FetchContext,
    ) -> Result<Resolution, ResolveError> {
        let name_key = RatingRecord::base_name_key(base_name);
        for category in [MediaCategory::Tv, MediaCategory::Movie] {
            let store = self.cache.store(category);
            if let Some(record) = cached(store, |s| s.get_by_secondary_index(&name_key)) {
                trace!(base_name = base_name, category = %category, "File name cache hit");
                return Ok(Resolution::hit(record));
            }
        }

        if ctx.is_cancelled() {
            return Err(ResolveError::Cancelled);
        }

        // Category is fixed by the parsed numbers, not by anything the
        // primary provider says.
        let category = identity.category();
        let mut query = RatingQuery::new(identity.clone());

        let primary = match self.providers.primary.fetch(&query, ctx).await {
            Ok(found) => found,
            Err(ProviderError::Cancelled) => return Err(ResolveError::Cancelled),
            Err(source) => {
                return Err(ResolveError::Unresolved {
                    identity: identity.clone(),
                    source,
                })
            }
        };

        let year = primary
            .year
            .clone()
            .filter(|y| !y.trim().is_empty() && y != NOT_AVAILABLE)
            .unwrap_or_else(|| zero_as_empty(identity.year));
        let primary_key = expected_primary_key(identity, &year);

        let store = self.cache.store(category);
        if let Some(record) = cached(store, |s| s.get_by_primary(&primary_key)) {
            trace!(identity = %identity, "Identity cache hit");
            return Ok(Resolution::hit(record));
        }

        query.canonical_title = primary.title.clone();
        query.canonical_year = Some(year.clone());
        query.audience_url = primary.rotten_tomatoes_url.clone();

        let mut audience = normalize(primary.rotten_tomatoes.as_deref());
        if audience == NOT_AVAILABLE {
            audience = self
                .gap_fill(&*self.providers.audience, &query, ctx, |p| p.rotten_tomatoes)
                .await?;
        }
        let critic = self.gap_fill(&*self.providers.critic, &query, ctx, |p| p.metacritic).await?;

        let ratings = Ratings {
            imdb: normalize(primary.imdb.as_deref()),
            rotten_tomatoes: audience,
            metacritic: critic,
        };
        let episode_info = identity.is_tv().then(|| EpisodeInfo {
            season: identity.season,
            episode: identity.episode,
            episode_title: primary.title.clone().unwrap_or_default(),
        });

        let record =
            RatingRecord::assemble(base_name, &identity.title, &year, episode_info, ratings);
        debug_assert_eq!(record.primary_key, primary_key);
        Ok(Resolution::fresh(record))
    }

    /// Ask a secondary provider for one field. Errors other than
    /// cancellation degrade the field to `"N/A"`.
    async fn gap_fill(
        &self,
        provider: &dyn RatingProvider,
        query: &RatingQuery,
        ctx: &FetchContext,
        field: fn(PartialRating) -> Option<String>,
    ) -> Result<String, ResolveError> {
        match provider.fetch(query, ctx).await {
            Ok(found) => Ok(normalize(field(found).as_deref())),
            Err(ProviderError::Cancelled) => Err(ResolveError::Cancelled),
            Err(e) => {
                debug!(
                    provider = provider.name(),
                    identity = %query.identity,
                    error = %e,
                    "Provider lookup failed"
                );
                Ok(NOT_AVAILABLE.to_string())
            }
        }
    }
}

fn normalize(raw: Option<&str>) -> String {
    raw.map(normalize_score)
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Run a store lookup, treating an unavailable or failing store as a miss.
fn cached<F>(store: &CacheStore, lookup: F) -> Option<RatingRecord>
where
    F: FnOnce(&CacheStore) -> mediascore_common::Result<Option<RatingRecord>>,
{
    match lookup(store) {
        Ok(found) => found,
        Err(CacheError::CacheUnavailable(_)) => None,
        Err(e) => {
            debug!(category = %store.category(), error = %e, "Cache lookup failed");
            None
        }
    }
}

/// Primary key for a record that would be built from `identity` with the
/// given provider year.
pub fn expected_primary_key(identity: &MediaIdentity, year: &str) -> ContentKey {
    let episode = identity.is_tv().then_some((identity.season, identity.episode));
    RatingRecord::primary_key_for(&identity.title, year, episode)
}
