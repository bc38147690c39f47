//! OMDb client: canonical title and year plus the IMDB and Rotten Tomatoes
//! figures.
//!
//! A title/year query is tried first. When OMDb has no match the IMDB id is
//! looked up through [`ImdbLookup`] and the query repeated by id; if that
//! also fails the resolution fails.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::{
    FetchContext, HttpFetcher, ImdbLookup, PartialRating, ProviderError, RatingProvider,
    RatingQuery,
};

pub const DEFAULT_BASE_URL: &str = "https://www.omdbapi.com/";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OmdbResponse {
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Error")]
    error: Option<String>,
    #[serde(rename = "Title")]
    title: Option<String>,
    #[serde(rename = "Year")]
    year: Option<String>,
    #[serde(rename = "imdbRating")]
    imdb_rating: Option<String>,
    #[serde(rename = "tomatoRating")]
    tomato_rating: Option<String>,
    #[serde(rename = "tomatoURL")]
    tomato_url: Option<String>,
}

impl OmdbResponse {
    fn into_partial(self) -> PartialRating {
        PartialRating {
            title: self.title,
            year: self.year,
            imdb: self.imdb_rating,
            rotten_tomatoes: self.tomato_rating,
            rotten_tomatoes_url: self.tomato_url,
            metacritic: None,
        }
    }
}

/// The primary provider.
pub struct OmdbProvider {
    http: HttpFetcher,
    api_key: String,
    base_url: String,
    ids: ImdbLookup,
}

impl OmdbProvider {
    pub fn new(
        http: HttpFetcher,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        ids: ImdbLookup,
    ) -> Self {
        Self {
            http,
            api_key: api_key.into(),
            base_url: base_url.into(),
            ids,
        }
    }

    /// Query parameters shared by both attempts.
    fn base_params(&self, query: &RatingQuery) -> Vec<(&'static str, String)> {
        let identity = &query.identity;
        let mut params = vec![("apikey", self.api_key.clone()), ("tomatoes", "true".to_string())];
        if identity.is_tv() {
            params.push(("type", "episode".to_string()));
            params.push(("Season", identity.season.to_string()));
            params.push(("Episode", identity.episode.to_string()));
        } else {
            params.push(("type", "movie".to_string()));
        }
        params
    }

    async fn request(
        &self,
        params: &[(&str, String)],
        ctx: &FetchContext,
    ) -> Result<PartialRating, ProviderError> {
        let resp: OmdbResponse = match self.http.fetch_json(&self.base_url, params, ctx).await {
            Ok(resp) => resp,
            Err(ProviderError::Status { status: 401, .. }) => {
                return Err(ProviderError::Config("OMDb rejected the API key".to_string()));
            }
            Err(e) => return Err(e),
        };
        if !resp.response.eq_ignore_ascii_case("true") {
            let reason = resp.error.unwrap_or_else(|| "no match".to_string());
            if reason.to_lowercase().contains("api key") {
                return Err(ProviderError::Config(reason));
            }
            return Err(ProviderError::NotFound(reason));
        }
        Ok(resp.into_partial())
    }

    async fn by_title(
        &self,
        query: &RatingQuery,
        ctx: &FetchContext,
    ) -> Result<PartialRating, ProviderError> {
        let identity = &query.identity;
        let mut params = self.base_params(query);
        params.push(("t", identity.title.clone()));
        if identity.year > 0 {
            params.push(("y", identity.year.to_string()));
        }
        self.request(&params, ctx).await
    }

    async fn by_id(
        &self,
        query: &RatingQuery,
        ctx: &FetchContext,
    ) -> Result<PartialRating, ProviderError> {
        let identity = &query.identity;
        let id = self.ids.find_id(&identity.title, identity.year, ctx).await?;
        let mut params = self.base_params(query);
        params.push(("i", id));
        self.request(&params, ctx).await
    }
}

#[async_trait]
impl RatingProvider for OmdbProvider {
    fn name(&self) -> &'static str {
        "omdb"
    }

    async fn fetch(
        &self,
        query: &RatingQuery,
        ctx: &FetchContext,
    ) -> Result<PartialRating, ProviderError> {
        match self.by_title(query, ctx).await {
            Ok(found) => Ok(found),
            Err(e @ (ProviderError::Cancelled | ProviderError::Config(_))) => Err(e),
            Err(e) => {
                debug!(
                    identity = %query.identity,
                    error = %e,
                    "OMDb title lookup missed, retrying by IMDB id"
                );
                self.by_id(query, ctx).await
            }
        }
    }
}
